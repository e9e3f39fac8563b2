//! List accessors

use super::Cacher;
use crate::codec::ToStore;
use crate::error::Result;
use crate::executor::Command;

impl Cacher {
    /// Prepends a value, creating the list if needed. Returns the new length.
    pub async fn lpush<V: ToStore>(&self, key: &str, value: V) -> Result<u64> {
        self.push("LPUSH", key, value).await
    }

    /// Appends a value, creating the list if needed. Returns the new length.
    pub async fn rpush<V: ToStore>(&self, key: &str, value: V) -> Result<u64> {
        self.push("RPUSH", key, value).await
    }

    /// Removes and returns the head. `None` on an empty or absent list.
    pub async fn lpop(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.dispatch(Command::new("LPOP").arg(self.key(key)))
            .await?
            .into_optional_bytes()
    }

    /// Removes and returns the tail. `None` on an empty or absent list.
    pub async fn rpop(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.dispatch(Command::new("RPOP").arg(self.key(key)))
            .await?
            .into_optional_bytes()
    }

    pub async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        self.dispatch(
            Command::new("LRANGE")
                .arg(self.key(key))
                .arg_int(start)
                .arg_int(stop),
        )
        .await?
        .into_byte_list()
    }

    pub async fn llen(&self, key: &str) -> Result<u64> {
        self.dispatch(Command::new("LLEN").arg(self.key(key)))
            .await?
            .into_count()
    }

    async fn push<V: ToStore>(&self, name: &'static str, key: &str, value: V) -> Result<u64> {
        let command = Command::new(name)
            .arg(self.key(key))
            .arg(self.encode(value)?);
        self.dispatch(command).await?.into_count()
    }
}
