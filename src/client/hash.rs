//! Hash accessors

use serde::de::DeserializeOwned;

use super::Cacher;
use crate::codec::{decode_bool, decode_int, decode_string, ToStore};
use crate::error::Result;
use crate::executor::Command;

impl Cacher {
    /// Sets one field. Returns 1 if the field is new, 0 if it was
    /// overwritten.
    pub async fn hset<V: ToStore>(&self, key: &str, field: &str, value: V) -> Result<u64> {
        let command = Command::new("HSET")
            .arg(self.key(key))
            .arg(field)
            .arg(self.encode(value)?);
        self.dispatch(command).await?.into_count()
    }

    /// Sets several fields at once, then applies `ttl` seconds to the whole
    /// hash when it is non-zero.
    ///
    /// # Arguments
    /// * `key` - Logical key of the hash
    /// * `fields` - Field/value pairs, written in one command
    /// * `ttl` - Seconds until the hash expires, 0 to leave its TTL alone
    ///
    /// The fields and the TTL are two separate commands. If the second one
    /// fails the fields stay written without an expiration.
    pub async fn hmset<I, F, V>(&self, key: &str, fields: I, ttl: u64) -> Result<()>
    where
        I: IntoIterator<Item = (F, V)>,
        F: AsRef<str>,
        V: ToStore,
    {
        let mut command = Command::new("HSET").arg(self.key(key));
        let mut written = 0usize;
        for (field, value) in fields {
            command = command.arg(field.as_ref()).arg(self.encode(value)?);
            written += 1;
        }
        if written == 0 {
            return Ok(());
        }

        self.dispatch(command).await?;
        if ttl > 0 {
            self.expire(key, ttl).await?;
        }
        Ok(())
    }

    /// Reads the raw bytes of one field.
    pub async fn hget(&self, key: &str, field: &str) -> Result<Vec<u8>> {
        self.dispatch(Command::new("HGET").arg(self.key(key)).arg(field))
            .await?
            .into_bytes(&format!("{}.{}", key, field))
    }

    pub async fn hget_string(&self, key: &str, field: &str) -> Result<String> {
        decode_string(self.hget(key, field).await?)
    }

    pub async fn hget_int(&self, key: &str, field: &str) -> Result<i64> {
        decode_int(&self.hget(key, field).await?)
    }

    pub async fn hget_bool(&self, key: &str, field: &str) -> Result<bool> {
        decode_bool(&self.hget(key, field).await?)
    }

    pub async fn hget_object<T: DeserializeOwned>(&self, key: &str, field: &str) -> Result<T> {
        let bytes = self.hget(key, field).await?;
        self.codec().decode_object(&bytes)
    }

    /// All fields with their raw values, in insertion order. Empty when the
    /// hash does not exist.
    pub async fn hget_all(&self, key: &str) -> Result<Vec<(String, Vec<u8>)>> {
        self.dispatch(Command::new("HGETALL").arg(self.key(key)))
            .await?
            .into_pairs()
    }

    /// Field names, empty when the hash does not exist.
    pub async fn hkeys(&self, key: &str) -> Result<Vec<String>> {
        self.dispatch(Command::new("HKEYS").arg(self.key(key)))
            .await?
            .into_strings()
    }

    /// Removes fields and returns how many existed.
    pub async fn hdel<F: AsRef<str>>(&self, key: &str, fields: &[F]) -> Result<u64> {
        if fields.is_empty() {
            return Ok(0);
        }
        let command = Command::new("HDEL")
            .arg(self.key(key))
            .args(fields.iter().map(|f| f.as_ref()));
        self.dispatch(command).await?.into_count()
    }

    /// Adds `delta` to an integer field, creating it at 0 first if needed.
    pub async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64> {
        self.dispatch(
            Command::new("HINCRBY")
                .arg(self.key(key))
                .arg(field)
                .arg_int(delta),
        )
        .await?
        .into_int()
    }

    pub async fn hexists(&self, key: &str, field: &str) -> Result<bool> {
        self.dispatch(Command::new("HEXISTS").arg(self.key(key)).arg(field))
            .await?
            .into_bool()
    }

    pub async fn hlen(&self, key: &str) -> Result<u64> {
        self.dispatch(Command::new("HLEN").arg(self.key(key)))
            .await?
            .into_count()
    }
}
