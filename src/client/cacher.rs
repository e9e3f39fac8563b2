//! Cacher
//!
//! The typed accessor surface. Every call namespaces its key, encodes values
//! on the way in, issues one command and decodes the reply on the way out.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::keys::{KeyType, Namespacer};
use crate::codec::{decode_bool, decode_float, decode_int, decode_string, Codec, Object, ToStore};
use crate::config::Options;
use crate::error::{CacheError, Result};
use crate::executor::{Command, Executor, MemoryExecutor, RedisExecutor, Reply};

// == Cacher ==
/// Typed caching client.
///
/// Holds only immutable configuration and a shared executor; clone it
/// freely and use it from any number of tasks.
#[derive(Clone)]
pub struct Cacher {
    namespacer: Namespacer,
    codec: Codec,
    executor: Arc<dyn Executor>,
}

impl fmt::Debug for Cacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cacher")
            .field("namespacer", &self.namespacer)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl Cacher {
    // == Constructors ==
    /// Connects to the store described by `options`.
    pub async fn connect(options: &Options) -> Result<Self> {
        let executor = RedisExecutor::connect(options).await?;
        Ok(Self::with_executor(options, Arc::new(executor)))
    }

    /// Creates a client over a fresh in-process keyspace.
    pub fn in_memory(options: &Options) -> Self {
        Self::with_executor(options, Arc::new(MemoryExecutor::new()))
    }

    /// Creates a client over any executor.
    pub fn with_executor(options: &Options, executor: Arc<dyn Executor>) -> Self {
        info!(
            "Cacher ready: prefix='{}', format={}",
            options.prefix, options.format
        );
        Self {
            namespacer: Namespacer::new(options.prefix.clone()),
            codec: Codec::new(options.format),
            executor,
        }
    }

    pub fn namespacer(&self) -> &Namespacer {
        &self.namespacer
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    // == Plumbing ==
    pub(crate) fn key(&self, key: &str) -> String {
        self.namespacer.namespace(key)
    }

    pub(crate) fn encode<V: ToStore>(&self, value: V) -> Result<Vec<u8>> {
        value.to_store(&self.codec)
    }

    /// Sends one command and turns error replies into `CacheError`s.
    pub(crate) async fn dispatch(&self, command: Command) -> Result<Reply> {
        debug!(
            "Dispatching {} with {} args",
            command.name(),
            command.arguments().len()
        );
        let reply = self.executor.execute(command).await?;
        reply.into_result()
    }

    // == Scalars ==
    /// Stores a value, overwriting any previous one. `ttl` is in seconds,
    /// 0 means no expiration.
    pub async fn set<V: ToStore>(&self, key: &str, value: V, ttl: u64) -> Result<()> {
        let mut command = Command::new("SET")
            .arg(self.key(key))
            .arg(self.encode(value)?);
        if ttl > 0 {
            command = command.arg("EX").arg(ttl.to_string());
        }
        self.dispatch(command).await?;
        Ok(())
    }

    /// Stores a structured value.
    pub async fn set_object<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: u64,
    ) -> Result<()> {
        self.set(key, Object(value), ttl).await
    }

    /// Reads the raw bytes stored at `key`.
    pub async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.dispatch(Command::new("GET").arg(self.key(key)))
            .await?
            .into_bytes(key)
    }

    pub async fn get_string(&self, key: &str) -> Result<String> {
        decode_string(self.get(key).await?)
    }

    pub async fn get_int(&self, key: &str) -> Result<i64> {
        decode_int(&self.get(key).await?)
    }

    pub async fn get_float(&self, key: &str) -> Result<f64> {
        decode_float(&self.get(key).await?)
    }

    pub async fn get_bool(&self, key: &str) -> Result<bool> {
        decode_bool(&self.get(key).await?)
    }

    /// Reads and deserializes a structured value.
    pub async fn get_object<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let bytes = self.get(key).await?;
        self.codec.decode_object(&bytes)
    }

    /// Like [`get_object`](Self::get_object), but writes into `target`.
    /// `target` is left untouched on any error.
    pub async fn get_object_into<T: DeserializeOwned>(&self, key: &str, target: &mut T) -> Result<()> {
        *target = self.get_object(key).await?;
        Ok(())
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        let found = self
            .dispatch(Command::new("EXISTS").arg(self.key(key)))
            .await?
            .into_count()?;
        Ok(found > 0)
    }

    // == Counters ==
    // One command each: the store applies the delta atomically.

    pub async fn incr(&self, key: &str) -> Result<i64> {
        self.dispatch(Command::new("INCR").arg(self.key(key)))
            .await?
            .into_int()
    }

    pub async fn decr(&self, key: &str) -> Result<i64> {
        self.dispatch(Command::new("DECR").arg(self.key(key)))
            .await?
            .into_int()
    }

    pub async fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        self.dispatch(Command::new("INCRBY").arg(self.key(key)).arg_int(delta))
            .await?
            .into_int()
    }

    pub async fn decr_by(&self, key: &str, delta: i64) -> Result<i64> {
        self.dispatch(Command::new("DECRBY").arg(self.key(key)).arg_int(delta))
            .await?
            .into_int()
    }

    // == Key Lifecycle ==
    /// Deletes keys and returns how many existed. Absent keys are not an
    /// error.
    pub async fn del<K: AsRef<str>>(&self, keys: &[K]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let command = Command::new("DEL").args(keys.iter().map(|k| self.key(k.as_ref())));
        self.dispatch(command).await?.into_count()
    }

    /// Sets or resets the TTL of an existing key. Returns false, not an
    /// error, when the key is absent.
    ///
    /// A `ttl` of 0 means no expiration, as in [`set`](Self::set): any TTL
    /// is removed and the key kept. The result is then that of
    /// [`persist`](Self::persist).
    pub async fn expire(&self, key: &str, ttl: u64) -> Result<bool> {
        if ttl == 0 {
            return self.persist(key).await;
        }
        self.dispatch(
            Command::new("EXPIRE")
                .arg(self.key(key))
                .arg(ttl.to_string()),
        )
        .await?
        .into_bool()
    }

    /// Remaining TTL in seconds, `None` for keys that never expire.
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>> {
        let ttl = self
            .dispatch(Command::new("TTL").arg(self.key(key)))
            .await?
            .into_int()?;
        match ttl {
            -2 => Err(CacheError::KeyNotFound(key.to_string())),
            -1 => Ok(None),
            secs => Ok(Some(secs)),
        }
    }

    /// Removes the TTL. Returns true if one was removed.
    pub async fn persist(&self, key: &str) -> Result<bool> {
        self.dispatch(Command::new("PERSIST").arg(self.key(key)))
            .await?
            .into_bool()
    }

    /// Reports what kind of value `key` holds; absence is `KeyType::None`.
    pub async fn key_type(&self, key: &str) -> Result<KeyType> {
        self.dispatch(Command::new("TYPE").arg(self.key(key)))
            .await?
            .into_status()?
            .parse()
    }

    /// Logical keys matching a glob pattern within this client's namespace.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let wire_keys = self
            .dispatch(Command::new("KEYS").arg(self.namespacer.namespace_pattern(pattern)))
            .await?
            .into_strings()?;
        Ok(wire_keys
            .iter()
            .filter_map(|wire| self.namespacer.denamespace(wire))
            .map(str::to_string)
            .collect())
    }

    /// Round-trips a `PING`.
    pub async fn ping(&self) -> Result<()> {
        self.dispatch(Command::new("PING")).await?.into_status()?;
        Ok(())
    }
}
