//! Redis Cacher - A typed caching client for Redis-compatible stores
//!
//! Namespaced keys, scalar and structured values, counters, hashes, sorted
//! sets and lists, with one error type covering absence, type conflicts,
//! decoding failures and transport failures.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod tasks;

pub use client::{Cacher, KeyType, Namespacer};
pub use codec::{Codec, Format, Object, ToStore};
pub use config::{Network, Options};
pub use error::{CacheError, Result, TransportError};
pub use executor::{Command, Executor, MemoryExecutor, RedisExecutor, Reply};
pub use tasks::spawn_expiry_task;
