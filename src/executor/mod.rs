//! Command Executor Module
//!
//! The seam between the typed client and a store: one command goes in, one
//! raw reply comes out.
//!
//! # Implementations
//! - [`RedisExecutor`] - multiplexed connection to a Redis server
//! - [`MemoryExecutor`] - in-process keyspace with Redis semantics

mod command;
pub mod memory;
mod remote;
mod reply;

use async_trait::async_trait;

use crate::error::TransportError;

pub use command::Command;
pub use memory::MemoryExecutor;
pub use remote::RedisExecutor;
pub use reply::Reply;

// == Executor Trait ==
/// Executes a single command against a store.
///
/// An `Err` means the command never reached the store or its answer was
/// lost. Missing keys and server-side rejections come back as `Ok` replies
/// (`Reply::Nil`, `Reply::Error`) and are interpreted by the caller.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, command: Command) -> Result<Reply, TransportError>;
}
