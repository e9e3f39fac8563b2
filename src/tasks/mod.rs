//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the client.
//!
//! # Tasks
//! - Active expiry: purges expired keys from a `MemoryStore` at a fixed interval

mod expiry;

pub use expiry::spawn_expiry_task;
