//! Client Module
//!
//! Typed accessors over an [`Executor`](crate::executor::Executor).
//!
//! # Components
//! - `Cacher` - the client, split by value kind across submodules
//! - `Namespacer` - logical key to wire key mapping
//! - `KeyType` - what `TYPE` reports for a key

mod cacher;
mod hash;
mod keys;
mod list;
mod sorted_set;


pub use cacher::Cacher;
pub use keys::{KeyType, Namespacer};
