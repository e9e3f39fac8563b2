//! Keyspace Entry Module
//!
//! Defines the structure for individual keyspace entries with TTL support.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

// == Stored Value ==
/// Hash fields in insertion order.
pub type HashValue = Vec<(Vec<u8>, Vec<u8>)>;

/// Sorted-set members, kept ordered by (score, member).
pub type SortedSetValue = Vec<(Vec<u8>, f64)>;

/// The data held under one key.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Str(Vec<u8>),
    List(VecDeque<Vec<u8>>),
    Hash(HashValue),
    ZSet(SortedSetValue),
}

impl StoredValue {
    /// The name `TYPE` reports for this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            StoredValue::Str(_) => "string",
            StoredValue::List(_) => "list",
            StoredValue::Hash(_) => "hash",
            StoredValue::ZSet(_) => "zset",
        }
    }

    /// Returns true for collections with no elements left.
    pub fn is_empty_collection(&self) -> bool {
        match self {
            StoredValue::Str(_) => false,
            StoredValue::List(list) => list.is_empty(),
            StoredValue::Hash(hash) => hash.is_empty(),
            StoredValue::ZSet(zset) => zset.is_empty(),
        }
    }
}

// == Cache Entry ==
/// Represents a single keyspace entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: StoredValue,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry with an optional expiration deadline.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `expires_at` - Absolute deadline in Unix milliseconds, see [`deadline_after`]
    pub fn new(value: StoredValue, expires_at: Option<u64>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Expiration Updates ==
    /// Sets the expiration deadline, replacing any previous one.
    pub fn expire_at(&mut self, deadline_ms: u64) {
        self.expires_at = Some(deadline_ms);
    }

    /// Removes the TTL. Returns true if one was set.
    pub fn persist(&mut self) -> bool {
        self.expires_at.take().is_some()
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }

    /// Returns remaining TTL in whole seconds, rounded up the way the store
    /// reports it, or None if no expiration is set.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.ttl_remaining_ms().map(|ms| ms.div_ceil(1000))
    }
}

// == Utility Functions ==
/// Converts a TTL in seconds into an absolute deadline in Unix milliseconds.
/// Returns None when the deadline does not fit in a `u64`.
pub fn deadline_after(ttl_seconds: u64) -> Option<u64> {
    ttl_seconds
        .checked_mul(1000)?
        .checked_add(current_timestamp_ms())
}

/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
