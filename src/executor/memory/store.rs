//! Memory Store Module
//!
//! Keyspace engine holding strings, lists, hashes and sorted sets with lazy
//! TTL expiration. Error variants render as the store's own error lines.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use super::entry::{deadline_after, CacheEntry, HashValue, SortedSetValue, StoredValue};
use super::pattern::glob_match;

// == Store Error ==
/// Errors raised while executing a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("ERR value is not an integer or out of range")]
    NotInteger,

    #[error("ERR hash value is not an integer")]
    HashNotInteger,

    #[error("ERR value is not a valid float")]
    NotFloat,

    #[error("ERR min or max is not a float")]
    InvalidScoreRange,

    #[error("ERR increment or decrement would overflow")]
    Overflow,

    #[error("ERR invalid expire time in '{0}' command")]
    InvalidExpire(String),

    #[error("ERR syntax error")]
    Syntax,

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),

    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),
}

/// Convenience Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// == Score Bound ==
/// One end of a score interval, as accepted by `ZRANGEBYSCORE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBound {
    pub value: f64,
    pub exclusive: bool,
}

impl ScoreBound {
    /// Parses `-inf`, `+inf`, `5` or `(5`.
    pub fn parse(raw: &[u8]) -> StoreResult<Self> {
        let (exclusive, number) = match raw.split_first() {
            Some((b'(', rest)) => (true, rest),
            _ => (false, raw),
        };
        let value = parse_f64(number).ok_or(StoreError::InvalidScoreRange)?;
        Ok(Self { value, exclusive })
    }

    fn admits_from_below(&self, score: f64) -> bool {
        if self.exclusive {
            score > self.value
        } else {
            score >= self.value
        }
    }

    fn admits_from_above(&self, score: f64) -> bool {
        if self.exclusive {
            score < self.value
        } else {
            score <= self.value
        }
    }
}

// == Memory Store ==
/// In-memory keyspace.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key-value storage
    entries: HashMap<Vec<u8>, CacheEntry>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Lookup ==
    /// Returns the live entry for `key`, dropping it first if it has expired.
    fn lookup(&mut self, key: &[u8]) -> Option<&mut CacheEntry> {
        if self.entries.get(key).is_some_and(CacheEntry::is_expired) {
            self.entries.remove(key);
        }
        self.entries.get_mut(key)
    }

    /// Returns the live entry for `key`, creating it from `init` if absent.
    fn lookup_or_insert(&mut self, key: &[u8], init: fn() -> StoredValue) -> &mut CacheEntry {
        if self.entries.get(key).is_some_and(CacheEntry::is_expired) {
            self.entries.remove(key);
        }
        self.entries
            .entry(key.to_vec())
            .or_insert_with(|| CacheEntry::new(init(), None))
    }

    /// Collections never linger empty.
    fn drop_if_empty(&mut self, key: &[u8]) {
        if self
            .entries
            .get(key)
            .is_some_and(|entry| entry.value.is_empty_collection())
        {
            self.entries.remove(key);
        }
    }

    fn hash(&mut self, key: &[u8]) -> StoreResult<Option<&mut HashValue>> {
        match self.lookup(key) {
            None => Ok(None),
            Some(CacheEntry {
                value: StoredValue::Hash(hash),
                ..
            }) => Ok(Some(hash)),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    fn hash_or_create(&mut self, key: &[u8]) -> StoreResult<&mut HashValue> {
        match self.lookup_or_insert(key, || StoredValue::Hash(Vec::new())) {
            CacheEntry {
                value: StoredValue::Hash(hash),
                ..
            } => Ok(hash),
            _ => Err(StoreError::WrongType),
        }
    }

    fn zset(&mut self, key: &[u8]) -> StoreResult<Option<&mut SortedSetValue>> {
        match self.lookup(key) {
            None => Ok(None),
            Some(CacheEntry {
                value: StoredValue::ZSet(zset),
                ..
            }) => Ok(Some(zset)),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    fn zset_or_create(&mut self, key: &[u8]) -> StoreResult<&mut SortedSetValue> {
        match self.lookup_or_insert(key, || StoredValue::ZSet(Vec::new())) {
            CacheEntry {
                value: StoredValue::ZSet(zset),
                ..
            } => Ok(zset),
            _ => Err(StoreError::WrongType),
        }
    }

    fn list(&mut self, key: &[u8]) -> StoreResult<Option<&mut VecDeque<Vec<u8>>>> {
        match self.lookup(key) {
            None => Ok(None),
            Some(CacheEntry {
                value: StoredValue::List(list),
                ..
            }) => Ok(Some(list)),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    fn list_or_create(&mut self, key: &[u8]) -> StoreResult<&mut VecDeque<Vec<u8>>> {
        match self.lookup_or_insert(key, || StoredValue::List(VecDeque::new())) {
            CacheEntry {
                value: StoredValue::List(list),
                ..
            } => Ok(list),
            _ => Err(StoreError::WrongType),
        }
    }

    // == Strings ==
    /// Stores a string, replacing any previous value and TTL.
    ///
    /// Fails with `InvalidExpire` when the TTL overflows the clock; the
    /// previous value is left untouched.
    pub fn set(&mut self, key: &[u8], value: Vec<u8>, ttl: Option<u64>) -> StoreResult<()> {
        let expires_at = match ttl {
            Some(seconds) => Some(checked_deadline(seconds, "set")?),
            None => None,
        };
        self.entries
            .insert(key.to_vec(), CacheEntry::new(StoredValue::Str(value), expires_at));
        Ok(())
    }

    /// Reads a string value.
    pub fn get(&mut self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        match self.lookup(key) {
            None => Ok(None),
            Some(CacheEntry {
                value: StoredValue::Str(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    /// Adds `delta` to the integer at `key`, starting from 0. Keeps the TTL.
    pub fn incr_by(&mut self, key: &[u8], delta: i64) -> StoreResult<i64> {
        let entry = self.lookup_or_insert(key, || StoredValue::Str(b"0".to_vec()));
        let StoredValue::Str(bytes) = &mut entry.value else {
            return Err(StoreError::WrongType);
        };
        let current = parse_i64(bytes).ok_or(StoreError::NotInteger)?;
        let next = current.checked_add(delta).ok_or(StoreError::Overflow)?;
        *bytes = next.to_string().into_bytes();
        Ok(next)
    }

    // == Key Lifecycle ==
    /// Removes a key. Returns true if it existed.
    pub fn delete(&mut self, key: &[u8]) -> bool {
        if self.lookup(key).is_none() {
            return false;
        }
        self.entries.remove(key).is_some()
    }

    /// Checks whether a live key exists.
    pub fn exists(&mut self, key: &[u8]) -> bool {
        self.lookup(key).is_some()
    }

    /// Sets a TTL. A non-positive TTL deletes the key, as the store does.
    pub fn expire(&mut self, key: &[u8], seconds: i64) -> StoreResult<bool> {
        if seconds <= 0 {
            return Ok(self.delete(key));
        }
        let deadline = checked_deadline(seconds as u64, "expire")?;
        match self.lookup(key) {
            Some(entry) => {
                entry.expire_at(deadline);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remaining TTL: -2 for absent keys, -1 for keys without expiry.
    pub fn ttl(&mut self, key: &[u8]) -> i64 {
        match self.lookup(key) {
            None => -2,
            Some(entry) => entry.ttl_remaining().map_or(-1, |secs| secs as i64),
        }
    }

    /// Removes the TTL. Returns true if one was removed.
    pub fn persist(&mut self, key: &[u8]) -> bool {
        self.lookup(key).is_some_and(CacheEntry::persist)
    }

    /// Type name of the value at `key`, or `none`.
    pub fn key_type(&mut self, key: &[u8]) -> &'static str {
        self.lookup(key)
            .map_or("none", |entry| entry.value.type_name())
    }

    /// Live keys matching a glob pattern, sorted.
    pub fn keys(&mut self, pattern: &[u8]) -> Vec<Vec<u8>> {
        self.cleanup_expired();
        let mut keys: Vec<Vec<u8>> = self
            .entries
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    // == Hashes ==
    /// Writes fields. Returns how many fields were new.
    pub fn hset(&mut self, key: &[u8], pairs: Vec<(Vec<u8>, Vec<u8>)>) -> StoreResult<i64> {
        let hash = self.hash_or_create(key)?;
        let mut added = 0;
        for (field, value) in pairs {
            match hash.iter_mut().find(|(f, _)| *f == field) {
                Some((_, existing)) => *existing = value,
                None => {
                    hash.push((field, value));
                    added += 1;
                }
            }
        }
        Ok(added)
    }

    pub fn hget(&mut self, key: &[u8], field: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.hash(key)?.and_then(|hash| {
            hash.iter()
                .find(|(f, _)| f.as_slice() == field)
                .map(|(_, v)| v.clone())
        }))
    }

    pub fn hget_all(&mut self, key: &[u8]) -> StoreResult<HashValue> {
        Ok(self.hash(key)?.map(|hash| hash.clone()).unwrap_or_default())
    }

    pub fn hkeys(&mut self, key: &[u8]) -> StoreResult<Vec<Vec<u8>>> {
        Ok(self
            .hash(key)?
            .map(|hash| hash.iter().map(|(f, _)| f.clone()).collect())
            .unwrap_or_default())
    }

    pub fn hdel(&mut self, key: &[u8], fields: &[Vec<u8>]) -> StoreResult<i64> {
        let Some(hash) = self.hash(key)? else {
            return Ok(0);
        };
        let before = hash.len();
        hash.retain(|(f, _)| !fields.contains(f));
        let removed = (before - hash.len()) as i64;
        self.drop_if_empty(key);
        Ok(removed)
    }

    /// Adds `delta` to an integer field, starting from 0.
    pub fn hincr_by(&mut self, key: &[u8], field: &[u8], delta: i64) -> StoreResult<i64> {
        let hash = self.hash_or_create(key)?;
        let index = match hash.iter().position(|(f, _)| f.as_slice() == field) {
            Some(index) => index,
            None => {
                hash.push((field.to_vec(), b"0".to_vec()));
                hash.len() - 1
            }
        };
        let slot = &mut hash[index].1;
        let current = parse_i64(slot).ok_or(StoreError::HashNotInteger)?;
        let next = current.checked_add(delta).ok_or(StoreError::Overflow)?;
        *slot = next.to_string().into_bytes();
        Ok(next)
    }

    pub fn hexists(&mut self, key: &[u8], field: &[u8]) -> StoreResult<bool> {
        Ok(self
            .hash(key)?
            .is_some_and(|hash| hash.iter().any(|(f, _)| f.as_slice() == field)))
    }

    pub fn hlen(&mut self, key: &[u8]) -> StoreResult<i64> {
        Ok(self.hash(key)?.map_or(0, |hash| hash.len() as i64))
    }

    // == Sorted Sets ==
    /// Adds or rescoring members. Returns how many members were new.
    pub fn zadd(&mut self, key: &[u8], pairs: Vec<(f64, Vec<u8>)>) -> StoreResult<i64> {
        let zset = self.zset_or_create(key)?;
        let mut added = 0;
        for (score, member) in pairs {
            match zset.iter_mut().find(|(m, _)| *m == member) {
                Some((_, existing)) => *existing = score,
                None => {
                    zset.push((member, score));
                    added += 1;
                }
            }
        }
        sort_zset(zset);
        Ok(added)
    }

    pub fn zscore(&mut self, key: &[u8], member: &[u8]) -> StoreResult<Option<f64>> {
        Ok(self.zset(key)?.and_then(|zset| {
            zset.iter()
                .find(|(m, _)| m.as_slice() == member)
                .map(|(_, score)| *score)
        }))
    }

    /// Adds `delta` to a member's score, starting from 0.
    pub fn zincr_by(&mut self, key: &[u8], member: &[u8], delta: f64) -> StoreResult<f64> {
        let zset = self.zset_or_create(key)?;
        let score = match zset.iter_mut().find(|(m, _)| m.as_slice() == member) {
            Some((_, score)) => {
                *score += delta;
                *score
            }
            None => {
                zset.push((member.to_vec(), delta));
                delta
            }
        };
        sort_zset(zset);
        Ok(score)
    }

    pub fn zcard(&mut self, key: &[u8]) -> StoreResult<i64> {
        Ok(self.zset(key)?.map_or(0, |zset| zset.len() as i64))
    }

    pub fn zrem(&mut self, key: &[u8], members: &[Vec<u8>]) -> StoreResult<i64> {
        let Some(zset) = self.zset(key)? else {
            return Ok(0);
        };
        let before = zset.len();
        zset.retain(|(m, _)| !members.contains(m));
        let removed = (before - zset.len()) as i64;
        self.drop_if_empty(key);
        Ok(removed)
    }

    /// Zero-based rank, ascending or descending by score.
    pub fn zrank(&mut self, key: &[u8], member: &[u8], reverse: bool) -> StoreResult<Option<usize>> {
        let Some(zset) = self.zset(key)? else {
            return Ok(None);
        };
        let len = zset.len();
        Ok(zset
            .iter()
            .position(|(m, _)| m.as_slice() == member)
            .map(|rank| if reverse { len - 1 - rank } else { rank }))
    }

    /// Members by rank with the store's negative-index semantics.
    pub fn zrange(
        &mut self,
        key: &[u8],
        start: i64,
        stop: i64,
        reverse: bool,
    ) -> StoreResult<SortedSetValue> {
        let Some(zset) = self.zset(key)? else {
            return Ok(Vec::new());
        };
        let mut members = zset.clone();
        if reverse {
            members.reverse();
        }
        Ok(match normalize_range(start, stop, members.len()) {
            Some((from, to)) => members.drain(from..=to).collect(),
            None => Vec::new(),
        })
    }

    /// Members whose score falls within `[min, max]`, ascending.
    pub fn zrange_by_score(
        &mut self,
        key: &[u8],
        min: ScoreBound,
        max: ScoreBound,
    ) -> StoreResult<SortedSetValue> {
        Ok(self
            .zset(key)?
            .map(|zset| {
                zset.iter()
                    .filter(|(_, score)| {
                        min.admits_from_below(*score) && max.admits_from_above(*score)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    // == Lists ==
    /// Pushes values at the head or the tail. Returns the new length.
    pub fn push(&mut self, key: &[u8], values: Vec<Vec<u8>>, front: bool) -> StoreResult<i64> {
        let list = self.list_or_create(key)?;
        for value in values {
            if front {
                list.push_front(value);
            } else {
                list.push_back(value);
            }
        }
        Ok(list.len() as i64)
    }

    pub fn pop(&mut self, key: &[u8], front: bool) -> StoreResult<Option<Vec<u8>>> {
        let Some(list) = self.list(key)? else {
            return Ok(None);
        };
        let value = if front {
            list.pop_front()
        } else {
            list.pop_back()
        };
        self.drop_if_empty(key);
        Ok(value)
    }

    pub fn lrange(&mut self, key: &[u8], start: i64, stop: i64) -> StoreResult<Vec<Vec<u8>>> {
        let Some(list) = self.list(key)? else {
            return Ok(Vec::new());
        };
        Ok(match normalize_range(start, stop, list.len()) {
            Some((from, to)) => list.range(from..=to).cloned().collect(),
            None => Vec::new(),
        })
    }

    pub fn llen(&mut self, key: &[u8]) -> StoreResult<i64> {
        Ok(self.list(key)?.map_or(0, |list| list.len() as i64))
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until
    /// they are touched or swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Utility Functions ==
fn sort_zset(zset: &mut SortedSetValue) {
    zset.sort_by(|(am, a), (bm, b)| a.total_cmp(b).then_with(|| am.cmp(bm)));
}

/// Deadline for a TTL, or `InvalidExpire` naming `command` on overflow.
fn checked_deadline(seconds: u64, command: &str) -> StoreResult<u64> {
    deadline_after(seconds).ok_or_else(|| StoreError::InvalidExpire(command.to_string()))
}

/// Parses a decimal integer argument or value.
pub fn parse_i64(bytes: &[u8]) -> Option<i64> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

/// Parses a float argument, accepting the store's `inf` spellings.
pub fn parse_f64(bytes: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(bytes).ok()?;
    match text.to_ascii_lowercase().as_str() {
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        _ => text.parse::<f64>().ok().filter(|v| !v.is_nan()),
    }
}

/// Resolves an inclusive `[start, stop]` index pair against a length.
/// Negative indices count from the end.
pub fn normalize_range(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}
