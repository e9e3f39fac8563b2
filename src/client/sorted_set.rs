//! Sorted set accessors
//!
//! Scores cross this boundary as integers. A fractional score written by
//! some other client surfaces as `TypeMismatch` on read.

use super::Cacher;
use crate::codec::decode_score;
use crate::error::{CacheError, Result};
use crate::executor::Command;

impl Cacher {
    /// Adds a member or updates its score. Returns 1 if the member is new.
    pub async fn zadd(&self, key: &str, score: i64, member: &str) -> Result<u64> {
        self.dispatch(
            Command::new("ZADD")
                .arg(self.key(key))
                .arg_int(score)
                .arg(member),
        )
        .await?
        .into_count()
    }

    pub async fn zscore(&self, key: &str, member: &str) -> Result<i64> {
        let bytes = self
            .dispatch(Command::new("ZSCORE").arg(self.key(key)).arg(member))
            .await?
            .into_bytes(&format!("{}.{}", key, member))?;
        decode_score(&bytes)
    }

    /// Adds `delta` to a member's score, creating the member at 0 first if
    /// needed. Returns the new score.
    pub async fn zincr_by(&self, key: &str, member: &str, delta: i64) -> Result<i64> {
        let bytes = self
            .dispatch(
                Command::new("ZINCRBY")
                    .arg(self.key(key))
                    .arg_int(delta)
                    .arg(member),
            )
            .await?
            .into_bytes(key)?;
        decode_score(&bytes)
    }

    /// Number of members, 0 when the set does not exist.
    pub async fn zcard(&self, key: &str) -> Result<u64> {
        self.dispatch(Command::new("ZCARD").arg(self.key(key)))
            .await?
            .into_count()
    }

    pub async fn zrem<M: AsRef<str>>(&self, key: &str, members: &[M]) -> Result<u64> {
        if members.is_empty() {
            return Ok(0);
        }
        let command = Command::new("ZREM")
            .arg(self.key(key))
            .args(members.iter().map(|m| m.as_ref()));
        self.dispatch(command).await?.into_count()
    }

    /// Position in ascending score order, `None` if absent.
    pub async fn zrank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        self.rank("ZRANK", key, member).await
    }

    /// Position in descending score order, `None` if absent.
    pub async fn zrev_rank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        self.rank("ZREVRANK", key, member).await
    }

    /// Members between two ranks, inclusive. Negative ranks count from the
    /// end.
    pub async fn zrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        self.range("ZRANGE", key, start, stop).await
    }

    pub async fn zrev_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        self.range("ZREVRANGE", key, start, stop).await
    }

    pub async fn zrange_with_scores(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<(String, i64)>> {
        let pairs = self
            .dispatch(
                Command::new("ZRANGE")
                    .arg(self.key(key))
                    .arg_int(start)
                    .arg_int(stop)
                    .arg("WITHSCORES"),
            )
            .await?
            .into_pairs()?;
        pairs
            .into_iter()
            .map(|(member, score)| Ok((member, decode_score(&score)?)))
            .collect()
    }

    /// Members whose score lies in `[min, max]`, ascending.
    pub async fn zrange_by_score(&self, key: &str, min: i64, max: i64) -> Result<Vec<String>> {
        self.dispatch(
            Command::new("ZRANGEBYSCORE")
                .arg(self.key(key))
                .arg_int(min)
                .arg_int(max),
        )
        .await?
        .into_strings()
    }

    async fn rank(&self, name: &'static str, key: &str, member: &str) -> Result<Option<u64>> {
        let rank = self
            .dispatch(Command::new(name).arg(self.key(key)).arg(member))
            .await?
            .into_optional_int()?;
        rank.map(|r| {
            u64::try_from(r).map_err(|_| CacheError::TypeMismatch(format!("negative rank {}", r)))
        })
        .transpose()
    }

    async fn range(&self, name: &'static str, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        self.dispatch(
            Command::new(name)
                .arg(self.key(key))
                .arg_int(start)
                .arg_int(stop),
        )
        .await?
        .into_strings()
    }
}
