//! Raw Replies
//!
//! The untyped reply shapes a store can produce, and their translation into
//! typed results or [`CacheError`]s.

use crate::codec::{decode_int, decode_string};
use crate::error::{CacheError, Result};

// == Reply ==
/// A raw store reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Absent value
    Nil,
    /// Integer reply
    Int(i64),
    /// Binary-safe string
    Bulk(Vec<u8>),
    /// Ordered sequence of replies
    Array(Vec<Reply>),
    /// Status line such as `OK` or `PONG`
    Status(String),
    /// Error line sent by the store, e.g. `WRONGTYPE ...`
    Error(String),
}

impl Reply {
    /// Shorthand for the `OK` status.
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    /// Shorthand for a bulk reply.
    pub fn bulk(bytes: impl Into<Vec<u8>>) -> Self {
        Reply::Bulk(bytes.into())
    }

    /// Short name of the reply shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Nil => "nil",
            Reply::Int(_) => "integer",
            Reply::Bulk(_) => "bulk",
            Reply::Array(_) => "array",
            Reply::Status(_) => "status",
            Reply::Error(_) => "error",
        }
    }

    // == Translation ==
    /// Turns an error reply into a `CacheError`, passing anything else through.
    pub fn into_result(self) -> Result<Reply> {
        match self {
            Reply::Error(message) => Err(CacheError::from_server(&message)),
            other => Ok(other),
        }
    }

    /// Expects bytes; nil means `key` is absent.
    pub fn into_bytes(self, key: &str) -> Result<Vec<u8>> {
        match self.into_optional_bytes()? {
            Some(bytes) => Ok(bytes),
            None => Err(CacheError::KeyNotFound(key.to_string())),
        }
    }

    /// Expects bytes or nil.
    pub fn into_optional_bytes(self) -> Result<Option<Vec<u8>>> {
        match self {
            Reply::Nil => Ok(None),
            Reply::Bulk(bytes) => Ok(Some(bytes)),
            Reply::Status(status) => Ok(Some(status.into_bytes())),
            Reply::Int(n) => Ok(Some(n.to_string().into_bytes())),
            other => Err(other.unexpected("bytes")),
        }
    }

    /// Expects an integer, or a bulk string holding one.
    pub fn into_int(self) -> Result<i64> {
        match self {
            Reply::Int(n) => Ok(n),
            Reply::Bulk(bytes) => decode_int(&bytes),
            other => Err(other.unexpected("integer")),
        }
    }

    /// Expects an integer or nil.
    pub fn into_optional_int(self) -> Result<Option<i64>> {
        match self {
            Reply::Nil => Ok(None),
            other => other.into_int().map(Some),
        }
    }

    /// Expects a non-negative integer.
    pub fn into_count(self) -> Result<u64> {
        let n = self.into_int()?;
        u64::try_from(n)
            .map_err(|_| CacheError::TypeMismatch(format!("expected a count, got {}", n)))
    }

    /// Expects `1` or `0`.
    pub fn into_bool(self) -> Result<bool> {
        match self.into_int()? {
            1 => Ok(true),
            0 => Ok(false),
            n => Err(CacheError::TypeMismatch(format!(
                "expected 0 or 1, got {}",
                n
            ))),
        }
    }

    /// Expects a status line.
    pub fn into_status(self) -> Result<String> {
        match self {
            Reply::Status(status) => Ok(status),
            Reply::Bulk(bytes) => decode_string(bytes),
            other => Err(other.unexpected("status")),
        }
    }

    /// Expects an array; nil is treated as empty.
    pub fn into_array(self) -> Result<Vec<Reply>> {
        match self {
            Reply::Array(items) => Ok(items),
            Reply::Nil => Ok(Vec::new()),
            other => Err(other.unexpected("array")),
        }
    }

    /// Expects an array of bulk strings.
    pub fn into_byte_list(self) -> Result<Vec<Vec<u8>>> {
        self.into_array()?
            .into_iter()
            .map(|item| match item {
                Reply::Bulk(bytes) => Ok(bytes),
                other => Err(other.unexpected("bulk")),
            })
            .collect()
    }

    /// Expects an array of UTF-8 strings.
    pub fn into_strings(self) -> Result<Vec<String>> {
        self.into_byte_list()?
            .into_iter()
            .map(decode_string)
            .collect()
    }

    /// Expects a flat array of alternating names and values.
    pub fn into_pairs(self) -> Result<Vec<(String, Vec<u8>)>> {
        let items = self.into_byte_list()?;
        if items.len() % 2 != 0 {
            return Err(CacheError::TypeMismatch(
                "expected an even number of elements".to_string(),
            ));
        }

        let mut pairs = Vec::with_capacity(items.len() / 2);
        let mut iter = items.into_iter();
        while let (Some(name), Some(value)) = (iter.next(), iter.next()) {
            pairs.push((decode_string(name)?, value));
        }
        Ok(pairs)
    }

    fn unexpected(self, expected: &str) -> CacheError {
        match self {
            Reply::Error(message) => CacheError::from_server(&message),
            other => CacheError::TypeMismatch(format!(
                "expected {} reply, got {}",
                expected,
                other.kind()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result_translates_errors() {
        let reply = Reply::Error("WRONGTYPE Operation against a key".to_string());
        assert!(matches!(reply.into_result(), Err(CacheError::TypeMismatch(_))));
        assert_eq!(Reply::Int(1).into_result().unwrap(), Reply::Int(1));
    }

    #[test]
    fn test_into_bytes_nil_is_not_found() {
        let result = Reply::Nil.into_bytes("name");
        match result {
            Err(CacheError::KeyNotFound(key)) => assert_eq!(key, "name"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_into_int_accepts_bulk() {
        assert_eq!(Reply::Int(7).into_int().unwrap(), 7);
        assert_eq!(Reply::bulk("23").into_int().unwrap(), 23);
        assert!(matches!(
            Reply::bulk("corel").into_int(),
            Err(CacheError::TypeMismatch(_))
        ));
        assert!(matches!(Reply::Nil.into_int(), Err(CacheError::TypeMismatch(_))));
    }

    #[test]
    fn test_into_count_rejects_negative() {
        assert_eq!(Reply::Int(3).into_count().unwrap(), 3);
        assert!(Reply::Int(-2).into_count().is_err());
    }

    #[test]
    fn test_into_bool() {
        assert!(Reply::Int(1).into_bool().unwrap());
        assert!(!Reply::Int(0).into_bool().unwrap());
        assert!(Reply::Int(2).into_bool().is_err());
    }

    #[test]
    fn test_into_strings() {
        let reply = Reply::Array(vec![Reply::bulk("field1"), Reply::bulk("field2")]);
        assert_eq!(reply.into_strings().unwrap(), vec!["field1", "field2"]);
        assert!(Reply::Nil.into_strings().unwrap().is_empty());
    }

    #[test]
    fn test_into_pairs() {
        let reply = Reply::Array(vec![
            Reply::bulk("name"),
            Reply::bulk("corel"),
            Reply::bulk("age"),
            Reply::bulk("23"),
        ]);
        let pairs = reply.into_pairs().unwrap();
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), b"corel".to_vec()),
                ("age".to_string(), b"23".to_vec())
            ]
        );

        let odd = Reply::Array(vec![Reply::bulk("name")]);
        assert!(odd.into_pairs().is_err());
    }

    #[test]
    fn test_error_inside_shape_check() {
        let reply = Reply::Error("ERR value is not an integer or out of range".to_string());
        assert!(matches!(reply.into_int(), Err(CacheError::TypeMismatch(_))));
    }
}
