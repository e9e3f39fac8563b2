//! Key Namespacing
//!
//! Maps logical keys to wire keys and back, and names the value types a key
//! can hold.

use std::fmt;
use std::str::FromStr;

use crate::error::CacheError;

// == Namespacer ==
/// Prefixes logical keys so applications sharing one store do not collide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespacer {
    prefix: String,
}

impl Namespacer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `prefix + logical_key`.
    pub fn namespace(&self, key: &str) -> String {
        let mut wire = String::with_capacity(self.prefix.len() + key.len());
        wire.push_str(&self.prefix);
        wire.push_str(key);
        wire
    }

    /// Strips the prefix from a wire key. `None` if the key is not ours.
    pub fn denamespace<'a>(&self, wire: &'a str) -> Option<&'a str> {
        wire.strip_prefix(self.prefix.as_str())
    }

    /// Namespaces a glob pattern. Glob metacharacters in the prefix are
    /// escaped so they only ever match themselves.
    pub fn namespace_pattern(&self, pattern: &str) -> String {
        let mut wire = String::with_capacity(self.prefix.len() * 2 + pattern.len());
        for ch in self.prefix.chars() {
            if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
                wire.push('\\');
            }
            wire.push(ch);
        }
        wire.push_str(pattern);
        wire
    }
}

// == Key Type ==
/// Category of the value stored under a key, as reported by `TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    String,
    List,
    Hash,
    ZSet,
    Set,
    Stream,
    /// The key does not exist
    None,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::String => "string",
            KeyType::List => "list",
            KeyType::Hash => "hash",
            KeyType::ZSet => "zset",
            KeyType::Set => "set",
            KeyType::Stream => "stream",
            KeyType::None => "none",
        }
    }

    /// Returns true when the key exists.
    pub fn exists(&self) -> bool {
        *self != KeyType::None
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(KeyType::String),
            "list" => Ok(KeyType::List),
            "hash" => Ok(KeyType::Hash),
            "zset" => Ok(KeyType::ZSet),
            "set" => Ok(KeyType::Set),
            "stream" => Ok(KeyType::Stream),
            "none" => Ok(KeyType::None),
            other => Err(CacheError::TypeMismatch(format!(
                "unknown key type '{}'",
                other
            ))),
        }
    }
}

impl PartialEq<&str> for KeyType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_roundtrip() {
        let ns = Namespacer::new("zengate_");
        let wire = ns.namespace("user");
        assert_eq!(wire, "zengate_user");
        assert_eq!(ns.denamespace(&wire), Some("user"));
    }

    #[test]
    fn test_denamespace_foreign_key() {
        let ns = Namespacer::new("zengate_");
        assert_eq!(ns.denamespace("other_user"), None);
    }

    #[test]
    fn test_empty_prefix_is_identity() {
        let ns = Namespacer::default();
        assert_eq!(ns.namespace("user"), "user");
        assert_eq!(ns.denamespace("user"), Some("user"));
    }

    #[test]
    fn test_namespace_pattern_escapes_prefix() {
        let ns = Namespacer::new("app[1]*");
        assert_eq!(ns.namespace_pattern("user_*"), "app\\[1\\]\\*user_*");

        let plain = Namespacer::new("zengate_");
        assert_eq!(plain.namespace_pattern("*"), "zengate_*");
    }

    #[test]
    fn test_key_type_parse_and_display() {
        for name in ["string", "list", "hash", "zset", "set", "stream", "none"] {
            let key_type: KeyType = name.parse().unwrap();
            assert_eq!(key_type.to_string(), name);
            assert_eq!(key_type, name);
        }
        assert!(!KeyType::None.exists());
        assert!(KeyType::Hash.exists());
        assert!(matches!(
            "vectorset".parse::<KeyType>(),
            Err(CacheError::TypeMismatch(_))
        ));
    }
}
