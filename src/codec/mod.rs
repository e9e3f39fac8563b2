//! Value Codec Module
//!
//! Converts typed values to the store's byte representation and back.
//! Scalars use their textual form; structured values go through serde in
//! the configured [`Format`].

mod value;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

pub use value::{Object, ToStore};

// == Boolean Encoding ==
/// Encoded form of `true`
pub const TRUE_BYTES: &[u8] = b"1";

/// Encoded form of `false`
pub const FALSE_BYTES: &[u8] = b"0";

// == Format ==
/// Self-describing serialization format used for structured values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// MessagePack with named fields
    #[default]
    MsgPack,
    /// JSON
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::MsgPack => write!(f, "msgpack"),
            Format::Json => write!(f, "json"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "msgpack" | "messagepack" | "rmp" => Ok(Format::MsgPack),
            "json" => Ok(Format::Json),
            _ => Err(format!("Unknown value format: {}", s)),
        }
    }
}

// == Codec ==
/// Encoder/decoder for structured values.
///
/// Stateless apart from the chosen format, so it is `Copy` and freely
/// shared between clones of a `Cacher`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    format: Format,
}

impl Codec {
    /// Creates a codec for the given format.
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    /// Returns the structured format in use.
    pub fn format(&self) -> Format {
        self.format
    }

    // == Structured Values ==
    /// Serializes the whole value graph into the configured format.
    pub fn encode_object<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        match self.format {
            Format::MsgPack => rmp_serde::to_vec_named(value)
                .map_err(|e| CacheError::Decode(format!("failed to encode value: {}", e))),
            Format::Json => serde_json::to_vec(value)
                .map_err(|e| CacheError::Decode(format!("failed to encode value: {}", e))),
        }
    }

    /// Deserializes bytes into a fresh `T`.
    ///
    /// Either a complete value is produced or an error is returned.
    pub fn decode_object<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self.format {
            Format::MsgPack => rmp_serde::from_slice(bytes)
                .map_err(|e| CacheError::Decode(format!("failed to decode value: {}", e))),
            Format::Json => serde_json::from_slice(bytes)
                .map_err(|e| CacheError::Decode(format!("failed to decode value: {}", e))),
        }
    }
}

// == Scalar Decoders ==
/// Decodes UTF-8 text.
pub fn decode_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|_| CacheError::TypeMismatch("value is not valid UTF-8".to_string()))
}

/// Decodes a signed 64-bit integer.
pub fn decode_int(bytes: &[u8]) -> Result<i64> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| mismatch(bytes, "an integer"))
}

/// Decodes a 64-bit float.
pub fn decode_float(bytes: &[u8]) -> Result<f64> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| mismatch(bytes, "a float"))
}

/// Decodes a boolean. Only the two canonical forms are accepted.
pub fn decode_bool(bytes: &[u8]) -> Result<bool> {
    match bytes {
        TRUE_BYTES => Ok(true),
        FALSE_BYTES => Ok(false),
        _ => Err(mismatch(bytes, "a boolean")),
    }
}

/// 2^63, the first float past `i64::MAX`. `i64::MAX as f64` rounds up to it.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Decodes a sorted-set score. Scores must be integral.
pub fn decode_score(bytes: &[u8]) -> Result<i64> {
    if let Ok(score) = decode_int(bytes) {
        return Ok(score);
    }
    let score = decode_float(bytes)?;
    if score.is_finite()
        && score.fract() == 0.0
        && score >= i64::MIN as f64
        && score < I64_UPPER_BOUND
    {
        Ok(score as i64)
    } else {
        Err(mismatch(bytes, "an integral score"))
    }
}

fn mismatch(bytes: &[u8], expected: &str) -> CacheError {
    CacheError::TypeMismatch(format!(
        "'{}' is not {}",
        String::from_utf8_lossy(bytes),
        expected
    ))
}
