//! Encodable Values
//!
//! The [`ToStore`] trait turns anything a caller may write into wire bytes.

use serde::Serialize;

use super::{Codec, FALSE_BYTES, TRUE_BYTES};
use crate::error::Result;

// == ToStore Trait ==
/// A value that can be written to the store.
///
/// Scalars encode to their textual form without consulting the codec.
/// Structured values are wrapped in [`Object`] and go through the codec's
/// serde format.
pub trait ToStore {
    /// Encodes the value into wire bytes.
    fn to_store(&self, codec: &Codec) -> Result<Vec<u8>>;
}

impl<T: ToStore + ?Sized> ToStore for &T {
    fn to_store(&self, codec: &Codec) -> Result<Vec<u8>> {
        (**self).to_store(codec)
    }
}

macro_rules! impl_to_store_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToStore for $ty {
                fn to_store(&self, _codec: &Codec) -> Result<Vec<u8>> {
                    Ok(self.to_string().into_bytes())
                }
            }
        )*
    };
}

impl_to_store_display!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl ToStore for bool {
    fn to_store(&self, _codec: &Codec) -> Result<Vec<u8>> {
        let bytes = if *self { TRUE_BYTES } else { FALSE_BYTES };
        Ok(bytes.to_vec())
    }
}

impl ToStore for str {
    fn to_store(&self, _codec: &Codec) -> Result<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }
}

impl ToStore for String {
    fn to_store(&self, _codec: &Codec) -> Result<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }
}

impl ToStore for [u8] {
    fn to_store(&self, _codec: &Codec) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl ToStore for Vec<u8> {
    fn to_store(&self, _codec: &Codec) -> Result<Vec<u8>> {
        Ok(self.clone())
    }
}

/// Dynamically typed values, as used for heterogeneous hash maps.
///
/// Scalars keep their scalar encoding so that `hget_int` and friends can
/// read them back; arrays and objects are encoded as structured values.
impl ToStore for serde_json::Value {
    fn to_store(&self, codec: &Codec) -> Result<Vec<u8>> {
        use serde_json::Value;

        match self {
            Value::Null => Ok(Vec::new()),
            Value::Bool(b) => b.to_store(codec),
            Value::Number(n) => Ok(n.to_string().into_bytes()),
            Value::String(s) => s.to_store(codec),
            Value::Array(_) | Value::Object(_) => codec.encode_object(self),
        }
    }
}

// == Object Wrapper ==
/// Marks a serde value for structured encoding.
///
/// ```ignore
/// cacher.set("user", Object(&user), 30).await?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Object<'a, T: ?Sized>(pub &'a T);

impl<T: Serialize + ?Sized> ToStore for Object<'_, T> {
    fn to_store(&self, codec: &Codec) -> Result<Vec<u8>> {
        codec.encode_object(self.0)
    }
}
