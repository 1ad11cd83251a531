//! Typed reads of cell values.
//!
//! [`FromValue`] is the conversion table used by
//! [`SqlStore::fetch_scalar`](crate::SqlStore::fetch_scalar). Each target
//! type lists the cell kinds it accepts; anything else is a type mismatch.
//! `NULL` cells never reach a conversion, they read as `None`.
//!
//! | target | accepted cells |
//! |---|---|
//! | `i64`, `i32`, `u32` | integer (in range), integral float, numeric text, boolean as 0/1 |
//! | `f64` | integer, float, numeric text |
//! | `bool` | boolean, integer 0/1, text `true`/`false` (any case) |
//! | `String` | text, numbers and booleans rendered, UTF-8 binary |
//! | `Vec<u8>` | binary, text bytes |
//! | `Value` | anything |

use confrow_core::Value;

/// A type that can be read out of a single cell.
pub trait FromValue: Sized {
    /// Name used in [`SqlError::TypeMismatch`](crate::SqlError::TypeMismatch).
    const TYPE_NAME: &'static str;

    /// Converts a non-null cell, or returns `None` when the cell's kind or
    /// content is incompatible.
    fn from_value(value: &Value) -> Option<Self>;
}

fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl FromValue for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(*n),
            Value::Float(f) => integral(*f),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    const TYPE_NAME: &'static str = "32-bit integer";

    fn from_value(value: &Value) -> Option<Self> {
        i64::from_value(value).and_then(|n| i32::try_from(n).ok())
    }
}

impl FromValue for u32 {
    const TYPE_NAME: &'static str = "unsigned 32-bit integer";

    fn from_value(value: &Value) -> Option<Self> {
        i64::from_value(value).and_then(|n| u32::try_from(n).ok())
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            Value::Integer(n) => Some(*n as f64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Integer(0) => Some(false),
            Value::Integer(1) => Some(true),
            Value::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "text";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Integer(n) => Some(n.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Binary(bytes) => String::from_utf8(bytes.clone()).ok(),
            _ => None,
        }
    }
}

impl FromValue for Vec<u8> {
    const TYPE_NAME: &'static str = "binary";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Binary(bytes) => Some(bytes.clone()),
            Value::String(s) => Some(s.as_bytes().to_vec()),
            _ => None,
        }
    }
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_targets() {
        assert_eq!(i64::from_value(&Value::from(31)), Some(31));
        assert_eq!(i64::from_value(&Value::Float(4.0)), Some(4));
        assert_eq!(i64::from_value(&Value::Float(4.5)), None);
        assert_eq!(i64::from_value(&Value::from(" 42 ")), Some(42));
        assert_eq!(i64::from_value(&Value::from("thirty")), None);
        assert_eq!(i64::from_value(&Value::Bool(true)), Some(1));
        assert_eq!(i64::from_value(&Value::Float(f64::NAN)), None);
        assert_eq!(i64::from_value(&Value::Float(1e19)), None);

        assert_eq!(i32::from_value(&Value::from(i64::from(i32::MAX) + 1)), None);
        assert_eq!(u32::from_value(&Value::from(-1)), None);
        assert_eq!(u32::from_value(&Value::from(7)), Some(7));
    }

    #[test]
    fn test_float_target() {
        assert_eq!(f64::from_value(&Value::from(3)), Some(3.0));
        assert_eq!(f64::from_value(&Value::from("2.5")), Some(2.5));
        assert_eq!(f64::from_value(&Value::Bool(true)), None);
    }

    #[test]
    fn test_bool_target() {
        assert_eq!(bool::from_value(&Value::from(1)), Some(true));
        assert_eq!(bool::from_value(&Value::from(0)), Some(false));
        assert_eq!(bool::from_value(&Value::from(2)), None);
        assert_eq!(bool::from_value(&Value::from("TRUE")), Some(true));
        assert_eq!(bool::from_value(&Value::from("no")), None);
    }

    #[test]
    fn test_text_and_binary_targets() {
        assert_eq!(String::from_value(&Value::from(5)), Some("5".to_string()));
        assert_eq!(String::from_value(&Value::Bool(false)), Some("false".to_string()));
        assert_eq!(
            String::from_value(&Value::Binary(b"abc".to_vec())),
            Some("abc".to_string())
        );
        assert_eq!(String::from_value(&Value::Binary(vec![0xff, 0xfe])), None);
        assert_eq!(Vec::<u8>::from_value(&Value::from("ab")), Some(b"ab".to_vec()));
        assert_eq!(Vec::<u8>::from_value(&Value::from(1)), None);
    }
}
