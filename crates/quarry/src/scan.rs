//! Row decoding contracts.
//!
//! A [`Scanner`] is one writable destination for a single column value. A
//! [`Document`] hands out scanners for the columns it recognizes, and a
//! [`Collection`] appends fresh documents for multi-row decoding. Usually
//! `Document` is derived:
//!
//! ```ignore
//! #[derive(Default, quarry::Document)]
//! struct User {
//!     id: i64,
//!     #[quarry(column = "full_name")]
//!     name: String,
//!     #[quarry(skip)]
//!     cached: Option<String>,
//! }
//! ```

use crate::error::ScanError;
use crate::value::Value;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Destination for one column value.
///
/// `NULL` resets plain targets to their zero value; wrap the target in
/// `Option` to keep the distinction.
pub trait Scanner {
    fn scan(&mut self, value: Value) -> Result<(), ScanError>;
}

/// Accepts and drops any value. Used for columns no target claims.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Scanner for Discard {
    fn scan(&mut self, _value: Value) -> Result<(), ScanError> {
        Ok(())
    }
}

/// A record that can be filled from a row.
pub trait Document {
    /// One entry per name in `fields`, in the same order.
    ///
    /// `None` marks a column this document does not map; it is read into a
    /// discard target. A field is handed out at most once, so a repeated
    /// column name yields `None` after its first occurrence.
    fn scanners<'a>(&'a mut self, fields: &[String]) -> Vec<Option<&'a mut dyn Scanner>>;
}

/// A growable container of documents.
pub trait Collection {
    /// Append a default document and return it for decoding.
    fn add(&mut self) -> &mut dyn Document;
}

impl<T: Document + Default> Collection for Vec<T> {
    fn add(&mut self) -> &mut dyn Document {
        let index = self.len();
        self.push(T::default());
        &mut self[index]
    }
}

/// Ad-hoc rows keyed by column name.
impl Document for BTreeMap<String, Value> {
    fn scanners<'a>(&'a mut self, fields: &[String]) -> Vec<Option<&'a mut dyn Scanner>> {
        for field in fields {
            self.entry(field.clone()).or_default();
        }

        let mut slots: HashMap<&str, &'a mut Value> = self
            .iter_mut()
            .map(|(name, value)| (name.as_str(), value))
            .collect();

        fields
            .iter()
            .map(|field| {
                slots
                    .remove(field.as_str())
                    .map(|value| value as &mut dyn Scanner)
            })
            .collect()
    }
}

impl Scanner for Value {
    fn scan(&mut self, value: Value) -> Result<(), ScanError> {
        *self = value;
        Ok(())
    }
}

impl<T: Scanner + Default> Scanner for Option<T> {
    fn scan(&mut self, value: Value) -> Result<(), ScanError> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        let mut inner = T::default();
        inner.scan(value)?;
        *self = Some(inner);
        Ok(())
    }
}

macro_rules! impl_scan_int {
    ($($t:ty),*) => {
        $(
            impl Scanner for $t {
                fn scan(&mut self, value: Value) -> Result<(), ScanError> {
                    *self = match value {
                        Value::Null => 0,
                        Value::Int(v) => <$t>::try_from(v)
                            .map_err(|e| ScanError::invalid(stringify!($t), e))?,
                        Value::Bool(v) => <$t>::from(v),
                        Value::Text(v) => v
                            .trim()
                            .parse()
                            .map_err(|e| ScanError::invalid(stringify!($t), e))?,
                        other => return Err(ScanError::mismatch(stringify!($t), other.kind())),
                    };
                    Ok(())
                }
            }
        )*
    };
}

impl_scan_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl Scanner for f64 {
    fn scan(&mut self, value: Value) -> Result<(), ScanError> {
        *self = match value {
            Value::Null => 0.0,
            Value::Float(v) => v,
            Value::Int(v) => v as f64,
            Value::Text(v) => v
                .trim()
                .parse()
                .map_err(|e| ScanError::invalid("f64", e))?,
            other => return Err(ScanError::mismatch("f64", other.kind())),
        };
        Ok(())
    }
}

impl Scanner for f32 {
    fn scan(&mut self, value: Value) -> Result<(), ScanError> {
        let mut wide = 0.0_f64;
        wide.scan(value).map_err(|err| match err {
            ScanError::Mismatch { found, .. } => ScanError::mismatch("f32", found),
            ScanError::Invalid { message, .. } => ScanError::invalid("f32", message),
        })?;
        *self = wide as f32;
        Ok(())
    }
}

impl Scanner for bool {
    fn scan(&mut self, value: Value) -> Result<(), ScanError> {
        *self = match value {
            Value::Null => false,
            Value::Bool(v) => v,
            Value::Int(v) => v != 0,
            Value::Text(v) => match v.trim() {
                "1" | "t" | "true" | "TRUE" => true,
                "0" | "f" | "false" | "FALSE" => false,
                other => return Err(ScanError::invalid("bool", other)),
            },
            other => return Err(ScanError::mismatch("bool", other.kind())),
        };
        Ok(())
    }
}

impl Scanner for String {
    fn scan(&mut self, value: Value) -> Result<(), ScanError> {
        *self = match value {
            Value::Null => String::new(),
            Value::Text(v) => v,
            Value::Bytes(v) => String::from_utf8(v).map_err(|e| ScanError::invalid("string", e))?,
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Uuid(v) => v.to_string(),
            Value::Timestamp(v) => v.to_rfc3339(),
            Value::Json(v) => v.to_string(),
        };
        Ok(())
    }
}

impl Scanner for Vec<u8> {
    fn scan(&mut self, value: Value) -> Result<(), ScanError> {
        *self = match value {
            Value::Null => Vec::new(),
            Value::Bytes(v) => v,
            Value::Text(v) => v.into_bytes(),
            other => return Err(ScanError::mismatch("bytes", other.kind())),
        };
        Ok(())
    }
}

impl Scanner for DateTime<Utc> {
    fn scan(&mut self, value: Value) -> Result<(), ScanError> {
        *self = match value {
            Value::Null => DateTime::<Utc>::default(),
            Value::Timestamp(v) => v,
            Value::Text(v) => DateTime::parse_from_rfc3339(v.trim())
                .map_err(|e| ScanError::invalid("timestamp", e))?
                .with_timezone(&Utc),
            other => return Err(ScanError::mismatch("timestamp", other.kind())),
        };
        Ok(())
    }
}

impl Scanner for NaiveDateTime {
    fn scan(&mut self, value: Value) -> Result<(), ScanError> {
        let mut utc = DateTime::<Utc>::default();
        utc.scan(value)?;
        *self = utc.naive_utc();
        Ok(())
    }
}

impl Scanner for Uuid {
    fn scan(&mut self, value: Value) -> Result<(), ScanError> {
        *self = match value {
            Value::Null => Uuid::nil(),
            Value::Uuid(v) => v,
            Value::Text(v) => Uuid::parse_str(v.trim()).map_err(|e| ScanError::invalid("uuid", e))?,
            Value::Bytes(v) => Uuid::from_slice(&v).map_err(|e| ScanError::invalid("uuid", e))?,
            other => return Err(ScanError::mismatch("uuid", other.kind())),
        };
        Ok(())
    }
}

impl Scanner for serde_json::Value {
    fn scan(&mut self, value: Value) -> Result<(), ScanError> {
        *self = match value {
            Value::Null => serde_json::Value::Null,
            Value::Json(v) => v,
            Value::Text(v) => serde_json::from_str(&v).map_err(|e| ScanError::invalid("json", e))?,
            Value::Bytes(v) => {
                serde_json::from_slice(&v).map_err(|e| ScanError::invalid("json", e))?
            }
            other => return Err(ScanError::mismatch("json", other.kind())),
        };
        Ok(())
    }
}
