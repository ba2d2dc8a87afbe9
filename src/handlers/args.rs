//! # Handler arguments.
//!
//! [`Args`] is the positional argument list every handler receives. Values are
//! JSON ([`serde_json::Value`]) so one module can expose handlers with
//! different signatures behind a single slot type.
//!
//! ## Example
//! ```rust
//! use modrain::Args;
//! use serde_json::json;
//!
//! let args = Args::from(json!([2, 3]));
//! assert_eq!(args.len(), 2);
//! assert_eq!(args.arg::<i64>(0).unwrap(), 2);
//! assert!(args.arg::<i64>(5).is_err());
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::HandlerError;

/// Positional handler arguments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args(Vec<Value>);

impl Args {
    /// Creates an argument list from values.
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Creates an empty argument list.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw value at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Decodes the argument at `index` into `T`.
    ///
    /// Fails with [`HandlerError::InvalidArgument`] when the argument is missing
    /// or has the wrong shape.
    pub fn arg<T: DeserializeOwned>(&self, index: usize) -> Result<T, HandlerError> {
        let value = self.0.get(index).ok_or_else(|| HandlerError::InvalidArgument {
            index,
            reason: format!("missing (got {} arguments)", self.0.len()),
        })?;
        T::deserialize(value).map_err(|e| HandlerError::InvalidArgument {
            index,
            reason: e.to_string(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// A JSON array becomes the argument list; `null` means no arguments; any other
/// value becomes a single argument.
impl From<Value> for Args {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => Self(values),
            Value::Null => Self::empty(),
            other => Self(vec![other]),
        }
    }
}

impl From<()> for Args {
    fn from((): ()) -> Self {
        Self::empty()
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_becomes_single_argument() {
        let args = Args::from(json!("alice"));
        assert_eq!(args.len(), 1);
        assert_eq!(args.arg::<String>(0).unwrap(), "alice");
    }

    #[test]
    fn null_and_unit_are_empty() {
        assert!(Args::from(Value::Null).is_empty());
        assert!(Args::from(()).is_empty());
    }

    #[test]
    fn wrong_type_reports_index() {
        let args = Args::from(json!([1, "two"]));
        let err = args.arg::<i64>(1).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidArgument { index: 1, .. }));
    }
}
