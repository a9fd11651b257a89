//! Attributes attached to log records.
//!
//! An [`Attr`] is a key paired with a [`Value`]. Values are either scalars (kept as their
//! rendered text), groups of nested attributes, or [`Value::Null`] for "no value".

use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Scalar(Arc<str>),
    Group(Vec<Attr>),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Scalar(s) => write!(f, "{}", s),
            Value::Group(attrs) => {
                write!(f, "(")?;
                for (index, attr) in attrs.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", attr)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Value {
    /// Captures the textual representation of any displayable value.
    pub fn scalar(value: impl Display) -> Self {
        Value::Scalar(value.to_string().into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }

    pub fn as_scalar(&self) -> Option<&str> {
        if let Value::Scalar(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_group(&self) -> Option<&[Attr]> {
        if let Value::Group(attrs) = self {
            Some(attrs)
        } else {
            None
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<Vec<Attr>> for Value {
    fn from(value: Vec<Attr>) -> Self {
        Value::Group(value)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::scalar(value)
                }
            }
        )*
    };
}

scalar_from!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char);

/// A single key/value pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Display for Attr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Attr {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates an attribute whose value is a group of nested attributes.
    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Attr {
            key: key.into(),
            value: Value::Group(attrs),
        }
    }

    /// An attribute without key and value. It is never rendered.
    pub fn empty() -> Self {
        Attr {
            key: String::new(),
            value: Value::Null,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.value.is_null()
    }
}

/// Builds a `Vec<Attr>` from `key => value` pairs.
///
/// # Example
/// ```
/// use rawlog::attrs;
///
/// let attrs = attrs!["user" => "alice", "retries" => 3];
/// assert_eq!(attrs.len(), 2);
/// assert_eq!(attrs[1].value.as_scalar(), Some("3"));
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        ::std::vec::Vec::<$crate::attr::Attr>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        vec![$($crate::attr::Attr::new($key, $value)),+]
    };
}
