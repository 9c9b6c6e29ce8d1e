//! Dynamically-typed values.
//!
//! [`Value`] is what flows between an external data source and the binding
//! adapters: records, the scalar results of property reads, and nested
//! collections (for example a tree node's children).
//!
//! Records are held as `Arc<dyn Any + Send + Sync>`. Their identity is the
//! allocation they point to, so two `Value`s referring to the same record
//! compare equal no matter how they were obtained.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::collection::ItemSource;
use crate::error::{BindingError, Result};

/// A shared, type-erased record.
pub type Object = Arc<dyn Any + Send + Sync>;

/// The runtime kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The empty value.
    Null,
    /// A boolean.
    Bool,
    /// A 64-bit signed integer.
    Int,
    /// A 64-bit float.
    Float,
    /// A string.
    String,
    /// A shared record.
    Object,
    /// A nested collection.
    Collection,
}

/// A dynamically-typed value.
#[derive(Clone, Default)]
pub enum Value {
    /// No value. Returned for every binding miss.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A floating point value.
    Float(f64),
    /// A string value.
    String(String),
    /// A shared record, compared by identity.
    Object(Object),
    /// A nested collection, compared by identity.
    Collection(ItemSource),
}

impl Value {
    /// Wraps a record in a new shared allocation.
    pub fn object<T: Any + Send + Sync>(record: T) -> Self {
        Value::Object(Arc::new(record))
    }

    /// Wraps an already shared record without changing its identity.
    pub fn from_arc<T: Any + Send + Sync>(record: Arc<T>) -> Self {
        Value::Object(record)
    }

    /// Returns the runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Object(_) => ValueKind::Object,
            Value::Collection(_) => ValueKind::Collection,
        }
    }

    /// Returns `true` if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean, if this is a boolean-typed value.
    ///
    /// No coercion is performed: `Int(1)` and `String("true")` yield `None`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the boolean or a [`BindingError::TypeMismatch`].
    pub fn try_bool(&self) -> Result<bool> {
        self.as_bool().ok_or(BindingError::TypeMismatch {
            expected: ValueKind::Bool,
            got: self.kind(),
        })
    }

    /// Returns the integer, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as a float, for integer or float values.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the shared record, if this is an object value.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Borrows the record as a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object().and_then(|o| o.downcast_ref::<T>())
    }

    /// Returns a new handle to the record as a concrete type.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.as_object().and_then(|o| o.clone().downcast::<T>().ok())
    }

    /// Returns the nested collection, if this is a collection value.
    pub fn as_collection(&self) -> Option<&ItemSource> {
        match self {
            Value::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Converts the value to display text.
    ///
    /// Null, records and collections have no textual form and produce an
    /// empty string.
    pub fn text(&self) -> String {
        match self {
            Value::Null | Value::Object(_) | Value::Collection(_) => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => s.clone(),
        }
    }

    /// Returns `true` if both values refer to the same record or collection.
    ///
    /// Scalars never share identity.
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Value::Collection(a), Value::Collection(b)) => a.same_source(b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(_), Value::Object(_))
            | (Value::Collection(_), Value::Collection(_)) => self.same_ref(other),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Object(o) => write!(f, "Object({:p})", Arc::as_ptr(o)),
            Value::Collection(c) => f.debug_tuple("Collection").field(c).finish(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<ItemSource> for Value {
    fn from(value: ItemSource) -> Self {
        Value::Collection(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
