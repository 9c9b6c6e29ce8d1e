//! Error types for Horizon Binding.
//!
//! Adapters never surface these to the owning control: a missing property,
//! an out-of-range index or a mistyped value all degrade to "no data". The
//! error values exist for the strict accessor API, for diagnostics in logs,
//! and for callers that want to know *why* a lookup came back empty.

use crate::value::ValueKind;

/// Result type alias for binding operations.
pub type Result<T> = std::result::Result<T, BindingError>;

/// Errors describing why a binding lookup or update did not take effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// The value is not a record, so it has no named properties.
    #[error("value of kind {kind:?} has no properties")]
    NotAnObject {
        /// The kind of the value that was inspected.
        kind: ValueKind,
    },

    /// The record's runtime type has no descriptor in the type registry.
    #[error("record type is not registered with the type registry")]
    UnregisteredType,

    /// No property with the requested name exists on the record's type.
    #[error("property '{name}' not found on '{type_name}'")]
    PropertyNotFound {
        /// Name of the record type.
        type_name: &'static str,
        /// The requested property name.
        name: String,
    },

    /// The property exists but has no getter.
    #[error("property '{name}' on '{type_name}' is not readable")]
    PropertyNotReadable {
        /// Name of the record type.
        type_name: &'static str,
        /// The requested property name.
        name: String,
    },

    /// The property exists but has no setter.
    #[error("property '{name}' on '{type_name}' is not writable")]
    PropertyNotWritable {
        /// Name of the record type.
        type_name: &'static str,
        /// The requested property name.
        name: String,
    },

    /// A value had a different runtime kind than required.
    #[error("type mismatch: expected {expected:?}, got {got:?}")]
    TypeMismatch {
        /// The kind that was required.
        expected: ValueKind,
        /// The kind that was found.
        got: ValueKind,
    },

    /// An item index was outside `[0, count)`.
    #[error("index {index} out of range for {count} items")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of items available.
        count: usize,
    },

    /// A manual update request named an empty or out-of-bounds range.
    #[error("invalid update range: start {start}, count {count}, row count {row_count}")]
    InvalidRange {
        /// First row of the requested range.
        start: usize,
        /// Number of rows requested.
        count: usize,
        /// Number of rows currently available.
        row_count: usize,
    },
}

impl BindingError {
    /// Returns `true` for errors caused by a property lookup miss.
    pub fn is_binding_miss(&self) -> bool {
        matches!(
            self,
            Self::NotAnObject { .. }
                | Self::UnregisteredType
                | Self::PropertyNotFound { .. }
                | Self::PropertyNotReadable { .. }
                | Self::PropertyNotWritable { .. }
                | Self::TypeMismatch { .. }
        )
    }
}
