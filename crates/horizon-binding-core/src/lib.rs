//! Core systems for Horizon Binding.
//!
//! This crate provides the primitives the binding adapters are built on:
//!
//! - **Signal/Slot System**: Type-safe, reentrant change notification
//! - **Property System**: Values that report whether a write changed them
//! - **Dynamic Values**: [`Value`], the currency between records and controls
//! - **Reflection**: Per-type property descriptors looked up by runtime type
//! - **Collections**: Observable, indexable and enumerable item sources
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_binding_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Collection Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_binding_core::{ItemSource, ObservableList, ObservableVec, RangeChange, Value};
//!
//! let tasks = Arc::new(ObservableVec::new());
//! tasks.item_changed().connect(|change: &RangeChange| {
//!     println!("{} items replaced by {} at {}", change.old_count, change.new_count, change.start);
//! });
//!
//! tasks.push("Write docs");
//! let adapted = ItemSource::observable(tasks).adapt();
//! assert_eq!(adapted.get(0), Value::from("Write docs"));
//! ```

mod error;
pub mod collection;
pub mod logging;
pub mod property;
pub mod reflect;
pub mod signal;
pub mod value;

pub use collection::{
    AdaptedList, Enumerable, ItemSource, ObservableList, ObservableVec, RangeChange, ReadOnlyList,
    ValueList,
};
pub use error::{BindingError, Result};
pub use property::Property;
pub use reflect::{
    AnyRecord, PropertyInfo, TypeDescriptor, TypeDescriptorBuilder, TypeRegistry, type_registry,
};
pub use signal::{ConnectionId, Signal};
pub use value::{Object, Value, ValueKind};
