//! Horizon Binding - adapters that feed record collections to item controls.
//!
//! This is the main crate. It re-exports the primitives of
//! `horizon-binding-core` and adds the adapters themselves.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use horizon_binding::model::{ItemProvider, ItemView, TextListSource, ViewKind};
//! use horizon_binding::{ItemSource, ObservableVec, Property, TypeDescriptor, Value};
//!
//! struct Task {
//!     title: Property<String>,
//!     done: Property<bool>,
//! }
//!
//! TypeDescriptor::builder::<Task>("Task")
//!     .readable("title", |t| Value::from(t.title.get()))
//!     .property("done", |t| Value::from(t.done.get()), |t, v| {
//!         if let Some(done) = v.as_bool() {
//!             t.done.set_silent(done);
//!         }
//!     })
//!     .register();
//!
//! let tasks = Arc::new(ObservableVec::new());
//! tasks.push(Value::object(Task { title: Property::new("Write docs".into()), done: Property::new(false) }));
//!
//! let list = TextListSource::new();
//! list.set_text_property("title");
//! list.set_checked_property("done");
//! list.set_item_source(Some(ItemSource::observable(tasks)));
//!
//! if let Some(ItemView::TextItem(view)) = list.request_view(ViewKind::TextItem) {
//!     assert_eq!(view.text(0), "Write docs");
//!     assert!(!view.checked(0));
//! }
//! ```

pub use horizon_binding_core::*;

pub mod config;
pub mod model;

/// Commonly used types.
pub mod prelude {
    pub use crate::config::BindingConfig;
    pub use crate::model::{
        BindableDataColumn, BindableDataProvider, DataProviderCommandExecutor, ItemProvider,
        ItemSourceNode, ItemView, ListViewColumn, ListViewSource, NodeRootProvider, NodeView,
        NodeViewKind, TextListSource, TreeItemSource, ViewKind,
    };
    pub use horizon_binding_core::{
        ItemSource, ObservableList, ObservableVec, Property, Signal, TypeDescriptor, Value,
        ValueList,
    };
}
