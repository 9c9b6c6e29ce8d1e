//! Binding adapters between item sources and item controls.
//!
//! Each adapter takes an external collection of records, reads display
//! values out of those records through named properties, and translates
//! upstream collection changes into the notifications a control expects.
//!
//! # Adapters
//!
//! - `TextListSource`: flat list of checkable text items
//! - `ListViewSource`: flat list with columns, sub-items and images
//! - `TreeItemSource`: hierarchy of lazily prepared `ItemSourceNode`s
//! - `BindableDataProvider`: rows and `BindableDataColumn`s for a data grid
//!
//! # View interfaces
//!
//! Controls never hold an adapter's concrete type. They ask an
//! `ItemProvider` (or a `NodeRootProvider`) for a view by `ViewKind` and get
//! back an `ItemView` they can match on. A request for a view an adapter does
//! not offer returns `None`.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐  item_changed  ┌─────────────┐  item_modified  ┌─────────────┐
//! │ ItemSource  │───────────────>│   Adapter   │────────────────>│   Control   │
//! │  (records)  │                │             │<────────────────│             │
//! └─────────────┘                └─────────────┘  request_view   └─────────────┘
//!       ^                               │
//!       │        read_property          │
//!       └───────────────────────────────┘
//! ```

pub mod accessor;
mod bound_list;
mod columns;
mod data_grid;
mod image;
mod list_view;
mod text_list;
mod tree;
mod views;

pub use accessor::{read_property, try_read_property, try_write_property, write_property};
pub use columns::{DEFAULT_COLUMN_SIZE, ListViewColumn, ListViewColumns, PopupHandle, SortingState};
pub use data_grid::{BindableDataColumn, BindableDataProvider, DataProviderCommandExecutor};
pub use image::ImageData;
pub use list_view::{ListViewSignals, ListViewSource};
pub use text_list::{TextListSignals, TextListSource};
pub use tree::{ItemSourceNode, NodeChange, TreeItemSource, TreeSignals};
pub use views::{
    ColumnItemView, ItemBindingView, ItemPrimaryTextView, ItemProvider, ItemView,
    ListViewItemView, NodeItemBindingView, NodeItemPrimaryTextView, NodeRootProvider, NodeView,
    NodeViewKind, TextItemView, TreeViewItemView, ViewKind,
};
