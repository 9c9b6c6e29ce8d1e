//! Capability views exposed to controls.
//!
//! A control does not talk to an adapter through one big interface. It asks
//! the adapter for the views it knows how to use: a text list asks for
//! [`ViewKind::TextItem`], a detail-mode arranger asks for
//! [`ViewKind::ColumnItem`], and so on. Adapters answer with the subset they
//! implement and `None` for the rest.
//!
//! # Item Views
//!
//! | View | Provided by |
//! |------|-------------|
//! | [`ItemBindingView`] | text list, list view |
//! | [`ItemPrimaryTextView`] | text list, list view |
//! | [`TextItemView`] | text list |
//! | [`ListViewItemView`] | list view |
//! | [`ColumnItemView`] | list view |
//!
//! # Node Views
//!
//! | View | Provided by |
//! |------|-------------|
//! | [`NodeItemBindingView`] | tree |
//! | [`NodeItemPrimaryTextView`] | tree |
//! | [`TreeViewItemView`] | tree |
//!
//! All views are total: an out-of-range index, or a missing or mistyped
//! property, produces an empty string, `false`, `None` or `Value::Null`.

use std::sync::Arc;

use horizon_binding_core::{Signal, Value};

use super::image::ImageData;
use super::columns::{PopupHandle, SortingState};
use super::tree::ItemSourceNode;

/// Access to the raw record behind an item.
pub trait ItemBindingView {
    /// The record at `index`.
    fn binding_value(&self, index: usize) -> Value;
}

/// Access to the text used for keyboard search and accessibility.
pub trait ItemPrimaryTextView {
    /// The primary text of the item at `index`.
    fn primary_text(&self, index: usize) -> String;

    /// Whether the item at `index` has primary text.
    fn contains_primary_text(&self, index: usize) -> bool;
}

/// The view used by checkable text lists.
pub trait TextItemView {
    /// Display text of the item at `index`.
    fn text(&self, index: usize) -> String;

    /// Check state of the item at `index`. Only boolean values count.
    fn checked(&self, index: usize) -> bool;

    /// Writes the check state back to the record without notifying.
    fn set_checked_silently(&self, index: usize, checked: bool);
}

/// The view used by list-view item styles (icons, details, tiles).
pub trait ListViewItemView {
    /// Small icon of the item at `index`.
    fn small_image(&self, index: usize) -> Option<Arc<ImageData>>;
    /// Large icon of the item at `index`.
    fn large_image(&self, index: usize) -> Option<Arc<ImageData>>;
    /// Text of the first column.
    fn text(&self, index: usize) -> String;
    /// Text of column `sub_item + 1`.
    fn sub_item(&self, index: usize, sub_item: usize) -> String;
    /// Number of data columns shown in tile and information modes.
    fn data_column_count(&self) -> usize;
    /// Column index of the `index`-th data column.
    fn data_column(&self, index: usize) -> Option<usize>;
    /// Number of columns.
    fn column_count(&self) -> usize;
    /// Header text of column `index`.
    fn column_text(&self, index: usize) -> String;
}

/// The view used by the detail-mode column arranger.
pub trait ColumnItemView {
    /// Emitted when any column's header, size, sorting or membership changes.
    fn column_changed(&self) -> &Signal<()>;
    /// Width of column `index`, 0 out of range.
    fn column_size(&self, index: usize) -> i32;
    /// Resizes column `index`; ignored out of range.
    fn set_column_size(&self, index: usize, size: i32);
    /// The dropdown popup attached to column `index`.
    fn dropdown_popup(&self, index: usize) -> Option<PopupHandle>;
    /// The sorting indicator of column `index`.
    fn sorting_state(&self, index: usize) -> SortingState;
}

/// Identifies an item view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// [`ItemBindingView`].
    ItemBinding,
    /// [`ItemPrimaryTextView`].
    PrimaryText,
    /// [`TextItemView`].
    TextItem,
    /// [`ListViewItemView`].
    ListViewItem,
    /// [`ColumnItemView`].
    ColumnItem,
}

/// A view returned by [`ItemProvider::request_view`].
#[derive(Clone, Copy)]
pub enum ItemView<'a> {
    /// See [`ItemBindingView`].
    ItemBinding(&'a dyn ItemBindingView),
    /// See [`ItemPrimaryTextView`].
    PrimaryText(&'a dyn ItemPrimaryTextView),
    /// See [`TextItemView`].
    TextItem(&'a dyn TextItemView),
    /// See [`ListViewItemView`].
    ListViewItem(&'a dyn ListViewItemView),
    /// See [`ColumnItemView`].
    ColumnItem(&'a dyn ColumnItemView),
}

impl ItemView<'_> {
    /// The kind of this view.
    pub fn kind(&self) -> ViewKind {
        match self {
            ItemView::ItemBinding(_) => ViewKind::ItemBinding,
            ItemView::PrimaryText(_) => ViewKind::PrimaryText,
            ItemView::TextItem(_) => ViewKind::TextItem,
            ItemView::ListViewItem(_) => ViewKind::ListViewItem,
            ItemView::ColumnItem(_) => ViewKind::ColumnItem,
        }
    }
}

/// A flat item provider, as consumed by list controls.
pub trait ItemProvider {
    /// Number of items.
    fn count(&self) -> usize;

    /// Returns the requested view, or `None` if it is not supported.
    fn request_view(&self, kind: ViewKind) -> Option<ItemView<'_>>;
}

/// Access to the raw record behind a node.
pub trait NodeItemBindingView {
    /// The record of `node`.
    fn binding_value(&self, node: &ItemSourceNode) -> Value;
}

/// Access to a node's primary text.
pub trait NodeItemPrimaryTextView {
    /// The primary text of `node`.
    fn primary_text(&self, node: &ItemSourceNode) -> String;
}

/// The view used by tree-view node styles.
pub trait TreeViewItemView {
    /// Display text of `node`.
    fn node_text(&self, node: &ItemSourceNode) -> String;
    /// Icon of `node`.
    fn node_image(&self, node: &ItemSourceNode) -> Option<Arc<ImageData>>;
}

/// Identifies a node view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeViewKind {
    /// [`NodeItemBindingView`].
    NodeBinding,
    /// [`NodeItemPrimaryTextView`].
    PrimaryText,
    /// [`TreeViewItemView`].
    TreeViewItem,
}

/// A view returned by [`NodeRootProvider::request_view`].
#[derive(Clone, Copy)]
pub enum NodeView<'a> {
    /// See [`NodeItemBindingView`].
    NodeBinding(&'a dyn NodeItemBindingView),
    /// See [`NodeItemPrimaryTextView`].
    PrimaryText(&'a dyn NodeItemPrimaryTextView),
    /// See [`TreeViewItemView`].
    TreeViewItem(&'a dyn TreeViewItemView),
}

impl NodeView<'_> {
    /// The kind of this view.
    pub fn kind(&self) -> NodeViewKind {
        match self {
            NodeView::NodeBinding(_) => NodeViewKind::NodeBinding,
            NodeView::PrimaryText(_) => NodeViewKind::PrimaryText,
            NodeView::TreeViewItem(_) => NodeViewKind::TreeViewItem,
        }
    }
}

/// A hierarchical node provider, as consumed by tree controls.
pub trait NodeRootProvider {
    /// The root node. It is never displayed.
    fn root_node(&self) -> Arc<ItemSourceNode>;

    /// Returns the requested view, or `None` if it is not supported.
    fn request_view(&self, kind: NodeViewKind) -> Option<NodeView<'_>>;
}
