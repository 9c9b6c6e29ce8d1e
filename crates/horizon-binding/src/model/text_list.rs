//! Flat adapter for checkable text lists.
//!
//! [`TextListSource`] binds one item source and reads each item's text and
//! check state through two named properties.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use horizon_binding::model::TextListSource;
//! use horizon_binding_core::{ItemSource, ObservableVec};
//!
//! let tasks = Arc::new(ObservableVec::new());
//! let source = TextListSource::new();
//! source.set_text_property("title");
//! source.set_checked_property("done");
//! source.set_item_source(Some(ItemSource::observable(tasks.clone())));
//!
//! source.signals().item_modified.connect(|change| {
//!     println!("relayout {} rows at {}", change.new_count, change.start);
//! });
//! ```

use std::sync::Arc;

use horizon_binding_core::logging::targets;
use horizon_binding_core::{ItemSource, Property, RangeChange, Signal, Value};
use parking_lot::RwLock;

use super::accessor::{read_property, write_property};
use super::bound_list::CollectionBinding;
use super::views::{
    ItemBindingView, ItemPrimaryTextView, ItemProvider, ItemView, TextItemView, ViewKind,
};

/// Signals emitted by a [`TextListSource`].
#[derive(Debug, Default)]
pub struct TextListSignals {
    /// Emitted when a range of items must be re-laid out.
    pub item_modified: Signal<RangeChange>,
    /// Emitted with the new name when the text property changes.
    pub text_property_changed: Signal<String>,
    /// Emitted with the new name when the checked property changes.
    pub checked_property_changed: Signal<String>,
}

/// Adapts an item source for a checkable text list.
pub struct TextListSource {
    binding: RwLock<CollectionBinding>,
    text_property: Property<String>,
    checked_property: Property<String>,
    signals: Arc<TextListSignals>,
}

impl Default for TextListSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextListSource {
    /// Creates an adapter with no item source and empty property names.
    pub fn new() -> Self {
        Self {
            binding: RwLock::new(CollectionBinding::new()),
            text_property: Property::default(),
            checked_property: Property::default(),
            signals: Arc::new(TextListSignals::default()),
        }
    }

    /// The adapter's signals.
    pub fn signals(&self) -> &TextListSignals {
        &self.signals
    }

    /// The bound item source.
    pub fn item_source(&self) -> Option<ItemSource> {
        self.binding.read().item_source()
    }

    /// Replaces the bound item source and announces `(0, old, new)`.
    #[tracing::instrument(skip_all, name = "horizon_binding::rebind", target = "horizon_binding::list", level = "debug")]
    pub fn set_item_source(&self, source: Option<ItemSource>) {
        let signals = self.signals.clone();
        let change = self
            .binding
            .write()
            .rebind(source, move |change| signals.item_modified.emit(*change));
        tracing::debug!(target: targets::LIST, ?change, "text list rebound");
        self.signals.item_modified.emit(change);
    }

    /// The record at `index`, or `Null` out of range.
    pub fn get(&self, index: usize) -> Value {
        self.binding.read().get(index)
    }

    /// Number of items.
    pub fn count(&self) -> usize {
        self.binding.read().count()
    }

    /// Name of the property supplying item text.
    pub fn text_property(&self) -> String {
        self.text_property.get()
    }

    /// Sets the text property, refreshing every item if it changed.
    pub fn set_text_property(&self, name: impl Into<String>) {
        let name = name.into();
        if self.text_property.set(name.clone()) {
            self.update_binding_properties();
            self.signals.text_property_changed.emit(name);
        }
    }

    /// Name of the property supplying the check state.
    pub fn checked_property(&self) -> String {
        self.checked_property.get()
    }

    /// Sets the checked property, refreshing every item if it changed.
    pub fn set_checked_property(&self, name: impl Into<String>) {
        let name = name.into();
        if self.checked_property.set(name.clone()) {
            self.update_binding_properties();
            self.signals.checked_property_changed.emit(name);
        }
    }

    /// Announces every item as modified.
    pub fn update_binding_properties(&self) {
        let count = self.count();
        self.signals
            .item_modified
            .emit(RangeChange::new(0, count, count));
    }

    /// The record at the selected index, or `Null` when nothing is selected.
    pub fn selected_item(&self, selected: Option<usize>) -> Value {
        selected.map_or(Value::Null, |index| self.get(index))
    }
}

impl ItemProvider for TextListSource {
    fn count(&self) -> usize {
        TextListSource::count(self)
    }

    fn request_view(&self, kind: ViewKind) -> Option<ItemView<'_>> {
        match kind {
            ViewKind::ItemBinding => Some(ItemView::ItemBinding(self)),
            ViewKind::PrimaryText => Some(ItemView::PrimaryText(self)),
            ViewKind::TextItem => Some(ItemView::TextItem(self)),
            ViewKind::ListViewItem | ViewKind::ColumnItem => None,
        }
    }
}

impl ItemBindingView for TextListSource {
    fn binding_value(&self, index: usize) -> Value {
        self.get(index)
    }
}

impl ItemPrimaryTextView for TextListSource {
    fn primary_text(&self, index: usize) -> String {
        TextItemView::text(self, index)
    }

    fn contains_primary_text(&self, index: usize) -> bool {
        index < self.count()
    }
}

impl TextItemView for TextListSource {
    fn text(&self, index: usize) -> String {
        let record = self.get(index);
        if record.is_null() {
            return String::new();
        }
        read_property(&record, &self.text_property.get()).text()
    }

    fn checked(&self, index: usize) -> bool {
        if index >= self.count() {
            return false;
        }
        let value = read_property(&self.get(index), &self.checked_property.get());
        value.as_bool().unwrap_or_else(|| {
            tracing::trace!(target: targets::LIST, index, kind = ?value.kind(), "checked value is not a boolean");
            false
        })
    }

    fn set_checked_silently(&self, index: usize, checked: bool) {
        if index >= self.count() {
            return;
        }
        write_property(&self.get(index), &self.checked_property.get(), Value::Bool(checked));
    }
}

static_assertions::assert_impl_all!(TextListSource: Send, Sync);
