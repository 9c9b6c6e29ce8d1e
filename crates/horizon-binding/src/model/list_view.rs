//! Flat adapter for multi-column list views.
//!
//! [`ListViewSource`] binds one item source. Item text comes from the
//! columns: column 0 gives the main text, column `n + 1` gives sub-item `n`.
//! Small and large icons are read through two image properties.

use std::sync::Arc;

use horizon_binding_core::logging::targets;
use horizon_binding_core::{ItemSource, Property, RangeChange, Signal, Value};
use parking_lot::RwLock;

use super::accessor::read_property;
use super::bound_list::{CollectionBinding, validate_update_range};
use super::columns::{ListViewColumns, PopupHandle, SortingState};
use super::image::ImageData;
use super::views::{
    ColumnItemView, ItemBindingView, ItemPrimaryTextView, ItemProvider, ItemView,
    ListViewItemView, ViewKind,
};

/// Signals emitted by a [`ListViewSource`].
#[derive(Debug, Default)]
pub struct ListViewSignals {
    /// Emitted when a range of items must be re-laid out.
    pub item_modified: Signal<RangeChange>,
    /// Emitted when column headers, sizes or membership change.
    pub column_changed: Signal<()>,
    /// Emitted with the new name when the small image property changes.
    pub small_image_property_changed: Signal<String>,
    /// Emitted with the new name when the large image property changes.
    pub large_image_property_changed: Signal<String>,
}

/// Adapts an item source for a list view.
pub struct ListViewSource {
    binding: RwLock<CollectionBinding>,
    columns: ListViewColumns,
    data_columns: RwLock<Vec<usize>>,
    small_image_property: Property<String>,
    large_image_property: Property<String>,
    signals: Arc<ListViewSignals>,
}

impl Default for ListViewSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ListViewSource {
    /// Creates an adapter with no item source and no columns.
    pub fn new() -> Self {
        let signals = Arc::new(ListViewSignals::default());
        let columns = ListViewColumns::new();
        let forward = signals.clone();
        columns
            .columns_changed()
            .connect(move |_| forward.column_changed.emit(()));

        Self {
            binding: RwLock::new(CollectionBinding::new()),
            columns,
            data_columns: RwLock::new(Vec::new()),
            small_image_property: Property::default(),
            large_image_property: Property::default(),
            signals,
        }
    }

    /// The adapter's signals.
    pub fn signals(&self) -> &ListViewSignals {
        &self.signals
    }

    /// The columns.
    pub fn columns(&self) -> &ListViewColumns {
        &self.columns
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

    /// Name of the property supplying the small icon.
    pub fn small_image_property(&self) -> String {
        self.small_image_property.get()
    }

    /// Sets the small image property, refreshing every item if it changed.
    pub fn set_small_image_property(&self, name: impl Into<String>) {
        let name = name.into();
        if self.small_image_property.set(name.clone()) {
            self.update_binding_properties();
            self.signals.small_image_property_changed.emit(name);
        }
    }

    /// Name of the property supplying the large icon.
    pub fn large_image_property(&self) -> String {
        self.large_image_property.get()
    }

    /// Sets the large image property, refreshing every item if it changed.
    pub fn set_large_image_property(&self, name: impl Into<String>) {
        let name = name.into();
        if self.large_image_property.set(name.clone()) {
            self.update_binding_properties();
            self.signals.large_image_property_changed.emit(name);
        }
    }

    /// The column indices shown in tile and information modes.
    pub fn data_columns(&self) -> Vec<usize> {
        self.data_columns.read().clone()
    }

    /// Replaces the data columns and refreshes every item.
    pub fn set_data_columns(&self, columns: Vec<usize>) {
        *self.data_columns.write() = columns;
        self.notify_all_items_update();
    }

    /// Announces every item as modified.
    pub fn update_binding_properties(&self) {
        let count = self.count();
        self.signals
            .item_modified
            .emit(RangeChange::new(0, count, count));
    }

    /// Announces `count` items starting at `start` as modified.
    ///
    /// Returns `false` without notifying if the range is empty or does not
    /// fit the current item count.
    pub fn notify_update(&self, start: usize, count: usize) -> bool {
        match validate_update_range(start, count, self.count()) {
            Ok(change) => {
                self.signals.item_modified.emit(change);
                true
            }
            Err(err) => {
                tracing::trace!(target: targets::LIST, %err, "rejected update request");
                false
            }
        }
    }

    /// Announces every item as modified. Does nothing when empty.
    pub fn notify_all_items_update(&self) {
        self.notify_update(0, self.count());
    }

    /// Tells column arrangers to re-read every column.
    pub fn notify_all_columns_update(&self) {
        self.signals.column_changed.emit(());
    }

    /// The record at the selected index, or `Null` when nothing is selected.
    pub fn selected_item(&self, selected: Option<usize>) -> Value {
        selected.map_or(Value::Null, |index| self.get(index))
    }

    fn read_image(&self, index: usize, property: &Property<String>) -> Option<Arc<ImageData>> {
        if index >= self.count() {
            return None;
        }
        ImageData::from_value(&read_property(&self.get(index), &property.get()))
    }

    fn column_text_of(&self, index: usize, column: usize) -> String {
        if index >= self.count() {
            return String::new();
        }
        match self.columns.get(column) {
            Some(column) => read_property(&self.get(index), &column.text_property()).text(),
            None => String::new(),
        }
    }
}

impl ItemProvider for ListViewSource {
    fn count(&self) -> usize {
        ListViewSource::count(self)
    }

    fn request_view(&self, kind: ViewKind) -> Option<ItemView<'_>> {
        match kind {
            ViewKind::ItemBinding => Some(ItemView::ItemBinding(self)),
            ViewKind::PrimaryText => Some(ItemView::PrimaryText(self)),
            ViewKind::ListViewItem => Some(ItemView::ListViewItem(self)),
            ViewKind::ColumnItem => Some(ItemView::ColumnItem(self)),
            ViewKind::TextItem => None,
        }
    }
}

impl ItemBindingView for ListViewSource {
    fn binding_value(&self, index: usize) -> Value {
        self.get(index)
    }
}

impl ItemPrimaryTextView for ListViewSource {
    fn primary_text(&self, index: usize) -> String {
        ListViewItemView::text(self, index)
    }

    fn contains_primary_text(&self, index: usize) -> bool {
        index < self.count()
    }
}

impl ListViewItemView for ListViewSource {
    fn small_image(&self, index: usize) -> Option<Arc<ImageData>> {
        self.read_image(index, &self.small_image_property)
    }

    fn large_image(&self, index: usize) -> Option<Arc<ImageData>> {
        self.read_image(index, &self.large_image_property)
    }

    fn text(&self, index: usize) -> String {
        self.column_text_of(index, 0)
    }

    fn sub_item(&self, index: usize, sub_item: usize) -> String {
        match sub_item.checked_add(1) {
            Some(column) => self.column_text_of(index, column),
            None => String::new(),
        }
    }

    fn data_column_count(&self) -> usize {
        self.data_columns.read().len()
    }

    fn data_column(&self, index: usize) -> Option<usize> {
        self.data_columns.read().get(index).copied()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_text(&self, index: usize) -> String {
        self.columns
            .get(index)
            .map(|column| column.text())
            .unwrap_or_default()
    }
}

impl ColumnItemView for ListViewSource {
    fn column_changed(&self) -> &Signal<()> {
        &self.signals.column_changed
    }

    fn column_size(&self, index: usize) -> i32 {
        self.columns.get(index).map_or(0, |column| column.size())
    }

    fn set_column_size(&self, index: usize, size: i32) {
        if let Some(column) = self.columns.get(index) {
            column.set_size(size);
        }
    }

    fn dropdown_popup(&self, index: usize) -> Option<PopupHandle> {
        self.columns
            .get(index)
            .and_then(|column| column.dropdown_popup())
    }

    fn sorting_state(&self, index: usize) -> SortingState {
        self.columns
            .get(index)
            .map(|column| column.sorting_state())
            .unwrap_or_default()
    }
}

static_assertions::assert_impl_all!(ListViewSource: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::columns::ListViewColumn;
    use horizon_binding_core::{ObservableVec, TypeDescriptor};
    use parking_lot::Mutex;

    struct File {
        name: String,
        size: i64,
        kind: String,
        icon: Option<ImageData>,
    }

    fn file(name: &str, size: i64, icon: Option<ImageData>) -> Value {
        TypeDescriptor::builder::<File>("File")
            .readable("name", |f| Value::from(&f.name))
            .readable("size", |f| Value::from(f.size))
            .readable("kind", |f| Value::from(&f.kind))
            .readable("icon", |f| match &f.icon {
                Some(icon) => Value::from(icon.clone()),
                None => Value::Null,
            })
            .register();
        Value::object(File {
            name: name.into(),
            size,
            kind: "file".into(),
            icon,
        })
    }

    fn source_with_columns() -> (ListViewSource, Arc<ObservableVec>) {
        let source = ListViewSource::new();
        source
            .columns()
            .add(Arc::new(ListViewColumn::new("Name").with_text_property("name")));
        source
            .columns()
            .add(Arc::new(ListViewColumn::new("Size").with_text_property("size")));
        source
            .columns()
            .add(Arc::new(ListViewColumn::new("Kind").with_text_property("kind")));

        let files = Arc::new(ObservableVec::from_values(vec![
            file("a.txt", 12, Some(ImageData::new("text.png"))),
            file("b.bin", 40, None),
        ]));
        source.set_item_source(Some(ItemSource::observable(files.clone())));
        (source, files)
    }

    fn record_changes(source: &ListViewSource) -> Arc<Mutex<Vec<RangeChange>>> {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let recv = changes.clone();
        source
            .signals()
            .item_modified
            .connect(move |change| recv.lock().push(*change));
        changes
    }

    #[test]
    fn test_text_and_sub_items() {
        let (source, _files) = source_with_columns();

        assert_eq!(ListViewItemView::text(&source, 0), "a.txt");
        assert_eq!(source.sub_item(0, 0), "12");
        assert_eq!(source.sub_item(1, 1), "file");
        assert_eq!(source.sub_item(1, 2), "");
        assert_eq!(source.sub_item(2, 0), "");
        assert_eq!(source.primary_text(1), "b.bin");
        assert_eq!(source.column_count(), 3);
        assert_eq!(source.column_text(1), "Size");
        assert_eq!(source.column_text(3), "");
    }

    #[test]
    fn test_text_without_columns_is_empty() {
        let source = ListViewSource::new();
        source.set_item_source(Some(ItemSource::observable(Arc::new(
            ObservableVec::from_values(vec![file("a", 1, None)]),
        ))));
        assert_eq!(ListViewItemView::text(&source, 0), "");
    }

    #[test]
    fn test_images() {
        let (source, _files) = source_with_columns();
        source.set_small_image_property("icon");

        assert_eq!(
            source.small_image(0).map(|i| i.source.clone()),
            Some("text.png".to_string())
        );
        assert!(source.small_image(1).is_none());
        assert!(source.large_image(0).is_none());
        assert!(source.small_image(9).is_none());
    }

    #[test]
    fn test_column_metadata_out_of_range() {
        let (source, _files) = source_with_columns();

        assert_eq!(source.column_size(0), 160);
        assert_eq!(source.column_size(7), 0);
        assert_eq!(source.sorting_state(7), SortingState::NotSorted);
        assert!(source.dropdown_popup(7).is_none());
        source.set_column_size(7, 10);
    }

    #[test]
    fn test_column_changes_are_forwarded() {
        let (source, _files) = source_with_columns();
        let count = Arc::new(Mutex::new(0));
        let recv = count.clone();
        source
            .column_changed()
            .connect(move |_| *recv.lock() += 1);

        source.set_column_size(0, 90);
        source.columns().remove_at(2);
        source.notify_all_columns_update();

        assert_eq!(source.column_size(0), 90);
        assert_eq!(*count.lock(), 3);
    }

    #[test]
    fn test_notify_update_validation() {
        let (source, _files) = source_with_columns();
        let changes = record_changes(&source);

        assert!(source.notify_update(0, 2));
        assert!(source.notify_update(1, 1));
        assert!(!source.notify_update(1, 2));
        assert!(!source.notify_update(0, 0));
        assert!(!source.notify_update(2, 1));
        source.notify_all_items_update();

        assert_eq!(
            *changes.lock(),
            vec![
                RangeChange::new(0, 2, 2),
                RangeChange::new(1, 1, 1),
                RangeChange::new(0, 2, 2),
            ]
        );
    }

    #[test]
    fn test_data_columns() {
        let (source, _files) = source_with_columns();
        let changes = record_changes(&source);

        source.set_data_columns(vec![1, 2]);
        assert_eq!(source.data_column_count(), 2);
        assert_eq!(source.data_column(1), Some(2));
        assert_eq!(source.data_column(2), None);
        assert_eq!(*changes.lock(), vec![RangeChange::new(0, 2, 2)]);
    }

    #[test]
    fn test_request_view() {
        let source = ListViewSource::new();
        assert!(matches!(
            source.request_view(ViewKind::ColumnItem),
            Some(ItemView::ColumnItem(_))
        ));
        assert!(source.request_view(ViewKind::TextItem).is_none());
    }
}
