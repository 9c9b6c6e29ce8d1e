//! Columns of a list view.
//!
//! Column 0 supplies an item's main text; column `n + 1` supplies its `n`-th
//! sub-item. Each column reads its cell text through its own text property.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use horizon_binding_core::{ConnectionId, Property, Signal};
use parking_lot::RwLock;

/// Default width of a new column.
pub const DEFAULT_COLUMN_SIZE: i32 = 160;

/// An opaque handle to a popup menu owned by the control layer.
pub type PopupHandle = Arc<dyn Any + Send + Sync>;

/// Sorting indicator shown in a column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortingState {
    /// No indicator.
    #[default]
    NotSorted,
    /// Sorted ascending.
    Ascending,
    /// Sorted descending.
    Descending,
}

/// One column of a list view.
pub struct ListViewColumn {
    text: Property<String>,
    text_property: Property<String>,
    size: Property<i32>,
    sorting_state: Property<SortingState>,
    dropdown_popup: RwLock<Option<PopupHandle>>,
    changed: Signal<()>,
}

impl ListViewColumn {
    /// Creates a column with the given header text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Property::new(text.into()),
            text_property: Property::default(),
            size: Property::new(DEFAULT_COLUMN_SIZE),
            sorting_state: Property::default(),
            dropdown_popup: RwLock::new(None),
            changed: Signal::new(),
        }
    }

    /// Sets the text property while building.
    pub fn with_text_property(self, name: impl Into<String>) -> Self {
        self.text_property.set_silent(name.into());
        self
    }

    /// Sets the width while building.
    pub fn with_size(self, size: i32) -> Self {
        self.size.set_silent(size);
        self
    }

    /// Emitted after any attribute of this column changes.
    pub fn changed(&self) -> &Signal<()> {
        &self.changed
    }

    fn notify_if(&self, changed: bool) {
        if changed {
            self.changed.emit(());
        }
    }

    /// Header text.
    pub fn text(&self) -> String {
        self.text.get()
    }

    /// Sets the header text.
    pub fn set_text(&self, text: impl Into<String>) {
        self.notify_if(self.text.set(text.into()));
    }

    /// Name of the record property shown in this column.
    pub fn text_property(&self) -> String {
        self.text_property.get()
    }

    /// Sets the record property shown in this column.
    pub fn set_text_property(&self, name: impl Into<String>) {
        self.notify_if(self.text_property.set(name.into()));
    }

    /// Width in pixels.
    pub fn size(&self) -> i32 {
        self.size.get()
    }

    /// Sets the width.
    pub fn set_size(&self, size: i32) {
        self.notify_if(self.size.set(size));
    }

    /// Sorting indicator.
    pub fn sorting_state(&self) -> SortingState {
        self.sorting_state.get()
    }

    /// Sets the sorting indicator.
    pub fn set_sorting_state(&self, state: SortingState) {
        self.notify_if(self.sorting_state.set(state));
    }

    /// The dropdown popup attached to the header.
    pub fn dropdown_popup(&self) -> Option<PopupHandle> {
        self.dropdown_popup.read().clone()
    }

    /// Attaches or removes the dropdown popup.
    pub fn set_dropdown_popup(&self, popup: Option<PopupHandle>) {
        let changed = {
            let mut current = self.dropdown_popup.write();
            let same = match (&*current, &popup) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            };
            if !same {
                *current = popup;
            }
            !same
        };
        self.notify_if(changed);
    }
}

impl fmt::Debug for ListViewColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListViewColumn")
            .field("text", &self.text())
            .field("text_property", &self.text_property())
            .field("size", &self.size())
            .field("sorting_state", &self.sorting_state())
            .field("has_popup", &self.dropdown_popup.read().is_some())
            .finish()
    }
}

struct ColumnEntry {
    column: Arc<ListViewColumn>,
    connection: ConnectionId,
}

/// The ordered columns of a list view.
///
/// Membership changes and changes to any member column are reported through
/// [`columns_changed`](Self::columns_changed).
pub struct ListViewColumns {
    entries: RwLock<Vec<ColumnEntry>>,
    columns_changed: Arc<Signal<()>>,
}

impl Default for ListViewColumns {
    fn default() -> Self {
        Self::new()
    }
}

impl ListViewColumns {
    /// Creates an empty column set.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            columns_changed: Arc::new(Signal::new()),
        }
    }

    /// Emitted after the set or any of its columns changes.
    pub fn columns_changed(&self) -> &Signal<()> {
        &self.columns_changed
    }

    fn entry(&self, column: Arc<ListViewColumn>) -> ColumnEntry {
        let forward = self.columns_changed.clone();
        let connection = column.changed().connect(move |_| forward.emit(()));
        ColumnEntry { column, connection }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// The column at `index`.
    pub fn get(&self, index: usize) -> Option<Arc<ListViewColumn>> {
        self.entries.read().get(index).map(|e| e.column.clone())
    }

    /// Position of `column`, compared by identity.
    pub fn index_of(&self, column: &Arc<ListViewColumn>) -> Option<usize> {
        self.entries
            .read()
            .iter()
            .position(|e| Arc::ptr_eq(&e.column, column))
    }

    /// A snapshot of all columns in order.
    pub fn to_vec(&self) -> Vec<Arc<ListViewColumn>> {
        self.entries.read().iter().map(|e| e.column.clone()).collect()
    }

    /// Appends a column.
    pub fn add(&self, column: Arc<ListViewColumn>) {
        let entry = self.entry(column);
        self.entries.write().push(entry);
        self.columns_changed.emit(());
    }

    /// Inserts a column at `index`. Returns `false` if `index > len()`.
    pub fn insert(&self, index: usize, column: Arc<ListViewColumn>) -> bool {
        {
            let mut entries = self.entries.write();
            if index > entries.len() {
                return false;
            }
            entries.insert(index, self.entry(column));
        }
        self.columns_changed.emit(());
        true
    }

    /// Removes the first occurrence of `column`.
    pub fn remove(&self, column: &Arc<ListViewColumn>) -> bool {
        match self.index_of(column) {
            Some(index) => self.remove_at(index).is_some(),
            None => false,
        }
    }

    /// Removes and returns the column at `index`.
    pub fn remove_at(&self, index: usize) -> Option<Arc<ListViewColumn>> {
        let entry = {
            let mut entries = self.entries.write();
            if index >= entries.len() {
                return None;
            }
            entries.remove(index)
        };
        entry.column.changed().disconnect(entry.connection);
        self.columns_changed.emit(());
        Some(entry.column)
    }

    /// Removes every column.
    pub fn clear(&self) {
        let entries = std::mem::take(&mut *self.entries.write());
        for entry in &entries {
            entry.column.changed().disconnect(entry.connection);
        }
        self.columns_changed.emit(());
    }
}

impl Drop for ListViewColumns {
    fn drop(&mut self) {
        for entry in self.entries.get_mut().iter() {
            entry.column.changed().disconnect(entry.connection);
        }
    }
}

impl fmt::Debug for ListViewColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

static_assertions::assert_impl_all!(ListViewColumns: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn count_changes(columns: &ListViewColumns) -> Arc<Mutex<usize>> {
        let count = Arc::new(Mutex::new(0));
        let recv = count.clone();
        columns.columns_changed().connect(move |_| *recv.lock() += 1);
        count
    }

    #[test]
    fn test_column_defaults() {
        let column = ListViewColumn::new("Name");
        assert_eq!(column.text(), "Name");
        assert_eq!(column.text_property(), "");
        assert_eq!(column.size(), DEFAULT_COLUMN_SIZE);
        assert_eq!(column.sorting_state(), SortingState::NotSorted);
        assert!(column.dropdown_popup().is_none());
    }

    #[test]
    fn test_membership_changes_notify() {
        let columns = ListViewColumns::new();
        let changes = count_changes(&columns);
        let a = Arc::new(ListViewColumn::new("A"));
        let b = Arc::new(ListViewColumn::new("B"));

        columns.add(a.clone());
        assert!(columns.insert(0, b.clone()));
        assert!(!columns.insert(5, b.clone()));
        assert_eq!(columns.index_of(&a), Some(1));
        assert!(columns.remove(&b));
        assert!(!columns.remove(&b));
        columns.clear();

        assert!(columns.is_empty());
        assert_eq!(*changes.lock(), 4);
    }

    #[test]
    fn test_member_changes_are_forwarded_until_removed() {
        let columns = ListViewColumns::new();
        let changes = count_changes(&columns);
        let column = Arc::new(ListViewColumn::new("A"));
        columns.add(column.clone());

        column.set_size(80);
        column.set_size(80);
        column.set_sorting_state(SortingState::Descending);
        let popup: PopupHandle = Arc::new("menu");
        column.set_dropdown_popup(Some(popup.clone()));
        column.set_dropdown_popup(Some(popup));
        assert_eq!(*changes.lock(), 4);

        columns.remove_at(0);
        column.set_text("renamed");
        assert_eq!(*changes.lock(), 5);
        assert_eq!(column.changed().connection_count(), 0);
    }
}
