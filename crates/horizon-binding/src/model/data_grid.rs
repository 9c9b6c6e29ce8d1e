//! Tabular adapter for data grids.
//!
//! A [`BindableDataProvider`] binds one item source as rows. Each
//! [`BindableDataColumn`] reads and writes one named property of every row.
//! The grid control receives notifications through a
//! [`DataProviderCommandExecutor`] it installs on the provider.
//!
//! A column belongs to at most one provider at a time. The provider sets
//! the column's back-reference when the column is added and clears it when
//! the column is removed.

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_binding_core::logging::targets;
use horizon_binding_core::{ItemSource, Property, Signal, Value};
use parking_lot::RwLock;

use super::accessor::{read_property, write_property};
use super::bound_list::{CollectionBinding, validate_update_range};

/// Receives change notifications from a data provider.
///
/// Implemented by the grid control that displays the provider.
pub trait DataProviderCommandExecutor: Send + Sync {
    /// `old_count` rows starting at `start` were replaced by `new_count` rows.
    fn on_data_provider_item_modified(&self, start: usize, old_count: usize, new_count: usize);

    /// Column membership or a column's binding changed.
    fn on_data_provider_column_changed(&self);
}

/// One column of a data grid, bound to a named row property.
pub struct BindableDataColumn {
    text: Property<String>,
    size: Property<i32>,
    value_property: Property<String>,
    data_provider: RwLock<Weak<BindableDataProvider>>,
    value_property_changed: Signal<String>,
}

impl Default for BindableDataColumn {
    fn default() -> Self {
        Self::new("")
    }
}

impl BindableDataColumn {
    /// Creates a detached column with the given header text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Property::new(text.into()),
            size: Property::new(super::columns::DEFAULT_COLUMN_SIZE),
            value_property: Property::default(),
            data_provider: RwLock::new(Weak::new()),
            value_property_changed: Signal::new(),
        }
    }

    /// Sets the value property while building.
    pub fn with_value_property(self, name: impl Into<String>) -> Self {
        self.value_property.set_silent(name.into());
        self
    }

    /// Header text.
    pub fn text(&self) -> String {
        self.text.get()
    }

    /// Sets the header text.
    pub fn set_text(&self, text: impl Into<String>) {
        if self.text.set(text.into()) {
            self.notify_column_changed();
        }
    }

    /// Width in pixels.
    pub fn size(&self) -> i32 {
        self.size.get()
    }

    /// Sets the width.
    pub fn set_size(&self, size: i32) {
        if self.size.set(size) {
            self.notify_column_changed();
        }
    }

    /// Emitted with the new name when the value property changes.
    pub fn value_property_changed(&self) -> &Signal<String> {
        &self.value_property_changed
    }

    /// The provider this column is attached to.
    pub fn data_provider(&self) -> Option<Arc<BindableDataProvider>> {
        self.data_provider.read().upgrade()
    }

    /// Name of the row property shown in this column.
    pub fn value_property(&self) -> String {
        self.value_property.get()
    }

    /// Sets the row property, notifying the grid if it changed.
    pub fn set_value_property(&self, name: impl Into<String>) {
        let name = name.into();
        if self.value_property.set(name.clone()) {
            self.notify_column_changed();
            self.value_property_changed.emit(name);
        }
    }

    fn notify_column_changed(&self) {
        if let Some(provider) = self.data_provider() {
            provider.notify_column_changed();
        }
    }

    /// The cell value of `row`, or `Null` if detached or out of range.
    pub fn cell_value(&self, row: usize) -> Value {
        match self.data_provider() {
            Some(provider) if row < provider.row_count() => {
                read_property(&provider.row_value(row), &self.value_property.get())
            }
            _ => Value::Null,
        }
    }

    /// Writes the cell value of `row` without notifying.
    pub fn set_cell_value(&self, row: usize, value: Value) {
        if let Some(provider) = self.data_provider() {
            if row < provider.row_count() {
                write_property(&provider.row_value(row), &self.value_property.get(), value);
            }
        }
    }

    /// The cell value of `row` as display text.
    pub fn cell_text(&self, row: usize) -> String {
        self.cell_value(row).text()
    }

    /// Commits an edited cell: writes the value, then reports row `row` as
    /// modified.
    pub fn save_cell_data(&self, row: usize, value: Value) {
        self.set_cell_value(row, value);
        if let Some(provider) = self.data_provider() {
            provider.notify_item_modified(row, 1, 1);
        }
    }

    /// The view-model context of the owning provider, `Null` if detached.
    pub fn view_model_context(&self) -> Value {
        self.data_provider()
            .map(|provider| provider.view_model_context().clone())
            .unwrap_or_default()
    }
}

impl fmt::Debug for BindableDataColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindableDataColumn")
            .field("text", &self.text())
            .field("value_property", &self.value_property())
            .field("attached", &self.data_provider().is_some())
            .finish()
    }
}

/// Adapts an item source as the rows of a data grid.
pub struct BindableDataProvider {
    self_ref: Weak<BindableDataProvider>,
    view_model_context: Value,
    executor: RwLock<Option<Arc<dyn DataProviderCommandExecutor>>>,
    binding: RwLock<CollectionBinding>,
    columns: RwLock<Vec<Arc<BindableDataColumn>>>,
}

impl BindableDataProvider {
    /// Creates a provider with no rows and no columns.
    ///
    /// `view_model_context` is fixed for the provider's lifetime and shared
    /// with every column.
    pub fn new(view_model_context: Value) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            self_ref: weak.clone(),
            view_model_context,
            executor: RwLock::new(None),
            binding: RwLock::new(CollectionBinding::new()),
            columns: RwLock::new(Vec::new()),
        })
    }

    /// Installs the receiver of change notifications.
    pub fn set_command_executor(&self, executor: Option<Arc<dyn DataProviderCommandExecutor>>) {
        *self.executor.write() = executor;
    }

    /// The installed receiver of change notifications.
    pub fn command_executor(&self) -> Option<Arc<dyn DataProviderCommandExecutor>> {
        self.executor.read().clone()
    }

    /// The context value shared with every column.
    pub fn view_model_context(&self) -> &Value {
        &self.view_model_context
    }

    fn notify_item_modified(&self, start: usize, old_count: usize, new_count: usize) {
        match self.command_executor() {
            Some(executor) => executor.on_data_provider_item_modified(start, old_count, new_count),
            None => tracing::trace!(target: targets::GRID, start, old_count, new_count, "no command executor installed"),
        }
    }

    fn notify_column_changed(&self) {
        if let Some(executor) = self.command_executor() {
            executor.on_data_provider_column_changed();
        }
    }

    /// The bound item source.
    pub fn item_source(&self) -> Option<ItemSource> {
        self.binding.read().item_source()
    }

    /// Replaces the bound item source and announces `(0, old, new)`.
    #[tracing::instrument(skip_all, name = "horizon_binding::rebind", target = "horizon_binding::grid", level = "debug")]
    pub fn set_item_source(&self, source: Option<ItemSource>) {
        let weak = self.self_ref.clone();
        let change = self.binding.write().rebind(source, move |change| {
            if let Some(provider) = weak.upgrade() {
                provider.notify_item_modified(change.start, change.old_count, change.new_count);
            }
        });
        self.notify_item_modified(change.start, change.old_count, change.new_count);
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.binding.read().count()
    }

    /// The record of `row`, or `Null` out of range.
    pub fn row_value(&self, row: usize) -> Value {
        self.binding.read().get(row)
    }

    /// Announces `count` rows starting at `start` as modified.
    ///
    /// Returns `false` without notifying if the range is empty or does not
    /// fit the current row count.
    pub fn notify_update(&self, start: usize, count: usize) -> bool {
        match validate_update_range(start, count, self.row_count()) {
            Ok(change) => {
                self.notify_item_modified(change.start, change.old_count, change.new_count);
                true
            }
            Err(err) => {
                tracing::trace!(target: targets::GRID, %err, "rejected update request");
                false
            }
        }
    }

    fn can_attach(&self, column: &Arc<BindableDataColumn>) -> bool {
        column.data_provider.read().strong_count() == 0
            && !self.columns.read().iter().any(|c| Arc::ptr_eq(c, column))
    }

    fn attach(&self, column: &BindableDataColumn) {
        *column.data_provider.write() = self.self_ref.clone();
    }

    /// Inserts `column` at `index`.
    ///
    /// Fails if the column is already attached to a provider or `index` is
    /// past the end.
    pub fn insert_column(&self, index: usize, column: Arc<BindableDataColumn>) -> bool {
        if !self.can_attach(&column) {
            return false;
        }
        {
            let mut columns = self.columns.write();
            if index > columns.len() {
                return false;
            }
            columns.insert(index, column.clone());
        }
        self.attach(&column);
        self.notify_column_changed();
        true
    }

    /// Appends `column`. Fails if the column is already attached.
    pub fn add_column(&self, column: Arc<BindableDataColumn>) -> bool {
        let index = self.column_count();
        self.insert_column(index, column)
    }

    /// Removes `column`. Fails if it is not a column of this provider.
    pub fn remove_column(&self, column: &Arc<BindableDataColumn>) -> bool {
        {
            let mut columns = self.columns.write();
            match columns.iter().position(|c| Arc::ptr_eq(c, column)) {
                Some(index) => {
                    columns.remove(index);
                }
                None => return false,
            }
        }
        *column.data_provider.write() = Weak::new();
        self.notify_column_changed();
        true
    }

    /// Removes every column.
    pub fn clear_columns(&self) -> bool {
        let removed = std::mem::take(&mut *self.columns.write());
        for column in &removed {
            *column.data_provider.write() = Weak::new();
        }
        self.notify_column_changed();
        true
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.read().len()
    }

    /// The column at `index`.
    pub fn bindable_column(&self, index: usize) -> Option<Arc<BindableDataColumn>> {
        self.columns.read().get(index).cloned()
    }

    /// A snapshot of all columns in order.
    pub fn columns(&self) -> Vec<Arc<BindableDataColumn>> {
        self.columns.read().clone()
    }

    /// Display text of the cell at (`row`, `column`).
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        self.bindable_column(column)
            .map(|c| c.cell_text(row))
            .unwrap_or_default()
    }

    /// The record of the selected row, or `Null` when nothing is selected.
    pub fn selected_row_value(&self, row: Option<usize>) -> Value {
        row.map_or(Value::Null, |row| self.row_value(row))
    }

    /// The value of the selected cell, or `Null` when nothing is selected.
    pub fn selected_cell_value(&self, cell: Option<(usize, usize)>) -> Value {
        cell.and_then(|(row, column)| {
            self.bindable_column(column).map(|c| c.cell_value(row))
        })
        .unwrap_or_default()
    }
}

impl fmt::Debug for BindableDataProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindableDataProvider")
            .field("rows", &self.row_count())
            .field("columns", &self.column_count())
            .field("has_executor", &self.executor.read().is_some())
            .finish()
    }
}

static_assertions::assert_impl_all!(BindableDataProvider: Send, Sync);
static_assertions::assert_impl_all!(BindableDataColumn: Send, Sync);
