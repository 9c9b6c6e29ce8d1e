//! The collection binding shared by the flat and tabular adapters.

use horizon_binding_core::logging::targets;
use horizon_binding_core::{
    AdaptedList, BindingError, ConnectionId, ItemSource, RangeChange, Result, Value,
};

/// Checks a manual update request against the current row count.
///
/// The range must be non-empty and lie within `[0, row_count)`.
pub(crate) fn validate_update_range(
    start: usize,
    count: usize,
    row_count: usize,
) -> Result<RangeChange> {
    let in_bounds = start < row_count
        && count > 0
        && start.checked_add(count).is_some_and(|end| end <= row_count);
    if in_bounds {
        Ok(RangeChange::new(start, count, count))
    } else {
        Err(BindingError::InvalidRange {
            start,
            count,
            row_count,
        })
    }
}

/// Holds the adapted item source of a flat adapter and its subscription.
///
/// Adapters keep this behind a lock and emit the [`RangeChange`] returned by
/// [`rebind`](Self::rebind) only after releasing it.
#[derive(Default)]
pub(crate) struct CollectionBinding {
    list: Option<AdaptedList>,
    connection: Option<ConnectionId>,
}

impl CollectionBinding {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn count(&self) -> usize {
        self.list.as_ref().map_or(0, AdaptedList::count)
    }

    /// Item at `index`, or `Null` outside `[0, count)`.
    pub(crate) fn get(&self, index: usize) -> Value {
        match &self.list {
            Some(list) if index < list.count() => list.get(index),
            _ => Value::Null,
        }
    }

    /// The adapted source. For an enumerable this is the snapshot.
    pub(crate) fn item_source(&self) -> Option<ItemSource> {
        self.list.as_ref().map(AdaptedList::to_item_source)
    }

    /// Replaces the bound source.
    ///
    /// Captures the old count, drops the old subscription, adopts `source`
    /// (subscribing `on_change` if it is observable) and returns the
    /// full-range change to announce.
    pub(crate) fn rebind<F>(&mut self, source: Option<ItemSource>, on_change: F) -> RangeChange
    where
        F: Fn(&RangeChange) + Send + Sync + 'static,
    {
        let old_count = self.count();
        self.detach();

        self.list = source.as_ref().map(ItemSource::adapt);
        if let Some(observable) = self.list.as_ref().and_then(AdaptedList::observable) {
            self.connection = Some(observable.item_changed().connect(on_change));
        }

        let change = RangeChange::full(old_count, self.count());
        tracing::debug!(
            target: targets::COLLECTION,
            old_count = change.old_count,
            new_count = change.new_count,
            observable = self.connection.is_some(),
            "rebound item source"
        );
        change
    }

    fn detach(&mut self) {
        if let (Some(id), Some(observable)) = (
            self.connection.take(),
            self.list.as_ref().and_then(AdaptedList::observable),
        ) {
            observable.item_changed().disconnect(id);
        }
        self.list = None;
    }
}

impl Drop for CollectionBinding {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_binding_core::{ObservableList, ObservableVec, ValueList};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_rebind_reports_old_and_new_counts() {
        let mut binding = CollectionBinding::new();
        let first = Arc::new(ValueList::new(vec![Value::from(1), Value::from(2)]));

        assert_eq!(
            binding.rebind(Some(ItemSource::list(first)), |_| {}),
            RangeChange::full(0, 2)
        );
        assert_eq!(binding.rebind(None, |_| {}), RangeChange::full(2, 0));
        assert_eq!(binding.rebind(None, |_| {}), RangeChange::full(0, 0));
    }

    #[test]
    fn test_rebind_moves_subscription() {
        let mut binding = CollectionBinding::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let old = Arc::new(ObservableVec::new());
        let new = Arc::new(ObservableVec::new());

        let recv = seen.clone();
        binding.rebind(Some(ItemSource::observable(old.clone())), move |c| {
            recv.lock().push(*c)
        });
        assert_eq!(old.item_changed().connection_count(), 1);

        binding.rebind(Some(ItemSource::observable(new.clone())), |_| {});
        assert_eq!(old.item_changed().connection_count(), 0);
        assert_eq!(new.item_changed().connection_count(), 1);

        old.push(1);
        assert!(seen.lock().is_empty());

        drop(binding);
        assert_eq!(new.item_changed().connection_count(), 0);
    }

    #[test]
    fn test_validate_update_range() {
        assert_eq!(validate_update_range(1, 2, 3), Ok(RangeChange::new(1, 2, 2)));
        assert!(validate_update_range(0, 0, 3).is_err());
        assert!(validate_update_range(2, 2, 3).is_err());
        assert!(validate_update_range(3, 1, 3).is_err());
        assert!(validate_update_range(0, 1, 0).is_err());
        assert!(validate_update_range(1, usize::MAX, 3).is_err());
    }

    #[test]
    fn test_get_is_bounds_checked() {
        let mut binding = CollectionBinding::new();
        assert_eq!(binding.get(0), Value::Null);
        binding.rebind(
            Some(ItemSource::list(Arc::new(ValueList::new(vec![Value::from("a")])))),
            |_| {},
        );
        assert_eq!(binding.get(0), Value::from("a"));
        assert_eq!(binding.get(1), Value::Null);
    }
}
