//! Collection capabilities and adaptation.
//!
//! An external collection bound into a control has one of three capability
//! levels, in order of preference:
//!
//! 1. [`ObservableList`]: indexed access plus a range-mutation signal.
//! 2. [`ReadOnlyList`]: indexed access only.
//! 3. [`Enumerable`]: forward iteration only.
//!
//! [`ItemSource`] carries one of these. [`ItemSource::adapt`] produces an
//! [`AdaptedList`], which always supports indexed access: enumerables are
//! materialized into a [`ValueList`] snapshot, so later changes to the
//! original sequence are not seen.
//!
//! [`ObservableVec`] is a ready-made observable collection of [`Value`]s.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::logging::targets;
use crate::signal::Signal;
use crate::value::Value;

/// A range mutation: `old_count` items starting at `start` were replaced
/// by `new_count` items.
///
/// Insertions have `old_count == 0`, removals have `new_count == 0`, and
/// in-place updates have `old_count == new_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeChange {
    /// Index of the first affected item.
    pub start: usize,
    /// Number of items that were replaced.
    pub old_count: usize,
    /// Number of items that replaced them.
    pub new_count: usize,
}

impl RangeChange {
    /// Creates a range change.
    pub fn new(start: usize, old_count: usize, new_count: usize) -> Self {
        Self {
            start,
            old_count,
            new_count,
        }
    }

    /// A change spanning a whole collection, starting at 0.
    pub fn full(old_count: usize, new_count: usize) -> Self {
        Self::new(0, old_count, new_count)
    }
}

/// An indexable collection without change notifications.
pub trait ReadOnlyList: Send + Sync {
    /// Number of items.
    fn count(&self) -> usize;

    /// Item at `index`, or [`Value::Null`] if out of range.
    fn get(&self, index: usize) -> Value;

    /// This list as an observable list, if it also reports mutations.
    fn into_observable(self: Arc<Self>) -> Option<Arc<dyn ObservableList>> {
        None
    }
}

/// An indexable collection that reports range mutations.
pub trait ObservableList: ReadOnlyList {
    /// Emitted after every mutation, with the lock on the items released.
    fn item_changed(&self) -> &Signal<RangeChange>;
}

/// A collection that can only be iterated forward.
pub trait Enumerable: Send + Sync {
    /// Iterates over the current items.
    fn enumerate(&self) -> Box<dyn Iterator<Item = Value> + '_>;

    /// This sequence as an observable list, if it is one.
    fn as_observable_list(self: Arc<Self>) -> Option<Arc<dyn ObservableList>> {
        None
    }

    /// This sequence as an indexable list, if it is one.
    fn as_read_only_list(self: Arc<Self>) -> Option<Arc<dyn ReadOnlyList>> {
        None
    }
}

/// An external collection, tagged with its strongest capability.
#[derive(Clone)]
pub enum ItemSource {
    /// Indexed, observable collection.
    Observable(Arc<dyn ObservableList>),
    /// Indexed collection without notifications.
    List(Arc<dyn ReadOnlyList>),
    /// Forward-only sequence.
    Enumerable(Arc<dyn Enumerable>),
}

impl ItemSource {
    /// Wraps an observable collection.
    pub fn observable<L: ObservableList + 'static>(list: Arc<L>) -> Self {
        ItemSource::Observable(list)
    }

    /// Wraps a read-only list.
    pub fn list<L: ReadOnlyList + 'static>(list: Arc<L>) -> Self {
        ItemSource::List(list)
    }

    /// Wraps a forward-only sequence.
    pub fn enumerable<E: Enumerable + 'static>(items: Arc<E>) -> Self {
        ItemSource::Enumerable(items)
    }

    /// Adapts to an indexable list.
    ///
    /// The strongest capability the collection actually has wins, whatever
    /// it was tagged with: observable, then indexable. A plain enumerable is
    /// materialized into a snapshot.
    pub fn adapt(&self) -> AdaptedList {
        match self {
            ItemSource::Observable(list) => AdaptedList::Observable(list.clone()),
            ItemSource::List(list) => match list.clone().into_observable() {
                Some(observable) => AdaptedList::Observable(observable),
                None => AdaptedList::List(list.clone()),
            },
            ItemSource::Enumerable(items) => {
                if let Some(observable) = items.clone().as_observable_list() {
                    return AdaptedList::Observable(observable);
                }
                if let Some(list) = items.clone().as_read_only_list() {
                    return AdaptedList::List(list);
                }
                let snapshot: ValueList = items.enumerate().collect();
                tracing::trace!(
                    target: targets::COLLECTION,
                    count = snapshot.len(),
                    "materialized enumerable item source"
                );
                AdaptedList::List(Arc::new(snapshot))
            }
        }
    }

    /// Returns `true` if both sources wrap the same collection.
    pub fn same_source(&self, other: &ItemSource) -> bool {
        std::ptr::addr_eq(self.data_ptr(), other.data_ptr())
    }

    fn data_ptr(&self) -> *const () {
        match self {
            ItemSource::Observable(list) => Arc::as_ptr(list) as *const (),
            ItemSource::List(list) => Arc::as_ptr(list) as *const (),
            ItemSource::Enumerable(items) => Arc::as_ptr(items) as *const (),
        }
    }

    fn capability(&self) -> &'static str {
        match self {
            ItemSource::Observable(_) => "observable",
            ItemSource::List(_) => "list",
            ItemSource::Enumerable(_) => "enumerable",
        }
    }
}

impl fmt::Debug for ItemSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemSource")
            .field("capability", &self.capability())
            .field("ptr", &self.data_ptr())
            .finish()
    }
}

impl<L: ObservableList + 'static> From<Arc<L>> for ItemSource {
    fn from(list: Arc<L>) -> Self {
        ItemSource::Observable(list)
    }
}

/// An item source after adaptation: always indexable.
#[derive(Clone)]
pub enum AdaptedList {
    /// Observable collection; adapters subscribe to its signal.
    Observable(Arc<dyn ObservableList>),
    /// Static indexable collection.
    List(Arc<dyn ReadOnlyList>),
}

impl AdaptedList {
    /// An empty static list.
    pub fn empty() -> Self {
        AdaptedList::List(Arc::new(ValueList::default()))
    }

    /// Number of items.
    pub fn count(&self) -> usize {
        match self {
            AdaptedList::Observable(list) => list.count(),
            AdaptedList::List(list) => list.count(),
        }
    }

    /// Item at `index`, or [`Value::Null`] if out of range.
    pub fn get(&self, index: usize) -> Value {
        match self {
            AdaptedList::Observable(list) => list.get(index),
            AdaptedList::List(list) => list.get(index),
        }
    }

    /// The observable collection, if this list can report mutations.
    pub fn observable(&self) -> Option<&Arc<dyn ObservableList>> {
        match self {
            AdaptedList::Observable(list) => Some(list),
            AdaptedList::List(_) => None,
        }
    }

    /// Converts back into an item source.
    pub fn to_item_source(&self) -> ItemSource {
        match self {
            AdaptedList::Observable(list) => ItemSource::Observable(list.clone()),
            AdaptedList::List(list) => ItemSource::List(list.clone()),
        }
    }
}

impl fmt::Debug for AdaptedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            AdaptedList::Observable(_) => "Observable",
            AdaptedList::List(_) => "List",
        };
        f.debug_struct("AdaptedList")
            .field("kind", &kind)
            .field("count", &self.count())
            .finish()
    }
}

/// An immutable list of values.
///
/// Used as the snapshot of a materialized enumerable, and handy for binding
/// static data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueList {
    items: Vec<Value>,
}

impl ValueList {
    /// Creates a list from values.
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items as a slice.
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}

impl ReadOnlyList for ValueList {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Value {
        self.items.get(index).cloned().unwrap_or_default()
    }
}

impl Enumerable for ValueList {
    fn enumerate(&self) -> Box<dyn Iterator<Item = Value> + '_> {
        Box::new(self.items.iter().cloned())
    }

    fn as_read_only_list(self: Arc<Self>) -> Option<Arc<dyn ReadOnlyList>> {
        Some(self)
    }
}

impl FromIterator<Value> for ValueList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A mutable, observable list of values.
///
/// Every mutation emits [`ObservableList::item_changed`] once, after the
/// internal lock has been released, so handlers can read the list back.
/// Out-of-range mutations are ignored and emit nothing.
pub struct ObservableVec {
    items: RwLock<Vec<Value>>,
    item_changed: Signal<RangeChange>,
}

impl Default for ObservableVec {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservableVec {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::from_values(Vec::new())
    }

    /// Creates a list holding `items`.
    pub fn from_values(items: Vec<Value>) -> Self {
        Self {
            items: RwLock::new(items),
            item_changed: Signal::new(),
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Returns a copy of the current items.
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.read().clone()
    }

    fn notify(&self, change: RangeChange) {
        tracing::trace!(
            target: targets::COLLECTION,
            start = change.start,
            old_count = change.old_count,
            new_count = change.new_count,
            "observable list changed"
        );
        self.item_changed.emit(change);
    }

    /// Appends an item.
    pub fn push(&self, item: impl Into<Value>) {
        let start = {
            let mut items = self.items.write();
            items.push(item.into());
            items.len() - 1
        };
        self.notify(RangeChange::new(start, 0, 1));
    }

    /// Inserts an item at `index`. Returns `false` if `index > len()`.
    pub fn insert(&self, index: usize, item: impl Into<Value>) -> bool {
        {
            let mut items = self.items.write();
            if index > items.len() {
                return false;
            }
            items.insert(index, item.into());
        }
        self.notify(RangeChange::new(index, 0, 1));
        true
    }

    /// Removes and returns the item at `index`.
    pub fn remove(&self, index: usize) -> Option<Value> {
        let removed = {
            let mut items = self.items.write();
            if index >= items.len() {
                return None;
            }
            items.remove(index)
        };
        self.notify(RangeChange::new(index, 1, 0));
        Some(removed)
    }

    /// Replaces the item at `index`, returning the previous one.
    pub fn set(&self, index: usize, item: impl Into<Value>) -> Option<Value> {
        let previous = {
            let mut items = self.items.write();
            let slot = items.get_mut(index)?;
            std::mem::replace(slot, item.into())
        };
        self.notify(RangeChange::new(index, 1, 1));
        Some(previous)
    }

    /// Replaces `old_count` items starting at `start` with `items`.
    ///
    /// Returns `false`, leaving the list untouched, if the range does not
    /// fit the current length.
    pub fn splice(&self, start: usize, old_count: usize, items: Vec<Value>) -> bool {
        let new_count = items.len();
        {
            let mut current = self.items.write();
            match start.checked_add(old_count) {
                Some(end) if end <= current.len() => {
                    current.splice(start..end, items);
                }
                _ => return false,
            }
        }
        self.notify(RangeChange::new(start, old_count, new_count));
        true
    }

    /// Removes every item.
    pub fn clear(&self) {
        let old_count = std::mem::take(&mut *self.items.write()).len();
        self.notify(RangeChange::full(old_count, 0));
    }

    /// Replaces the whole contents.
    pub fn replace_all(&self, items: Vec<Value>) {
        let new_count = items.len();
        let old_count = std::mem::replace(&mut *self.items.write(), items).len();
        self.notify(RangeChange::full(old_count, new_count));
    }

    /// Re-announces the item at `index` as changed without modifying it.
    ///
    /// Useful after mutating a record in place.
    pub fn touch(&self, index: usize) -> bool {
        if index >= self.len() {
            return false;
        }
        self.notify(RangeChange::new(index, 1, 1));
        true
    }
}

impl ReadOnlyList for ObservableVec {
    fn count(&self) -> usize {
        self.len()
    }

    fn get(&self, index: usize) -> Value {
        self.items.read().get(index).cloned().unwrap_or_default()
    }

    fn into_observable(self: Arc<Self>) -> Option<Arc<dyn ObservableList>> {
        Some(self)
    }
}

impl ObservableList for ObservableVec {
    fn item_changed(&self) -> &Signal<RangeChange> {
        &self.item_changed
    }
}

impl Enumerable for ObservableVec {
    fn enumerate(&self) -> Box<dyn Iterator<Item = Value> + '_> {
        Box::new(self.to_vec().into_iter())
    }

    fn as_observable_list(self: Arc<Self>) -> Option<Arc<dyn ObservableList>> {
        Some(self)
    }

    fn as_read_only_list(self: Arc<Self>) -> Option<Arc<dyn ReadOnlyList>> {
        Some(self)
    }
}

impl fmt::Debug for ObservableVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableVec")
            .field("len", &self.len())
            .field("item_changed", &self.item_changed)
            .finish()
    }
}

static_assertions::assert_impl_all!(ObservableVec: Send, Sync);
static_assertions::assert_impl_all!(ItemSource: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Countdown(usize);

    impl Enumerable for Countdown {
        fn enumerate(&self) -> Box<dyn Iterator<Item = Value> + '_> {
            Box::new((0..self.0).rev().map(|n| Value::Int(n as i64)))
        }
    }

    fn record_changes(list: &ObservableVec) -> Arc<Mutex<Vec<RangeChange>>> {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let recv = changes.clone();
        list.item_changed().connect(move |change| recv.lock().push(*change));
        changes
    }

    #[test]
    fn test_mutations_emit_range_changes() {
        let list = ObservableVec::from_values(vec![Value::from("a"), Value::from("b")]);
        let changes = record_changes(&list);

        list.push("c");
        assert!(list.insert(0, "z"));
        assert_eq!(list.remove(1), Some(Value::from("a")));
        assert_eq!(list.set(0, "y"), Some(Value::from("z")));
        assert!(list.splice(1, 2, vec![Value::from(1), Value::from(2), Value::from(3)]));
        list.clear();

        assert_eq!(
            *changes.lock(),
            vec![
                RangeChange::new(2, 0, 1),
                RangeChange::new(0, 0, 1),
                RangeChange::new(1, 1, 0),
                RangeChange::new(0, 1, 1),
                RangeChange::new(1, 2, 3),
                RangeChange::new(0, 4, 0),
            ]
        );
    }

    #[test]
    fn test_out_of_range_mutations_are_ignored() {
        let list = ObservableVec::from_values(vec![Value::from(1)]);
        let changes = record_changes(&list);

        assert!(!list.insert(5, 0));
        assert_eq!(list.remove(1), None);
        assert_eq!(list.set(3, 0), None);
        assert!(!list.splice(1, 1, Vec::new()));
        assert!(!list.touch(1));

        assert!(changes.lock().is_empty());
        assert_eq!(list.get(7), Value::Null);
    }

    #[test]
    fn test_handler_can_read_list_during_emit() {
        let list = Arc::new(ObservableVec::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner = list.clone();
        let recv = seen.clone();
        list.item_changed().connect(move |_| recv.lock().push(inner.count()));

        list.push(1);
        list.push(2);
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_adapt_prefers_strongest_capability() {
        let observable = Arc::new(ObservableVec::from_values(vec![Value::from(1)]));
        let adapted = ItemSource::observable(observable.clone()).adapt();
        assert!(adapted.observable().is_some());

        let static_list = Arc::new(ValueList::new(vec![Value::from(1), Value::from(2)]));
        let adapted = ItemSource::list(static_list).adapt();
        assert!(adapted.observable().is_none());
        assert_eq!(adapted.count(), 2);
    }

    #[test]
    fn test_adapt_upgrades_weaker_tags() {
        let observable = Arc::new(ObservableVec::from_values(vec![Value::from(1)]));

        let adapted = ItemSource::enumerable(observable.clone()).adapt();
        assert!(adapted.observable().is_some());
        observable.push(2);
        assert_eq!(adapted.count(), 2);

        let adapted = ItemSource::list(observable.clone()).adapt();
        assert!(adapted.observable().is_some());

        let static_list = Arc::new(ValueList::new(vec![Value::from("a")]));
        let source = ItemSource::enumerable(static_list);
        let adapted = source.adapt();
        assert!(adapted.observable().is_none());
        assert!(adapted.to_item_source().same_source(&source));
    }

    #[test]
    fn test_enumerable_is_snapshotted() {
        let source = ItemSource::enumerable(Arc::new(Countdown(3)));
        let adapted = source.adapt();

        assert!(adapted.observable().is_none());
        assert_eq!(adapted.count(), 3);
        assert_eq!(adapted.get(0), Value::Int(2));
        assert_eq!(adapted.get(2), Value::Int(0));
        assert_eq!(adapted.get(3), Value::Null);
        assert!(!adapted.to_item_source().same_source(&source));
    }

    #[test]
    fn test_same_source_identity() {
        let list = Arc::new(ObservableVec::new());
        let a = ItemSource::observable(list.clone());
        let b: ItemSource = list.into();
        let c = ItemSource::observable(Arc::new(ObservableVec::new()));

        assert!(a.same_source(&b));
        assert!(!a.same_source(&c));
        assert_eq!(Value::from(a.clone()), Value::from(b));
        assert_ne!(Value::from(a), Value::from(c));
    }
}
