//! Hierarchical adapter for tree views.
//!
//! [`TreeItemSource`] binds one root record. Every node reads its children
//! from its record through the shared children property, but only when a
//! control first asks for them (child count, a child, or the number of
//! visible nodes). Until then a node is *unprepared*: no children have been
//! read and no subscription exists.
//!
//! When the children collection is observable, a prepared node subscribes
//! to it and replaces exactly the reported range of child nodes, bracketed
//! by [`TreeSignals::before_item_modified`] and
//! [`TreeSignals::after_item_modified`].
//!
//! # Ownership
//!
//! Parents own their children through `Arc`; children refer to their parent
//! through a `Weak`. The root is owned by the [`TreeItemSource`] and is
//! never displayed: visible index 0 is the root's first child.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use horizon_binding_core::logging::{span_names, targets};
use horizon_binding_core::{AdaptedList, ConnectionId, Property, RangeChange, Signal, Value};
use parking_lot::RwLock;

use super::accessor::read_property;
use super::image::ImageData;
use super::views::{
    NodeItemBindingView, NodeItemPrimaryTextView, NodeRootProvider, NodeView, NodeViewKind,
    TreeViewItemView,
};

/// A range of a node's children was replaced.
#[derive(Debug, Clone)]
pub struct NodeChange {
    /// The node whose children changed.
    pub node: Arc<ItemSourceNode>,
    /// Index of the first affected child.
    pub start: usize,
    /// Number of children before the change.
    pub old_count: usize,
    /// Number of children after the change.
    pub new_count: usize,
}

impl NodeChange {
    /// The change as a plain range, without the node.
    pub fn range(&self) -> RangeChange {
        RangeChange::new(self.start, self.old_count, self.new_count)
    }
}

/// Signals emitted by a [`TreeItemSource`] and all of its nodes.
#[derive(Debug, Default)]
pub struct TreeSignals {
    /// Emitted before a node's children are replaced.
    pub before_item_modified: Signal<NodeChange>,
    /// Emitted after a node's children are replaced.
    pub after_item_modified: Signal<NodeChange>,
    /// Emitted when a node is expanded.
    pub item_expanded: Signal<Arc<ItemSourceNode>>,
    /// Emitted when a node is collapsed.
    pub item_collapsed: Signal<Arc<ItemSourceNode>>,
    /// Emitted with the new name when the text property changes.
    pub text_property_changed: Signal<String>,
    /// Emitted with the new name when the image property changes.
    pub image_property_changed: Signal<String>,
    /// Emitted with the new name when the children property changes.
    pub children_property_changed: Signal<String>,
}

/// State shared by every node of one tree.
#[derive(Debug, Default)]
struct TreeContext {
    children_property: Property<String>,
    signals: TreeSignals,
}

/// The materialized children of a prepared node.
struct PreparedChildren {
    list: AdaptedList,
    connection: Option<ConnectionId>,
    nodes: Vec<Arc<ItemSourceNode>>,
}

impl PreparedChildren {
    fn detach(&mut self) {
        if let (Some(id), Some(observable)) = (self.connection.take(), self.list.observable()) {
            observable.item_changed().disconnect(id);
        }
    }
}

impl Drop for PreparedChildren {
    fn drop(&mut self) {
        self.detach();
    }
}

/// One node of a bound tree.
pub struct ItemSourceNode {
    self_ref: Weak<ItemSourceNode>,
    context: Arc<TreeContext>,
    parent: Weak<ItemSourceNode>,
    is_root: bool,
    record: RwLock<Value>,
    expanded: AtomicBool,
    children: RwLock<Option<PreparedChildren>>,
}

impl ItemSourceNode {
    fn new_root(context: Arc<TreeContext>) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            self_ref: weak.clone(),
            context,
            parent: Weak::new(),
            is_root: true,
            record: RwLock::new(Value::Null),
            expanded: AtomicBool::new(true),
            children: RwLock::new(None),
        })
    }

    fn new_child(&self, record: Value) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            self_ref: weak.clone(),
            context: self.context.clone(),
            parent: self.self_ref.clone(),
            is_root: false,
            record: RwLock::new(record),
            expanded: AtomicBool::new(false),
            children: RwLock::new(None),
        })
    }

    /// The record this node displays.
    pub fn item_source(&self) -> Value {
        self.record.read().clone()
    }

    /// Replaces the record and rebuilds the children.
    ///
    /// Both modification signals are emitted after the swap with
    /// `(self, 0, old_child_count, new_child_count)`.
    pub fn set_item_source(&self, record: Value) {
        let Some(this) = self.self_ref.upgrade() else {
            return;
        };
        let old_count = self.child_count();
        self.unprepare_children();
        *self.record.write() = record;
        let new_count = self.child_count();

        let change = NodeChange {
            node: this,
            start: 0,
            old_count,
            new_count,
        };
        self.context.signals.before_item_modified.emit(change.clone());
        self.context.signals.after_item_modified.emit(change);
    }

    /// Returns `true` for the hidden root node.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// The parent node, `None` for the root.
    pub fn parent(&self) -> Option<Arc<ItemSourceNode>> {
        self.parent.upgrade()
    }

    /// Whether the children are shown. Always `true` for the root.
    pub fn expanded(&self) -> bool {
        self.is_root || self.expanded.load(Ordering::SeqCst)
    }

    /// Expands or collapses the node. Ignored for the root.
    pub fn set_expanded(&self, expanded: bool) {
        if self.is_root || self.expanded.swap(expanded, Ordering::SeqCst) == expanded {
            return;
        }
        let Some(this) = self.self_ref.upgrade() else {
            return;
        };
        if expanded {
            self.context.signals.item_expanded.emit(this);
        } else {
            self.context.signals.item_collapsed.emit(this);
        }
    }

    /// Returns `true` if the children have been read.
    pub fn is_prepared(&self) -> bool {
        self.children.read().is_some()
    }

    /// Reads the children from the record, once.
    pub fn prepare_children(&self) {
        if self.is_prepared() {
            return;
        }
        let _span = tracing::debug_span!(target: targets::TREE, span_names::PREPARE_CHILDREN).entered();

        let property = self.context.children_property.get();
        let list = match read_property(&self.item_source(), &property) {
            Value::Collection(source) => source.adapt(),
            other => {
                tracing::trace!(
                    target: targets::TREE,
                    property = %property,
                    kind = ?other.kind(),
                    "children value is not a collection"
                );
                AdaptedList::empty()
            }
        };

        let mut children = self.children.write();
        if children.is_some() {
            return;
        }

        let nodes: Vec<_> = (0..list.count())
            .map(|index| self.new_child(list.get(index)))
            .collect();
        let connection = list.observable().map(|observable| {
            let weak = self.self_ref.clone();
            observable.item_changed().connect(move |change| {
                if let Some(node) = weak.upgrade() {
                    node.on_children_changed(*change);
                }
            })
        });
        tracing::debug!(
            target: targets::TREE,
            count = nodes.len(),
            observable = connection.is_some(),
            "prepared children"
        );

        *children = Some(PreparedChildren {
            list,
            connection,
            nodes,
        });
    }

    /// Drops the children and their subscriptions, recursively.
    pub fn unprepare_children(&self) {
        let Some(mut prepared) = self.children.write().take() else {
            return;
        };
        prepared.detach();
        for node in &prepared.nodes {
            node.unprepare_children();
        }
    }

    fn on_children_changed(self: &Arc<Self>, change: RangeChange) {
        if !self.is_prepared() {
            return;
        }
        let node_change = NodeChange {
            node: self.clone(),
            start: change.start,
            old_count: change.old_count,
            new_count: change.new_count,
        };
        self.context
            .signals
            .before_item_modified
            .emit(node_change.clone());

        let removed: Vec<Arc<ItemSourceNode>> = {
            let mut children = self.children.write();
            match children.as_mut() {
                Some(prepared) => {
                    let len = prepared.nodes.len();
                    let start = change.start.min(len);
                    let end = start.saturating_add(change.old_count).min(len);
                    let fresh: Vec<_> = (0..change.new_count)
                        .map(|offset| self.new_child(prepared.list.get(change.start + offset)))
                        .collect();
                    prepared.nodes.splice(start..end, fresh).collect()
                }
                None => Vec::new(),
            }
        };
        for node in &removed {
            node.unprepare_children();
        }

        self.context.signals.after_item_modified.emit(node_change);
    }

    /// Number of visible nodes in this subtree, counting this node.
    ///
    /// A collapsed node counts as 1 without reading its children.
    pub fn calculate_total_visible_nodes(&self) -> usize {
        if !self.expanded() {
            return 1;
        }
        1 + self
            .children()
            .iter()
            .map(|child| child.calculate_total_visible_nodes())
            .sum::<usize>()
    }

    /// Number of children, preparing them first.
    pub fn child_count(&self) -> usize {
        self.prepare_children();
        self.children
            .read()
            .as_ref()
            .map_or(0, |prepared| prepared.nodes.len())
    }

    /// The child at `index`, preparing the children first.
    pub fn child(&self, index: usize) -> Option<Arc<ItemSourceNode>> {
        self.prepare_children();
        self.children
            .read()
            .as_ref()
            .and_then(|prepared| prepared.nodes.get(index).cloned())
    }

    /// A snapshot of the children, preparing them first.
    pub fn children(&self) -> Vec<Arc<ItemSourceNode>> {
        self.prepare_children();
        self.children
            .read()
            .as_ref()
            .map(|prepared| prepared.nodes.clone())
            .unwrap_or_default()
    }
}

impl fmt::Debug for ItemSourceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemSourceNode")
            .field("record", &*self.record.read())
            .field("is_root", &self.is_root)
            .field("expanded", &self.expanded())
            .field("prepared", &self.is_prepared())
            .finish()
    }
}

/// Adapts a root record for a tree view.
pub struct TreeItemSource {
    context: Arc<TreeContext>,
    root: Arc<ItemSourceNode>,
    text_property: Property<String>,
    image_property: Property<String>,
}

impl Default for TreeItemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeItemSource {
    /// Creates an adapter with a null root record and empty property names.
    pub fn new() -> Self {
        let context = Arc::new(TreeContext::default());
        let root = ItemSourceNode::new_root(context.clone());
        Self {
            context,
            root,
            text_property: Property::default(),
            image_property: Property::default(),
        }
    }

    /// The adapter's signals, shared by all nodes.
    pub fn signals(&self) -> &TreeSignals {
        &self.context.signals
    }

    /// The hidden root node.
    pub fn root(&self) -> &Arc<ItemSourceNode> {
        &self.root
    }

    /// The root record.
    pub fn item_source(&self) -> Value {
        self.root.item_source()
    }

    /// Replaces the root record.
    #[tracing::instrument(skip_all, name = "horizon_binding::rebind", target = "horizon_binding::tree", level = "debug")]
    pub fn set_item_source(&self, record: Value) {
        self.root.set_item_source(record);
    }

    /// Name of the property supplying node text.
    pub fn text_property(&self) -> String {
        self.text_property.get()
    }

    /// Sets the text property, refreshing the top level if it changed.
    pub fn set_text_property(&self, name: impl Into<String>) {
        let name = name.into();
        if self.text_property.set(name.clone()) {
            self.update_binding_properties(false);
            self.signals().text_property_changed.emit(name);
        }
    }

    /// Name of the property supplying node images.
    pub fn image_property(&self) -> String {
        self.image_property.get()
    }

    /// Sets the image property, refreshing the top level if it changed.
    pub fn set_image_property(&self, name: impl Into<String>) {
        let name = name.into();
        if self.image_property.set(name.clone()) {
            self.update_binding_properties(false);
            self.signals().image_property_changed.emit(name);
        }
    }

    /// Name of the property supplying each node's children.
    pub fn children_property(&self) -> String {
        self.context.children_property.get()
    }

    /// Sets the children property, rebuilding the whole tree if it changed.
    pub fn set_children_property(&self, name: impl Into<String>) {
        let name = name.into();
        if self.context.children_property.set(name.clone()) {
            self.update_binding_properties(true);
            self.signals().children_property_changed.emit(name);
        }
    }

    /// Announces the root's children as modified.
    ///
    /// With `update_children`, the whole tree is unprepared first so that
    /// children are read again through the current children property.
    pub fn update_binding_properties(&self, update_children: bool) {
        let old_count = self.root.child_count();
        if update_children {
            self.root.unprepare_children();
        }
        let new_count = self.root.child_count();

        let change = NodeChange {
            node: self.root.clone(),
            start: 0,
            old_count,
            new_count,
        };
        self.signals().before_item_modified.emit(change.clone());
        self.signals().after_item_modified.emit(change);
    }

    /// The node shown at `visible_index`, counting expanded nodes in display
    /// order below the hidden root.
    pub fn request_node(&self, visible_index: usize) -> Option<Arc<ItemSourceNode>> {
        let mut remaining = visible_index;
        let mut current = self.root.clone();
        'descend: loop {
            for child in current.children() {
                if remaining == 0 {
                    return Some(child);
                }
                remaining -= 1;
                let descendants = child.calculate_total_visible_nodes() - 1;
                if remaining < descendants {
                    current = child;
                    continue 'descend;
                }
                remaining -= descendants;
            }
            return None;
        }
    }

    /// The record at the selected visible index, or `Null`.
    pub fn selected_item(&self, selected: Option<usize>) -> Value {
        selected
            .and_then(|index| self.request_node(index))
            .map_or(Value::Null, |node| node.item_source())
    }
}

impl Drop for TreeItemSource {
    fn drop(&mut self) {
        // Controls may still hold the root; its subtree must stop observing.
        self.root.unprepare_children();
    }
}

impl NodeRootProvider for TreeItemSource {
    fn root_node(&self) -> Arc<ItemSourceNode> {
        self.root.clone()
    }

    fn request_view(&self, kind: NodeViewKind) -> Option<NodeView<'_>> {
        match kind {
            NodeViewKind::NodeBinding => Some(NodeView::NodeBinding(self)),
            NodeViewKind::PrimaryText => Some(NodeView::PrimaryText(self)),
            NodeViewKind::TreeViewItem => Some(NodeView::TreeViewItem(self)),
        }
    }
}

impl NodeItemBindingView for TreeItemSource {
    fn binding_value(&self, node: &ItemSourceNode) -> Value {
        node.item_source()
    }
}

impl NodeItemPrimaryTextView for TreeItemSource {
    fn primary_text(&self, node: &ItemSourceNode) -> String {
        self.node_text(node)
    }
}

impl TreeViewItemView for TreeItemSource {
    fn node_text(&self, node: &ItemSourceNode) -> String {
        read_property(&node.item_source(), &self.text_property.get()).text()
    }

    fn node_image(&self, node: &ItemSourceNode) -> Option<Arc<ImageData>> {
        ImageData::from_value(&read_property(
            &node.item_source(),
            &self.image_property.get(),
        ))
    }
}

static_assertions::assert_impl_all!(TreeItemSource: Send, Sync);
static_assertions::assert_impl_all!(ItemSourceNode: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_binding_core::{ItemSource, ObservableList, ObservableVec, TypeDescriptor, ValueList};
    use parking_lot::Mutex;

    struct Folder {
        name: String,
        children: Arc<ObservableVec>,
    }

    fn folder(name: &str, children: Vec<Value>) -> (Value, Arc<ObservableVec>) {
        TypeDescriptor::builder::<Folder>("Folder")
            .readable("name", |f| Value::from(&f.name))
            .readable("children", |f| {
                Value::from(ItemSource::observable(f.children.clone()))
            })
            .readable("snapshot", |f| {
                Value::from(ItemSource::list(Arc::new(ValueList::new(f.children.to_vec()))))
            })
            .register();
        let list = Arc::new(ObservableVec::from_values(children));
        let record = Value::object(Folder {
            name: name.into(),
            children: list.clone(),
        });
        (record, list)
    }

    fn leaf(name: &str) -> Value {
        folder(name, Vec::new()).0
    }

    /// root -> [a -> [a1, a2], b, c]
    fn sample() -> (TreeItemSource, Arc<ObservableVec>, Arc<ObservableVec>) {
        let (a, a_children) = folder("a", vec![leaf("a1"), leaf("a2")]);
        let (root, top) = folder("root", vec![a, leaf("b"), leaf("c")]);
        let tree = TreeItemSource::new();
        tree.set_text_property("name");
        tree.set_children_property("children");
        tree.set_item_source(root);
        (tree, top, a_children)
    }

    type Recorded = Arc<Mutex<Vec<(&'static str, String, RangeChange)>>>;

    fn record_modifications(tree: &TreeItemSource) -> Recorded {
        let events: Recorded = Arc::new(Mutex::new(Vec::new()));
        let recv = events.clone();
        tree.signals().before_item_modified.connect(move |c| {
            let name = read_property(&c.node.item_source(), "name").text();
            recv.lock().push(("before", name, c.range()));
        });
        let recv = events.clone();
        tree.signals().after_item_modified.connect(move |c| {
            let name = read_property(&c.node.item_source(), "name").text();
            recv.lock().push(("after", name, c.range()));
        });
        events
    }

    fn names(nodes: &[Arc<ItemSourceNode>]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| read_property(&n.item_source(), "name").text())
            .collect()
    }

    #[test]
    fn test_children_are_lazy_and_idempotent() {
        let (tree, top, _) = sample();
        let a = tree.root().child(0).unwrap();

        assert!(!a.is_prepared());
        assert_eq!(a.child_count(), 2);
        assert!(a.is_prepared());

        let first = a.child(0).unwrap();
        a.prepare_children();
        assert!(Arc::ptr_eq(&first, &a.child(0).unwrap()));
        assert_eq!(top.item_changed().connection_count(), 1);
    }

    #[test]
    fn test_visible_node_count() {
        let (tree, _, _) = sample();
        let a = tree.root().child(0).unwrap();

        assert_eq!(a.calculate_total_visible_nodes(), 1);
        assert!(!a.is_prepared());
        assert_eq!(tree.root().calculate_total_visible_nodes(), 4);

        a.set_expanded(true);
        assert_eq!(a.calculate_total_visible_nodes(), 3);
        assert_eq!(tree.root().calculate_total_visible_nodes(), 6);
    }

    #[test]
    fn test_root_is_always_expanded() {
        let (tree, _, _) = sample();
        let events = Arc::new(Mutex::new(0));
        let recv = events.clone();
        tree.signals().item_collapsed.connect(move |_| *recv.lock() += 1);

        tree.root().set_expanded(false);
        assert!(tree.root().expanded());
        assert_eq!(*events.lock(), 0);
    }

    #[test]
    fn test_expand_collapse_signals() {
        let (tree, _, _) = sample();
        let events = Arc::new(Mutex::new(Vec::new()));
        let recv = events.clone();
        tree.signals()
            .item_expanded
            .connect(move |n| recv.lock().push(("expanded", Arc::as_ptr(n) as usize)));
        let recv = events.clone();
        tree.signals()
            .item_collapsed
            .connect(move |n| recv.lock().push(("collapsed", Arc::as_ptr(n) as usize)));

        let b = tree.root().child(1).unwrap();
        b.set_expanded(true);
        b.set_expanded(true);
        b.set_expanded(false);

        let ptr = Arc::as_ptr(&b) as usize;
        assert_eq!(*events.lock(), vec![("expanded", ptr), ("collapsed", ptr)]);
    }

    #[test]
    fn test_observable_children_replace_only_the_range() {
        let (a, a_children) = folder("a", Vec::new());
        let (root, top) = folder("root", vec![a, leaf("b"), leaf("c"), leaf("d")]);
        let tree = TreeItemSource::new();
        tree.set_children_property("children");
        tree.set_item_source(root);

        let before = tree.root().children();
        let events = record_modifications(&tree);

        assert!(top.splice(2, 1, vec![leaf("x"), leaf("y"), leaf("z")]));

        let after = tree.root().children();
        assert_eq!(names(&after), vec!["a", "b", "x", "y", "z", "d"]);
        assert!(Arc::ptr_eq(&before[0], &after[0]));
        assert!(Arc::ptr_eq(&before[1], &after[1]));
        assert!(Arc::ptr_eq(&before[3], &after[5]));
        assert_eq!(
            *events.lock(),
            vec![
                ("before", "root".to_string(), RangeChange::new(2, 1, 3)),
                ("after", "root".to_string(), RangeChange::new(2, 1, 3)),
            ]
        );
        assert!(Arc::ptr_eq(&after[2].parent().unwrap(), tree.root()));
        drop(a_children);
    }

    #[test]
    fn test_removed_nodes_are_unprepared() {
        let (tree, top, a_children) = sample();
        let a = tree.root().child(0).unwrap();
        a.prepare_children();
        assert_eq!(a_children.item_changed().connection_count(), 1);

        top.remove(0);
        assert!(!a.is_prepared());
        assert_eq!(a_children.item_changed().connection_count(), 0);
        assert_eq!(tree.root().child_count(), 2);
    }

    #[test]
    fn test_non_collection_children_are_empty() {
        let (tree, _, _) = sample();
        tree.set_children_property("name");
        assert_eq!(tree.root().child_count(), 0);
        assert!(tree.root().is_prepared());
    }

    #[test]
    fn test_static_children_are_not_observed() {
        let (tree, top, _) = sample();
        tree.set_children_property("snapshot");
        assert_eq!(tree.root().child_count(), 3);
        assert_eq!(top.item_changed().connection_count(), 0);

        top.push(leaf("late"));
        assert_eq!(tree.root().child_count(), 3);
    }

    #[test]
    fn test_set_item_source_reports_old_and_new_counts() {
        let (tree, top, _) = sample();
        tree.root().prepare_children();
        let events = record_modifications(&tree);
        let (replacement, _) = folder("other", vec![leaf("only")]);

        tree.set_item_source(replacement);

        assert_eq!(top.item_changed().connection_count(), 0);
        assert_eq!(
            *events.lock(),
            vec![
                ("before", "other".to_string(), RangeChange::full(3, 1)),
                ("after", "other".to_string(), RangeChange::full(3, 1)),
            ]
        );
    }

    #[test]
    fn test_children_property_change_rebuilds_tree() {
        let (tree, _, a_children) = sample();
        let a = tree.root().child(0).unwrap();
        a.prepare_children();
        let events = record_modifications(&tree);

        tree.set_text_property("name");
        tree.set_image_property("icon");
        assert!(a.is_prepared());

        tree.set_children_property("snapshot");
        assert!(!a.is_prepared());
        assert_eq!(a_children.item_changed().connection_count(), 0);
        assert_eq!(
            events.lock().iter().map(|e| e.0).collect::<Vec<_>>(),
            vec!["before", "after", "before", "after"]
        );
    }

    #[test]
    fn test_request_node_walks_visible_order() {
        let (tree, _, _) = sample();
        let a = tree.root().child(0).unwrap();
        a.set_expanded(true);

        let visible: Vec<String> = (0..5)
            .map(|i| tree.node_text(&tree.request_node(i).unwrap()))
            .collect();
        assert_eq!(visible, vec!["a", "a1", "a2", "b", "c"]);
        assert!(tree.request_node(5).is_none());

        assert_eq!(
            read_property(&tree.selected_item(Some(2)), "name"),
            Value::from("a2")
        );
        assert_eq!(tree.selected_item(None), Value::Null);
    }

    #[test]
    fn test_node_views() {
        let (tree, _, _) = sample();
        let b = tree.root().child(1).unwrap();
        assert_eq!(tree.primary_text(&b), "b");
        assert!(tree.node_image(&b).is_none());
        assert_eq!(tree.binding_value(&b), b.item_source());
        assert!(matches!(
            tree.request_view(NodeViewKind::TreeViewItem),
            Some(NodeView::TreeViewItem(_))
        ));
    }

    #[test]
    fn test_dropping_tree_releases_subscriptions() {
        let (tree, top, a_children) = sample();
        tree.root().child(0).unwrap().prepare_children();
        assert_eq!(top.item_changed().connection_count(), 1);

        drop(tree);
        assert_eq!(top.item_changed().connection_count(), 0);
        assert_eq!(a_children.item_changed().connection_count(), 0);
    }

    #[test]
    fn test_dropping_tree_releases_subscriptions_while_root_is_held() {
        let (tree, top, a_children) = sample();
        tree.root().child(0).unwrap().prepare_children();
        let root = tree.root_node();
        assert_eq!(top.item_changed().connection_count(), 1);
        assert_eq!(a_children.item_changed().connection_count(), 1);

        drop(tree);
        assert_eq!(top.item_changed().connection_count(), 0);
        assert_eq!(a_children.item_changed().connection_count(), 0);
        assert!(!root.is_prepared());
    }
}
