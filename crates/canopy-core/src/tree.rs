#![forbid(unsafe_code)]

//! Arena-backed tree of nodes.
//!
//! # Ownership
//!
//! Every node lives in a slot of the [`Tree`] arena and is addressed by a
//! generational [`NodeId`]. A parent lists its children by id and owns them;
//! a child refers back to its parent by id only. Destroying a node bumps its
//! slot generation, so old handles are detected as stale instead of silently
//! aliasing a new node.
//!
//! # Visible rows
//!
//! Each node records how many rows it contributes to a flat projection: one
//! for itself plus, while expanded, the rows of all its children. The count is
//! kept current along the ancestor chain on every expand, collapse, insert and
//! remove, which lets views translate structural positions into flat indices
//! without rescanning subtrees.
//!
//! # Events
//!
//! Mutations publish a [`TreeEvent`] to every registered
//! [`TreeObserver`] after the change is applied.
//!
//! # Example
//!
//! ```
//! use canopy_core::Tree;
//!
//! let mut tree: Tree<String> = Tree::new();
//! let root = tree.create("root".to_string()).unwrap();
//! let src = tree.append(root, "src".to_string()).unwrap();
//! tree.append(src, "main.rs".to_string()).unwrap();
//! tree.append(root, "Cargo.toml".to_string()).unwrap();
//!
//! tree.set_expanded(root, true).unwrap();
//! assert_eq!(tree.visible_rows(root), 3);
//! tree.set_expanded(src, true).unwrap();
//! assert_eq!(tree.visible_rows(root), 4);
//! ```

use crate::error::TreeError;
use crate::observer::{ObserverId, TreeObserver};
use bitflags::bitflags;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

bitflags! {
    /// Per-node state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// Children are shown.
        const EXPANDED = 1 << 0;
        /// Node is part of the selection.
        const SELECTED = 1 << 1;
        /// Children are fetched by the tree's loader on first expansion.
        const LAZY = 1 << 2;
        /// The loader already ran for this node.
        const LOADED = 1 << 3;
    }
}

/// Handle to a node in a [`Tree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Build an id from its raw parts. Mostly useful in tests and diagnostics.
    #[must_use]
    pub const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation this handle was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}v{}", self.index, self.generation)
    }
}

/// A structural change, published after it has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// `node` became expanded. Lazy children were loaded before this event.
    Expanded {
        /// The expanded node.
        node: NodeId,
    },
    /// `node` became collapsed, hiding `hidden` previously visible descendants.
    Collapsed {
        /// The collapsed node.
        node: NodeId,
        /// Number of descendant rows that were visible before the collapse.
        hidden: usize,
    },
    /// `node` was inserted as child number `index` of `parent`.
    Inserted {
        /// New parent.
        parent: NodeId,
        /// Position among the parent's children.
        index: usize,
        /// Inserted node (with its whole subtree).
        node: NodeId,
    },
    /// `node` was detached from `parent`, where it was child number `index`.
    Removed {
        /// Former parent.
        parent: NodeId,
        /// Former position among the parent's children.
        index: usize,
        /// Detached node.
        node: NodeId,
        /// Rows the node's subtree contributed (itself plus visible descendants).
        rows: usize,
    },
    /// The children of `parent` were permuted (for example by a sort).
    Reordered {
        /// Node whose children changed order.
        parent: NodeId,
    },
}

struct NodeData<T> {
    payload: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    flags: NodeFlags,
    rows: usize,
}

struct Slot<T> {
    generation: u32,
    node: Option<NodeData<T>>,
}

type Loader<T> = Box<dyn FnMut(&T) -> Vec<T>>;
type LazyWhen<T> = Box<dyn Fn(&T) -> bool>;

/// A forest of nodes with payload `T`.
///
/// Newly created nodes are detached roots. Attach them with
/// [`insert`](Self::insert) / [`append`](Self::append); detach with
/// [`remove`](Self::remove). A detached node keeps its subtree and can be
/// inserted again elsewhere.
pub struct Tree<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    observers: Vec<(ObserverId, Weak<dyn TreeObserver<T>>)>,
    next_observer: u64,
    loader: Option<Loader<T>>,
    lazy_when: Option<LazyWhen<T>>,
    node_limit: u32,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            observers: Vec::new(),
            next_observer: 0,
            loader: None,
            lazy_when: None,
            node_limit: u32::MAX,
        }
    }
}

impl<T> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.len())
            .field("observers", &self.observers.len())
            .field("has_loader", &self.loader.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> Tree<T> {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the lazy-children loader.
    ///
    /// The loader runs synchronously the first time a [`NodeFlags::LAZY`] node
    /// is expanded; the returned payloads become its children, in order.
    #[must_use]
    pub fn with_loader(mut self, loader: impl FnMut(&T) -> Vec<T> + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Replace the lazy-children loader.
    pub fn set_loader(&mut self, loader: impl FnMut(&T) -> Vec<T> + 'static) {
        self.loader = Some(Box::new(loader));
    }

    /// Decide which loaded children are lazy themselves.
    ///
    /// Without a predicate, loaded children are plain nodes. With one, each
    /// payload the loader returns becomes a lazy node when `lazy` holds for
    /// it, so a directory tree can be loaded one level at a time.
    #[must_use]
    pub fn with_lazy_children(mut self, lazy: impl Fn(&T) -> bool + 'static) -> Self {
        self.lazy_when = Some(Box::new(lazy));
        self
    }

    /// Cap the number of arena slots. Creating a node beyond the cap fails
    /// with [`TreeError::ArenaFull`] until a destroyed slot can be reused.
    ///
    /// Slot indices are `u32`, so the cap never exceeds `u32::MAX`.
    #[must_use]
    pub fn with_node_limit(mut self, limit: u32) -> Self {
        self.node_limit = limit;
        self
    }

    // ── Creation / destruction ──────────────────────────────────────────

    /// Create a detached, collapsed node.
    pub fn create(&mut self, payload: T) -> Result<NodeId, TreeError> {
        self.alloc(payload, NodeFlags::empty())
    }

    /// Create a detached node whose children are loaded on first expansion.
    pub fn create_lazy(&mut self, payload: T) -> Result<NodeId, TreeError> {
        self.alloc(payload, NodeFlags::LAZY)
    }

    fn alloc(&mut self, payload: T, flags: NodeFlags) -> Result<NodeId, TreeError> {
        let data = NodeData {
            payload,
            parent: None,
            children: Vec::new(),
            flags,
            rows: 1,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(data);
            return Ok(NodeId {
                index,
                generation: slot.generation,
            });
        }
        let index = u32::try_from(self.slots.len())
            .ok()
            .filter(|&index| index < self.node_limit)
            .ok_or(TreeError::ArenaFull {
                limit: self.node_limit,
            })?;
        self.slots.push(Slot {
            generation: 0,
            node: Some(data),
        });
        Ok(NodeId {
            index,
            generation: 0,
        })
    }

    /// Free a detached node and its whole subtree.
    ///
    /// Every handle into the subtree becomes stale.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), TreeError> {
        let data = self.data(id)?;
        if data.parent.is_some() {
            return Err(TreeError::NotDetached(id));
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
        }
        Ok(())
    }

    // ── Lookup ──────────────────────────────────────────────────────────

    fn data(&self, id: NodeId) -> Result<&NodeData<T>, TreeError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(TreeError::StaleNode(id))
    }

    fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData<T>, TreeError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(TreeError::StaleNode(id))
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether the tree holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.data(id).is_ok()
    }

    /// Payload of a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.data(id).ok().map(|d| &d.payload)
    }

    /// Mutable payload of a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.data_mut(id).ok().map(|d| &mut d.payload)
    }

    /// Parent of a node (`None` for roots and stale handles).
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).ok().and_then(|d| d.parent)
    }

    /// Children of a node, in order (empty for stale handles).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.data(id).map_or(&[], |d| d.children.as_slice())
    }

    /// Position of `child` among its parent's children.
    #[must_use]
    pub fn child_position(&self, child: NodeId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).iter().position(|&c| c == child)
    }

    /// State bits of a node (empty for stale handles).
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.data(id).map_or(NodeFlags::empty(), |d| d.flags)
    }

    /// Whether the node is expanded.
    #[must_use]
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.flags(id).contains(NodeFlags::EXPANDED)
    }

    /// Whether the node is selected.
    #[must_use]
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.flags(id).contains(NodeFlags::SELECTED)
    }

    /// Whether the node loads its children lazily.
    #[must_use]
    pub fn is_lazy(&self, id: NodeId) -> bool {
        self.flags(id).contains(NodeFlags::LAZY)
    }

    /// Whether the node has children, counting not-yet-loaded lazy ones.
    #[must_use]
    pub fn has_children(&self, id: NodeId) -> bool {
        let flags = self.flags(id);
        !self.children(id).is_empty()
            || (flags.contains(NodeFlags::LAZY) && !flags.contains(NodeFlags::LOADED))
    }

    /// Rows the node contributes to a flat projection (0 for stale handles).
    #[must_use]
    pub fn visible_rows(&self, id: NodeId) -> usize {
        self.data(id).map_or(0, |d| d.rows)
    }

    /// Ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Topmost ancestor (the node itself for roots).
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Number of ancestors.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Whether `ancestor` is a proper ancestor of `id`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Whether the node is visible: every ancestor is expanded.
    ///
    /// Roots are always visible; whether a view shows its root row is a view
    /// setting.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.contains(id) && self.ancestors(id).all(|a| self.is_expanded(a))
    }

    /// Append the visible pre-order enumeration of `id`'s subtree
    /// (including `id`) to `out`.
    pub fn collect_visible(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if !self.contains(id) {
            return;
        }
        out.push(id);
        self.collect_visible_descendants(id, out);
    }

    /// Append the visible pre-order enumeration of `id`'s descendants
    /// (excluding `id`) to `out`.
    pub fn collect_visible_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if !self.is_expanded(id) {
            return;
        }
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.extend(self.children(id).iter().rev().copied());
        while let Some(current) = stack.pop() {
            out.push(current);
            if self.is_expanded(current) {
                stack.extend(self.children(current).iter().rev().copied());
            }
        }
    }

    /// Pre-order enumeration of the whole subtree, ignoring expansion.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.extend(self.children(id).iter().rev().copied());
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    // ── Structure ───────────────────────────────────────────────────────

    /// Insert a detached `child` as child number `index` of `parent`.
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<(), TreeError> {
        let len = self.data(parent)?.children.len();
        let child_data = self.data(child)?;
        if let Some(current) = child_data.parent {
            return Err(TreeError::AlreadyAttached {
                node: child,
                parent: current,
            });
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(TreeError::WouldCycle {
                node: child,
                parent,
            });
        }
        if index > len {
            return Err(TreeError::ChildIndexOutOfRange { parent, index, len });
        }
        let rows = child_data.rows;
        self.data_mut(child)?.parent = Some(parent);
        self.data_mut(parent)?.children.insert(index, child);
        self.grow_ancestors(parent, rows);
        self.emit(&TreeEvent::Inserted {
            parent,
            index,
            node: child,
        });
        Ok(())
    }

    /// Insert a detached `child` after the existing children of `parent`.
    pub fn push(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let len = self.data(parent)?.children.len();
        self.insert(parent, len, child)
    }

    /// Create a node and append it to `parent`.
    pub fn append(&mut self, parent: NodeId, payload: T) -> Result<NodeId, TreeError> {
        self.data(parent)?;
        let child = self.create(payload)?;
        self.push(parent, child)?;
        Ok(child)
    }

    /// Create a lazy node and append it to `parent`.
    pub fn append_lazy(&mut self, parent: NodeId, payload: T) -> Result<NodeId, TreeError> {
        self.data(parent)?;
        let child = self.create_lazy(payload)?;
        self.push(parent, child)?;
        Ok(child)
    }

    /// Detach `child` from its parent. The subtree is kept intact.
    ///
    /// Removing a root is a no-op.
    pub fn remove(&mut self, child: NodeId) -> Result<(), TreeError> {
        let data = self.data(child)?;
        let Some(parent) = data.parent else {
            return Ok(());
        };
        let rows = data.rows;
        let siblings = &mut self.data_mut(parent)?.children;
        let Some(index) = siblings.iter().position(|&c| c == child) else {
            debug_assert!(false, "{child} missing from its parent's children");
            return Ok(());
        };
        siblings.remove(index);
        self.data_mut(child)?.parent = None;
        self.shrink_ancestors(parent, rows);
        self.emit(&TreeEvent::Removed {
            parent,
            index,
            node: child,
            rows,
        });
        Ok(())
    }

    /// Move `node` so it becomes child number `index` of `new_parent`.
    ///
    /// `index` addresses the children of `new_parent` *before* the move; when
    /// the node moves forward within the same parent the index is adjusted
    /// for its own removal. Publishes a `Removed` then an `Inserted` event.
    pub fn move_node(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
        index: usize,
    ) -> Result<(), TreeError> {
        let len = self.data(new_parent)?.children.len();
        self.data(node)?;
        if node == new_parent || self.is_ancestor(node, new_parent) {
            return Err(TreeError::WouldCycle {
                node,
                parent: new_parent,
            });
        }
        if index > len {
            return Err(TreeError::ChildIndexOutOfRange {
                parent: new_parent,
                index,
                len,
            });
        }
        let mut target = index;
        if self.parent(node) == Some(new_parent)
            && let Some(old) = self.child_position(node)
            && old < index
        {
            target -= 1;
        }
        self.remove(node)?;
        self.insert(new_parent, target, node)
    }

    /// Sort the children of `parent` with `compare` (stable).
    ///
    /// Publishes [`TreeEvent::Reordered`] when the order changed.
    pub fn sort_children_by(
        &mut self,
        parent: NodeId,
        mut compare: impl FnMut(&T, &T) -> Ordering,
    ) -> Result<(), TreeError> {
        let children = self.data(parent)?.children.clone();
        if children.len() < 2 {
            return Ok(());
        }
        let mut sorted = children.clone();
        sorted.sort_by(|&a, &b| match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => compare(a, b),
            _ => Ordering::Equal,
        });
        if sorted == children {
            return Ok(());
        }
        self.data_mut(parent)?.children = sorted;
        self.emit(&TreeEvent::Reordered { parent });
        Ok(())
    }

    // ── Expansion ───────────────────────────────────────────────────────

    /// Expand or collapse a node. Returns whether the state changed.
    ///
    /// Expanding a lazy node for the first time runs the loader before the
    /// [`TreeEvent::Expanded`] event is published, so observers always see
    /// the populated children.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> Result<bool, TreeError> {
        let flags = self.data(id)?.flags;
        if flags.contains(NodeFlags::EXPANDED) == expanded {
            return Ok(false);
        }
        if expanded {
            if flags.contains(NodeFlags::LAZY) && !flags.contains(NodeFlags::LOADED) {
                self.load_children(id)?;
            }
            let rows = 1 + self
                .children(id)
                .iter()
                .map(|&c| self.visible_rows(c))
                .sum::<usize>();
            let data = self.data_mut(id)?;
            data.flags.insert(NodeFlags::EXPANDED);
            data.rows = rows;
            let parent = data.parent;
            if let Some(parent) = parent {
                self.grow_ancestors(parent, rows - 1);
            }
            self.emit(&TreeEvent::Expanded { node: id });
        } else {
            let data = self.data_mut(id)?;
            let hidden = data.rows - 1;
            data.flags.remove(NodeFlags::EXPANDED);
            data.rows = 1;
            let parent = data.parent;
            if let Some(parent) = parent {
                self.shrink_ancestors(parent, hidden);
            }
            self.emit(&TreeEvent::Collapsed { node: id, hidden });
        }
        Ok(true)
    }

    /// Flip the expansion state of a node. Returns the new state.
    pub fn toggle_expanded(&mut self, id: NodeId) -> Result<bool, TreeError> {
        let expanded = !self.is_expanded(id);
        self.set_expanded(id, expanded)?;
        Ok(expanded)
    }

    fn load_children(&mut self, id: NodeId) -> Result<(), TreeError> {
        let payloads = match (&mut self.loader, self.slots.get(id.index as usize)) {
            (Some(loader), Some(Slot { node: Some(data), .. })) => loader(&data.payload),
            _ => Vec::new(),
        };
        self.data_mut(id)?.flags.insert(NodeFlags::LOADED);
        debug!(
            message = "tree.lazy_load",
            node = %id,
            children = payloads.len() as u64
        );
        for payload in payloads {
            let lazy = self.lazy_when.as_ref().is_some_and(|f| f(&payload));
            if lazy {
                self.append_lazy(id, payload)?;
            } else {
                self.append(id, payload)?;
            }
        }
        Ok(())
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Set the selection bit of a node.
    pub fn set_selected(&mut self, id: NodeId, selected: bool) -> Result<(), TreeError> {
        self.data_mut(id)?.flags.set(NodeFlags::SELECTED, selected);
        Ok(())
    }

    /// Deselect every node.
    pub fn clear_selection(&mut self) {
        for slot in &mut self.slots {
            if let Some(node) = slot.node.as_mut() {
                node.flags.remove(NodeFlags::SELECTED);
            }
        }
    }

    /// Make `id` the only selected node.
    pub fn select_only(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.data(id)?;
        self.clear_selection();
        self.set_selected(id, true)
    }

    /// Selected nodes in `root`'s subtree (including `root`), in pre-order.
    #[must_use]
    pub fn selected_in(&self, root: NodeId) -> Vec<NodeId> {
        std::iter::once(root)
            .chain(self.descendants(root))
            .filter(|&id| self.is_selected(id))
            .collect()
    }

    // ── Observers ───────────────────────────────────────────────────────

    /// Register an observer. The tree keeps only a weak reference.
    pub fn subscribe<O: TreeObserver<T> + 'static>(&mut self, observer: &Rc<O>) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        let observer: Rc<dyn TreeObserver<T>> = observer.clone();
        self.observers.push((id, Rc::downgrade(&observer)));
        id
    }

    /// Stop delivering events to an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    /// Number of registered observers (including dead ones not yet pruned).
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn emit(&mut self, event: &TreeEvent) {
        self.observers.retain(|(_, w)| w.strong_count() > 0);
        let live: SmallVec<[Rc<dyn TreeObserver<T>>; 4]> = self
            .observers
            .iter()
            .filter_map(|(_, w)| w.upgrade())
            .collect();
        for observer in &live {
            observer.on_tree_event(self, event);
        }
    }

    // ── Row bookkeeping ─────────────────────────────────────────────────

    /// Add `delta` rows to `from` and its ancestors, stopping below the first
    /// collapsed node (a collapsed node's count excludes its children).
    fn grow_ancestors(&mut self, from: NodeId, delta: usize) {
        if delta == 0 {
            return;
        }
        let mut current = Some(from);
        while let Some(id) = current {
            let Ok(data) = self.data_mut(id) else { break };
            if !data.flags.contains(NodeFlags::EXPANDED) {
                break;
            }
            data.rows += delta;
            current = data.parent;
        }
    }

    fn shrink_ancestors(&mut self, from: NodeId, delta: usize) {
        if delta == 0 {
            return;
        }
        let mut current = Some(from);
        while let Some(id) = current {
            let Ok(data) = self.data_mut(id) else { break };
            if !data.flags.contains(NodeFlags::EXPANDED) {
                break;
            }
            debug_assert!(data.rows > delta, "row count underflow at {id}");
            data.rows = data.rows.saturating_sub(delta);
            current = data.parent;
        }
    }
}
