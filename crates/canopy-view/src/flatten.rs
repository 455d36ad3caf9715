#![forbid(unsafe_code)]

//! Tree-to-sequence projection.
//!
//! A [`Flattener`] presents the visible nodes under a root as an indexable
//! sequence: a pre-order walk that descends only into expanded nodes, with
//! the root itself omitted when `show_root` is false.
//!
//! # Incremental updates
//!
//! The flattener observes its [`Tree`] and patches the sequence on every
//! [`TreeEvent`] instead of rebuilding it. To turn a structural position into
//! a flat index it walks from the node up to the root, adding the visible
//! row counts of preceding siblings at each level. The cost is proportional
//! to depth times sibling count, never to the size of the tree.
//!
//! | Event        | Sequence change                                        |
//! |--------------|--------------------------------------------------------|
//! | `Expanded`   | insert visible descendants right after the node        |
//! | `Collapsed`  | remove the `hidden` rows right after the node          |
//! | `Inserted`   | insert the node and its visible descendants            |
//! | `Removed`    | remove `rows` rows where the node used to be           |
//! | `Reordered`  | replace the parent's descendant range                  |
//!
//! Every change is published as a [`FlatDelta`] to subscribers, who can
//! redraw just the affected rows. Toggling `show_root` rebuilds and publishes
//! [`FlatDelta::Reset`]. Hosts that poll once per frame instead of reacting
//! to callbacks can turn on [`Flattener::set_queue_deltas`] and collect the
//! backlog with [`Flattener::drain_deltas`].
//!
//! # Lifecycle
//!
//! [`Flattener::detach`] unsubscribes from the tree and clears the sequence.
//! Afterwards tree events are ignored and queries fail with
//! [`ViewError::InvalidState`]. Dropping an attached flattener also stops
//! delivery, because the tree holds its observer weakly.
//!
//! # Example
//!
//! ```
//! use canopy_core::Tree;
//! use canopy_view::Flattener;
//!
//! let mut tree: Tree<&str> = Tree::new();
//! let root = tree.create("root").unwrap();
//! let docs = tree.append(root, "docs").unwrap();
//! tree.append(docs, "guide.md").unwrap();
//! tree.set_expanded(root, true).unwrap();
//!
//! let flat = Flattener::attach(&mut tree, root, false).unwrap();
//! assert_eq!(flat.len(), 1);
//!
//! tree.set_expanded(docs, true).unwrap();
//! assert_eq!(flat.len(), 2);
//! assert_eq!(tree.get(flat.get(1).unwrap()), Some(&"guide.md"));
//! ```

use crate::error::ViewError;
use canopy_core::{Broadcast, NodeId, ObserverId, Subscription, Tree, TreeEvent, TreeObserver};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, debug_span, trace};

/// A change to a flat sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatDelta {
    /// `items` now occupy `start..start + items.len()`.
    Inserted {
        /// First new index.
        start: usize,
        /// Inserted nodes, in sequence order.
        items: Vec<NodeId>,
    },
    /// `items` were removed from `start..start + items.len()`.
    Removed {
        /// First removed index.
        start: usize,
        /// Removed nodes, in sequence order.
        items: Vec<NodeId>,
    },
    /// The whole sequence was rebuilt.
    Reset,
}

impl FlatDelta {
    /// Net change in sequence length.
    #[must_use]
    pub fn len_change(&self) -> isize {
        match self {
            Self::Inserted { items, .. } => items.len() as isize,
            Self::Removed { items, .. } => -(items.len() as isize),
            Self::Reset => 0,
        }
    }
}

struct FlatState {
    root: NodeId,
    show_root: bool,
    attached: bool,
    items: Vec<NodeId>,
}

impl FlatState {
    /// Rows above the first flat index: 1 when the root row is hidden.
    fn offset(&self) -> usize {
        usize::from(!self.show_root)
    }

    fn rebuild<T>(&mut self, tree: &Tree<T>) {
        let _span = debug_span!("flatten.rebuild", root = %self.root).entered();
        self.items.clear();
        if self.show_root {
            tree.collect_visible(self.root, &mut self.items);
        } else {
            tree.collect_visible_descendants(self.root, &mut self.items);
        }
        debug!(message = "flatten.rebuild", len = self.items.len() as u64);
    }

    /// Flat index of the row just below `node`, if `node` is on screen
    /// (or is the hidden root).
    fn index_after<T>(&self, tree: &Tree<T>, node: NodeId) -> Option<usize> {
        row_of(tree, self.root, node).map(|row| row + 1 - self.offset())
    }

    fn insert(&mut self, start: usize, items: Vec<NodeId>) -> Option<FlatDelta> {
        if items.is_empty() {
            return None;
        }
        debug_assert!(start <= self.items.len(), "insert at {start} past {}", self.items.len());
        let start = start.min(self.items.len());
        self.items.splice(start..start, items.iter().copied());
        Some(FlatDelta::Inserted { start, items })
    }

    fn remove(&mut self, start: usize, count: usize) -> Option<FlatDelta> {
        if count == 0 {
            return None;
        }
        debug_assert!(
            start + count <= self.items.len(),
            "remove {start}+{count} past {}",
            self.items.len()
        );
        let end = (start + count).min(self.items.len());
        let start = start.min(end);
        let items: Vec<NodeId> = self.items.drain(start..end).collect();
        Some(FlatDelta::Removed { start, items })
    }

    fn apply<T>(&mut self, tree: &Tree<T>, event: &TreeEvent) -> SmallVec<[FlatDelta; 2]> {
        let mut out = SmallVec::new();
        if !self.attached {
            return out;
        }
        match *event {
            TreeEvent::Expanded { node } => {
                if let Some(start) = self.index_after(tree, node) {
                    let mut items = Vec::new();
                    tree.collect_visible_descendants(node, &mut items);
                    out.extend(self.insert(start, items));
                }
            }
            TreeEvent::Collapsed { node, hidden } => {
                if let Some(start) = self.index_after(tree, node) {
                    out.extend(self.remove(start, hidden));
                }
            }
            TreeEvent::Inserted { node, .. } => {
                if let Some(row) = row_of(tree, self.root, node) {
                    let mut items = Vec::new();
                    tree.collect_visible(node, &mut items);
                    out.extend(self.insert(row - self.offset(), items));
                }
            }
            TreeEvent::Removed {
                parent, index, rows, ..
            } => {
                if tree.is_expanded(parent)
                    && let Some(after_parent) = self.index_after(tree, parent)
                {
                    let preceding: usize = tree.children(parent)[..index]
                        .iter()
                        .map(|&c| tree.visible_rows(c))
                        .sum();
                    out.extend(self.remove(after_parent + preceding, rows));
                }
            }
            TreeEvent::Reordered { parent } => {
                if tree.is_expanded(parent)
                    && let Some(start) = self.index_after(tree, parent)
                {
                    let count = tree.visible_rows(parent) - 1;
                    let mut items = Vec::with_capacity(count);
                    tree.collect_visible_descendants(parent, &mut items);
                    if self.items.get(start..start + count) != Some(items.as_slice()) {
                        out.extend(self.remove(start, count));
                        out.extend(self.insert(start, items));
                    }
                }
            }
        }
        out
    }
}

/// Row of `node` in the full pre-order projection of `root` (root = row 0).
///
/// `None` unless `root` is an ancestor-or-self of `node` and every node
/// strictly between them, plus `node`'s parent, is expanded.
fn row_of<T>(tree: &Tree<T>, root: NodeId, node: NodeId) -> Option<usize> {
    let mut row = 0;
    let mut current = node;
    while current != root {
        let parent = tree.parent(current)?;
        if !tree.is_expanded(parent) {
            return None;
        }
        let siblings = tree.children(parent);
        let pos = siblings.iter().position(|&c| c == current)?;
        row += 1 + siblings[..pos]
            .iter()
            .map(|&s| tree.visible_rows(s))
            .sum::<usize>();
        current = parent;
    }
    Some(row)
}

struct FlatInner {
    state: RefCell<FlatState>,
    deltas: Broadcast<FlatDelta>,
    queueing: Cell<bool>,
    queue: RefCell<Vec<FlatDelta>>,
}

impl FlatInner {
    fn publish(&self, delta: &FlatDelta) {
        if self.queueing.get() {
            self.queue.borrow_mut().push(delta.clone());
        }
        self.deltas.notify(delta);
    }
}

impl<T> TreeObserver<T> for FlatInner {
    fn on_tree_event(&self, tree: &Tree<T>, event: &TreeEvent) {
        // the borrow ends before subscribers run so they can query the view
        let deltas = self.state.borrow_mut().apply(tree, event);
        for delta in &deltas {
            trace!(message = "flatten.delta", ?delta);
            self.publish(delta);
        }
    }
}

/// A live, indexable projection of the visible nodes under a root.
pub struct Flattener {
    inner: Rc<FlatInner>,
    observer: Option<ObserverId>,
}

impl fmt::Debug for Flattener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Flattener")
            .field("root", &state.root)
            .field("show_root", &state.show_root)
            .field("attached", &state.attached)
            .field("len", &state.items.len())
            .finish()
    }
}

impl Flattener {
    /// Project the subtree of `root` and start following `tree`.
    pub fn attach<T>(tree: &mut Tree<T>, root: NodeId, show_root: bool) -> Result<Self, ViewError> {
        if !tree.contains(root) {
            return Err(ViewError::InvalidState("flattener root is not a live node"));
        }
        let mut state = FlatState {
            root,
            show_root,
            attached: true,
            items: Vec::new(),
        };
        state.rebuild(tree);
        let len = state.items.len();
        let inner = Rc::new(FlatInner {
            state: RefCell::new(state),
            deltas: Broadcast::new(),
            queueing: Cell::new(false),
            queue: RefCell::new(Vec::new()),
        });
        let observer = tree.subscribe(&inner);
        debug!(
            message = "flatten.attach",
            root = %root,
            show_root,
            len = len as u64
        );
        Ok(Self {
            inner,
            observer: Some(observer),
        })
    }

    /// Stop following the tree and clear the sequence. Idempotent.
    pub fn detach<T>(&mut self, tree: &mut Tree<T>) {
        if let Some(id) = self.observer.take() {
            tree.unsubscribe(id);
        }
        let mut state = self.inner.state.borrow_mut();
        if state.attached {
            state.attached = false;
            state.items.clear();
            self.inner.queue.borrow_mut().clear();
            debug!(message = "flatten.detach", root = %state.root);
        }
    }

    /// Whether the flattener still follows its tree.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.state.borrow().attached
    }

    /// Root of the projection.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.inner.state.borrow().root
    }

    /// Whether the root occupies index 0.
    #[must_use]
    pub fn show_root(&self) -> bool {
        self.inner.state.borrow().show_root
    }

    /// Number of rows (0 once detached).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.borrow().items.len()
    }

    /// Whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_attached(&self) -> Result<(), ViewError> {
        if self.is_attached() {
            Ok(())
        } else {
            Err(ViewError::InvalidState("flattener is detached"))
        }
    }

    /// Node at flat index `index`.
    pub fn get(&self, index: usize) -> Result<NodeId, ViewError> {
        self.ensure_attached()?;
        let state = self.inner.state.borrow();
        state
            .items
            .get(index)
            .copied()
            .ok_or(ViewError::IndexOutOfRange {
                index,
                len: state.items.len(),
            })
    }

    /// Flat index of `node`, or `None` when it is not on screen.
    pub fn index_of<T>(&self, tree: &Tree<T>, node: NodeId) -> Result<Option<usize>, ViewError> {
        self.ensure_attached()?;
        let state = self.inner.state.borrow();
        let index = row_of(tree, state.root, node).and_then(|row| row.checked_sub(state.offset()));
        debug_assert!(
            index.is_none_or(|i| state.items.get(i) == Some(&node)),
            "flat index of {node} out of sync"
        );
        Ok(index)
    }

    /// Copy of the current sequence.
    #[must_use]
    pub fn to_vec(&self) -> Vec<NodeId> {
        self.inner.state.borrow().items.clone()
    }

    /// Copy of `range` of the sequence, clamped to the current length.
    ///
    /// Renderers use this to fetch the rows of a viewport.
    #[must_use]
    pub fn window(&self, start: usize, len: usize) -> Vec<NodeId> {
        let state = self.inner.state.borrow();
        let start = start.min(state.items.len());
        let end = start.saturating_add(len).min(state.items.len());
        state.items[start..end].to_vec()
    }

    /// Register a callback for sequence changes.
    pub fn subscribe(&self, callback: impl Fn(&FlatDelta) + 'static) -> Subscription {
        self.inner.deltas.subscribe(callback)
    }

    /// Also record deltas for [`drain_deltas`](Self::drain_deltas).
    /// Turning queueing off discards the backlog.
    pub fn set_queue_deltas(&self, on: bool) {
        self.inner.queueing.set(on);
        if !on {
            self.inner.queue.borrow_mut().clear();
        }
    }

    /// Take every delta recorded since the last drain, oldest first.
    #[must_use]
    pub fn drain_deltas(&self) -> Vec<FlatDelta> {
        std::mem::take(&mut *self.inner.queue.borrow_mut())
    }

    /// Show or hide the root row. Rebuilds and publishes [`FlatDelta::Reset`]
    /// when the setting changes.
    pub fn set_show_root<T>(&self, tree: &Tree<T>, show_root: bool) -> Result<(), ViewError> {
        self.ensure_attached()?;
        {
            let mut state = self.inner.state.borrow_mut();
            if state.show_root == show_root {
                return Ok(());
            }
            state.show_root = show_root;
            state.rebuild(tree);
        }
        self.inner.publish(&FlatDelta::Reset);
        Ok(())
    }

    /// Rebuild from scratch and publish [`FlatDelta::Reset`].
    pub fn refresh<T>(&self, tree: &Tree<T>) -> Result<(), ViewError> {
        self.ensure_attached()?;
        self.inner.state.borrow_mut().rebuild(tree);
        self.inner.publish(&FlatDelta::Reset);
        Ok(())
    }
}
