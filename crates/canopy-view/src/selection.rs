#![forbid(unsafe_code)]

//! Selection bookkeeping for a flattened view.
//!
//! Selection lives on the nodes ([`NodeFlags::SELECTED`](canopy_core::NodeFlags)).
//! When rows disappear from the view, by collapsing a parent or removing a
//! subtree, selected nodes among them are deselected. If that empties the
//! selection, the row just above the removed range takes it over so the
//! keyboard focus never falls off the view.

use crate::flatten::{FlatDelta, Flattener};
use canopy_core::{NodeId, Subscription, Tree};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::debug;

/// Selected nodes in `root`'s subtree that have no selected ancestor, in
/// pre-order.
#[must_use]
pub fn top_level_selection<T>(tree: &Tree<T>, root: NodeId) -> Vec<NodeId> {
    let selected = tree.selected_in(root);
    let set: HashSet<NodeId> = selected.iter().copied().collect();
    selected
        .into_iter()
        .filter(|&n| tree.ancestors(n).all(|a| !set.contains(&a)))
        .collect()
}

/// Row that inherits the selection when rows from `start` on were removed:
/// the row above, or the first row.
#[must_use]
pub fn fallback_row(start: usize) -> usize {
    start.saturating_sub(1)
}

/// Select the node at flat row `row`, or nothing when the view is shorter.
/// Returns the node that became selected.
pub fn select_row<T>(tree: &mut Tree<T>, view: &Flattener, row: usize) -> Option<NodeId> {
    let node = view.get(row).ok()?;
    tree.select_only(node).ok()?;
    Some(node)
}

#[derive(Debug)]
struct Removal {
    start: usize,
    items: Vec<NodeId>,
}

/// Queues removed ranges published by a [`Flattener`] and repairs the
/// selection once the tree is available again.
///
/// Deltas arrive while the tree is mutably borrowed by the edit that caused
/// them, so repair is deferred to [`settle`](Self::settle).
#[derive(Debug)]
pub struct SelectionTracker {
    pending: Rc<RefCell<Vec<Removal>>>,
    _subscription: Subscription,
}

impl SelectionTracker {
    /// Start watching `view`.
    #[must_use]
    pub fn watch(view: &Flattener) -> Self {
        let pending: Rc<RefCell<Vec<Removal>>> = Rc::default();
        let sink = Rc::clone(&pending);
        let subscription = view.subscribe(move |delta| {
            if let FlatDelta::Removed { start, items } = delta {
                sink.borrow_mut().push(Removal {
                    start: *start,
                    items: items.clone(),
                });
            }
        });
        Self {
            pending,
            _subscription: subscription,
        }
    }

    /// Whether removals are waiting for [`settle`](Self::settle).
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    /// Forget queued removals without touching the selection.
    pub fn discard(&self) {
        self.pending.borrow_mut().clear();
    }

    /// Apply queued removals. Returns the node that inherited the selection,
    /// if the selection had to move.
    pub fn settle<T>(&self, tree: &mut Tree<T>, view: &Flattener) -> Option<NodeId> {
        let removals = std::mem::take(&mut *self.pending.borrow_mut());
        let mut moved = None;
        for removal in removals {
            let deselected: Vec<NodeId> = removal
                .items
                .iter()
                .copied()
                .filter(|&n| tree.is_selected(n))
                .collect();
            if deselected.is_empty() {
                continue;
            }
            for &n in &deselected {
                // detached nodes are still live; destroyed ones have no flag to clear
                let _ = tree.set_selected(n, false);
            }
            debug!(
                message = "selection.hidden",
                start = removal.start as u64,
                deselected = deselected.len() as u64
            );
            if view.is_attached() && tree.selected_in(view.root()).is_empty() {
                moved = select_row(tree, view, fallback_row(removal.start)).or(moved);
            }
        }
        moved
    }
}
