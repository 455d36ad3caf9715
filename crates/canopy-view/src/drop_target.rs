#![forbid(unsafe_code)]

//! Drag-and-drop target resolution.
//!
//! Given the row under the pointer and the pointer's vertical offset within
//! it, [`DropResolver`] picks one structural insertion point. Up to three
//! candidates are considered, in this order:
//!
//! 1. **Before** the row's node (reordering only).
//! 2. **Inside** the row's node, after its last child.
//! 3. With reordering: **Before** the first child when the node is expanded
//!    and has children, otherwise **After** the node.
//!
//! Candidates whose owning node rejects the drop are discarded first. The
//! survivors split the row into bands from top to bottom:
//!
//! | Survivors              | Band limits (fraction of row height) |
//! |------------------------|--------------------------------------|
//! | one                    | 1.0                                  |
//! | `[Inside, other]`      | 0.8, 1.0                             |
//! | `[other, Inside]`      | 0.2, 1.0                             |
//! | two without `Inside`   | 0.5, 1.0                             |
//! | three                  | 0.2, 0.8, 1.0                        |
//!
//! The first candidate whose limit is at least the pointer offset wins.

use crate::error::ViewError;
use crate::flatten::Flattener;
use canopy_core::{Droppable, NodeId, RowGeometry, Tree};
use smallvec::SmallVec;
use tracing::debug;

/// Where a drop lands relative to the row it was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropPlacement {
    /// Above the anchor row, as its previous sibling.
    Before,
    /// Into the anchor node, as its last child.
    Inside,
    /// Below the anchor row, as its next sibling.
    After,
}

/// A resolved insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropTarget {
    /// Node whose children receive the drop.
    pub owner: NodeId,
    /// Child index in `owner` at which dropped items are inserted.
    pub index: usize,
    /// Placement relative to `anchor`.
    pub placement: DropPlacement,
    /// Row the insertion marker is drawn against. Differs from the hovered
    /// row only for "before first child".
    pub anchor: NodeId,
}

/// A candidate with the lower edge of its band, in row coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropZone {
    /// The target chosen when the pointer is in this band.
    pub target: DropTarget,
    /// Bottom of the band: the zone applies while `pointer_y <= limit`.
    pub limit: f32,
}

/// Candidate list for one row.
pub type DropZones = SmallVec<[DropZone; 3]>;

/// Resolves pointer positions over rows into [`DropTarget`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropResolver {
    allow_reordering: bool,
}

impl DropResolver {
    /// A resolver; `allow_reordering` enables the Before/After candidates.
    #[must_use]
    pub const fn new(allow_reordering: bool) -> Self {
        Self { allow_reordering }
    }

    /// Whether Before/After candidates are generated.
    #[must_use]
    pub const fn allow_reordering(&self) -> bool {
        self.allow_reordering
    }

    /// Resolve a drop of `payload` over `node`'s row.
    ///
    /// Returns `Ok(None)` when every candidate is rejected or the pointer is
    /// below the last band. Fails with [`ViewError::InvalidState`] when
    /// `node` is not a row of `view`.
    pub fn resolve<T, P>(
        &self,
        tree: &Tree<T>,
        view: &Flattener,
        node: NodeId,
        geometry: RowGeometry,
        payload: &P,
    ) -> Result<Option<DropTarget>, ViewError>
    where
        T: Droppable<P>,
        P: ?Sized,
    {
        self.resolve_with(tree, view, node, geometry, |owner, index| {
            tree.get(owner).is_some_and(|t| t.can_drop(index, payload))
        })
    }

    /// [`resolve`](Self::resolve) with an explicit acceptance predicate
    /// `accept(owner, index)`.
    pub fn resolve_with<T>(
        &self,
        tree: &Tree<T>,
        view: &Flattener,
        node: NodeId,
        geometry: RowGeometry,
        accept: impl FnMut(NodeId, usize) -> bool,
    ) -> Result<Option<DropTarget>, ViewError> {
        if view.index_of(tree, node)?.is_none() {
            return Err(ViewError::InvalidState("drop over a node that is not a row of the view"));
        }
        let zones = self.zones(tree, node, geometry.height, accept);
        let target = zones
            .iter()
            .find(|z| z.limit >= geometry.pointer_y)
            .map(|z| z.target);
        debug!(
            message = "drop.resolve",
            node = %node,
            pointer_y = f64::from(geometry.pointer_y),
            height = f64::from(geometry.height),
            candidates = zones.len() as u64,
            placement = ?target.map(|t| t.placement)
        );
        Ok(target)
    }

    /// Accepted candidates for `node`'s row with their band limits.
    ///
    /// Pure: needs no view, so renderers can preview drop zones.
    pub fn zones<T>(
        &self,
        tree: &Tree<T>,
        node: NodeId,
        height: f32,
        mut accept: impl FnMut(NodeId, usize) -> bool,
    ) -> DropZones {
        let mut targets: SmallVec<[DropTarget; 3]> = SmallVec::new();
        let mut try_add = |target: Option<DropTarget>| {
            if let Some(t) = target
                && accept(t.owner, t.index)
            {
                targets.push(t);
            }
        };

        if self.allow_reordering {
            try_add(sibling_target(tree, node, DropPlacement::Before));
        }
        if tree.contains(node) {
            try_add(Some(DropTarget {
                owner: node,
                index: tree.children(node).len(),
                placement: DropPlacement::Inside,
                anchor: node,
            }));
        }
        if self.allow_reordering {
            match tree.children(node).first() {
                Some(&first) if tree.is_expanded(node) => try_add(Some(DropTarget {
                    owner: node,
                    index: 0,
                    placement: DropPlacement::Before,
                    anchor: first,
                })),
                _ => try_add(sibling_target(tree, node, DropPlacement::After)),
            }
        }

        let limits = band_limits(&targets, height);
        targets
            .into_iter()
            .zip(limits)
            .map(|(target, limit)| DropZone { target, limit })
            .collect()
    }
}

/// Before/After `node` among its siblings; `None` for roots.
fn sibling_target<T>(tree: &Tree<T>, node: NodeId, placement: DropPlacement) -> Option<DropTarget> {
    let owner = tree.parent(node)?;
    let position = tree.child_position(node)?;
    let index = match placement {
        DropPlacement::After => position + 1,
        _ => position,
    };
    Some(DropTarget {
        owner,
        index,
        placement,
        anchor: node,
    })
}

fn band_limits(targets: &[DropTarget], h: f32) -> SmallVec<[f32; 3]> {
    let edge = 0.2 * h;
    let is_inside = |i: usize| targets[i].placement == DropPlacement::Inside;
    let mut limits: SmallVec<[f32; 3]> = SmallVec::from_elem(h, targets.len());
    match targets.len() {
        2 if is_inside(0) && !is_inside(1) => limits[0] = h - edge,
        2 if !is_inside(0) && is_inside(1) => limits[0] = edge,
        2 => limits[0] = h / 2.0,
        3 => {
            limits[0] = edge;
            limits[1] = h - edge;
        }
        _ => {}
    }
    limits
}
