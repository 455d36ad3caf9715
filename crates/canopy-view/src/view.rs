#![forbid(unsafe_code)]

//! Tree view controller.
//!
//! [`TreeView`] owns a [`Tree`] and keeps everything a rendered tree view
//! needs in sync with it: the [`Flattener`] for the current root, the
//! selection repair that follows hidden rows, a [`TextSearch`] session and
//! drag-and-drop resolution. It holds no rendering state; the host draws
//! rows from [`TreeView::rows`] and forwards input.
//!
//! Edits go through [`TreeView::edit`] (or the dedicated operations) so the
//! selection can be repaired once the edit has finished.
//!
//! ```
//! use canopy_core::{Tree, TreeKey};
//! use canopy_view::{TreeView, ViewConfig};
//! use web_time::Instant;
//!
//! let mut tree: Tree<String> = Tree::new();
//! let root = tree.create("workspace".into()).unwrap();
//! for name in ["src", "docs", "tests"] {
//!     tree.append(root, name.into()).unwrap();
//! }
//!
//! let config = ViewConfig { show_root: false, ..ViewConfig::default() };
//! let mut view = TreeView::with_root(tree, root, config).unwrap();
//! assert_eq!(view.len(), 3);
//!
//! view.handle_key(&TreeKey::char('d'), Instant::now()).unwrap();
//! assert_eq!(view.selected_index(), Some(1));
//! ```

use crate::config::ViewConfig;
use crate::drop_target::{DropPlacement, DropResolver, DropTarget};
use crate::error::ViewError;
use crate::flatten::Flattener;
use crate::selection::{self, SelectionTracker};
use crate::sort;
use crate::text_search::{SearchHost, TextSearch};
use canopy_core::{Displayable, Droppable, NodeId, RowGeometry, Tree, TreeKey};
use canopy_text::NaturalOrder;
use std::borrow::Cow;
use tracing::debug;
use web_time::Instant;

/// The attached projection and its selection tracker.
#[derive(Debug)]
struct Attached {
    flat: Flattener,
    tracker: SelectionTracker,
}

/// Interaction state for one tree shown as a list of rows.
pub struct TreeView<T> {
    tree: Tree<T>,
    config: ViewConfig,
    root: Option<NodeId>,
    attached: Option<Attached>,
    search: TextSearch,
    order: NaturalOrder,
}

impl<T> std::fmt::Debug for TreeView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeView")
            .field("root", &self.root)
            .field("rows", &self.len())
            .field("config", &self.config)
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}

impl<T> TreeView<T> {
    /// A view of `tree` with no root yet.
    #[must_use]
    pub fn new(tree: Tree<T>, config: ViewConfig) -> Self {
        let search = TextSearch::new(config.text_search.case_mode(), config.text_search.idle_timeout());
        let order = config.collation.natural_order();
        Self {
            tree,
            config,
            root: None,
            attached: None,
            search,
            order,
        }
    }

    /// A view of `tree` rooted at `root`.
    pub fn with_root(tree: Tree<T>, root: NodeId, config: ViewConfig) -> Result<Self, ViewError> {
        let mut view = Self::new(tree, config);
        view.set_root(Some(root))?;
        Ok(view)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// The underlying tree.
    #[must_use]
    pub fn tree(&self) -> &Tree<T> {
        &self.tree
    }

    /// Give the tree back.
    #[must_use]
    pub fn into_tree(mut self) -> Tree<T> {
        self.detach();
        self.tree
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Root of the view.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The row projection, while a root is set.
    #[must_use]
    pub fn rows(&self) -> Option<&Flattener> {
        self.attached.as_ref().map(|a| &a.flat)
    }

    /// The type-ahead session.
    #[must_use]
    pub fn search(&self) -> &TextSearch {
        &self.search
    }

    /// Comparator used by the sort operations.
    #[must_use]
    pub fn natural_order(&self) -> &NaturalOrder {
        &self.order
    }

    /// Number of rows (0 without a root).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows().map_or(0, Flattener::len)
    }

    /// Whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Node shown at `row`.
    pub fn row(&self, row: usize) -> Result<NodeId, ViewError> {
        self.flat()?.get(row)
    }

    /// Row of `node`, or `None` when it is not shown.
    pub fn index_of(&self, node: NodeId) -> Result<Option<usize>, ViewError> {
        self.flat()?.index_of(&self.tree, node)
    }

    fn flat(&self) -> Result<&Flattener, ViewError> {
        self.rows().ok_or(ViewError::InvalidState("tree view has no root"))
    }

    // ── Root and projection ─────────────────────────────────────────────

    /// Show the subtree of `root` (or nothing) and rebuild the rows.
    pub fn set_root(&mut self, root: Option<NodeId>) -> Result<(), ViewError> {
        self.root = root;
        self.reload()
    }

    /// Show or hide the root row and rebuild.
    pub fn set_show_root(&mut self, show_root: bool) -> Result<(), ViewError> {
        self.config.show_root = show_root;
        self.reload()
    }

    /// Allow or forbid collapsing a shown root, and rebuild.
    pub fn set_show_root_expander(&mut self, show: bool) -> Result<(), ViewError> {
        self.config.show_root_expander = show;
        self.reload()
    }

    /// Enable or disable Before/After drop targets.
    pub fn set_allow_drop_reordering(&mut self, allow: bool) {
        self.config.allow_drop_reordering = allow;
    }

    /// Replace the whole configuration and rebuild.
    pub fn set_config(&mut self, config: ViewConfig) -> Result<(), ViewError> {
        self.search.set_case_mode(config.text_search.case_mode());
        self.search.set_idle_timeout(config.text_search.idle_timeout());
        if config.collation != self.config.collation {
            self.order = config.collation.natural_order();
        }
        self.config = config;
        self.reload()
    }

    /// Detach the current projection and build a new one for the root.
    ///
    /// The root is expanded unless it is shown with its own expander, so a
    /// hidden root never hides its children.
    pub fn reload(&mut self) -> Result<(), ViewError> {
        self.detach();
        self.search.reset();
        let Some(root) = self.root else {
            debug!(message = "view.reload", root = "none");
            return Ok(());
        };
        if !self.tree.contains(root) {
            return Err(ViewError::InvalidState("tree view root is not a live node"));
        }
        if self.root_stays_expanded() {
            self.tree.set_expanded(root, true)?;
        }
        let flat = Flattener::attach(&mut self.tree, root, self.config.show_root)?;
        let tracker = SelectionTracker::watch(&flat);
        debug!(
            message = "view.reload",
            root = %root,
            show_root = self.config.show_root,
            rows = flat.len() as u64
        );
        self.attached = Some(Attached { flat, tracker });
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(mut attached) = self.attached.take() {
            attached.flat.detach(&mut self.tree);
        }
    }

    fn root_stays_expanded(&self) -> bool {
        !(self.config.show_root && self.config.show_root_expander)
    }

    fn can_collapse(&self, node: NodeId) -> bool {
        Some(node) != self.root || !self.root_stays_expanded()
    }

    // ── Edits ───────────────────────────────────────────────────────────

    /// Run a structural edit, then repair the selection for rows it hid.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Tree<T>) -> R) -> R {
        let result = f(&mut self.tree);
        self.settle();
        result
    }

    fn settle(&mut self) {
        let Some(attached) = &self.attached else {
            return;
        };
        if let Some(node) = attached.tracker.settle(&mut self.tree, &attached.flat) {
            let index = attached.flat.index_of(&self.tree, node).ok().flatten();
            self.search.invalidate_for_selection(index);
        }
    }

    /// Expand or collapse `node`. Collapsing a root that must stay expanded
    /// is ignored. Returns whether the state changed.
    pub fn set_expanded(&mut self, node: NodeId, expanded: bool) -> Result<bool, ViewError> {
        if !expanded && !self.can_collapse(node) {
            return Ok(false);
        }
        let changed = self.edit(|tree| tree.set_expanded(node, expanded))?;
        Ok(changed)
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// First selected node that is shown, in row order.
    #[must_use]
    pub fn selected(&self) -> Option<NodeId> {
        let attached = self.attached.as_ref()?;
        self.tree
            .selected_in(attached.flat.root())
            .into_iter()
            .find(|&n| matches!(attached.flat.index_of(&self.tree, n), Ok(Some(_))))
    }

    /// Row of [`selected`](Self::selected).
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        let node = self.selected()?;
        self.index_of(node).ok().flatten()
    }

    /// Selected nodes without a selected ancestor.
    #[must_use]
    pub fn top_level_selection(&self) -> Vec<NodeId> {
        self.root
            .map(|root| selection::top_level_selection(&self.tree, root))
            .unwrap_or_default()
    }

    /// Make `node` the only selected node.
    pub fn select(&mut self, node: NodeId) -> Result<(), ViewError> {
        self.tree.select_only(node)?;
        let index = self.index_of(node).ok().flatten();
        self.search.invalidate_for_selection(index);
        Ok(())
    }

    /// Expand every ancestor of `node` up to the root so it gets a row, then
    /// select it.
    pub fn focus_node(&mut self, node: NodeId) -> Result<(), ViewError> {
        let root = self.root.ok_or(ViewError::InvalidState("tree view has no root"))?;
        if !self.tree.contains(node) || (node != root && !self.tree.is_ancestor(root, node)) {
            return Err(ViewError::InvalidState("node is not part of the view"));
        }
        if node == root && !self.config.show_root {
            return Err(ViewError::InvalidState("hidden root cannot take focus"));
        }
        let mut path: Vec<NodeId> = self.tree.ancestors(node).take_while(|&a| a != root).collect();
        path.push(root);
        self.edit(|tree| {
            path.iter()
                .rev()
                .try_for_each(|&a| tree.set_expanded(a, true).map(drop))
        })?;
        self.select(node)
    }

    // ── Input ───────────────────────────────────────────────────────────

    /// End an idle type-ahead session. Hosts call this from their tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.search.poll(now)
    }

    fn toggle_on_left(&mut self, node: NodeId) -> Result<(), ViewError> {
        if self.tree.is_expanded(node) && self.can_collapse(node) {
            self.set_expanded(node, false)?;
        } else if let Some(parent) = self.tree.parent(node)
            && matches!(self.index_of(parent), Ok(Some(_)))
        {
            self.select(parent)?;
        }
        Ok(())
    }

    // ── Drag and drop ───────────────────────────────────────────────────

    /// Resolve a drag of `payload` over `node`'s row.
    pub fn drag_over<P>(
        &self,
        node: NodeId,
        geometry: RowGeometry,
        payload: &P,
    ) -> Result<Option<DropTarget>, ViewError>
    where
        T: Droppable<P>,
        P: ?Sized,
    {
        self.resolver().resolve(&self.tree, self.flat()?, node, geometry, payload)
    }

    /// Drop target for the empty area below the rows: the end of a hidden
    /// root's children. `None` when the root row is shown or rejects the drop.
    pub fn background_target<P>(&self, payload: &P) -> Option<DropTarget>
    where
        T: Droppable<P>,
        P: ?Sized,
    {
        let root = self.root.filter(|_| !self.config.show_root)?;
        let index = self.tree.children(root).len();
        self.tree.get(root)?.can_drop(index, payload).then_some(DropTarget {
            owner: root,
            index,
            placement: DropPlacement::Inside,
            anchor: root,
        })
    }

    fn resolver(&self) -> DropResolver {
        DropResolver::new(self.config.allow_drop_reordering)
    }

    /// Resolve a drag of tree nodes over `node`'s row. Targets inside one of
    /// the dragged subtrees are never offered.
    pub fn drag_nodes_over(
        &self,
        node: NodeId,
        geometry: RowGeometry,
        dragged: &[NodeId],
    ) -> Result<Option<DropTarget>, ViewError>
    where
        T: Droppable<[NodeId]>,
    {
        let tree = &self.tree;
        self.resolver()
            .resolve_with(tree, self.flat()?, node, geometry, |owner, index| {
                dragged
                    .iter()
                    .all(|&d| d != owner && !tree.is_ancestor(d, owner))
                    && tree.get(owner).is_some_and(|t| t.can_drop(index, dragged))
            })
    }

    /// Resolve and apply a drop of `dragged` over `node`'s row. Returns the
    /// applied target, or `None` when the drop was rejected.
    pub fn drop_nodes(
        &mut self,
        node: NodeId,
        geometry: RowGeometry,
        dragged: &[NodeId],
    ) -> Result<Option<DropTarget>, ViewError>
    where
        T: Droppable<[NodeId]>,
    {
        let Some(target) = self.drag_nodes_over(node, geometry, dragged)? else {
            return Ok(None);
        };
        self.apply_drop(target, dragged)?;
        Ok(Some(target))
    }

    /// Move `dragged` to `target`, keeping their relative order. The owner
    /// is expanded so the dropped nodes stay on screen, and their selection
    /// survives the move.
    pub fn apply_drop(&mut self, target: DropTarget, dragged: &[NodeId]) -> Result<(), ViewError> {
        let mut at = target.index;
        let mut moved = 0;
        let mut result = Ok(());
        for &node in dragged {
            let ahead_in_owner = self.tree.parent(node) == Some(target.owner)
                && self.tree.child_position(node).is_some_and(|p| p < at);
            if let Err(err) = self.tree.move_node(node, target.owner, at) {
                result = Err(err);
                break;
            }
            moved += 1;
            if !ahead_in_owner {
                at += 1;
            }
        }
        // moved rows were removed and re-inserted; they did not go away
        if let Some(attached) = &self.attached {
            attached.tracker.discard();
        }
        if moved > 0 || result.is_ok() {
            self.edit(|tree| tree.set_expanded(target.owner, true))?;
        }
        if let Err(err) = result {
            debug!(
                message = "view.drop_failed",
                owner = %target.owner,
                moved = moved as u64,
                error = %err
            );
            return Err(err.into());
        }
        debug!(
            message = "view.drop",
            owner = %target.owner,
            index = target.index as u64,
            nodes = dragged.len() as u64
        );
        Ok(())
    }
}

impl<T: Displayable> TreeView<T> {
    /// React to a key. Navigation keys act on the selected row. Returns
    /// whether the key was handled.
    pub fn handle_key(&mut self, key: &TreeKey, now: Instant) -> Result<bool, ViewError> {
        let handled = match key {
            TreeKey::Text(text) => {
                if !self.config.text_search.enabled || text.is_empty() || self.attached.is_none() {
                    false
                } else {
                    let mut search = std::mem::take(&mut self.search);
                    search.on_text(self, text, now);
                    self.search = search;
                    true
                }
            }
            TreeKey::Backspace => {
                if self.config.text_search.enabled {
                    self.search.on_backspace(now);
                }
                self.config.text_search.enabled
            }
            _ => match self.selected() {
                Some(node) => {
                    self.navigate(node, key)?;
                    true
                }
                None => false,
            },
        };
        debug!(message = "view.key", ?key, handled);
        Ok(handled)
    }

    fn navigate(&mut self, node: NodeId, key: &TreeKey) -> Result<(), ViewError> {
        match key {
            TreeKey::Left => self.toggle_on_left(node)?,
            TreeKey::Right => {
                if !self.tree.is_expanded(node) && self.tree.has_children(node) {
                    self.set_expanded(node, true)?;
                }
            }
            TreeKey::Expand => {
                self.set_expanded(node, true)?;
            }
            TreeKey::Collapse => {
                self.set_expanded(node, false)?;
            }
            TreeKey::ExpandAll => {
                self.set_expanded(node, true)?;
                self.expand_recursively(node)?;
            }
            TreeKey::Backspace | TreeKey::Text(_) => {}
        }
        Ok(())
    }

    /// Expand `node` and its descendants, stopping below nodes whose payload
    /// refuses recursive expansion. Lazy children are loaded on the way.
    pub fn expand_recursively(&mut self, node: NodeId) -> Result<(), ViewError> {
        self.edit(|tree| {
            let mut stack = vec![node];
            while let Some(current) = stack.pop() {
                if !tree.get(current).is_some_and(Displayable::can_expand_recursively) {
                    continue;
                }
                tree.set_expanded(current, true)?;
                stack.extend(tree.children(current).iter().rev().copied());
            }
            Ok::<_, canopy_core::TreeError>(())
        })?;
        Ok(())
    }

    /// Remove the top-level selection from the tree when every node allows
    /// it, then select the row above the first removed one.
    ///
    /// Returns the removed subtree roots; they are detached, not destroyed.
    pub fn delete_selection(&mut self) -> Result<Vec<NodeId>, ViewError> {
        let top = self.top_level_selection();
        let deletable = !top.is_empty()
            && top.iter().all(|&n| {
                Some(n) != self.root && self.tree.get(n).is_some_and(Displayable::can_delete)
            });
        if !deletable {
            return Ok(Vec::new());
        }
        let first_row = self.index_of(top[0]).ok().flatten();
        for &n in &top {
            self.tree.remove(n)?;
        }
        if let Some(attached) = &self.attached {
            attached.tracker.discard();
        }
        self.tree.clear_selection();
        if let Some(attached) = &self.attached {
            let row = first_row.map_or(0, selection::fallback_row);
            selection::select_row(&mut self.tree, &attached.flat, row);
        }
        self.search.reset();
        debug!(message = "view.delete", nodes = top.len() as u64);
        Ok(top)
    }

    /// Sort `parent`'s children by label in natural order.
    pub fn sort_children(&mut self, parent: NodeId) -> Result<(), ViewError> {
        sort::sort_children_naturally(&mut self.tree, parent, &self.order)?;
        Ok(())
    }

    /// Sort every child list under the root by label in natural order.
    pub fn sort_all(&mut self) -> Result<(), ViewError> {
        let root = self.root.ok_or(ViewError::InvalidState("tree view has no root"))?;
        sort::sort_subtree_naturally(&mut self.tree, root, &self.order)?;
        Ok(())
    }
}

impl<T: Displayable> SearchHost for TreeView<T> {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn display_text(&self, index: usize) -> Option<Cow<'_, str>> {
        let node = self.rows()?.get(index).ok()?;
        self.tree.get(node).map(Displayable::display_text)
    }

    fn selected_index(&self) -> Option<usize> {
        TreeView::selected_index(self)
    }

    fn select(&mut self, index: usize) {
        if let Ok(node) = self.row(index) {
            // the search owns this selection change
            if let Err(err) = self.tree.select_only(node) {
                debug!(message = "search.select_failed", node = %node, error = %err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    struct Item {
        name: &'static str,
        locked: bool,
    }

    impl Item {
        fn new(name: &'static str) -> Self {
            Self { name, locked: false }
        }
    }

    impl Displayable for Item {
        fn display_text(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.name)
        }
        fn can_expand_recursively(&self) -> bool {
            !self.locked
        }
        fn can_delete(&self) -> bool {
            !self.locked
        }
    }

    impl Droppable<[NodeId]> for Item {
        fn can_drop(&self, _index: usize, _payload: &[NodeId]) -> bool {
            !self.locked
        }
    }

    struct Fixture {
        view: TreeView<Item>,
        root: NodeId,
        src: NodeId,
        main: NodeId,
        docs: NodeId,
    }

    /// root
    /// ├── src
    /// │   ├── main.rs
    /// │   └── lib.rs
    /// └── docs
    fn fixture(config: ViewConfig) -> Fixture {
        let mut tree = Tree::new();
        let root = tree.create(Item::new("root")).unwrap();
        let src = tree.append(root, Item::new("src")).unwrap();
        let main = tree.append(src, Item::new("main.rs")).unwrap();
        tree.append(src, Item::new("lib.rs")).unwrap();
        let docs = tree.append(root, Item::new("docs")).unwrap();
        let view = TreeView::with_root(tree, root, config).unwrap();
        Fixture { view, root, src, main, docs }
    }

    fn names(view: &TreeView<Item>) -> Vec<&'static str> {
        (0..view.len())
            .map(|i| view.tree().get(view.row(i).unwrap()).unwrap().name)
            .collect()
    }

    fn hidden_root() -> ViewConfig {
        ViewConfig {
            show_root: false,
            ..ViewConfig::default()
        }
    }

    #[test]
    fn reload_expands_root_and_projects() {
        let f = fixture(ViewConfig::default());
        assert!(f.view.tree().is_expanded(f.root));
        assert_eq!(names(&f.view), ["root", "src", "docs"]);

        let f = fixture(hidden_root());
        assert_eq!(names(&f.view), ["src", "docs"]);
    }

    #[test]
    fn root_with_expander_is_left_as_is() {
        let config = ViewConfig {
            show_root_expander: true,
            ..ViewConfig::default()
        };
        let f = fixture(config);
        assert!(!f.view.tree().is_expanded(f.root));
        assert_eq!(names(&f.view), ["root"]);
    }

    #[test]
    fn toggling_show_root_rebuilds() {
        let mut f = fixture(ViewConfig::default());
        f.view.set_show_root(false).unwrap();
        assert_eq!(names(&f.view), ["src", "docs"]);
        f.view.set_root(None).unwrap();
        assert!(f.view.is_empty());
        assert!(matches!(f.view.row(0), Err(ViewError::InvalidState(_))));
    }

    #[test]
    fn right_expands_and_left_collapses_then_climbs() {
        let mut f = fixture(ViewConfig::default());
        let t = Instant::now();
        f.view.select(f.src).unwrap();
        assert!(f.view.handle_key(&TreeKey::Right, t).unwrap());
        assert_eq!(names(&f.view), ["root", "src", "main.rs", "lib.rs", "docs"]);

        f.view.select(f.main).unwrap();
        f.view.handle_key(&TreeKey::Left, t).unwrap();
        assert_eq!(f.view.selected(), Some(f.src), "leaf climbs to parent");
        f.view.handle_key(&TreeKey::Left, t).unwrap();
        assert!(!f.view.tree().is_expanded(f.src));
        assert_eq!(f.view.selected(), Some(f.src));
    }

    #[test]
    fn root_without_expander_cannot_collapse() {
        let mut f = fixture(ViewConfig::default());
        f.view.select(f.root).unwrap();
        f.view.handle_key(&TreeKey::Collapse, Instant::now()).unwrap();
        assert!(f.view.tree().is_expanded(f.root));
    }

    #[test]
    fn keys_without_selection_are_not_handled() {
        let mut f = fixture(ViewConfig::default());
        assert!(!f.view.handle_key(&TreeKey::Right, Instant::now()).unwrap());
    }

    #[test]
    fn expand_all_respects_payload() {
        let mut f = fixture(ViewConfig::default());
        let locked = f.view.edit(|tree| {
            let l = tree.append(f.docs, Item { name: "vendor", locked: true }).unwrap();
            tree.append(l, Item::new("dep")).unwrap();
            l
        });
        f.view.select(f.root).unwrap();
        f.view.handle_key(&TreeKey::ExpandAll, Instant::now()).unwrap();
        assert!(f.view.tree().is_expanded(f.src));
        assert!(f.view.tree().is_expanded(f.docs));
        assert!(!f.view.tree().is_expanded(locked));
    }

    #[test]
    fn focus_node_reveals_and_selects() {
        let mut f = fixture(ViewConfig::default());
        f.view.focus_node(f.main).unwrap();
        assert!(f.view.tree().is_expanded(f.src));
        assert_eq!(f.view.selected_index(), Some(2));
    }

    #[test]
    fn focus_outside_view_is_rejected() {
        let mut f = fixture(ViewConfig::default());
        let stray = f.view.edit(|tree| tree.create(Item::new("stray"))).unwrap();
        assert!(matches!(f.view.focus_node(stray), Err(ViewError::InvalidState(_))));
    }

    #[test]
    fn collapsing_moves_hidden_selection_up() {
        let mut f = fixture(ViewConfig::default());
        f.view.focus_node(f.main).unwrap();
        f.view.set_expanded(f.src, false).unwrap();
        assert_eq!(f.view.selected(), Some(f.src));
        assert!(!f.view.tree().is_selected(f.main));
    }

    #[test]
    fn type_ahead_selects_rows() {
        let mut f = fixture(hidden_root());
        let t = Instant::now();
        assert!(f.view.handle_key(&TreeKey::char('d'), t).unwrap());
        assert_eq!(f.view.selected(), Some(f.docs));
        f.view.handle_key(&TreeKey::char('s'), t + Duration::from_secs(1)).unwrap();
        assert_eq!(f.view.selected(), Some(f.src));
        assert!(f.view.handle_key(&TreeKey::Backspace, t + Duration::from_secs(1)).unwrap());
    }

    #[test]
    fn disabled_search_ignores_text() {
        let mut config = hidden_root();
        config.text_search.enabled = false;
        let mut f = fixture(config);
        assert!(!f.view.handle_key(&TreeKey::char('d'), Instant::now()).unwrap());
        assert_eq!(f.view.selected(), None);
    }

    #[test]
    fn delete_selection_removes_and_reselects() {
        let mut f = fixture(ViewConfig::default());
        f.view.select(f.docs).unwrap();
        let removed = f.view.delete_selection().unwrap();
        assert_eq!(removed, vec![f.docs]);
        assert_eq!(names(&f.view), ["root", "src"]);
        assert_eq!(f.view.selected(), Some(f.src));
    }

    #[test]
    fn locked_or_root_selection_is_not_deleted() {
        let mut f = fixture(ViewConfig::default());
        f.view.select(f.root).unwrap();
        assert!(f.view.delete_selection().unwrap().is_empty());

        let locked = f.view.edit(|tree| tree.append(f.root, Item { name: "lock", locked: true }).unwrap());
        f.view.select(locked).unwrap();
        assert!(f.view.delete_selection().unwrap().is_empty());
        assert_eq!(f.view.len(), 4);
    }

    #[test]
    fn drop_moves_nodes_inside() {
        let mut f = fixture(ViewConfig::default());
        let target = f
            .view
            .drop_nodes(f.src, RowGeometry::at_fraction(10.0, 0.5), &[f.docs])
            .unwrap()
            .unwrap();
        assert_eq!(target.placement, DropPlacement::Inside);
        assert_eq!(f.view.tree().parent(f.docs), Some(f.src));
        assert_eq!(names(&f.view), ["root", "src", "main.rs", "lib.rs", "docs"]);
    }

    #[test]
    fn drop_reorders_siblings() {
        let mut config = ViewConfig::default();
        config.allow_drop_reordering = true;
        let mut f = fixture(config);
        f.view
            .drop_nodes(f.src, RowGeometry::at_fraction(10.0, 0.1), &[f.docs])
            .unwrap()
            .unwrap();
        assert_eq!(names(&f.view), ["root", "docs", "src"]);
    }

    #[test]
    fn drop_into_own_subtree_is_rejected() {
        let mut f = fixture(ViewConfig::default());
        f.view.set_expanded(f.src, true).unwrap();
        let t = f
            .view
            .drop_nodes(f.main, RowGeometry::at_fraction(10.0, 0.5), &[f.src])
            .unwrap();
        assert_eq!(t, None);
    }

    #[test]
    fn background_drop_targets_hidden_root() {
        let nothing: &[NodeId] = &[];
        let f = fixture(hidden_root());
        let t = f.view.background_target(nothing).unwrap();
        assert_eq!((t.owner, t.index), (f.root, 2));
        let f = fixture(ViewConfig::default());
        assert_eq!(f.view.background_target(nothing), None);
    }

    #[test]
    fn sort_all_orders_labels() {
        let mut f = fixture(ViewConfig::default());
        f.view.sort_all().unwrap();
        assert_eq!(names(&f.view), ["root", "docs", "src"]);
        f.view.set_expanded(f.src, true).unwrap();
        assert_eq!(names(&f.view), ["root", "docs", "src", "lib.rs", "main.rs"]);
    }

    #[test]
    fn failed_drop_keeps_moved_selection() {
        let mut f = fixture(ViewConfig::default());
        f.view.select(f.docs).unwrap();
        let target = DropTarget {
            owner: f.src,
            index: 0,
            placement: DropPlacement::Inside,
            anchor: f.src,
        };
        // docs moves, then src cannot move into itself
        let err = f.view.apply_drop(target, &[f.docs, f.src]).unwrap_err();
        assert!(matches!(err, ViewError::Tree(canopy_core::TreeError::WouldCycle { .. })));
        assert_eq!(f.view.tree().parent(f.docs), Some(f.src));
        assert!(!f.view.attached.as_ref().unwrap().tracker.has_pending());
        assert_eq!(f.view.selected(), Some(f.docs));
        assert_eq!(names(&f.view), ["root", "src", "docs", "main.rs", "lib.rs"]);

        // a later edit does not replay the drop's removals
        f.view.edit(|_| ());
        assert_eq!(f.view.selected(), Some(f.docs));
    }

    #[test]
    fn search_selection_ignores_missing_rows() {
        let mut f = fixture(hidden_root());
        SearchHost::select(&mut f.view, 7);
        assert_eq!(f.view.selected(), None);
        SearchHost::select(&mut f.view, 1);
        assert_eq!(f.view.selected(), Some(f.docs));
    }
}
