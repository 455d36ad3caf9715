#![forbid(unsafe_code)]

//! Natural ordering of children by their labels.

use canopy_core::{Displayable, NodeId, Tree, TreeError};
use canopy_text::{Collator, NaturalOrder};
use tracing::debug;

/// Sort `parent`'s children by display text with `order` (stable).
///
/// Publishes a reorder event when the order changed, so attached views
/// follow along.
pub fn sort_children_naturally<T, C>(
    tree: &mut Tree<T>,
    parent: NodeId,
    order: &NaturalOrder<C>,
) -> Result<(), TreeError>
where
    T: Displayable,
    C: Collator,
{
    tree.sort_children_by(parent, |a, b| order.compare(&a.display_text(), &b.display_text()))
}

/// Sort every child list in `root`'s subtree, loaded or not yet visible.
///
/// Lazy nodes that were never expanded are left unloaded.
pub fn sort_subtree_naturally<T, C>(
    tree: &mut Tree<T>,
    root: NodeId,
    order: &NaturalOrder<C>,
) -> Result<(), TreeError>
where
    T: Displayable,
    C: Collator,
{
    if !tree.contains(root) {
        return Err(TreeError::StaleNode(root));
    }
    let parents: Vec<NodeId> = std::iter::once(root)
        .chain(tree.descendants(root))
        .filter(|&n| tree.children(n).len() > 1)
        .collect();
    for &parent in &parents {
        sort_children_naturally(tree, parent, order)?;
    }
    debug!(message = "sort.subtree", root = %root, lists = parents.len() as u64);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::{TreeEvent, TreeObserver};
    use canopy_text::UnicodeCollator;
    use std::cell::Cell;
    use std::rc::Rc;

    fn order() -> NaturalOrder {
        NaturalOrder::new(UnicodeCollator::new())
    }

    fn labels(tree: &Tree<String>, parent: NodeId) -> Vec<&str> {
        tree.children(parent)
            .iter()
            .filter_map(|&c| tree.get(c).map(String::as_str))
            .collect()
    }

    fn tree_of(names: &[&str]) -> (Tree<String>, NodeId) {
        let mut tree = Tree::new();
        let root = tree.create("root".to_owned()).unwrap();
        for name in names {
            tree.append(root, (*name).to_owned()).unwrap();
        }
        (tree, root)
    }

    #[test]
    fn numbers_sort_by_value() {
        let (mut tree, root) = tree_of(&["file10", "file2", "File1", "file02"]);
        sort_children_naturally(&mut tree, root, &order()).unwrap();
        assert_eq!(labels(&tree, root), ["File1", "file2", "file02", "file10"]);
    }

    #[test]
    fn subtree_sort_reaches_collapsed_levels() {
        let (mut tree, root) = tree_of(&["b", "a"]);
        let b = tree.children(root)[0];
        tree.append(b, "x10".to_owned()).unwrap();
        tree.append(b, "x9".to_owned()).unwrap();
        sort_subtree_naturally(&mut tree, root, &order()).unwrap();
        assert_eq!(labels(&tree, root), ["a", "b"]);
        assert_eq!(labels(&tree, b), ["x9", "x10"]);
    }

    #[test]
    fn already_sorted_publishes_nothing() {
        struct Count(Cell<usize>);
        impl TreeObserver<String> for Count {
            fn on_tree_event(&self, _tree: &Tree<String>, event: &TreeEvent) {
                if matches!(event, TreeEvent::Reordered { .. }) {
                    self.0.set(self.0.get() + 1);
                }
            }
        }
        let (mut tree, root) = tree_of(&["a1", "a2", "a10"]);
        let count = Rc::new(Count(Cell::new(0)));
        let _id = tree.subscribe(&count);
        sort_children_naturally(&mut tree, root, &order()).unwrap();
        assert_eq!(count.0.get(), 0);

        tree.append(root, "a0".to_owned()).unwrap();
        sort_children_naturally(&mut tree, root, &order()).unwrap();
        assert_eq!(count.0.get(), 1);
    }

    #[test]
    fn hyphen_prefixed_numbers_sort_with_their_values() {
        // two fixed scrambles of 0..40; each value appears once in each form
        let name = |n: usize, hyphen: bool| if hyphen { format!("-{n}.log") } else { format!("{n}.log") };
        let mut names: Vec<String> = (0..40).map(|k| (k * 37) % 40).map(|n| name(n, n % 2 == 1)).collect();
        names.extend((0..40).map(|k| (k * 13) % 40).map(|n| name(n, n % 2 == 0)));
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (mut tree, root) = tree_of(&refs);
        sort_children_naturally(&mut tree, root, &order()).unwrap();

        let expected: Vec<String> = (0..40).flat_map(|n| [name(n, false), name(n, true)]).collect();
        let sorted = labels(&tree, root);
        assert_eq!(sorted, expected);
    }

    #[test]
    fn stale_root_is_reported() {
        let mut tree: Tree<String> = Tree::new();
        let n = tree.create("n".to_owned()).unwrap();
        tree.destroy(n).unwrap();
        assert_eq!(
            sort_subtree_naturally(&mut tree, n, &order()),
            Err(TreeError::StaleNode(n))
        );
    }
}
