//! Property-based invariant tests for the arena tree.
//!
//! 1. visible_rows(n) == 1 + visible descendants, for every node, after every edit.
//! 2. A parent lists each child exactly once and the child points back.
//! 3. Collapse followed by expand restores the visible enumeration.
//! 4. sort_children_by is stable.

use canopy_core::{NodeId, Tree};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Toggle(usize),
    Append(usize),
    Remove(usize),
    Reinsert { node: usize, parent: usize, index: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<usize>().prop_map(Op::Toggle),
        3 => any::<usize>().prop_map(Op::Append),
        1 => any::<usize>().prop_map(Op::Remove),
        1 => (any::<usize>(), any::<usize>(), any::<usize>())
            .prop_map(|(node, parent, index)| Op::Reinsert { node, parent, index }),
    ]
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn attached(tree: &Tree<u32>, root: NodeId) -> Vec<NodeId> {
    let mut all = vec![root];
    all.extend(tree.descendants(root));
    all
}

fn apply(tree: &mut Tree<u32>, root: NodeId, detached: &mut Vec<NodeId>, op: &Op, next: &mut u32) {
    let nodes = attached(tree, root);
    match *op {
        Op::Toggle(i) => {
            let n = nodes[i % nodes.len()];
            tree.toggle_expanded(n).unwrap();
        }
        Op::Append(i) => {
            let n = nodes[i % nodes.len()];
            *next += 1;
            tree.append(n, *next).unwrap();
        }
        Op::Remove(i) => {
            if nodes.len() > 1 {
                let n = nodes[1 + i % (nodes.len() - 1)];
                tree.remove(n).unwrap();
                detached.push(n);
            }
        }
        Op::Reinsert { node, parent, index } => {
            if detached.is_empty() {
                return;
            }
            let n = detached.swap_remove(node % detached.len());
            let p = nodes[parent % nodes.len()];
            let len = tree.children(p).len();
            tree.insert(p, index % (len + 1), n).unwrap();
        }
    }
}

fn naive_rows(tree: &Tree<u32>, id: NodeId) -> usize {
    if !tree.is_expanded(id) {
        return 1;
    }
    1 + tree
        .children(id)
        .iter()
        .map(|&c| naive_rows(tree, c))
        .sum::<usize>()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Row counts match a from-scratch recount after every edit
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rows_match_recount(ops in proptest::collection::vec(op(), 1..80)) {
        let mut tree: Tree<u32> = Tree::new();
        let root = tree.create(0).unwrap();
        let mut detached = Vec::new();
        let mut next = 0;
        for op in &ops {
            apply(&mut tree, root, &mut detached, op, &mut next);
            for n in attached(&tree, root) {
                prop_assert_eq!(
                    tree.visible_rows(n), naive_rows(&tree, n),
                    "row count drift at {} after {:?}", n, op
                );
            }
            for &d in &detached {
                prop_assert_eq!(tree.visible_rows(d), naive_rows(&tree, d));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Parent and child links agree
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn parent_links_agree(ops in proptest::collection::vec(op(), 1..80)) {
        let mut tree: Tree<u32> = Tree::new();
        let root = tree.create(0).unwrap();
        let mut detached = Vec::new();
        let mut next = 0;
        for op in &ops {
            apply(&mut tree, root, &mut detached, op, &mut next);
        }
        for n in attached(&tree, root) {
            for (pos, &c) in tree.children(n).iter().enumerate() {
                prop_assert_eq!(tree.parent(c), Some(n));
                prop_assert_eq!(tree.child_position(c), Some(pos));
            }
        }
        for &d in &detached {
            prop_assert_eq!(tree.parent(d), None);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Collapse / expand round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn collapse_expand_round_trip(
        ops in proptest::collection::vec(op(), 1..60),
        pick in any::<usize>(),
    ) {
        let mut tree: Tree<u32> = Tree::new();
        let root = tree.create(0).unwrap();
        tree.set_expanded(root, true).unwrap();
        let mut detached = Vec::new();
        let mut next = 0;
        for op in &ops {
            apply(&mut tree, root, &mut detached, op, &mut next);
        }
        let nodes = attached(&tree, root);
        let n = nodes[pick % nodes.len()];
        tree.set_expanded(n, true).unwrap();

        let mut before = Vec::new();
        tree.collect_visible(root, &mut before);
        tree.set_expanded(n, false).unwrap();
        tree.set_expanded(n, true).unwrap();
        let mut after = Vec::new();
        tree.collect_visible(root, &mut after);
        prop_assert_eq!(before, after);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Sorting is stable
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sort_is_stable(keys in proptest::collection::vec(0u32..4, 0..30)) {
        let mut tree: Tree<(u32, usize)> = Tree::new();
        let root = tree.create((0, 0)).unwrap();
        for (i, &k) in keys.iter().enumerate() {
            tree.append(root, (k, i)).unwrap();
        }
        tree.sort_children_by(root, |a, b| a.0.cmp(&b.0)).unwrap();
        let order: Vec<(u32, usize)> = tree
            .children(root)
            .iter()
            .map(|&c| *tree.get(c).unwrap())
            .collect();
        for pair in order.windows(2) {
            prop_assert!(pair[0].0 < pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1));
        }
    }
}
