#![no_main]

use arbitrary::Arbitrary;
use canopy_core::{NodeId, Tree};
use canopy_view::Flattener;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Toggle(u8),
    Append(u8),
    Remove(u8),
    Move { node: u8, parent: u8, index: u8 },
    Sort(u8),
    ShowRoot(bool),
}

fn nodes(tree: &Tree<u32>, root: NodeId) -> Vec<NodeId> {
    let mut all = vec![root];
    all.extend(tree.descendants(root));
    all
}

fn oracle(tree: &Tree<u32>, root: NodeId, show_root: bool) -> Vec<NodeId> {
    let mut out = Vec::new();
    if show_root {
        tree.collect_visible(root, &mut out);
    } else {
        tree.collect_visible_descendants(root, &mut out);
    }
    out
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 256 {
        return;
    }
    let mut tree: Tree<u32> = Tree::new();
    let root = tree.create(0).expect("empty arena");
    let flat = Flattener::attach(&mut tree, root, true).expect("live root");
    let mut next = 0u32;

    for op in &ops {
        let all = nodes(&tree, root);
        let pick = |i: u8| all[i as usize % all.len()];
        match *op {
            Op::Toggle(i) => {
                tree.toggle_expanded(pick(i)).expect("live node");
            }
            Op::Append(i) => {
                next += 1;
                tree.append(pick(i), next).expect("live parent");
            }
            Op::Remove(i) => {
                let n = pick(i);
                if n != root {
                    tree.remove(n).expect("attached node");
                }
            }
            Op::Move { node, parent, index } => {
                let (n, p) = (pick(node), pick(parent));
                if n != root && n != p && !tree.is_ancestor(n, p) {
                    let len = tree.children(p).len();
                    tree.move_node(n, p, index as usize % (len + 1)).expect("valid move");
                }
            }
            Op::Sort(i) => {
                tree.sort_children_by(pick(i), |a, b| b.cmp(a)).expect("live parent");
            }
            Op::ShowRoot(show) => {
                flat.set_show_root(&tree, show).expect("attached");
            }
        }

        // The incremental sequence must equal a from-scratch walk.
        assert_eq!(
            flat.to_vec(),
            oracle(&tree, root, flat.show_root()),
            "flattener drifted after {op:?}"
        );
    }
});
