#![forbid(unsafe_code)]

//! Structural edit errors.

use crate::tree::NodeId;
use std::fmt;

/// Errors reported by [`Tree`](crate::Tree) operations.
///
/// All of these are contract violations by the caller (stale handles,
/// impossible edits). They are surfaced immediately and never degraded to a
/// silent no-op, because a silently ignored edit leaves the view showing a
/// structure the caller did not ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The handle refers to a node that was destroyed (or never existed).
    StaleNode(NodeId),
    /// Inserting `node` under `parent` would make a node its own ancestor.
    WouldCycle {
        /// Node being inserted.
        node: NodeId,
        /// Requested parent.
        parent: NodeId,
    },
    /// The node already has a parent; remove it first.
    AlreadyAttached {
        /// Node being inserted.
        node: NodeId,
        /// Its current parent.
        parent: NodeId,
    },
    /// The child index is past the end of the parent's children.
    ChildIndexOutOfRange {
        /// Parent whose children were addressed.
        parent: NodeId,
        /// Requested index.
        index: usize,
        /// Current number of children.
        len: usize,
    },
    /// Only detached subtrees can be destroyed.
    NotDetached(NodeId),
    /// Every arena slot up to the node limit is in use.
    ArenaFull {
        /// The tree's node limit.
        limit: u32,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleNode(id) => write!(f, "stale node handle {id}"),
            Self::WouldCycle { node, parent } => {
                write!(f, "inserting {node} under {parent} would create a cycle")
            }
            Self::AlreadyAttached { node, parent } => {
                write!(f, "{node} is already a child of {parent}")
            }
            Self::ChildIndexOutOfRange { parent, index, len } => write!(
                f,
                "child index {index} out of range for {parent} with {len} children"
            ),
            Self::NotDetached(id) => write!(f, "{id} is still attached to a parent"),
            Self::ArenaFull { limit } => write!(f, "tree arena is full ({limit} nodes)"),
        }
    }
}

impl std::error::Error for TreeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_indices() {
        let err = TreeError::ChildIndexOutOfRange {
            parent: NodeId::from_raw_parts(3, 0),
            index: 7,
            len: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains('7'), "missing index in {msg}");
        assert!(msg.contains("2 children"), "missing len in {msg}");
    }

    #[test]
    fn errors_are_std_errors() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&TreeError::StaleNode(NodeId::from_raw_parts(0, 1)));
    }
}
