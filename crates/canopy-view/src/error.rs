#![forbid(unsafe_code)]

//! View-level errors.

use canopy_core::TreeError;
use std::fmt;

/// Errors reported by flatteners, the drop resolver and [`TreeView`](crate::TreeView).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The operation needs state the view does not have: a detached
    /// flattener, or a node outside the attached tree.
    InvalidState(&'static str),
    /// A flat index past the end of the sequence.
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current sequence length.
        len: usize,
    },
    /// A structural edit was rejected by the tree.
    Tree(TreeError),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState(what) => write!(f, "invalid view state: {what}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "flat index {index} out of range (len {len})")
            }
            Self::Tree(e) => write!(f, "tree edit failed: {e}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TreeError> for ViewError {
    fn from(e: TreeError) -> Self {
        Self::Tree(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::NodeId;
    use std::error::Error;

    #[test]
    fn index_error_reports_bounds() {
        let msg = ViewError::IndexOutOfRange { index: 5, len: 3 }.to_string();
        assert!(msg.contains('5') && msg.contains("len 3"), "{msg}");
    }

    #[test]
    fn tree_errors_convert_and_chain() {
        let err: ViewError = TreeError::StaleNode(NodeId::from_raw_parts(1, 2)).into();
        assert!(matches!(err, ViewError::Tree(TreeError::StaleNode(_))));
        assert!(err.source().is_some());
        assert!(ViewError::InvalidState("detached").source().is_none());
    }
}
