#![forbid(unsafe_code)]

//! Canopy public facade crate.
//!
//! Re-exports the types a host needs to drive a tree view and offers a
//! prelude for day-to-day use. The member crates stay available under
//! [`core`], [`text`] and [`view`].

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use canopy_core::{
    Broadcast, Displayable, Droppable, NodeFlags, NodeId, ObserverId, RowGeometry, Subscription,
    Tree, TreeError, TreeEvent, TreeKey, TreeObserver,
};

// --- Text re-exports -------------------------------------------------------

pub use canopy_text::{CaseMode, Collator, NaturalOrder, OrdinalCollator, Tailoring, UnicodeCollator, natural_cmp};

// --- View re-exports -------------------------------------------------------

pub use canopy_view::{
    ConfigError, DropPlacement, DropResolver, DropTarget, FlatDelta, Flattener, SearchHost, TextSearch,
    TreeView, ViewConfig, ViewError,
};

// --- Errors ---------------------------------------------------------------

/// Any error a Canopy operation can report.
#[derive(Debug)]
pub enum Error {
    /// A structural edit was rejected.
    Tree(TreeError),
    /// A view operation failed.
    View(ViewError),
    /// A configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(err) => write!(f, "{err}"),
            Self::View(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::View(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<TreeError> for Error {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

impl From<ViewError> for Error {
    fn from(err: ViewError) -> Self {
        Self::View(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for Canopy APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Displayable, DropPlacement, DropTarget, Droppable, Error, FlatDelta, Flattener, NaturalOrder,
        NodeId, Result, RowGeometry, Tree, TreeKey, TreeView, ViewConfig,
    };

    pub use crate::{core, text, view};
}

pub use canopy_core as core;
pub use canopy_text as text;
pub use canopy_view as view;
