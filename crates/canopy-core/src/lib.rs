#![forbid(unsafe_code)]

//! Core: the node model behind Canopy tree views.
//!
//! # Role in Canopy
//! `canopy-core` owns the hierarchical data. Everything else in the workspace
//! (flattening, drop resolution, type-ahead search) reads the tree through the
//! types defined here and learns about structural edits through
//! [`TreeEvent`] notifications.
//!
//! # Primary responsibilities
//! - **Tree**: a generational arena of nodes. Parents own their children;
//!   the parent link is a plain [`NodeId`], never a second owner.
//! - **TreeEvent / TreeObserver**: synchronous structural change
//!   notifications delivered to weakly held observers.
//! - **Broadcast**: a small subscriber list used by views to publish their
//!   own deltas.
//! - **Capabilities**: [`Displayable`] and [`Droppable`] describe what a node
//!   payload can do, resolved statically per payload type.
//!
//! # How it fits in the system
//! `canopy-view` attaches flatteners to a [`Tree`] and drives selection and
//! drag-and-drop from host input ([`TreeKey`], [`RowGeometry`]).

pub mod capability;
pub mod error;
pub mod geometry;
pub mod input;
pub mod observer;
pub mod tree;

pub use capability::{Displayable, Droppable};
pub use error::TreeError;
pub use geometry::RowGeometry;
pub use input::TreeKey;
pub use observer::{Broadcast, ObserverId, Subscription, TreeObserver};
pub use tree::{NodeFlags, NodeId, Tree, TreeEvent};
