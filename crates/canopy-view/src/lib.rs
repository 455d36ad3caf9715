#![forbid(unsafe_code)]

//! View: the interaction engine behind a virtualized tree view.
//!
//! # Role in Canopy
//! A renderer draws a list of rows; this crate decides which rows exist and
//! how input changes them. It reads a [`canopy_core::Tree`] and follows its
//! events, never owning rendering state.
//!
//! # Primary responsibilities
//! - **Flattener**: the visible nodes under a root as an indexable sequence,
//!   patched incrementally and published as [`FlatDelta`]s.
//! - **DropResolver**: pointer position over a row to a structural
//!   insertion point ([`DropTarget`]).
//! - **TextSearch**: type-ahead selection with an idle timeout.
//! - **TreeView**: the controller tying these to keyboard input, selection
//!   repair, deletion and natural-order sorting.
//!
//! # Configuration
//! [`ViewConfig`] holds every tunable. Enable the `config` feature to load it
//! from TOML or JSON.

pub mod config;
pub mod drop_target;
pub mod error;
pub mod flatten;
pub mod selection;
pub mod sort;
pub mod text_search;
pub mod timer;
pub mod view;

pub use config::{CollationConfig, ConfigError, TextSearchConfig, ViewConfig};
pub use drop_target::{DropPlacement, DropResolver, DropTarget, DropZone, DropZones};
pub use error::ViewError;
pub use flatten::{FlatDelta, Flattener};
pub use selection::{SelectionTracker, top_level_selection};
pub use sort::{sort_children_naturally, sort_subtree_naturally};
pub use text_search::{SearchHost, TextSearch};
pub use timer::{DEFAULT_IDLE_TIMEOUT, IdleTimer};
pub use view::TreeView;
