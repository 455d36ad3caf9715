#![forbid(unsafe_code)]

//! Text: ordering and matching of node labels.
//!
//! # Role in Canopy
//! Tree views sort children and run type-ahead search over display text.
//! This crate provides the string-level pieces, independent of any tree:
//!
//! - [`collation`]: the [`Collator`] trait and a tiered, locale-tailored
//!   [`UnicodeCollator`].
//! - [`natural`]: [`NaturalOrder`], comparing embedded numbers by value.
//! - [`digits`]: Unicode decimal digit classification.
//! - [`prefix`]: grapheme-aware, case-insensitive prefix tests.
//! - [`locale`]: locale detection and tailoring selection.

pub mod collation;
pub mod digits;
pub mod locale;
pub mod natural;
pub mod prefix;

pub use collation::{Collator, OrdinalCollator, SortKey, UnicodeCollator};
pub use digits::{DecimalDigit, decimal_digit, is_decimal_digit};
pub use locale::{Locale, Tailoring, detect_system_locale, normalize_locale};
pub use natural::{NaturalOrder, natural_cmp};
pub use prefix::CaseMode;
