#![forbid(unsafe_code)]

//! Prefix matching for type-ahead search.
//!
//! Matching walks extended grapheme clusters so a typed `"é"` matches a
//! label spelled with a combining accent, and compares clusters after
//! lowercasing unless case sensitivity is requested.

use std::borrow::Cow;
use unicode_normalization::{IsNormalized, UnicodeNormalization, is_nfc_quick};
use unicode_segmentation::UnicodeSegmentation;

/// Case handling for [`starts_with`] and [`eq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseMode {
    /// `"A"` matches `"a"`.
    #[default]
    Insensitive,
    /// Exact grapheme equality.
    Sensitive,
}

impl CaseMode {
    /// `Sensitive` when `case_sensitive` is true.
    #[must_use]
    pub const fn from_sensitive(case_sensitive: bool) -> Self {
        if case_sensitive {
            Self::Sensitive
        } else {
            Self::Insensitive
        }
    }
}

fn nfc(s: &str) -> Cow<'_, str> {
    if matches!(is_nfc_quick(s.chars()), IsNormalized::Yes) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.nfc().collect())
    }
}

fn grapheme_eq(a: &str, b: &str, mode: CaseMode) -> bool {
    match mode {
        CaseMode::Sensitive => a == b,
        CaseMode::Insensitive => {
            a == b || a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
        }
    }
}

/// Whether `text` starts with `prefix`.
///
/// An empty prefix matches everything.
#[must_use]
pub fn starts_with(text: &str, prefix: &str, mode: CaseMode) -> bool {
    if prefix.is_empty() {
        return true;
    }
    if text.is_ascii() && prefix.is_ascii() {
        return text.len() >= prefix.len()
            && match mode {
                CaseMode::Sensitive => text.as_bytes().starts_with(prefix.as_bytes()),
                CaseMode::Insensitive => text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes()),
            };
    }
    let text = nfc(text);
    let prefix = nfc(prefix);
    let mut haystack = text.graphemes(true);
    prefix
        .graphemes(true)
        .all(|p| haystack.next().is_some_and(|t| grapheme_eq(t, p, mode)))
}

/// Whether `a` and `b` are equal under `mode`.
#[must_use]
pub fn eq(a: &str, b: &str, mode: CaseMode) -> bool {
    let a = nfc(a);
    let b = nfc(b);
    a.graphemes(true).count() == b.graphemes(true).count() && starts_with(&a, &b, mode)
}
