#![forbid(unsafe_code)]

//! Locale-aware string comparison.
//!
//! # Levels
//!
//! [`UnicodeCollator`] compares strings through a [`SortKey`] with four
//! levels, each consulted only when all previous levels tie:
//!
//! 1. **Primary**: character class (whitespace < punctuation < symbol <
//!    digit < letter), then the case-folded base character. Hyphens,
//!    apostrophes and soft hyphens are ignorable and have no primary weight.
//! 2. **Secondary**: combining marks (accents) and the script of digits.
//! 3. **Tertiary**: case, lowercase first. Skipped when ignoring case.
//! 4. **Quaternary**: the ignorable characters and their positions.
//!
//! Input is NFC-normalized first, so precomposed and decomposed spellings of
//! the same text compare equal.
//!
//! # Example
//!
//! ```
//! use canopy_text::{Collator, UnicodeCollator};
//! use std::cmp::Ordering;
//!
//! let root = UnicodeCollator::new();
//! assert_eq!(root.compare("apple", "Apple"), Ordering::Equal);
//! assert_eq!(root.compare("zebra", "Ärger"), Ordering::Greater);
//!
//! let swedish = UnicodeCollator::for_locale("sv-SE");
//! assert_eq!(swedish.compare("zebra", "Ärger"), Ordering::Less);
//! ```

use crate::digits::decimal_digit;
use crate::locale::{Tailoring, letter_weight};
use smallvec::SmallVec;
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::{canonical_combining_class, decompose_canonical};

/// A total order over strings.
pub trait Collator {
    /// Compare two strings.
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

impl<C: Collator + ?Sized> Collator for &C {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        (**self).compare(a, b)
    }
}

/// Plain code point order. Useful as a baseline in tests and benches.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinalCollator;

impl Collator for OrdinalCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Whitespace,
    Punctuation,
    Symbol,
    Digit,
    Letter,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_whitespace() {
            Self::Whitespace
        } else if decimal_digit(c).is_some() {
            Self::Digit
        } else if c.is_alphanumeric() {
            Self::Letter
        } else if is_punctuation(c) {
            Self::Punctuation
        } else {
            Self::Symbol
        }
    }
}

fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation() && !matches!(c, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~');
    }
    matches!(
        c,
        '¡' | '§' | '«' | '¶' | '·' | '»' | '¿' | '\u{2010}'..='\u{2027}' | '\u{2030}'..='\u{205E}' | '\u{3001}'..='\u{3003}' | '\u{3008}'..='\u{3011}'
    )
}

/// Combining marks of one character, in canonical order.
type Marks = SmallVec<[char; 2]>;

fn is_ignorable(c: char) -> bool {
    matches!(c, '-' | '\'' | '\u{AD}' | '\u{2010}' | '\u{2011}' | '\u{2019}')
}

/// Precomputed comparison key for one string.
///
/// Keys from the same collator order exactly like
/// [`Collator::compare`] on the original strings, so sorting many strings
/// can build each key once.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    primary: Vec<u64>,
    secondary: Vec<(u8, Marks)>,
    tertiary: Vec<bool>,
    quaternary: Vec<(u32, char)>,
}

impl SortKey {
    /// Whether two keys tie on the primary level.
    #[must_use]
    pub fn primary_eq(&self, other: &Self) -> bool {
        self.primary == other.primary
    }
}

/// Tiered Unicode collator with locale tailorings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnicodeCollator {
    tailoring: Tailoring,
    ignore_case: bool,
}

impl Default for UnicodeCollator {
    fn default() -> Self {
        Self::new()
    }
}

impl UnicodeCollator {
    /// Untailored, case-insensitive collator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tailoring: Tailoring::Root,
            ignore_case: true,
        }
    }

    /// Case-insensitive collator tailored for `locale`.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        Self {
            tailoring: Tailoring::for_locale(locale),
            ignore_case: true,
        }
    }

    /// Case-insensitive collator for the locale detected from the environment.
    #[must_use]
    pub fn system() -> Self {
        Self {
            tailoring: Tailoring::detect(),
            ignore_case: true,
        }
    }

    /// Set whether case differences are ignored.
    #[must_use]
    pub const fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Active tailoring.
    #[must_use]
    pub const fn tailoring(&self) -> Tailoring {
        self.tailoring
    }

    /// Whether case differences are ignored.
    #[must_use]
    pub const fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Build the comparison key for `s`.
    #[must_use]
    pub fn sort_key(&self, s: &str) -> SortKey {
        let mut key = SortKey::default();
        for (pos, c) in s.nfc().enumerate() {
            let pos = u32::try_from(pos).unwrap_or(u32::MAX);
            if is_ignorable(c) {
                key.quaternary.push((pos, c));
                continue;
            }
            let lower = self.tailoring.to_lower(c);
            let upper = lower != c;

            if let Some(weight) = self.tailoring.tailored_weight(lower) {
                self.push(&mut key, Self::weight(CharClass::Letter, weight), (0, Marks::new()), upper);
                continue;
            }

            let mut base = None;
            let mut marks = Marks::new();
            decompose_canonical(lower, |d| {
                if base.is_none() && canonical_combining_class(d) == 0 {
                    base = Some(d);
                } else {
                    marks.push(d);
                }
            });

            match base {
                Some(base) => {
                    let class = CharClass::of(base);
                    let (weight, script) = match class {
                        CharClass::Digit => decimal_digit(base).map_or((u32::from(base), 0), |d| {
                            (u32::from(d.value), u8::try_from(d.block()).unwrap_or(u8::MAX))
                        }),
                        CharClass::Letter => (letter_weight(base), 0),
                        _ => (u32::from(base), 0),
                    };
                    self.push(&mut key, Self::weight(class, weight), (script, marks), upper);
                }
                // a mark that did not compose attaches to the previous character
                None => match key.secondary.last_mut() {
                    Some(last) => last.1.extend(marks),
                    None => key.quaternary.push((pos, c)),
                },
            }
        }
        key
    }

    fn weight(class: CharClass, weight: u32) -> u64 {
        ((class as u64) << 32) | u64::from(weight)
    }

    fn push(&self, key: &mut SortKey, primary: u64, secondary: (u8, Marks), upper: bool) {
        key.primary.push(primary);
        key.secondary.push(secondary);
        if !self.ignore_case {
            key.tertiary.push(upper);
        }
    }
}

impl Collator for UnicodeCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        self.sort_key(a).cmp(&self.sort_key(b))
    }
}
