#![forbid(unsafe_code)]

//! Natural ("human") string ordering.
//!
//! Strings are walked in alternating runs of non-digits and decimal digits.
//! Text runs are compared with a [`Collator`]; digit runs are compared by
//! numeric value, so `"file2"` sorts before `"file10"`.
//!
//! # Soft differences
//!
//! Some differences only matter when nothing more significant follows:
//! - two text runs that differ only below the primary collation level
//!   (punctuation that the collator ignores, accents, case), and
//! - two equal numbers written with digits from different scripts.
//!
//! Text made only of characters the collator ignores (hyphens, apostrophes)
//! counts the same way, including where the other string has no text at all:
//! `"-2"` sorts with `"2"`, between `"1"` and `"3"`.
//!
//! The first such difference is remembered and returned only if the rest of
//! the strings tie. A script difference outranks a text-run one.
//!
//! # Leading zeros
//!
//! Numbers with the same value but a different count of leading zeros are
//! *not* equal: the shorter spelling sorts first (`"file2" < "file02"`).
//!
//! # Example
//!
//! ```
//! use canopy_text::NaturalOrder;
//! use std::cmp::Ordering;
//!
//! let order: NaturalOrder = NaturalOrder::default();
//! assert_eq!(order.compare("file2", "file10"), Ordering::Less);
//! assert_eq!(order.compare("File10", "file10"), Ordering::Equal);
//!
//! let mut names = vec!["img12.png", "img10.png", "IMG2.png", "img1.png"];
//! names.sort_by(|a, b| order.compare(a, b));
//! assert_eq!(names, ["img1.png", "IMG2.png", "img10.png", "img12.png"]);
//! ```

use crate::collation::{Collator, UnicodeCollator};
use crate::digits::{DecimalDigit, decimal_digit};
use std::cmp::Ordering;

/// Natural order comparator over a [`Collator`].
#[derive(Debug, Clone, Default)]
pub struct NaturalOrder<C = UnicodeCollator> {
    collator: C,
}

impl NaturalOrder<UnicodeCollator> {
    /// Case-insensitive natural order for the locale detected from the
    /// environment.
    #[must_use]
    pub fn system() -> Self {
        Self::new(UnicodeCollator::system())
    }

    /// Case-insensitive natural order tailored for `locale`.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        Self::new(UnicodeCollator::for_locale(locale))
    }
}

#[derive(Clone, Copy)]
struct Chars<'a> {
    text: &'a str,
    chars: &'a [(usize, char)],
}

impl<'a> Chars<'a> {
    fn len(self) -> usize {
        self.chars.len()
    }

    fn char_at(self, i: usize) -> char {
        self.chars[i].1
    }

    fn offset(self, i: usize) -> usize {
        self.chars.get(i).map_or(self.text.len(), |&(o, _)| o)
    }

    fn slice(self, from: usize, to: usize) -> &'a str {
        &self.text[self.offset(from)..self.offset(to)]
    }

    fn suffix(self, from: usize) -> &'a str {
        &self.text[self.offset(from)..]
    }

    fn digit(self, i: usize) -> Option<DecimalDigit> {
        self.chars.get(i).and_then(|&(_, c)| decimal_digit(c))
    }

    fn digit_in_class(self, i: usize, zero: char) -> Option<u8> {
        self.digit(i).filter(|d| d.zero == zero).map(|d| d.value)
    }

    fn next_digit(self, from: usize) -> usize {
        (from..self.len())
            .find(|&j| self.digit(j).is_some())
            .unwrap_or(self.len())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SoftWeight {
    None,
    Text,
    Script,
}

impl<C: Collator> NaturalOrder<C> {
    /// Natural order on top of `collator`.
    #[must_use]
    pub const fn new(collator: C) -> Self {
        Self { collator }
    }

    /// The collator used for text runs.
    #[must_use]
    pub const fn collator(&self) -> &C {
        &self.collator
    }

    /// Whether `run_a` and `run_b` differ on the primary level.
    ///
    /// Appending different digits flips the result exactly when the runs
    /// tie on everything the digits outrank.
    fn differ_hard(&self, run_a: &str, run_b: &str) -> bool {
        let cmp = &self.collator;
        let one_two = cmp.compare(&format!("{run_a}1"), &format!("{run_b}2"));
        let two_one = cmp.compare(&format!("{run_a}2"), &format!("{run_b}1"));
        one_two == two_one
    }

    /// Compare two strings.
    #[must_use]
    pub fn compare(&self, x: &str, y: &str) -> Ordering {
        let xs: Vec<(usize, char)> = x.char_indices().collect();
        let ys: Vec<(usize, char)> = y.char_indices().collect();
        let a = Chars { text: x, chars: &xs };
        let b = Chars { text: y, chars: &ys };
        let cmp = &self.collator;

        let (mut ia, mut ib) = (0, 0);
        let mut soft = Ordering::Equal;
        let mut soft_weight = SoftWeight::None;

        while ia < a.len() && ib < b.len() {
            let da = a.digit(ia);
            let db = b.digit(ib);
            match (da, db) {
                (Some(_), None) | (None, Some(_)) => {
                    // a text run against a number, which has an empty text run
                    let text_is_a = da.is_none();
                    let (s, i) = if text_is_a { (a, ia) } else { (b, ib) };
                    let j = s.next_digit(i + 1);
                    let run = s.slice(i, j);
                    if self.differ_hard(run, "") {
                        let result = cmp.compare(&format!("{run}{}", digit_tail(s, j)), "0");
                        return if text_is_a { result } else { result.reverse() };
                    }
                    // only ignorable text: step over it and compare the numbers
                    if soft_weight < SoftWeight::Text {
                        soft = if text_is_a {
                            cmp.compare(run, "")
                        } else {
                            cmp.compare("", run)
                        };
                        soft_weight = SoftWeight::Text;
                    }
                    if text_is_a {
                        ia = j;
                    } else {
                        ib = j;
                    }
                }
                (None, None) => {
                    let ja = a.next_digit(ia + 1);
                    let jb = b.next_digit(ib + 1);
                    let run_a = a.slice(ia, ja);
                    let run_b = b.slice(ib, jb);
                    let result = cmp.compare(run_a, run_b);
                    if result != Ordering::Equal {
                        if self.differ_hard(run_a, run_b) {
                            // what follows each run decides a prefix, never its digits
                            return cmp.compare(
                                &format!("{run_a}{}", digit_tail(a, ja)),
                                &format!("{run_b}{}", digit_tail(b, jb)),
                            );
                        }
                        if soft_weight < SoftWeight::Text {
                            soft = result;
                            soft_weight = SoftWeight::Text;
                        }
                    }
                    ia = ja;
                    ib = jb;
                }
                (Some(first_a), Some(first_b)) => {
                    let zero_a = first_a.zero;
                    let zero_b = first_b.zero;
                    let mut ja = ia;
                    let mut jb = ib;
                    while ja < a.len() && a.char_at(ja) == zero_a {
                        ja += 1;
                    }
                    while jb < b.len() && b.char_at(jb) == zero_b {
                        jb += 1;
                    }

                    let mut same_length_result = Ordering::Equal;
                    loop {
                        match (a.digit_in_class(ja, zero_a), b.digit_in_class(jb, zero_b)) {
                            (Some(na), Some(nb)) => {
                                if same_length_result == Ordering::Equal {
                                    same_length_result = na.cmp(&nb);
                                }
                                ja += 1;
                                jb += 1;
                            }
                            // more significant digits: the larger number
                            (Some(_), None) => return Ordering::Greater,
                            (None, Some(_)) => return Ordering::Less,
                            (None, None) => break,
                        }
                    }
                    if same_length_result != Ordering::Equal {
                        return same_length_result;
                    }

                    // same value, different count of leading zeros
                    let (la, lb) = (ja - ia, jb - ib);
                    if la != lb {
                        return la.cmp(&lb);
                    }

                    if zero_a != zero_b && soft_weight < SoftWeight::Script {
                        soft = cmp.compare(a.slice(ia, ia + 1), b.slice(ib, ib + 1));
                        soft_weight = SoftWeight::Script;
                    }
                    ia = ja;
                    ib = jb;
                }
            }
        }

        for (s, i, longer) in [(a, ia, Ordering::Greater), (b, ib, Ordering::Less)] {
            if i == s.len() {
                continue;
            }
            // trailing ignorable text is as soft as it is mid-string
            let rest = s.suffix(i);
            let trailing_text = s.digit(i).is_none() && s.next_digit(i) == s.len();
            if trailing_text && !self.differ_hard(rest, "") {
                if soft_weight < SoftWeight::Text {
                    soft = if longer == Ordering::Greater {
                        cmp.compare(rest, "")
                    } else {
                        cmp.compare("", rest)
                    };
                }
                return soft;
            }
            return longer;
        }
        soft
    }
}

/// `"0"` when a digit follows position `end` of `s`, else nothing.
fn digit_tail(s: Chars<'_>, end: usize) -> &'static str {
    if end < s.len() { "0" } else { "" }
}

impl<C: Collator> Collator for NaturalOrder<C> {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        NaturalOrder::compare(self, a, b)
    }
}

/// Compare two strings in case-insensitive, untailored natural order.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalOrder::new(UnicodeCollator::new()).compare(a, b)
}
