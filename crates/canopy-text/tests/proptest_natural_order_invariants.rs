//! Property-based invariant tests for natural ordering and collation.
//!
//! 1. compare(a, a) == Equal.
//! 2. Antisymmetry: compare(a, b) == compare(b, a).reverse().
//! 3. Transitivity of <= over generated corpora.
//! 4. Appending digits never reorders two numbers: n < m implies "x{n}" < "x{m}".
//! 5. Case-insensitive equality implies equal lowercase text.
//! 6. Collator sort keys order like compare.
//! 7. Numbers behind ignorable prefixes still sort by value.
//! 8. No panics on arbitrary Unicode input.

use canopy_text::{Collator, NaturalOrder, UnicodeCollator};
use proptest::prelude::*;
use std::cmp::Ordering;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Labels mixing letters, punctuation, ignorable hyphens and apostrophes,
/// spaces, and ASCII or Arabic-Indic digit runs.
fn label() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[abAB._ 0129\u{0661}'\u{2019}-]{0,8}").expect("valid regex")
}

fn orders() -> [NaturalOrder; 2] {
    [
        NaturalOrder::new(UnicodeCollator::new()),
        NaturalOrder::new(UnicodeCollator::new().with_ignore_case(false)),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Reflexivity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reflexive(a in label()) {
        for order in orders() {
            prop_assert_eq!(order.compare(&a, &a), Ordering::Equal);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Antisymmetry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn antisymmetric(a in label(), b in label()) {
        for order in orders() {
            prop_assert_eq!(
                order.compare(&a, &b),
                order.compare(&b, &a).reverse(),
                "{:?} vs {:?}", a, b
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Transitivity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn transitive(a in label(), b in label(), c in label()) {
        for order in orders() {
            let ab = order.compare(&a, &b);
            let bc = order.compare(&b, &c);
            let ac = order.compare(&a, &c);
            if ab != Ordering::Greater && bc != Ordering::Greater {
                prop_assert_ne!(ac, Ordering::Greater, "{:?} <= {:?} <= {:?}", a, b, c);
            }
            if ab == Ordering::Equal && bc == Ordering::Equal {
                prop_assert_eq!(ac, Ordering::Equal);
            }
        }
    }

    #[test]
    fn sorting_yields_a_chain(mut corpus in proptest::collection::vec(label(), 0..24)) {
        let order: NaturalOrder = NaturalOrder::default();
        corpus.sort_by(|a, b| order.compare(a, b));
        for i in 0..corpus.len() {
            for j in i + 1..corpus.len() {
                prop_assert_ne!(
                    order.compare(&corpus[i], &corpus[j]),
                    Ordering::Greater,
                    "{:?} sorted before {:?}", corpus[i], corpus[j]
                );
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Numbers compare by value
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn numbers_by_value(n in 0u64..1_000_000, m in 0u64..1_000_000, stem in "[a-z]{0,4}") {
        let order: NaturalOrder = NaturalOrder::default();
        let a = format!("{stem}{n}");
        let b = format!("{stem}{m}");
        prop_assert_eq!(order.compare(&a, &b), n.cmp(&m));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Case-insensitive equality
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn equal_means_same_up_to_case(a in label(), b in label()) {
        let order: NaturalOrder = NaturalOrder::default();
        if order.compare(&a, &b) == Ordering::Equal {
            prop_assert_eq!(a.to_lowercase(), b.to_lowercase());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Sort keys agree with compare
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sort_key_matches_compare(a in "\\PC{0,6}", b in "\\PC{0,6}", sensitive in any::<bool>()) {
        let c = UnicodeCollator::new().with_ignore_case(!sensitive);
        prop_assert_eq!(c.sort_key(&a).cmp(&c.sort_key(&b)), c.compare(&a, &b));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7-8. Ignorable prefixes, and no panics on arbitrary input
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ignorable_prefixed_numbers_sort(mut values in proptest::collection::vec((0u32..50, 0usize..4), 0..40)) {
        let order: NaturalOrder = NaturalOrder::default();
        let mut labels: Vec<String> = values
            .drain(..)
            .map(|(n, stem)| format!("{}{n}", ["", "-", "'", "\u{2019}"][stem]))
            .collect();
        labels.sort_by(|a, b| order.compare(a, b));
        for pair in labels.windows(2) {
            let value = |s: &str| s.trim_start_matches(['-', '\'', '\u{2019}']).parse::<u32>().ok();
            prop_assert!(value(&pair[0]) <= value(&pair[1]), "{:?} before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn arbitrary_input_does_not_panic(a in "\\PC{0,12}", b in "\\PC{0,12}") {
        let order = NaturalOrder::for_locale("sv");
        let _ = order.compare(&a, &b);
        let tr = NaturalOrder::for_locale("tr");
        let _ = tr.compare(&a, &b);
    }
}
