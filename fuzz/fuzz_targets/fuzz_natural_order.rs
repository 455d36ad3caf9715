#![no_main]

use canopy_text::{NaturalOrder, UnicodeCollator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 1024 {
        return;
    }
    // Split at NULs into up to three labels.
    let mut parts = text.splitn(3, '\0');
    let a = parts.next().unwrap_or("");
    let b = parts.next().unwrap_or("");
    let c = parts.next().unwrap_or("");

    let order = NaturalOrder::new(UnicodeCollator::new());

    // compare must never panic and must be reflexive.
    assert!(order.compare(a, a).is_eq(), "reflexivity");
    assert!(order.compare(b, b).is_eq(), "reflexivity");

    // Antisymmetry.
    assert_eq!(order.compare(a, b), order.compare(b, a).reverse(), "antisymmetry");

    // Transitivity.
    if order.compare(a, b).is_le() && order.compare(b, c).is_le() {
        assert!(order.compare(a, c).is_le(), "transitivity");
    }

    // Sort keys must never panic.
    let collator = UnicodeCollator::new();
    let _ = collator.sort_key(a);
});
