#![forbid(unsafe_code)]

//! Unicode decimal digits.
//!
//! A decimal digit belongs to one of the contiguous ten-character blocks in
//! [`DECIMAL_ZEROS`]. The block's first character is the digit's *zero
//! class*: two digits can be compared numerically only when they share it.
//! Numeric characters outside these blocks (superscripts, fractions, roman
//! numerals) are not digits here and compare as ordinary text.

/// First code point of every supported decimal digit block, ascending.
pub const DECIMAL_ZEROS: &[u32] = &[
    0x0030, // ASCII
    0x0660, // Arabic-Indic
    0x06F0, // Extended Arabic-Indic
    0x07C0, // NKo
    0x0966, // Devanagari
    0x09E6, // Bengali
    0x0A66, // Gurmukhi
    0x0AE6, // Gujarati
    0x0B66, // Oriya
    0x0BE6, // Tamil
    0x0C66, // Telugu
    0x0CE6, // Kannada
    0x0D66, // Malayalam
    0x0DE6, // Sinhala Lith
    0x0E50, // Thai
    0x0ED0, // Lao
    0x0F20, // Tibetan
    0x1040, // Myanmar
    0x1090, // Myanmar Shan
    0x17E0, // Khmer
    0x1810, // Mongolian
    0x1946, // Limbu
    0x19D0, // New Tai Lue
    0x1A80, // Tai Tham Hora
    0x1A90, // Tai Tham Tham
    0x1B50, // Balinese
    0x1BB0, // Sundanese
    0x1C40, // Lepcha
    0x1C50, // Ol Chiki
    0xA620, // Vai
    0xA8D0, // Saurashtra
    0xA900, // Kayah Li
    0xA9D0, // Javanese
    0xA9F0, // Myanmar Tai Laing
    0xAA50, // Cham
    0xABF0, // Meetei Mayek
    0xFF10, // Fullwidth
];

/// A decimal digit with its value and zero class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecimalDigit {
    /// Numeric value, `0..=9`.
    pub value: u8,
    /// The zero of the digit's block.
    pub zero: char,
}

impl DecimalDigit {
    /// Index of the digit's block in [`DECIMAL_ZEROS`] (`0` for ASCII).
    #[must_use]
    pub fn block(self) -> usize {
        DECIMAL_ZEROS
            .binary_search(&(self.zero as u32))
            .unwrap_or_default()
    }
}

/// Classify `c` as a decimal digit.
#[must_use]
pub fn decimal_digit(c: char) -> Option<DecimalDigit> {
    let cp = c as u32;
    if cp < 0x30 {
        return None;
    }
    let block = DECIMAL_ZEROS.partition_point(|&zero| zero <= cp);
    let zero = DECIMAL_ZEROS[block.checked_sub(1)?];
    let value = cp - zero;
    if value > 9 {
        return None;
    }
    Some(DecimalDigit {
        value: value as u8,
        zero: char::from_u32(zero)?,
    })
}

/// Whether `c` is a decimal digit.
#[must_use]
pub fn is_decimal_digit(c: char) -> bool {
    decimal_digit(c).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_non_overlapping() {
        for pair in DECIMAL_ZEROS.windows(2) {
            assert!(pair[0] + 10 <= pair[1], "{:#x} overlaps {:#x}", pair[0], pair[1]);
        }
    }

    #[test]
    fn ascii_digits() {
        for (i, c) in ('0'..='9').enumerate() {
            let d = decimal_digit(c).unwrap();
            assert_eq!(usize::from(d.value), i);
            assert_eq!(d.zero, '0');
            assert_eq!(d.block(), 0);
        }
        assert!(!is_decimal_digit('/'));
        assert!(!is_decimal_digit(':'));
        assert!(!is_decimal_digit('a'));
    }

    #[test]
    fn other_scripts() {
        let d = decimal_digit('\u{0663}').unwrap();
        assert_eq!(d.value, 3);
        assert_eq!(d.zero, '\u{0660}');
        let d = decimal_digit('\u{FF19}').unwrap();
        assert_eq!(d.value, 9);
        assert_eq!(d.zero, '\u{FF10}');
        assert_eq!(d.block(), DECIMAL_ZEROS.len() - 1);
    }

    #[test]
    fn non_decimal_numerics_are_not_digits() {
        assert!(!is_decimal_digit('²'));
        assert!(!is_decimal_digit('½'));
        assert!(!is_decimal_digit('Ⅳ'));
        // just past the Thai block
        assert!(!is_decimal_digit('\u{0E5A}'));
    }
}
