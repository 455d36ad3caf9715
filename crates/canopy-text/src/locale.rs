#![forbid(unsafe_code)]

//! Locale tags and collation tailorings.
//!
//! Locales are plain BCP-47-ish strings (`"sv-SE"`, `"tr"`, `"en"`). Only the
//! language subtag matters for collation; it selects a [`Tailoring`].

use std::env;
use tracing::debug;

/// A normalized locale tag such as `"en-US"`.
pub type Locale = String;

/// Language-specific adjustments to the default collation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tailoring {
    /// No adjustments.
    #[default]
    Root,
    /// Swedish and Finnish: `å ä ö` (and `æ ø`) sort after `z`.
    Swedish,
    /// Danish and Norwegian: `æ ø å` sort after `z`.
    DanoNorwegian,
    /// Turkish and Azerbaijani: dotted and dotless `i` are distinct letters.
    Turkish,
}

impl Tailoring {
    /// Tailoring for a locale tag. Unknown languages use [`Tailoring::Root`].
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "sv" | "fi" => Self::Swedish,
            "da" | "nb" | "nn" | "no" => Self::DanoNorwegian,
            "tr" | "az" => Self::Turkish,
            _ => Self::Root,
        }
    }

    /// Primary weight for a lowercase precomposed letter this tailoring
    /// moves, in the scale of [`letter_weight`].
    pub(crate) fn tailored_weight(self, lower: char) -> Option<u32> {
        let after = |base: char, offset: u32| Some(letter_weight(base) + offset);
        match (self, lower) {
            (Self::Swedish, 'å') => after('z', 1),
            (Self::Swedish, 'ä' | 'æ') => after('z', 2),
            (Self::Swedish, 'ö' | 'ø') => after('z', 3),
            (Self::DanoNorwegian, 'æ' | 'ä') => after('z', 1),
            (Self::DanoNorwegian, 'ø' | 'ö') => after('z', 2),
            (Self::DanoNorwegian, 'å') => after('z', 3),
            (Self::Turkish, 'ı') => Some(letter_weight('i') - 1),
            (Self::Turkish, 'ç') => after('c', 1),
            (Self::Turkish, 'ğ') => after('g', 1),
            (Self::Turkish, 'ö') => after('o', 1),
            (Self::Turkish, 'ş') => after('s', 1),
            (Self::Turkish, 'ü') => after('u', 1),
            _ => None,
        }
    }

    /// Lowercase `c` following the tailoring's casing rules.
    pub(crate) fn to_lower(self, c: char) -> char {
        match (self, c) {
            (Self::Turkish, 'I') => 'ı',
            (Self::Turkish, 'İ') => 'i',
            _ => c.to_lowercase().next().unwrap_or(c),
        }
    }
}

/// Untailored primary weight of a lowercase letter.
///
/// Spaced out so tailorings can slot letters between neighbours.
pub(crate) const fn letter_weight(lower: char) -> u32 {
    (lower as u32) << 2
}

/// Tag used when the environment names no usable locale.
const FALLBACK: &str = "en";

/// Variables that name the collation locale, strongest first.
const COLLATION_VARS: [&str; 3] = ["LC_ALL", "LC_COLLATE", "LANG"];

impl Tailoring {
    /// Tailoring for the collation locale named by the environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::for_locale(&detect_system_locale())
    }
}

/// The collation locale named by the environment.
///
/// The first of `LC_ALL`, `LC_COLLATE` and `LANG` that parses wins. The
/// `C` and `POSIX` locales and an empty environment give `"en"`.
#[must_use]
pub fn detect_system_locale() -> Locale {
    let locale = collation_locale(|var| env::var(var).ok());
    debug!(
        message = "locale.detect",
        locale = %locale,
        tailoring = ?Tailoring::for_locale(&locale)
    );
    locale
}

/// Normalize a user-supplied locale tag, falling back to `"en"`.
#[must_use]
pub fn normalize_locale(raw: &str) -> Locale {
    parse_tag(raw).unwrap_or_else(|| FALLBACK.to_owned())
}

fn collation_locale(lookup: impl Fn(&str) -> Option<String>) -> Locale {
    COLLATION_VARS
        .iter()
        .find_map(|var| lookup(var).as_deref().and_then(parse_tag))
        .unwrap_or_else(|| FALLBACK.to_owned())
}

/// Parse a POSIX (`sv_SE.UTF-8@euro`) or BCP-47 (`sv-se`) tag into
/// `language-REGION` form. Codeset and modifier are dropped.
fn parse_tag(raw: &str) -> Option<Locale> {
    let name = raw.trim().split(['.', '@']).next()?;
    let mut subtags = name.split(['_', '-']).filter(|t| !t.is_empty());
    let language = subtags.next()?;
    if language.eq_ignore_ascii_case("c") || language.eq_ignore_ascii_case("posix") {
        return Some(FALLBACK.to_owned());
    }
    let mut tag = language.to_ascii_lowercase();
    for subtag in subtags {
        tag.push('-');
        if subtag.len() == 2 {
            tag.push_str(&subtag.to_ascii_uppercase());
        } else {
            tag.push_str(subtag);
        }
    }
    Some(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tracing_test::traced_test;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |var: &str| pairs.iter().find(|(k, _)| k == var).map(|(_, v)| v.clone())
    }

    #[test]
    fn lc_all_wins_over_lang() {
        let env = env_of(&[("LC_ALL", "sv_SE.UTF-8"), ("LANG", "en_US.UTF-8")]);
        assert_eq!(collation_locale(env), "sv-SE");
    }

    #[test]
    fn lc_collate_beats_lang() {
        let env = env_of(&[("LC_COLLATE", "tr_TR.UTF-8"), ("LANG", "en_GB.UTF-8")]);
        assert_eq!(collation_locale(env), "tr-TR");
    }

    #[test]
    fn lang_used_when_others_missing() {
        assert_eq!(collation_locale(env_of(&[("LANG", "tr_TR")])), "tr-TR");
        let env = env_of(&[("LC_ALL", ""), ("LC_COLLATE", "@"), ("LANG", "da")]);
        assert_eq!(collation_locale(env), "da");
    }

    #[test]
    fn defaults_to_en() {
        assert_eq!(collation_locale(env_of(&[])), "en");
        assert_eq!(normalize_locale("  "), "en");
        assert_eq!(normalize_locale("POSIX"), "en");
        assert_eq!(normalize_locale("C.UTF-8"), "en");
    }

    #[test]
    fn strips_codeset_and_modifier() {
        assert_eq!(normalize_locale("fi_FI.UTF-8@euro"), "fi-FI");
        assert_eq!(normalize_locale("SV-se"), "sv-SE");
        assert_eq!(normalize_locale("zh_Hant_TW"), "zh-Hant-TW");
    }

    #[traced_test]
    #[test]
    fn detection_is_logged() {
        let locale = detect_system_locale();
        assert!(!locale.is_empty());
        assert!(logs_contain("locale.detect"));
        assert!(logs_contain("tailoring="));
    }

    #[test]
    fn tailoring_by_language() {
        assert_eq!(Tailoring::for_locale("sv-SE"), Tailoring::Swedish);
        assert_eq!(Tailoring::for_locale("FI"), Tailoring::Swedish);
        assert_eq!(Tailoring::for_locale("nb_NO"), Tailoring::DanoNorwegian);
        assert_eq!(Tailoring::for_locale("tr"), Tailoring::Turkish);
        assert_eq!(Tailoring::for_locale("en-US"), Tailoring::Root);
        assert_eq!(Tailoring::for_locale(""), Tailoring::Root);
    }

    #[test]
    fn tailored_letters_land_between_neighbours() {
        let z = letter_weight('z');
        assert!(Tailoring::Swedish.tailored_weight('å').unwrap() > z);
        assert!(Tailoring::Swedish.tailored_weight('å') < Tailoring::Swedish.tailored_weight('ä'));
        let dotless = Tailoring::Turkish.tailored_weight('ı').unwrap();
        assert!(letter_weight('h') < dotless && dotless < letter_weight('i'));
        assert_eq!(Tailoring::Root.tailored_weight('å'), None);
    }

    #[test]
    fn turkish_casing() {
        assert_eq!(Tailoring::Turkish.to_lower('I'), 'ı');
        assert_eq!(Tailoring::Turkish.to_lower('İ'), 'i');
        assert_eq!(Tailoring::Root.to_lower('I'), 'i');
    }

    proptest! {
        #[test]
        fn normalized_locales_have_no_separators(raw in "[A-Za-z0-9_@.\\-]{1,32}") {
            let locale = normalize_locale(&raw);
            prop_assert!(!locale.is_empty());
            prop_assert!(!locale.contains('_'));
            prop_assert!(!locale.contains('.'));
            prop_assert!(!locale.contains('@'));
        }
    }
}
