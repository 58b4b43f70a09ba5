//! Canonical name extraction from raw titles.
//!
//! The canonical name is the blocking and grouping key: the lowercased
//! title with edition/version/year markers stripped. The marker list is
//! intentionally blunt and will over-strip meaningful trailing numerals
//! ("Portal 2" and "Portal" share a key) and under-strip non-English
//! edition markers; the grouping output depends on exactly this behavior.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

lazy_static! {
    // One combined alternation so overlapping markers are handled per pass:
    // quality/edition markers (optionally after a separator), container
    // markers, DLC markers, volume/chapter/episode/part numbering, and a
    // trailing bare year or 1-2 digit number.
    static ref MARKERS: Regex = Regex::new(
        r"(?i)(?:^|\s*[-–—:]\s*|\s+)(?:game of the year|goty|complete|definitive|enhanced|remastered|remaster|remake|reboot|special|collector'?s?|deluxe|premium|gold|hd)(?:\s+edition)?\b|\s+(?:edition|version|collection|bundle)\b|\s+(?:dlc|expansion|season pass|content pack)\b|\s+(?:vol\.?|volume|chapter|episode|part)\s*\d+\b|\s+(?:\d{4}|\d{1,2})\s*$"
    )
    .expect("marker pattern is a valid regex");
    static ref TRAILING_SEPARATORS: Regex =
        Regex::new(r"[-:;–—_\s]+$").expect("separator pattern is a valid regex");
    static ref NUMBERING_TOKEN: Regex =
        Regex::new(r"^(?:\d{1,3}|[ivx]{1,4})$").expect("numbering pattern is a valid regex");
}

/// Derive the canonical name for a raw title.
///
/// Stripping runs to a fixed point: removing one marker can expose another
/// (e.g. an edition suffix hiding a trailing numeral), and the result must
/// be stable under re-application. Returns the empty string when the whole
/// title was marker text; unparseable input degrades to a lowercased,
/// trimmed near-identity.
pub fn canonicalize(raw_title: &str) -> String {
    let mut name = raw_title.to_lowercase().trim().to_string();
    loop {
        let stripped = MARKERS.replace_all(&name, "");
        let trimmed = TRAILING_SEPARATORS.replace_all(&stripped, "");
        let next = trimmed.trim().to_string();
        if next == name {
            return next;
        }
        name = next;
    }
}

/// Trivial normalization used for exact-duplicate detection: lowercase and
/// collapse runs of whitespace. No marker stripping.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a canonical name into word tokens.
pub(crate) fn tokens(name: &str) -> Vec<String> {
    name.unicode_words().map(|w| w.to_string()).collect()
}

/// Whether a token looks like sequel numbering: a short arabic number or a
/// roman numeral built from i/v/x (covers 1 through the high teens, which
/// is as far as real series numbering goes).
pub(crate) fn is_numbering_token(token: &str) -> bool {
    NUMBERING_TOKEN.is_match(&token.to_lowercase())
}

/// The loose blocking key: the first token of at least two characters,
/// falling back to the very first token for names like "Z".
pub fn first_significant_token(canonical_name: &str) -> Option<String> {
    let mut words = canonical_name.unicode_words();
    let first = words.next()?;
    if first.chars().count() >= 2 {
        return Some(first.to_string());
    }
    for word in words {
        if word.chars().count() >= 2 {
            return Some(word.to_string());
        }
    }
    Some(first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_edition_markers() {
        assert_eq!(canonicalize("Portal: GOTY Edition"), "portal");
        assert_eq!(
            canonicalize("The Witcher 3: Wild Hunt - Complete Edition"),
            "the witcher 3: wild hunt"
        );
        assert_eq!(
            canonicalize("Batman: Arkham City - Game of the Year Edition"),
            "batman: arkham city"
        );
        assert_eq!(canonicalize("Mass Effect: Legendary Edition"), "mass effect: legendary");
    }

    #[test]
    fn strips_trailing_years_and_short_numbers() {
        assert_eq!(canonicalize("Doom 2016"), "doom");
        assert_eq!(canonicalize("FIFA 22"), "fifa");
        assert_eq!(canonicalize("Portal 2"), "portal");
    }

    #[test]
    fn strips_dlc_and_remake_markers() {
        assert_eq!(canonicalize("Fallout 4: Far Harbor DLC"), "fallout 4: far harbor");
        assert_eq!(canonicalize("Final Fantasy VII Remake"), "final fantasy vii");
        assert_eq!(canonicalize("Resident Evil 4 HD"), "resident evil");
    }

    #[test]
    fn keeps_roman_numerals() {
        assert_eq!(canonicalize("Tomb Raider II"), "tomb raider ii");
        assert_eq!(canonicalize("Final Fantasy VII"), "final fantasy vii");
    }

    #[test]
    fn plain_titles_are_near_identity() {
        assert_eq!(canonicalize("Chess"), "chess");
        assert_eq!(canonicalize("  Tomb Raider  "), "tomb raider");
        assert_eq!(canonicalize("Street Fighter X Tekken"), "street fighter x tekken");
    }

    #[test]
    fn all_marker_title_yields_empty_key() {
        assert_eq!(canonicalize("HD Remaster"), "");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let titles = [
            "Portal: GOTY Edition",
            "The Witcher 3: Wild Hunt - Complete Edition",
            "Doom 2016",
            "Resident Evil 4 HD",
            "Tomb Raider II",
            "Half-Life 2: Episode 2",
            "Chess",
            "HD Remaster",
            "Halo: The Master Chief Collection",
        ];
        for title in titles {
            let once = canonicalize(title);
            assert_eq!(canonicalize(&once), once, "not idempotent for {:?}", title);
        }
    }

    #[test]
    fn does_not_strip_markers_inside_words() {
        assert_eq!(canonicalize("GoldenEye 007"), "goldeneye 007");
        assert_eq!(canonicalize("Hdx Racing"), "hdx racing");
    }

    #[test]
    fn normalize_title_collapses_whitespace_and_case() {
        assert_eq!(normalize_title("  Batman   Returns "), "batman returns");
        assert_eq!(normalize_title("BATMAN"), normalize_title("batman"));
    }

    #[test]
    fn numbering_tokens() {
        for token in ["2", "13", "ii", "iii", "IV", "x"] {
            assert!(is_numbering_token(token), "{} should be numbering", token);
        }
        for token in ["raider", "mix", "vii2", "2049x"] {
            assert!(!is_numbering_token(token), "{} should not be numbering", token);
        }
    }

    #[test]
    fn first_significant_token_skips_single_letters() {
        assert_eq!(first_significant_token("tomb raider"), Some("tomb".to_string()));
        assert_eq!(first_significant_token("a hat in time"), Some("hat".to_string()));
        assert_eq!(first_significant_token("z"), Some("z".to_string()));
        assert_eq!(first_significant_token(""), None);
    }
}
