//! Pairwise relationship classification inside a blocking bucket.
//!
//! A pure decision function: given two records from the same bucket it
//! either emits one edge with a confidence score or declines. It never
//! fails and never emits more than one edge per pair.

use crate::catalog::{Game, RelationshipType};
use crate::dedup::canonical::{is_numbering_token, normalize_title, tokens};

const DUPLICATE_CONFIDENCE: f64 = 1.0;
const VERSION_BASE_CONFIDENCE: f64 = 0.7;
const VERSION_SIGNAL_BONUS: f64 = 0.1;
const VERSION_MAX_CONFIDENCE: f64 = 0.95;
const SEQUEL_BASE_CONFIDENCE: f64 = 0.6;
const SEQUEL_GENRE_BONUS: f64 = 0.15;
const SEQUEL_MAX_CONFIDENCE: f64 = 0.85;

/// How close release years must be to count as the same release window.
const RELEASE_YEAR_TOLERANCE: i32 = 2;

/// Which blocking key produced the candidate pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlockKind {
    /// Same canonical name: duplicate / version detection.
    Canonical,
    /// Same first significant token: sequel detection only.
    FirstToken,
}

/// One classified edge between two records, by index into the record slice.
/// `source` is the later record of the pair, `target` the earlier
/// (first-seen) one, so duplicates and versions point at their reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelationshipEdge {
    pub source: usize,
    pub target: usize,
    pub kind: RelationshipType,
    pub confidence: f64,
}

fn shares_genre(a: &Game, b: &Game) -> bool {
    !a.genres.is_disjoint(&b.genres)
}

fn release_years_close(a: &Game, b: &Game) -> bool {
    match (a.release_year(), b.release_year()) {
        (Some(ya), Some(yb)) => (ya - yb).abs() <= RELEASE_YEAR_TOLERANCE,
        _ => false,
    }
}

fn strip_trailing_numbering(toks: &[String]) -> &[String] {
    let mut end = toks.len();
    while end > 0 && is_numbering_token(&toks[end - 1]) {
        end -= 1;
    }
    &toks[..end]
}

/// Sequel signal: the titles share a token prefix and one of them carries a
/// trailing numeral or subtitle the other lacks. Also covers two numbered
/// entries over the same stem ("tomb raider ii" vs "tomb raider iii").
fn sequel_signal(a_canonical: &str, b_canonical: &str) -> bool {
    let a = tokens(a_canonical);
    let b = tokens(b_canonical);
    if a.is_empty() || b.is_empty() || a == b {
        return false;
    }
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if long.len() > short.len() && long[..short.len()] == short[..] {
        return true;
    }
    let a_stem = strip_trailing_numbering(&a);
    let b_stem = strip_trailing_numbering(&b);
    !a_stem.is_empty()
        && a_stem == b_stem
        && (a_stem.len() < a.len() || b_stem.len() < b.len())
}

/// Classify the pair `(first, second)` from one bucket, `first < second` in
/// input order. Returns `None` when the records are unrelated under the
/// given block kind.
pub fn classify(
    games: &[Game],
    first: usize,
    second: usize,
    block: BlockKind,
) -> Option<RelationshipEdge> {
    debug_assert_ne!(first, second, "self-pairs must never be classified");
    let a = &games[first];
    let b = &games[second];

    match block {
        BlockKind::Canonical => {
            debug_assert_eq!(a.canonical_name, b.canonical_name);
            if normalize_title(&a.display_name) == normalize_title(&b.display_name) {
                return Some(RelationshipEdge {
                    source: second,
                    target: first,
                    kind: RelationshipType::DuplicateOf,
                    confidence: DUPLICATE_CONFIDENCE,
                });
            }
            let mut confidence = VERSION_BASE_CONFIDENCE;
            if release_years_close(a, b) {
                confidence += VERSION_SIGNAL_BONUS;
            }
            if shares_genre(a, b) {
                confidence += VERSION_SIGNAL_BONUS;
            }
            Some(RelationshipEdge {
                source: second,
                target: first,
                kind: RelationshipType::VersionOf,
                confidence: confidence.min(VERSION_MAX_CONFIDENCE),
            })
        }
        BlockKind::FirstToken => {
            // Pairs with an identical canonical name belong to the strict
            // pass; the loose pass only looks for sequels.
            if a.canonical_name == b.canonical_name {
                return None;
            }
            if !sequel_signal(&a.canonical_name, &b.canonical_name) {
                return None;
            }
            let mut confidence = SEQUEL_BASE_CONFIDENCE;
            if shares_genre(a, b) {
                confidence += SEQUEL_GENRE_BONUS;
            }
            Some(RelationshipEdge {
                source: second,
                target: first,
                kind: RelationshipType::SequelTo,
                confidence: confidence.min(SEQUEL_MAX_CONFIDENCE),
            })
        }
    }
}
