//! Candidate blocking: partition records into small comparison buckets.
//!
//! Blocking replaces the quadratic all-pairs scan with a hash-of-lists
//! index: only records sharing a key are ever compared. Strict blocks key
//! on the full canonical name (duplicate/version detection); loose blocks
//! key on the first significant token (sequel detection only, since
//! sequels rarely share a canonical name).

use crate::catalog::Game;
use crate::dedup::canonical::first_significant_token;
use std::collections::BTreeMap;

/// Group record indices by canonical name. Records with an empty canonical
/// name cannot be blocked and are left out; they pass through the pipeline
/// as singletons. A `BTreeMap` keeps bucket iteration order deterministic.
pub fn strict_blocks(games: &[Game]) -> BTreeMap<String, Vec<usize>> {
    let mut blocks: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, game) in games.iter().enumerate() {
        if game.canonical_name.is_empty() {
            continue;
        }
        blocks.entry(game.canonical_name.clone()).or_default().push(idx);
    }
    blocks
}

/// Group record indices by the first significant token of the canonical
/// name. Used only as the candidate source for sequel classification.
pub fn loose_blocks(games: &[Game]) -> BTreeMap<String, Vec<usize>> {
    let mut blocks: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, game) in games.iter().enumerate() {
        if game.canonical_name.is_empty() {
            continue;
        }
        if let Some(token) = first_significant_token(&game.canonical_name) {
            blocks.entry(token).or_default().push(idx);
        }
    }
    blocks
}
