//! Data quality scoring for raw records.
//!
//! The score is a weighted completeness measure over the record's fields,
//! normalized to 0-100. It drives representative selection inside groups
//! and downstream display ranking.

use crate::catalog::RawGame;

const W_NAME: f64 = 1.0;
const W_SUMMARY: f64 = 0.8;
const W_COVER: f64 = 0.7;
const W_RELEASE_DATE: f64 = 0.6;
const W_RATING: f64 = 0.5;
const W_GENRES: f64 = 0.4;
const W_PLATFORMS: f64 = 0.3;
const W_THEMES: f64 = 0.2;

const TOTAL_WEIGHT: f64 =
    W_NAME + W_SUMMARY + W_COVER + W_RELEASE_DATE + W_RATING + W_GENRES + W_PLATFORMS + W_THEMES;

fn has_name(game: &RawGame) -> bool {
    !game.name.trim().is_empty()
}

fn has_summary(game: &RawGame) -> bool {
    game.summary.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn has_cover(game: &RawGame) -> bool {
    game.cover_url().is_some_and(|url| !url.is_empty())
}

/// Compute the completeness score in [0, 100]. Absent or empty fields
/// contribute zero; adding any missing field strictly increases the score.
pub fn quality_score(game: &RawGame) -> f64 {
    let mut score = 0.0;
    if has_name(game) {
        score += W_NAME;
    }
    if has_summary(game) {
        score += W_SUMMARY;
    }
    if has_cover(game) {
        score += W_COVER;
    }
    if game.first_release_date.is_some() {
        score += W_RELEASE_DATE;
    }
    if game.rating.is_some() {
        score += W_RATING;
    }
    if !game.genres.is_empty() {
        score += W_GENRES;
    }
    if !game.platforms.is_empty() {
        score += W_PLATFORMS;
    }
    if !game.themes.is_empty() {
        score += W_THEMES;
    }
    score / TOTAL_WEIGHT * 100.0
}

/// Whether a record is complete enough to be surfaced on its own: name,
/// summary and cover are all present, plus at least two of release date,
/// rating, genres and platforms.
pub fn has_complete_data(game: &RawGame) -> bool {
    if !(has_name(game) && has_summary(game) && has_cover(game)) {
        return false;
    }
    let optional_present = [
        game.first_release_date.is_some(),
        game.rating.is_some(),
        !game.genres.is_empty(),
        !game.platforms.is_empty(),
    ]
    .into_iter()
    .filter(|present| *present)
    .count();
    optional_present >= 2
}
