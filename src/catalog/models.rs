//! Data model for raw catalog records and the cleaned output relations.
//!
//! Raw records mirror the shape of the external catalog API dump; the
//! output rows mirror the warehouse tables the downstream ETL loads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// Raw input records
// =============================================================================

/// A `{id, name}` reference as the catalog API nests genres/platforms/themes.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NamedRef {
    pub id: u64,
    pub name: String,
}

/// Cover artwork reference. Only the URL is carried forward.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CoverRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One raw game record as scraped from the catalog API.
///
/// Ingestion guarantees `id` is unique within a run and `name` is present,
/// but the model tolerates a missing name so that a malformed record can
/// still pass through the pipeline as a low-quality singleton.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RawGame {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub first_release_date: Option<i64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub cover: Option<CoverRef>,
    #[serde(default)]
    pub genres: Vec<NamedRef>,
    #[serde(default)]
    pub platforms: Vec<NamedRef>,
    #[serde(default)]
    pub themes: Vec<NamedRef>,
}

impl RawGame {
    pub fn cover_url(&self) -> Option<&str> {
        self.cover.as_ref().and_then(|c| c.url.as_deref())
    }
}

// =============================================================================
// Normalized in-memory records
// =============================================================================

/// A normalized game record, ready for blocking and classification.
///
/// `canonical_name` is a pure function of the raw title and `quality_score`
/// is a pure function of the other fields; both are recomputed on every run.
#[derive(Clone, Debug)]
pub struct Game {
    pub game_id: String,
    pub display_name: String,
    pub canonical_name: String,
    pub release_date: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub rating: Option<f64>,
    pub cover_url: Option<String>,
    pub genres: BTreeSet<String>,
    pub platforms: BTreeSet<String>,
    pub themes: BTreeSet<String>,
    pub has_complete_data: bool,
    pub quality_score: f64,
}

fn ref_names(refs: &[NamedRef]) -> BTreeSet<String> {
    refs.iter().map(|r| r.name.clone()).collect()
}

impl Game {
    pub fn from_raw(
        raw: &RawGame,
        canonical_name: String,
        quality_score: f64,
        has_complete_data: bool,
    ) -> Game {
        let release_date = raw
            .first_release_date
            .and_then(|ts| DateTime::from_timestamp(ts, 0));
        Game {
            game_id: raw.id.to_string(),
            display_name: raw.name.clone(),
            canonical_name,
            release_date,
            summary: raw.summary.clone(),
            rating: raw.rating,
            cover_url: raw.cover_url().map(|u| u.to_string()),
            genres: ref_names(&raw.genres),
            platforms: ref_names(&raw.platforms),
            themes: ref_names(&raw.themes),
            has_complete_data,
            quality_score,
        }
    }

    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }
}

// =============================================================================
// Relationship and group enumerations
// =============================================================================

/// How two records relate. Ordered from most to least specific, so that
/// when several signals fire for the same pair the most specific kind wins.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    DuplicateOf,
    VersionOf,
    SequelTo,
}

impl RelationshipType {
    /// Convert from database string representation
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "duplicate_of" => Some(RelationshipType::DuplicateOf),
            "version_of" => Some(RelationshipType::VersionOf),
            "sequel_to" => Some(RelationshipType::SequelTo),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub fn as_db_str(&self) -> &'static str {
        match self {
            RelationshipType::DuplicateOf => "duplicate_of",
            RelationshipType::VersionOf => "version_of",
            RelationshipType::SequelTo => "sequel_to",
        }
    }

    /// Higher wins when two rules fire for the same pair.
    pub fn specificity(&self) -> u8 {
        match self {
            RelationshipType::DuplicateOf => 2,
            RelationshipType::VersionOf => 1,
            RelationshipType::SequelTo => 0,
        }
    }
}

/// Which partition a group belongs to. Duplicates and alternate editions
/// are degrees of "the same product" and share the `version_group`
/// partition; sequels partition independently as `series`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    VersionGroup,
    Series,
}

impl GroupType {
    /// Convert from database string representation
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "version_group" => Some(GroupType::VersionGroup),
            "series" => Some(GroupType::Series),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub fn as_db_str(&self) -> &'static str {
        match self {
            GroupType::VersionGroup => "version_group",
            GroupType::Series => "series",
        }
    }
}

// =============================================================================
// Output relations
// =============================================================================

/// Row of the `games` relation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRow {
    pub game_id: String,
    pub canonical_name: String,
    pub display_name: String,
    pub release_date: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub rating: Option<f64>,
    pub cover_url: Option<String>,
    pub has_complete_data: bool,
    pub quality_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the `game_relationships` relation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRelationshipRow {
    pub source_game_id: String,
    pub target_game_id: String,
    pub relationship_type: RelationshipType,
    pub confidence_score: f64,
    pub created_at: DateTime<Utc>,
}

/// Row of the `game_groups` relation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameGroupRow {
    pub group_id: String,
    pub group_type: GroupType,
    pub canonical_name: String,
    pub representative_game_id: String,
    pub game_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Row of the `game_group_members` relation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameGroupMemberRow {
    pub group_id: String,
    pub game_id: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

/// The four relations one pipeline run produces. The whole set is a
/// deterministic function of the input records; re-runs on unchanged input
/// differ only in the `created_at`/`updated_at` timestamps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub games: Vec<GameRow>,
    pub relationships: Vec<GameRelationshipRow>,
    pub groups: Vec<GameGroupRow>,
    pub members: Vec<GameGroupMemberRow>,
}
