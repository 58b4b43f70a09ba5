mod blocking;
mod canonical;
mod classify;
mod grouping;
mod pipeline;
mod quality;
mod stats;
mod union_find;

pub use blocking::{loose_blocks, strict_blocks};
pub use canonical::{canonicalize, first_significant_token, normalize_title};
pub use classify::{classify, BlockKind, RelationshipEdge};
pub use grouping::{build_groups, Group};
pub use pipeline::{normalize_games, run_pipeline, PipelineError};
pub use quality::{has_complete_data, quality_score};
pub use stats::OutputStats;
