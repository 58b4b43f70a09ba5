//! Gamedex Dedup Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod dedup;

// Re-export commonly used types for convenience
pub use catalog::{
    load_raw_games, read_metadata, read_output, write_output, Game, GroupType, LoadedBatch,
    PipelineOutput, RawGame, RelationshipType,
};
pub use dedup::{run_pipeline, OutputStats, PipelineError};
