mod load;
mod models;
mod store;

pub use load::{load_raw_games, LoadProblem, LoadedBatch};
pub use models::{
    CoverRef, Game, GameGroupMemberRow, GameGroupRow, GameRelationshipRow, GameRow, GroupType,
    NamedRef, PipelineOutput, RawGame, RelationshipType,
};
pub use store::{read_metadata, read_output, write_output, RunMetadata};
