//! JSON-file persistence for the cleaned relations.
//!
//! Each relation is written as its own file, matching the table names the
//! downstream warehouse loader expects, plus a small run manifest.

use super::PipelineOutput;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const GAMES_FILE: &str = "games.json";
pub const RELATIONSHIPS_FILE: &str = "game_relationships.json";
pub const GROUPS_FILE: &str = "game_groups.json";
pub const MEMBERS_FILE: &str = "game_group_members.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Manifest describing one pipeline run, written next to the relations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunMetadata {
    pub source: String,
    pub processed_at: DateTime<Utc>,
    pub game_count: usize,
    pub relationship_count: usize,
    pub group_count: usize,
    pub member_count: usize,
}

impl RunMetadata {
    pub fn for_output(source: &str, output: &PipelineOutput) -> RunMetadata {
        RunMetadata {
            source: source.to_string(),
            processed_at: Utc::now(),
            game_count: output.games.len(),
            relationship_count: output.relationships.len(),
            group_count: output.groups.len(),
            member_count: output.members.len(),
        }
    }
}

fn write_json<T: Serialize>(dir: &Path, file_name: &str, rows: &T, pretty: bool) -> Result<()> {
    let path = dir.join(file_name);
    let text = if pretty {
        serde_json::to_string_pretty(rows)?
    } else {
        serde_json::to_string(rows)?
    };
    std::fs::write(&path, text).with_context(|| format!("Could not write {}", path.display()))?;
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(dir: &Path, file_name: &str) -> Result<T> {
    let path = dir.join(file_name);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Write the four relations plus the run manifest into `dir`, creating the
/// directory if needed.
pub fn write_output<P: AsRef<Path>>(
    output: &PipelineOutput,
    dir: P,
    source: &str,
    pretty: bool,
) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create output directory {}", dir.display()))?;

    write_json(dir, GAMES_FILE, &output.games, pretty)?;
    write_json(dir, RELATIONSHIPS_FILE, &output.relationships, pretty)?;
    write_json(dir, GROUPS_FILE, &output.groups, pretty)?;
    write_json(dir, MEMBERS_FILE, &output.members, pretty)?;

    let metadata = RunMetadata::for_output(source, output);
    write_json(dir, METADATA_FILE, &metadata, pretty)?;

    info!(
        "Wrote {} games, {} relationships, {} groups, {} members to {}",
        output.games.len(),
        output.relationships.len(),
        output.groups.len(),
        output.members.len(),
        dir.display()
    );
    Ok(())
}

/// Read back a previously written output directory.
pub fn read_output<P: AsRef<Path>>(dir: P) -> Result<PipelineOutput> {
    let dir = dir.as_ref();
    Ok(PipelineOutput {
        games: read_json(dir, GAMES_FILE)?,
        relationships: read_json(dir, RELATIONSHIPS_FILE)?,
        groups: read_json(dir, GROUPS_FILE)?,
        members: read_json(dir, MEMBERS_FILE)?,
    })
}

/// Read the run manifest from an output directory.
pub fn read_metadata<P: AsRef<Path>>(dir: P) -> Result<RunMetadata> {
    read_json(dir.as_ref(), METADATA_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_output() -> PipelineOutput {
        PipelineOutput {
            games: vec![],
            relationships: vec![],
            groups: vec![],
            members: vec![],
        }
    }

    #[test]
    fn writes_and_reads_back_all_relations() {
        let dir = tempfile::tempdir().unwrap();
        let output = empty_output();
        write_output(&output, dir.path(), "test.json", false).unwrap();

        for file in [
            GAMES_FILE,
            RELATIONSHIPS_FILE,
            GROUPS_FILE,
            MEMBERS_FILE,
            METADATA_FILE,
        ] {
            assert!(dir.path().join(file).exists(), "missing {}", file);
        }

        let read_back = read_output(dir.path()).unwrap();
        assert!(read_back.games.is_empty());

        let metadata = read_metadata(dir.path()).unwrap();
        assert_eq!(metadata.source, "test.json");
        assert_eq!(metadata.game_count, 0);
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("cleaned").join("run_1");
        write_output(&empty_output(), &nested, "src", true).unwrap();
        assert!(nested.join(GAMES_FILE).exists());
    }
}
