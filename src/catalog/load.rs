//! Raw catalog loading from JSON dumps.

use super::RawGame;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Non-fatal problems encountered while loading a raw dump. The loader
/// collects these and keeps going; only a completely unreadable input is
/// fatal.
#[derive(Debug)]
pub enum LoadProblem {
    UnreadableFile { path: PathBuf, error: String },
    InvalidJson { path: PathBuf, error: String },
    MissingName { id: u64 },
    DuplicateId { id: u64 },
}

impl std::fmt::Display for LoadProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadProblem::UnreadableFile { path, error } => {
                write!(f, "Could not read {}: {}", path.display(), error)
            }
            LoadProblem::InvalidJson { path, error } => {
                write!(f, "Invalid JSON in {}: {}", path.display(), error)
            }
            LoadProblem::MissingName { id } => {
                write!(
                    f,
                    "Record {} has no name, it will pass through as a singleton",
                    id
                )
            }
            LoadProblem::DuplicateId { id } => {
                write!(f, "Record id {} appears more than once, keeping the first", id)
            }
        }
    }
}

/// Result of loading a raw dump: the records plus any non-fatal problems.
#[derive(Debug, Default)]
pub struct LoadedBatch {
    pub games: Vec<RawGame>,
    pub problems: Vec<LoadProblem>,
}

fn parse_file(path: &Path, batch: &mut LoadedBatch) {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            batch.problems.push(LoadProblem::UnreadableFile {
                path: path.to_owned(),
                error: err.to_string(),
            });
            return;
        }
    };
    match serde_json::from_str::<Vec<RawGame>>(&text) {
        Ok(games) => batch.games.extend(games),
        Err(err) => batch.problems.push(LoadProblem::InvalidJson {
            path: path.to_owned(),
            error: err.to_string(),
        }),
    }
}

/// Load raw games from a single JSON file or from every `*.json` file in a
/// directory. Directory entries are visited in sorted order so the batch is
/// deterministic regardless of filesystem enumeration order.
pub fn load_raw_games<P: AsRef<Path>>(path: P) -> Result<LoadedBatch> {
    let path = path.as_ref();
    let mut batch = LoadedBatch::default();

    if path.is_file() {
        parse_file(path, &mut batch);
    } else if path.is_dir() {
        let mut json_files: Vec<PathBuf> = std::fs::read_dir(path)
            .with_context(|| format!("Could not read input directory {}", path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        json_files.sort();
        if json_files.is_empty() {
            bail!("No JSON files found in {}", path.display());
        }
        for file in &json_files {
            parse_file(file, &mut batch);
        }
    } else {
        bail!("Input path {} does not exist", path.display());
    }

    // Records with duplicate ids or missing names stay non-fatal, matching
    // how the rest of the pipeline degrades instead of aborting.
    let mut seen_ids = HashSet::new();
    let mut unique = Vec::with_capacity(batch.games.len());
    for game in batch.games.drain(..) {
        if !seen_ids.insert(game.id) {
            batch.problems.push(LoadProblem::DuplicateId { id: game.id });
            continue;
        }
        if game.name.trim().is_empty() {
            batch.problems.push(LoadProblem::MissingName { id: game.id });
        }
        unique.push(game);
    }
    batch.games = unique;

    if !batch.problems.is_empty() {
        warn!("Found {} problems while loading:", batch.problems.len());
        for problem in &batch.problems {
            warn!("- {}", problem);
        }
    }
    info!(
        "Loaded {} raw games from {}",
        batch.games.len(),
        path.display()
    );

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(dir: &Path, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn loads_all_json_files_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "b.json", r#"[{"id": 2, "name": "Portal 2"}]"#);
        write_json(dir.path(), "a.json", r#"[{"id": 1, "name": "Portal"}]"#);

        let batch = load_raw_games(dir.path()).unwrap();
        assert_eq!(batch.games.len(), 2);
        assert_eq!(batch.games[0].id, 1);
        assert_eq!(batch.games[1].id, 2);
        assert!(batch.problems.is_empty());
    }

    #[test]
    fn invalid_json_is_a_problem_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "good.json", r#"[{"id": 1, "name": "Portal"}]"#);
        write_json(dir.path(), "bad.json", "{not json");

        let batch = load_raw_games(dir.path()).unwrap();
        assert_eq!(batch.games.len(), 1);
        assert_eq!(batch.problems.len(), 1);
        assert!(matches!(batch.problems[0], LoadProblem::InvalidJson { .. }));
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            dir.path(),
            "games.json",
            r#"[{"id": 1, "name": "Portal"}, {"id": 1, "name": "Portal again"}]"#,
        );

        let batch = load_raw_games(dir.path()).unwrap();
        assert_eq!(batch.games.len(), 1);
        assert_eq!(batch.games[0].name, "Portal");
        assert!(matches!(batch.problems[0], LoadProblem::DuplicateId { id: 1 }));
    }

    #[test]
    fn missing_name_is_reported_but_kept() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "games.json", r#"[{"id": 9}]"#);

        let batch = load_raw_games(dir.path()).unwrap();
        assert_eq!(batch.games.len(), 1);
        assert!(matches!(batch.problems[0], LoadProblem::MissingName { id: 9 }));
    }

    #[test]
    fn missing_path_is_fatal() {
        assert!(load_raw_games("/definitely/not/a/path").is_err());
    }
}
