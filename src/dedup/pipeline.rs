//! Pipeline orchestration: raw records in, four cleaned relations out.
//!
//! Stages run in a fixed order: normalize, block, classify, dedupe edges,
//! group, assemble rows. Bucket classification is fanned out with rayon;
//! everything after the parallel stage goes through ordered collections so
//! the output is a deterministic function of the input.

use crate::catalog::{
    Game, GameGroupMemberRow, GameGroupRow, GameRelationshipRow, GameRow, PipelineOutput, RawGame,
};
use crate::dedup::blocking::{loose_blocks, strict_blocks};
use crate::dedup::canonical::canonicalize;
use crate::dedup::classify::{classify, BlockKind, RelationshipEdge};
use crate::dedup::grouping::build_groups;
use crate::dedup::quality::{has_complete_data, quality_score};
use chrono::Utc;
use rayon::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no input records to process")]
    EmptyBatch,
}

/// Derive the normalized record for every raw record, in input order.
/// Every record survives normalization, malformed ones included; they come
/// out with an empty canonical name and a rock-bottom quality score.
pub fn normalize_games(raw: &[RawGame]) -> Vec<Game> {
    raw.iter()
        .map(|record| {
            Game::from_raw(
                record,
                canonicalize(&record.name),
                quality_score(record),
                has_complete_data(record),
            )
        })
        .collect()
}

fn classify_blocks(
    games: &[Game],
    blocks: &BTreeMap<String, Vec<usize>>,
    kind: BlockKind,
) -> Vec<RelationshipEdge> {
    blocks
        .par_iter()
        .flat_map_iter(|(_, bucket)| {
            let mut edges = Vec::new();
            for i in 0..bucket.len() {
                for j in (i + 1)..bucket.len() {
                    if let Some(edge) = classify(games, bucket[i], bucket[j], kind) {
                        edges.push(edge);
                    }
                }
            }
            edges
        })
        .collect()
}

/// Keep at most one edge per unordered pair. When the strict and loose
/// passes both produced one, the more specific kind wins; equal kinds fall
/// back to the higher confidence.
fn dedupe_edges(edges: Vec<RelationshipEdge>) -> Vec<RelationshipEdge> {
    let mut by_pair: BTreeMap<(usize, usize), RelationshipEdge> = BTreeMap::new();
    for edge in edges {
        let key = (edge.source.min(edge.target), edge.source.max(edge.target));
        match by_pair.get(&key) {
            Some(existing)
                if (existing.kind.specificity(), existing.confidence)
                    >= (edge.kind.specificity(), edge.confidence) => {}
            _ => {
                by_pair.insert(key, edge);
            }
        }
    }
    by_pair.into_values().collect()
}

/// Run the full pipeline over one batch of raw records.
///
/// Fails only on an empty batch; individual malformed records degrade to
/// ungrouped singletons instead of failing the run.
pub fn run_pipeline(raw: &[RawGame]) -> Result<PipelineOutput, PipelineError> {
    if raw.is_empty() {
        return Err(PipelineError::EmptyBatch);
    }
    let run_ts = Utc::now();

    let games = normalize_games(raw);
    info!("Normalized {} records", games.len());

    let strict = strict_blocks(&games);
    debug!("{} strict blocks", strict.len());
    let mut edges = classify_blocks(&games, &strict, BlockKind::Canonical);

    if cfg!(feature = "no_loose_blocks") {
        info!("Loose blocking disabled, skipping sequel detection");
    } else {
        let loose = loose_blocks(&games);
        debug!("{} loose blocks", loose.len());
        edges.extend(classify_blocks(&games, &loose, BlockKind::FirstToken));
    }

    let edges = dedupe_edges(edges);
    info!("Classified {} relationships", edges.len());

    let groups = build_groups(&games, &edges);
    info!("Formed {} groups", groups.len());

    let game_rows = games
        .iter()
        .map(|game| GameRow {
            game_id: game.game_id.clone(),
            canonical_name: game.canonical_name.clone(),
            display_name: game.display_name.clone(),
            release_date: game.release_date,
            summary: game.summary.clone(),
            rating: game.rating,
            cover_url: game.cover_url.clone(),
            has_complete_data: game.has_complete_data,
            quality_score: game.quality_score,
            created_at: run_ts,
            updated_at: run_ts,
        })
        .collect();

    let relationship_rows = edges
        .iter()
        .map(|edge| GameRelationshipRow {
            source_game_id: games[edge.source].game_id.clone(),
            target_game_id: games[edge.target].game_id.clone(),
            relationship_type: edge.kind,
            confidence_score: edge.confidence,
            created_at: run_ts,
        })
        .collect();

    let mut group_rows = Vec::with_capacity(groups.len());
    let mut member_rows = Vec::new();
    for group in &groups {
        group_rows.push(GameGroupRow {
            group_id: group.group_id.clone(),
            group_type: group.group_type,
            canonical_name: group.canonical_name.clone(),
            representative_game_id: games[group.representative].game_id.clone(),
            game_count: group.members.len(),
            created_at: run_ts,
        });
        for &member in &group.members {
            member_rows.push(GameGroupMemberRow {
                group_id: group.group_id.clone(),
                game_id: games[member].game_id.clone(),
                is_primary: member == group.representative,
                created_at: run_ts,
            });
        }
    }

    Ok(PipelineOutput {
        games: game_rows,
        relationships: relationship_rows,
        groups: group_rows,
        members: member_rows,
    })
}
