//! Summary statistics over a pipeline run's output relations.

use crate::catalog::{GroupType, PipelineOutput, RelationshipType};
use std::collections::BTreeMap;
use std::fmt;

/// Aggregated counts and averages for one output set.
#[derive(Clone, Debug)]
pub struct OutputStats {
    pub game_count: usize,
    pub complete_data_count: usize,
    pub average_quality: f64,
    pub relationship_counts: BTreeMap<&'static str, usize>,
    pub group_counts: BTreeMap<&'static str, usize>,
    pub grouped_game_count: usize,
    pub largest_group: Option<(String, usize)>,
}

impl OutputStats {
    pub fn collect(output: &PipelineOutput) -> OutputStats {
        let game_count = output.games.len();
        let complete_data_count = output.games.iter().filter(|g| g.has_complete_data).count();
        let average_quality = if game_count == 0 {
            0.0
        } else {
            output.games.iter().map(|g| g.quality_score).sum::<f64>() / game_count as f64
        };

        let mut relationship_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for kind in [
            RelationshipType::DuplicateOf,
            RelationshipType::VersionOf,
            RelationshipType::SequelTo,
        ] {
            let count = output
                .relationships
                .iter()
                .filter(|r| r.relationship_type == kind)
                .count();
            relationship_counts.insert(kind.as_db_str(), count);
        }

        let mut group_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for group_type in [GroupType::VersionGroup, GroupType::Series] {
            let count = output
                .groups
                .iter()
                .filter(|g| g.group_type == group_type)
                .count();
            group_counts.insert(group_type.as_db_str(), count);
        }

        let grouped_game_count = {
            let mut ids: Vec<&str> = output.members.iter().map(|m| m.game_id.as_str()).collect();
            ids.sort();
            ids.dedup();
            ids.len()
        };

        let largest_group = output
            .groups
            .iter()
            .max_by(|a, b| {
                a.game_count
                    .cmp(&b.game_count)
                    .then_with(|| b.group_id.cmp(&a.group_id))
            })
            .map(|g| (g.canonical_name.clone(), g.game_count));

        OutputStats {
            game_count,
            complete_data_count,
            average_quality,
            relationship_counts,
            group_counts,
            grouped_game_count,
            largest_group,
        }
    }
}

impl fmt::Display for OutputStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Games:               {}", self.game_count)?;
        writeln!(
            f,
            "  with complete data: {} ({:.1}%)",
            self.complete_data_count,
            percentage(self.complete_data_count, self.game_count)
        )?;
        writeln!(f, "  average quality:   {:.1}", self.average_quality)?;

        let relationship_total: usize = self.relationship_counts.values().sum();
        writeln!(f, "Relationships:       {}", relationship_total)?;
        for (kind, count) in &self.relationship_counts {
            writeln!(f, "  {:<18} {}", kind, count)?;
        }

        let group_total: usize = self.group_counts.values().sum();
        writeln!(f, "Groups:              {}", group_total)?;
        for (group_type, count) in &self.group_counts {
            writeln!(f, "  {:<18} {}", group_type, count)?;
        }
        writeln!(
            f,
            "  grouped games:     {} ({:.1}%)",
            self.grouped_game_count,
            percentage(self.grouped_game_count, self.game_count)
        )?;
        if let Some((name, size)) = &self.largest_group {
            writeln!(f, "  largest group:     \"{}\" ({} games)", name, size)?;
        }
        Ok(())
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
