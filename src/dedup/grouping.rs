//! Group construction from classified edges.
//!
//! Duplicate and version edges collapse into `version_group` components,
//! sequel edges into `series` components, each via its own union-find so
//! the two partitions stay independent. Components of size one are never
//! materialized. Group ids are a stable hash of the sorted membership so
//! re-runs with unchanged membership produce identical ids.

use crate::catalog::{Game, GroupType, RelationshipType};
use crate::dedup::canonical::{first_significant_token, tokens};
use crate::dedup::classify::RelationshipEdge;
use crate::dedup::union_find::UnionFind;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// One materialized group: at least two members, indices into the record
/// slice, sorted by record id.
#[derive(Clone, Debug)]
pub struct Group {
    pub group_id: String,
    pub group_type: GroupType,
    pub canonical_name: String,
    pub representative: usize,
    pub members: Vec<usize>,
}

fn cmp_release(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    // Earliest first; undated records lose ties against dated ones.
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Pick the best member: highest quality score, then earliest release
/// date, then lexicographically smallest record id. Fully deterministic.
fn select_representative(games: &[Game], members: &[usize]) -> usize {
    members
        .iter()
        .copied()
        .min_by(|&a, &b| {
            games[b]
                .quality_score
                .total_cmp(&games[a].quality_score)
                .then_with(|| cmp_release(games[a].release_date, games[b].release_date))
                .then_with(|| games[a].game_id.cmp(&games[b].game_id))
        })
        .expect("groups always have at least two members")
}

fn stable_group_id(group_type: GroupType, games: &[Game], members: &[usize]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(group_type.as_db_str().as_bytes());
    for &idx in members {
        hasher.update(b"|");
        hasher.update(games[idx].game_id.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Series display name: the longest canonical-name token prefix shared by
/// all members ("tomb raider" for "tomb raider" + "tomb raider ii").
fn series_name(games: &[Game], members: &[usize]) -> String {
    let mut common = tokens(&games[members[0]].canonical_name);
    for &idx in &members[1..] {
        let member_tokens = tokens(&games[idx].canonical_name);
        let shared = common
            .iter()
            .zip(member_tokens.iter())
            .take_while(|(a, b)| a == b)
            .count();
        common.truncate(shared);
    }
    if common.is_empty() {
        first_significant_token(&games[members[0]].canonical_name).unwrap_or_default()
    } else {
        common.join(" ")
    }
}

fn components_for(games: &[Game], edges: &[RelationshipEdge], group_type: GroupType) -> Vec<Group> {
    let mut uf = UnionFind::new(games.len());
    let mut touched: BTreeSet<usize> = BTreeSet::new();
    for edge in edges {
        let in_partition = match group_type {
            GroupType::VersionGroup => edge.kind != RelationshipType::SequelTo,
            GroupType::Series => edge.kind == RelationshipType::SequelTo,
        };
        if in_partition {
            uf.union(edge.source, edge.target);
            touched.insert(edge.source);
            touched.insert(edge.target);
        }
    }

    let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for idx in touched {
        let root = uf.find(idx);
        components.entry(root).or_default().push(idx);
    }

    let mut groups = Vec::with_capacity(components.len());
    for (_, mut members) in components {
        debug_assert!(members.len() >= 2, "edge endpoints always pair up");
        members.sort_by(|&a, &b| games[a].game_id.cmp(&games[b].game_id));

        let canonical_name = match group_type {
            GroupType::VersionGroup => {
                debug_assert!(members
                    .iter()
                    .all(|&m| games[m].canonical_name == games[members[0]].canonical_name));
                games[members[0]].canonical_name.clone()
            }
            GroupType::Series => series_name(games, &members),
        };
        let representative = select_representative(games, &members);
        let group_id = stable_group_id(group_type, games, &members);

        groups.push(Group {
            group_id,
            group_type,
            canonical_name,
            representative,
            members,
        });
    }

    // Component discovery order depends on union-find roots; re-sort so
    // the output ordering is a function of content only.
    groups.sort_by(|a, b| {
        a.canonical_name
            .cmp(&b.canonical_name)
            .then_with(|| a.group_id.cmp(&b.group_id))
    });
    groups
}

/// Collapse edges into disjoint groups, one partition per group type.
pub fn build_groups(games: &[Game], edges: &[RelationshipEdge]) -> Vec<Group> {
    let mut groups = components_for(games, edges, GroupType::VersionGroup);
    groups.extend(components_for(games, edges, GroupType::Series));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RawGame;
    use crate::dedup::pipeline::normalize_games;

    fn named(id: u64, name: &str) -> RawGame {
        RawGame {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn edge(source: usize, target: usize, kind: RelationshipType) -> RelationshipEdge {
        RelationshipEdge {
            source,
            target,
            kind,
            confidence: 0.8,
        }
    }

    #[test]
    fn duplicate_chains_collapse_transitively() {
        let games = normalize_games(&[named(1, "Batman"), named(2, "Batman"), named(3, "Batman")]);
        // A-B and B-C, no direct A-C edge
        let edges = vec![
            edge(1, 0, RelationshipType::DuplicateOf),
            edge(2, 1, RelationshipType::DuplicateOf),
        ];

        let groups = build_groups(&games, &edges);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group_type, GroupType::VersionGroup);
        assert_eq!(groups[0].members, vec![0, 1, 2]);
        assert_eq!(groups[0].canonical_name, "batman");
    }

    #[test]
    fn duplicates_and_versions_share_one_partition() {
        let games = normalize_games(&[
            named(1, "Portal"),
            named(2, "Portal"),
            named(3, "Portal: GOTY Edition"),
        ]);
        let edges = vec![
            edge(1, 0, RelationshipType::DuplicateOf),
            edge(2, 0, RelationshipType::VersionOf),
        ];

        let groups = build_groups(&games, &edges);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 3);
    }

    #[test]
    fn sequels_form_an_independent_series_partition() {
        let games = normalize_games(&[
            named(4, "Tomb Raider"),
            named(5, "Tomb Raider II"),
            named(6, "Tomb Raider"),
        ]);
        let edges = vec![
            edge(2, 0, RelationshipType::DuplicateOf),
            edge(1, 0, RelationshipType::SequelTo),
        ];

        let groups = build_groups(&games, &edges);
        assert_eq!(groups.len(), 2);

        let version_group = groups
            .iter()
            .find(|g| g.group_type == GroupType::VersionGroup)
            .unwrap();
        let series = groups
            .iter()
            .find(|g| g.group_type == GroupType::Series)
            .unwrap();
        assert_eq!(version_group.members, vec![0, 2]);
        assert_eq!(series.members, vec![0, 1]);
        assert_eq!(series.canonical_name, "tomb raider");
    }

    #[test]
    fn representative_prefers_quality_then_release_then_id() {
        let mut a = named(10, "Portal");
        let mut b = named(11, "Portal");
        let mut c = named(12, "Portal");
        a.summary = Some("better data".to_string());
        b.first_release_date = Some(1000);
        c.first_release_date = Some(2000);
        let games = normalize_games(&[a, b, c]);

        // a wins outright on quality score
        let members = vec![0, 1, 2];
        assert_eq!(select_representative(&games, &members), 0);

        // between b and c (equal score), the earlier release wins
        assert_eq!(select_representative(&games, &[1, 2]), 1);

        // all equal: smallest record id wins
        let tied = normalize_games(&[named(12, "Portal"), named(11, "Portal")]);
        assert_eq!(select_representative(&tied, &[0, 1]), 1);
    }

    #[test]
    fn group_id_depends_only_on_type_and_membership() {
        let games = normalize_games(&[named(1, "Batman"), named(2, "Batman")]);
        let edges = vec![edge(1, 0, RelationshipType::DuplicateOf)];

        let first = build_groups(&games, &edges);
        let second = build_groups(&games, &edges);
        assert_eq!(first[0].group_id, second[0].group_id);

        // same members under the other type hash differently
        let other = stable_group_id(GroupType::Series, &games, &first[0].members);
        assert_ne!(first[0].group_id, other);
    }

    #[test]
    fn no_edges_means_no_groups() {
        let games = normalize_games(&[named(6, "Chess"), named(7, "Checkers")]);
        assert!(build_groups(&games, &[]).is_empty());
    }
}
