use gamedex_dedup::catalog::{CoverRef, NamedRef, RawGame};

/// Minimal record: an id and a title, nothing else.
pub fn game(id: u64, name: &str) -> RawGame {
    RawGame {
        id,
        name: name.to_string(),
        ..Default::default()
    }
}

/// Fully populated record, highest possible quality score.
pub fn rich_game(id: u64, name: &str, release_ts: i64) -> RawGame {
    RawGame {
        id,
        name: name.to_string(),
        summary: Some(format!("Summary of {}", name)),
        first_release_date: Some(release_ts),
        rating: Some(85.0),
        cover: Some(CoverRef {
            id: Some(id),
            url: Some(format!("//images.example.com/{}.jpg", id)),
        }),
        genres: vec![named_ref(1, "Action")],
        platforms: vec![named_ref(2, "PC")],
        themes: vec![named_ref(3, "Fantasy")],
    }
}

pub fn named_ref(id: u64, name: &str) -> NamedRef {
    NamedRef {
        id,
        name: name.to_string(),
    }
}

/// A small catalog with known duplicate, version and sequel structure:
/// two "Batman" duplicates, a "Portal" with its GOTY edition, the first
/// three Tomb Raider entries and one unrelated singleton.
pub fn sample_catalog() -> Vec<RawGame> {
    vec![
        rich_game(1, "Batman", 1_253_836_800),
        game(2, "Batman"),
        rich_game(3, "Portal", 1_191_974_400),
        game(4, "Portal: Game of the Year Edition"),
        rich_game(5, "Tomb Raider", 846_806_400),
        game(6, "Tomb Raider II"),
        game(7, "Tomb Raider III"),
        game(8, "Chess"),
    ]
}
