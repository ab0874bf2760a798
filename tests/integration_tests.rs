//! Integration tests for league-ranker
//!
//! These tests validate the system working together, including:
//! - Convergence and determinism of the rating engine
//! - Storage, snapshot and index publishing
//! - Overwrite protection for stored weeks
//! - Rounding closure of every published number

// Modules for organizing tests
mod fixtures;

use league_ranker::publish::{RankingIndex, RankingPublisher};
use league_ranker::rating::rounding::is_rounded;
use league_ranker::rating::{
    ratings_converged, InMemoryRatingStorage, JsonFileRatingStorage, RankingEngine,
};
use league_ranker::schedule::parse_schedule;
use league_ranker::{RankingService, RatingStorage, RatingsMap, StoreOutcome};
use proptest::prelude::*;
use std::fs;
use std::sync::Arc;

use fixtures::{conference, conference_directory, play, round_robin};

fn assert_all_rounded(ratings: &RatingsMap) {
    for rating in ratings.values() {
        assert!(is_rounded(rating.rating), "rating {}", rating.rating);
        for record in rating.weeks.iter().flatten() {
            assert!(is_rounded(record.value_of_win));
            assert!(is_rounded(record.margin_value));
            assert!(is_rounded(record.quality_of_opponent));
            assert!(is_rounded(record.quality_of_opponent_value));
        }
    }
}

#[test]
fn test_conference_rankings() {
    let teams = conference();
    let outcome = RankingEngine::default().build(&teams).unwrap();

    assert!(outcome.sweeps >= 2);
    assert_eq!(outcome.ratings.len(), 5);
    assert_all_rounded(&outcome.ratings);

    // Unbeaten team on top, winless team at the bottom
    let best = outcome
        .ratings
        .values()
        .max_by(|a, b| a.rating.partial_cmp(&b.rating).unwrap())
        .unwrap();
    let worst = outcome
        .ratings
        .values()
        .min_by(|a, b| a.rating.partial_cmp(&b.rating).unwrap())
        .unwrap();
    assert_eq!(best.id, "1");
    assert_eq!(worst.id, "5");

    // Bye weeks leave empty slots
    assert!(outcome.ratings["2"].week(2).is_none());
    assert!(outcome.ratings["5"].week(1).is_none());
    assert_eq!(outcome.ratings["5"].games_played(), 2);
}

#[test]
fn test_converged_ratings_are_stable() {
    let teams = round_robin(12, 10);
    let outcome = RankingEngine::default().build(&teams).unwrap();

    let mut replay = outcome.ratings.clone();
    RankingEngine::sweep(&mut replay, &teams);
    assert!(ratings_converged(&outcome.ratings, &replay));
    assert_all_rounded(&outcome.ratings);
}

#[test]
fn test_repeated_builds_are_identical() {
    let teams = round_robin(8, 6);
    let first = RankingEngine::default().build(&teams).unwrap();
    let second = RankingEngine::default().build(&teams).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.ratings).unwrap(),
        serde_json::to_string(&second.ratings).unwrap()
    );
}

#[test]
fn test_opponent_processed_earlier_is_seen_within_sweep() {
    let mut teams = vec![
        league_ranker::Team::new("a"),
        league_ranker::Team::new("b"),
    ];
    play(&mut teams, 1, "a", 21, "b", 14);

    let mut ratings = RankingEngine::initial_ratings(&teams);
    RankingEngine::sweep(&mut ratings, &teams);

    // "a" saw "b" at its initial 0.0; "b" saw "a"'s fresh 0.7.
    assert_eq!(ratings["a"].week(1).unwrap().quality_of_opponent, 0.0);
    assert_eq!(ratings["b"].week(1).unwrap().quality_of_opponent, 0.7);
    assert_eq!(ratings["b"].rating, 0.21);
}

#[test]
fn test_full_run_publishes_snapshot_and_index() {
    let tmp = tempfile::tempdir().unwrap();
    let rankings_dir = tmp.path().join("rankings");
    let directory = Arc::new(conference_directory());
    let storage = Arc::new(InMemoryRatingStorage::new());

    let service = RankingService::new(
        RankingEngine::default(),
        storage.clone(),
        directory.clone(),
        RankingPublisher::new(&rankings_dir),
    );

    let teams = conference();
    let (outcome, stored) = service.run(2024, 3, &teams, false).unwrap();
    let StoreOutcome::Stored { teams: count, snapshot } = stored else {
        panic!("expected ratings to be stored");
    };
    assert_eq!(count, 5);
    assert_eq!(snapshot, rankings_dir.join("2024.3.json"));
    assert_eq!(directory.lookups(), 1);

    let published: RatingsMap = serde_json::from_str::<Vec<league_ranker::TeamRating>>(
        &fs::read_to_string(&snapshot).unwrap(),
    )
    .unwrap()
    .into_iter()
    .map(|rating| (rating.id.clone(), rating))
    .collect();
    assert_eq!(published, outcome.ratings);

    let index: RankingIndex =
        serde_json::from_str(&fs::read_to_string(rankings_dir.join("index.json")).unwrap())
            .unwrap();
    assert_eq!(index.files, vec!["2024.3.json".to_string()]);
    assert_eq!(index.teams.len(), 5);
    assert_eq!(index.teams["5"].mascot, "Monorails");

    let rankings = storage.get_rankings(2024, 3).unwrap();
    assert_eq!(rankings[0].team_id, "1");
    assert!(rankings
        .windows(2)
        .all(|pair| pair[0].rating >= pair[1].rating));
}

#[test]
fn test_stored_week_survives_restart_and_is_protected() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("ratings.json");
    let rankings_dir = tmp.path().join("rankings");
    let teams = conference();

    let first = RankingService::new(
        RankingEngine::default(),
        Arc::new(JsonFileRatingStorage::open(&db).unwrap()),
        Arc::new(conference_directory()),
        RankingPublisher::new(&rankings_dir),
    );
    let (_, stored) = first.run(2024, 3, &teams, false).unwrap();
    assert!(matches!(stored, StoreOutcome::Stored { teams: 5, .. }));

    let second = RankingService::new(
        RankingEngine::default(),
        Arc::new(JsonFileRatingStorage::open(&db).unwrap()),
        Arc::new(conference_directory()),
        RankingPublisher::new(&rankings_dir),
    );
    let (_, stored) = second.run(2024, 3, &teams, false).unwrap();
    assert_eq!(stored, StoreOutcome::AlreadyExists);

    let (_, stored) = second.run(2024, 3, &teams, true).unwrap();
    assert!(matches!(stored, StoreOutcome::Stored { teams: 5, .. }));

    // A second week adds a file to the index
    second.run(2024, 4, &teams, false).unwrap();
    let index: RankingIndex =
        serde_json::from_str(&fs::read_to_string(rankings_dir.join("index.json")).unwrap())
            .unwrap();
    assert_eq!(index.files, vec!["2024.3.json", "2024.4.json"]);
}

#[test]
fn test_schedule_file_round_trip_through_engine() {
    let json = r#"[
        {"id": "1", "scores": [{"score": 21, "opposingScore": 14, "opposingTeam": "2"}]},
        {"id": "2", "scores": [{"score": 14, "opposingScore": 21, "opposingTeam": "1"}, null, {"score": 3, "opposingScore": 0, "opposingTeam": "fcs"}]}
    ]"#;

    let teams = parse_schedule(json).unwrap();
    let outcome = RankingEngine::default().build(&teams).unwrap();

    let fcs_game = outcome.ratings["2"].week(3).unwrap();
    assert_eq!(fcs_game.quality_of_opponent, 0.0);
    assert!(fcs_game.win);
    assert!(outcome.ratings["2"].week(2).is_none());
    assert!(!outcome.ratings.contains_key("fcs"));
}

proptest! {
    #[test]
    fn prop_build_is_deterministic_and_rounded(
        games in prop::collection::vec((0usize..6, 0usize..6, 0u32..60, 0u32..60), 0..20)
    ) {
        let mut teams: Vec<league_ranker::Team> =
            (0..6).map(|i| league_ranker::Team::new(i.to_string())).collect();
        for (n, (home, away, home_score, away_score)) in games.into_iter().enumerate() {
            if home == away {
                continue;
            }
            let week = (n / 3) as u32 + 1;
            if teams[home].plays_in(week) || teams[away].plays_in(week) {
                continue;
            }
            play(&mut teams, week, &home.to_string(), home_score, &away.to_string(), away_score);
        }

        let first = RankingEngine::default().build(&teams).unwrap();
        let second = RankingEngine::default().build(&teams).unwrap();

        prop_assert!(first.sweeps >= 1);
        prop_assert_eq!(&first, &second);
        prop_assert!(ratings_converged(&first.ratings, &first.ratings));
        for rating in first.ratings.values() {
            prop_assert!(is_rounded(rating.rating));
            for record in rating.weeks.iter().flatten() {
                prop_assert!(is_rounded(record.value_of_win));
                prop_assert!(is_rounded(record.quality_of_opponent_value));
            }
        }
    }
}
