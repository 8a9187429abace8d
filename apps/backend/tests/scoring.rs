//! Scoring engine suites: award rules, decoys, reset-then-compute.

mod support;

use std::collections::HashMap;

use backend::domain::rules::{
    POINTS_FOR_CORRECT_ANSWER, POINTS_FOR_CORRECT_RECOGNITION, POINTS_FOR_RECOGNITION,
};
use backend::repos::{results as results_repo, rounds as rounds_repo, variants as variants_repo};
use backend::services::game_flow::progression;
use backend::services::{
    games as games_service, rounds as rounds_service, scoring as scoring_service,
    variants as variants_service,
};

const PROMPTS: &[&str] = &[
    "зелёный трактор",
    "воздушный шарик",
    "подводная лодка",
    "полярное сияние",
];

async fn room_in_writing(
    db: &sea_orm::DatabaseConnection,
    player_count: usize,
) -> support::TestRoom {
    support::seed_tasks(db, "ru", PROMPTS).await;
    let state = support::setup_state(db.clone()).await;
    let room = support::setup_room(db, player_count, 1).await;
    games_service::start_game(db, &state.tasks, room.game.id)
        .await
        .unwrap();
    for round in rounds_repo::find_by_game(db, room.game.id).await.unwrap() {
        rounds_repo::set_painting_if_missing(db, round.id, "/media/p.png")
            .await
            .unwrap();
    }
    progression::advance(db, room.game.id).await.unwrap();
    room
}

async fn results_by_player(
    db: &sea_orm::DatabaseConnection,
    game_id: i64,
) -> HashMap<i64, (i32, i32)> {
    results_repo::find_by_game(db, game_id)
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.player_id, (r.result, r.round_increment)))
        .collect()
}

#[tokio::test]
async fn fooling_other_players_pays_even_when_not_painting() {
    let db = support::setup_db().await;
    let room = room_in_writing(&db, 3).await;
    let game_id = room.game.id;
    let round = rounds_repo::require_current(&db, game_id).await.unwrap();
    let guessers: Vec<_> = room
        .players
        .iter()
        .filter(|p| p.id != round.painter_id)
        .collect();
    let (first, second) = (guessers[0], guessers[1]);

    variants_service::apply_variant(&db, game_id, first.id, "хитрый лис")
        .await
        .unwrap();
    variants_service::apply_variant(&db, game_id, second.id, "скорый поезд")
        .await
        .unwrap();
    progression::advance(&db, game_id).await.unwrap();

    // First guesser finds the answer; the second falls for first's fake.
    variants_service::select_variant(&db, game_id, first.id, &round.painting_task)
        .await
        .unwrap();
    variants_service::select_variant(&db, game_id, second.id, "хитрый лис")
        .await
        .unwrap();
    progression::advance(&db, game_id).await.unwrap();

    scoring_service::calculate_results(&db, game_id).await.unwrap();

    let results = results_by_player(&db, game_id).await;
    assert_eq!(
        results[&round.painter_id],
        (POINTS_FOR_CORRECT_RECOGNITION, POINTS_FOR_CORRECT_RECOGNITION)
    );
    assert_eq!(
        results[&first.id],
        (
            POINTS_FOR_CORRECT_ANSWER + POINTS_FOR_RECOGNITION,
            POINTS_FOR_CORRECT_ANSWER + POINTS_FOR_RECOGNITION
        )
    );
    assert_eq!(results[&second.id], (0, 0));
}

#[tokio::test]
async fn selected_decoys_award_nobody() {
    let db = support::setup_db().await;
    support::seed_auto_answers(&db, "ru", &["случайный ответ"]).await;
    let room = room_in_writing(&db, 2).await;
    let game_id = room.game.id;
    let game = backend::repos::games::require_game(&db, game_id).await.unwrap();
    let round = rounds_repo::require_current(&db, game_id).await.unwrap();
    let guesser = room
        .players
        .iter()
        .find(|p| p.id != round.painter_id)
        .unwrap();

    // The guesser never wrote; the pool is padded with a decoy instead.
    rounds_service::populate_missing_variants(&db, &game, &round)
        .await
        .unwrap();
    let decoy = variants_repo::find_by_round(&db, round.id)
        .await
        .unwrap()
        .into_iter()
        .find(|v| v.author_id.is_none())
        .unwrap();
    progression::advance(&db, game_id).await.unwrap();

    variants_service::select_variant(&db, game_id, guesser.id, &decoy.text)
        .await
        .unwrap();
    progression::advance(&db, game_id).await.unwrap();

    scoring_service::calculate_results(&db, game_id).await.unwrap();

    let results = results_by_player(&db, game_id).await;
    assert_eq!(results[&round.painter_id], (0, 0));
    assert_eq!(results[&guesser.id], (0, 0));
}

#[tokio::test]
async fn rescoring_resets_the_increment_instead_of_doubling_it() {
    let db = support::setup_db().await;
    let room = room_in_writing(&db, 2).await;
    let game_id = room.game.id;
    let round = rounds_repo::require_current(&db, game_id).await.unwrap();
    let guesser = room
        .players
        .iter()
        .find(|p| p.id != round.painter_id)
        .unwrap();

    variants_service::apply_variant(&db, game_id, guesser.id, "жёлтая субмарина")
        .await
        .unwrap();
    progression::advance(&db, game_id).await.unwrap();
    variants_service::select_variant(&db, game_id, guesser.id, &round.painting_task)
        .await
        .unwrap();
    progression::advance(&db, game_id).await.unwrap();

    scoring_service::calculate_results(&db, game_id).await.unwrap();
    let first_pass = results_by_player(&db, game_id).await;

    // The pass always opens with a fresh increment reset, so re-running it
    // never inflates round_increment.
    scoring_service::calculate_results(&db, game_id).await.unwrap();
    let second_pass = results_by_player(&db, game_id).await;

    for (player_id, (_, increment)) in &second_pass {
        assert_eq!(*increment, first_pass[player_id].1);
    }
    assert_eq!(second_pass[&guesser.id].1, POINTS_FOR_CORRECT_ANSWER);
    assert_eq!(
        second_pass[&round.painter_id].1,
        POINTS_FOR_CORRECT_RECOGNITION
    );
}
