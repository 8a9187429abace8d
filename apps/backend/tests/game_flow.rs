//! Service-level walkthroughs of the stage machine: round creation, the
//! full two-player round trip, current-round uniqueness.

mod support;

use backend::entities::games::GameStage;
use backend::entities::rounds::RoundStage;
use backend::errors::domain::{DomainError, ValidationKind};
use backend::repos::{results as results_repo, rounds as rounds_repo, variants as variants_repo};
use backend::services::game_flow::progression;
use backend::services::{
    games as games_service, rounds as rounds_service, scoring as scoring_service,
    variants as variants_service,
};

const PROMPTS: &[&str] = &["зелёный трактор", "воздушный шарик", "подводная лодка"];

async fn current_round_count(db: &sea_orm::DatabaseConnection, game_id: i64) -> usize {
    rounds_repo::find_by_game(db, game_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.stage != RoundStage::NotStarted && r.stage != RoundStage::Finished)
        .count()
}

#[tokio::test]
async fn start_rejects_single_player_rooms() {
    let db = support::setup_db().await;
    support::seed_tasks(&db, "ru", PROMPTS).await;
    let state = support::setup_state(db.clone()).await;
    let room = support::setup_room(&db, 1, 1).await;

    let err = games_service::start_game(&db, &state.tasks, room.game.id)
        .await
        .expect_err("one player is not enough");
    match err {
        DomainError::Validation(ValidationKind::StartGame, _) => {}
        other => panic!("expected start_game validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn start_creates_rounds_results_and_enters_preround() {
    let db = support::setup_db().await;
    support::seed_tasks(&db, "ru", PROMPTS).await;
    let state = support::setup_state(db.clone()).await;
    let room = support::setup_room(&db, 2, 1).await;

    games_service::start_game(&db, &state.tasks, room.game.id)
        .await
        .unwrap();

    let game = backend::repos::games::require_game(&db, room.game.id)
        .await
        .unwrap();
    assert_eq!(game.stage, GameStage::Preround);

    let rounds = rounds_repo::find_by_game(&db, room.game.id).await.unwrap();
    assert_eq!(rounds.len(), 2);
    assert!(rounds.iter().all(|r| r.stage == RoundStage::NotStarted));
    // Painters are assigned cyclically in join order.
    assert_eq!(rounds[0].painter_id, room.players[0].id);
    assert_eq!(rounds[1].painter_id, room.players[1].id);
    // No prompt repeats within the room.
    assert_ne!(rounds[0].painting_task, rounds[1].painting_task);

    // Each round is seeded with the prompt authored by its painter.
    for round in &rounds {
        let variants = variants_repo::find_by_round(&db, round.id).await.unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].text, round.painting_task);
        assert_eq!(variants[0].author_id, Some(round.painter_id));
    }

    let results = results_repo::find_by_game(&db, room.game.id).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.result == 0 && r.round_increment == 0));
}

#[tokio::test]
async fn two_player_single_cycle_room_reaches_finished_with_expected_points() {
    let db = support::setup_db().await;
    support::seed_tasks(&db, "ru", PROMPTS).await;
    let state = support::setup_state(db.clone()).await;
    let room = support::setup_room(&db, 2, 1).await;
    let game_id = room.game.id;

    games_service::start_game(&db, &state.tasks, game_id).await.unwrap();

    // Preround: both painters upload, predicate fires, first round is armed.
    let game = backend::repos::games::require_game(&db, game_id).await.unwrap();
    for round in rounds_repo::find_by_game(&db, game_id).await.unwrap() {
        assert!(rounds_repo::set_painting_if_missing(&db, round.id, "/media/p.png")
            .await
            .unwrap());
    }
    assert!(rounds_service::stage_completed(&db, &game, None).await.unwrap());
    assert_eq!(progression::advance(&db, game_id).await.unwrap(), GameStage::Round);

    for expected_round in 0..2 {
        let game = backend::repos::games::require_game(&db, game_id).await.unwrap();
        let round = rounds_repo::require_current(&db, game_id).await.unwrap();
        assert_eq!(round.order_number, expected_round);
        assert_eq!(round.stage, RoundStage::Writing);
        assert_eq!(current_round_count(&db, game_id).await, 1);

        let guesser = room
            .players
            .iter()
            .find(|p| p.id != round.painter_id)
            .unwrap();

        // Writing: the guesser submits, completing the predicate.
        variants_service::apply_variant(&db, game_id, guesser.id, "жёлтая субмарина")
            .await
            .unwrap();
        assert!(rounds_service::stage_completed(&db, &game, Some(&round))
            .await
            .unwrap());
        progression::advance(&db, game_id).await.unwrap();

        // Selecting: the guesser picks the true answer.
        let round = rounds_repo::require_current(&db, game_id).await.unwrap();
        assert_eq!(round.stage, RoundStage::Selecting);
        variants_service::select_variant(&db, game_id, guesser.id, &round.painting_task)
            .await
            .unwrap();
        assert!(rounds_service::stage_completed(&db, &game, Some(&round))
            .await
            .unwrap());
        progression::advance(&db, game_id).await.unwrap();

        // Answers: scoring runs, then the room either shows results or
        // finishes outright on the last round.
        let round = rounds_repo::require_current(&db, game_id).await.unwrap();
        assert_eq!(round.stage, RoundStage::Answers);
        scoring_service::calculate_results(&db, game_id).await.unwrap();
        let stage = progression::advance(&db, game_id).await.unwrap();

        if expected_round == 0 {
            assert_eq!(stage, GameStage::Round);
            let round = rounds_repo::require_current(&db, game_id).await.unwrap();
            assert_eq!(round.stage, RoundStage::Results);
            // Results screen over, the next round is armed directly.
            assert_eq!(progression::advance(&db, game_id).await.unwrap(), GameStage::Round);
        } else {
            // The very last round of the room skips the results screen.
            assert_eq!(stage, GameStage::Finished);
        }
    }

    let game = backend::repos::games::require_game(&db, game_id).await.unwrap();
    assert_eq!(game.stage, GameStage::Finished);
    assert_eq!(current_round_count(&db, game_id).await, 0);

    // One correct guess-and-recognition cycle per player:
    // 1000 as painter, 1000 as guesser.
    let results = results_repo::find_by_game(&db, game_id).await.unwrap();
    assert_eq!(results.len(), 2);
    for result in &results {
        assert_eq!(result.result, 2000);
        assert_eq!(result.round_increment, 1000);
    }
}

#[tokio::test]
async fn writing_timeout_pads_the_pool_with_decoys() {
    let db = support::setup_db().await;
    support::seed_tasks(&db, "ru", PROMPTS).await;
    support::seed_auto_answers(&db, "ru", &["случайный ответ", "загадочный зверь"]).await;
    let state = support::setup_state(db.clone()).await;
    let room = support::setup_room(&db, 2, 1).await;
    let game_id = room.game.id;

    games_service::start_game(&db, &state.tasks, game_id).await.unwrap();
    for round in rounds_repo::find_by_game(&db, game_id).await.unwrap() {
        rounds_repo::set_painting_if_missing(&db, round.id, "/media/p.png")
            .await
            .unwrap();
    }
    progression::advance(&db, game_id).await.unwrap();

    // Nobody wrote a guess in time; the pool is padded up to one variant
    // per participant.
    let game = backend::repos::games::require_game(&db, game_id).await.unwrap();
    let round = rounds_repo::require_current(&db, game_id).await.unwrap();
    rounds_service::populate_missing_variants(&db, &game, &round)
        .await
        .unwrap();

    let variants = variants_repo::find_by_round(&db, round.id).await.unwrap();
    assert_eq!(variants.len(), 2);
    assert_eq!(variants.iter().filter(|v| v.author_id.is_none()).count(), 1);
}
