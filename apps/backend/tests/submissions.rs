//! Submission validator suites: duplicates, alphabets, selections, likes,
//! media uploads.

mod support;

use backend::entities::rounds::RoundStage;
use backend::errors::domain::{DomainError, ValidationKind};
use backend::repos::{rounds as rounds_repo, variants as variants_repo};
use backend::services::game_flow::progression;
use backend::services::{
    games as games_service, players as players_service, rounds as rounds_service,
    variants as variants_service,
};

const PROMPTS: &[&str] = &["зелёный трактор", "воздушный шарик", "подводная лодка"];

/// Room advanced into the first round's writing stage.
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

fn assert_validation(err: DomainError, expected: ValidationKind) {
    match err {
        DomainError::Validation(kind, _) => assert_eq!(kind, expected),
        other => panic!("expected {expected:?} validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn near_miss_of_the_true_answer_is_rejected_as_duplicate() {
    let db = support::setup_db().await;
    let room = room_in_writing(&db, 2).await;
    let round = rounds_repo::require_current(&db, room.game.id).await.unwrap();
    let guesser = room
        .players
        .iter()
        .find(|p| p.id != round.painter_id)
        .unwrap();

    // One appended character on a long prompt stays above the similarity
    // threshold.
    let near_miss = format!("{}р", round.painting_task);
    let err = variants_service::apply_variant(&db, room.game.id, guesser.id, &near_miss)
        .await
        .expect_err("near miss must be rejected");
    assert_validation(err, ValidationKind::Duplicate);

    // A genuinely different guess is accepted.
    variants_service::apply_variant(&db, room.game.id, guesser.id, "жёлтая субмарина")
        .await
        .unwrap();
}

#[tokio::test]
async fn resubmission_is_a_no_op_and_never_creates_a_second_variant() {
    let db = support::setup_db().await;
    let room = room_in_writing(&db, 2).await;
    let round = rounds_repo::require_current(&db, room.game.id).await.unwrap();
    let guesser = room
        .players
        .iter()
        .find(|p| p.id != round.painter_id)
        .unwrap();

    variants_service::apply_variant(&db, room.game.id, guesser.id, "громкий соловей")
        .await
        .unwrap();
    variants_service::apply_variant(&db, room.game.id, guesser.id, "громкий соловей")
        .await
        .unwrap();
    // Even a different text is ignored once the author has a variant.
    variants_service::apply_variant(&db, room.game.id, guesser.id, "тихая сова")
        .await
        .unwrap();

    let authored: Vec<_> = variants_repo::find_by_round(&db, round.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|v| v.author_id == Some(guesser.id))
        .collect();
    assert_eq!(authored.len(), 1);
    assert_eq!(authored[0].text, "громкий соловей");
}

#[tokio::test]
async fn mixed_alphabets_are_rejected() {
    let db = support::setup_db().await;
    let room = room_in_writing(&db, 2).await;
    let round = rounds_repo::require_current(&db, room.game.id).await.unwrap();
    let guesser = room
        .players
        .iter()
        .find(|p| p.id != round.painter_id)
        .unwrap();

    let err = variants_service::apply_variant(&db, room.game.id, guesser.id, "privet123мир")
        .await
        .expect_err("mixed scripts must be rejected");
    assert_validation(err, ValidationKind::InvalidAlphabet);

    variants_service::apply_variant(&db, room.game.id, guesser.id, "привет")
        .await
        .unwrap();
}

#[tokio::test]
async fn double_selection_is_rejected_as_duplicate() {
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
    assert_eq!(
        rounds_repo::require_current(&db, game_id).await.unwrap().stage,
        RoundStage::Selecting
    );

    variants_service::select_variant(&db, game_id, guesser.id, &round.painting_task)
        .await
        .unwrap();
    let err = variants_service::select_variant(&db, game_id, guesser.id, &round.painting_task)
        .await
        .expect_err("second selection must be rejected");
    assert_validation(err, ValidationKind::Duplicate);
}

#[tokio::test]
async fn likes_skip_own_variants_and_repeats() {
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
    let variants = variants_repo::find_by_round(&db, round.id).await.unwrap();
    let own = variants
        .iter()
        .find(|v| v.author_id == Some(guesser.id))
        .unwrap();
    let painters = variants
        .iter()
        .find(|v| v.author_id == Some(round.painter_id))
        .unwrap();

    let ids = vec![own.id, painters.id];
    variants_service::apply_likes(&db, game_id, guesser.id, ids.clone())
        .await
        .unwrap();
    variants_service::apply_likes(&db, game_id, guesser.id, ids)
        .await
        .unwrap();

    assert!(!variants_repo::has_like(&db, own.id, guesser.id).await.unwrap());
    assert!(variants_repo::has_like(&db, painters.id, guesser.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn repeated_avatar_upload_is_rejected_as_duplicate() {
    let db = support::setup_db().await;
    support::seed_tasks(&db, "ru", PROMPTS).await;
    let state = support::setup_state(db.clone()).await;
    let room = support::setup_room(&db, 2, 1).await;
    let player = &room.players[0];

    players_service::upload_avatar(
        &db,
        state.media.as_ref(),
        room.game.id,
        player.id,
        support::PNG_MEDIA,
    )
    .await
    .unwrap();
    let err = players_service::upload_avatar(
        &db,
        state.media.as_ref(),
        room.game.id,
        player.id,
        support::PNG_MEDIA,
    )
    .await
    .expect_err("second avatar upload must be rejected");
    assert_validation(err, ValidationKind::Duplicate);
}

#[tokio::test]
async fn repeated_painting_upload_is_rejected_as_duplicate() {
    let db = support::setup_db().await;
    support::seed_tasks(&db, "ru", PROMPTS).await;
    let state = support::setup_state(db.clone()).await;
    let room = support::setup_room(&db, 2, 1).await;
    games_service::start_game(&db, &state.tasks, room.game.id)
        .await
        .unwrap();
    let painter = &room.players[0];

    rounds_service::upload_painting(
        &db,
        state.media.as_ref(),
        room.game.id,
        painter.id,
        support::PNG_MEDIA,
    )
    .await
    .unwrap();
    let err = rounds_service::upload_painting(
        &db,
        state.media.as_ref(),
        room.game.id,
        painter.id,
        support::PNG_MEDIA,
    )
    .await
    .expect_err("second painting upload must be rejected");
    assert_validation(err, ValidationKind::Duplicate);
}
