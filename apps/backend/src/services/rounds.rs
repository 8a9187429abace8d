//! Round lifecycle: creation, completion predicates, decoys, paintings.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::domain::rules::MIN_PLAYERS;
use crate::entities::games::{self, GameStage};
use crate::entities::rounds::{self, RoundStage};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::infra::media::{decode_data_url, MediaStore};
use crate::repos::{
    games as games_repo, players as players_repo, rounds as rounds_repo, tasks as tasks_repo,
    variants as variants_repo,
};
use crate::services::tasks::{Restriction, TaskRegistry};

/// Creates one round per (player, cycle) pair, painters assigned cyclically,
/// each seeded with the prompt as a variant authored by its painter.
pub async fn create_rounds<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    registry: &TaskRegistry,
    game: &games::Model,
) -> Result<(), DomainError> {
    let players = players_repo::find_by_game(conn, game.id, false).await?;
    if players.len() < MIN_PLAYERS {
        return Err(DomainError::validation(
            ValidationKind::StartGame,
            "at least two players are required to start the game",
        ));
    }

    let mut restriction = Restriction::default();
    let mut order_number = 0i32;
    for _cycle in 0..game.cycles {
        for player in &players {
            let task = registry
                .select_task(conn, &game.language, &mut restriction)
                .await?;
            let round = rounds_repo::create_round(
                conn,
                rounds_repo::RoundCreate {
                    game_id: game.id,
                    order_number,
                    painter_id: player.id,
                    painting_task: task.text.clone(),
                },
            )
            .await?;
            variants_repo::create_variant(
                conn,
                variants_repo::VariantCreate {
                    round_id: round.id,
                    text: task.text,
                    author_id: Some(player.id),
                    task_id: task.task_id,
                },
            )
            .await?;
            order_number += 1;
        }
    }
    info!(game_id = game.id, rounds = order_number, "rounds created");
    Ok(())
}

/// Stage-specific completion predicate polled by the coordinator's
/// countdown. Completion short-circuits the remaining time.
pub async fn stage_completed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game: &games::Model,
    round: Option<&rounds::Model>,
) -> Result<bool, DomainError> {
    let players_cnt = players_repo::find_by_game(conn, game.id, false).await?.len() as u64;
    match game.stage {
        GameStage::Preround => {
            // Every painter of the upcoming cycle has uploaded a painting.
            Ok(rounds_repo::count_not_started_with_painting(conn, game.id).await? == players_cnt)
        }
        GameStage::Round => {
            let Some(round) = round else {
                return Ok(false);
            };
            match round.stage {
                RoundStage::Writing => {
                    // Seed variant plus one guess per non-painter.
                    Ok(variants_repo::count_by_round(conn, round.id).await? == players_cnt)
                }
                RoundStage::Selecting => Ok(variants_repo::count_selections_by_round(conn, round.id)
                    .await?
                    == players_cnt.saturating_sub(1)),
                _ => Ok(false),
            }
        }
        _ => Ok(false),
    }
}

/// Pads the round's variant pool with authorless decoys, up to one variant
/// per participant.
pub async fn populate_missing_variants<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game: &games::Model,
    round: &rounds::Model,
) -> Result<(), DomainError> {
    let players_cnt = players_repo::find_by_game(conn, game.id, false).await?.len() as u64;
    let existing = variants_repo::count_by_round(conn, round.id).await?;
    let missing = players_cnt.saturating_sub(existing);
    if missing == 0 {
        return Ok(());
    }
    info!(
        game_id = game.id,
        round_id = round.id,
        missing,
        "generating decoy answers"
    );
    for answer in tasks_repo::random_auto_answers(conn, &game.language, missing).await? {
        variants_repo::create_variant(
            conn,
            variants_repo::VariantCreate {
                round_id: round.id,
                text: answer.text.trim().to_lowercase(),
                author_id: None,
                task_id: None,
            },
        )
        .await?;
    }
    Ok(())
}

/// The prompt a painter is expected to draw during the current cycle.
pub async fn drawing_task<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    painter_id: i64,
) -> Result<Option<String>, DomainError> {
    Ok(
        rounds_repo::first_not_started_by_painter(conn, game_id, painter_id)
            .await?
            .map(|round| round.painting_task),
    )
}

/// Stores a painting for the painter's upcoming round. Only the first
/// upload wins; repeats are rejected with a `duplicate` validation error.
pub async fn upload_painting<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    store: &dyn MediaStore,
    game_id: i64,
    player_id: i64,
    media: &str,
) -> Result<(), DomainError> {
    let game = games_repo::require_game(conn, game_id).await?;
    let player = players_repo::require_member(conn, game_id, player_id).await?;
    let nickname = player.nickname.clone().unwrap_or_default();

    let round = rounds_repo::first_not_started_by_painter(conn, game_id, player.id)
        .await?
        .ok_or_else(|| DomainError::state("player has no upcoming round to paint for"))?;

    if round.painting.is_some() {
        return Err(DomainError::validation(
            ValidationKind::Duplicate,
            format!(
                "{nickname} has already uploaded a painting for round {}",
                round.order_number
            ),
        ));
    }

    let bytes = decode_data_url(media)?;
    let key = format!(
        "{:03}/{}_{}/{}_{}_{}.png",
        game_id / 100,
        game_id,
        game.code,
        round.order_number,
        player.id,
        nickname
    );
    let url = store.put(&key, &bytes).await?;

    let fresh = rounds_repo::set_painting_if_missing(conn, round.id, &url).await?;
    if !fresh {
        return Err(DomainError::validation(
            ValidationKind::Duplicate,
            format!(
                "{nickname} has already uploaded a painting for round {}",
                round.order_number
            ),
        ));
    }
    info!(
        game_id,
        player_id,
        round_id = round.id,
        "painting uploaded"
    );
    Ok(())
}

/// Whether the painter already uploaded the painting for their upcoming
/// round (preround finished flag).
pub async fn finished_painting<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    painter_id: i64,
) -> Result<bool, DomainError> {
    Ok(
        rounds_repo::first_not_started_by_painter(conn, game_id, painter_id)
            .await?
            .map(|round| round.painting.is_some())
            .unwrap_or(false),
    )
}
