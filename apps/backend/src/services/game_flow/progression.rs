//! Applies one stage-machine step to persisted room state.
//!
//! `advance` is invoked only by the room coordinator, never by participant
//! actions, so stage transitions have a single writer.

use sea_orm::ConnectionTrait;
use tracing::debug;

use crate::domain::stage::{next_transition, RoomProgress, StageAdvance};
use crate::entities::games::GameStage;
use crate::entities::rounds::RoundStage;
use crate::errors::domain::DomainError;
use crate::repos::{games as games_repo, players as players_repo, rounds as rounds_repo};

/// Advances the room by exactly one stage-machine step and returns the new
/// room stage. Not safe to call concurrently for the same room.
pub async fn advance<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<GameStage, DomainError> {
    let game = games_repo::require_game(conn, game_id).await?;
    let current = rounds_repo::find_current(conn, game_id).await?;
    let progress = RoomProgress {
        players: players_repo::find_by_game(conn, game_id, false).await?.len(),
        cycles: game.cycles.max(0) as u32,
        finished_rounds: rounds_repo::count_finished(conn, game_id).await? as usize,
    };

    let decision = next_transition(game.stage, current.as_ref().map(|r| r.stage), progress)?;
    debug!(game_id, stage = ?game.stage, ?decision, "advancing room stage");

    let new_stage = match decision {
        StageAdvance::BeginPreround => {
            games_repo::update_stage(conn, game_id, GameStage::Preround).await?;
            GameStage::Preround
        }
        StageAdvance::BeginRound => {
            games_repo::update_stage(conn, game_id, GameStage::Round).await?;
            arm_next_round(conn, game_id).await?;
            GameStage::Round
        }
        StageAdvance::BeginSelecting => {
            let round = require_current(current)?;
            rounds_repo::set_stage(conn, round.id, RoundStage::Selecting).await?;
            GameStage::Round
        }
        StageAdvance::BeginAnswers => {
            let round = require_current(current)?;
            rounds_repo::set_stage(conn, round.id, RoundStage::Answers).await?;
            GameStage::Round
        }
        StageAdvance::ShowResults => {
            let round = require_current(current)?;
            rounds_repo::set_stage(conn, round.id, RoundStage::Results).await?;
            GameStage::Round
        }
        StageAdvance::FinishGame => {
            let round = require_current(current)?;
            rounds_repo::set_stage(conn, round.id, RoundStage::Finished).await?;
            games_repo::update_stage(conn, game_id, GameStage::Finished).await?;
            GameStage::Finished
        }
        StageAdvance::NextRound => {
            let round = require_current(current)?;
            rounds_repo::set_stage(conn, round.id, RoundStage::Finished).await?;
            arm_next_round(conn, game_id).await?;
            GameStage::Round
        }
        StageAdvance::NextCycle => {
            let round = require_current(current)?;
            rounds_repo::set_stage(conn, round.id, RoundStage::Finished).await?;
            games_repo::update_stage(conn, game_id, GameStage::Preround).await?;
            GameStage::Preround
        }
    };
    Ok(new_stage)
}

fn require_current(
    current: Option<crate::entities::rounds::Model>,
) -> Result<crate::entities::rounds::Model, DomainError> {
    current.ok_or_else(|| DomainError::state("room has no current round to advance"))
}

async fn arm_next_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    let next = rounds_repo::first_not_started(conn, game_id)
        .await?
        .ok_or_else(|| DomainError::state("no not-started round left to arm"))?;
    rounds_repo::set_stage(conn, next.id, RoundStage::Writing).await
}
