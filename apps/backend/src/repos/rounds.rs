//! Round repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::rounds_sea as rounds_adapter;
use crate::entities::rounds::{self, RoundStage};
use crate::errors::domain::{DomainError, NotFoundKind};

pub use rounds_adapter::RoundCreate;

pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoundCreate,
) -> Result<rounds::Model, DomainError> {
    Ok(rounds_adapter::create_round(conn, dto).await?)
}

pub async fn find_current<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<rounds::Model>, DomainError> {
    Ok(rounds_adapter::find_current(conn, game_id).await?)
}

/// The current round, which must exist while the room is in `round` stage.
pub async fn require_current<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<rounds::Model, DomainError> {
    rounds_adapter::find_current(conn, game_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Round, format!("game {game_id} has no current round"))
        })
}

pub async fn first_not_started<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<rounds::Model>, DomainError> {
    Ok(rounds_adapter::first_not_started(conn, game_id).await?)
}

pub async fn first_not_started_by_painter<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    painter_id: i64,
) -> Result<Option<rounds::Model>, DomainError> {
    Ok(rounds_adapter::first_not_started_by_painter(conn, game_id, painter_id).await?)
}

pub async fn set_stage<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    stage: RoundStage,
) -> Result<(), DomainError> {
    Ok(rounds_adapter::set_stage(conn, round_id, stage).await?)
}

pub async fn set_painting_if_missing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    painting: &str,
) -> Result<bool, DomainError> {
    Ok(rounds_adapter::set_painting_if_missing(conn, round_id, painting).await?)
}

pub async fn count_finished<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DomainError> {
    Ok(rounds_adapter::count_by_stage(conn, game_id, RoundStage::Finished).await?)
}

pub async fn count_not_started_with_painting<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DomainError> {
    Ok(rounds_adapter::count_not_started_with_painting(conn, game_id).await?)
}

pub async fn find_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<rounds::Model>, DomainError> {
    Ok(rounds_adapter::find_by_game(conn, game_id).await?)
}
