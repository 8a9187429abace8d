//! Game repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::games_sea as games_adapter;
use crate::entities::games::{self, GameStage};
use crate::errors::domain::{DomainError, NotFoundKind};

pub use games_adapter::GameCreate;

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, DomainError> {
    Ok(games_adapter::create_game(conn, dto).await?)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, DomainError> {
    Ok(games_adapter::find_by_id(conn, game_id).await?)
}

/// Find game by ID or return a domain not-found error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<games::Model, DomainError> {
    games_adapter::find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, format!("game {game_id}")))
}

pub async fn find_active_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<games::Model>, DomainError> {
    Ok(games_adapter::find_active_by_code(conn, code).await?)
}

pub async fn update_stage<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    stage: GameStage,
) -> Result<(), DomainError> {
    Ok(games_adapter::update_stage(conn, game_id, stage).await?)
}

pub async fn set_paused<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    paused: bool,
) -> Result<(), DomainError> {
    Ok(games_adapter::set_paused(conn, game_id, paused).await?)
}
