//! Result repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::results_sea as results_adapter;
use crate::entities::results;
use crate::errors::domain::DomainError;

pub async fn create_result<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
) -> Result<results::Model, DomainError> {
    Ok(results_adapter::create_result(conn, game_id, player_id).await?)
}

pub async fn find_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<results::Model>, DomainError> {
    Ok(results_adapter::find_by_game(conn, game_id).await?)
}

pub async fn lock_for_scoring<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    Ok(results_adapter::lock_for_scoring(conn, game_id).await?)
}

pub async fn reset_round_increments<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    Ok(results_adapter::reset_round_increments(conn, game_id).await?)
}

pub async fn add_points<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_ids: &[i64],
    points: i32,
) -> Result<(), DomainError> {
    Ok(results_adapter::add_points(conn, game_id, player_ids, points).await?)
}
