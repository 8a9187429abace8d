//! Player repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::players_sea as players_adapter;
use crate::entities::players;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use players_adapter::PlayerCreate;

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<players::Model, DomainError> {
    Ok(players_adapter::create_player(conn, dto).await?)
}

pub async fn require_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<players::Model, DomainError> {
    players_adapter::find_by_id(conn, player_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("player {player_id}")))
}

/// Player as a member of a specific room.
pub async fn require_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
) -> Result<players::Model, DomainError> {
    let player = require_player(conn, player_id).await?;
    if player.game_id != game_id {
        return Err(DomainError::not_found(
            NotFoundKind::Player,
            format!("player {player_id} is not in game {game_id}"),
        ));
    }
    Ok(player)
}

pub async fn find_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    include_host: bool,
) -> Result<Vec<players::Model>, DomainError> {
    Ok(players_adapter::find_by_game(conn, game_id, include_host).await?)
}

pub async fn find_host<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<players::Model>, DomainError> {
    Ok(players_adapter::find_host(conn, game_id).await?)
}

pub async fn set_channel<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    channel_name: Option<String>,
) -> Result<(), DomainError> {
    Ok(players_adapter::set_channel(conn, player_id, channel_name).await?)
}

pub async fn update_nickname<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    nickname: &str,
) -> Result<(), DomainError> {
    Ok(players_adapter::update_nickname(conn, player_id, nickname).await?)
}

pub async fn set_avatar_if_missing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    avatar: &str,
) -> Result<bool, DomainError> {
    Ok(players_adapter::set_avatar_if_missing(conn, player_id, avatar).await?)
}

pub async fn used_colors<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<String>, DomainError> {
    Ok(players_adapter::used_colors(conn, game_id).await?)
}
