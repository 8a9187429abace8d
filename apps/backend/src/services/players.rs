//! Player lifecycle: joining, drawing colors, connection handles, avatars.

use std::collections::HashSet;

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::domain::colors;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::infra::media::{decode_data_url, MediaStore};
use crate::repos::{games as games_repo, players as players_repo};

use crate::entities::players;

/// Creates a player row. Non-host players get a drawing color unique within
/// the room; the host draws nothing and gets none.
pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    nickname: Option<String>,
    is_host: bool,
) -> Result<players::Model, DomainError> {
    let drawing_color = if is_host {
        None
    } else {
        let used: HashSet<String> = players_repo::used_colors(conn, game_id)
            .await?
            .into_iter()
            .collect();
        Some(colors::pick_color(&used, &mut rand::rng())?)
    };

    players_repo::create_player(
        conn,
        players_repo::PlayerCreate {
            game_id,
            is_host,
            nickname,
            drawing_color,
        },
    )
    .await
}

/// Registers the player's live websocket channel name.
pub async fn register_channel<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
    channel_name: &str,
) -> Result<(), DomainError> {
    let player = players_repo::require_member(conn, game_id, player_id).await?;
    players_repo::set_channel(conn, player.id, Some(channel_name.to_string())).await
}

pub async fn deregister_channel<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<(), DomainError> {
    players_repo::set_channel(conn, player_id, None).await
}

/// Stores the player's self-portrait. Only the first upload wins; repeats
/// are rejected with a `duplicate` validation error.
pub async fn upload_avatar<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    store: &dyn MediaStore,
    game_id: i64,
    player_id: i64,
    media: &str,
) -> Result<(), DomainError> {
    let game = games_repo::require_game(conn, game_id).await?;
    let player = players_repo::require_member(conn, game_id, player_id).await?;
    let nickname = player.nickname.clone().unwrap_or_default();

    if player.avatar.is_some() {
        return Err(DomainError::validation(
            ValidationKind::Duplicate,
            format!("{nickname} has already uploaded an avatar"),
        ));
    }

    let bytes = decode_data_url(media)?;
    let key = format!(
        "{:03}/{}_{}/avatar/{}_{}.png",
        game_id / 100,
        game_id,
        game.code,
        player.id,
        nickname
    );
    let url = store.put(&key, &bytes).await?;

    let fresh = players_repo::set_avatar_if_missing(conn, player.id, &url).await?;
    if !fresh {
        return Err(DomainError::validation(
            ValidationKind::Duplicate,
            format!("{nickname} has already uploaded an avatar"),
        ));
    }
    info!(game_id, player_id, "avatar uploaded");
    Ok(())
}
