//! Submission endpoint dispatch: one entry point for paintings, guesses,
//! selections and likes.

use sea_orm::ConnectionTrait;
use serde::Deserialize;

use crate::entities::games::GameStage;
use crate::errors::domain::DomainError;
use crate::infra::media::MediaStore;
use crate::repos::games as games_repo;
use crate::services::players as players_service;
use crate::services::rounds as rounds_service;
use crate::services::variants as variants_service;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    /// Image upload: an avatar during pregame, a painting during preround.
    Painting,
    /// Free-text guess for the current round.
    Variant,
    /// Selection of a displayed variant.
    Answer,
    /// Likes for revealed variants (JSON array of variant ids).
    Likes,
}

pub async fn submit<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    store: &dyn MediaStore,
    game_id: i64,
    player_id: i64,
    media_type: MediaType,
    media: &str,
) -> Result<(), DomainError> {
    match media_type {
        MediaType::Painting => {
            let game = games_repo::require_game(conn, game_id).await?;
            match game.stage {
                GameStage::Pregame => {
                    players_service::upload_avatar(conn, store, game_id, player_id, media).await
                }
                GameStage::Preround => {
                    rounds_service::upload_painting(conn, store, game_id, player_id, media).await
                }
                _ => Err(DomainError::state(
                    "paintings are not accepted at this stage",
                )),
            }
        }
        MediaType::Variant => {
            variants_service::apply_variant(conn, game_id, player_id, media).await
        }
        MediaType::Answer => {
            variants_service::select_variant(conn, game_id, player_id, media).await
        }
        MediaType::Likes => {
            let ids: Vec<i64> = serde_json::from_str(media).map_err(|err| {
                DomainError::state(format!("likes payload must be a JSON id array: {err}"))
            })?;
            variants_service::apply_likes(conn, game_id, player_id, ids).await
        }
    }
}
