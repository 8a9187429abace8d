//! Room lifecycle: creation, joining, start, pause, cancel, restart.

use rand::seq::IndexedRandom;
use sea_orm::ConnectionTrait;
use tracing::info;

use crate::domain::rules::{CODE_CHARS, GAME_CODE_LEN};
use crate::entities::games::{self, GameStage};
use crate::entities::players;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::{games as games_repo, players as players_repo};
use crate::services::game_flow::progression;
use crate::services::players as players_service;
use crate::services::rounds as rounds_service;
use crate::services::scoring as scoring_service;
use crate::services::tasks::TaskRegistry;

/// A player's role inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRole {
    Host,
    Player,
}

/// Generates a short code unused by any non-finished room.
pub async fn generate_game_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<String, DomainError> {
    loop {
        let code: String = {
            let mut rng = rand::rng();
            (0..GAME_CODE_LEN)
                .map(|_| *CODE_CHARS.choose(&mut rng).unwrap_or(&b'A') as char)
                .collect()
        };
        if games_repo::find_active_by_code(conn, &code).await?.is_none() {
            return Ok(code);
        }
    }
}

/// Creates a room and its host player.
pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    nickname: &str,
    language: &str,
    cycles: i32,
    code: Option<String>,
) -> Result<(games::Model, players::Model), DomainError> {
    let code = match code {
        // Reuse the requested code unless another active room holds it.
        Some(candidate) => {
            if games_repo::find_active_by_code(conn, &candidate).await?.is_none() {
                candidate
            } else {
                generate_game_code(conn).await?
            }
        }
        None => generate_game_code(conn).await?,
    };

    let game = games_repo::create_game(
        conn,
        games_repo::GameCreate {
            code,
            language: language.to_string(),
            cycles,
        },
    )
    .await?;
    let host =
        players_service::create_player(conn, game.id, Some(nickname.to_string()), true).await?;
    info!(game_id = game.id, code = %game.code, "game created");
    Ok((game, host))
}

/// Adds a player to a pregame room found by code.
pub async fn join_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
    nickname: &str,
) -> Result<(games::Model, players::Model), DomainError> {
    let game = games_repo::find_active_by_code(conn, &code.to_uppercase())
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, format!("no room with code {code}")))?;
    if game.stage != GameStage::Pregame {
        return Err(DomainError::state("game has already begun"));
    }
    let player =
        players_service::create_player(conn, game.id, Some(nickname.to_string()), false).await?;
    info!(game_id = game.id, player_id = player.id, "player joined");
    Ok((game, player))
}

/// Host start: creates rounds and zeroed results, then advances the room
/// into `preround`. Fails with a `start_game` validation error when fewer
/// than two players are present.
pub async fn start_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    registry: &TaskRegistry,
    game_id: i64,
) -> Result<(), DomainError> {
    let game = games_repo::require_game(conn, game_id).await?;
    if game.stage != GameStage::Pregame {
        return Err(DomainError::state("game has already begun"));
    }
    rounds_service::create_rounds(conn, registry, &game).await?;
    scoring_service::create_results(conn, game_id).await?;
    progression::advance(conn, game_id).await?;
    info!(game_id, "game started");
    Ok(())
}

pub async fn switch_pause_state<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    pause: bool,
) -> Result<(), DomainError> {
    games_repo::set_paused(conn, game_id, pause).await
}

/// Force-finishes the room. Used by `cancel` and by the coordinator when it
/// fails a room into an observable terminal state.
pub async fn finish_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    games_repo::update_stage(conn, game_id, GameStage::Finished).await
}

/// Clones the room configuration and roster into a fresh pregame room,
/// reusing the code when it is still free.
pub async fn restart_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<games::Model, DomainError> {
    let old_game = games_repo::require_game(conn, game_id).await?;
    let host = players_repo::find_host(conn, game_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "room has no host"))?;
    let regulars = players_repo::find_by_game(conn, game_id, false).await?;

    finish_game(conn, game_id).await?;

    let host_nickname = host.nickname.unwrap_or_default();
    let (new_game, _) = create_game(
        conn,
        &host_nickname,
        &old_game.language,
        old_game.cycles,
        Some(old_game.code.clone()),
    )
    .await?;
    for player in regulars {
        players_service::create_player(conn, new_game.id, player.nickname, false).await?;
    }
    info!(old_game_id = game_id, new_game_id = new_game.id, "game restarted");
    Ok(new_game)
}

pub async fn get_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
) -> Result<Option<GameRole>, DomainError> {
    let players = players_repo::find_by_game(conn, game_id, true).await?;
    Ok(players.into_iter().find(|p| p.id == player_id).map(|p| {
        if p.is_host {
            GameRole::Host
        } else {
            GameRole::Player
        }
    }))
}

pub async fn is_game_paused<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<bool, DomainError> {
    Ok(games_repo::require_game(conn, game_id).await?.is_paused)
}
