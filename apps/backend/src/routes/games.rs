//! Room management endpoints: create and join. Authentication and page
//! rendering are external concerns; callers carry their `player_id`.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::services::games as games_service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub nickname: String,
    pub language: String,
    #[serde(default = "default_cycles")]
    pub cycles: i32,
}

fn default_cycles() -> i32 {
    2
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub game_id: i64,
    pub player_id: i64,
    pub code: String,
}

pub async fn create_game(
    state: web::Data<AppState>,
    body: web::Json<CreateGameRequest>,
) -> Result<HttpResponse, AppError> {
    if !state.tasks.supports(&body.language) {
        return Err(AppError::bad_request(
            "UNSUPPORTED_LANGUAGE",
            format!("no task providers for language '{}'", body.language),
        ));
    }

    let body = body.into_inner();
    let (game, host) = with_txn(&state, |txn| {
        Box::pin(async move {
            games_service::create_game(txn, &body.nickname, &body.language, body.cycles, None)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(GameResponse {
        game_id: game.id,
        player_id: host.id,
        code: game.code,
    }))
}

#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    pub code: String,
    pub nickname: String,
}

pub async fn join_game(
    state: web::Data<AppState>,
    body: web::Json<JoinGameRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let (game, player) = with_txn(&state, |txn| {
        Box::pin(async move {
            games_service::join_game(txn, &body.code, &body.nickname)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(GameResponse {
        game_id: game.id,
        player_id: player.id,
        code: game.code,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_game))
        .route("/join", web::post().to(join_game));
}
