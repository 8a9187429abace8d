//! Submission endpoint: paintings, guesses, selections and likes all arrive
//! here, outside the persistent connection.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::services::media::{self as media_service, MediaType};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct MediaUploadRequest {
    pub media_type: MediaType,
    pub game_id: i64,
    pub player_id: i64,
    pub media: String,
}

#[derive(Debug, Serialize)]
pub struct MediaUploadResponse {
    pub status: String,
    pub message: String,
}

/// `{status, message}` with `status = "success"` or the validator error
/// code (`duplicate`, `invalid_alphabet`) and HTTP 400 on rejection.
pub async fn upload(
    state: web::Data<AppState>,
    body: web::Json<MediaUploadRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let game_id = body.game_id;
    let media_store = state.media.clone();

    let outcome = with_txn(&state, |txn| {
        let media_store = media_store.clone();
        Box::pin(async move {
            media_service::submit(
                txn,
                media_store.as_ref(),
                body.game_id,
                body.player_id,
                body.media_type,
                &body.media,
            )
            .await
            .map_err(AppError::from)
        })
    })
    .await;

    match outcome {
        Ok(()) => {
            // Let the room's projector push fresh views right away.
            state.registry.notify(game_id);
            Ok(HttpResponse::Ok().json(MediaUploadResponse {
                status: "success".to_string(),
                message: "ok".to_string(),
            }))
        }
        Err(err) if err.status() == actix_web::http::StatusCode::BAD_REQUEST => {
            Ok(HttpResponse::BadRequest().json(MediaUploadResponse {
                status: err.code(),
                message: err.detail(),
            }))
        }
        Err(err) => Err(err),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(upload));
}
