use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: String, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: &'static str, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: &'static str, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: &'static str, detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
}

impl AppError {
    /// Helper method to extract error code from any error variant
    pub fn code(&self) -> String {
        match self {
            AppError::Validation { code, .. } => code.clone(),
            AppError::NotFound { code, .. } => code.to_string(),
            AppError::BadRequest { code, .. } => code.to_string(),
            AppError::Conflict { code, .. } => code.to_string(),
            AppError::Internal { .. } => "INTERNAL".to_string(),
            AppError::Config { .. } => "CONFIG_ERROR".to_string(),
            AppError::Db { .. } => "DB_ERROR".to_string(),
        }
    }

    pub fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Internal { detail }
            | AppError::Config { detail }
            | AppError::Db { detail } => detail.clone(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(code: impl Into<String>, detail: String) -> Self {
        Self::Validation {
            code: code.into(),
            detail,
        }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }

    pub fn bad_request(code: &'static str, detail: String) -> Self {
        Self::BadRequest { code, detail }
    }

    pub fn not_found(code: &'static str, detail: String) -> Self {
        Self::NotFound { code, detail }
    }

    pub fn conflict(code: &'static str, detail: String) -> Self {
        Self::Conflict { code, detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn db(detail: String) -> Self {
        Self::Db { detail }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::internal(format!("env var error: {e}"))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::db(format!("db error: {e}"))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => AppError::Validation {
                code: kind.code().to_string(),
                detail,
            },
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::Game => "GAME_NOT_FOUND",
                    NotFoundKind::Player => "PLAYER_NOT_FOUND",
                    NotFoundKind::Round => "ROUND_NOT_FOUND",
                    NotFoundKind::Variant => "VARIANT_NOT_FOUND",
                    NotFoundKind::Other(_) => "NOT_FOUND",
                };
                AppError::not_found(code, detail)
            }
            DomainError::State(detail) => AppError::conflict("INVALID_STATE", detail),
            DomainError::Infra(kind, detail) => AppError::db(format!("{kind:?}: {detail}")),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let detail = self.detail();

        let problem_details = ProblemDetails {
            type_: format!("https://paintparty.dev/errors/{}", code.to_uppercase()),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail,
            code,
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .json(problem_details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::domain::ValidationKind;

    #[test]
    fn validation_errors_keep_their_wire_code() {
        let err: AppError =
            DomainError::validation(ValidationKind::Duplicate, "too similar").into();
        assert_eq!(err.code(), "duplicate");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn state_errors_map_to_conflict() {
        let err: AppError = DomainError::state("round already advanced").into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "INVALID_STATE");
    }

    #[test]
    fn humanize_code_title_cases_words() {
        assert_eq!(AppError::humanize_code("start_game"), "Start Game");
    }
}
