//! Domain-level error type used across services and adapters.
//!
//! This error type is HTTP- and DB-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// User-correctable validation failures with stable wire codes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Duplicate submission: a too-similar guess, a repeated selection, or a
    /// second avatar/painting upload.
    Duplicate,
    /// Submission mixes letters from different alphabets within one word.
    InvalidAlphabet,
    /// Room cannot be started (fewer than two players).
    StartGame,
    Other(String),
}

impl ValidationKind {
    pub fn code(&self) -> &str {
        match self {
            ValidationKind::Duplicate => "duplicate",
            ValidationKind::InvalidAlphabet => "invalid_alphabet",
            ValidationKind::StartGame => "start_game",
            ValidationKind::Other(code) => code,
        }
    }
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    DbUnavailable,
    Media,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Player,
    Round,
    Variant,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Room/round stage combination does not permit the operation
    State(String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {}: {d}", kind.code()),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::State(d) => write!(f, "invalid state: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn state(detail: impl Into<String>) -> Self {
        Self::State(detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}

// Adapter functions return DbErr; the repos layer maps it here.
impl From<sea_orm::DbErr> for DomainError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::RecordNotFound(detail) => {
                DomainError::NotFound(NotFoundKind::Other(detail.clone()), detail)
            }
            other => DomainError::Infra(InfraErrorKind::DbUnavailable, other.to_string()),
        }
    }
}
