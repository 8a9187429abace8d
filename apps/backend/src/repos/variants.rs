//! Variant repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::variants_sea as variants_adapter;
use crate::entities::variants;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use variants_adapter::VariantCreate;

pub async fn create_variant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: VariantCreate,
) -> Result<variants::Model, DomainError> {
    Ok(variants_adapter::create_variant(conn, dto).await?)
}

pub async fn find_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<variants::Model>, DomainError> {
    Ok(variants_adapter::find_by_round(conn, round_id).await?)
}

pub async fn count_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<u64, DomainError> {
    Ok(variants_adapter::count_by_round(conn, round_id).await?)
}

pub async fn find_by_author<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    author_id: i64,
) -> Result<Option<variants::Model>, DomainError> {
    Ok(variants_adapter::find_by_author(conn, round_id, author_id).await?)
}

pub async fn require_by_text<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    text: &str,
) -> Result<variants::Model, DomainError> {
    variants_adapter::find_by_text(conn, round_id, text)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Variant,
                format!("round {round_id} has no variant {text:?}"),
            )
        })
}

pub async fn insert_selection<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    variant_id: i64,
    player_id: i64,
) -> Result<(), DomainError> {
    Ok(variants_adapter::insert_selection(conn, variant_id, player_id).await?)
}

pub async fn selections_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<(i64, i64)>, DomainError> {
    Ok(variants_adapter::selections_by_round(conn, round_id).await?)
}

pub async fn count_selections_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<u64, DomainError> {
    Ok(variants_adapter::count_selections_by_round(conn, round_id).await?)
}

pub async fn player_has_selection<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    player_id: i64,
) -> Result<bool, DomainError> {
    Ok(variants_adapter::player_has_selection(conn, round_id, player_id).await?)
}

pub async fn insert_like<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    variant_id: i64,
    player_id: i64,
) -> Result<(), DomainError> {
    Ok(variants_adapter::insert_like(conn, variant_id, player_id).await?)
}

pub async fn has_like<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    variant_id: i64,
    player_id: i64,
) -> Result<bool, DomainError> {
    Ok(variants_adapter::has_like(conn, variant_id, player_id).await?)
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<Vec<variants::Model>, DomainError> {
    Ok(variants_adapter::find_by_ids(conn, ids).await?)
}
