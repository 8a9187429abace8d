//! SeaORM adapter for variants, selections and likes - generic over
//! ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{variant_likes, variant_selections, variants};

pub mod dto;

pub use dto::VariantCreate;

pub async fn create_variant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: VariantCreate,
) -> Result<variants::Model, sea_orm::DbErr> {
    let variant_active = variants::ActiveModel {
        id: NotSet,
        round_id: Set(dto.round_id),
        text: Set(dto.text),
        author_id: Set(dto.author_id),
        task_id: Set(dto.task_id),
    };

    variant_active.insert(conn).await
}

/// Variants in insertion order; the seed variant (the prompt) comes first.
pub async fn find_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<variants::Model>, sea_orm::DbErr> {
    variants::Entity::find()
        .filter(variants::Column::RoundId.eq(round_id))
        .order_by_asc(variants::Column::Id)
        .all(conn)
        .await
}

pub async fn count_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    variants::Entity::find()
        .filter(variants::Column::RoundId.eq(round_id))
        .count(conn)
        .await
}

pub async fn find_by_author<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    author_id: i64,
) -> Result<Option<variants::Model>, sea_orm::DbErr> {
    variants::Entity::find()
        .filter(variants::Column::RoundId.eq(round_id))
        .filter(variants::Column::AuthorId.eq(author_id))
        .one(conn)
        .await
}

pub async fn find_by_text<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    text: &str,
) -> Result<Option<variants::Model>, sea_orm::DbErr> {
    variants::Entity::find()
        .filter(variants::Column::RoundId.eq(round_id))
        .filter(variants::Column::Text.eq(text))
        .one(conn)
        .await
}

pub async fn insert_selection<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    variant_id: i64,
    player_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let selection_active = variant_selections::ActiveModel {
        id: NotSet,
        variant_id: Set(variant_id),
        player_id: Set(player_id),
    };
    selection_active.insert(conn).await?;
    Ok(())
}

/// All (variant_id, player_id) selections within a round.
pub async fn selections_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<(i64, i64)>, sea_orm::DbErr> {
    let rows = variant_selections::Entity::find()
        .inner_join(variants::Entity)
        .filter(variants::Column::RoundId.eq(round_id))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|s| (s.variant_id, s.player_id)).collect())
}

pub async fn count_selections_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    variant_selections::Entity::find()
        .inner_join(variants::Entity)
        .filter(variants::Column::RoundId.eq(round_id))
        .count(conn)
        .await
}

pub async fn player_has_selection<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    player_id: i64,
) -> Result<bool, sea_orm::DbErr> {
    let count = variant_selections::Entity::find()
        .inner_join(variants::Entity)
        .filter(variants::Column::RoundId.eq(round_id))
        .filter(variant_selections::Column::PlayerId.eq(player_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub async fn insert_like<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    variant_id: i64,
    player_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let like_active = variant_likes::ActiveModel {
        id: NotSet,
        variant_id: Set(variant_id),
        player_id: Set(player_id),
    };
    like_active.insert(conn).await?;
    Ok(())
}

pub async fn has_like<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    variant_id: i64,
    player_id: i64,
) -> Result<bool, sea_orm::DbErr> {
    let count = variant_likes::Entity::find()
        .filter(variant_likes::Column::VariantId.eq(variant_id))
        .filter(variant_likes::Column::PlayerId.eq(player_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<Vec<variants::Model>, sea_orm::DbErr> {
    variants::Entity::find()
        .filter(variants::Column::Id.is_in(ids))
        .all(conn)
        .await
}
