//! SeaORM adapter for the rounds table - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::rounds::{self, RoundStage};

pub mod dto;

pub use dto::RoundCreate;

pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoundCreate,
) -> Result<rounds::Model, sea_orm::DbErr> {
    let round_active = rounds::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        order_number: Set(dto.order_number),
        painter_id: Set(dto.painter_id),
        painting_task: Set(dto.painting_task),
        painting: NotSet,
        stage: Set(RoundStage::NotStarted),
    };

    round_active.insert(conn).await
}

/// The room's current round: the unique round in a non-terminal stage.
pub async fn find_current<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<rounds::Model>, sea_orm::DbErr> {
    rounds::Entity::find()
        .filter(rounds::Column::GameId.eq(game_id))
        .filter(rounds::Column::Stage.ne(RoundStage::NotStarted))
        .filter(rounds::Column::Stage.ne(RoundStage::Finished))
        .one(conn)
        .await
}

pub async fn first_not_started<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<rounds::Model>, sea_orm::DbErr> {
    rounds::Entity::find()
        .filter(rounds::Column::GameId.eq(game_id))
        .filter(rounds::Column::Stage.eq(RoundStage::NotStarted))
        .order_by_asc(rounds::Column::OrderNumber)
        .one(conn)
        .await
}

/// The round a painter is currently expected to draw for.
pub async fn first_not_started_by_painter<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    painter_id: i64,
) -> Result<Option<rounds::Model>, sea_orm::DbErr> {
    rounds::Entity::find()
        .filter(rounds::Column::GameId.eq(game_id))
        .filter(rounds::Column::PainterId.eq(painter_id))
        .filter(rounds::Column::Stage.eq(RoundStage::NotStarted))
        .order_by_asc(rounds::Column::OrderNumber)
        .one(conn)
        .await
}

pub async fn set_stage<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    stage: RoundStage,
) -> Result<(), sea_orm::DbErr> {
    rounds::Entity::update_many()
        .col_expr(rounds::Column::Stage, Expr::value(stage))
        .filter(rounds::Column::Id.eq(round_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Conditional write: only the first upload wins. Returns false when a
/// painting was already present.
pub async fn set_painting_if_missing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    painting: &str,
) -> Result<bool, sea_orm::DbErr> {
    let result = rounds::Entity::update_many()
        .col_expr(rounds::Column::Painting, Expr::value(Some(painting)))
        .filter(rounds::Column::Id.eq(round_id))
        .filter(rounds::Column::Painting.is_null())
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn count_by_stage<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    stage: RoundStage,
) -> Result<u64, sea_orm::DbErr> {
    rounds::Entity::find()
        .filter(rounds::Column::GameId.eq(game_id))
        .filter(rounds::Column::Stage.eq(stage))
        .count(conn)
        .await
}

/// Paintings already uploaded for the upcoming cycle.
pub async fn count_not_started_with_painting<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    rounds::Entity::find()
        .filter(rounds::Column::GameId.eq(game_id))
        .filter(rounds::Column::Stage.eq(RoundStage::NotStarted))
        .filter(rounds::Column::Painting.is_not_null())
        .count(conn)
        .await
}

pub async fn find_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<rounds::Model>, sea_orm::DbErr> {
    rounds::Entity::find()
        .filter(rounds::Column::GameId.eq(game_id))
        .order_by_asc(rounds::Column::OrderNumber)
        .all(conn)
        .await
}
