//! SeaORM adapter for the games table - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::games::{self, GameStage};

pub mod dto;

pub use dto::GameCreate;

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let game_active = games::ActiveModel {
        id: NotSet,
        code: Set(dto.code),
        language: Set(dto.language),
        cycles: Set(dto.cycles),
        stage: Set(GameStage::Pregame),
        is_paused: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };

    game_active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id).one(conn).await
}

/// Find game by ID or return RecordNotFound error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<games::Model, sea_orm::DbErr> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Game not found".to_string()))
}

/// Room codes are only reserved while a room is active.
pub async fn find_active_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(games::Column::Code.eq(code))
        .filter(games::Column::Stage.ne(GameStage::Finished))
        .one(conn)
        .await
}

pub async fn update_stage<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    stage: GameStage,
) -> Result<(), sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    games::Entity::update_many()
        .col_expr(games::Column::Stage, Expr::value(stage))
        .col_expr(games::Column::UpdatedAt, Expr::value(now))
        .filter(games::Column::Id.eq(game_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn set_paused<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    paused: bool,
) -> Result<(), sea_orm::DbErr> {
    games::Entity::update_many()
        .col_expr(games::Column::IsPaused, Expr::value(paused))
        .filter(games::Column::Id.eq(game_id))
        .exec(conn)
        .await?;
    Ok(())
}
