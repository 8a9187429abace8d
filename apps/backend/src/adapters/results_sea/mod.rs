//! SeaORM adapter for the results table - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::results;

pub async fn create_result<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: i64,
) -> Result<results::Model, sea_orm::DbErr> {
    let result_active = results::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        player_id: Set(player_id),
        result: Set(0),
        round_increment: Set(0),
    };

    result_active.insert(conn).await
}

/// Standings ordered best-first.
pub async fn find_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<results::Model>, sea_orm::DbErr> {
    results::Entity::find()
        .filter(results::Column::GameId.eq(game_id))
        .order_by_desc(results::Column::Result)
        .all(conn)
        .await
}

/// Acquire exclusive row locks on a room's results for the scoring window.
/// SQLite serializes writers per transaction, so the lock clause is only
/// emitted for Postgres.
pub async fn lock_for_scoring<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let mut query = results::Entity::find().filter(results::Column::GameId.eq(game_id));
    if conn.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.all(conn).await?;
    Ok(())
}

pub async fn reset_round_increments<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), sea_orm::DbErr> {
    results::Entity::update_many()
        .col_expr(results::Column::RoundIncrement, Expr::value(0))
        .filter(results::Column::GameId.eq(game_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Atomically add points to a set of players, moving cumulative score and
/// round increment in the same statement.
pub async fn add_points<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_ids: &[i64],
    points: i32,
) -> Result<(), sea_orm::DbErr> {
    if player_ids.is_empty() || points == 0 {
        return Ok(());
    }
    results::Entity::update_many()
        .col_expr(
            results::Column::Result,
            Expr::col(results::Column::Result).add(points),
        )
        .col_expr(
            results::Column::RoundIncrement,
            Expr::col(results::Column::RoundIncrement).add(points),
        )
        .filter(results::Column::GameId.eq(game_id))
        .filter(results::Column::PlayerId.is_in(player_ids.to_vec()))
        .exec(conn)
        .await?;
    Ok(())
}
