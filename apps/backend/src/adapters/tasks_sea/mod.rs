//! SeaORM adapter for the task and decoy corpora - generic over
//! ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entities::{auto_answers, tasks};

/// A random stored task for the language, honoring an id exclusion list.
pub async fn random_task<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    language: &str,
    excluded_ids: &[i64],
) -> Result<Option<tasks::Model>, sea_orm::DbErr> {
    let mut query = tasks::Entity::find().filter(tasks::Column::Language.eq(language));
    if !excluded_ids.is_empty() {
        query = query.filter(tasks::Column::Id.is_not_in(excluded_ids.to_vec()));
    }
    query
        .order_by(Expr::cust("RANDOM()"), Order::Asc)
        .one(conn)
        .await
}

pub async fn count_tasks<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    language: &str,
) -> Result<u64, sea_orm::DbErr> {
    tasks::Entity::find()
        .filter(tasks::Column::Language.eq(language))
        .count(conn)
        .await
}

/// Up to `number` random decoy answers for the language.
pub async fn random_auto_answers<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    language: &str,
    number: u64,
) -> Result<Vec<auto_answers::Model>, sea_orm::DbErr> {
    if number == 0 {
        return Ok(Vec::new());
    }
    auto_answers::Entity::find()
        .filter(auto_answers::Column::Language.eq(language))
        .order_by(Expr::cust("RANDOM()"), Order::Asc)
        .limit(number)
        .all(conn)
        .await
}
