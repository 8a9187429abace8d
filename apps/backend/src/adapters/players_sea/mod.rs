//! SeaORM adapter for the players table - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::players;

pub mod dto;

pub use dto::PlayerCreate;

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<players::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let player_active = players::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        is_host: Set(dto.is_host),
        nickname: Set(dto.nickname),
        avatar: NotSet,
        channel_name: NotSet,
        drawing_color: Set(dto.drawing_color),
        created_at: Set(now),
    };

    player_active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find_by_id(player_id).one(conn).await
}

pub async fn require_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<players::Model, sea_orm::DbErr> {
    find_by_id(conn, player_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Player not found".to_string()))
}

/// Roster in join order. `include_host` controls whether the host row is part
/// of the listing.
pub async fn find_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    include_host: bool,
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    let mut query = players::Entity::find().filter(players::Column::GameId.eq(game_id));
    if !include_host {
        query = query.filter(players::Column::IsHost.eq(false));
    }
    query.order_by_asc(players::Column::Id).all(conn).await
}

pub async fn find_host<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::GameId.eq(game_id))
        .filter(players::Column::IsHost.eq(true))
        .one(conn)
        .await
}

pub async fn set_channel<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    channel_name: Option<String>,
) -> Result<(), sea_orm::DbErr> {
    players::Entity::update_many()
        .col_expr(players::Column::ChannelName, Expr::value(channel_name))
        .filter(players::Column::Id.eq(player_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn update_nickname<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    nickname: &str,
) -> Result<(), sea_orm::DbErr> {
    players::Entity::update_many()
        .col_expr(players::Column::Nickname, Expr::value(Some(nickname)))
        .filter(players::Column::Id.eq(player_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Conditional write: only the first upload wins. Returns false when an
/// avatar was already present.
pub async fn set_avatar_if_missing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    avatar: &str,
) -> Result<bool, sea_orm::DbErr> {
    let result = players::Entity::update_many()
        .col_expr(players::Column::Avatar, Expr::value(Some(avatar)))
        .filter(players::Column::Id.eq(player_id))
        .filter(players::Column::Avatar.is_null())
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn used_colors<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<String>, sea_orm::DbErr> {
    let players = players::Entity::find()
        .filter(players::Column::GameId.eq(game_id))
        .all(conn)
        .await?;
    Ok(players.into_iter().filter_map(|p| p.drawing_color).collect())
}
