use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stage of a single painter's turn. At most one round per room may be in a
/// non-`NotStarted`, non-`Finished` stage — that round is "the current round".
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum RoundStage {
    #[sea_orm(string_value = "not_started")]
    NotStarted,
    #[sea_orm(string_value = "writing")]
    Writing,
    #[sea_orm(string_value = "selecting")]
    Selecting,
    #[sea_orm(string_value = "answers")]
    Answers,
    #[sea_orm(string_value = "results")]
    Results,
    #[sea_orm(string_value = "finished")]
    Finished,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rounds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "game_id")]
    pub game_id: i64,
    #[sea_orm(column_name = "order_number")]
    pub order_number: i32,
    #[sea_orm(column_name = "painter_id")]
    pub painter_id: i64,
    #[sea_orm(column_name = "painting_task")]
    pub painting_task: String,
    /// Media reference set once the painter uploads their drawing.
    pub painting: Option<String>,
    pub stage: RoundStage,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id"
    )]
    Game,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::PainterId",
        to = "super::players::Column::Id"
    )]
    Painter,
    #[sea_orm(has_many = "super::variants::Entity")]
    Variants,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<super::variants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
