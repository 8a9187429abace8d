use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A text entry attached to a round: the painter's true prompt, a guesser's
/// submission, or an auto-generated decoy (`author_id` = None).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "variants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "round_id")]
    pub round_id: i64,
    pub text: String,
    #[sea_orm(column_name = "author_id")]
    pub author_id: Option<i64>,
    #[sea_orm(column_name = "task_id")]
    pub task_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rounds::Entity",
        from = "Column::RoundId",
        to = "super::rounds::Column::Id"
    )]
    Round,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::AuthorId",
        to = "super::players::Column::Id"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::tasks::Entity",
        from = "Column::TaskId",
        to = "super::tasks::Column::Id"
    )]
    Task,
    #[sea_orm(has_many = "super::variant_selections::Entity")]
    Selections,
    #[sea_orm(has_many = "super::variant_likes::Entity")]
    Likes,
}

impl Related<super::rounds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Round.def()
    }
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl Related<super::variant_selections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Selections.def()
    }
}

impl Related<super::variant_likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
