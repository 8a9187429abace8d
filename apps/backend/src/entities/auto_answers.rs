use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Decoy corpus: answers used to pad a round's variant pool when fewer
/// guesses than players arrived in time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "auto_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub language: String,
    pub text: String,
    pub source: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
