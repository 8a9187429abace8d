use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored painting prompt corpus, per language.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub language: String,
    pub text: String,
    pub source: String,
}

impl Model {
    /// Prompt text as handed to a painter.
    pub fn prepared_text(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::variants::Entity")]
    Variants,
}

impl Related<super::variants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
