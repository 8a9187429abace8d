//! DTOs for variant creation.

#[derive(Debug, Clone)]
pub struct VariantCreate {
    pub round_id: i64,
    pub text: String,
    /// None marks an auto-generated decoy.
    pub author_id: Option<i64>,
    pub task_id: Option<i64>,
}
