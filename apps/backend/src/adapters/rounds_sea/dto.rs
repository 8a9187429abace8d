//! DTOs for round creation.

#[derive(Debug, Clone)]
pub struct RoundCreate {
    pub game_id: i64,
    pub order_number: i32,
    pub painter_id: i64,
    pub painting_task: String,
}
