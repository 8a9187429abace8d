//! DTOs for player creation.

#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub game_id: i64,
    pub is_host: bool,
    pub nickname: Option<String>,
    pub drawing_color: Option<String>,
}
