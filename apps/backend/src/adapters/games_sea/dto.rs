//! DTOs for game creation.

#[derive(Debug, Clone)]
pub struct GameCreate {
    pub code: String,
    pub language: String,
    pub cycles: i32,
}
