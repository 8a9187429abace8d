//! SeaORM adapters - generic over ConnectionTrait.
//!
//! Adapter functions return DbErr; the repos layer maps to DomainError via
//! `From<DbErr>`. All writes are atomic filtered updates so concurrent
//! submission handlers and the room coordinator never lose updates to a
//! read-modify-write cycle.

pub mod games_sea;
pub mod players_sea;
pub mod results_sea;
pub mod rounds_sea;
pub mod tasks_sea;
pub mod variants_sea;
