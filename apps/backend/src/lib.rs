#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod infra;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod ws;

// Re-exports for public API
pub use error::AppError;
pub use errors::domain::DomainError;
pub use infra::media::{FsMediaStore, MediaStore};
pub use services::game_flow::RoomControl;
pub use services::tasks::{CorpusSource, TaskRegistry};
pub use state::app_state::AppState;
pub use ws::hub::WsRegistry;

#[cfg(test)]
pub mod test_bootstrap;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::init();
}
