//! Service layer: room orchestration bridging pure domain logic with the
//! persistence collaborator.

pub mod game_flow;
pub mod games;
pub mod media;
pub mod players;
pub mod rounds;
pub mod scoring;
pub mod tasks;
pub mod variants;
