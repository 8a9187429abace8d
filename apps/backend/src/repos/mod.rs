//! Repository layer: adapter calls surfaced with domain error types.

pub mod games;
pub mod players;
pub mod results;
pub mod rounds;
pub mod tasks;
pub mod variants;
