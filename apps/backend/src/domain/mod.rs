//! Domain layer: pure room logic, no I/O.

pub mod alphabet;
pub mod answers;
pub mod colors;
pub mod rules;
pub mod similarity;
pub mod stage;
