//! Room orchestration: the per-room coordinator and projector tasks plus
//! the single-writer stage progression they drive.

pub mod broadcast;
pub mod progression;
pub mod scheduler;

pub use scheduler::RoomControl;
