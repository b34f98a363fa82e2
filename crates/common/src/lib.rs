//! Shared types and tuning constants for the vibequest island.

pub mod config;
pub mod types;

pub use types::{ObjectPose, PointOfInterest, PointerEvent, Song};
