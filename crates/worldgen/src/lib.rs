//! Procedural voxel generation.
//!
//! Models are "slice stacks": ordered RGBA pixel layers where the alpha
//! channel is occupancy. A stack reads as a solid volume once the renderer
//! discards low-alpha fragments on every layer.
//!
//! # Invariants
//! - Layer 0 is the bottom of a volume; layers share one width x length.
//! - Occupancy is 8-bit; placement thresholds compare against raw alpha.
//! - All randomness comes through caller-supplied RNGs, so generation is
//!   reproducible under a fixed seed.

pub mod props;
pub mod stack;
pub mod terrain;

pub use stack::VoxelStack;
pub use terrain::{Terrain, TerrainParams, WorldGenError};
