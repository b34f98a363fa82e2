//! wgpu render backend for the voxel island.
//!
//! The scene is drawn as stacks of textured slices: every voxel volume is a
//! 2D array texture, and each array layer becomes one screen-aligned quad.
//! An oblique projection (rotate, zoom, shear by height) stands in for a
//! perspective camera. Three passes per frame: shadow map, deferred albedo
//! plus shadow parameters, then a fullscreen lighting composite with PCF.
//!
//! # Invariants
//! - The renderer never mutates game state; it mirrors the world model into
//!   GPU objects and watches revision counters to know when to rebuild.
//! - Clip z is `0.5 - world_z * 0.5`, so higher voxels always win the
//!   depth test against lower ones.

pub mod arena;
pub mod camera;
pub mod lighting;
pub mod mesh;
pub mod shaders;
pub mod targets;
pub mod terrain;
pub mod voxel;

pub use arena::GraphicsArena;
pub use camera::{Camera, FrameUniforms};
pub use lighting::LightingPass;
pub use targets::{DeferredTarget, ShadowTarget};
pub use terrain::{TerrainModel, TerrainPipelines};
pub use voxel::{InstancedVoxelModel, VoxelPipelines};
