//! The single state tree.
//!
//! Everything the interceptors and subscriptions read or write lives here.
//! GPU resources never do; the render layer mirrors the world model into
//! device objects and watches the revision counters to know when to rebuild.

use glam::{Vec2, Vec3};
use vibequest_common::{ObjectPose, PointOfInterest, Song, config};
use vibequest_worldgen::Terrain;

use crate::anim::Animation;

/// Oblique viewing camera, mutated by input and focus animations.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewingCamera {
    /// Look-at point in normalized world coordinates.
    pub location: Vec3,
    /// Rotation about the vertical axis, radians.
    pub rotation: f32,
    pub zoom: f32,
    /// How flattened the vertical axis appears; larger is more top-down.
    pub shallowness: f32,
}

impl Default for ViewingCamera {
    fn default() -> Self {
        ViewingCamera {
            location: Vec3::new(0.5, 0.5, 0.125),
            rotation: 0.0,
            zoom: 0.6,
            shallowness: 1.2,
        }
    }
}

/// Contents of the quiz modal for the currently focused song.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModal {
    pub active: bool,
    pub song_index: usize,
    pub song_name: String,
    pub artist: String,
    pub lyrics: String,
    pub choices: Vec<String>,
    /// Index of the correct category for this song.
    pub correct_choice: usize,
    /// Which category the player already answered, if any.
    pub done: Option<usize>,
    pub points: u32,
    pub audio_uri: Option<String>,
}

/// CPU-side world model. The render layer owns the GPU mirror and rebuilds
/// it whenever a revision counter moves.
#[derive(Debug, Default)]
pub struct WorldModel {
    /// Bumped when the terrain volume itself changes.
    pub revision: u64,
    /// Bumped when only prop poses change (cheaper rebuild).
    pub poses_revision: u64,
    pub terrain: Option<Terrain>,
    pub tree_poses: Vec<ObjectPose>,
    /// Tower poses grouped by flag bucket; index 0 is undecided.
    pub tower_buckets: Vec<Vec<ObjectPose>>,
}

pub struct State {
    /// Total points earned across all answered songs.
    pub point_count: u32,
    pub viewing_camera: ViewingCamera,
    pub songs: Vec<Song>,
    /// Normalized 2D map position per song, parallel to `songs`.
    pub flat_positions: Vec<Vec2>,
    pub points_of_interest: Vec<PointOfInterest>,
    pub window_dimensions: [u32; 2],
    pub active_animations: Vec<Animation>,
    pub view_modal: ViewModal,
    pub world: WorldModel,
}

impl Default for State {
    fn default() -> Self {
        State {
            point_count: 0,
            viewing_camera: ViewingCamera::default(),
            songs: Vec::new(),
            flat_positions: Vec::new(),
            points_of_interest: Vec::new(),
            window_dimensions: config::DEFERRED_BUFFER_RESOLUTION,
            active_animations: Vec::new(),
            view_modal: ViewModal::default(),
            world: WorldModel::default(),
        }
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("point_count", &self.point_count)
            .field("viewing_camera", &self.viewing_camera)
            .field("songs", &self.songs.len())
            .field("window_dimensions", &self.window_dimensions)
            .field("active_animations", &self.active_animations.len())
            .field("view_modal", &self.view_modal)
            .field("world_revision", &self.world.revision)
            .finish_non_exhaustive()
    }
}
