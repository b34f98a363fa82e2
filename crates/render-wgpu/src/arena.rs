//! GPU mirror of the world model.
//!
//! The game state owns only CPU data plus two revision counters. The arena
//! compares those counters each frame and rebuilds exactly what moved: a
//! terrain revision bump recreates every volume, a pose revision bump only
//! rewrites tower instance buffers.

use rand::SeedableRng;
use rand::rngs::StdRng;

use vibequest_common::config;
use vibequest_store::WorldModel;
use vibequest_worldgen::props;

use crate::terrain::TerrainModel;
use crate::voxel::{InstancedVoxelModel, SliceBindLayouts};

const TREE_VOLUME_RESOLUTION: (u32, u32) = (16, 32);
const TOWER_VOLUME_RESOLUTION: (u32, u32) = (24, 96);

#[derive(Default)]
pub struct GraphicsArena {
    terrain: Option<TerrainModel>,
    trees: Option<InstancedVoxelModel>,
    /// One model per flag bucket; index 0 is the undecided stone banner.
    towers: Vec<InstancedVoxelModel>,
    seen_revision: u64,
    seen_poses_revision: u64,
}

impl GraphicsArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a world has been mirrored and every volume exists.
    pub fn ready(&self) -> bool {
        self.terrain.is_some() && self.trees.is_some() && !self.towers.is_empty()
    }

    pub fn terrain(&self) -> Option<&TerrainModel> {
        self.terrain.as_ref()
    }

    pub fn trees(&self) -> Option<&InstancedVoxelModel> {
        self.trees.as_ref()
    }

    pub fn towers(&self) -> &[InstancedVoxelModel] {
        &self.towers
    }

    /// Bring the GPU mirror up to date with `world`.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &SliceBindLayouts,
        world: &WorldModel,
    ) {
        if world.revision != self.seen_revision {
            let Some(terrain) = &world.terrain else {
                return;
            };
            tracing::info!(revision = world.revision, "rebuilding graphics arena");
            self.release();

            self.terrain = Some(TerrainModel::new(device, queue, layouts, terrain));

            let mut rng = StdRng::seed_from_u64(world.revision);
            let (tree_h, tree_v) = TREE_VOLUME_RESOLUTION;
            let tree_stack = props::tree(tree_h, tree_v, &mut rng);
            let mut trees =
                InstancedVoxelModel::new(device, queue, layouts, &tree_stack, true, "trees");
            trees.set_poses(device, &world.tree_poses);
            self.trees = Some(trees);

            let (tower_h, tower_v) = TOWER_VOLUME_RESOLUTION;
            self.towers = config::CATEGORY_FLAG_COLORS
                .iter()
                .map(|flag_rgb| {
                    let stack = props::tower(tower_h, tower_v, *flag_rgb);
                    InstancedVoxelModel::new(device, queue, layouts, &stack, false, "tower")
                })
                .collect();
            self.set_tower_poses(device, world);

            self.seen_revision = world.revision;
            self.seen_poses_revision = world.poses_revision;
        } else if world.poses_revision != self.seen_poses_revision {
            self.set_tower_poses(device, world);
            self.seen_poses_revision = world.poses_revision;
        }
    }

    fn set_tower_poses(&mut self, device: &wgpu::Device, world: &WorldModel) {
        for (model, bucket) in self.towers.iter_mut().zip(&world.tower_buckets) {
            model.set_poses(device, bucket);
        }
    }

    fn release(&mut self) {
        if let Some(terrain) = self.terrain.take() {
            terrain.destroy();
        }
        if let Some(trees) = self.trees.take() {
            trees.destroy();
        }
        for tower in self.towers.drain(..) {
            tower.destroy();
        }
    }
}
