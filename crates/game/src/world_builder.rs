//! World building stage: regenerates the island from song positions and
//! keeps tower flag buckets in step with quiz answers.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vibequest_common::{PointOfInterest, Song, config};
use vibequest_store::{Action, Interceptor, Store};
use vibequest_worldgen::{Terrain, TerrainParams};

/// Flag bucket for a song: 0 while unanswered, otherwise the song's true
/// category shifted by one.
fn tower_category(song: &Song) -> usize {
    match song.done {
        None => 0,
        Some(_) => song.best_category() + 1,
    }
}

pub struct WorldBuilderCeptor {
    params: TerrainParams,
    /// Pose per song, kept so flag regrouping never re-probes the terrain.
    tower_positions: Vec<vibequest_common::ObjectPose>,
}

impl WorldBuilderCeptor {
    pub fn new() -> Self {
        Self::with_params(TerrainParams::default())
    }

    pub fn with_params(params: TerrainParams) -> Self {
        WorldBuilderCeptor {
            params,
            tower_positions: Vec::new(),
        }
    }

    fn tree_scale() -> Vec3 {
        let ts = config::TERRAIN_SCALE;
        Vec3::new(0.07 * ts, 0.07 * ts, 0.7 * ts)
    }

    fn tower_scale() -> Vec3 {
        let ts = config::TERRAIN_SCALE;
        Vec3::new(0.05 * ts, 0.05 * ts, 0.5 * ts * 0.5)
    }
}

impl Default for WorldBuilderCeptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Interceptor for WorldBuilderCeptor {
    fn intercept(&mut self, action: Action, store: &mut Store) -> Option<Action> {
        match action {
            Action::RebuildWorld => {
                let seed: u32 = rand::random();
                let mut rng = StdRng::seed_from_u64(seed as u64);
                tracing::info!(
                    seed,
                    songs = store.state.songs.len(),
                    "rebuilding island terrain"
                );

                let terrain =
                    match Terrain::generate(&self.params, &store.state.flat_positions, seed) {
                        Ok(terrain) => terrain,
                        Err(err) => {
                            tracing::warn!(%err, "island rebuild aborted");
                            return None;
                        }
                    };

                let tree_poses = terrain.random_tree_positions(
                    config::TREE_COUNT,
                    Self::tree_scale(),
                    &mut rng,
                );
                self.tower_positions = terrain.tower_positions(
                    &store.state.flat_positions,
                    Self::tower_scale(),
                    &mut rng,
                );

                store.state.points_of_interest = self
                    .tower_positions
                    .iter()
                    .zip(&store.state.songs)
                    .map(|(pose, song)| PointOfInterest {
                        location: pose.location,
                        label: format!("{} - {}", song.name, song.artist),
                    })
                    .collect();

                let world = &mut store.state.world;
                world.terrain = Some(terrain);
                world.tree_poses = tree_poses;
                world.tower_buckets =
                    vec![Vec::new(); config::BACKEND_CATEGORY_CODES.len() + 1];
                world.tower_buckets[0] = self.tower_positions.clone();
                world.revision += 1;
                world.poses_revision += 1;
                None
            }
            Action::UpdateTowerFlag => {
                if self.tower_positions.is_empty() {
                    tracing::warn!("tower positions not calculated before first game decision");
                }
                let buckets = store.state.world.tower_buckets.len();
                store.state.world.tower_buckets = (0..buckets)
                    .map(|bucket| {
                        self.tower_positions
                            .iter()
                            .zip(&store.state.songs)
                            .filter(|(_, song)| tower_category(song) == bucket)
                            .map(|(pose, _)| *pose)
                            .collect()
                    })
                    .collect();
                store.state.world.poses_revision += 1;
                // Fall through so later stages can react to the regrouping.
                Some(Action::UpdateTowerFlag)
            }
            other => Some(other),
        }
    }
}
