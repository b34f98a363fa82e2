use crate::stack::VoxelStack;
use glam::{Vec2, Vec3};
use noise::{NoiseFn, OpenSimplex};
use rand::Rng;
use thiserror::Error;
use vibequest_common::ObjectPose;
use vibequest_common::config;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldGenError {
    #[error("terrain grid must be non-empty, got {width}x{length}x{levels}")]
    DegenerateGrid { width: u32, length: u32, levels: u32 },
}

/// Occupancy above which a column supports a tower anchor.
const TOWER_PLACEMENT_THRESHOLD: u8 = 132;
/// Occupancy above which a column supports a tree anchor.
const TREE_PLACEMENT_THRESHOLD: u8 = 128;

/// Terrain generation inputs: grid dimensions plus the weighted noise bands
/// summed into occupancy.
#[derive(Debug, Clone)]
pub struct TerrainParams {
    pub width: u32,
    pub length: u32,
    pub levels: u32,
    /// Water surface as a fraction of the layer stack.
    pub water_level: f32,
    /// Vertical world extent relative to the horizontal unit extent.
    pub height_scale: f32,
    /// (frequency triple, weight) per coherent-noise band.
    pub bands: Vec<([f64; 3], f64)>,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            width: config::WORLD_HORIZONTAL_RESOLUTION,
            length: config::WORLD_HORIZONTAL_RESOLUTION,
            levels: config::TOTAL_WORLD_LEVELS,
            water_level: config::WATER_LEVEL,
            height_scale: config::TERRAIN_SCALE,
            bands: config::TERRAIN_NOISE_BANDS.to_vec(),
        }
    }
}

/// A generated island: the voxel layer stack plus the vertical parameters
/// surface probing needs.
#[derive(Debug, Clone)]
pub struct Terrain {
    pub stack: VoxelStack,
    pub water_level: f32,
    pub height_scale: f32,
}

impl Terrain {
    /// Generate island terrain raised around the given points of interest
    /// (normalized unit-square positions) and around the map center.
    pub fn generate(
        params: &TerrainParams,
        poi_positions: &[Vec2],
        seed: u32,
    ) -> Result<Terrain, WorldGenError> {
        let (w, l, levels) = (params.width, params.length, params.levels);
        if w == 0 || l == 0 || levels == 0 {
            return Err(WorldGenError::DegenerateGrid {
                width: w,
                length: l,
                levels,
            });
        }
        let noise = OpenSimplex::new(seed);

        let density = density_field(w, l, poi_positions);

        let mut stack = VoxelStack::new(w, l);
        for z in 0..levels {
            // Occupancy tapers toward the top of the stack.
            let height_penalty = ((1.0 - z as f64 / levels as f64) * 2.0).powf(1.5);
            let color = height_color(z as f32 / levels as f32);

            let mut layer = vec![0u8; (w * l * 4) as usize];
            for y in 0..l {
                for x in 0..w {
                    let mut alpha = 0.0f64;
                    for (frequency, weight) in &params.bands {
                        let sample = noise.get([
                            x as f64 * frequency[0] / w as f64,
                            y as f64 * frequency[1] / l as f64,
                            z as f64 * frequency[2] / levels as f64,
                        ]);
                        let positive = ((sample + 1.0) / 2.0).max(0.0);
                        alpha += positive
                            * height_penalty
                            * density[(x + y * w) as usize]
                            * 256.0
                            * weight;
                    }

                    let i = ((y * w + x) * 4) as usize;
                    layer[i] = color[0];
                    layer[i + 1] = color[1];
                    layer[i + 2] = color[2];
                    layer[i + 3] = alpha.clamp(0.0, 255.0) as u8;
                }
            }
            stack.push_layer(layer);
        }

        Ok(Terrain {
            stack,
            water_level: params.water_level,
            height_scale: params.height_scale,
        })
    }

    /// One surface anchor per point of interest: the topmost voxel in the
    /// column that clears the tower occupancy threshold, falling back to
    /// the water line for columns the noise left hollow.
    pub fn tower_positions(
        &self,
        poi_positions: &[Vec2],
        base_scale: Vec3,
        rng: &mut impl Rng,
    ) -> Vec<ObjectPose> {
        let levels = self.stack.level_count();
        let mut poses = Vec::with_capacity(poi_positions.len());
        for position in poi_positions {
            let x = ((position.x * self.stack.width() as f32).round() as u32)
                .min(self.stack.width() - 1);
            let y = ((position.y * self.stack.length() as f32).round() as u32)
                .min(self.stack.length() - 1);

            let topmost = (0..levels)
                .rev()
                .find(|z| self.stack.alpha_at(x, y, *z) > TOWER_PLACEMENT_THRESHOLD)
                .unwrap_or((self.water_level * levels as f32) as u32);

            poses.push(self.surface_pose(x, y, topmost, base_scale, rng));
        }
        poses
    }

    /// Scatter `count` tree anchors across columns whose surface falls
    /// inside the tree-line band (fractions of the stack height). A column
    /// qualifies when it is occupied inside the band but open just above it.
    pub fn random_tree_positions(
        &self,
        count: usize,
        base_scale: Vec3,
        rng: &mut impl Rng,
    ) -> Vec<ObjectPose> {
        self.random_tree_positions_in_band(count, base_scale, 0.15, 0.35, rng)
    }

    pub fn random_tree_positions_in_band(
        &self,
        count: usize,
        base_scale: Vec3,
        band_start: f32,
        band_end: f32,
        rng: &mut impl Rng,
    ) -> Vec<ObjectPose> {
        let levels = self.stack.level_count() as f32;
        let z_start = (band_start * levels) as u32;
        let z_end = (band_end * levels) as u32;
        let above = (band_end * levels).ceil() as u32;

        let mut viable = Vec::new();
        for x in 0..self.stack.width() {
            for y in 0..self.stack.length() {
                let topmost = (z_start..z_end)
                    .filter(|z| self.stack.alpha_at(x, y, *z) > TREE_PLACEMENT_THRESHOLD)
                    .next_back();
                if let Some(z) = topmost {
                    if self.stack.alpha_at(x, y, above) < TREE_PLACEMENT_THRESHOLD {
                        viable.push((x, y, z));
                    }
                }
            }
        }

        if viable.is_empty() {
            tracing::warn!("no viable tree columns inside the tree line band");
            return Vec::new();
        }

        (0..count)
            .map(|_| {
                let (x, y, z) = viable[rng.gen_range(0..viable.len())];
                self.surface_pose(x, y, z, base_scale, rng)
            })
            .collect()
    }

    fn surface_pose(
        &self,
        x: u32,
        y: u32,
        z: u32,
        base_scale: Vec3,
        rng: &mut impl Rng,
    ) -> ObjectPose {
        let location = Vec3::new(
            x as f32 / self.stack.width() as f32,
            y as f32 / self.stack.length() as f32,
            z as f32 / self.stack.level_count() as f32 * self.height_scale,
        );
        let jitter = rng.gen_range(0.9..1.1);
        ObjectPose::new(
            location,
            rng.gen_range(0.0..std::f32::consts::TAU),
            base_scale * jitter,
        )
    }
}

/// Per-column density: capped inverse distance to the nearest point of
/// interest, shaped by a parabolic falloff from the map center.
fn density_field(width: u32, length: u32, poi_positions: &[Vec2]) -> Vec<f64> {
    let mut field = vec![0.0f64; (width * length) as usize];
    for y in 0..length {
        for x in 0..width {
            let mut distance = f64::MAX;
            for poi in poi_positions {
                let dx = (x as f64 - poi.x as f64 * width as f64) / width as f64;
                let dy = (y as f64 - poi.y as f64 * length as f64) / length as f64;
                distance = distance.min((dx * dx + dy * dy).sqrt());
            }
            let mut density = (0.05 / distance).min(2.0);

            let cx = (x as f64 - 0.5 * width as f64) / width as f64;
            let cy = (y as f64 - 0.5 * length as f64) / length as f64;
            let center_falloff = (1.0 - (cx * cx + cy * cy).sqrt() * 2.0).max(0.0);

            density *= center_falloff.powf(0.25);
            field[(x + y * width) as usize] = density;
        }
    }
    field
}

/// RGB for a voxel by its relative elevation: deep water, shoreline sand,
/// grass gradient, then rock.
fn height_color(t: f32) -> [u8; 3] {
    let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    if t < 0.1 {
        return [0, 0, to_u8((10.0 * t).max(0.25))];
    }
    if t < 0.15 {
        let mult = ((t - 0.1) * 20.0 + 0.2).min(1.0);
        return [to_u8(mult), to_u8(mult), 0];
    }
    if t < 0.35 {
        let blend = (t - 0.15) / (0.35 - 0.15);
        return [0, to_u8(blend + (1.0 - blend) * 0.5), 0];
    }
    let blend = (t - 0.35) / (1.0 - 0.35);
    let grey = to_u8(blend * 0.8 + (1.0 - blend) * 0.3);
    [grey, grey, grey]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// A 1x1 terrain with one hand-written occupancy column.
    fn column_terrain(alphas: &[u8], height_scale: f32) -> Terrain {
        let mut stack = VoxelStack::new(1, 1);
        for a in alphas {
            stack.push_layer(vec![0, 0, 0, *a]);
        }
        Terrain {
            stack,
            water_level: 0.12,
            height_scale,
        }
    }

    #[test]
    fn tower_probe_finds_topmost_occupied_voxel() {
        let terrain = column_terrain(&[140, 200, 100, 50], 0.2);
        let mut rng = StdRng::seed_from_u64(7);
        let poses = terrain.tower_positions(&[Vec2::new(0.0, 0.0)], Vec3::ONE, &mut rng);
        assert_eq!(poses.len(), 1);
        // z=1 is the highest layer above the 132 threshold; the anchor is
        // its stack fraction scaled by the world height.
        assert!((poses[0].location.z - 1.0 / 4.0 * 0.2).abs() < 1e-6);
    }

    #[test]
    fn tower_probe_falls_back_to_water_line() {
        let terrain = column_terrain(&[10, 10, 10, 10], 0.2);
        let mut rng = StdRng::seed_from_u64(7);
        let poses = terrain.tower_positions(&[Vec2::new(0.0, 0.0)], Vec3::ONE, &mut rng);
        let expected_z = (0.12 * 4.0) as u32 as f32 / 4.0 * 0.2;
        assert!((poses[0].location.z - expected_z).abs() < 1e-6);
    }

    #[test]
    fn tower_scale_jitter_stays_within_ten_percent() {
        let terrain = column_terrain(&[200; 4], 0.2);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let poses = terrain.tower_positions(&[Vec2::new(0.0, 0.0)], Vec3::ONE, &mut rng);
            let s = poses[0].scale;
            assert!(s.x >= 0.9 && s.x <= 1.1);
            assert_eq!(s.x, s.y);
            assert_eq!(s.x, s.z);
        }
    }

    #[test]
    fn tree_probe_requires_open_air_above_band() {
        // 10 layers, band 0.2..0.8 scans z in 2..8. Solid through the band
        // and beyond: the column above the band is occupied, so no trees.
        let solid = column_terrain(&[200; 10], 0.2);
        let mut rng = StdRng::seed_from_u64(1);
        let poses = solid.random_tree_positions_in_band(5, Vec3::ONE, 0.2, 0.8, &mut rng);
        assert!(poses.is_empty());

        // Occupied only inside the band: viable.
        let banded = column_terrain(&[200, 200, 200, 200, 200, 0, 0, 0, 0, 0], 0.2);
        let poses = banded.random_tree_positions_in_band(5, Vec3::ONE, 0.2, 0.8, &mut rng);
        assert_eq!(poses.len(), 5);
        // Topmost occupied voxel inside the band is z=4.
        assert!((poses[0].location.z - 4.0 / 10.0 * 0.2).abs() < 1e-6);
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let params = TerrainParams {
            width: 16,
            length: 16,
            levels: 8,
            ..TerrainParams::default()
        };
        let pois = [Vec2::new(0.5, 0.5)];
        let a = Terrain::generate(&params, &pois, 42).unwrap();
        let b = Terrain::generate(&params, &pois, 42).unwrap();
        assert_eq!(a.stack, b.stack);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let params = TerrainParams {
            width: 0,
            ..TerrainParams::default()
        };
        let err = Terrain::generate(&params, &[], 0).unwrap_err();
        assert!(matches!(err, WorldGenError::DegenerateGrid { width: 0, .. }));
    }

    #[test]
    fn terrain_rises_near_points_of_interest() {
        let params = TerrainParams {
            width: 32,
            length: 32,
            levels: 16,
            ..TerrainParams::default()
        };
        let terrain = Terrain::generate(&params, &[Vec2::new(0.5, 0.5)], 3).unwrap();
        // Column under the point of interest should out-fill a far corner.
        let center: u32 = (0..16).map(|z| terrain.stack.alpha_at(16, 16, z) as u32).sum();
        let corner: u32 = (0..16).map(|z| terrain.stack.alpha_at(1, 1, z) as u32).sum();
        assert!(center > corner);
    }

    #[test]
    fn height_color_bands() {
        assert_eq!(height_color(0.05)[2], height_color(0.05)[2]);
        assert_eq!(height_color(0.05)[0], 0); // deep water has no red
        let shoreline = height_color(0.12);
        assert_eq!(shoreline[0], shoreline[1]); // sand is yellow
        assert_eq!(shoreline[2], 0);
        let grass = height_color(0.25);
        assert!(grass[1] > grass[0] && grass[1] > grass[2]);
        let rock = height_color(0.8);
        assert_eq!(rock[0], rock[1]);
        assert_eq!(rock[1], rock[2]);
    }
}
