//! World and renderer tuning constants.

/// Vertical extent of the world relative to its horizontal unit extent.
pub const TERRAIN_SCALE: f32 = 0.2;

/// Number of voxel layers in the world slice stack.
pub const TOTAL_WORLD_LEVELS: u32 = 128;

/// Horizontal voxel resolution of the terrain grid (both axes).
pub const WORLD_HORIZONTAL_RESOLUTION: u32 = 256;

/// Water surface as a fraction of the layer stack.
pub const WATER_LEVEL: f32 = 0.12;

/// Side length of the square shadow map.
pub const SHADOW_MAP_WIDTH: u32 = 1024;

/// Off-screen resolution of the deferred albedo/side-channel targets.
pub const DEFERRED_BUFFER_RESOLUTION: [u32; 2] = [1920, 1080];

/// Trees scattered across the island on each rebuild.
pub const TREE_COUNT: usize = 250;

/// Noise bands summed into terrain occupancy: (frequency triple, weight).
pub const TERRAIN_NOISE_BANDS: [([f64; 3], f64); 3] = [
    ([10.0, 10.0, 2.0], 0.75),
    ([40.0, 40.0, 8.0], 0.15),
    ([80.0, 80.0, 16.0], 0.1),
];

/// Category identifiers used by the song catalog backend.
pub const BACKEND_CATEGORY_CODES: [&str; 7] = [
    "selfdetermination",
    "heartbroken",
    "aggressive",
    "loneliness",
    "lovemaking",
    "perseverance",
    "party",
];

/// Category names shown to the player.
pub const CATEGORY_DISPLAY_NAMES: [&str; 7] = [
    "Self-Determination",
    "Heartbroken",
    "Aggressive",
    "Lonely",
    "Love",
    "Perseverance",
    "Party",
];

/// Banner colors for tower models, index 0 being the undecided bucket.
pub const CATEGORY_FLAG_COLORS: [[u8; 3]; 8] = [
    [200, 200, 200],
    [235, 180, 52],
    [52, 110, 235],
    [200, 40, 40],
    [110, 110, 160],
    [230, 90, 160],
    [60, 170, 90],
    [240, 130, 40],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_flag_color_per_category_plus_undecided() {
        assert_eq!(CATEGORY_FLAG_COLORS.len(), BACKEND_CATEGORY_CODES.len() + 1);
        assert_eq!(BACKEND_CATEGORY_CODES.len(), CATEGORY_DISPLAY_NAMES.len());
    }

    #[test]
    fn band_weights_sum_to_one() {
        let total: f64 = TERRAIN_NOISE_BANDS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
