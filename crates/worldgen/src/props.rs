//! Prop volumes: sphere, tree, and category tower.

use crate::stack::VoxelStack;
use rand::Rng;

const CANOPY_RGB: [u8; 3] = [40, 92, 0];
const TRUNK_RGB: [u8; 3] = [94, 57, 0];
const TOWER_STONE_RGB: [u8; 3] = [120, 116, 110];

/// Solid sphere inscribed in a cube of `resolution` voxels per side.
pub fn sphere(resolution: u32) -> VoxelStack {
    let mut stack = VoxelStack::new(resolution, resolution);
    let center = resolution as f32 / 2.0;
    let radius = resolution as f32 * 0.5;
    for z in 0..resolution {
        let mut layer = vec![0u8; (resolution * resolution * 4) as usize];
        for y in 0..resolution {
            for x in 0..resolution {
                let dx = x as f32 - center;
                let dy = y as f32 - center;
                let dz = z as f32 - center;
                let inside = (dx * dx + dy * dy + dz * dz).sqrt() < radius;
                let i = ((y * resolution + x) * 4) as usize;
                layer[i] = 255;
                layer[i + 1] = 255;
                layer[i + 2] = 255;
                layer[i + 3] = if inside { 255 } else { 0 };
            }
        }
        stack.push_layer(layer);
    }
    stack
}

/// Tree volume: brown trunk with a solid core, topped by a canopy whose
/// per-layer radius is the minimum of four fade curves, jittered per voxel
/// for an organic silhouette.
pub fn tree(resolution_h: u32, resolution_v: u32, rng: &mut impl Rng) -> VoxelStack {
    let mut stack = VoxelStack::new(resolution_h, resolution_h);
    let center = resolution_h as f32 / 2.0;
    let trunk_top = resolution_v as f32 * 0.15;

    for z in 0..resolution_v {
        let linear = 1.0 - (z as f32 - trunk_top) / (resolution_v as f32 - trunk_top);
        let reverse_linear = (1.0 - linear) * 2.5;
        let polynomial = linear.max(0.0).powf(1.5);
        let sub_polynomial = linear.max(0.0).powf(0.25);
        let mut fade = linear
            .min(reverse_linear)
            .min(polynomial)
            .min(sub_polynomial)
            .min(0.6);
        if (z as f32) < trunk_top {
            fade = 0.0;
        }
        let in_trunk = (z as f32) < trunk_top * 1.5;

        let mut layer = vec![0u8; (resolution_h * resolution_h * 4) as usize];
        for y in 0..resolution_h {
            for x in 0..resolution_h {
                let jitter = rng.gen_range(0.7..1.0);
                let dx = x as f32 - center;
                let dy = y as f32 - center;
                let radius = (dx * dx + dy * dy).sqrt();
                let canopy = radius < resolution_h as f32 * 0.5 * fade * jitter;

                let i = ((y * resolution_h + x) * 4) as usize;
                let rgb = if in_trunk { TRUNK_RGB } else { CANOPY_RGB };
                layer[i] = rgb[0];
                layer[i + 1] = rgb[1];
                layer[i + 2] = rgb[2];
                layer[i + 3] = if canopy { 255 } else { 0 };
                if in_trunk && radius < resolution_h as f32 * 0.05 {
                    layer[i + 3] = 255;
                }
            }
        }
        stack.push_layer(layer);
    }
    stack
}

/// Tower volume: a tapering stone shaft with a solid core, a thin pole,
/// and banner layers near the top tinted by the owning category's color.
pub fn tower(resolution_h: u32, resolution_v: u32, flag_rgb: [u8; 3]) -> VoxelStack {
    let mut stack = VoxelStack::new(resolution_h, resolution_h);
    let center = resolution_h as f32 / 2.0;
    let shaft_top = resolution_v as f32 * 0.7;
    let banner_start = resolution_v as f32 * 0.8;

    for z in 0..resolution_v {
        let zf = z as f32;
        // Shaft narrows with height, then only the pole and banner remain.
        let radius_limit = if zf < shaft_top {
            (0.35 - 0.1 * zf / shaft_top) * resolution_h as f32
        } else {
            0.06 * resolution_h as f32
        };
        let in_banner = zf >= banner_start;

        let mut layer = vec![0u8; (resolution_h * resolution_h * 4) as usize];
        for y in 0..resolution_h {
            for x in 0..resolution_h {
                let dx = x as f32 - center;
                let dy = y as f32 - center;
                let radius = (dx * dx + dy * dy).sqrt();

                let mut rgb = TOWER_STONE_RGB;
                let mut occupied = radius < radius_limit;
                // The banner is a flat quadrant flying off one side of the pole.
                if in_banner && dx >= 0.0 && dx < resolution_h as f32 * 0.4 && dy.abs() < 1.5 {
                    rgb = flag_rgb;
                    occupied = true;
                }

                let i = ((y * resolution_h + x) * 4) as usize;
                layer[i] = rgb[0];
                layer[i + 1] = rgb[1];
                layer[i + 2] = rgb[2];
                layer[i + 3] = if occupied { 255 } else { 0 };
            }
        }
        stack.push_layer(layer);
    }
    stack
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn sphere_is_solid_at_center_and_empty_at_corners() {
        let s = sphere(16);
        assert_eq!(s.level_count(), 16);
        assert_eq!(s.alpha_at(8, 8, 8), 255);
        assert_eq!(s.alpha_at(0, 0, 0), 0);
        assert_eq!(s.alpha_at(15, 15, 15), 0);
    }

    #[test]
    fn tree_has_trunk_core_and_tapering_canopy() {
        let mut rng = StdRng::seed_from_u64(5);
        let t = tree(16, 32, &mut rng);
        assert_eq!(t.level_count(), 32);
        // Trunk core is solid at the very bottom.
        assert_eq!(t.alpha_at(8, 8, 0), 255);
        assert_eq!(t.rgba_at(8, 8, 0)[0], TRUNK_RGB[0]);
        // Nothing survives at the topmost layer; the fade curves hit zero.
        let top = t.level_count() - 1;
        let occupied = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .filter(|(x, y)| t.alpha_at(*x, *y, top) > 0)
            .count();
        assert_eq!(occupied, 0);
    }

    #[test]
    fn tower_carries_its_flag_color_near_the_top() {
        let flag = [235, 180, 52];
        let t = tower(16, 32, flag);
        let banner_z = 28;
        let banner = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .find(|(x, y)| {
                t.alpha_at(*x, *y, banner_z) == 255 && t.rgba_at(*x, *y, banner_z)[0] == flag[0]
            });
        assert!(banner.is_some());
        // The base is stone.
        assert_eq!(t.rgba_at(8, 8, 0)[0], TOWER_STONE_RGB[0]);
        assert_eq!(t.alpha_at(8, 8, 0), 255);
    }
}
