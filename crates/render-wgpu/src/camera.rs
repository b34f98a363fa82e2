use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use vibequest_store::ViewingCamera;

/// Oblique slice-stack camera.
///
/// Projection is not a matrix: translate so the look-at point is centered,
/// rotate about the vertical axis, divide by zoom, then shear the screen y
/// by world height. `shallowness` controls how much of that shear is
/// applied; larger values flatten the view toward top-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub look_at: Vec3,
    pub rotation: f32,
    pub zoom: f32,
    pub shallowness: f32,
}

impl From<&ViewingCamera> for Camera {
    fn from(viewing: &ViewingCamera) -> Self {
        Camera {
            look_at: viewing.location,
            rotation: viewing.rotation,
            zoom: viewing.zoom,
            shallowness: viewing.shallowness,
        }
    }
}

impl Camera {
    /// The fixed sun rig derived from the viewing camera: same ground
    /// focus at a constant height, rotated a third-turn, zoomed out, and
    /// much shallower.
    pub fn shadow_rig(&self) -> Camera {
        Camera {
            look_at: Vec3::new(self.look_at.x, self.look_at.y, 0.125),
            rotation: std::f32::consts::PI / 3.0,
            zoom: self.zoom * 2.0,
            shallowness: 3.0,
        }
    }

    /// Project a world point to normalized screen coordinates (-1..1).
    /// `height_to_width_ratio` is window height over width.
    pub fn world_to_screen(&self, world: Vec3, height_to_width_ratio: f32) -> Vec2 {
        let offset = world.truncate() - self.look_at.truncate();
        let (sin, cos) = (-self.rotation).sin_cos();
        let mut centered = Vec2::new(
            offset.x * cos - offset.y * sin,
            offset.y * cos + offset.x * sin,
        );
        centered /= self.zoom;
        centered.y += (world.z - self.look_at.z) / (self.zoom * self.shallowness);
        centered.y /= height_to_width_ratio;
        centered * 2.0
    }

    /// Invert [`Camera::world_to_screen`] for a known world height.
    pub fn screen_to_world(&self, screen: Vec2, world_z: f32, height_to_width_ratio: f32) -> Vec3 {
        let mut centered = screen / 2.0;
        centered.y *= height_to_width_ratio;
        centered.y -= (world_z - self.look_at.z) / (self.zoom * self.shallowness);
        centered *= self.zoom;
        let (sin, cos) = self.rotation.sin_cos();
        let offset = Vec2::new(
            centered.x * cos - centered.y * sin,
            centered.y * cos + centered.x * sin,
        );
        Vec3::new(
            offset.x + self.look_at.x,
            offset.y + self.look_at.y,
            world_z,
        )
    }
}

/// Per-pass uniform block shared by every slice shader.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Viewing look-at xyz; w is the rotation.
    pub cam_look_at: [f32; 4],
    /// zoom, shallowness, height-to-width ratio, water time.
    pub cam_params: [f32; 4],
    pub shadow_look_at: [f32; 4],
    pub shadow_params: [f32; 4],
    /// slice separation, height scale, then padding.
    pub world_params: [f32; 4],
}

impl FrameUniforms {
    /// Pack the main viewing rig. The shadow camera rides along so the
    /// deferred pass can emit shadow-map coordinates per fragment.
    pub fn for_viewing(
        camera: &Camera,
        shadow: &Camera,
        height_to_width_ratio: f32,
        water_time: f32,
        levels: u32,
        height_scale: f32,
    ) -> Self {
        FrameUniforms {
            cam_look_at: [
                camera.look_at.x,
                camera.look_at.y,
                camera.look_at.z,
                camera.rotation,
            ],
            cam_params: [
                camera.zoom,
                camera.shallowness,
                height_to_width_ratio,
                water_time,
            ],
            shadow_look_at: [
                shadow.look_at.x,
                shadow.look_at.y,
                shadow.look_at.z,
                shadow.rotation,
            ],
            shadow_params: [shadow.zoom, shadow.shallowness, 1.0, 0.0],
            world_params: [1.0 / levels as f32, height_scale, 0.0, 0.0],
        }
    }

    /// Pack the shadow rig into the viewing slot. The shadow map is
    /// square, so the aspect ratio is 1.
    pub fn for_shadow(shadow: &Camera, levels: u32, height_scale: f32) -> Self {
        Self::for_viewing(shadow, shadow, 1.0, 0.0, levels, height_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> Camera {
        Camera {
            look_at: Vec3::new(0.4, 0.55, 0.125),
            rotation: 0.7,
            zoom: 0.6,
            shallowness: 1.2,
        }
    }

    #[test]
    fn look_at_point_projects_to_screen_center_height_aside() {
        let cam = test_camera();
        let screen = cam.world_to_screen(cam.look_at, 9.0 / 16.0);
        assert!(screen.x.abs() < 1e-6);
        assert!(screen.y.abs() < 1e-6);
    }

    #[test]
    fn projection_round_trips() {
        let cam = test_camera();
        let ratio = 9.0 / 16.0;
        for world in [
            Vec3::new(0.1, 0.9, 0.0),
            Vec3::new(0.5, 0.5, 0.25),
            Vec3::new(0.85, 0.2, 0.4),
        ] {
            let screen = cam.world_to_screen(world, ratio);
            let back = cam.screen_to_world(screen, world.z, ratio);
            assert!((back - world).length() < 1e-5, "{world} -> {back}");
        }
    }

    #[test]
    fn higher_points_move_up_screen() {
        let cam = Camera {
            rotation: 0.0,
            ..test_camera()
        };
        let low = cam.world_to_screen(Vec3::new(0.4, 0.55, 0.0), 1.0);
        let high = cam.world_to_screen(Vec3::new(0.4, 0.55, 0.3), 1.0);
        assert!(high.y > low.y);
        assert_eq!(low.x, high.x);
    }

    #[test]
    fn shadow_rig_tracks_ground_focus_only() {
        let cam = test_camera();
        let rig = cam.shadow_rig();
        assert_eq!(rig.look_at.truncate(), cam.look_at.truncate());
        assert_eq!(rig.look_at.z, 0.125);
        assert_eq!(rig.zoom, cam.zoom * 2.0);
        assert_eq!(rig.shallowness, 3.0);
    }
}
