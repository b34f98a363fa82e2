//! Offscreen render targets for the shadow and deferred passes.

pub const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R16Float;
pub const ALBEDO_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub const SHADOW_PARAMS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

fn create_target(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&Default::default());
    (texture, view)
}

fn create_depth(device: &wgpu::Device, label: &str, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

/// Square map holding the world height of the closest sunward occluder.
pub struct ShadowTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    pub width: u32,
}

impl ShadowTarget {
    pub fn new(device: &wgpu::Device, width: u32) -> Self {
        let (texture, view) = create_target(device, "shadow_map", width, width, SHADOW_FORMAT);
        let depth_view = create_depth(device, "shadow_depth", width, width);
        ShadowTarget {
            texture,
            view,
            depth_view,
            width,
        }
    }
}

/// Fixed-resolution deferred buffer: unlit albedo plus per-pixel shadow
/// map coordinates and world height.
pub struct DeferredTarget {
    pub albedo_texture: wgpu::Texture,
    pub albedo_view: wgpu::TextureView,
    pub params_texture: wgpu::Texture,
    pub params_view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl DeferredTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (albedo_texture, albedo_view) =
            create_target(device, "deferred_albedo", width, height, ALBEDO_FORMAT);
        let (params_texture, params_view) = create_target(
            device,
            "deferred_shadow_params",
            width,
            height,
            SHADOW_PARAMS_FORMAT,
        );
        let depth_view = create_depth(device, "deferred_depth", width, height);
        DeferredTarget {
            albedo_texture,
            albedo_view,
            params_texture,
            params_view,
            depth_view,
            width,
            height,
        }
    }
}
