//! WGSL sources for the slice-stack passes.
//!
//! All slice shaders share one uniform block. The shadow pass reuses the
//! viewing-camera slot: it is packed with the shadow rig and an aspect
//! ratio of 1, so the same vertex entry points serve both passes.

/// Shared uniform block and projection helpers.
const PRELUDE: &str = r#"
struct FrameUniforms {
    cam_look_at: vec4<f32>,
    cam_params: vec4<f32>,
    shadow_look_at: vec4<f32>,
    shadow_params: vec4<f32>,
    world_params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;

fn world_to_screen(
    world: vec3<f32>,
    look_at: vec4<f32>,
    zoom: f32,
    shallowness: f32,
    ratio: f32,
) -> vec2<f32> {
    let offset = world.xy - look_at.xy;
    let c = cos(-look_at.w);
    let s = sin(-look_at.w);
    var centered = vec2<f32>(
        offset.x * c - offset.y * s,
        offset.y * c + offset.x * s,
    );
    centered = centered / zoom;
    centered.y = centered.y + (world.z - look_at.z) / (zoom * shallowness);
    centered.y = centered.y / ratio;
    return centered * 2.0;
}

// Texture v runs top-down in the render target, so the v axis flips.
fn shadow_map_uv(world: vec3<f32>) -> vec2<f32> {
    let s = world_to_screen(
        world,
        frame.shadow_look_at,
        frame.shadow_params.x,
        frame.shadow_params.y,
        1.0,
    );
    return vec2<f32>(s.x * 0.5 + 0.5, 0.5 - s.y * 0.5);
}

// World z in 0..1 maps into the front half of the 0..1 clip range;
// higher voxels land closer to the camera.
fn clip_depth(world_z: f32) -> f32 {
    return 0.5 - world_z * 0.5;
}

struct SliceVertexInput {
    @location(0) position: vec3<f32>,
    @location(1) texcoord: vec3<f32>,
};

struct SliceVertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) texcoord: vec3<f32>,
    @location(1) shadow_uv: vec2<f32>,
    @location(2) depth: f32,
};

struct DeferredOutput {
    @location(0) albedo: vec4<f32>,
    @location(1) shadow_params: vec4<f32>,
};

@group(1) @binding(0) var slice_texture: texture_2d_array<f32>;
@group(1) @binding(1) var slice_sampler: sampler;
"#;

/// Instanced voxel volumes: quads move through the forward projection.
const VOXEL_BODY: &str = r#"
struct InstanceInput {
    @location(2) obj_location: vec3<f32>,
    @location(3) obj_scale: vec3<f32>,
    @location(4) obj_rotation: f32,
};

fn local_to_world(
    local: vec3<f32>,
    scale: vec3<f32>,
    rotation: f32,
    position: vec3<f32>,
) -> vec3<f32> {
    let scaled = local * scale;
    let c = cos(rotation);
    let s = sin(rotation);
    return vec3<f32>(
        scaled.x * c - scaled.y * s + position.x,
        scaled.y * c + scaled.x * s + position.y,
        scaled.z + position.z,
    );
}

@vertex
fn vs_voxel(vertex: SliceVertexInput, instance: InstanceInput) -> SliceVertexOutput {
    let slice_depth = vertex.position.z * frame.world_params.x;
    let world = local_to_world(
        vec3<f32>(vertex.position.xy, slice_depth),
        instance.obj_scale,
        instance.obj_rotation,
        instance.obj_location,
    );
    let screen = world_to_screen(
        world,
        frame.cam_look_at,
        frame.cam_params.x,
        frame.cam_params.y,
        frame.cam_params.z,
    );

    var out: SliceVertexOutput;
    out.clip_position = vec4<f32>(screen, clip_depth(world.z), 1.0);
    out.texcoord = vertex.texcoord;
    out.shadow_uv = shadow_map_uv(world);
    out.depth = world.z;
    return out;
}

@fragment
fn fs_voxel(in: SliceVertexOutput) -> DeferredOutput {
    let tex = textureSample(
        slice_texture,
        slice_sampler,
        in.texcoord.xy,
        i32(round(in.texcoord.z)),
    );
    if tex.a < 0.5 {
        discard;
    }
    var out: DeferredOutput;
    out.albedo = vec4<f32>(tex.rgb, 1.0);
    out.shadow_params = vec4<f32>(in.shadow_uv, in.depth, 1.0);
    return out;
}

@fragment
fn fs_voxel_shadow(in: SliceVertexOutput) -> @location(0) vec4<f32> {
    let tex = textureSample(
        slice_texture,
        slice_sampler,
        in.texcoord.xy,
        i32(round(in.texcoord.z)),
    );
    if tex.a < 0.5 {
        discard;
    }
    return vec4<f32>(vec3<f32>(in.depth), 1.0);
}
"#;

/// Terrain slices: each quad fills the screen at its layer's depth, and
/// the camera transform runs in reverse to find which world texel lands
/// on each fragment.
const TERRAIN_BODY: &str = r#"
fn local_to_world_texture(
    local: vec2<f32>,
    ratio: f32,
    slice_depth: f32,
    zoom: f32,
    shallowness: f32,
    look_at: vec4<f32>,
) -> vec2<f32> {
    var centered = local - vec2<f32>(0.5, 0.5);
    centered.y = centered.y * ratio;
    centered.y = centered.y - (slice_depth - look_at.z) / (zoom * shallowness);
    centered = centered * zoom;
    let c = cos(look_at.w);
    let s = sin(look_at.w);
    let rot = vec2<f32>(
        centered.x * c - centered.y * s,
        centered.y * c + centered.x * s,
    );
    return rot + look_at.xy;
}

@vertex
fn vs_terrain(vertex: SliceVertexInput) -> SliceVertexOutput {
    let slice_depth = vertex.position.z * frame.world_params.x * frame.world_params.y;
    let world_uv = local_to_world_texture(
        vertex.texcoord.xy,
        frame.cam_params.z,
        slice_depth,
        frame.cam_params.x,
        frame.cam_params.y,
        frame.cam_look_at,
    );

    var out: SliceVertexOutput;
    out.clip_position = vec4<f32>(vertex.position.xy, clip_depth(slice_depth), 1.0);
    out.texcoord = vec3<f32>(world_uv, vertex.texcoord.z);
    out.shadow_uv = shadow_map_uv(vec3<f32>(world_uv, slice_depth));
    out.depth = slice_depth;
    return out;
}

@fragment
fn fs_terrain(in: SliceVertexOutput) -> DeferredOutput {
    let tex = textureSample(
        slice_texture,
        slice_sampler,
        in.texcoord.xy,
        i32(round(in.texcoord.z)),
    );
    if !(tex.a >= 0.5) {
        discard;
    }
    var out: DeferredOutput;
    out.albedo = vec4<f32>(tex.rgb, 1.0);
    out.shadow_params = vec4<f32>(in.shadow_uv, in.depth, 1.0);
    return out;
}

@fragment
fn fs_terrain_shadow(in: SliceVertexOutput) -> @location(0) vec4<f32> {
    let tex = textureSample(
        slice_texture,
        slice_sampler,
        in.texcoord.xy,
        i32(round(in.texcoord.z)),
    );
    if !(tex.a >= 0.5) {
        discard;
    }
    return vec4<f32>(vec3<f32>(in.depth), 1.0);
}

// Water rides on the same slice geometry. The alpha of the terrain texel
// at the water layer acts as an inverse depth map for the waves.
@fragment
fn fs_water(in: SliceVertexOutput) -> DeferredOutput {
    let water_color = vec3<f32>(91.0 / 256.0, 206.0 / 256.0, 250.0 / 256.0);
    let time = frame.cam_params.w;

    let alpha = textureSample(
        slice_texture,
        slice_sampler,
        in.texcoord.xy,
        i32(round(in.texcoord.z)),
    ).a;
    var water_depth = (0.5 - alpha) / 0.5;
    water_depth = max(water_depth, 0.0);

    var wave_coeff = sin(water_depth * 30.0 - time) + 1.0;
    wave_coeff = wave_coeff * 0.5;
    wave_coeff = mix(wave_coeff, 0.0, water_depth);
    let shore = pow(1.0 - water_depth, 16.0);
    var wave = mix(wave_coeff, 1.0, shore);
    wave = select(0.0, wave * 2.0, wave > 0.6);

    var out: DeferredOutput;
    out.albedo = vec4<f32>(mix(water_color, vec3<f32>(1.0), wave), 1.0);
    out.shadow_params = vec4<f32>(in.shadow_uv, in.depth, 1.0);
    return out;
}
"#;

/// Fullscreen composite: albedo times a 7x7 PCF shadow factor.
pub const LIGHTING_SHADER: &str = r#"
struct QuadVertex {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
};

struct QuadOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_quad(vertex: QuadVertex) -> QuadOutput {
    var out: QuadOutput;
    out.clip_position = vec4<f32>(vertex.position, 0.5, 1.0);
    // Flip v so the sampled frame is upright.
    out.uv = vec2<f32>(vertex.uv.x, 1.0 - vertex.uv.y);
    return out;
}

@group(0) @binding(0) var albedo_texture: texture_2d<f32>;
@group(0) @binding(1) var shadow_parameter_texture: texture_2d<f32>;
@group(0) @binding(2) var shadow_texture: texture_2d<f32>;
@group(0) @binding(3) var pass_sampler: sampler;

@fragment
fn fs_quad(in: QuadOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(albedo_texture, pass_sampler, in.uv);
    let shadow_parameters = textureSample(shadow_parameter_texture, pass_sampler, in.uv);

    let shadow_map_coordinates = shadow_parameters.xy;
    let depth = shadow_parameters.z;

    let dims = textureDimensions(shadow_texture);
    let texel_size = vec2<f32>(1.0 / f32(dims.x), 1.0 / f32(dims.y));

    var shadow = 0.0;
    for (var x = -3; x <= 3; x = x + 1) {
        for (var y = -3; y <= 3; y = y + 1) {
            let offset = vec2<f32>(f32(x), f32(y)) * texel_size;
            let pcf_depth =
                textureSample(shadow_texture, pass_sampler, shadow_map_coordinates + offset).r;
            shadow = shadow + select(0.5, 1.0, (depth + 0.001) > pcf_depth);
        }
    }
    shadow = shadow / 49.0;

    return vec4<f32>(albedo.rgb * shadow, 1.0);
}
"#;

pub fn voxel_shader() -> String {
    [PRELUDE, VOXEL_BODY].concat()
}

pub fn terrain_shader() -> String {
    [PRELUDE, TERRAIN_BODY].concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composed_shaders_carry_their_entry_points() {
        let voxel = voxel_shader();
        assert!(voxel.contains("fn vs_voxel"));
        assert!(voxel.contains("fn fs_voxel_shadow"));
        let terrain = terrain_shader();
        assert!(terrain.contains("fn vs_terrain"));
        assert!(terrain.contains("fn fs_water"));
        assert!(LIGHTING_SHADER.contains("fn fs_quad"));
    }
}
