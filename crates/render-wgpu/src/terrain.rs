//! Terrain slice rendering: inverse-mapped fullscreen quads plus the
//! water plane.

use wgpu::util::DeviceExt;

use vibequest_worldgen::Terrain;

use crate::mesh;
use crate::shaders;
use crate::targets;
use crate::voxel::{SliceBindLayouts, slice_vertex_layout, upload_stack, volume_sampler};

pub struct TerrainPipelines {
    pub deferred: wgpu::RenderPipeline,
    pub water: wgpu::RenderPipeline,
    pub shadow: wgpu::RenderPipeline,
}

impl TerrainPipelines {
    pub fn new(device: &wgpu::Device, layouts: &SliceBindLayouts) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("terrain_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::terrain_shader().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("terrain_pipeline_layout"),
            bind_group_layouts: &[&layouts.uniforms, &layouts.texture],
            push_constant_ranges: &[],
        });

        let depth = wgpu::DepthStencilState {
            format: targets::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        };

        let deferred_targets = [
            Some(wgpu::ColorTargetState {
                format: targets::ALBEDO_FORMAT,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            }),
            Some(wgpu::ColorTargetState {
                format: targets::SHADOW_PARAMS_FORMAT,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            }),
        ];

        let make = |label: &str, fs: &str, fragment_targets: &[Option<wgpu::ColorTargetState>]| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_terrain"),
                    compilation_options: Default::default(),
                    buffers: &[slice_vertex_layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    compilation_options: Default::default(),
                    targets: fragment_targets,
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(depth.clone()),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };

        let deferred = make("terrain_deferred_pipeline", "fs_terrain", &deferred_targets);
        let water = make("terrain_water_pipeline", "fs_water", &deferred_targets);
        let shadow = make(
            "terrain_shadow_pipeline",
            "fs_terrain_shadow",
            &[Some(wgpu::ColorTargetState {
                format: targets::SHADOW_FORMAT,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        );

        TerrainPipelines {
            deferred,
            water,
            shadow,
        }
    }
}

/// GPU mirror of a generated [`Terrain`].
pub struct TerrainModel {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    water_vertex_offset: u32,
    pub levels: u32,
    pub height_scale: f32,
}

impl TerrainModel {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &SliceBindLayouts,
        terrain: &Terrain,
    ) -> Self {
        let stack = &terrain.stack;
        let (texture, view) = upload_stack(device, queue, stack, "terrain_volume");
        let sampler = volume_sampler(device, true);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain_volume"),
            layout: &layouts.texture,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let levels = stack.level_count();
        let vertices = mesh::slice_vertices(levels);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain_slices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // The water plane reuses the slice quad closest to the water line.
        let water_vertex_offset =
            ((1.0 - terrain.water_level) * levels as f32).round() as u32 * 6;

        TerrainModel {
            texture,
            bind_group,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            water_vertex_offset,
            levels,
            height_scale: terrain.height_scale,
        }
    }

    /// Draw every terrain slice with the bound pipeline.
    pub fn draw<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }

    /// Draw only the water plane quad; the pipeline must already be the
    /// water pipeline.
    pub fn draw_water<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(self.water_vertex_offset..self.water_vertex_offset + 6, 0..1);
    }

    pub fn destroy(&self) {
        self.texture.destroy();
    }
}
