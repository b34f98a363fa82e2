//! Instanced voxel volumes: 2D array textures drawn as slice stacks.

use wgpu::util::DeviceExt;

use vibequest_common::ObjectPose;
use vibequest_worldgen::VoxelStack;

use crate::mesh::{self, InstanceData, SliceVertex};
use crate::shaders;
use crate::targets;

/// Bind group layouts shared by every slice pipeline: frame uniforms at
/// group 0, the volume texture and sampler at group 1.
pub struct SliceBindLayouts {
    pub uniforms: wgpu::BindGroupLayout,
    pub texture: wgpu::BindGroupLayout,
}

impl SliceBindLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniforms = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("slice_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2Array,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        SliceBindLayouts { uniforms, texture }
    }
}

/// Vertex layout slot 0: the slice quad corners.
pub fn slice_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SliceVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// Vertex layout slot 1: per-instance pose.
pub fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        2 => Float32x3,
        3 => Float32x3,
        4 => Float32,
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceData>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRIBUTES,
    }
}

fn depth_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: targets::DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: Default::default(),
        bias: Default::default(),
    }
}

pub struct VoxelPipelines {
    pub deferred: wgpu::RenderPipeline,
    pub shadow: wgpu::RenderPipeline,
}

impl VoxelPipelines {
    pub fn new(device: &wgpu::Device, layouts: &SliceBindLayouts) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("voxel_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::voxel_shader().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("voxel_pipeline_layout"),
            bind_group_layouts: &[&layouts.uniforms, &layouts.texture],
            push_constant_ranges: &[],
        });

        let deferred = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("voxel_deferred_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_voxel"),
                compilation_options: Default::default(),
                buffers: &[slice_vertex_layout(), instance_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_voxel"),
                compilation_options: Default::default(),
                targets: &[
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
                ],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_state()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let shadow = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("voxel_shadow_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_voxel"),
                compilation_options: Default::default(),
                buffers: &[slice_vertex_layout(), instance_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_voxel_shadow"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: targets::SHADOW_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_state()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        VoxelPipelines { deferred, shadow }
    }
}

/// Upload a voxel stack as a 2D array texture, one layer per level.
pub fn upload_stack(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    stack: &VoxelStack,
    label: &str,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: stack.width(),
            height: stack.length(),
            depth_or_array_layers: stack.level_count(),
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    for layer in 0..stack.level_count() {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: layer,
                },
                aspect: wgpu::TextureAspect::All,
            },
            stack.layer(layer),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(stack.width() * 4),
                rows_per_image: Some(stack.length()),
            },
            wgpu::Extent3d {
                width: stack.width(),
                height: stack.length(),
                depth_or_array_layers: 1,
            },
        );
    }
    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        dimension: Some(wgpu::TextureViewDimension::D2Array),
        ..Default::default()
    });
    (texture, view)
}

pub fn volume_sampler(device: &wgpu::Device, smooth: bool) -> wgpu::Sampler {
    let filter = if smooth {
        wgpu::FilterMode::Linear
    } else {
        wgpu::FilterMode::Nearest
    };
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("volume_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        ..Default::default()
    })
}

/// A voxel volume plus the poses it is stamped at.
pub struct InstancedVoxelModel {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    instance_buffer: Option<wgpu::Buffer>,
    instance_count: u32,
}

impl InstancedVoxelModel {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &SliceBindLayouts,
        stack: &VoxelStack,
        smooth: bool,
        label: &str,
    ) -> Self {
        let (texture, view) = upload_stack(device, queue, stack, label);
        let sampler = volume_sampler(device, smooth);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
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

        let vertices = mesh::slice_vertices(stack.level_count());
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        InstancedVoxelModel {
            texture,
            bind_group,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            instance_buffer: None,
            instance_count: 0,
        }
    }

    pub fn set_poses(&mut self, device: &wgpu::Device, poses: &[ObjectPose]) {
        self.instance_count = poses.len() as u32;
        if poses.is_empty() {
            self.instance_buffer = None;
            return;
        }
        let instances = mesh::instances_from_poses(poses);
        self.instance_buffer = Some(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("voxel_instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
    }

    pub fn draw<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) {
        let Some(instance_buffer) = &self.instance_buffer else {
            return;
        };
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, instance_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..self.instance_count);
    }

    /// Free the texture eagerly instead of waiting for the handle to drop.
    pub fn destroy(&self) {
        self.texture.destroy();
    }
}
