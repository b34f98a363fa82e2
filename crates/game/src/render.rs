//! Render stage: consumes render ticks and draws the three passes.
//!
//! GPU resources never live in the state tree. The host parks the current
//! surface view in a shared [`FrameSlot`] before dispatching the tick;
//! this stage takes it, mirrors the world through its [`GraphicsArena`],
//! and draws shadow, deferred, and lighting passes.

use std::cell::RefCell;
use std::rc::Rc;

use bytemuck::Zeroable;
use vibequest_common::config;
use vibequest_render_wgpu::voxel::SliceBindLayouts;
use vibequest_render_wgpu::{
    Camera, DeferredTarget, FrameUniforms, GraphicsArena, LightingPass, ShadowTarget,
    TerrainPipelines, VoxelPipelines,
};
use vibequest_store::{Action, Interceptor, Store};
use wgpu::util::DeviceExt;

/// The surface view to draw into this tick.
pub struct FrameContext {
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

/// Hand-off slot between the host event loop and the render stage.
pub type FrameSlot = Rc<RefCell<Option<FrameContext>>>;

pub fn frame_slot() -> FrameSlot {
    Rc::new(RefCell::new(None))
}

pub struct RenderCeptor {
    device: Rc<wgpu::Device>,
    queue: Rc<wgpu::Queue>,
    frame: FrameSlot,
    layouts: SliceBindLayouts,
    terrain_pipelines: TerrainPipelines,
    voxel_pipelines: VoxelPipelines,
    lighting: LightingPass,
    shadow_target: ShadowTarget,
    deferred_target: DeferredTarget,
    viewing_uniforms: wgpu::Buffer,
    viewing_bind_group: wgpu::BindGroup,
    shadow_uniforms: wgpu::Buffer,
    shadow_bind_group: wgpu::BindGroup,
    arena: GraphicsArena,
    water_time: f32,
}

impl RenderCeptor {
    pub fn new(
        device: Rc<wgpu::Device>,
        queue: Rc<wgpu::Queue>,
        surface_format: wgpu::TextureFormat,
        frame: FrameSlot,
    ) -> Self {
        let layouts = SliceBindLayouts::new(&device);
        let terrain_pipelines = TerrainPipelines::new(&device, &layouts);
        let voxel_pipelines = VoxelPipelines::new(&device, &layouts);
        let lighting = LightingPass::new(&device, surface_format);

        let shadow_target = ShadowTarget::new(&device, config::SHADOW_MAP_WIDTH);
        let [deferred_width, deferred_height] = config::DEFERRED_BUFFER_RESOLUTION;
        let deferred_target = DeferredTarget::new(&device, deferred_width, deferred_height);

        let make_uniforms = |label: &str| {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(&FrameUniforms::zeroed()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &layouts.uniforms,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            (buffer, bind_group)
        };
        let (viewing_uniforms, viewing_bind_group) = make_uniforms("viewing_uniforms");
        let (shadow_uniforms, shadow_bind_group) = make_uniforms("shadow_uniforms");

        RenderCeptor {
            device,
            queue,
            frame,
            layouts,
            terrain_pipelines,
            voxel_pipelines,
            lighting,
            shadow_target,
            deferred_target,
            viewing_uniforms,
            viewing_bind_group,
            shadow_uniforms,
            shadow_bind_group,
            arena: GraphicsArena::new(),
            water_time: 0.0,
        }
    }

    fn render_frame(&self, store: &Store, frame: &FrameContext) {
        let Some(terrain) = self.arena.terrain() else {
            return;
        };
        let Some(trees) = self.arena.trees() else {
            return;
        };

        let camera = Camera::from(&store.state.viewing_camera);
        let shadow_camera = camera.shadow_rig();

        let height_to_width_ratio = frame.height as f32 / frame.width.max(1) as f32;
        let viewing = FrameUniforms::for_viewing(
            &camera,
            &shadow_camera,
            height_to_width_ratio,
            self.water_time,
            terrain.levels,
            terrain.height_scale,
        );
        let shadow = FrameUniforms::for_shadow(&shadow_camera, terrain.levels, terrain.height_scale);
        self.queue
            .write_buffer(&self.viewing_uniforms, 0, bytemuck::bytes_of(&viewing));
        self.queue
            .write_buffer(&self.shadow_uniforms, 0, bytemuck::bytes_of(&shadow));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.shadow_target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_bind_group(0, &self.shadow_bind_group, &[]);

            pass.set_pipeline(&self.terrain_pipelines.shadow);
            terrain.draw(&mut pass);

            pass.set_pipeline(&self.voxel_pipelines.shadow);
            trees.draw(&mut pass);
            for tower in self.arena.towers() {
                tower.draw(&mut pass);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("deferred_pass"),
                color_attachments: &[
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.deferred_target.albedo_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.deferred_target.params_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                ],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.deferred_target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_bind_group(0, &self.viewing_bind_group, &[]);

            pass.set_pipeline(&self.terrain_pipelines.deferred);
            terrain.draw(&mut pass);
            pass.set_pipeline(&self.terrain_pipelines.water);
            terrain.draw_water(&mut pass);

            pass.set_pipeline(&self.voxel_pipelines.deferred);
            trees.draw(&mut pass);
            for tower in self.arena.towers() {
                tower.draw(&mut pass);
            }
        }

        self.lighting.render(
            &self.device,
            &mut encoder,
            &frame.view,
            &self.deferred_target.albedo_view,
            &self.deferred_target.params_view,
            &self.shadow_target.view,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl Interceptor for RenderCeptor {
    fn intercept(&mut self, action: Action, store: &mut Store) -> Option<Action> {
        let Action::Render(delta) = action else {
            return Some(action);
        };
        let Some(frame) = self.frame.borrow_mut().take() else {
            return None;
        };

        self.arena
            .sync(&self.device, &self.queue, &self.layouts, &store.state.world);
        if !self.arena.ready() {
            return None;
        }

        self.water_time += delta * 2.0;
        self.render_frame(store, &frame);
        None
    }
}
