use anyhow::Result;
use clap::Parser;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use vibequest_common::PointerEvent;
use vibequest_game::render::frame_slot;
use vibequest_game::{
    FrameContext, FrameSlot, RenderCeptor, SongCatalogCeptor, WorldBuilderCeptor,
    interceptor_stack,
};
use vibequest_store::{Action, PropSink, PropValue, State, Store, map_to_props, reduce};

const ZOOM_MIN: f32 = 0.1;
const ZOOM_MAX: f32 = 2.0;

#[derive(Parser)]
#[command(name = "vibequest-desktop", about = "Vibe quest island desktop application")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiz backend base URL
    #[arg(long, default_value = "http://localhost:5000")]
    api_base: String,

    /// Run with the built-in demo catalog instead of a backend
    #[arg(long)]
    offline: bool,
}

/// Logs derived view attributes. The modal text lands in the terminal, so
/// the quiz is playable from the keyboard without any widget layer.
struct TracingPropSink;

impl PropSink for TracingPropSink {
    fn set_attribute(&mut self, key: &str, value: &PropValue) {
        match value {
            PropValue::Number(number) => tracing::info!(key, value = number, "view attribute"),
            PropValue::Flag(flag) => tracing::info!(key, value = flag, "view attribute"),
            PropValue::Text(text) => tracing::info!(key, value = text, "view attribute"),
            PropValue::TextList(items) => {
                tracing::info!(key, value = items.join(" | "), "view attribute");
            }
        }
    }
}

fn view_bindings() -> Vec<(&'static str, Box<dyn Fn(&State) -> PropValue>)> {
    vec![
        (
            "point-count",
            Box::new(|state: &State| PropValue::Number(state.point_count as f64)),
        ),
        (
            "window-active",
            Box::new(|state: &State| PropValue::Flag(state.view_modal.active)),
        ),
        (
            "song-name",
            Box::new(|state: &State| PropValue::Text(state.view_modal.song_name.clone())),
        ),
        (
            "song-artist",
            Box::new(|state: &State| PropValue::Text(state.view_modal.artist.clone())),
        ),
        (
            "song-lyrics",
            Box::new(|state: &State| PropValue::Text(state.view_modal.lyrics.clone())),
        ),
        (
            "category-choices",
            Box::new(|state: &State| PropValue::TextList(state.view_modal.choices.clone())),
        ),
        (
            "song-done",
            Box::new(|state: &State| PropValue::Flag(state.view_modal.done.is_some())),
        ),
        (
            "song-points",
            Box::new(|state: &State| PropValue::Number(state.view_modal.points as f64)),
        ),
        (
            "points-of-interest",
            Box::new(|state: &State| {
                PropValue::TextList(
                    state
                        .points_of_interest
                        .iter()
                        .map(|poi| poi.label.clone())
                        .collect(),
                )
            }),
        ),
    ]
}

struct GpuApp {
    api_base: String,
    offline: bool,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<Rc<wgpu::Device>>,
    config: Option<wgpu::SurfaceConfiguration>,
    store: Option<Store>,
    worker_rx: Option<Receiver<Action>>,
    frame: FrameSlot,
    cursor: (f32, f32),
    buttons: u32,
    last_frame: Instant,
}

impl GpuApp {
    fn new(api_base: String, offline: bool) -> Self {
        Self {
            api_base,
            offline,
            window: None,
            surface: None,
            device: None,
            config: None,
            store: None,
            worker_rx: None,
            frame: frame_slot(),
            cursor: (0.0, 0.0),
            buttons: 0,
            last_frame: Instant::now(),
        }
    }

    fn pointer(&self) -> PointerEvent {
        PointerEvent {
            buttons: self.buttons,
            x: self.cursor.0,
            y: self.cursor.1,
        }
    }

    fn dispatch(&mut self, action: Action) {
        if let Some(store) = &mut self.store {
            store.dispatch(action);
        }
    }

    /// Worker threads report back over the channel; replay their results
    /// through the chain before the next frame.
    fn drain_worker_results(&mut self) {
        let Some(rx) = &self.worker_rx else {
            return;
        };
        let mut pending = Vec::new();
        while let Ok(action) = rx.try_recv() {
            pending.push(action);
        }
        for action in pending {
            self.dispatch(action);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let digit = match key {
            KeyCode::Digit1 => Some(0),
            KeyCode::Digit2 => Some(1),
            KeyCode::Digit3 => Some(2),
            KeyCode::Digit4 => Some(3),
            KeyCode::Digit5 => Some(4),
            KeyCode::Digit6 => Some(5),
            KeyCode::Digit7 => Some(6),
            KeyCode::Digit8 => Some(7),
            KeyCode::Digit9 => Some(8),
            _ => None,
        };

        if let Some(index) = digit {
            let modal_open = self
                .store
                .as_ref()
                .is_some_and(|store| store.state.view_modal.active);
            if modal_open {
                self.dispatch(Action::ChooseCategory(index));
            } else {
                self.dispatch(Action::StartFocusPoiAnimation(index));
            }
            return;
        }

        match key {
            KeyCode::Escape => self.dispatch(Action::CloseGameModal),
            KeyCode::KeyR => self.dispatch(Action::RebuildWorld),
            _ => {}
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Vibe Quest")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("vibequest_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let device = Rc::new(device);
        let queue = Rc::new(queue);

        let (tx, rx) = mpsc::channel();
        let render = RenderCeptor::new(
            device.clone(),
            queue.clone(),
            surface_format,
            self.frame.clone(),
        );
        let chain = interceptor_stack(
            WorldBuilderCeptor::new(),
            render,
            SongCatalogCeptor::new(self.api_base.clone(), self.offline, tx),
        );
        let mut store = Store::new(State::default(), chain, reduce);
        map_to_props(
            &mut store,
            Rc::new(RefCell::new(TracingPropSink)),
            view_bindings(),
        );

        store.dispatch(Action::ChangeWindowSize([config.width, config.height]));
        store.dispatch(Action::LoadSongs);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.config = Some(config);
        self.store = Some(store);
        self.worker_rx = Some(rx);
        self.last_frame = Instant::now();

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                }
                self.dispatch(Action::ChangeWindowSize([
                    new_size.width.max(1),
                    new_size.height.max(1),
                ]));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.handle_key(key);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                self.dispatch(Action::MoveMouseDrag(self.pointer()));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let bit = match button {
                    MouseButton::Left => 1,
                    MouseButton::Right => 2,
                    _ => 0,
                };
                if bit == 0 {
                    return;
                }
                // The drag stage reads the post-transition button mask.
                if state == ElementState::Pressed {
                    self.buttons |= bit;
                    self.dispatch(Action::StartMouseDrag(self.pointer()));
                } else {
                    self.buttons &= !bit;
                    self.dispatch(Action::StopMouseDrag(self.pointer()));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / 40.0,
                };
                if let Some(store) = &self.store {
                    let zoom = (store.state.viewing_camera.zoom - scroll * 0.1)
                        .clamp(ZOOM_MIN, ZOOM_MAX);
                    self.dispatch(Action::ChangeViewingCameraZoom(zoom));
                }
            }
            WindowEvent::RedrawRequested => {
                self.drain_worker_results();

                let now = Instant::now();
                let delta = (now - self.last_frame).as_secs_f32().min(0.1);
                self.last_frame = now;

                let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &self.config)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        surface.configure(device, config);
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                *self.frame.borrow_mut() = Some(FrameContext {
                    view,
                    width: config.width,
                    height: config.height,
                });

                self.dispatch(Action::Render(delta));
                self.frame.borrow_mut().take();

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("vibequest-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(cli.api_base, cli.offline);
    event_loop.run_app(&mut app)?;

    Ok(())
}
