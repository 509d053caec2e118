use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use meadow_animation::FrameClock;
use meadow_render::{DebugTextRenderer, RenderView, Renderer};
use meadow_render_wgpu::{GpuContext, OrbitCamera, SceneRenderer};
use meadow_scene::{MeadowOptions, Scene, ScenePreset};
use meadow_terrain::PlaneSpec;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Longest frame delta fed to the camera after a stall.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "meadow-desktop", about = "Meadow scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene to show (cube or meadow)
    #[arg(long, default_value_t = ScenePreset::Meadow)]
    scene: ScenePreset,

    /// Start the character walking instead of idle
    #[arg(long)]
    moving: bool,

    /// Slowly orbit the camera around the target
    #[arg(long)]
    auto_rotate: bool,

    /// Terrain segments per side
    #[arg(long, default_value_t = 32)]
    segments: u32,
}

/// Mouse drag currently steering the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    None,
    Orbit,
    Pan,
}

impl Drag {
    fn for_button(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::Orbit,
            MouseButton::Right => Self::Pan,
            _ => Self::None,
        }
    }
}

/// Everything that is not GPU state.
struct AppState {
    preset: ScenePreset,
    scene: Scene,
    camera: OrbitCamera,
    clock: FrameClock,
    show_overlay: bool,
    drag: Drag,
    /// Adapter name and backend, once a viewport exists.
    gpu_label: Option<String>,
}

impl AppState {
    fn new(cli: &Cli) -> Result<Self> {
        let options = MeadowOptions {
            plane: PlaneSpec::square(50.0, cli.segments)?,
            moving: cli.moving,
            ..MeadowOptions::default()
        };
        let scene = Scene::from_preset(cli.scene, &options)?;
        let mut camera = OrbitCamera::from_placement(scene.camera());
        camera.auto_rotate = cli.auto_rotate;

        Ok(Self {
            preset: cli.scene,
            scene,
            camera,
            clock: FrameClock::new(),
            show_overlay: true,
            drag: Drag::None,
            gpu_label: None,
        })
    }

    /// Advance the camera and the scene to the current time.
    fn update(&mut self) {
        let (elapsed, dt) = self.clock.tick(MAX_FRAME_DELTA);
        self.camera.update(dt);
        self.scene.advance(elapsed);
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyM => {
                self.scene.toggle_moving();
                tracing::info!(moving = self.is_moving(), "gait toggled");
            }
            KeyCode::KeyR => {
                self.camera.auto_rotate = !self.camera.auto_rotate;
            }
            KeyCode::F1 => {
                self.show_overlay = !self.show_overlay;
            }
            KeyCode::F2 => {
                let view = RenderView::from(&self.camera);
                tracing::info!("\n{}", DebugTextRenderer::new().render(&self.scene, &view));
            }
            _ => {}
        }
    }

    /// Start or end a drag. Presses over the overlay are ignored, releases never are.
    fn on_mouse_button(&mut self, button: MouseButton, pressed: bool, over_ui: bool) {
        let drag = Drag::for_button(button);
        if drag == Drag::None {
            return;
        }
        if !pressed {
            if self.drag == drag {
                self.drag = Drag::None;
            }
        } else if !over_ui {
            self.drag = drag;
        }
    }

    fn on_mouse_motion(&mut self, dx: f32, dy: f32) {
        match self.drag {
            Drag::Orbit => self.camera.rotate(dx, dy),
            Drag::Pan => self.camera.pan(dx, dy),
            Drag::None => {}
        }
    }

    fn is_moving(&self) -> bool {
        self.scene.characters().any(|c| c.moving)
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }

        egui::Window::new("Meadow")
            .default_width(240.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Scene: {}", self.preset));
                if let Some(gpu) = &self.gpu_label {
                    ui.label(format!("GPU: {gpu}"));
                }
                ui.label(format!(
                    "Time: {:.2}s  Frames: {}",
                    self.scene.elapsed(),
                    self.scene.frames()
                ));
                let eye = self.camera.position();
                ui.label(format!(
                    "Camera: ({:.1}, {:.1}, {:.1})  dist {:.1}",
                    eye.x, eye.y, eye.z, self.camera.distance
                ));
                ui.separator();

                let roots: Vec<_> = self.scene.characters().map(|c| c.root).collect();
                for c in self.scene.characters() {
                    ui.label(format!(
                        "{}  offset {:+.3}  phase {:.2}",
                        c.root.short(),
                        c.offset,
                        c.animation.phase
                    ));
                }
                if !roots.is_empty() {
                    let mut moving = self.is_moving();
                    if ui.checkbox(&mut moving, "Moving (M)").changed() {
                        for root in roots {
                            if let Err(e) = self.scene.set_moving(root, moving) {
                                tracing::warn!("set_moving: {e}");
                            }
                        }
                    }
                }
                ui.checkbox(&mut self.camera.auto_rotate, "Auto-rotate (R)");

                ui.separator();
                ui.small("F1: Overlay | F2: Dump scene");
                ui.small("LMB drag: Orbit | RMB drag: Pan | Wheel: Zoom");
            });
    }
}

/// Window plus the GPU and egui state tied to it.
struct Viewport {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: SceneRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Viewport {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext, scene: &Scene) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Meadow")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height)?;
        let (width, height) = gpu.size();
        let renderer = SceneRenderer::new(&gpu.device, gpu.surface_format(), width, height, scene);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.surface_format(), None, 1, false);

        Ok(Self {
            window,
            gpu,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        let (width, height) = self.gpu.size();
        self.renderer.resize(&self.gpu.device, width, height);
    }

    fn render(&mut self, state: &mut AppState, egui_ctx: &EguiContext) {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
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

        let device = &self.gpu.device;
        let queue = &self.gpu.queue;
        self.renderer
            .render(device, queue, &view, &state.camera, &state.scene);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = self.gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        self.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct App {
    state: AppState,
    viewport: Option<Viewport>,
    egui_ctx: EguiContext,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewport.is_some() {
            return;
        }

        match Viewport::new(event_loop, &self.egui_ctx, &self.state.scene) {
            Ok(viewport) => {
                let info = viewport.gpu.adapter_info();
                self.state.gpu_label = Some(format!("{} ({})", info.name, info.backend.to_str()));
                self.state.camera.aspect = viewport.gpu.aspect();
                self.viewport = Some(viewport);
            }
            Err(e) => {
                tracing::error!("failed to start viewport: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(viewport) = self.viewport.as_mut() else {
            return;
        };

        let response = viewport
            .egui_winit
            .on_window_event(&viewport.window, &event);
        // Releases must reach the drag state even when egui took the event.
        if let WindowEvent::MouseInput { button, state, .. } = event {
            let pressed = state == ElementState::Pressed;
            self.state.on_mouse_button(button, pressed, response.consumed);
        }
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                viewport.resize(new_size.width, new_size.height);
                self.state.camera.aspect = viewport.gpu.aspect();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.state.camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => {
                self.state.update();
                viewport.render(&mut self.state, &self.egui_ctx);
                viewport.window.request_redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state.on_mouse_motion(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewport) = &self.viewport {
            viewport.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    tracing::info!(scene = %cli.scene, "meadow-desktop starting");

    let mut app = App {
        state: AppState::new(&cli)?,
        viewport: None,
        egui_ctx: EguiContext::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_state() -> AppState {
        let cli = Cli::parse_from(["meadow-desktop", "--scene", "cube"]);
        AppState::new(&cli).unwrap()
    }

    #[test]
    fn release_over_overlay_ends_drag() {
        let mut state = cube_state();
        state.on_mouse_button(MouseButton::Left, true, false);
        assert_eq!(state.drag, Drag::Orbit);

        state.on_mouse_button(MouseButton::Left, false, true);
        assert_eq!(state.drag, Drag::None);

        let azimuth = state.camera.azimuth;
        state.on_mouse_motion(40.0, 0.0);
        assert_eq!(state.camera.azimuth, azimuth);
    }

    #[test]
    fn press_over_overlay_does_not_start_drag() {
        let mut state = cube_state();
        state.on_mouse_button(MouseButton::Right, true, true);
        assert_eq!(state.drag, Drag::None);
        state.on_mouse_button(MouseButton::Middle, true, false);
        assert_eq!(state.drag, Drag::None);
    }

    #[test]
    fn right_drag_pans_and_left_drag_orbits() {
        let mut state = cube_state();
        let (target, azimuth) = (state.camera.target, state.camera.azimuth);

        state.on_mouse_button(MouseButton::Right, true, false);
        state.on_mouse_motion(30.0, 10.0);
        assert_ne!(state.camera.target, target);
        assert_eq!(state.camera.azimuth, azimuth);

        // Releasing the other button leaves the pan running.
        state.on_mouse_button(MouseButton::Left, false, false);
        assert_eq!(state.drag, Drag::Pan);
        state.on_mouse_button(MouseButton::Right, false, false);

        let target = state.camera.target;
        state.on_mouse_button(MouseButton::Left, true, false);
        state.on_mouse_motion(30.0, 0.0);
        assert_eq!(state.camera.target, target);
        assert_ne!(state.camera.azimuth, azimuth);
    }
}
