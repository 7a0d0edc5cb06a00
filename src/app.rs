use std::path::PathBuf;
use std::sync::Arc;

use cgmath::Vector3;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::asset::AssetLoader;
use crate::gfx::{camera::StageCamera, render_engine::RenderEngine, scene::Model, scene::Scene};
use crate::scroll::{ScrollPolicy, ScrollReactor};
use crate::timing::FrameClock;

/// Pixels of scroll per mouse wheel line.
const LINE_HEIGHT: f32 = 40.0;

pub struct ScrollStageApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    loader: AssetLoader,
    reactor: ScrollReactor,
    clock: FrameClock,
    viewport_height: f32,
}

impl ScrollStageApp {
    /// Create a new stage with the default showcase scroll sections.
    pub fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        let scene = Scene::new(StageCamera::new(1200.0 / 800.0));

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                scene,
                loader: AssetLoader::new(),
                reactor: ScrollReactor::showcase(),
                clock: FrameClock::new(),
                viewport_height: 800.0,
            },
        }
    }

    /// Replace the scroll policy. Call before `run`.
    pub fn set_scroll_policy(&mut self, policy: ScrollPolicy) {
        self.app_state.reactor = ScrollReactor::new(policy);
    }

    /// Request a model by file path and start loading it in the background.
    /// The scale and position apply when the load resolves.
    pub fn add_model(&mut self, path: impl Into<PathBuf>, scale: f32, position: Vector3<f32>) {
        let path = path.into();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        self.app_state.scene.reserve_slot(&name, scale, position);
        self.app_state.loader.request(&name, path);
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl Default for ScrollStageApp {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Joins finished background loads into the scene.
    fn drain_loader(&mut self) {
        let Some(render_engine) = self.render_engine.as_ref() else {
            return;
        };

        for (name, result) in self.loader.poll() {
            match result {
                Ok(data) => {
                    let Some((scale, position)) = self.scene.pending_params(&name) else {
                        continue;
                    };
                    let mut model = Model::from_data(&name, data, scale, position);
                    if self.reactor.policy().is_eased() {
                        model.enable_idle_motion();
                    }
                    model.init_gpu_resources(
                        render_engine.device(),
                        render_engine.transform_bind_group_layout(),
                    );
                    log::info!("model '{name}' joined the scene");
                    self.scene.fulfil_slot(model);
                }
                Err(err) => {
                    log::warn!("model '{name}' failed to load: {err}");
                    self.scene.fail_slot(&name);
                }
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("scrollstage")
                .with_transparent(true)
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();
            self.viewport_height = height as f32;
            self.scene.camera.resize_projection(width, height);

            let window_clone = window_handle.clone();
            let renderer = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height).await
            });

            self.render_engine = Some(renderer);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.viewport_height = height as f32;
                self.scene.camera.resize_projection(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Wheel-up is positive in winit; page offsets grow downward
                let pixels = match delta {
                    MouseScrollDelta::LineDelta(_, lines) => -lines * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
                self.reactor
                    .handle_scroll(pixels, self.viewport_height, &mut self.scene);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.drain_loader();

                let dt = self.clock.tick();
                self.scene.advance(dt);

                let Some(render_engine) = self.render_engine.as_mut() else {
                    return;
                };
                self.scene.update_transforms(render_engine.queue());
                self.scene.camera.update_view_proj();
                render_engine.update(self.scene.camera.uniform, &self.scene.lighting);
                render_engine.render_frame(&self.scene);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
