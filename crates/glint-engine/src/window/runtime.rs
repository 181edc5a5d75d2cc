use std::rc::Rc;

use anyhow::{Context, Result};
use egui_glow::EguiGlow;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gl, GlInit, GlWindow, GlowApi, GraphicsApi};
use crate::render::Renderer;
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            initial_size: LogicalSize::new(960.0, 540.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, creates the GL context, builds the app with `build`
    /// and drives it until the window closes.
    ///
    /// Returns `Err` if the window, the context or the app cannot be created.
    pub fn run<A, F>(config: RuntimeConfig, gl_init: GlInit, build: F) -> Result<()>
    where
        A: App + 'static,
        F: FnOnce(Gl) -> Result<A>,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState {
            config,
            gl_init,
            build: Some(build),
            running: None,
            startup_error: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Everything that exists once the context is up.
///
/// Field order is drop order: the app's GL objects go first, the window (and
/// with it the context) last.
struct Running<A> {
    app: A,
    egui: EguiGlow,
    renderer: Renderer,
    clock: FrameClock,
    window: GlWindow,
}

impl<A: App> Running<A> {
    fn start<F>(
        event_loop: &ActiveEventLoop,
        config: &RuntimeConfig,
        gl_init: &GlInit,
        build: F,
    ) -> Result<Self>
    where
        F: FnOnce(Gl) -> Result<A>,
    {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window =
            GlWindow::new(event_loop, attrs, gl_init).context("failed to create GL window")?;

        let api = GlowApi::new(window.gl().clone());
        log::info!("OpenGL {}", api.version());
        let gl: Gl = Rc::new(api);

        let renderer = Renderer::new(&gl);
        let size = window.size();
        renderer.set_viewport(size.width, size.height);

        let app = build(gl).context("failed to build application")?;
        let egui = EguiGlow::new(event_loop, window.gl().clone(), None, None, true);

        Ok(Self {
            app,
            egui,
            renderer,
            clock: FrameClock::new(),
            window,
        })
    }

    fn redraw(&mut self) -> Result<AppControl> {
        let size = self.window.size();
        let mut ctx = FrameCtx {
            renderer: &self.renderer,
            time: self.clock.tick(),
            size: (size.width, size.height),
        };
        let control = self.app.on_frame(&mut ctx);

        let app = &mut self.app;
        self.egui.run(self.window.window(), |egui_ctx| app.on_gui(egui_ctx));
        self.egui.paint(self.window.window());

        self.window.window().pre_present_notify();
        self.window.swap_buffers()?;
        Ok(control)
    }
}

impl<A> Drop for Running<A> {
    fn drop(&mut self) {
        self.egui.destroy();
    }
}

struct RuntimeState<A, F> {
    config: RuntimeConfig,
    gl_init: GlInit,
    build: Option<F>,
    running: Option<Running<A>>,
    startup_error: Option<anyhow::Error>,
}

impl<A, F> ApplicationHandler for RuntimeState<A, F>
where
    A: App + 'static,
    F: FnOnce(Gl) -> Result<A>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        let Some(build) = self.build.take() else {
            return;
        };

        match Running::start(event_loop, &self.config, &self.gl_init, build) {
            Ok(running) => {
                running.window.window().request_redraw();
                self.running = Some(running);
            }
            Err(err) => {
                log::error!("startup failed: {err:#}");
                self.startup_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; scenes animate every frame.
        if let Some(running) = &self.running {
            running.window.window().request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        let response = running.egui.on_window_event(running.window.window(), &event);
        if response.repaint {
            running.window.window().request_redraw();
        }

        let mut control = AppControl::Continue;
        match &event {
            WindowEvent::CloseRequested => control = AppControl::Exit,

            WindowEvent::Resized(size) => {
                running.window.resize();
                running.renderer.set_viewport(size.width, size.height);
                running.app.on_resize(size.width, size.height);
            }

            WindowEvent::RedrawRequested => match running.redraw() {
                Ok(c) => control = c,
                Err(err) => {
                    log::error!("frame failed: {err:#}");
                    control = AppControl::Exit;
                }
            },

            _ => {}
        }

        if !response.consumed && control == AppControl::Continue {
            control = running.app.on_window_event(&event);
        }

        if control == AppControl::Exit {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Release GL objects while the context is still current.
        self.running = None;
    }
}
