use std::ffi::CStr;
use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::{Display, DisplayApiPreference, GetGlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::GlWindow as _;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawWindowHandle};
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use super::GlInit;

/// A window together with the GL context that renders into it.
///
/// The context is made current on creation and stays current on the creating
/// thread for the lifetime of this value.
pub struct GlWindow {
    // Field order is drop order: surface and context go before the window.
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    gl: Arc<glow::Context>,
    window: Window,
}

impl GlWindow {
    /// Creates the window, picks a framebuffer config, creates a context and
    /// makes it current.
    pub fn new(
        event_loop: &ActiveEventLoop,
        attrs: WindowAttributes,
        init: &GlInit,
    ) -> Result<Self> {
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        let raw_window = window
            .window_handle()
            .context("window has no native handle")?
            .as_raw();
        let raw_display = event_loop
            .display_handle()
            .context("event loop has no native display handle")?
            .as_raw();

        // SAFETY: the display handle comes from the live event loop.
        let display = unsafe { Display::new(raw_display, display_preference(raw_window)) }
            .context("failed to create GL display")?;

        let template = ConfigTemplateBuilder::new()
            .prefer_hardware_accelerated(Some(true))
            .compatible_with_native_window(raw_window)
            .build();
        let prefer_srgb = init.prefer_srgb;
        // SAFETY: `raw_window` belongs to `window`, which outlives the display.
        let configs = unsafe { display.find_configs(template) }
            .context("failed to query GL framebuffer configs")?;
        let config = pick_best(configs, |c| {
            (prefer_srgb && c.srgb_capable(), std::cmp::Reverse(c.num_samples()))
        })
        .context("failed to pick a GL framebuffer config")?;

        log::debug!(
            "GL config: srgb={} samples={} hw={}",
            config.srgb_capable(),
            config.num_samples(),
            config.hardware_accelerated()
        );

        let (major, minor) = init.gl_version;
        let profile = if init.core_profile {
            GlProfile::Core
        } else {
            GlProfile::Compatibility
        };
        let desktop = ContextAttributesBuilder::new()
            .with_profile(profile)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_window));
        let gles = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(Some(Version::new(3, 0))))
            .build(Some(raw_window));

        // SAFETY: `raw_window` belongs to `window`, which outlives the context.
        let not_current = unsafe { display.create_context(&config, &desktop) }
            .or_else(|err| {
                log::warn!("OpenGL {major}.{minor} context unavailable ({err}); trying GLES 3.0");
                unsafe { display.create_context(&config, &gles) }
            })
            .context("failed to create GL context")?;

        let surface_attrs = window
            .build_surface_attributes(
                SurfaceAttributesBuilder::<WindowSurface>::new().with_srgb(Some(prefer_srgb)),
            )
            .context("failed to describe window surface")?;
        // SAFETY: as above, the surface is dropped before the window.
        let surface = unsafe { display.create_window_surface(&config, &surface_attrs) }
            .context("failed to create window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make GL context current")?;

        let interval = if init.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            log::warn!("could not set swap interval: {err}");
        }

        // SAFETY: the context is current on this thread.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        };

        Ok(Self {
            surface,
            context,
            gl: Arc::new(gl),
            window,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Function table of the current context.
    pub fn gl(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    /// Drawable size in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    /// Resizes the surface to the window's current inner size.
    ///
    /// Zero-sized windows (minimized) are ignored.
    pub fn resize(&self) {
        self.window.resize_surface(&self.surface, &self.context);
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")
    }

    pub fn get_proc_address(&self, name: &CStr) -> *const std::ffi::c_void {
        self.context.display().get_proc_address(name)
    }
}

#[cfg(target_os = "windows")]
fn display_preference(window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::WglThenEgl(Some(window))
}

#[cfg(target_os = "macos")]
fn display_preference(_window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn display_preference(_window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Egl
}

/// Highest-ranked config by `rank`; an empty candidate list is an error.
fn pick_best<C, K: Ord>(
    configs: impl Iterator<Item = C>,
    rank: impl FnMut(&C) -> K,
) -> Result<C> {
    configs
        .max_by_key(rank)
        .ok_or_else(|| anyhow!("no framebuffer config matches the window"))
}
