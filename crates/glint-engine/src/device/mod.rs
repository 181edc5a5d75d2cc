//! Graphics API abstraction and GL context management.
//!
//! This module is responsible for:
//! - the handle-based `GraphicsApi` trait consumed by the render layer
//! - the `glow` backend and, behind the `headless` feature, a software backend
//! - debug-build error checking around every GL call
//! - creating the window + GL context pair

pub mod api;
mod check;
mod context;
mod glow_api;
#[cfg(any(test, feature = "headless"))]
mod headless;
mod init;

pub use api::{
    AttribPointer, BufferHandle, BufferTarget, BufferUsage, ElementType, Gl, GraphicsApi,
    PixelFormat, ProgramHandle, ShaderHandle, ShaderStage, TextureHandle, VertexArrayHandle,
    element_type_for_gl, error_code,
};
pub use check::{checked, checked_release, drain_errors};
pub use context::GlWindow;
pub use glow_api::GlowApi;
#[cfg(any(test, feature = "headless"))]
pub use headless::{AttribSlot, DrawCall, HeadlessApi, UniformValue};
pub use init::GlInit;
