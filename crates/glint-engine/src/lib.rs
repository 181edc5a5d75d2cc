//! Glint engine crate.
//!
//! Thin layer over a stateful, handle-based graphics API: resource wrappers
//! with scoped ownership, a shader program with uniform caching, a stateless
//! draw facade, and the window/context runtime that drives an [`core::App`].

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;

/// GUI crate re-exported so apps use the same version as the runtime.
pub use egui;
