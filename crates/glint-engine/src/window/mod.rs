//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the GL window, and wires them to the app
//! and the GUI painter.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
