//! Demo scene framework.
//!
//! A [`SceneMenu`] owns a registry of named scene factories and at most one
//! active scene; [`SceneApp`] plugs the menu into the engine runtime.

mod app;
mod assets;
mod error;
mod menu;
mod scene;
pub mod scenes;

#[cfg(test)]
mod test_support;

pub use app::{BACKGROUND, SceneApp};
pub use assets::SceneAssets;
pub use error::SceneError;
pub use menu::{BACK_LABEL, SceneMenu};
pub use scene::{Scene, SceneFactory};
