use std::process::ExitCode;

use anyhow::{Context, Result};
use glint_engine::device::GlInit;
use glint_engine::logging::{LoggingConfig, init_logging};
use glint_engine::window::{Runtime, RuntimeConfig};
use glint_scenes::scenes::register_builtin_scenes;
use glint_scenes::{SceneApp, SceneAssets, SceneMenu};

fn run() -> Result<()> {
    // Running from the workspace root or from this crate both find `res/`.
    let candidates = ["res", concat!(env!("CARGO_MANIFEST_DIR"), "/res")];
    let assets = SceneAssets::first_existing(candidates).unwrap_or_default();
    log::info!("assets: {}", assets.root().display());

    Runtime::run(RuntimeConfig::default(), GlInit::default(), move |gl| {
        let mut menu = SceneMenu::new();
        register_builtin_scenes(&mut menu, &gl, &assets);
        Ok(SceneApp::new(menu))
    })
    .context("glint studio failed")
}

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
