use std::fs;

use crate::SceneAssets;

pub const BASIC_SHADER: &str = include_str!("../../glint-studio/res/shaders/basic.shader");
pub const COLOR_SHADER: &str = include_str!("../../glint-studio/res/shaders/color.shader");

/// Temporary asset root holding the shipped shaders and no textures.
pub fn write_assets() -> (tempfile::TempDir, SceneAssets) {
    let dir = tempfile::tempdir().expect("temp dir");
    let assets = SceneAssets::new(dir.path());
    fs::create_dir_all(assets.root().join("shaders")).expect("shaders dir");
    fs::write(assets.shader("basic.shader"), BASIC_SHADER).expect("basic.shader");
    fs::write(assets.shader("color.shader"), COLOR_SHADER).expect("color.shader");
    (dir, assets)
}
