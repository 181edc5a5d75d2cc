use std::path::{Path, PathBuf};

/// Location of the scene resources (`shaders/`, `textures/`).
#[derive(Debug, Clone)]
pub struct SceneAssets {
    pub root: PathBuf,
}

impl SceneAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// First candidate that exists on disk, or the first candidate if none do.
    pub fn first_existing<I, P>(candidates: I) -> Option<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let candidates: Vec<PathBuf> = candidates.into_iter().map(Into::into).collect();
        let root = candidates
            .iter()
            .find(|p| p.is_dir())
            .or_else(|| candidates.first())?;
        Some(Self::new(root.clone()))
    }

    pub fn shader(&self, file: &str) -> PathBuf {
        self.root.join("shaders").join(file)
    }

    pub fn texture(&self, file: &str) -> PathBuf {
        self.root.join("textures").join(file)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for SceneAssets {
    fn default() -> Self {
        Self::new("res")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_subdirectories() {
        let assets = SceneAssets::new("/data");
        assert_eq!(assets.shader("basic.shader"), Path::new("/data/shaders/basic.shader"));
        assert_eq!(assets.texture("logo.png"), Path::new("/data/textures/logo.png"));
    }

    #[test]
    fn prefers_an_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let assets = SceneAssets::first_existing([missing.clone(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(assets.root(), dir.path());

        let fallback = SceneAssets::first_existing([missing.clone()]).unwrap();
        assert_eq!(fallback.root(), missing);

        assert!(SceneAssets::first_existing(Vec::<PathBuf>::new()).is_none());
    }
}
