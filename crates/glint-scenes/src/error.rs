use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no scene named '{0}' is registered")]
    UnknownScene(String),

    #[error("failed to build scene '{name}'")]
    Build {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}
