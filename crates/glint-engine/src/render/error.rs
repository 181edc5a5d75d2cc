use std::path::PathBuf;

use thiserror::Error;

use crate::device::ShaderStage;

/// Failure to create or fill a GPU object.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },

    #[error("invalid pixel data: {0}")]
    InvalidPixels(String),
}

/// Failure to build a [`ShaderProgram`](super::ShaderProgram).
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("shader program failed to link:\n{log}")]
    Link { log: String },

    #[error(transparent)]
    Allocation(#[from] GpuError),
}
