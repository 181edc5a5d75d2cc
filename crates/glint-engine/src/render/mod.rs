//! GPU resource wrappers and the draw facade.
//!
//! Every wrapper owns exactly one GL object and deletes it on drop. Calls act
//! on the current bindings; callers bind, configure, then draw, in that order.
//!
//! Convention:
//! - all state-mutating GL calls go through `device::checked`
//! - creation returns `Result`, drawing does not

mod buffer;
mod error;
mod layout;
mod renderer;
mod shader;
mod shader_source;
mod texture;
mod vertex_array;

pub use buffer::{IndexBuffer, VertexBuffer};
pub use error::{GpuError, ShaderError};
pub use layout::{AttributeElement, AttributeLayout, VertexComponent};
pub use renderer::Renderer;
pub use shader::ShaderProgram;
pub use shader_source::{SECTION_MARKER, ShaderSource, parse_shader_source};
pub use texture::{PixelData, Texture};
pub use vertex_array::VertexArray;
