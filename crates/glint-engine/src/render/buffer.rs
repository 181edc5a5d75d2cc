use bytemuck::Pod;

use crate::device::{BufferHandle, BufferTarget, BufferUsage, Gl, checked, checked_release};

use super::GpuError;

/// Allocates a buffer, binds it to `target` and uploads `data` as static draw.
fn upload(
    gl: &Gl,
    target: BufferTarget,
    data: &[u8],
    what: &'static str,
) -> Result<BufferHandle, GpuError> {
    let api = &**gl;
    let handle = checked(api, "glGenBuffers", |api| api.create_buffer())
        .map_err(|reason| GpuError::Allocation { what, reason })?;
    checked(api, "glBindBuffer", |api| api.bind_buffer(target, Some(handle)));
    checked(api, "glBufferData", |api| {
        api.buffer_data(target, data, BufferUsage::StaticDraw)
    });
    log::trace!("{what} {:?} created ({} bytes)", handle.0, data.len());
    Ok(handle)
}

/// GPU buffer holding per-vertex attribute data.
///
/// Owns exactly one buffer object; dropping it deletes the object.
pub struct VertexBuffer {
    gl: Gl,
    handle: BufferHandle,
    size: usize,
}

impl VertexBuffer {
    /// Uploads `data` into a new buffer. Leaves it bound.
    pub fn new(gl: &Gl, data: &[u8]) -> Result<Self, GpuError> {
        let handle = upload(gl, BufferTarget::Vertex, data, "vertex buffer")?;
        Ok(Self {
            gl: gl.clone(),
            handle,
            size: data.len(),
        })
    }

    /// Uploads a slice of plain-old-data vertices.
    pub fn from_slice<T: Pod>(gl: &Gl, vertices: &[T]) -> Result<Self, GpuError> {
        Self::new(gl, bytemuck::cast_slice(vertices))
    }

    pub fn bind(&self) {
        checked(&*self.gl, "glBindBuffer", |api| {
            api.bind_buffer(BufferTarget::Vertex, Some(self.handle))
        });
    }

    pub fn unbind(&self) {
        checked(&*self.gl, "glBindBuffer", |api| api.bind_buffer(BufferTarget::Vertex, None));
    }

    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    /// Size of the uploaded data in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        checked_release(&*self.gl, "glDeleteBuffers", |api| api.delete_buffer(self.handle));
        log::trace!("vertex buffer {:?} released", self.handle.0);
    }
}

/// GPU buffer holding 32-bit triangle indices.
///
/// Creating one binds it to the element target, which attaches it to the
/// vertex array bound at that moment.
pub struct IndexBuffer {
    gl: Gl,
    handle: BufferHandle,
    count: usize,
}

impl IndexBuffer {
    pub fn new(gl: &Gl, indices: &[u32]) -> Result<Self, GpuError> {
        let bytes = bytemuck::cast_slice(indices);
        let handle = upload(gl, BufferTarget::Index, bytes, "index buffer")?;
        Ok(Self {
            gl: gl.clone(),
            handle,
            count: indices.len(),
        })
    }

    pub fn bind(&self) {
        checked(&*self.gl, "glBindBuffer", |api| {
            api.bind_buffer(BufferTarget::Index, Some(self.handle))
        });
    }

    pub fn unbind(&self) {
        checked(&*self.gl, "glBindBuffer", |api| api.bind_buffer(BufferTarget::Index, None));
    }

    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    /// Number of indices.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn size(&self) -> usize {
        self.count * size_of::<u32>()
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        checked_release(&*self.gl, "glDeleteBuffers", |api| api.delete_buffer(self.handle));
        log::trace!("index buffer {:?} released", self.handle.0);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::device::HeadlessApi;

    fn headless() -> (Rc<HeadlessApi>, Gl) {
        let api = Rc::new(HeadlessApi::new());
        let gl: Gl = api.clone();
        (api, gl)
    }

    #[test]
    fn vertex_buffer_uploads_bytes() {
        let (api, gl) = headless();
        let positions = [-0.5f32, -0.5, 0.5, -0.5, 0.5, 0.5];
        let vb = VertexBuffer::from_slice(&gl, &positions).unwrap();

        assert_eq!(vb.size(), 24);
        assert_eq!(api.bound_buffer(BufferTarget::Vertex), Some(vb.handle()));
        assert_eq!(
            api.buffer_contents(vb.handle()).unwrap(),
            bytemuck::cast_slice::<f32, u8>(&positions)
        );
        assert_eq!(api.buffer_usage(vb.handle()), Some(BufferUsage::StaticDraw));
    }

    #[test]
    fn index_buffer_records_count() {
        let (api, gl) = headless();
        let ib = IndexBuffer::new(&gl, &[0, 1, 2, 2, 3, 0]).unwrap();

        assert_eq!(ib.count(), 6);
        assert_eq!(ib.size(), 24);
        assert_eq!(api.bound_buffer(BufferTarget::Index), Some(ib.handle()));
    }

    #[test]
    fn bind_and_unbind_toggle_the_target() {
        let (api, gl) = headless();
        let vb = VertexBuffer::new(&gl, &[0u8; 8]).unwrap();

        vb.unbind();
        assert_eq!(api.bound_buffer(BufferTarget::Vertex), None);
        vb.bind();
        assert_eq!(api.bound_buffer(BufferTarget::Vertex), Some(vb.handle()));
    }

    #[test]
    fn drop_releases_the_buffer() {
        let (api, gl) = headless();
        {
            let _vb = VertexBuffer::new(&gl, &[1, 2, 3, 4]).unwrap();
            let _ib = IndexBuffer::new(&gl, &[0, 1, 2]).unwrap();
            assert_eq!(api.live_buffers(), 2);
        }
        assert_eq!(api.live_buffers(), 0);
        assert_eq!(api.bound_buffer(BufferTarget::Vertex), None);
    }

    #[test]
    fn drop_on_early_return_still_releases() {
        fn build_then_fail(gl: &Gl) -> Result<(), GpuError> {
            let _vb = VertexBuffer::new(gl, &[0u8; 16])?;
            Err(GpuError::InvalidPixels("bail".into()))
        }

        let (api, gl) = headless();
        assert!(build_then_fail(&gl).is_err());
        assert_eq!(api.live_buffers(), 0);
    }
}
