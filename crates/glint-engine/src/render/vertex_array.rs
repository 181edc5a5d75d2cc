use crate::device::{AttribPointer, Gl, VertexArrayHandle, checked, checked_release};

use super::{AttributeLayout, GpuError, VertexBuffer};

/// Vertex array object: binds attribute slots to a vertex buffer.
///
/// The array does not own the buffers it was configured with. Keep them alive
/// for as long as the array is drawn.
pub struct VertexArray {
    gl: Gl,
    handle: VertexArrayHandle,
    layout: Option<AttributeLayout>,
}

impl VertexArray {
    pub fn new(gl: &Gl) -> Result<Self, GpuError> {
        let handle = checked(&**gl, "glGenVertexArrays", |api| api.create_vertex_array())
            .map_err(|reason| GpuError::Allocation {
                what: "vertex array",
                reason,
            })?;
        log::trace!("vertex array {:?} created", handle.0);
        Ok(Self {
            gl: gl.clone(),
            handle,
            layout: None,
        })
    }

    /// Points one attribute slot per layout element at `buffer`.
    ///
    /// Leaves this array and `buffer` bound. Calling it again reconfigures the
    /// slots; the previous buffer is not touched.
    pub fn add_buffer(&mut self, buffer: &VertexBuffer, layout: &AttributeLayout) {
        self.bind();
        buffer.bind();

        let api = &*self.gl;
        let stride = layout.stride() as i32;
        let slots = layout.elements().iter().zip(layout.offsets());
        for (index, (element, offset)) in slots.enumerate() {
            let index = index as u32;
            let pointer = AttribPointer {
                ty: element.ty,
                count: element.count as i32,
                normalized: element.normalized,
                stride,
                offset: offset as i32,
            };
            checked(api, "glEnableVertexAttribArray", |api| {
                api.enable_vertex_attrib_array(index)
            });
            checked(api, "glVertexAttribPointer", |api| {
                api.vertex_attrib_pointer(index, pointer)
            });
        }

        self.layout = Some(layout.clone());
    }

    pub fn bind(&self) {
        checked(&*self.gl, "glBindVertexArray", |api| {
            api.bind_vertex_array(Some(self.handle))
        });
    }

    pub fn unbind(&self) {
        checked(&*self.gl, "glBindVertexArray", |api| api.bind_vertex_array(None));
    }

    pub fn handle(&self) -> VertexArrayHandle {
        self.handle
    }

    /// Layout from the last [`add_buffer`](Self::add_buffer) call.
    pub fn layout(&self) -> Option<&AttributeLayout> {
        self.layout.as_ref()
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        checked_release(&*self.gl, "glDeleteVertexArrays", |api| {
            api.delete_vertex_array(self.handle)
        });
        log::trace!("vertex array {:?} released", self.handle.0);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::device::{ElementType, HeadlessApi};
    use crate::render::IndexBuffer;

    fn headless() -> (Rc<HeadlessApi>, Gl) {
        let api = Rc::new(HeadlessApi::new());
        let gl: Gl = api.clone();
        (api, gl)
    }

    #[test]
    fn attribute_offsets_accumulate_per_slot() {
        let (api, gl) = headless();
        let vb = VertexBuffer::new(&gl, &[0u8; 64]).unwrap();
        let mut layout = AttributeLayout::new();
        layout.push_of::<f32>(2).push_of::<f32>(2);

        let mut va = VertexArray::new(&gl).unwrap();
        va.add_buffer(&vb, &layout);

        let slots = api.attrib_slots(va.handle());
        assert_eq!(slots.len(), 2);

        let (i0, s0) = slots[0];
        let (i1, s1) = slots[1];
        assert_eq!((i0, i1), (0, 1));
        assert!(s0.enabled && s1.enabled);

        let p0 = s0.pointer.unwrap();
        let p1 = s1.pointer.unwrap();
        assert_eq!((p0.offset, p0.stride, p0.count), (0, 16, 2));
        assert_eq!((p1.offset, p1.stride, p1.count), (8, 16, 2));
        assert_eq!(s0.source, Some(vb.handle()));
    }

    #[test]
    fn mixed_layout_offsets_and_normalization() {
        let (api, gl) = headless();
        let vb = VertexBuffer::new(&gl, &[0u8; 64]).unwrap();
        let mut layout = AttributeLayout::new();
        layout.push_of::<f32>(3).push_of::<u8>(4).push_of::<f32>(2);

        let mut va = VertexArray::new(&gl).unwrap();
        va.add_buffer(&vb, &layout);

        let pointers: Vec<AttribPointer> = api
            .attrib_slots(va.handle())
            .into_iter()
            .filter_map(|(_, slot)| slot.pointer)
            .collect();
        let offsets: Vec<i32> = pointers.iter().map(|p| p.offset).collect();
        assert_eq!(offsets, vec![0, 12, 16]);
        assert!(pointers.iter().all(|p| p.stride == 24));
        assert_eq!(pointers[1].ty, ElementType::Uint8);
        assert!(pointers[1].normalized);
        assert_eq!(va.layout(), Some(&layout));
    }

    #[test]
    fn re_adding_reconfigures_without_releasing_old_buffer() {
        let (api, gl) = headless();
        let first = VertexBuffer::new(&gl, &[0u8; 32]).unwrap();
        let second = VertexBuffer::new(&gl, &[0u8; 32]).unwrap();
        let mut layout = AttributeLayout::new();
        layout.push_of::<f32>(4);

        let mut va = VertexArray::new(&gl).unwrap();
        va.add_buffer(&first, &layout);
        va.add_buffer(&second, &layout);

        let (_, slot) = api.attrib_slots(va.handle())[0];
        assert_eq!(slot.source, Some(second.handle()));
        assert_eq!(api.live_buffers(), 2);
    }

    #[test]
    fn index_buffer_is_captured_by_bound_array() {
        let (api, gl) = headless();
        let va = VertexArray::new(&gl).unwrap();
        va.bind();
        let ib = IndexBuffer::new(&gl, &[0, 1, 2]).unwrap();
        va.unbind();

        assert_eq!(api.element_buffer_of(va.handle()), Some(ib.handle()));
    }

    #[test]
    fn drop_releases_the_array_only() {
        let (api, gl) = headless();
        let vb = VertexBuffer::new(&gl, &[0u8; 16]).unwrap();
        {
            let mut layout = AttributeLayout::new();
            layout.push_of::<f32>(2);
            let mut va = VertexArray::new(&gl).unwrap();
            va.add_buffer(&vb, &layout);
            assert_eq!(api.live_vertex_arrays(), 1);
        }
        assert_eq!(api.live_vertex_arrays(), 0);
        assert_eq!(api.bound_vertex_array(), None);
        assert_eq!(api.live_buffers(), 1);
    }
}
