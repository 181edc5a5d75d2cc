use bytemuck::Pod;

use crate::device::{ElementType, element_type_for_gl};

/// One typed attribute within a vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttributeElement {
    pub ty: ElementType,
    /// Components per vertex (1..=4).
    pub count: u32,
    pub normalized: bool,
}

impl AttributeElement {
    /// Bytes this attribute occupies in one vertex.
    #[inline]
    pub fn byte_size(&self) -> u32 {
        self.count * self.ty.byte_size()
    }
}

/// Rust scalar types usable as vertex components.
pub trait VertexComponent: Pod {
    const ELEMENT: ElementType;
}

impl VertexComponent for f32 {
    const ELEMENT: ElementType = ElementType::Float32;
}

impl VertexComponent for u32 {
    const ELEMENT: ElementType = ElementType::Uint32;
}

impl VertexComponent for u8 {
    const ELEMENT: ElementType = ElementType::Uint8;
}

/// Ordered description of how one vertex decomposes into attributes.
///
/// Insertion order is attribute slot order. The stride is updated on every
/// push, so it always equals the sum of the element sizes.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AttributeLayout {
    elements: Vec<AttributeElement>,
    stride: u32,
}

impl AttributeLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `count` components of `ty` as the next attribute slot.
    ///
    /// # Panics
    /// Panics if `count` is outside `1..=4`.
    pub fn push(&mut self, ty: ElementType, count: u32) -> &mut Self {
        assert!(
            (1..=4).contains(&count),
            "attribute component count must be in 1..=4, got {count}"
        );
        let element = AttributeElement {
            ty,
            count,
            normalized: ty.default_normalized(),
        };
        self.stride += element.byte_size();
        self.elements.push(element);
        self
    }

    /// [`push`](Self::push) with the element type inferred from `T`.
    pub fn push_of<T: VertexComponent>(&mut self, count: u32) -> &mut Self {
        self.push(T::ELEMENT, count)
    }

    /// [`push`](Self::push) from a raw GL type code such as `GL_FLOAT`.
    ///
    /// # Panics
    /// Panics on a type code with no [`ElementType`].
    pub fn push_raw(&mut self, gl_type: u32, count: u32) -> &mut Self {
        self.push(element_type_for_gl(gl_type), count)
    }

    pub fn elements(&self) -> &[AttributeElement] {
        &self.elements
    }

    /// Bytes between consecutive vertices.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Byte offset of each element inside a vertex, in slot order.
    pub fn offsets(&self) -> Vec<u32> {
        self.elements
            .iter()
            .scan(0u32, |offset, element| {
                let this = *offset;
                *offset += element.byte_size();
                Some(this)
            })
            .collect()
    }
}
