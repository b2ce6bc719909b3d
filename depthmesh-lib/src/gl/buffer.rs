use std::marker::PhantomData;

use bytemuck::Pod;

use super::GlContext;
use crate::error::GlError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

impl BufferTarget {
    pub fn raw(self) -> u32 {
        match self {
            Self::Array => glow::ARRAY_BUFFER,
            Self::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BufferUsage {
    #[default]
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

impl BufferUsage {
    pub fn raw(self) -> u32 {
        match self {
            Self::StaticDraw => glow::STATIC_DRAW,
            Self::DynamicDraw => glow::DYNAMIC_DRAW,
            Self::StreamDraw => glow::STREAM_DRAW,
        }
    }
}

/// GPU buffer of `elements` records, each `length` values of `T`.
///
/// The handle is created lazily by [`BufferObject::generate_buffer`] and owned
/// exclusively, so the type is not `Clone`.
#[derive(Debug)]
pub struct BufferObject<G: GlContext, T> {
    handle: Option<G::Buffer>,
    target: BufferTarget,
    usage: BufferUsage,
    elements: usize,
    length: usize,
    _values: PhantomData<T>,
}

/// Vertex positions and other per-vertex floats
pub type VertexBufferObject<G> = BufferObject<G, f32>;
/// Triangle indices
pub type ElementBufferObject<G> = BufferObject<G, u32>;

impl<G: GlContext, T: Pod> BufferObject<G, T> {
    pub fn new(target: BufferTarget, elements: usize, length: usize, usage: BufferUsage) -> Self {
        Self {
            handle: None,
            target,
            usage,
            elements,
            length,
            _values: PhantomData,
        }
    }

    pub fn handle(&self) -> Option<G::Buffer> {
        self.handle
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn elements(&self) -> usize {
        self.elements
    }

    /// Values per element
    pub fn length(&self) -> usize {
        self.length
    }

    /// Bytes per element
    pub fn stride(&self) -> usize {
        self.length * std::mem::size_of::<T>()
    }

    /// Total number of values
    pub fn size(&self) -> usize {
        self.elements * self.length
    }

    /// Creates the GPU buffer and uploads `data`.
    ///
    /// Does nothing if a buffer already exists or there is no data.
    pub fn generate_buffer(&mut self, gl: &G, data: &[T]) -> Result<(), GlError> {
        if self.handle.is_some() || data.is_empty() {
            return Ok(());
        }
        self.handle = Some(gl.create_buffer()?);
        self.update_buffer(gl, data);
        Ok(())
    }

    /// Re-uploads `data` into the existing buffer; a no-op without one.
    ///
    /// `data` must hold exactly [`BufferObject::size`] values.
    pub fn update_buffer(&self, gl: &G, data: &[T]) -> bool {
        let Some(handle) = self.handle else {
            return false;
        };
        if data.len() != self.size() {
            log::warn!(
                "Buffer upload of {} values ignored, expected {}",
                data.len(),
                self.size()
            );
            return false;
        }
        gl.bind_buffer(self.target, Some(handle));
        gl.buffer_data(self.target, bytemuck::cast_slice(data), self.usage);
        true
    }

    pub fn bind(&self, gl: &G) {
        gl.bind_buffer(self.target, self.handle);
    }

    pub fn delete_buffer(&mut self, gl: &G) {
        if let Some(handle) = self.handle.take() {
            gl.delete_buffer(handle);
        }
    }
}

impl<G: GlContext> VertexBufferObject<G> {
    pub fn vertices(elements: usize, length: usize) -> Self {
        Self::new(BufferTarget::Array, elements, length, BufferUsage::StreamDraw)
    }
}

impl<G: GlContext> ElementBufferObject<G> {
    pub fn indices(count: usize) -> Self {
        Self::new(BufferTarget::ElementArray, count, 1, BufferUsage::StaticDraw)
    }
}
