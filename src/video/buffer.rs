//! Vertex and index buffers, each owning one driver buffer object.

use std::mem;
use std::rc::Rc;
use std::slice;

use super::device::{Device, Slot};
use crate::errors::*;

/// A driver object that could be made the active object of its category.
pub trait Bindable {
    /// The driver handle of this object.
    fn id(&self) -> u32;

    /// Makes this object the active one of its category.
    fn bind(&self) -> Result<()>;

    /// Binds 0 to the category of this object.
    fn unbind(&self) -> Result<()>;
}

/// Hint abouts the intended update strategy of the data.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferHint {
    /// The resource contents will be modified once and used many times.
    Immutable,
    /// The resource contents will be modified repeatedly and used many times.
    Dynamic,
    /// The resource contents will be modified once and used at most a few times.
    Stream,
}

impl Default for BufferHint {
    fn default() -> Self {
        BufferHint::Immutable
    }
}

/// The binding points of buffer objects.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferTarget {
    /// Vertex attributes.
    Array,
    /// Vertex indices.
    Element,
}

impl From<BufferTarget> for Slot {
    fn from(target: BufferTarget) -> Self {
        match target {
            BufferTarget::Array => Slot::ArrayBuffer,
            BufferTarget::Element => Slot::ElementBuffer,
        }
    }
}

/// A buffer object bound to one target for its whole life.
struct RawBuffer {
    device: Rc<Device>,
    target: BufferTarget,
    id: u32,
}

impl RawBuffer {
    fn new(
        device: &Rc<Device>,
        target: BufferTarget,
        data: &[u8],
        hint: BufferHint,
    ) -> Result<Self> {
        let id = probe!(device, v => v.create_buffer())?;
        if id == 0 {
            return Err(Error::AllocationFailure("buffer"));
        }

        // From here on the handle is released on drop, even if the upload fails.
        let buffer = RawBuffer {
            device: device.clone(),
            target,
            id,
        };

        buffer.bind()?;
        probe!(device, v => v.buffer_data(target, data, hint))?;

        trace!("Creates {:?} buffer {} with {} bytes.", target, id, data.len());
        Ok(buffer)
    }

    fn bind(&self) -> Result<()> {
        let (target, id) = (self.target, self.id);
        probe!(self.device, v => v.bind_buffer(target, id))?;
        self.device.record(target.into(), id);
        Ok(())
    }

    fn unbind(&self) -> Result<()> {
        let target = self.target;
        probe!(self.device, v => v.bind_buffer(target, 0))?;
        self.device.record(target.into(), 0);
        Ok(())
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        let id = self.id;
        if let Err(err) = probe!(self.device, v => v.delete_buffer(id)) {
            warn!("Failed to delete buffer {}. {}", id, err);
        }

        self.device.forget(self.target.into(), id);
    }
}

/// A buffer of vertex attributes.
pub struct VertexBuffer {
    buf: RawBuffer,
    len: usize,
}

impl VertexBuffer {
    /// Allocates a buffer and uploads `data` into it.
    pub fn new(device: &Rc<Device>, data: &[f32], hint: BufferHint) -> Result<Self> {
        Self::from_bytes(device, as_bytes(data), hint)
    }

    pub fn from_bytes(device: &Rc<Device>, bytes: &[u8], hint: BufferHint) -> Result<Self> {
        let buf = RawBuffer::new(device, BufferTarget::Array, bytes, hint)?;
        Ok(VertexBuffer {
            buf,
            len: bytes.len(),
        })
    }

    /// The size of the buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Bindable for VertexBuffer {
    #[inline]
    fn id(&self) -> u32 {
        self.buf.id
    }

    fn bind(&self) -> Result<()> {
        self.buf.bind()
    }

    fn unbind(&self) -> Result<()> {
        self.buf.unbind()
    }
}

/// A buffer of u32 vertex indices.
pub struct IndexBuffer {
    buf: RawBuffer,
    count: u32,
}

impl IndexBuffer {
    /// Allocates a buffer and uploads `indices` into it. The number of indices
    /// is recorded and drawn as a whole by `Renderer::draw`.
    pub fn new(device: &Rc<Device>, indices: &[u32], hint: BufferHint) -> Result<Self> {
        let buf = RawBuffer::new(device, BufferTarget::Element, as_bytes(indices), hint)?;
        Ok(IndexBuffer {
            buf,
            count: indices.len() as u32,
        })
    }

    /// The number of indices.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Bindable for IndexBuffer {
    #[inline]
    fn id(&self) -> u32 {
        self.buf.id
    }

    fn bind(&self) -> Result<()> {
        self.buf.bind()
    }

    fn unbind(&self) -> Result<()> {
        self.buf.unbind()
    }
}

fn as_bytes<T: Copy>(values: &[T]) -> &[u8] {
    let len = values.len() * mem::size_of::<T>();
    unsafe { slice::from_raw_parts(values.as_ptr() as *const u8, len) }
}
