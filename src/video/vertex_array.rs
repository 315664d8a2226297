//! Vertex arrays, which record how attributes are sourced from vertex buffers.

use std::rc::Rc;

use super::buffer::{Bindable, VertexBuffer};
use super::device::{Device, Slot};
use crate::errors::*;

/// The data type of one vertex attribute component.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexFormat {
    Byte,
    UByte,
    Short,
    UShort,
    Float,
}

impl VertexFormat {
    /// The size of one component in bytes.
    pub fn size(self) -> u8 {
        match self {
            VertexFormat::Byte | VertexFormat::UByte => 1,
            VertexFormat::Short | VertexFormat::UShort => 2,
            VertexFormat::Float => 4,
        }
    }
}

/// One attribute of a vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexElement {
    pub format: VertexFormat,
    /// The number of components, from 1 to 4.
    pub size: u8,
    /// Whether integer components should be mapped into [0, 1] or [-1, 1].
    pub normalized: bool,
}

impl VertexElement {
    /// The size of this attribute in bytes.
    #[inline]
    pub fn size_in_bytes(&self) -> u32 {
        u32::from(self.format.size()) * u32::from(self.size)
    }
}

/// The interleaved layout of vertices in a vertex buffer. Elements are assigned
/// attribute indices in the order they are added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    elements: Vec<VertexElement>,
}

impl VertexLayout {
    pub fn new() -> Self {
        VertexLayout::default()
    }

    pub fn with(mut self, format: VertexFormat, size: u8, normalized: bool) -> Self {
        assert!(size >= 1 && size <= 4, "attribute size must be in [1, 4].");
        self.elements.push(VertexElement {
            format,
            size,
            normalized,
        });
        self
    }

    #[inline]
    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }

    /// The size of one vertex in bytes.
    pub fn stride(&self) -> u32 {
        self.elements.iter().map(|v| v.size_in_bytes()).sum()
    }

    /// The offset of the `index`th element in bytes.
    pub fn offset(&self, index: usize) -> Option<usize> {
        if index >= self.elements.len() {
            return None;
        }

        Some(self.elements[..index].iter().map(|v| v.size_in_bytes() as usize).sum())
    }
}

pub struct VertexArray {
    device: Rc<Device>,
    id: u32,
}

impl VertexArray {
    pub fn new(device: &Rc<Device>) -> Result<Self> {
        let id = probe!(device, v => v.create_vertex_array())?;
        if id == 0 {
            return Err(Error::AllocationFailure("vertex array"));
        }

        trace!("Creates vertex array {}.", id);
        Ok(VertexArray {
            device: device.clone(),
            id,
        })
    }

    /// Sources the attributes described by `layout` from `buffer`.
    pub fn add_buffer(&self, buffer: &VertexBuffer, layout: &VertexLayout) -> Result<()> {
        self.bind()?;
        buffer.bind()?;

        let stride = layout.stride();
        let mut offset = 0;
        for (index, element) in layout.elements().iter().enumerate() {
            let (index, element) = (index as u32, *element);
            probe!(self.device, v => v.enable_vertex_attrib(index))?;
            probe!(self.device, v => v.vertex_attrib_pointer(index, element, stride, offset))?;
            offset += element.size_in_bytes() as usize;
        }

        Ok(())
    }
}

impl Bindable for VertexArray {
    #[inline]
    fn id(&self) -> u32 {
        self.id
    }

    fn bind(&self) -> Result<()> {
        let id = self.id;
        probe!(self.device, v => v.bind_vertex_array(id))?;
        self.device.record(Slot::VertexArray, id);
        Ok(())
    }

    fn unbind(&self) -> Result<()> {
        probe!(self.device, v => v.bind_vertex_array(0))?;
        self.device.record(Slot::VertexArray, 0);
        Ok(())
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        let id = self.id;
        if let Err(err) = probe!(self.device, v => v.delete_vertex_array(id)) {
            warn!("Failed to delete vertex array {}. {}", id, err);
        }

        self.device.forget(Slot::VertexArray, id);
    }
}
