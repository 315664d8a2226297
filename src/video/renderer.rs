use std::rc::Rc;

use super::buffer::{Bindable, IndexBuffer};
use super::device::Device;
use super::shader::Shader;
use super::vertex_array::VertexArray;
use crate::errors::*;
use crate::utils::color::Color;

/// Issues clears and draw calls. It owns no resources, every draw binds the
/// objects it needs right before the draw call.
pub struct Renderer {
    device: Rc<Device>,
}

impl Renderer {
    pub fn new(device: &Rc<Device>) -> Self {
        Renderer {
            device: device.clone(),
        }
    }

    /// Sets the color used by `clear`.
    pub fn set_clear_color(&self, color: Color) -> Result<()> {
        probe!(self.device, v => v.clear_color(color))
    }

    /// Clears the color buffer.
    pub fn clear(&self) -> Result<()> {
        probe!(self.device, v => v.clear())
    }

    /// Draws every index of `ib` as triangles.
    pub fn draw(&self, va: &VertexArray, ib: &IndexBuffer, shader: &Shader) -> Result<()> {
        shader.bind()?;
        va.bind()?;
        ib.bind()?;

        let count = ib.count();
        probe!(self.device, v => v.draw_elements(count))?;
        trace!(
            "Draws {} indices with program {} and vertex array {}.",
            count,
            shader.id(),
            va.id()
        );

        Ok(())
    }
}
