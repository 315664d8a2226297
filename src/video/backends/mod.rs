//! The backend of the video module, which should be responsible for only one thing:
//! forwarding calls to the low-level OpenGL driver.
//!
//! Methods map one-to-one onto driver entry points and report nothing by
//! themselves; errors are left in the driver's error queue and collected by the
//! `probe!` wrapper around every call.

pub mod gl;
pub mod headless;

use crate::errors::*;
use crate::utils::color::Color;

use super::buffer::{BufferHint, BufferTarget};
use super::shader::{ShaderStage, UniformVariable};
use super::vertex_array::VertexElement;

/// All methods are unsafe, since they require the context of the backend to be
/// current on the calling thread.
pub trait Visitor {
    /// Returns a description of the driver version.
    unsafe fn version(&self) -> String;

    /// Pops the oldest error code from the error queue, or `NO_ERROR` if it is empty.
    unsafe fn get_error(&mut self) -> u32;

    unsafe fn create_buffer(&mut self) -> u32;

    unsafe fn bind_buffer(&mut self, target: BufferTarget, id: u32);

    /// Uploads `data` into the buffer currently bound to `target`.
    unsafe fn buffer_data(&mut self, target: BufferTarget, data: &[u8], hint: BufferHint);

    unsafe fn delete_buffer(&mut self, id: u32);

    unsafe fn create_vertex_array(&mut self) -> u32;

    unsafe fn bind_vertex_array(&mut self, id: u32);

    unsafe fn delete_vertex_array(&mut self, id: u32);

    unsafe fn enable_vertex_attrib(&mut self, index: u32);

    /// Describes attribute `index` of the bound vertex array as `element`, sourced
    /// from the bound array buffer.
    unsafe fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        element: VertexElement,
        stride: u32,
        offset: usize,
    );

    unsafe fn create_shader(&mut self, stage: ShaderStage) -> u32;

    unsafe fn shader_source(&mut self, id: u32, source: &str);

    unsafe fn compile_shader(&mut self, id: u32);

    unsafe fn compile_status(&mut self, id: u32) -> bool;

    unsafe fn shader_info_log(&mut self, id: u32) -> String;

    unsafe fn delete_shader(&mut self, id: u32);

    unsafe fn create_program(&mut self) -> u32;

    unsafe fn attach_shader(&mut self, program: u32, shader: u32);

    unsafe fn detach_shader(&mut self, program: u32, shader: u32);

    unsafe fn link_program(&mut self, id: u32);

    unsafe fn link_status(&mut self, id: u32) -> bool;

    unsafe fn program_info_log(&mut self, id: u32) -> String;

    unsafe fn validate_program(&mut self, id: u32);

    unsafe fn use_program(&mut self, id: u32);

    unsafe fn delete_program(&mut self, id: u32);

    /// Returns the location of uniform `name` in a linked program, or -1.
    unsafe fn uniform_location(&mut self, program: u32, name: &str) -> i32;

    /// Uploads `variable` to `location` of the program in use.
    unsafe fn uniform(&mut self, location: i32, variable: UniformVariable);

    unsafe fn clear_color(&mut self, color: Color);

    /// Clears the color buffer.
    unsafe fn clear(&mut self);

    /// Draws `count` indices of type u32 from the bound element buffer as triangles.
    unsafe fn draw_elements(&mut self, count: u32);
}

/// Creates the OpenGL backend. Symbols must have been loaded and the context made
/// current already.
pub unsafe fn new() -> Result<Box<dyn Visitor>> {
    let visitor = self::gl::visitor::GLVisitor::new()?;
    Ok(Box::new(visitor))
}

pub fn new_headless() -> Box<dyn Visitor> {
    Box::new(self::headless::HeadlessVisitor::new())
}
