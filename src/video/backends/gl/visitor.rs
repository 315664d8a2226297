use std::ffi::CString;
use std::os::raw::c_void;
use std::ptr;

use gl::types::*;

use super::super::super::buffer::{BufferHint, BufferTarget};
use super::super::super::shader::{ShaderStage, UniformVariable};
use super::super::super::vertex_array::VertexElement;
use super::super::Visitor;
use super::capabilities::{self, Version};
use crate::errors::*;
use crate::utils::color::Color;

/// Forwards every call to the OpenGL driver of the current context.
pub struct GLVisitor {
    version: String,
}

impl GLVisitor {
    /// # Safety
    ///
    /// The GL symbols must have been loaded and the context must be current.
    pub unsafe fn new() -> Result<Self> {
        let desc = capabilities::version_string();
        let version = Version::parse(&desc)
            .ok_or_else(|| Error::Requirement(format!("a known version string ({:?})", desc)))?;

        if !version.has_vertex_array_object() {
            return Err(Error::Requirement("vertex array objects".to_owned()));
        }

        info!("GLVisitor {:?} ({}).", version, desc);
        Ok(GLVisitor { version: desc })
    }
}

impl Visitor for GLVisitor {
    unsafe fn version(&self) -> String {
        self.version.clone()
    }

    unsafe fn get_error(&mut self) -> u32 {
        gl::GetError()
    }

    unsafe fn create_buffer(&mut self) -> u32 {
        let mut id = 0;
        gl::GenBuffers(1, &mut id);
        id
    }

    unsafe fn bind_buffer(&mut self, target: BufferTarget, id: u32) {
        gl::BindBuffer(target.into(), id);
    }

    unsafe fn buffer_data(&mut self, target: BufferTarget, data: &[u8], hint: BufferHint) {
        let value = if data.is_empty() {
            ptr::null()
        } else {
            data.as_ptr() as *const c_void
        };

        gl::BufferData(target.into(), data.len() as GLsizeiptr, value, hint.into());
    }

    unsafe fn delete_buffer(&mut self, id: u32) {
        gl::DeleteBuffers(1, &id);
    }

    unsafe fn create_vertex_array(&mut self) -> u32 {
        let mut id = 0;
        gl::GenVertexArrays(1, &mut id);
        id
    }

    unsafe fn bind_vertex_array(&mut self, id: u32) {
        gl::BindVertexArray(id);
    }

    unsafe fn delete_vertex_array(&mut self, id: u32) {
        gl::DeleteVertexArrays(1, &id);
    }

    unsafe fn enable_vertex_attrib(&mut self, index: u32) {
        gl::EnableVertexAttribArray(index);
    }

    unsafe fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        element: VertexElement,
        stride: u32,
        offset: usize,
    ) {
        gl::VertexAttribPointer(
            index,
            GLint::from(element.size),
            element.format.into(),
            element.normalized as GLboolean,
            stride as GLsizei,
            offset as *const c_void,
        );
    }

    unsafe fn create_shader(&mut self, stage: ShaderStage) -> u32 {
        gl::CreateShader(stage.into())
    }

    unsafe fn shader_source(&mut self, id: u32, source: &str) {
        let c_str = CString::new(source.as_bytes()).unwrap_or_default();
        gl::ShaderSource(id, 1, &c_str.as_ptr(), ptr::null());
    }

    unsafe fn compile_shader(&mut self, id: u32) {
        gl::CompileShader(id);
    }

    unsafe fn compile_status(&mut self, id: u32) -> bool {
        let mut status = GLint::from(gl::FALSE);
        gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut status);
        status == GLint::from(gl::TRUE)
    }

    unsafe fn shader_info_log(&mut self, id: u32) -> String {
        let mut len = 0;
        gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len);
        if len <= 0 {
            return String::new();
        }

        let mut buf = vec![0u8; len as usize];
        let mut written = 0;
        gl::GetShaderInfoLog(id, len, &mut written, buf.as_mut_ptr() as *mut GLchar);
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }

    unsafe fn delete_shader(&mut self, id: u32) {
        gl::DeleteShader(id);
    }

    unsafe fn create_program(&mut self) -> u32 {
        gl::CreateProgram()
    }

    unsafe fn attach_shader(&mut self, program: u32, shader: u32) {
        gl::AttachShader(program, shader);
    }

    unsafe fn detach_shader(&mut self, program: u32, shader: u32) {
        gl::DetachShader(program, shader);
    }

    unsafe fn link_program(&mut self, id: u32) {
        gl::LinkProgram(id);
    }

    unsafe fn link_status(&mut self, id: u32) -> bool {
        let mut status = GLint::from(gl::FALSE);
        gl::GetProgramiv(id, gl::LINK_STATUS, &mut status);
        status == GLint::from(gl::TRUE)
    }

    unsafe fn program_info_log(&mut self, id: u32) -> String {
        let mut len = 0;
        gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, &mut len);
        if len <= 0 {
            return String::new();
        }

        let mut buf = vec![0u8; len as usize];
        let mut written = 0;
        gl::GetProgramInfoLog(id, len, &mut written, buf.as_mut_ptr() as *mut GLchar);
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }

    unsafe fn validate_program(&mut self, id: u32) {
        gl::ValidateProgram(id);
    }

    unsafe fn use_program(&mut self, id: u32) {
        gl::UseProgram(id);
    }

    unsafe fn delete_program(&mut self, id: u32) {
        gl::DeleteProgram(id);
    }

    unsafe fn uniform_location(&mut self, program: u32, name: &str) -> i32 {
        match CString::new(name.as_bytes()) {
            Ok(c_name) => gl::GetUniformLocation(program, c_name.as_ptr()),
            Err(_) => -1,
        }
    }

    unsafe fn uniform(&mut self, location: i32, variable: UniformVariable) {
        match variable {
            UniformVariable::I32(v) => gl::Uniform1i(location, v),
            UniformVariable::F32(v) => gl::Uniform1f(location, v),
            UniformVariable::Vector2f(v) => gl::Uniform2f(location, v[0], v[1]),
            UniformVariable::Vector3f(v) => gl::Uniform3f(location, v[0], v[1], v[2]),
            UniformVariable::Vector4f(v) => gl::Uniform4f(location, v[0], v[1], v[2], v[3]),
            UniformVariable::Matrix4f(v, transpose) => {
                let transpose = if transpose { gl::TRUE } else { gl::FALSE };
                gl::UniformMatrix4fv(location, 1, transpose, v[0].as_ptr())
            }
        }
    }

    unsafe fn clear_color(&mut self, color: Color) {
        gl::ClearColor(color.r, color.g, color.b, color.a);
    }

    unsafe fn clear(&mut self) {
        gl::Clear(gl::COLOR_BUFFER_BIT);
    }

    unsafe fn draw_elements(&mut self, count: u32) {
        gl::DrawElements(gl::TRIANGLES, count as GLsizei, gl::UNSIGNED_INT, ptr::null());
    }
}
