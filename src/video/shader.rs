//! Program objects, linked from a vertex and a fragment stage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

use super::buffer::Bindable;
use super::device::{Device, Slot};
use super::source::ShaderSource;
use crate::errors::*;
use crate::utils::color::Color;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Uniform variable for program object. Matrices are supplied in column major
/// order with a optional transpose.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformVariable {
    I32(i32),
    F32(f32),
    Vector2f([f32; 2]),
    Vector3f([f32; 3]),
    Vector4f([f32; 4]),
    Matrix4f([[f32; 4]; 4], bool),
}

impl From<i32> for UniformVariable {
    fn from(v: i32) -> Self {
        UniformVariable::I32(v)
    }
}

impl From<f32> for UniformVariable {
    fn from(v: f32) -> Self {
        UniformVariable::F32(v)
    }
}

impl From<[f32; 2]> for UniformVariable {
    fn from(v: [f32; 2]) -> Self {
        UniformVariable::Vector2f(v)
    }
}

impl From<[f32; 3]> for UniformVariable {
    fn from(v: [f32; 3]) -> Self {
        UniformVariable::Vector3f(v)
    }
}

impl From<[f32; 4]> for UniformVariable {
    fn from(v: [f32; 4]) -> Self {
        UniformVariable::Vector4f(v)
    }
}

impl From<Vector2<f32>> for UniformVariable {
    fn from(v: Vector2<f32>) -> Self {
        UniformVariable::Vector2f(v.into())
    }
}

impl From<Vector3<f32>> for UniformVariable {
    fn from(v: Vector3<f32>) -> Self {
        UniformVariable::Vector3f(v.into())
    }
}

impl From<Vector4<f32>> for UniformVariable {
    fn from(v: Vector4<f32>) -> Self {
        UniformVariable::Vector4f(v.into())
    }
}

impl From<Matrix4<f32>> for UniformVariable {
    fn from(v: Matrix4<f32>) -> Self {
        UniformVariable::Matrix4f(v.into(), false)
    }
}

impl From<Color> for UniformVariable {
    fn from(v: Color) -> Self {
        UniformVariable::Vector4f(v.into())
    }
}

/// A linked program object. Uniform locations are resolved on first use and cached
/// until the program is deleted.
pub struct Shader {
    device: Rc<Device>,
    id: u32,
    uniforms: RefCell<HashMap<String, i32>>,
}

impl Shader {
    /// Splits the shader file at `path` and compiles it.
    pub fn from_file<P: AsRef<Path>>(device: &Rc<Device>, path: P) -> Result<Self> {
        let source = ShaderSource::from_file(path)?;
        Self::new(device, &source)
    }

    pub fn new(device: &Rc<Device>, source: &ShaderSource) -> Result<Self> {
        Self::compile(device, &source.vertex, &source.fragment)
    }

    /// Compiles both stages and links them into a program.
    ///
    /// Both stages are compiled even if the first one fails, so the driver logs of
    /// every broken stage show up at once. The error of the first failing stage is
    /// returned. Stage objects never outlive this call.
    pub fn compile(device: &Rc<Device>, vs: &str, fs: &str) -> Result<Self> {
        let vs = CompiledStage::new(device, ShaderStage::Vertex, vs);
        let fs = CompiledStage::new(device, ShaderStage::Fragment, fs);

        match (vs, fs) {
            (Ok(vs), Ok(fs)) => Self::link(device, &vs, &fs),
            (Err(err), _) | (_, Err(err)) => Err(err),
        }
    }

    fn link(device: &Rc<Device>, vs: &CompiledStage, fs: &CompiledStage) -> Result<Self> {
        let id = probe!(device, v => v.create_program())?;
        if id == 0 {
            return Err(Error::AllocationFailure("program"));
        }

        // Deletes the program on any early return below.
        let shader = Shader {
            device: device.clone(),
            id,
            uniforms: RefCell::new(HashMap::new()),
        };

        for stage in &[vs, fs] {
            let stage = stage.id;
            probe!(device, v => v.attach_shader(id, stage))?;
        }

        probe!(device, v => v.link_program(id))?;
        if !probe!(device, v => v.link_status(id))? {
            let log = probe!(device, v => v.program_info_log(id))?;
            error!("Failed to link program {}!\n{}", id, log);
            return Err(Error::ShaderLink(log));
        }

        probe!(device, v => v.validate_program(id))?;

        // The program retains the compiled code once it is linked.
        for stage in &[vs, fs] {
            let stage = stage.id;
            probe!(device, v => v.detach_shader(id, stage))?;
        }

        debug!("Links program {} from shaders {} and {}.", id, vs.id, fs.id);
        Ok(shader)
    }

    /// Returns true if the program has not been deleted.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.id != 0
    }

    /// Returns the location of uniform `name`, asking the driver only on the first
    /// lookup of every name.
    pub fn uniform_location(&self, name: &str) -> Result<i32> {
        let id = self.handle()?;

        if let Some(&location) = self.uniforms.borrow().get(name) {
            return Ok(location);
        }

        if name.contains('\0') {
            return Err(Error::UnknownUniform(name.to_owned()));
        }

        let location = probe!(self.device, v => v.uniform_location(id, name))?;
        if location == -1 {
            error!("Uniform({:?}) is undefined in program {}.", name, id);
            return Err(Error::UnknownUniform(name.to_owned()));
        }

        self.uniforms.borrow_mut().insert(name.to_owned(), location);
        Ok(location)
    }

    /// Returns the number of resolved uniform locations.
    #[inline]
    pub fn cached_uniforms(&self) -> usize {
        self.uniforms.borrow().len()
    }

    /// Uploads `value` into uniform `name`. The program is bound first.
    pub fn set_uniform<T>(&self, name: &str, value: T) -> Result<()>
    where
        T: Into<UniformVariable>,
    {
        let location = self.uniform_location(name)?;
        self.bind()?;

        let value = value.into();
        probe!(self.device, v => v.uniform(location, value))
    }

    #[inline]
    pub fn set_uniform_1i(&self, name: &str, v0: i32) -> Result<()> {
        self.set_uniform(name, v0)
    }

    #[inline]
    pub fn set_uniform_1f(&self, name: &str, v0: f32) -> Result<()> {
        self.set_uniform(name, v0)
    }

    #[inline]
    pub fn set_uniform_4f(&self, name: &str, v0: f32, v1: f32, v2: f32, v3: f32) -> Result<()> {
        self.set_uniform(name, [v0, v1, v2, v3])
    }

    /// Deletes the program. It is fine to call this more than once, but every use
    /// of the program afterwards fails with `Error::InvalidHandle`.
    pub fn delete(&mut self) -> Result<()> {
        if self.id == 0 {
            return Ok(());
        }

        let id = self.id;
        self.id = 0;
        self.uniforms.borrow_mut().clear();
        self.device.forget(Slot::Program, id);

        probe!(self.device, v => v.delete_program(id))?;
        debug!("Deletes program {}.", id);
        Ok(())
    }

    #[inline]
    fn handle(&self) -> Result<u32> {
        if self.id == 0 {
            Err(Error::InvalidHandle("Program"))
        } else {
            Ok(self.id)
        }
    }
}

impl Bindable for Shader {
    #[inline]
    fn id(&self) -> u32 {
        self.id
    }

    fn bind(&self) -> Result<()> {
        let id = self.handle()?;
        probe!(self.device, v => v.use_program(id))?;
        self.device.record(Slot::Program, id);
        Ok(())
    }

    fn unbind(&self) -> Result<()> {
        probe!(self.device, v => v.use_program(0))?;
        self.device.record(Slot::Program, 0);
        Ok(())
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        if let Err(err) = self.delete() {
            warn!("Failed to delete program. {}", err);
        }
    }
}

/// A compiled shader object, deleted once it goes out of scope.
struct CompiledStage<'a> {
    device: &'a Device,
    id: u32,
}

impl<'a> CompiledStage<'a> {
    fn new(device: &'a Device, stage: ShaderStage, source: &str) -> Result<Self> {
        if source.contains('\0') {
            let log = "source contains a nul byte.".to_owned();
            error!("Failed to compile {} shader!\n{}", stage, log);
            return Err(Error::ShaderCompile { stage, log });
        }

        let id = probe!(device, v => v.create_shader(stage))?;
        if id == 0 {
            return Err(Error::AllocationFailure("shader"));
        }

        let compiled = CompiledStage { device, id };
        probe!(device, v => v.shader_source(id, source))?;
        probe!(device, v => v.compile_shader(id))?;

        if !probe!(device, v => v.compile_status(id))? {
            let log = probe!(device, v => v.shader_info_log(id))?;
            error!("Failed to compile {} shader!\n{}", stage, log);
            return Err(Error::ShaderCompile { stage, log });
        }

        Ok(compiled)
    }
}

impl<'a> Drop for CompiledStage<'a> {
    fn drop(&mut self) {
        let id = self.id;
        if let Err(err) = probe!(self.device, v => v.delete_shader(id)) {
            warn!("Failed to delete shader {}. {}", id, err);
        }
    }
}
