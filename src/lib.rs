//! # What is This?
//!
//! `glquad` is a small OpenGL playground. It reads a vertex and a fragment shader
//! from one annotated text file, compiles them into a program, uploads a mesh into
//! GPU buffers and draws it, surfacing every driver error with the call site that
//! raised it.
//!
//! Every driver object is owned by exactly one wrapper (`VertexBuffer`,
//! `IndexBuffer`, `VertexArray`, `Shader`) which releases it on drop. All of them
//! share a `Device`, which owns the driver backend and keeps track of what is
//! currently bound per category.
//!
//! ```rust,ignore
//! use glquad::prelude::*;
//!
//! let device = Device::headless();
//! let source = ShaderSource::parse("#shader vertex\n...\n#shader fragment\n...\n");
//! let shader = Shader::new(&device, &source)?;
//! shader.set_uniform_4f("u_Color", 0.8, 0.3, 0.8, 1.0)?;
//! ```

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

pub extern crate cgmath;
pub extern crate gl;
pub extern crate glutin;

#[macro_use]
pub mod video;

pub mod errors;
pub mod settings;
pub mod utils;
pub mod window;

pub mod prelude {
    pub use crate::errors::{Error, Result};
    pub use crate::settings::{Settings, WindowParams};
    pub use crate::utils::color::Color;
    pub use crate::video::prelude::*;
    pub use crate::window::Window;
}
