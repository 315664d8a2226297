//! A thin, RAII flavoured layer over the OpenGL driver.
//!
//! # Driver
//!
//! Every call into the driver goes through a `Visitor`, the trait that mirrors the
//! handful of OpenGL entry points we use. `GLVisitor` forwards them to the real
//! driver through the `gl` crate, `HeadlessVisitor` simulates them in memory so
//! everything above it could be exercised without a display.
//!
//! # Errors
//!
//! Each driver call is wrapped with the `probe!` macro, which drains the error
//! queue, performs the call and then polls the queue once. Any error is logged
//! with the stringified call, file and line, and returned as `Error::Driver`. It
//! is up to the caller to decide whether that is fatal.
//!
//! # Bindings
//!
//! Binding is global state of the driver: there is exactly one active vertex
//! array, array buffer, element buffer and program at a time. The `Device`
//! records the last bind of every category in `Bindings`, and every draw re-binds
//! everything it needs right before issuing the command instead of trusting an
//! earlier bind.
//!
//! # Resources
//!
//! `VertexBuffer`, `IndexBuffer`, `VertexArray` and `Shader` each own exactly one
//! driver handle and release it when they are dropped. They hold an `Rc<Device>`,
//! so they are bound to the thread which owns the context.

#[macro_use]
pub mod probe;

pub mod backends;
pub mod buffer;
pub mod device;
pub mod renderer;
pub mod shader;
pub mod source;
pub mod vertex_array;

pub use self::shader::ShaderStage;

pub mod prelude {
    pub use super::backends::headless::{HeadlessStats, HeadlessVisitor};
    pub use super::backends::Visitor;
    pub use super::buffer::{Bindable, BufferHint, BufferTarget, IndexBuffer, VertexBuffer};
    pub use super::device::{Bindings, Device, Slot};
    pub use super::renderer::Renderer;
    pub use super::shader::{Shader, ShaderStage, UniformVariable};
    pub use super::source::ShaderSource;
    pub use super::vertex_array::{VertexArray, VertexElement, VertexFormat, VertexLayout};
}
