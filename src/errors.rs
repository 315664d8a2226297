use std::path::PathBuf;

use crate::video::ShaderStage;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Undefined Path {:?}.", _0)]
    FileNotFound(PathBuf),
    #[fail(display = "{}", _0)]
    IO(::std::io::Error),
    #[fail(display = "{}", _0)]
    Malformed(String),
    #[fail(display = "Failed to compile {} shader, errors: \n{}", stage, log)]
    ShaderCompile { stage: ShaderStage, log: String },
    #[fail(display = "Failed to link program, errors: \n{}", _0)]
    ShaderLink(String),
    #[fail(display = "Uniform({:?}) is undefined in shader sources.", _0)]
    UnknownUniform(String),
    #[fail(
        display = "[OpenGL Error] ({}): {} {}:{} ({})",
        code, operation, file, line, description
    )]
    Driver {
        code: u32,
        description: &'static str,
        operation: &'static str,
        file: &'static str,
        line: u32,
    },
    #[fail(display = "The driver refused to allocate a {}.", _0)]
    AllocationFailure(&'static str),
    #[fail(display = "{} handle is invalid.", _0)]
    InvalidHandle(&'static str),
    #[fail(display = "OpenGL implementation doesn\'t support {}.", _0)]
    Requirement(String),
    #[fail(display = "Window: {}", _0)]
    Window(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<::std::io::Error> for Error {
    fn from(err: ::std::io::Error) -> Self {
        Error::IO(err)
    }
}

impl From<::serde_json::Error> for Error {
    fn from(err: ::serde_json::Error) -> Self {
        Error::Malformed(format!("{}", err))
    }
}

impl From<::glutin::CreationError> for Error {
    fn from(err: ::glutin::CreationError) -> Self {
        Error::Window(format!("{}", err))
    }
}

impl From<::glutin::ContextError> for Error {
    fn from(err: ::glutin::ContextError) -> Self {
        Error::Window(format!("{}", err))
    }
}
