//! Functions for loading playground settings.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use cgmath::Vector2;
use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::utils::color::Color;

/// A structure containing configuration data, which is used to create the window
/// and to pick the shader file that should be drawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowParams,
    /// Path to the annotated shader file.
    pub shader: PathBuf,
    /// Color used to clear the back buffer every frame.
    pub clear_color: Color,
    /// Treats driver errors as fatal instead of logging them and carrying on.
    pub strict: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            window: WindowParams::default(),
            shader: PathBuf::from("res/shaders/Basic.shader"),
            clear_color: Color::black(),
            strict: cfg!(debug_assertions),
        }
    }
}

impl Settings {
    /// Loads settings from a json file. Missing fields fall back to their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => Error::FileNotFound(path.to_owned()),
            _ => Error::IO(err),
        })?;

        let settings = serde_json::from_reader(BufReader::new(file))?;
        info!("Loads settings from {:?}.", path);
        Ok(settings)
    }

    /// Parses settings from a json string.
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    /// Sets the title of window.
    pub title: String,
    /// Sets the size in *points* of the client area of the window.
    pub size: Vector2<u32>,
    /// Sets the multisampling level to request. A value of 0 indicates that
    /// multisampling must not be enabled.
    pub multisample: u16,
    /// Specifies whether should we have vsync.
    pub vsync: bool,
    /// The (major, minor) version of the core profile context.
    pub gl_version: (u8, u8),
}

impl Default for WindowParams {
    fn default() -> Self {
        WindowParams {
            title: "Hello World".to_owned(),
            size: Vector2::new(640, 480),
            multisample: 0,
            vsync: true,
            gl_version: (3, 3),
        }
    }
}
