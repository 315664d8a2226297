//! Small value types shared by the video and window modules.

pub mod color;
