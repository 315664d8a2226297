use std::cmp;
use std::ffi;

/// The version of the OpenGL implementation behind a context. Versions of
/// different APIs are unordered, so `GL(3, 0)` is neither above nor below `ES(3, 0)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    GL(u8, u8),
    ES(u8, u8),
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        match (*self, *other) {
            (Version::GL(a, b), Version::GL(c, d)) | (Version::ES(a, b), Version::ES(c, d)) => {
                Some((a, b).cmp(&(c, d)))
            }
            _ => None,
        }
    }
}

impl Version {
    /// Parses the string returned by `glGetString(GL_VERSION)`, like
    /// `4.6.0 NVIDIA 535.54` or `OpenGL ES 3.2 Mesa 23.0`.
    pub fn parse(desc: &str) -> Option<Version> {
        let (es, desc) = if desc.starts_with("OpenGL ES ") {
            (true, desc.get(10..)?)
        } else if desc.starts_with("OpenGL ES-") {
            (true, desc.get(13..)?)
        } else {
            (false, desc)
        };

        let desc = desc.split(' ').next()?;
        let mut iter = desc.split('.');
        let major = iter.next()?.parse().ok()?;
        let minor = iter.next()?.parse().ok()?;

        if es {
            Some(Version::ES(major, minor))
        } else {
            Some(Version::GL(major, minor))
        }
    }

    /// Returns true if vertex array objects are part of the core API.
    pub fn has_vertex_array_object(self) -> bool {
        self >= Version::GL(3, 0) || self >= Version::ES(3, 0)
    }
}

/// Returns `glGetString(GL_VERSION)` of the current context, or an empty string.
///
/// # Safety
///
/// The loaded symbols must belong to the context current on this thread.
pub unsafe fn version_string() -> String {
    let desc = gl::GetString(gl::VERSION);
    if desc.is_null() {
        return String::new();
    }

    ffi::CStr::from_ptr(desc as *const _)
        .to_string_lossy()
        .into_owned()
}
