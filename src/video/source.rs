//! Splits an annotated shader file into the sources of its stages.
//!
//! A shader file keeps both stages of a program together. A line containing
//! `#shader vertex` or `#shader fragment` starts the section of that stage, and
//! every following line belongs to it until the next header:
//!
//! ```glsl
//! #shader vertex
//! #version 330 core
//! layout(location = 0) in vec4 position;
//! void main() { gl_Position = position; }
//!
//! #shader fragment
//! #version 330 core
//! layout(location = 0) out vec4 color;
//! uniform vec4 u_Color;
//! void main() { color = u_Color; }
//! ```
//!
//! Lines are split at `\n` only, so a `\r` of CRLF line endings stays part of the
//! line. Lines before the first header are dropped. Headers are not part of any
//! section, while a `#shader` line naming no known stage is kept as an ordinary
//! line.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use super::shader::ShaderStage;
use crate::errors::*;

const HEADER: &str = "#shader";

/// The sources of a vertex and a fragment stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    /// Reads and splits the shader file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => Error::FileNotFound(path.to_owned()),
            _ => Error::IO(err),
        })?;

        let source = Self::from_reader(BufReader::new(file))?;
        debug!(
            "Splits {:?} into {} bytes of vertex and {} bytes of fragment shader.",
            path,
            source.vertex.len(),
            source.fragment.len()
        );

        Ok(source)
    }

    /// Splits the lines read from `reader`.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut splitter = Splitter::default();
        let mut line = String::new();
        while reader.read_line(&mut line)? > 0 {
            if line.ends_with('\n') {
                line.pop();
            }

            splitter.feed(&line);
            line.clear();
        }

        Ok(splitter.finish())
    }

    /// Splits the lines of `text`.
    pub fn parse(text: &str) -> Self {
        let mut splitter = Splitter::default();
        for line in text.split_terminator('\n') {
            splitter.feed(line);
        }

        splitter.finish()
    }

    #[inline]
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// Returns the stage a header line switches to. `vertex` or `fragment` has to
/// follow the `#shader` token.
fn header(line: &str) -> Option<ShaderStage> {
    let pos = line.find(HEADER)?;
    let rest = &line[pos + HEADER.len()..];
    if rest.contains("vertex") {
        Some(ShaderStage::Vertex)
    } else if rest.contains("fragment") {
        Some(ShaderStage::Fragment)
    } else {
        None
    }
}

#[derive(Default)]
struct Splitter {
    current: Option<ShaderStage>,
    source: ShaderSource,
}

impl Splitter {
    fn feed(&mut self, line: &str) {
        match header(line) {
            Some(stage) => {
                self.current = Some(stage);
                return;
            }
            None if line.contains(HEADER) => {
                warn!("Keeps shader line without a known stage as source: {:?}.", line);
            }
            None => {}
        }

        let buf = match self.current {
            Some(ShaderStage::Vertex) => &mut self.source.vertex,
            Some(ShaderStage::Fragment) => &mut self.source.fragment,
            None => return,
        };

        buf.push_str(line);
        buf.push('\n');
    }

    fn finish(self) -> ShaderSource {
        self.source
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn split() {
        let source = ShaderSource::parse("#shader vertex\nA\nB\n#shader fragment\nC\n");
        assert_eq!(source.vertex, "A\nB\n");
        assert_eq!(source.fragment, "C\n");
    }

    #[test]
    fn header_needs_stage_after_token() {
        assert_eq!(header("#shader vertex"), Some(ShaderStage::Vertex));
        assert_eq!(header("  // #shader fragment"), Some(ShaderStage::Fragment));
        assert_eq!(header("vertex #shader"), None);
        assert_eq!(header("#shader geometry"), None);
    }

    #[test]
    fn unknown_header_is_source() {
        let source = ShaderSource::parse("#shader fragment\nA\n#shader geometry\nB\n");
        assert_eq!(source.vertex, "");
        assert_eq!(source.fragment, "A\n#shader geometry\nB\n");
    }

    #[test]
    fn header_is_case_sensitive() {
        let source = ShaderSource::parse("#SHADER vertex\nA\n#shader Vertex\nB\n");
        assert_eq!(source, ShaderSource::default());
    }

    #[test]
    fn carriage_returns_are_kept() {
        let text = "#shader vertex\r\nA\r\n\r\n#shader fragment\nB";
        let source = ShaderSource::parse(text);
        assert_eq!(source.vertex, "A\r\n\r\n");
        assert_eq!(source.fragment, "B\n");
        assert_eq!(ShaderSource::from_reader(text.as_bytes()).unwrap(), source);
    }

    #[test]
    fn last_line_without_newline() {
        let source = ShaderSource::parse("#shader vertex\nA");
        assert_eq!(source.vertex, "A\n");
    }
}
