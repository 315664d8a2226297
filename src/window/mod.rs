//! Represents an OpenGL context and the window around it.

use cgmath::Vector2;
use glutin::GlContext;

use crate::errors::*;
use crate::settings::WindowParams;

/// A window with a current OpenGL core profile context.
pub struct Window {
    window: glutin::GlWindow,
    events_loop: glutin::EventsLoop,
    closed: bool,
}

impl Window {
    /// Creates a window, makes its context current on the calling thread and loads
    /// the GL symbols from it.
    pub fn new(params: &WindowParams) -> Result<Self> {
        let builder = glutin::WindowBuilder::new()
            .with_title(params.title.clone())
            .with_dimensions(glutin::dpi::LogicalSize::new(
                f64::from(params.size.x),
                f64::from(params.size.y),
            ));

        let (major, minor) = params.gl_version;
        let context = glutin::ContextBuilder::new()
            .with_multisampling(params.multisample)
            .with_gl_profile(glutin::GlProfile::Core)
            .with_gl(glutin::GlRequest::Specific(glutin::Api::OpenGl, (major, minor)))
            .with_vsync(params.vsync);

        let events_loop = glutin::EventsLoop::new();
        let window = glutin::GlWindow::new(builder, context, &events_loop)?;

        unsafe {
            window.make_current()?;
            gl::load_with(|symbol| window.get_proc_address(symbol) as *const _);
        }

        info!(
            "Creates window {:?} of {}x{} with OpenGL {}.{} core profile.",
            params.title, params.size.x, params.size.y, major, minor
        );

        Ok(Window {
            window,
            events_loop,
            closed: false,
        })
    }

    /// Returns the size in *pixels* of the client area of the window.
    pub fn dimensions(&self) -> Vector2<u32> {
        let dpr = self.window.get_hidpi_factor();
        match self.window.get_inner_size() {
            Some(size) => {
                let size = size.to_physical(dpr);
                Vector2::new(size.width as u32, size.height as u32)
            }
            None => Vector2::new(0, 0),
        }
    }

    /// Swaps the back and front buffers.
    pub fn swap_buffers(&self) -> Result<()> {
        self.window.swap_buffers()?;
        Ok(())
    }

    /// Processes pending events. Returns false once closing has been requested.
    pub fn poll_events(&mut self) -> bool {
        let window = &self.window;
        let closed = &mut self.closed;

        self.events_loop.poll_events(|event| {
            if let glutin::Event::WindowEvent { event, .. } = event {
                match event {
                    glutin::WindowEvent::CloseRequested | glutin::WindowEvent::Destroyed => {
                        *closed = true;
                    }
                    glutin::WindowEvent::Resized(size) => {
                        window.resize(size.to_physical(window.get_hidpi_factor()));
                    }
                    _ => {}
                }
            }
        });

        !self.closed
    }
}
