//! Draws a quad whose red channel bounces between 0 and 1.

extern crate env_logger;
extern crate glquad;
#[macro_use]
extern crate log;

use std::process::exit;

use glquad::prelude::*;

const POSITIONS: [f32; 8] = [-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5];
const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];
const INCREMENT: f32 = 0.05;

/// Returns the error if it should end the demo, otherwise logs and drops it.
fn tolerate(strict: bool, result: Result<()>) -> Result<()> {
    if let Err(ref err @ Error::Driver { .. }) = result {
        if !strict {
            warn!("Ignores driver error. {}", err);
            return Ok(());
        }
    }

    result
}

fn run(settings: &Settings) -> Result<()> {
    let mut window = Window::new(&settings.window)?;
    let device = unsafe { Device::gl()? };

    let vb = VertexBuffer::new(&device, &POSITIONS, BufferHint::Immutable)?;
    let layout = VertexLayout::new().with(VertexFormat::Float, 2, false);
    let va = VertexArray::new(&device)?;
    va.add_buffer(&vb, &layout)?;
    let ib = IndexBuffer::new(&device, &INDICES, BufferHint::Immutable)?;

    let shader = Shader::from_file(&device, &settings.shader)?;
    let renderer = Renderer::new(&device);
    renderer.set_clear_color(settings.clear_color)?;

    va.unbind()?;
    vb.unbind()?;
    ib.unbind()?;
    shader.unbind()?;

    let (mut r, mut increment) = (0.0, INCREMENT);
    while window.poll_events() {
        tolerate(settings.strict, renderer.clear())?;
        tolerate(settings.strict, shader.set_uniform_4f("u_Color", r, 0.3, 0.8, 1.0))?;
        tolerate(settings.strict, renderer.draw(&va, &ib, &shader))?;

        if r > 1.0 {
            increment = -INCREMENT;
        } else if r < 0.0 {
            increment = INCREMENT;
        }

        r += increment;
        window.swap_buffers()?;
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let settings = match Settings::load("res/configs/quad.json") {
        Ok(settings) => settings,
        Err(err) => {
            warn!("Falls back to default settings. {}", err);
            Settings::default()
        }
    };

    if let Err(err) = run(&settings) {
        error!("{}", err);
        exit(1);
    }
}
