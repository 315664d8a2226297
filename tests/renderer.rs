extern crate glquad;

use glquad::prelude::*;
use glquad::video::backends::headless::DrawCall;

const POSITIONS: [f32; 8] = [-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5];
const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

struct Quad {
    vb: VertexBuffer,
    va: VertexArray,
    ib: IndexBuffer,
    shader: Shader,
}

impl Quad {
    fn new(device: &std::rc::Rc<Device>) -> Result<Self> {
        let vb = VertexBuffer::new(device, &POSITIONS, BufferHint::Immutable)?;
        let va = VertexArray::new(device)?;
        va.add_buffer(&vb, &VertexLayout::new().with(VertexFormat::Float, 2, false))?;
        let ib = IndexBuffer::new(device, &INDICES, BufferHint::Immutable)?;
        let shader = Shader::from_file(device, "tests/resources/Basic.shader")?;

        va.unbind()?;
        vb.unbind()?;
        ib.unbind()?;
        shader.unbind()?;

        Ok(Quad { vb, va, ib, shader })
    }
}

#[test]
fn draw() {
    let (device, stats) = Device::headless_with_stats();
    let quad = Quad::new(&device).unwrap();
    assert_eq!(device.bindings(), Bindings::default());

    let renderer = Renderer::new(&device);
    renderer.draw(&quad.va, &quad.ib, &quad.shader).unwrap();

    assert_eq!(
        stats.draws(),
        vec![DrawCall {
            program: quad.shader.id(),
            vertex_array: quad.va.id(),
            element_buffer: quad.ib.id(),
            count: 6,
        }]
    );

    assert_eq!(device.bindings().program, Some(quad.shader.id()));
    assert_eq!(device.bindings().vertex_array, Some(quad.va.id()));
    assert_eq!(device.bindings().element_buffer, Some(quad.ib.id()));
    assert_eq!(stats.pending_errors(), 0);
}

#[test]
fn frames() {
    let (device, stats) = Device::headless_with_stats();
    let quad = Quad::new(&device).unwrap();
    let renderer = Renderer::new(&device);
    renderer.set_clear_color(Color::gray()).unwrap();

    let (mut r, mut increment) = (0.0f32, 0.05f32);
    for _ in 0..60 {
        renderer.clear().unwrap();
        quad.shader.set_uniform_4f("u_Color", r, 0.3, 0.8, 1.0).unwrap();
        renderer.draw(&quad.va, &quad.ib, &quad.shader).unwrap();

        if r > 1.0 {
            increment = -0.05;
        } else if r < 0.0 {
            increment = 0.05;
        }

        r += increment;

        // Something else takes over the bindings between frames.
        quad.va.unbind().unwrap();
        quad.shader.unbind().unwrap();
    }

    assert_eq!(stats.clears(), 60);
    assert_eq!(stats.clear_color(), Color::gray());
    assert_eq!(stats.draws().len(), 60);
    assert!(stats.draws().iter().all(|v| v.count == 6));
    assert_eq!(quad.shader.cached_uniforms(), 1);

    match stats.uniform(quad.shader.id(), "u_Color") {
        Some(UniformVariable::Vector4f(v)) => assert!(v[0] > -0.1 && v[0] < 1.1),
        other => panic!("unexpected uniform {:?}", other),
    }

    assert_eq!(quad.vb.len(), 32);
}

#[test]
fn draw_with_deleted_shader() {
    let (device, stats) = Device::headless_with_stats();
    let mut quad = Quad::new(&device).unwrap();
    quad.shader.delete().unwrap();

    let renderer = Renderer::new(&device);
    match renderer.draw(&quad.va, &quad.ib, &quad.shader) {
        Err(Error::InvalidHandle(_)) => {}
        other => panic!("unexpected result {:?}", other),
    }

    assert!(stats.draws().is_empty());
}

#[test]
fn release_everything() {
    let (device, stats) = Device::headless_with_stats();
    let quad = Quad::new(&device).unwrap();
    Renderer::new(&device).draw(&quad.va, &quad.ib, &quad.shader).unwrap();

    drop(quad);
    assert_eq!(stats.live_objects(), 0);
    assert_eq!(stats.pending_errors(), 0);
    assert_eq!(device.bindings(), Bindings::default());
}
