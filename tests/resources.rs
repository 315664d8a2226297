extern crate glquad;

use glquad::prelude::*;
use glquad::video::backends::headless::Attribute;

const POSITIONS: [f32; 8] = [-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5];
const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

fn bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_bits().to_ne_bytes().to_vec()).collect()
}

#[test]
fn vertex_buffer() {
    let (device, stats) = Device::headless_with_stats();
    let vb = VertexBuffer::new(&device, &POSITIONS, BufferHint::Immutable).unwrap();

    assert_eq!(vb.len(), 32);
    assert!(!vb.is_empty());
    assert_eq!(stats.buffer(vb.id()), Some(bytes(&POSITIONS)));
    assert_eq!(device.bindings().array_buffer, Some(vb.id()));

    let id = vb.id();
    drop(vb);
    assert_eq!(stats.live_buffers(), 0);
    assert_eq!(stats.buffer(id), None);
    assert_eq!(device.bindings().array_buffer, None);
}

#[test]
fn empty_vertex_buffer() {
    let (device, stats) = Device::headless_with_stats();
    let vb = VertexBuffer::new(&device, &[], BufferHint::Dynamic).unwrap();

    assert!(vb.is_empty());
    assert_eq!(stats.buffer(vb.id()), Some(Vec::new()));
}

#[test]
fn index_buffer() {
    let (device, stats) = Device::headless_with_stats();
    let ib = IndexBuffer::new(&device, &INDICES, BufferHint::Immutable).unwrap();

    assert_eq!(ib.count(), 6);
    assert_eq!(stats.buffer(ib.id()).map(|v| v.len()), Some(24));
    assert_eq!(device.bindings().element_buffer, Some(ib.id()));

    ib.unbind().unwrap();
    assert_eq!(device.bindings().element_buffer, None);
    assert_eq!(stats.bindings(), device.bindings());
}

#[test]
fn vertex_array() {
    let (device, stats) = Device::headless_with_stats();
    let vb = VertexBuffer::new(&device, &[0.0; 20], BufferHint::Immutable).unwrap();
    let va = VertexArray::new(&device).unwrap();

    let layout = VertexLayout::new()
        .with(VertexFormat::Float, 3, false)
        .with(VertexFormat::UByte, 4, true);

    va.add_buffer(&vb, &layout).unwrap();
    assert_eq!(stats.pending_errors(), 0);

    let position = VertexElement {
        format: VertexFormat::Float,
        size: 3,
        normalized: false,
    };

    let color = VertexElement {
        format: VertexFormat::UByte,
        size: 4,
        normalized: true,
    };

    assert_eq!(
        stats.attribute(va.id(), 0),
        Some(Attribute {
            enabled: true,
            pointer: Some((position, 16, 0, vb.id())),
        })
    );

    assert_eq!(
        stats.attribute(va.id(), 1),
        Some(Attribute {
            enabled: true,
            pointer: Some((color, 16, 12, vb.id())),
        })
    );

    assert_eq!(stats.attribute(va.id(), 2), None);
    assert_eq!(device.bindings().vertex_array, Some(va.id()));

    drop(va);
    assert_eq!(stats.live_vertex_arrays(), 0);
    assert_eq!(device.bindings().vertex_array, None);
}

#[test]
fn element_buffer_follows_vertex_array() {
    let (device, stats) = Device::headless_with_stats();
    let va = VertexArray::new(&device).unwrap();
    va.bind().unwrap();

    let ib = IndexBuffer::new(&device, &INDICES, BufferHint::Immutable).unwrap();
    assert_eq!(device.bindings().element_buffer, Some(ib.id()));

    va.unbind().unwrap();
    assert_eq!(device.bindings().element_buffer, None);
    assert_eq!(stats.bindings(), device.bindings());

    va.bind().unwrap();
    // The element buffer is unknown after switching, while the driver restores it.
    assert_eq!(device.bindings().element_buffer, None);
    assert_eq!(stats.bindings().element_buffer, Some(ib.id()));
}

#[test]
fn bindings_agree_with_driver() {
    let (device, stats) = Device::headless_with_stats();
    let vb = VertexBuffer::new(&device, &POSITIONS, BufferHint::Immutable).unwrap();
    let va = VertexArray::new(&device).unwrap();
    va.add_buffer(&vb, &VertexLayout::new().with(VertexFormat::Float, 2, false))
        .unwrap();
    let ib = IndexBuffer::new(&device, &INDICES, BufferHint::Immutable).unwrap();
    assert_eq!(stats.bindings(), device.bindings());

    va.unbind().unwrap();
    vb.unbind().unwrap();
    ib.unbind().unwrap();
    assert_eq!(stats.bindings(), device.bindings());
    assert_eq!(device.bindings(), Bindings::default());
}

#[test]
fn allocation_failures() {
    let (device, stats) = Device::headless_with_stats();
    stats.exhaust_handles(true);

    match VertexBuffer::new(&device, &POSITIONS, BufferHint::Immutable) {
        Err(Error::Driver { code, .. }) => assert_eq!(code, glquad::gl::OUT_OF_MEMORY),
        other => panic!("unexpected result {:?}", other.map(|v| v.id())),
    }

    match VertexArray::new(&device) {
        Err(Error::Driver { code, .. }) => assert_eq!(code, glquad::gl::OUT_OF_MEMORY),
        other => panic!("unexpected result {:?}", other.map(|v| v.id())),
    }

    assert_eq!(stats.live_objects(), 0);
}

#[test]
fn null_handles() {
    let (device, stats) = Device::headless_with_stats();
    stats.limit_handles(Some(0));

    match VertexBuffer::new(&device, &POSITIONS, BufferHint::Immutable) {
        Err(Error::AllocationFailure(kind)) => assert_eq!(kind, "buffer"),
        other => panic!("unexpected result {:?}", other.map(|v| v.id())),
    }

    match IndexBuffer::new(&device, &INDICES, BufferHint::Immutable) {
        Err(Error::AllocationFailure(kind)) => assert_eq!(kind, "buffer"),
        other => panic!("unexpected result {:?}", other.map(|v| v.id())),
    }

    match VertexArray::new(&device) {
        Err(Error::AllocationFailure(kind)) => assert_eq!(kind, "vertex array"),
        other => panic!("unexpected result {:?}", other.map(|v| v.id())),
    }

    assert_eq!(stats.live_objects(), 0);
    assert_eq!(stats.pending_errors(), 0);
    assert_eq!(device.bindings(), Bindings::default());
}
