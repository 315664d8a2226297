#[macro_use]
extern crate glquad;

use glquad::gl;
use glquad::prelude::*;
use glquad::video::probe;

#[test]
fn reports_call_site() {
    let device = Device::headless();

    let line = line!() + 1;
    let result = probe!(device, v => v.bind_buffer(BufferTarget::Array, 42));
    match result {
        Err(Error::Driver {
            code,
            description,
            operation,
            file,
            line: at,
        }) => {
            assert_eq!(code, gl::INVALID_OPERATION);
            assert_eq!(description, probe::describe(gl::INVALID_OPERATION));
            assert!(operation.contains("bind_buffer"));
            assert!(file.ends_with("probe.rs"));
            assert_eq!(at, line);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn display() {
    let device = Device::headless();
    let err = probe!(device, v => v.use_program(7)).unwrap_err();
    let text = format!("{}", err);

    assert!(text.starts_with("[OpenGL Error] (1281): v.use_program(7)"));
    assert!(text.ends_with(&format!("({})", probe::describe(gl::INVALID_VALUE))));
}

#[test]
fn returns_value() {
    let device = Device::headless();
    let id = probe!(device, v => v.create_buffer()).unwrap();
    assert_ne!(id, 0);

    let version = probe!(device, v => v.version()).unwrap();
    assert_eq!(version, device.version());
}

#[test]
fn stale_errors_are_drained() {
    let (device, stats) = Device::headless_with_stats();
    stats.inject_error(gl::INVALID_ENUM);
    stats.inject_error(gl::INVALID_VALUE);

    assert!(probe!(device, v => v.clear()).is_ok());
    assert_eq!(stats.pending_errors(), 0);
    assert_eq!(stats.clears(), 1);
}

#[test]
fn lost_context() {
    let (device, stats) = Device::headless_with_stats();
    for _ in 0..(probe::MAX_DRAINED_ERRORS + 1) {
        stats.inject_error(gl::OUT_OF_MEMORY);
    }

    // The drain gives up, and the leftover is blamed on the call.
    match probe!(device, v => v.clear()) {
        Err(Error::Driver { code, .. }) => assert_eq!(code, gl::OUT_OF_MEMORY),
        other => panic!("unexpected result {:?}", other),
    }

    assert_eq!(stats.pending_errors(), 0);
}

#[test]
fn describe_codes() {
    let codes = [
        gl::INVALID_ENUM,
        gl::INVALID_VALUE,
        gl::INVALID_OPERATION,
        gl::INVALID_FRAMEBUFFER_OPERATION,
        gl::OUT_OF_MEMORY,
        gl::STACK_UNDERFLOW,
        gl::STACK_OVERFLOW,
    ];

    for &code in &codes {
        assert_ne!(probe::describe(code), probe::describe(0xFFFF));
    }

    assert_eq!(probe::describe(0xFFFF), "Oops, Unknown OpenGL error.");
}
