extern crate glquad;

use std::path::PathBuf;

use glquad::cgmath::Vector2;
use glquad::prelude::*;

#[test]
fn load() {
    let settings = Settings::load("tests/resources/Settings.json").unwrap();

    assert_eq!(settings.window.title, "Quad");
    assert_eq!(settings.window.size, Vector2::new(800, 600));
    assert!(!settings.window.vsync);
    assert_eq!(settings.window.multisample, 0);
    assert_eq!(settings.window.gl_version, (3, 3));

    assert_eq!(settings.shader, PathBuf::from("tests/resources/Basic.shader"));
    assert_eq!(settings.clear_color, Color::new(0.2, 0.3, 0.3, 1.0));
    assert!(settings.strict);
}

#[test]
fn defaults() {
    let settings = Settings::parse("{}").unwrap();

    assert_eq!(settings.window.title, "Hello World");
    assert_eq!(settings.window.size, Vector2::new(640, 480));
    assert!(settings.window.vsync);
    assert_eq!(settings.shader, PathBuf::from("res/shaders/Basic.shader"));
    assert_eq!(settings.clear_color, Color::black());
    assert_eq!(settings.strict, cfg!(debug_assertions));

    let settings = Settings::parse(r#"{ "window": { "gl_version": [4, 1] } }"#).unwrap();
    assert_eq!(settings.window.gl_version, (4, 1));
    assert_eq!(settings.window.title, "Hello World");
}

#[test]
fn errors() {
    match Settings::load("tests/resources/Missing.json") {
        Err(Error::FileNotFound(_)) => {}
        other => panic!("unexpected result {:?}", other),
    }

    match Settings::parse(r#"{ "window": { "size": "large" } }"#) {
        Err(Error::Malformed(_)) => {}
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn demo_settings() {
    let settings = Settings::load("res/configs/quad.json").unwrap();
    let source = ShaderSource::from_file(&settings.shader).unwrap();
    assert!(source.fragment.contains("u_Color"));
}
