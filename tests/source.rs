extern crate glquad;
extern crate rand;

use std::io::Cursor;

use rand::distributions::Alphanumeric;
use rand::Rng;

use glquad::prelude::*;

#[test]
fn split_file() {
    let source = ShaderSource::from_file("tests/resources/Basic.shader").unwrap();

    assert!(source.vertex.starts_with("#version 330 core\n"));
    assert!(source.vertex.contains("gl_Position = position;"));
    assert!(!source.vertex.contains("u_Color"));

    assert!(source.fragment.starts_with("#version 330 core\n"));
    assert!(source.fragment.contains("uniform vec4 u_Color;"));
    assert!(!source.fragment.contains("gl_Position"));

    assert!(!source.vertex.contains("#shader"));
    assert!(!source.fragment.contains("#shader"));
    assert_eq!(source.stage(ShaderStage::Fragment), source.fragment);
}

#[test]
fn missing_file() {
    match ShaderSource::from_file("tests/resources/Missing.shader") {
        Err(Error::FileNotFound(path)) => assert!(path.ends_with("Missing.shader")),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn reader_and_text_agree_on_line_endings() {
    let text = "// preamble\n#shader vertex\nA\r\n\n#shader fragment\nB\n#shader vertex\nC";
    let from_reader = ShaderSource::from_reader(Cursor::new(text)).unwrap();
    let from_text = ShaderSource::parse(text);

    assert_eq!(from_reader, from_text);
    assert_eq!(from_text.vertex, "A\r\n\nC\n");
    assert_eq!(from_text.fragment, "B\n");
}

#[test]
fn empty() {
    assert_eq!(ShaderSource::parse(""), ShaderSource::default());
    assert_eq!(ShaderSource::parse("A\nB\n"), ShaderSource::default());

    let source = ShaderSource::parse("#shader vertex\n#shader fragment\n");
    assert_eq!(source, ShaderSource::default());
}

#[test]
fn random_sections() {
    let mut rng = rand::thread_rng();

    for _ in 0..64 {
        let mut text = String::new();
        let mut expected = ShaderSource::default();

        for _ in 0..rng.gen_range(0, 8) {
            let stage = if rng.gen() {
                ShaderStage::Vertex
            } else {
                ShaderStage::Fragment
            };

            text.push_str(&format!("#shader {}\n", stage));
            for _ in 0..rng.gen_range(0, 6) {
                let len = rng.gen_range(0, 24);
                let line: String = rng.sample_iter(&Alphanumeric).take(len).collect();

                text.push_str(&line);
                text.push('\n');

                let buf = match stage {
                    ShaderStage::Vertex => &mut expected.vertex,
                    ShaderStage::Fragment => &mut expected.fragment,
                };

                buf.push_str(&line);
                buf.push('\n');
            }
        }

        assert_eq!(ShaderSource::parse(&text), expected);
    }
}
