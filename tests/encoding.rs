use std::fs;
use std::path::Path;
use std::sync::Arc;

use polyres::{
    Locale, MemoryProvider, ResolutionEngine, Resources, FsProvider, TypeRegistry, TypeSpec,
};

const KEY: &str = "test";
const VALUE: &str = "touché";

fn utf16(text: &str, big_endian: bool) -> Vec<u8> {
    let mut bytes = if big_endian {
        vec![0xFE, 0xFF]
    } else {
        vec![0xFF, 0xFE]
    };
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&if big_endian {
            unit.to_be_bytes()
        } else {
            unit.to_le_bytes()
        });
    }
    bytes
}

fn utf32(text: &str, big_endian: bool) -> Vec<u8> {
    let mut bytes = if big_endian {
        vec![0x00, 0x00, 0xFE, 0xFF]
    } else {
        vec![0xFF, 0xFE, 0x00, 0x00]
    };
    for ch in text.chars() {
        bytes.extend_from_slice(&if big_endian {
            (ch as u32).to_be_bytes()
        } else {
            (ch as u32).to_le_bytes()
        });
    }
    bytes
}

fn utf8_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(ch as u32).expect("latin-1 range"))
        .collect()
}

/// Resolves `bundle.Messages` from a directory holding one bundle file.
fn resolve_from_dir(dir: &Path) -> Resources {
    let mut registry = TypeRegistry::new();
    let messages = registry.define(TypeSpec::new("bundle.Messages")).unwrap();
    let engine = ResolutionEngine::builder()
        .graph(Arc::new(registry))
        .provider(Arc::new(FsProvider::new(dir)))
        .build()
        .unwrap();
    engine.resolve(messages, &Locale::root()).unwrap()
}

fn decode_file(bytes: &[u8]) -> String {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("bundle")).unwrap();
    fs::write(dir.path().join("bundle/Messages.properties"), bytes).unwrap();
    resolve_from_dir(dir.path()).get_string(KEY).unwrap()
}

#[test]
fn plain_ascii_and_unicode_variants_decode_identically() {
    let line = format!("{KEY}={VALUE}");

    let ascii_value = decode_file(format!("{KEY}=ascii-only").as_bytes());
    assert_eq!(ascii_value, "ascii-only");

    let variants: [(&str, Vec<u8>); 6] = [
        ("utf-8 no bom", line.as_bytes().to_vec()),
        ("utf-8 bom", utf8_bom(&line)),
        ("utf-16be", utf16(&line, true)),
        ("utf-16le", utf16(&line, false)),
        ("utf-32be", utf32(&line, true)),
        ("utf-32le", utf32(&line, false)),
    ];
    for (label, bytes) in variants {
        let decoded = decode_file(&bytes);
        assert_eq!(decoded, VALUE, "variant {label}");
        assert_eq!(decoded.chars().count(), 6, "variant {label}");
    }
}

#[test]
fn legacy_single_byte_bundle_decodes_through_retry() {
    // 'é' is 0xE9 in ISO-8859-1, which is invalid UTF-8
    let decoded = decode_file(&latin1(&format!("{KEY}={VALUE}")));
    assert_eq!(decoded, VALUE);
}

#[test]
fn unicode_escapes_match_raw_encoding() {
    let escaped = decode_file(format!("{KEY}=touch\\u00e9").as_bytes());
    assert_eq!(escaped, VALUE);
}

#[test]
fn undecodable_bundle_is_a_hard_error() {
    // valid UTF-8, malformed escape: not eligible for the legacy retry
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("bundle")).unwrap();
    fs::write(
        dir.path().join("bundle/Messages.properties"),
        b"test=\\u00zz",
    )
    .unwrap();

    let mut registry = TypeRegistry::new();
    let messages = registry.define(TypeSpec::new("bundle.Messages")).unwrap();
    let engine = ResolutionEngine::builder()
        .graph(Arc::new(registry))
        .provider(Arc::new(FsProvider::new(dir.path())))
        .build()
        .unwrap();

    let err = engine.resolve(messages, &Locale::root()).unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn not_found_is_silently_skipped_but_decode_failure_is_not() {
    // the en_US tier is malformed; the search must fail hard rather than
    // silently falling through to the root tier
    let provider = MemoryProvider::new()
        .with("bundle/Messages_en_US.properties", vec![0xFE, 0xFF, 0xD8])
        .with("bundle/Messages.properties", &b"test=root"[..]);

    let mut registry = TypeRegistry::new();
    let messages = registry.define(TypeSpec::new("bundle.Messages")).unwrap();
    let engine = ResolutionEngine::builder()
        .graph(Arc::new(registry))
        .provider(Arc::new(provider))
        .build()
        .unwrap();

    let err = engine
        .resolve(messages, &"en-US".parse().unwrap())
        .unwrap_err();
    assert!(err.is_decode());

    // with no en_US bundle at all, the root tier answers
    let provider = MemoryProvider::new().with("bundle/Messages.properties", &b"test=root"[..]);
    let mut registry = TypeRegistry::new();
    let messages = registry.define(TypeSpec::new("bundle.Messages")).unwrap();
    let engine = ResolutionEngine::builder()
        .graph(Arc::new(registry))
        .provider(Arc::new(provider))
        .build()
        .unwrap();
    let resources = engine.resolve(messages, &"en-US".parse().unwrap()).unwrap();
    assert_eq!(resources.get_string(KEY).unwrap(), "root");
}
