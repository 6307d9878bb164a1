//! Serde serialization/deserialization round-trip tests.
//!
//! These tests verify that the serializable data types can be written to JSON
//! and read back, producing equal values.

#![cfg(feature = "serde")]

use pdfrows_core::*;

/// Helper: serialize to JSON string, deserialize back, assert equality.
fn roundtrip<T>(value: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let json = serde_json::to_string(value).expect("serialize failed");
    let restored: T = serde_json::from_str(&json).expect("deserialize failed");
    assert_eq!(*value, restored, "round-trip mismatch for JSON: {json}");
}

fn sample_char(text: &str, x0: f64) -> Char {
    Char {
        text: text.to_string(),
        bbox: BBox::new(x0, 20.0, x0 + 6.0, 32.0),
        fontname: "Helvetica".to_string(),
        size: 12.0,
        upright: true,
        char_code: text.chars().next().map_or(0, u32::from),
    }
}

// --- Geometry types ---

#[test]
fn test_serde_point() {
    roundtrip(&Point::new(3.25, 2.5));
}

#[test]
fn test_serde_orientation() {
    roundtrip(&Orientation::Horizontal);
    roundtrip(&Orientation::Vertical);
    roundtrip(&Orientation::Diagonal);
}

#[test]
fn test_serde_bbox() {
    roundtrip(&BBox::new(10.0, 20.0, 300.0, 400.0));
}

// --- Text types ---

#[test]
fn test_serde_char() {
    roundtrip(&sample_char("A", 10.0));
}

#[test]
fn test_serde_char_non_ascii() {
    roundtrip(&sample_char("Ü", 0.0));
}

#[test]
fn test_serde_word() {
    let chars = vec![sample_char("h", 10.0), sample_char("i", 16.0)];
    let words = WordExtractor::extract(&chars, &WordOptions::default());
    assert_eq!(words.len(), 1);
    roundtrip(&words[0]);
}

#[test]
fn test_bbox_field_names_in_json() {
    let json = serde_json::to_string(&BBox::new(1.0, 2.0, 3.0, 4.0)).unwrap();
    assert_eq!(json, r#"{"x0":1.0,"top":2.0,"x1":3.0,"bottom":4.0}"#);
}
