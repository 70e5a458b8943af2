use super::*;
use pretty_assertions::assert_eq;

#[test]
fn truthiness() {
    assert!(!Value::Null.is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(Value::Bool(true).is_truthy());
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::Number(-0.0).is_truthy());
    assert!(Value::Number(0.5).is_truthy());
    assert!(Value::Number(f64::NAN).is_truthy());
    assert!(!Value::string("").is_truthy());
    assert!(Value::string("0").is_truthy());
    assert!(Value::iterator(RangeIter::exclusive(0.0, 0.0)).is_truthy());
    assert!(Value::pixel_buffer(PixelBuffer::new(1, 1)).is_truthy());
}

#[test]
fn number_display() {
    assert_eq!(Value::Number(3.0).to_string(), "3");
    assert_eq!(Value::Number(2.5).to_string(), "2.5");
    assert_eq!(Value::Number(-7.0).to_string(), "-7");
    assert_eq!(Value::Number(-0.0).to_string(), "0");
    assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
    assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
    assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
}

#[test]
fn handle_display() {
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::string("hi").to_string(), "hi");
    assert_eq!(
        Value::pixel_buffer(PixelBuffer::new(8, 2)).to_string(),
        "<pixelBuffer 8x2>"
    );
    assert_eq!(
        Value::iterator(RangeIter::exclusive(0.0, 1.0)).to_string(),
        "<iterator>"
    );
}

#[test]
fn equality_is_by_value_for_scalars_and_identity_for_handles() {
    assert_eq!(Value::string("a"), Value::string("a"));
    assert_ne!(Value::Number(1.0), Value::string("1"));
    assert_ne!(Value::Null, Value::Bool(false));

    let a = Value::pixel_buffer(PixelBuffer::new(1, 1));
    let b = Value::pixel_buffer(PixelBuffer::new(1, 1));
    assert_eq!(a, a.clone());
    assert_ne!(a, b);
}

#[test]
fn kind_names_round_trip() {
    for kind in ValueKind::ALL {
        assert_eq!(ValueKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(ValueKind::from_name("list"), None);
    assert_eq!(Value::Bool(true).kind(), ValueKind::Boolean);
    assert_eq!(ValueKind::PixelBuffer.to_string(), "pixelBuffer");
}
