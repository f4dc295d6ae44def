use super::*;

#[test]
fn parses_six_digit_hex() {
    let c: Color = "#ff6600".parse().unwrap();
    assert_eq!(c, Color::rgb(0xff, 0x66, 0x00));
}

#[test]
fn parses_eight_digit_hex_with_alpha() {
    let c: Color = "#FFFF0040".parse().unwrap();
    assert_eq!(c, Color::rgb(0xff, 0xff, 0x00).with_alpha(0x40));
}

#[test]
fn display_omits_opaque_alpha() {
    assert_eq!(Color::rgb(0xff, 0, 0).to_string(), "#ff0000");
    assert_eq!(Color::rgb(0xff, 0xff, 0).with_alpha(0x40).to_string(), "#ffff0040");
}

#[test]
fn rejects_missing_hash() {
    assert_eq!("ff0000".parse::<Color>(), Err(ColorError::MissingHash("ff0000".into())));
}

#[test]
fn rejects_short_and_named_colors() {
    assert!(matches!("#f00".parse::<Color>(), Err(ColorError::BadLength(_))));
    assert!(matches!("red".parse::<Color>(), Err(ColorError::MissingHash(_))));
}

#[test]
fn rejects_non_hex_digits() {
    assert!(matches!("#gg0000".parse::<Color>(), Err(ColorError::BadDigit(_))));
    assert!(matches!("#+1+1+1".parse::<Color>(), Err(ColorError::BadDigit(_))));
    assert!(matches!("#ff00ff-1".parse::<Color>(), Err(ColorError::BadLength(_))));
    assert!(matches!("#ff00+f".parse::<Color>(), Err(ColorError::BadDigit(_))));
}

#[test]
fn rejects_multibyte_body_without_panicking() {
    assert!(matches!("#ff00é0".parse::<Color>(), Err(ColorError::BadLength(_))));
}

#[test]
fn per_kind_defaults() {
    assert_eq!(Color::default_for(AnnotationKind::Circle).to_string(), "#ff0000");
    assert_eq!(Color::default_for(AnnotationKind::Highlight).to_string(), "#ffff00");
    assert_eq!(Color::default_for(AnnotationKind::Arrow).to_string(), "#ff6600");
    assert_eq!(Color::default_for(AnnotationKind::Text).to_string(), "#000000");
}

#[test]
fn serde_uses_hex_string() {
    let json = serde_json::to_string(&Color::rgb(1, 2, 3)).unwrap();
    assert_eq!(json, "\"#010203\"");
    let back: Color = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Color::rgb(1, 2, 3));
}

#[test]
fn serde_rejects_bad_color() {
    let err = serde_json::from_str::<Color>("\"blue\"").unwrap_err();
    assert!(err.to_string().contains("must start with '#'"));
}
