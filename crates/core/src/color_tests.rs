use super::*;

#[test]
fn resolves_named_colors() {
    assert_eq!(Color::resolve("white"), Color(231));
    assert_eq!(Color::resolve("black"), Color(16));
    assert_eq!(Color::resolve("none"), Color(-1));
    assert_eq!(Color::resolve("grey12"), Color(243));
}

#[test]
fn resolves_ramp_colors() {
    assert_eq!(Color::resolve("red1"), Color(16 + 36));
    assert_eq!(Color::resolve("green5"), Color(16 + 5 * 6));
}

#[test]
fn resolves_decimal_fallback() {
    assert_eq!(Color::resolve("17"), Color(17));
    assert_eq!(Color::resolve("-1"), Color(-1));
}

#[test]
fn unknown_name_falls_back_to_none() {
    assert_eq!(Color::resolve("chartreuse"), Color::NONE);
    assert_eq!(Color::resolve(""), Color::NONE);
}

#[test]
fn is_none_reflects_sentinel() {
    assert!(Color::NONE.is_none());
    assert!(!Color::WHITE.is_none());
}

#[test]
fn deserializes_from_either_int_or_name() {
    let from_int: Color = serde_json::from_str("-1").unwrap();
    assert_eq!(from_int, Color::NONE);
    let from_name: Color = serde_json::from_str("\"green5\"").unwrap();
    assert_eq!(from_name, Color(16 + 5 * 6));
}
