use super::*;

#[test]
fn falls_back_to_default_tag() {
    let mut style = Style::new();
    style.set(DEFAULT_TAG, ColorPair::new(Color(1), Color(2)));
    assert_eq!(style.get("stdout"), ColorPair::new(Color(1), Color(2)));
}

#[test]
fn explicit_tag_wins_over_default() {
    let mut style = Style::new();
    style.set(DEFAULT_TAG, ColorPair::new(Color(1), Color(2)));
    style.set("stderr", ColorPair::new(Color(9), Color(9)));
    assert_eq!(style.get("stderr"), ColorPair::new(Color(9), Color(9)));
    assert_eq!(style.get("stdout"), ColorPair::new(Color(1), Color(2)));
}

#[test]
fn missing_tag_and_default_resets() {
    let style = Style::new();
    assert_eq!(style.get("stdout"), ColorPair::RESET);
}
