use super::*;
use logwatch_core::Color;
use std::collections::HashMap;

fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn literal_text_passes_through_untouched() {
    let template = Template::compile("hello world").unwrap();
    let rendered = render(&template, &fields(&[]), &StyleBook::default(), &RenderContext::default());
    assert!(rendered.contains("hello world"));
}

#[test]
fn field_tag_substitutes_value() {
    let template = Template::compile("[{endpoint}] {data}").unwrap();
    let rendered = render(
        &template,
        &fields(&[("endpoint", "Shell"), ("data", "booting")]),
        &StyleBook::default(),
        &RenderContext::default(),
    );
    assert!(rendered.contains("[Shell] booting"));
}

#[test]
fn uppercase_flag_transforms_field() {
    let template = Template::compile("{data:A}").unwrap();
    let rendered = render(&template, &fields(&[("data", "boot")]), &StyleBook::default(), &RenderContext::default());
    assert!(rendered.contains("BOOT"));
}

#[test]
fn width_right_aligns_by_default_and_pads_with_spaces() {
    let template = Template::compile("{data:6}").unwrap();
    let rendered = render(&template, &fields(&[("data", "ab")]), &StyleBook::default(), &RenderContext::default());
    assert!(rendered.contains("    ab"));
}

#[test]
fn zero_flag_pads_right_aligned_numeric_fields_with_zeros() {
    let template = Template::compile("{seq:0>4}").unwrap();
    let rendered = render(&template, &fields(&[("seq", "7")]), &StyleBook::default(), &RenderContext::default());
    assert!(rendered.contains("0007"));
}

#[test]
fn left_align_pads_on_the_right() {
    let template = Template::compile("{data:<6}|").unwrap();
    let rendered = render(&template, &fields(&[("data", "ab")]), &StyleBook::default(), &RenderContext::default());
    assert!(rendered.contains("ab    |"));
}

#[test]
fn superscript_flag_remaps_ascii_digits() {
    let template = Template::compile("{seq:^}").unwrap();
    let rendered = render(&template, &fields(&[("seq", "12")]), &StyleBook::default(), &RenderContext::default());
    assert!(rendered.contains("¹²"));
}

#[test]
fn endpoint_style_resolves_from_style_book() {
    let mut book = StyleBook::default();
    let mut style = logwatch_core::Style::new();
    style.set("stdout", ColorPair::new(Color(22), Color(231)));
    book.endpoints.insert("Shell".into(), style);

    let template = Template::compile("{format:endpoint}{data}{format:reset}").unwrap();
    let ctx = RenderContext { endpoint: Some("Shell".into()), fd: Some("stdout".into()), matched_watch: None };
    let rendered = render(&template, &fields(&[("data", "x")]), &book, &ctx);
    assert!(rendered.contains("48;5;22;38;5;231"));
}

#[test]
fn watch_style_takes_precedence_under_default_mode() {
    let mut book = StyleBook::default();
    book.endpoints.insert("Shell".into(), logwatch_core::Style::new());
    book.watches.insert(Register('a'), ColorPair::new(Color(196), Color::WHITE));

    let template = Template::compile("{format:default}{data}").unwrap();
    let ctx = RenderContext { endpoint: Some("Shell".into()), fd: Some("stdout".into()), matched_watch: Some(Register('a')) };
    let rendered = render(&template, &fields(&[("data", "x")]), &book, &ctx);
    assert!(rendered.contains("48;5;196"));
}

#[test]
fn plain_mode_strips_embedded_ansi_from_field_value() {
    let template = Template::compile("{format:default,plain}{data}").unwrap();
    let rendered = render(
        &template,
        &fields(&[("data", "\x1b[31mred\x1b[0m")]),
        &StyleBook::default(),
        &RenderContext::default(),
    );
    assert!(rendered.contains("red"));
    assert!(!strip_ansi(&rendered).is_empty());
    assert!(!rendered.contains("[31m"));
}

#[test]
fn embedded_reset_inside_field_value_is_followed_by_style_reassertion() {
    let mut book = StyleBook::default();
    let mut style = logwatch_core::Style::new();
    style.set("stdout", ColorPair::new(Color(22), Color(231)));
    book.endpoints.insert("Shell".into(), style);

    let template = Template::compile("{format:endpoint}{data}").unwrap();
    let ctx = RenderContext { endpoint: Some("Shell".into()), fd: Some("stdout".into()), matched_watch: None };
    let rendered = render(&template, &fields(&[("data", "a\x1b[0mb")]), &book, &ctx);
    let occurrences = rendered.matches("48;5;22;38;5;231").count();
    assert_eq!(occurrences, 2);
}

#[test]
fn unterminated_tag_is_a_template_error() {
    assert!(Template::compile("{oops").is_err());
}

#[test]
fn unknown_format_mode_is_a_template_error() {
    assert!(Template::compile("{format:bogus}").is_err());
}
