use super::*;
use crossterm::event::KeyCode;

fn key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

#[test]
fn plain_char_translates_to_char_key() {
    let event = key_event(KeyCode::Char('p'), KeyModifiers::NONE);
    assert_eq!(translate(event), Some(Key::Char('p')));
}

#[test]
fn ctrl_char_translates_to_ctrl_key() {
    let event = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(translate(event), Some(Key::Ctrl('c')));
}

#[test]
fn alt_char_translates_to_alt_key() {
    let event = key_event(KeyCode::Char('x'), KeyModifiers::ALT);
    assert_eq!(translate(event), Some(Key::Alt('x')));
}

#[test]
fn function_key_translates_with_its_number() {
    let event = key_event(KeyCode::F(5), KeyModifiers::NONE);
    assert_eq!(translate(event), Some(Key::Function(5)));
}

#[test]
fn navigation_and_editing_keys_translate() {
    assert_eq!(translate(key_event(KeyCode::Enter, KeyModifiers::NONE)), Some(Key::Enter));
    assert_eq!(translate(key_event(KeyCode::Backspace, KeyModifiers::NONE)), Some(Key::Backspace));
    assert_eq!(translate(key_event(KeyCode::Esc, KeyModifiers::NONE)), Some(Key::Esc));
    assert_eq!(translate(key_event(KeyCode::Up, KeyModifiers::NONE)), Some(Key::Up));
    assert_eq!(translate(key_event(KeyCode::Down, KeyModifiers::NONE)), Some(Key::Down));
}

#[test]
fn unmapped_key_codes_translate_to_none() {
    let event = key_event(KeyCode::Insert, KeyModifiers::NONE);
    assert_eq!(translate(event), None);
}
