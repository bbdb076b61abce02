use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key press with the terminal details stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    ForceQuit,
    Cancel,
    NextSection,
    Submit,
    Backspace,
    Up,
    Down,
    Char(char),
    None,
}

pub fn map_key(key: KeyEvent) -> KeyInput {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => KeyInput::ForceQuit,
            _ => KeyInput::None,
        };
    }

    match key.code {
        KeyCode::Esc => KeyInput::Cancel,
        KeyCode::Tab => KeyInput::NextSection,
        KeyCode::Enter => KeyInput::Submit,
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Up => KeyInput::Up,
        KeyCode::Down => KeyInput::Down,
        KeyCode::Char(ch) => KeyInput::Char(ch),
        _ => KeyInput::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_quits_and_other_chords_are_ignored() {
        let ctrl = |ch| KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl('c')), KeyInput::ForceQuit);
        assert_eq!(map_key(ctrl('x')), KeyInput::None);
    }

    #[test]
    fn plain_chars_pass_through() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(map_key(key), KeyInput::Char('q'));
        let shifted = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(map_key(shifted), KeyInput::Char('Q'));
    }
}
