use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Cancel,
    Submit,
    Up,
    Down,
    Left,
    Right,
    NextField,
    PrevField,
    Backspace,
    Char(char),
    None,
}

/// Raw key mapping; what a character means is up to the current screen.
pub fn map_event(ev: Event) -> Action {
    if let Event::Key(KeyEvent {
        code, modifiers, kind, ..
    }) = ev
    {
        if kind == KeyEventKind::Release {
            return Action::None;
        }
        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
            (KeyCode::Esc, _) => Action::Cancel,
            (KeyCode::Enter, _) => Action::Submit,
            (KeyCode::Up, _) => Action::Up,
            (KeyCode::Down, _) => Action::Down,
            (KeyCode::Left, _) => Action::Left,
            (KeyCode::Right, _) => Action::Right,
            (KeyCode::Tab, _) => Action::NextField,
            (KeyCode::BackTab, _) => Action::PrevField,
            (KeyCode::Backspace, _) => Action::Backspace,
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => Action::Char(c),
            _ => Action::None,
        }
    } else {
        Action::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn ctrl_c_quits_but_c_is_text() {
        assert_eq!(map_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Action::Quit);
        assert_eq!(map_event(key(KeyCode::Char('c'), KeyModifiers::NONE)), Action::Char('c'));
        assert_eq!(map_event(key(KeyCode::Char('C'), KeyModifiers::SHIFT)), Action::Char('C'));
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(map_event(key(KeyCode::Tab, KeyModifiers::NONE)), Action::NextField);
        assert_eq!(map_event(key(KeyCode::BackTab, KeyModifiers::SHIFT)), Action::PrevField);
        assert_eq!(map_event(key(KeyCode::Esc, KeyModifiers::NONE)), Action::Cancel);
    }
}
