use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Whether keys drive navigation or edit the filter text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
}

/// What a key press asks the application to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextSection,
    PreviousSection,
    /// Jump to a section by zero-based index
    JumpTo(usize),
    Retry,
    StartFilter,
    FilterInput(char),
    FilterBackspace,
    /// Leave filter mode keeping the text
    ConfirmFilter,
    /// Leave filter mode and clear the text
    CancelFilter,
    CycleSort,
    ToggleSortDirection,
    NextPage,
    PreviousPage,
}

/// Translate a key press into an [`Action`]
pub fn map_key(key: KeyEvent, mode: InputMode) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    match mode {
        InputMode::Filter => match key.code {
            KeyCode::Esc => Some(Action::CancelFilter),
            KeyCode::Enter => Some(Action::ConfirmFilter),
            KeyCode::Backspace => Some(Action::FilterBackspace),
            KeyCode::Char(c) => Some(Action::FilterInput(c)),
            _ => None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Some(Action::NextSection),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Some(Action::PreviousSection),
            KeyCode::Char(c @ '1'..='9') => c
                .to_digit(10)
                .map(|digit| Action::JumpTo(digit as usize - 1)),
            KeyCode::Char('r') => Some(Action::Retry),
            KeyCode::Char('/') => Some(Action::StartFilter),
            KeyCode::Char('s') => Some(Action::CycleSort),
            KeyCode::Char('S') => Some(Action::ToggleSortDirection),
            KeyCode::Char('n') | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('p') | KeyCode::PageUp => Some(Action::PreviousPage),
            _ => None,
        },
    }
}

/// Key hints shown in the status bar
pub fn key_hints(mode: InputMode) -> &'static [(&'static str, &'static str)] {
    match mode {
        InputMode::Normal => &[
            ("Tab", "next"),
            ("1-9", "jump"),
            ("r", "retry"),
            ("/", "filter"),
            ("s/S", "sort"),
            ("n/p", "page"),
            ("q", "quit"),
        ],
        InputMode::Filter => &[("Enter", "apply"), ("Esc", "clear")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(map_key(press(KeyCode::Tab), InputMode::Normal), Some(Action::NextSection));
        assert_eq!(map_key(press(KeyCode::Char('l')), InputMode::Normal), Some(Action::NextSection));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), InputMode::Normal),
            Some(Action::PreviousSection)
        );
        assert_eq!(map_key(press(KeyCode::Char('1')), InputMode::Normal), Some(Action::JumpTo(0)));
        assert_eq!(map_key(press(KeyCode::Char('9')), InputMode::Normal), Some(Action::JumpTo(8)));
        assert_eq!(map_key(press(KeyCode::Char('0')), InputMode::Normal), None);
    }

    #[test]
    fn filter_mode_captures_text() {
        assert_eq!(map_key(press(KeyCode::Char('q')), InputMode::Filter), Some(Action::FilterInput('q')));
        assert_eq!(map_key(press(KeyCode::Char('r')), InputMode::Filter), Some(Action::FilterInput('r')));
        assert_eq!(map_key(press(KeyCode::Esc), InputMode::Filter), Some(Action::CancelFilter));
        assert_eq!(map_key(press(KeyCode::Enter), InputMode::Filter), Some(Action::ConfirmFilter));
    }

    #[test]
    fn ctrl_c_quits_in_every_mode() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, InputMode::Normal), Some(Action::Quit));
        assert_eq!(map_key(ctrl_c, InputMode::Filter), Some(Action::Quit));
    }

    #[test]
    fn sort_keys_are_case_sensitive() {
        assert_eq!(map_key(press(KeyCode::Char('s')), InputMode::Normal), Some(Action::CycleSort));
        assert_eq!(
            map_key(press(KeyCode::Char('S')), InputMode::Normal),
            Some(Action::ToggleSortDirection)
        );
    }
}
