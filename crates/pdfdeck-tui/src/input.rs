use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;

/// Whether key presses drive navigation or fill a text prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Text,
}

/// Map a crossterm terminal event to a TUI action.
pub fn map_event(event: &Event, mode: InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match mode {
            InputMode::Normal => map_key(key),
            InputMode::Text => map_text_key(key),
        },
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_key(key: &KeyEvent) -> Action {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('h') | KeyCode::Left => Action::PrevSlide,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => Action::NextSlide,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::Char('o') => Action::OpenFile,
        KeyCode::Char('a') => Action::AddTopic,
        KeyCode::Char('e') | KeyCode::Enter => Action::EditTopic,
        KeyCode::Char('d') | KeyCode::Delete => Action::RemoveTopic,
        KeyCode::Char('p') => Action::Generate,
        KeyCode::Tab => Action::TogglePane,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::NavigateBack,
        _ => Action::None,
    }
}

fn map_text_key(key: &KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Esc => Action::Cancel,
        KeyCode::Enter => Action::Submit,
        KeyCode::Tab | KeyCode::BackTab => Action::NextField,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::Input(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn letters_are_commands_in_normal_mode() {
        assert_eq!(map_event(&press(KeyCode::Char('p')), InputMode::Normal), Action::Generate);
        assert_eq!(map_event(&press(KeyCode::Right), InputMode::Normal), Action::NextSlide);
        assert_eq!(map_event(&press(KeyCode::Char('q')), InputMode::Normal), Action::Quit);
    }

    #[test]
    fn letters_are_text_in_prompts() {
        assert_eq!(map_event(&press(KeyCode::Char('q')), InputMode::Text), Action::Input('q'));
        assert_eq!(map_event(&press(KeyCode::Enter), InputMode::Text), Action::Submit);
        assert_eq!(map_event(&press(KeyCode::Esc), InputMode::Text), Action::Cancel);
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ctrl_c, InputMode::Normal), Action::Quit);
        assert_eq!(map_event(&ctrl_c, InputMode::Text), Action::Quit);
    }
}
