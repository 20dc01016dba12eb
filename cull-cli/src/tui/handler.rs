use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, AppMode};

/// Map key events to actions based on current mode
pub fn handle_key(key: KeyEvent, mode: AppMode) -> Action {
    match mode {
        AppMode::Help => handle_key_help(key),
        AppMode::Browsing => handle_key_browsing(key),
    }
}

fn handle_key_help(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Action::HideHelp,
        _ => Action::Tick,
    }
}

fn handle_key_browsing(key: KeyEvent) -> Action {
    match key.code {
        // Quit
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Home | KeyCode::Char('g') => Action::GoToFirst,
        KeyCode::End | KeyCode::Char('G') => Action::GoToLast,

        // Selection flow
        KeyCode::Char('v') => Action::ToggleMode,
        KeyCode::Char(' ') | KeyCode::Enter => Action::ClickItem,
        KeyCode::Char('d') => Action::PressAction,

        // Host simulation
        KeyCode::Char('r') => Action::ForceRerender,
        KeyCode::Char('a') => Action::ToggleAnchors,

        // Help
        KeyCode::Char('?') => Action::ShowHelp,

        _ => Action::Tick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn test_browsing_keys() {
        assert_eq!(
            handle_key(key(KeyCode::Char('v')), AppMode::Browsing),
            Action::ToggleMode
        );
        assert_eq!(
            handle_key(key(KeyCode::Char(' ')), AppMode::Browsing),
            Action::ClickItem
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('d')), AppMode::Browsing),
            Action::PressAction
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('r')), AppMode::Browsing),
            Action::ForceRerender
        );
    }

    #[test]
    fn test_help_swallows_other_keys() {
        assert_eq!(
            handle_key(key(KeyCode::Char('d')), AppMode::Help),
            Action::Tick
        );
        assert_eq!(
            handle_key(key(KeyCode::Esc), AppMode::Help),
            Action::HideHelp
        );
    }
}
