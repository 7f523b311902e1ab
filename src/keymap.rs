use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::Deserialize;

use crate::msg::{Command, Modifiers, Step};

/// Which physical modifier acts as the discontiguous-selection key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKey {
    #[default]
    Ctrl,
    Alt,
    Super,
}

impl PrimaryKey {
    fn flag(self) -> KeyModifiers {
        match self {
            PrimaryKey::Ctrl => KeyModifiers::CONTROL,
            PrimaryKey::Alt => KeyModifiers::ALT,
            PrimaryKey::Super => KeyModifiers::SUPER,
        }
    }
}

/// Classify a key press into a selection command. `page` is the number of
/// rows a PageUp / PageDown moves.
pub fn classify(key: KeyEvent, primary: PrimaryKey, page: usize) -> Option<(Command, Modifiers)> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let modifiers = Modifiers {
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
        primary: key.modifiers.contains(primary.flag()),
    };
    let command = match key.code {
        KeyCode::Up => Command::MoveLine(Step::Back),
        KeyCode::Down => Command::MoveLine(Step::Forward),
        KeyCode::Left => Command::MoveAxis(Step::Back),
        KeyCode::Right => Command::MoveAxis(Step::Forward),
        KeyCode::Home => Command::MoveHome,
        KeyCode::End => Command::MoveEnd,
        KeyCode::PageUp => Command::MovePage {
            step: Step::Back,
            rows: page,
        },
        KeyCode::PageDown => Command::MovePage {
            step: Step::Forward,
            rows: page,
        },
        KeyCode::Char(' ') => Command::ToggleAtFocus,
        KeyCode::Char('a' | 'A') if modifiers.primary => Command::SelectAll,
        KeyCode::Esc => Command::ClearSelection,
        _ => return None,
    };
    Some((command, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn arrows_and_modifiers() {
        assert_eq!(
            classify(press(KeyCode::Down, KeyModifiers::SHIFT), PrimaryKey::Ctrl, 10),
            Some((Command::MoveLine(Step::Forward), Modifiers::SHIFT))
        );
        assert_eq!(
            classify(
                press(KeyCode::Up, KeyModifiers::SHIFT | KeyModifiers::CONTROL),
                PrimaryKey::Ctrl,
                10
            ),
            Some((Command::MoveLine(Step::Back), Modifiers::SHIFT_PRIMARY))
        );
    }

    #[test]
    fn primary_follows_configuration() {
        let ctrl_space = press(KeyCode::Char(' '), KeyModifiers::CONTROL);
        assert_eq!(
            classify(ctrl_space, PrimaryKey::Alt, 10),
            Some((Command::ToggleAtFocus, Modifiers::NONE))
        );
        let alt_a = press(KeyCode::Char('a'), KeyModifiers::ALT);
        assert_eq!(
            classify(alt_a, PrimaryKey::Alt, 10),
            Some((Command::SelectAll, Modifiers::PRIMARY))
        );
        assert_eq!(
            classify(press(KeyCode::Char('a'), KeyModifiers::NONE), PrimaryKey::Ctrl, 10),
            None
        );
    }

    #[test]
    fn page_size_is_carried() {
        assert_eq!(
            classify(press(KeyCode::PageDown, KeyModifiers::NONE), PrimaryKey::Ctrl, 7),
            Some((
                Command::MovePage {
                    step: Step::Forward,
                    rows: 7
                },
                Modifiers::NONE
            ))
        );
    }
}
