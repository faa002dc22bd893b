use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::grid::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    /// Space/Enter: start, or start over after a game over.
    StartOrRestart,
    /// The Start/Stop button.
    ToggleRun,
    Reset,
    Quit,
}

impl Command {
    /// Maps a key press to a command. Releases and repeats of non-movement
    /// keys are ignored.
    pub fn from_key_event(key: KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
                _ => None,
            };
        }

        let turn = match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
            _ => None,
        };
        if let Some(dir) = turn {
            return Some(Command::Turn(dir));
        }

        if key.kind == KeyEventKind::Repeat {
            return None;
        }
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => Some(Command::StartOrRestart),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::ToggleRun),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Reset),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        }
    }
}
