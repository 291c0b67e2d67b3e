//! Keyboard handling.

use crossterm::event::KeyCode;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Select board cell (0-8).
    Cell(usize),
    /// Create an online session.
    Create,
    /// Start typing a session id to join.
    Join,
    /// Leave the online session.
    Leave,
    /// Clear the local board.
    NewLocal,
    /// Exit.
    Quit,
}

/// Maps a key to an action. Keys 1-9 are the cells in reading order.
pub fn action_for(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| Action::Cell(d as usize - 1)),
        KeyCode::Char('c') => Some(Action::Create),
        KeyCode::Char('j') => Some(Action::Join),
        KeyCode::Char('l') => Some(Action::Leave),
        KeyCode::Char('n') => Some(Action::NewLocal),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Outcome of a key press while the join prompt is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptStep {
    /// Still typing.
    Editing,
    /// Enter pressed with this id.
    Submit(String),
    /// Prompt abandoned.
    Cancel,
}

/// Feeds a key to the join prompt buffer.
pub fn edit_prompt(buffer: &mut String, key: KeyCode) -> PromptStep {
    match key {
        KeyCode::Enter => PromptStep::Submit(std::mem::take(buffer)),
        KeyCode::Esc => {
            buffer.clear();
            PromptStep::Cancel
        }
        KeyCode::Backspace => {
            buffer.pop();
            PromptStep::Editing
        }
        KeyCode::Char(c) if !c.is_control() => {
            buffer.push(c);
            PromptStep::Editing
        }
        _ => PromptStep::Editing,
    }
}
