/// Folds terminal events into the two steering flags.
///
/// Keyboard model: we record the frame of the last press/repeat for every
/// key and treat a key as held while that record is fresh.  Terminals with
/// keyboard enhancement also send releases, which drop the record at once;
/// classic terminals only repeat presses, so keys expire after
/// `HOLD_WINDOW` frames of silence.
///
/// Pointer model: a left-button press inside one of the on-screen buttons
/// holds that direction until the button is released, wherever the pointer
/// is by then.

use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};

use crate::entities::InputState;

/// A key counts as held this many frames after its last press/repeat.
/// OS key-repeat runs at ≥ 15 Hz, so 8 frames at 60 FPS (≈133 ms) is always
/// refreshed before expiry.
pub const HOLD_WINDOW: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

/// A clickable terminal-cell rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellRect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col
            && col < self.col.saturating_add(self.width)
            && row >= self.row
            && row < self.row.saturating_add(self.height)
    }
}

/// Where the two on-screen buttons currently are.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonLayout {
    pub left: CellRect,
    pub right: CellRect,
}

impl ButtonLayout {
    pub fn hit(&self, col: u16, row: u16) -> Option<Direction> {
        if self.left.contains(col, row) {
            Some(Direction::Left)
        } else if self.right.contains(col, row) {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

/// What a single event asks of the outer loop, beyond steering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    None,
    /// Start / restart / acknowledge (Space, Enter, R, or a click).
    Confirm,
    Quit,
    Resize(u16, u16),
}

fn direction_of(code: &KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct InputTracker {
    /// Last frame each steering direction was pressed or repeated.
    key_frame: HashMap<Direction, u64>,
    /// Direction held through an on-screen button, if any.
    pointer: Option<Direction>,
    buttons: ButtonLayout,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_buttons(&mut self, buttons: ButtonLayout) {
        self.buttons = buttons;
    }

    pub fn buttons(&self) -> ButtonLayout {
        self.buttons
    }

    /// Forget every held key and button, e.g. between runs.
    pub fn clear(&mut self) {
        self.key_frame.clear();
        self.pointer = None;
    }

    /// Record one event seen during `frame`.
    pub fn apply(&mut self, event: &Event, frame: u64) -> Command {
        match event {
            Event::Key(key) => self.apply_key(key, frame),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    match self.buttons.hit(mouse.column, mouse.row) {
                        Some(dir) => {
                            self.pointer = Some(dir);
                            Command::None
                        }
                        None => Command::Confirm,
                    }
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    self.pointer = None;
                    Command::None
                }
                _ => Command::None,
            },
            Event::Resize(cols, rows) => Command::Resize(*cols, *rows),
            _ => Command::None,
        }
    }

    fn apply_key(&mut self, key: &KeyEvent, frame: u64) -> Command {
        use crossterm::event::KeyModifiers;

        if let Some(dir) = direction_of(&key.code) {
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    self.key_frame.insert(dir, frame);
                }
                KeyEventKind::Release => {
                    self.key_frame.remove(&dir);
                }
            }
            return Command::None;
        }

        if key.kind != KeyEventKind::Press {
            return Command::None;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => {
                Command::Confirm
            }
            _ => Command::None,
        }
    }

    fn key_held(&self, dir: Direction, frame: u64) -> bool {
        self.key_frame
            .get(&dir)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// The steering flags as of `frame`.
    pub fn state(&self, frame: u64) -> InputState {
        InputState {
            left: self.key_held(Direction::Left, frame) || self.pointer == Some(Direction::Left),
            right: self.key_held(Direction::Right, frame)
                || self.pointer == Some(Direction::Right),
        }
    }
}
