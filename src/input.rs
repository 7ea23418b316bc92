use std::collections::VecDeque;

use crate::components::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::Up, Key::Down, Key::Left, Key::Right];

    pub fn direction(self) -> Direction {
        match self {
            Key::Up => Direction::Up,
            Key::Down => Direction::Down,
            Key::Left => Direction::Left,
            Key::Right => Direction::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
    Held,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    pub state: KeyState,
}

impl InputEvent {
    pub fn pressed(key: Key) -> Self {
        InputEvent {
            key,
            state: KeyState::Pressed,
        }
    }

    pub fn released(key: Key) -> Self {
        InputEvent {
            key,
            state: KeyState::Released,
        }
    }

    pub fn held(key: Key) -> Self {
        InputEvent {
            key,
            state: KeyState::Held,
        }
    }

    pub fn is_down(&self) -> bool {
        matches!(self.state, KeyState::Pressed | KeyState::Held)
    }
}

/// Input collected between two ticks. Each tick drains it completely.
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }
}

impl FromIterator<InputEvent> for InputQueue {
    fn from_iter<I: IntoIterator<Item = InputEvent>>(iter: I) -> Self {
        InputQueue {
            events: iter.into_iter().collect(),
        }
    }
}
