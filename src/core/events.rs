use std::collections::VecDeque;

use log::debug;

use super::keymap::KeySym;

/// Press/release state shared by keys and pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    Pressed,
    Released,
}

impl KeyState {
    /// Host key actions are non-zero for down
    pub fn from_action(action: i32) -> Self {
        if action != 0 {
            KeyState::Pressed
        } else {
            KeyState::Released
        }
    }
}

/// Pointer action reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Up,
    Move,
}

impl TryFrom<i32> for PointerAction {
    type Error = i32;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(PointerAction::Down),
            1 => Ok(PointerAction::Up),
            2 => Ok(PointerAction::Move),
            other => Err(other),
        }
    }
}

/// Event delivered to the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key { state: KeyState, keysym: KeySym },
    MouseButton { state: KeyState, button: u8, x: i32, y: i32 },
    MouseMotion { x: i32, y: i32 },
    Quit,
}

/// Events held before new ones are dropped
pub const MAX_QUEUED_EVENTS: usize = 128;

/// Bounded FIFO of translated events
///
/// A full queue drops the incoming event, so an application that stops
/// polling keeps the oldest input.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the queue was full and the event was dropped
    pub fn push(&mut self, event: Event) -> bool {
        if self.events.len() >= MAX_QUEUED_EVENTS {
            debug!("event queue full, dropping {:?}", event);
            return false;
        }
        self.events.push_back(event);
        true
    }

    pub fn poll(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
