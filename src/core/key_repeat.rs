use std::num::NonZeroU32;

use super::events::KeyState;
use super::keymap::Keycode;

/// One of the four trackball / directional-pad channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Up/down and left/right are mutually exclusive pairs
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn from_keycode(code: Keycode) -> Option<Self> {
        match code {
            Keycode::DPAD_UP => Some(Direction::Up),
            Keycode::DPAD_DOWN => Some(Direction::Down),
            Keycode::DPAD_LEFT => Some(Direction::Left),
            Keycode::DPAD_RIGHT => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn keycode(self) -> Keycode {
        match self {
            Direction::Up => Keycode::DPAD_UP,
            Direction::Down => Keycode::DPAD_DOWN,
            Direction::Left => Keycode::DPAD_LEFT,
            Direction::Right => Keycode::DPAD_RIGHT,
        }
    }
}

/// Per-channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No synthetic hold
    Idle,
    /// Press emitted, release deferred for `remaining` more ticks
    Held { remaining: u32 },
}

/// Key event the state machine decided to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub direction: Direction,
    pub state: KeyState,
}

impl Transition {
    pub fn new(direction: Direction, state: KeyState) -> Self {
        Self { direction, state }
    }
}

/// Emulates held keys for a device that only reports discrete directional pulses
///
/// Releases are deferred by `delay` ticks; repeated presses extend the hold.
/// A tick is one presentation flip, so the cadence follows the frame rate.
#[derive(Debug, Clone)]
pub struct KeyRepeat {
    delay: NonZeroU32,
    timers: [u32; 4],
}

impl KeyRepeat {
    pub fn new(delay: NonZeroU32) -> Self {
        Self { delay, timers: [0; 4] }
    }

    pub fn delay(&self) -> u32 {
        self.delay.get()
    }

    pub fn state(&self, direction: Direction) -> ChannelState {
        match self.timers[direction.index()] {
            0 => ChannelState::Idle,
            remaining => ChannelState::Held { remaining },
        }
    }

    /// Feed a raw press/release signal for one channel
    pub fn signal(&mut self, direction: Direction, state: KeyState, mut emit: impl FnMut(Transition)) {
        let delay = self.delay.get();
        let idx = direction.index();

        match (state, self.timers[idx]) {
            (KeyState::Pressed, 0) => {
                let opposite = direction.opposite().index();
                if self.timers[opposite] > 0 {
                    self.timers[opposite] = 0;
                    emit(Transition::new(direction.opposite(), KeyState::Released));
                }
                emit(Transition::new(direction, KeyState::Pressed));
            }
            (KeyState::Released, 0) => {
                self.timers[idx] = delay;
            }
            (KeyState::Pressed, remaining) => {
                // never let a repeated press shorten the hold below 4 delays
                self.timers[idx] = remaining.saturating_add(delay).max(delay.saturating_mul(4));
            }
            (KeyState::Released, _) => {}
        }
    }

    /// Advance every held channel by one tick, emitting expired releases
    pub fn tick(&mut self, mut emit: impl FnMut(Transition)) {
        for direction in Direction::ALL {
            let timer = &mut self.timers[direction.index()];
            if *timer > 0 {
                *timer -= 1;
                if *timer == 0 {
                    emit(Transition::new(direction, KeyState::Released));
                }
            }
        }
    }
}

/// Key path chosen once from configuration
///
/// A delay of zero builds `Passthrough`, which keeps no state at all.
#[derive(Debug, Clone)]
pub enum KeyFilter {
    Passthrough,
    Trackball(KeyRepeat),
}

impl KeyFilter {
    pub fn from_delay(delay: u32) -> Self {
        match NonZeroU32::new(delay) {
            Some(delay) => KeyFilter::Trackball(KeyRepeat::new(delay)),
            None => KeyFilter::Passthrough,
        }
    }

    pub fn is_emulating(&self) -> bool {
        matches!(self, KeyFilter::Trackball(_))
    }

    /// Returns true when the signal was consumed by the directional emulation
    pub fn filter(&mut self, code: Keycode, state: KeyState, emit: impl FnMut(Transition)) -> bool {
        match self {
            KeyFilter::Passthrough => false,
            KeyFilter::Trackball(repeat) => match Direction::from_keycode(code) {
                Some(direction) => {
                    repeat.signal(direction, state, emit);
                    true
                }
                None => false,
            },
        }
    }

    pub fn tick(&mut self, emit: impl FnMut(Transition)) {
        if let KeyFilter::Trackball(repeat) = self {
            repeat.tick(emit);
        }
    }
}
