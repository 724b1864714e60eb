use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::host::HostMessage;
use super::keymap::Keycode;

const POINTER_DOWN: i32 = 0;
const POINTER_UP: i32 = 1;
const POINTER_MOVE: i32 = 2;

/// Adapter that turns Winit window events into host notifications
///
/// Keys become Android keycodes; the left mouse button acts as the touch pointer.
#[derive(Debug, Clone, Default)]
pub struct WinitInput {
    /// Last cursor position (relative to window)
    cursor: (i32, i32),
    /// Left button is held
    touching: bool,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a Winit WindowEvent, if it is one the host would report
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<HostMessage> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(keycode) = event.physical_key else {
                    return None;
                };
                let code = Self::keycode_to_android(keycode)?;
                // auto-repeat arrives as extra presses, which the device handles
                Some(HostMessage::Key {
                    keycode: code.0 as i32,
                    action: Self::key_action(event.state),
                })
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.touching = state.is_pressed();
                let action = if self.touching { POINTER_DOWN } else { POINTER_UP };
                Some(self.pointer(action))
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as i32, position.y as i32);
                self.touching.then(|| self.pointer(POINTER_MOVE))
            }
            WindowEvent::Resized(size) => Some(HostMessage::Resize {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::CloseRequested => Some(HostMessage::Shutdown),
            _ => None,
        }
    }

    /// Get the last cursor position
    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    fn pointer(&self, action: i32) -> HostMessage {
        HostMessage::Pointer {
            x: self.cursor.0,
            y: self.cursor.1,
            action,
        }
    }

    /// Host key action: nonzero means down
    fn key_action(state: ElementState) -> i32 {
        match state {
            ElementState::Pressed => 1,
            ElementState::Released => 0,
        }
    }

    /// Map Winit KeyCode to the Android keycode a handset would send
    pub fn keycode_to_android(keycode: KeyCode) -> Option<Keycode> {
        let code = match keycode {
            KeyCode::ArrowUp => Keycode::DPAD_UP,
            KeyCode::ArrowDown => Keycode::DPAD_DOWN,
            KeyCode::ArrowLeft => Keycode::DPAD_LEFT,
            KeyCode::ArrowRight => Keycode::DPAD_RIGHT,
            KeyCode::NumpadEnter => Keycode::DPAD_CENTER,
            KeyCode::Enter => Keycode::ENTER,
            KeyCode::Escape => Keycode::BACK,
            KeyCode::Home => Keycode::HOME,
            KeyCode::ContextMenu | KeyCode::F1 => Keycode::MENU,
            KeyCode::Space => Keycode::SPACE,
            KeyCode::Tab => Keycode::TAB,
            KeyCode::Backspace | KeyCode::Delete => Keycode::DEL,
            KeyCode::ShiftLeft => Keycode::SHIFT_LEFT,
            KeyCode::ShiftRight => Keycode::SHIFT_RIGHT,
            KeyCode::AltLeft => Keycode::ALT_LEFT,
            KeyCode::AltRight => Keycode::ALT_RIGHT,
            KeyCode::Comma => Keycode::COMMA,
            KeyCode::Period => Keycode::PERIOD,
            KeyCode::Minus => Keycode::MINUS,
            KeyCode::Equal => Keycode::EQUALS,
            KeyCode::BracketLeft => Keycode::LEFT_BRACKET,
            KeyCode::BracketRight => Keycode::RIGHT_BRACKET,
            KeyCode::Backslash => Keycode::BACKSLASH,
            KeyCode::Semicolon => Keycode::SEMICOLON,
            KeyCode::Quote => Keycode::APOSTROPHE,
            KeyCode::Slash => Keycode::SLASH,
            KeyCode::Backquote => Keycode::GRAVE,
            KeyCode::AudioVolumeUp => Keycode::VOLUME_UP,
            KeyCode::AudioVolumeDown => Keycode::VOLUME_DOWN,
            other => return Self::alphanumeric(other),
        };
        Some(code)
    }

    fn alphanumeric(keycode: KeyCode) -> Option<Keycode> {
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0,
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
            KeyCode::Digit7,
            KeyCode::Digit8,
            KeyCode::Digit9,
        ];
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA,
            KeyCode::KeyB,
            KeyCode::KeyC,
            KeyCode::KeyD,
            KeyCode::KeyE,
            KeyCode::KeyF,
            KeyCode::KeyG,
            KeyCode::KeyH,
            KeyCode::KeyI,
            KeyCode::KeyJ,
            KeyCode::KeyK,
            KeyCode::KeyL,
            KeyCode::KeyM,
            KeyCode::KeyN,
            KeyCode::KeyO,
            KeyCode::KeyP,
            KeyCode::KeyQ,
            KeyCode::KeyR,
            KeyCode::KeyS,
            KeyCode::KeyT,
            KeyCode::KeyU,
            KeyCode::KeyV,
            KeyCode::KeyW,
            KeyCode::KeyX,
            KeyCode::KeyY,
            KeyCode::KeyZ,
        ];

        if let Some(n) = DIGITS.iter().position(|&k| k == keycode) {
            return Some(Keycode::digit(n as u8));
        }
        LETTERS
            .iter()
            .position(|&k| k == keycode)
            .and_then(|n| Keycode::letter(b'a' + n as u8))
    }
}
