/// Raw platform key code as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keycode(pub u32);

impl Keycode {
    pub const UNKNOWN: Self = Self(0);
    pub const SOFT_LEFT: Self = Self(1);
    pub const SOFT_RIGHT: Self = Self(2);
    pub const HOME: Self = Self(3);
    pub const BACK: Self = Self(4);
    pub const CALL: Self = Self(5);
    pub const ENDCALL: Self = Self(6);
    pub const NUM_0: Self = Self(7);
    pub const NUM_9: Self = Self(16);
    pub const STAR: Self = Self(17);
    pub const POUND: Self = Self(18);
    pub const DPAD_UP: Self = Self(19);
    pub const DPAD_DOWN: Self = Self(20);
    pub const DPAD_LEFT: Self = Self(21);
    pub const DPAD_RIGHT: Self = Self(22);
    pub const DPAD_CENTER: Self = Self(23);
    pub const VOLUME_UP: Self = Self(24);
    pub const VOLUME_DOWN: Self = Self(25);
    pub const POWER: Self = Self(26);
    pub const CAMERA: Self = Self(27);
    pub const CLEAR: Self = Self(28);
    pub const A: Self = Self(29);
    pub const Z: Self = Self(54);
    pub const COMMA: Self = Self(55);
    pub const PERIOD: Self = Self(56);
    pub const ALT_LEFT: Self = Self(57);
    pub const ALT_RIGHT: Self = Self(58);
    pub const SHIFT_LEFT: Self = Self(59);
    pub const SHIFT_RIGHT: Self = Self(60);
    pub const TAB: Self = Self(61);
    pub const SPACE: Self = Self(62);
    pub const SYM: Self = Self(63);
    pub const EXPLORER: Self = Self(64);
    pub const ENVELOPE: Self = Self(65);
    pub const ENTER: Self = Self(66);
    pub const DEL: Self = Self(67);
    pub const GRAVE: Self = Self(68);
    pub const MINUS: Self = Self(69);
    pub const EQUALS: Self = Self(70);
    pub const LEFT_BRACKET: Self = Self(71);
    pub const RIGHT_BRACKET: Self = Self(72);
    pub const BACKSLASH: Self = Self(73);
    pub const SEMICOLON: Self = Self(74);
    pub const APOSTROPHE: Self = Self(75);
    pub const SLASH: Self = Self(76);
    pub const AT: Self = Self(77);
    pub const NUM: Self = Self(78);
    pub const HEADSETHOOK: Self = Self(79);
    pub const FOCUS: Self = Self(80);
    pub const PLUS: Self = Self(81);
    pub const MENU: Self = Self(82);
    pub const NOTIFICATION: Self = Self(83);
    pub const SEARCH: Self = Self(84);

    /// Highest code the translation table covers
    pub const LAST: Self = Self::SEARCH;

    /// Convert a host integer, folding anything out of range to `UNKNOWN`
    pub fn from_raw(raw: i32) -> Self {
        match u32::try_from(raw) {
            Ok(code) if code <= Self::LAST.0 => Self(code),
            _ => Self::UNKNOWN,
        }
    }

    /// Digit key `0..=9`
    pub fn digit(n: u8) -> Self {
        Self(Self::NUM_0.0 + u32::from(n.min(9)))
    }

    /// Letter key, `b'a'..=b'z'` or uppercase
    pub fn letter(c: u8) -> Option<Self> {
        c.is_ascii_alphabetic()
            .then(|| Self(Self::A.0 + u32::from(c.to_ascii_lowercase() - b'a')))
    }
}

/// Abstract key symbol reported to the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Unknown,
    Escape,
    Return,
    KpEnter,
    Kp4,
    Kp6,
    Tab,
    Space,
    Delete,
    Clear,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    LAlt,
    RAlt,
    LCtrl,
    LShift,
    RShift,
    /// `0..=9`
    Digit(u8),
    /// Lowercase ASCII letter
    Letter(char),
    Asterisk,
    Dollar,
    Comma,
    Period,
    Backquote,
    Minus,
    Equals,
    Plus,
    LeftBracket,
    RightBracket,
    Backslash,
    Semicolon,
    Quote,
    Slash,
    At,
}

/// Static keycode to symbol table
pub fn lookup(code: Keycode) -> Key {
    let raw = code.0;
    if (Keycode::NUM_0.0..=Keycode::NUM_9.0).contains(&raw) {
        return Key::Digit((raw - Keycode::NUM_0.0) as u8);
    }
    if (Keycode::A.0..=Keycode::Z.0).contains(&raw) {
        return Key::Letter(char::from(b'a' + (raw - Keycode::A.0) as u8));
    }

    match code {
        // the display abstraction turns Escape from Back into a quit request
        Keycode::BACK => Key::Escape,
        Keycode::MENU => Key::LAlt,
        Keycode::CALL => Key::LCtrl,
        Keycode::ENDCALL => Key::LShift,
        Keycode::CAMERA => Key::RShift,
        Keycode::POWER => Key::RAlt,
        Keycode::STAR => Key::Asterisk,
        Keycode::POUND => Key::Dollar,
        Keycode::DPAD_UP => Key::Up,
        Keycode::DPAD_DOWN => Key::Down,
        Keycode::DPAD_LEFT => Key::Left,
        Keycode::DPAD_RIGHT => Key::Right,
        Keycode::DPAD_CENTER => Key::Return,
        Keycode::SOFT_LEFT => Key::Kp4,
        Keycode::SOFT_RIGHT => Key::Kp6,
        Keycode::ENTER => Key::KpEnter,
        Keycode::VOLUME_UP => Key::PageUp,
        Keycode::VOLUME_DOWN => Key::PageDown,
        Keycode::SEARCH => Key::End,
        Keycode::HOME => Key::Home,
        Keycode::CLEAR => Key::Clear,
        Keycode::COMMA => Key::Comma,
        Keycode::PERIOD => Key::Period,
        Keycode::TAB => Key::Tab,
        Keycode::SPACE => Key::Space,
        Keycode::DEL => Key::Delete,
        Keycode::GRAVE => Key::Backquote,
        Keycode::MINUS => Key::Minus,
        Keycode::EQUALS => Key::Equals,
        Keycode::LEFT_BRACKET => Key::LeftBracket,
        Keycode::RIGHT_BRACKET => Key::RightBracket,
        Keycode::BACKSLASH => Key::Backslash,
        Keycode::SEMICOLON => Key::Semicolon,
        Keycode::APOSTROPHE => Key::Quote,
        Keycode::SLASH => Key::Slash,
        Keycode::AT => Key::At,
        Keycode::PLUS => Key::Plus,
        _ => Key::Unknown,
    }
}

/// Fully translated key, as queued for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySym {
    pub scancode: Keycode,
    pub sym: Key,
    /// Always empty; the device reports no modifier state
    pub modifiers: u16,
    /// Raw code when unicode translation is on, otherwise 0
    pub unicode: u16,
}

/// Translate a raw code into a key symbol
pub fn translate(code: Keycode, unicode: bool) -> KeySym {
    let scancode = if code > Keycode::LAST { Keycode::UNKNOWN } else { code };
    KeySym {
        scancode,
        sym: lookup(scancode),
        modifiers: 0,
        unicode: if unicode { scancode.0 as u16 } else { 0 },
    }
}
