/// Keys the menu understands.
///
/// Frontends map their native key codes onto this set; anything without a
/// counterpart becomes `Key::None`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Return,
    Escape,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    Num1,
    Num2,
    R,
    Space,
    #[default]
    None,
}

impl Key {
    /// Parse a key name as used in scripted sessions, e.g. `down` or `f2`.
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name.trim().to_ascii_lowercase().as_str() {
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "return" | "enter" => Key::Return,
            "escape" | "esc" => Key::Escape,
            "f1" => Key::F1,
            "f2" => Key::F2,
            "f3" => Key::F3,
            "f4" => Key::F4,
            "f5" => Key::F5,
            "f6" => Key::F6,
            "f7" => Key::F7,
            "f8" => Key::F8,
            "1" => Key::Num1,
            "2" => Key::Num2,
            "r" => Key::R,
            "space" => Key::Space,
            _ => return None,
        };
        Some(key)
    }
}
