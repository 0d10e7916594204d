use ultra36_common::Key;

/// One full-content mode of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    RomSelect,
    JiffyToggle,
    Info,
    VdcInfo,
    SidInfo,
}

impl Screen {
    /// Screens in function-key order.
    pub const ALL: [Screen; 5] = [
        Screen::RomSelect,
        Screen::JiffyToggle,
        Screen::Info,
        Screen::VdcInfo,
        Screen::SidInfo,
    ];

    /// Screen bound to a function key, if any.
    pub fn for_key(key: Key) -> Option<Screen> {
        match key {
            Key::F1 => Some(Screen::RomSelect),
            Key::F2 => Some(Screen::JiffyToggle),
            Key::F3 => Some(Screen::Info),
            Key::F4 => Some(Screen::VdcInfo),
            Key::F5 => Some(Screen::SidInfo),
            _ => None,
        }
    }

    /// Position on the function-key bar.
    pub fn slot(self) -> u8 {
        match self {
            Screen::RomSelect => 0,
            Screen::JiffyToggle => 1,
            Screen::Info => 2,
            Screen::VdcInfo => 3,
            Screen::SidInfo => 4,
        }
    }

    /// Function-key bar label.
    pub fn label(self) -> &'static str {
        match self {
            Screen::RomSelect => "F1 ROM",
            Screen::JiffyToggle => "F2 JDOS",
            Screen::Info => "F3 INFO",
            Screen::VdcInfo => "F4 VDC",
            Screen::SidInfo => "F5 SID",
        }
    }

    /// Footer hints.
    pub fn hints(self) -> &'static str {
        match self {
            Screen::RomSelect => "CRSR:Move RETURN:Switch ESC:Quit F8:Exit",
            Screen::JiffyToggle => "CRSR:Move RETURN:Apply F8:Exit",
            Screen::Info => "F1-F5:Screens F8:Exit",
            Screen::VdcInfo => "R:Retest F8:Exit",
            Screen::SidInfo => "1/2:Filter sweep R:Retest F8:Exit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_keys_map_in_slot_order() {
        let keys = [Key::F1, Key::F2, Key::F3, Key::F4, Key::F5];
        for (slot, key) in keys.into_iter().enumerate() {
            let screen = Screen::for_key(key).unwrap();
            assert_eq!(screen.slot() as usize, slot);
            assert_eq!(Screen::ALL[slot], screen);
        }
        assert_eq!(Screen::for_key(Key::F6), None);
        assert_eq!(Screen::for_key(Key::F8), None);
    }

    #[test]
    fn labels_fit_a_forty_column_slot() {
        for screen in Screen::ALL {
            assert!(screen.label().len() < 8, "{}", screen.label());
        }
    }

    #[test]
    fn hints_fit_forty_columns() {
        for screen in Screen::ALL {
            assert!(screen.hints().len() <= 40, "{}", screen.hints());
        }
    }
}
