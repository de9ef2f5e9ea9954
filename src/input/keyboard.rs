//! Keyboard translation for grid selection
//!
//! X delivers keycodes; the overlay works with keysyms and then with the
//! handful of actions the selection understands. Both steps are pure so they
//! can be tested without a server.

/// Keysym values used by the selection (from X11/keysymdef.h)
pub mod keysym {
    pub const SPACE: u32 = 0x0020;
    pub const H_UPPER: u32 = 0x0048;
    pub const J_UPPER: u32 = 0x004a;
    pub const K_UPPER: u32 = 0x004b;
    pub const L_UPPER: u32 = 0x004c;
    pub const Q_UPPER: u32 = 0x0051;
    pub const H: u32 = 0x0068;
    pub const J: u32 = 0x006a;
    pub const K: u32 = 0x006b;
    pub const L: u32 = 0x006c;
    pub const Q: u32 = 0x0071;
    pub const RETURN: u32 = 0xff0d;
    pub const ESCAPE: u32 = 0xff1b;
    pub const LEFT: u32 = 0xff51;
    pub const UP: u32 = 0xff52;
    pub const RIGHT: u32 = 0xff53;
    pub const DOWN: u32 = 0xff54;
    pub const KP_ENTER: u32 = 0xff8d;
    pub const KP_LEFT: u32 = 0xff96;
    pub const KP_UP: u32 = 0xff97;
    pub const KP_RIGHT: u32 = 0xff98;
    pub const KP_DOWN: u32 = 0xff99;
}

/// Direction for moving the current cell one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Column and row delta for one step in this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// Actions a key press can trigger during selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Move the current cell
    Move(Direction),
    /// Start a new rectangle at the current cell
    Anchor,
    /// Accept the selection
    Confirm,
    /// Abort without applying
    Cancel,
    /// Any other key
    Ignored,
}

impl KeyAction {
    /// Convert an X keysym to a KeyAction
    pub fn from_keysym(sym: u32) -> Self {
        match sym {
            // Arrows, keypad arrows and vi keys
            keysym::LEFT | keysym::KP_LEFT | keysym::H | keysym::H_UPPER => {
                KeyAction::Move(Direction::Left)
            }
            keysym::RIGHT | keysym::KP_RIGHT | keysym::L | keysym::L_UPPER => {
                KeyAction::Move(Direction::Right)
            }
            keysym::UP | keysym::KP_UP | keysym::K | keysym::K_UPPER => {
                KeyAction::Move(Direction::Up)
            }
            keysym::DOWN | keysym::KP_DOWN | keysym::J | keysym::J_UPPER => {
                KeyAction::Move(Direction::Down)
            }

            keysym::SPACE => KeyAction::Anchor,
            keysym::RETURN | keysym::KP_ENTER => KeyAction::Confirm,
            keysym::ESCAPE | keysym::Q | keysym::Q_UPPER => KeyAction::Cancel,

            _ => KeyAction::Ignored,
        }
    }
}

/// Keycode to keysym table as returned by GetKeyboardMapping
///
/// Only the first (unshifted) keysym of each keycode is consulted; the
/// selection keys don't depend on modifiers.
#[derive(Debug, Clone, Default)]
pub struct KeyboardMap {
    min_keycode: u8,
    keysyms_per_keycode: u8,
    keysyms: Vec<u32>,
}

impl KeyboardMap {
    /// Builds a map from the raw mapping reply
    pub fn new(min_keycode: u8, keysyms_per_keycode: u8, keysyms: Vec<u32>) -> Self {
        Self {
            min_keycode,
            keysyms_per_keycode,
            keysyms,
        }
    }

    /// Looks up the unshifted keysym for a keycode
    ///
    /// # Returns
    /// The keysym, or None for keycodes outside the table or bound to NoSymbol
    pub fn keysym(&self, keycode: u8) -> Option<u32> {
        if self.keysyms_per_keycode == 0 || keycode < self.min_keycode {
            return None;
        }
        let index = (keycode - self.min_keycode) as usize * self.keysyms_per_keycode as usize;
        self.keysyms.get(index).copied().filter(|&sym| sym != 0)
    }

    /// Translates a keycode straight to a selection action
    pub fn action(&self, keycode: u8) -> KeyAction {
        self.keysym(keycode)
            .map(KeyAction::from_keysym)
            .unwrap_or(KeyAction::Ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_action_conversion() {
        // Movement keys
        assert_eq!(KeyAction::from_keysym(keysym::LEFT), KeyAction::Move(Direction::Left));
        assert_eq!(KeyAction::from_keysym(keysym::KP_DOWN), KeyAction::Move(Direction::Down));
        assert_eq!(KeyAction::from_keysym(keysym::K), KeyAction::Move(Direction::Up));
        assert_eq!(KeyAction::from_keysym(keysym::L_UPPER), KeyAction::Move(Direction::Right));

        // Selection control keys
        assert_eq!(KeyAction::from_keysym(keysym::SPACE), KeyAction::Anchor);
        assert_eq!(KeyAction::from_keysym(keysym::RETURN), KeyAction::Confirm);
        assert_eq!(KeyAction::from_keysym(keysym::KP_ENTER), KeyAction::Confirm);
        assert_eq!(KeyAction::from_keysym(keysym::ESCAPE), KeyAction::Cancel);
        assert_eq!(KeyAction::from_keysym(keysym::Q), KeyAction::Cancel);

        // Anything else
        assert_eq!(KeyAction::from_keysym(0x0061), KeyAction::Ignored); // 'a'
        assert_eq!(KeyAction::from_keysym(0xffe1), KeyAction::Ignored); // Shift_L
    }

    #[test]
    fn direction_deltas() {
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Down.delta(), (0, 1));
    }

    #[test]
    fn keyboard_map_lookup() {
        // Keycodes 8..=10, two keysyms per keycode
        let map = KeyboardMap::new(
            8,
            2,
            vec![keysym::ESCAPE, 0, keysym::H, keysym::H_UPPER, 0, 0],
        );

        assert_eq!(map.keysym(8), Some(keysym::ESCAPE));
        assert_eq!(map.keysym(9), Some(keysym::H));
        assert_eq!(map.keysym(10), None); // NoSymbol
        assert_eq!(map.keysym(11), None); // Past the table
        assert_eq!(map.keysym(7), None); // Below min keycode

        assert_eq!(map.action(8), KeyAction::Cancel);
        assert_eq!(map.action(9), KeyAction::Move(Direction::Left));
        assert_eq!(map.action(10), KeyAction::Ignored);
    }

    #[test]
    fn empty_keyboard_map_ignores_everything() {
        let map = KeyboardMap::default();
        assert_eq!(map.keysym(9), None);
        assert_eq!(map.action(9), KeyAction::Ignored);
    }
}
