//! Keypad (joypad) functions and structures.

use crate::{
    consts::JOYP_ADDR,
    mmu::BusComponent,
    pic::{Interrupt, Pic},
    warnln,
};

/// Identifies one of the eight physical keys of the DMG keypad matrix.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PadKey {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl PadKey {
    /// All eight keys, in the order expected by [`Pad::set_keys`].
    pub const ALL: [PadKey; 8] = [
        PadKey::Right,
        PadKey::Left,
        PadKey::Up,
        PadKey::Down,
        PadKey::A,
        PadKey::B,
        PadKey::Select,
        PadKey::Start,
    ];
}

pub struct Pad {
    right: bool,
    left: bool,
    up: bool,
    down: bool,
    a: bool,
    b: bool,
    select: bool,
    start: bool,

    /// Selects the action-key row (bit 5 of JOYP written low).
    select_action: bool,

    /// Selects the direction-key row (bit 4 of JOYP written low).
    select_direction: bool,
}

impl Pad {
    pub fn new() -> Self {
        Self {
            right: false,
            left: false,
            up: false,
            down: false,
            a: false,
            b: false,
            select: false,
            start: false,
            select_action: false,
            select_direction: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            JOYP_ADDR => {
                let mut value = 0x0f;
                if self.select_action {
                    if self.a {
                        value &= !0x01;
                    }
                    if self.b {
                        value &= !0x02;
                    }
                    if self.select {
                        value &= !0x04;
                    }
                    if self.start {
                        value &= !0x08;
                    }
                }
                if self.select_direction {
                    if self.right {
                        value &= !0x01;
                    }
                    if self.left {
                        value &= !0x02;
                    }
                    if self.up {
                        value &= !0x04;
                    }
                    if self.down {
                        value &= !0x08;
                    }
                }
                value
            }
            _ => {
                warnln!("Reading from unknown Pad location 0x{:04x}", addr);
                #[allow(unreachable_code)]
                0xff
            }
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            JOYP_ADDR => {
                self.select_action = value & 0x20 == 0x00;
                self.select_direction = value & 0x10 == 0x00;
            }
            _ => warnln!("Writing to unknown Pad location 0x{:04x}", addr),
        }
    }

    /// Marks `key` as pressed, raising the JoyPad interrupt if that key's
    /// row is currently selected (a high-to-low transition on P1).
    pub fn key_press(&mut self, key: PadKey, pic: &mut Pic) {
        let was_set = self.is_set(key);
        self.set(key, true);
        let selected = self.row_selected(key);
        if selected && !was_set {
            pic.raise(Interrupt::Pad);
        }
    }

    pub fn key_lift(&mut self, key: PadKey) {
        self.set(key, false);
    }

    /// Replaces the full key state in one shot, ordered per [`PadKey::ALL`],
    /// raising the JoyPad interrupt for any key that newly transitions
    /// from released to pressed in a selected row.
    pub fn set_keys(&mut self, keys: [bool; 8], pic: &mut Pic) {
        for (key, &pressed) in PadKey::ALL.iter().zip(keys.iter()) {
            if pressed {
                self.key_press(*key, pic);
            } else {
                self.key_lift(*key);
            }
        }
    }

    fn is_set(&self, key: PadKey) -> bool {
        match key {
            PadKey::Right => self.right,
            PadKey::Left => self.left,
            PadKey::Up => self.up,
            PadKey::Down => self.down,
            PadKey::A => self.a,
            PadKey::B => self.b,
            PadKey::Select => self.select,
            PadKey::Start => self.start,
        }
    }

    fn set(&mut self, key: PadKey, value: bool) {
        match key {
            PadKey::Right => self.right = value,
            PadKey::Left => self.left = value,
            PadKey::Up => self.up = value,
            PadKey::Down => self.down = value,
            PadKey::A => self.a = value,
            PadKey::B => self.b = value,
            PadKey::Select => self.select = value,
            PadKey::Start => self.start = value,
        }
    }

    fn row_selected(&self, key: PadKey) -> bool {
        match key {
            PadKey::Right | PadKey::Left | PadKey::Up | PadKey::Down => self.select_direction,
            PadKey::A | PadKey::B | PadKey::Select | PadKey::Start => self.select_action,
        }
    }
}

impl BusComponent for Pad {
    fn read(&self, addr: u16) -> u8 {
        self.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}

impl Default for Pad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Pad, PadKey};
    use crate::{consts::JOYP_ADDR, pic::Pic};

    #[test]
    fn test_pad_default_read() {
        let mut pad = Pad::new();
        pad.write(JOYP_ADDR, 0x00);
        assert_eq!(pad.read(JOYP_ADDR), 0x0f);
    }

    #[test]
    fn test_pad_direction_select_clears_bit() {
        let mut pad = Pad::new();
        let mut pic = Pic::new();
        pad.write(JOYP_ADDR, 0xef); // select direction row (bit 4 low)
        pad.key_press(PadKey::Right, &mut pic);
        assert_eq!(pad.read(JOYP_ADDR) & 0x01, 0x00);
    }

    #[test]
    fn test_pad_action_and_direction_and_together() {
        let mut pad = Pad::new();
        let mut pic = Pic::new();
        pad.write(JOYP_ADDR, 0x00); // both rows selected
        pad.key_press(PadKey::A, &mut pic);
        // bit 0 clear from action row, direction row A has no effect
        assert_eq!(pad.read(JOYP_ADDR) & 0x01, 0x00);
    }

    #[test]
    fn test_pad_press_raises_interrupt_when_selected() {
        let mut pad = Pad::new();
        let mut pic = Pic::new();
        pad.write(JOYP_ADDR, 0xdf); // select action row
        pad.key_press(PadKey::A, &mut pic);
        // pending() reports on IF alone, regardless of IE
        assert!(pic.pending());
        assert_eq!(pic.int_flag() & 0x10, 0x10);
    }

    #[test]
    fn test_pad_press_does_not_raise_when_not_selected() {
        let mut pad = Pad::new();
        let mut pic = Pic::new();
        pad.write(JOYP_ADDR, 0xff); // neither row selected
        pad.key_press(PadKey::A, &mut pic);
        assert_eq!(pic.int_flag() & 0x10, 0x00);
    }
}
