//! Condition flags for the Intel 8080.
//!
//! The flag register packs five condition bits into one byte:
//!
//! ```text
//! bit:  7  6  5  4  3  2  1  0
//!       S  Z  0  A  0  P  1  C
//! ```
//!
//! Bits 5 and 3 always read as zero and bit 1 always reads as one; the
//! constant bits are observable through PUSH PSW / POP PSW.

pub type Flag = u8;

pub const SIGN: Flag = 1 << 7;
pub const ZERO: Flag = 1 << 6;
pub const AUX_CARRY: Flag = 1 << 4;
pub const PARITY: Flag = 1 << 2;
pub const CARRY: Flag = 1 << 0;

const CONDITION_MASK: u8 = SIGN | ZERO | AUX_CARRY | PARITY | CARRY;
const ALWAYS_ONE: u8 = 1 << 1;

#[derive(Default, Clone, Copy)]
pub struct Flags {
    value: u8,
}

impl Flags {
    pub fn get(&self, flag: Flag) -> bool {
        self.value & flag != 0
    }

    pub fn set(&mut self, flag: Flag, on: bool) {
        if on {
            self.value |= flag;
        } else {
            self.value &= !flag;
        }
    }

    /// Pack the flags into the program-status-word byte.
    pub fn psw(&self) -> u8 {
        (self.value & CONDITION_MASK) | ALWAYS_ONE
    }

    /// Unpack a program-status-word byte; the constant bits are ignored.
    pub fn set_psw(&mut self, value: u8) {
        self.value = value & CONDITION_MASK;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_each_flag() {
        let mut flags = Flags::default();

        for flag in [SIGN, ZERO, AUX_CARRY, PARITY, CARRY] {
            flags.set(flag, true);
            assert!(flags.get(flag), "flag {flag:#04x} should be set");
            flags.set(flag, false);
            assert!(!flags.get(flag), "flag {flag:#04x} should be clear");
        }
    }

    #[test]
    fn setting_one_flag_leaves_the_others_alone() {
        let mut flags = Flags::default();
        flags.set(SIGN, true);
        flags.set(AUX_CARRY, true);
        flags.set(CARRY, true);

        flags.set(AUX_CARRY, false);

        assert!(flags.get(SIGN));
        assert!(!flags.get(ZERO));
        assert!(!flags.get(AUX_CARRY));
        assert!(!flags.get(PARITY));
        assert!(flags.get(CARRY));
    }

    #[test]
    fn psw_carries_the_constant_bits() {
        let mut flags = Flags::default();
        assert_eq!(flags.psw(), 0x02);

        flags.set(SIGN, true);
        flags.set(ZERO, true);
        flags.set(AUX_CARRY, true);
        flags.set(PARITY, true);
        flags.set(CARRY, true);
        assert_eq!(flags.psw(), 0xd7);
    }

    #[test]
    fn set_psw_ignores_the_constant_bits() {
        let mut flags = Flags::default();
        // All bits high: bits 5, 3 and 1 must not stick.
        flags.set_psw(0xff);
        assert_eq!(flags.psw(), 0xd7);

        // All bits low: bit 1 still reads back as one.
        flags.set_psw(0x00);
        assert_eq!(flags.psw(), 0x02);
    }
}
