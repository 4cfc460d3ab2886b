use crate::address::{concat, high_byte, low_byte};

/// `F` bit for carry/borrow.
pub const FLAG_CF: u8 = 1 << 0;
/// `F` bit for zero result.
pub const FLAG_ZF: u8 = 1 << 1;
/// `F` bit for negative result.
pub const FLAG_SF: u8 = 1 << 2;
/// `F` bit for signed overflow.
pub const FLAG_OF: u8 = 1 << 3;
/// `F` bit for hardware interrupt enable.
pub const FLAG_IF: u8 = 1 << 4;
/// `F` bit for user mode.
pub const FLAG_US: u8 = 1 << 5;
/// Mask of architecturally active `F` bits.
pub const FLAGS_ACTIVE_MASK: u8 = FLAG_CF | FLAG_ZF | FLAG_SF | FLAG_OF | FLAG_IF | FLAG_US;

/// Programmer-visible registers plus the decode latches of the me88 core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Registers {
    al: u8,
    ah: u8,
    ds: u16,
    ss: u16,
    sp: u16,
    di: u16,
    cs: u16,
    ip: u16,
    prev_ss: u16,
    prev_sp: u16,
    flags: u8,
    mbr: u8,
    opcode: u8,
    source: u8,
    dest_sel: u16,
    dest_off: u16,
}

macro_rules! byte_register {
    ($(#[$doc:meta] $get:ident / $set:ident),* $(,)?) => {
        $(
            #[$doc]
            #[must_use]
            pub const fn $get(&self) -> u8 {
                self.$get
            }

            #[$doc]
            pub const fn $set(&mut self, value: u8) {
                self.$get = value;
            }
        )*
    };
}

macro_rules! word_register {
    ($(#[$doc:meta] $get:ident / $set:ident),* $(,)?) => {
        $(
            #[$doc]
            #[must_use]
            pub const fn $get(&self) -> u16 {
                self.$get
            }

            #[$doc]
            pub const fn $set(&mut self, value: u16) {
                self.$get = value;
            }
        )*
    };
}

impl Registers {
    byte_register! {
        /// `AL` accumulator low byte.
        al / set_al,
        /// `AH` accumulator high byte.
        ah / set_ah,
        /// `MBR` memory buffer register.
        mbr / set_mbr,
        /// `OPCODE` latch.
        opcode / set_opcode,
        /// `SOURCE` operand latch.
        source / set_source,
    }

    word_register! {
        /// `DS` data selector.
        ds / set_ds,
        /// `SS` stack selector.
        ss / set_ss,
        /// `SP` stack pointer.
        sp / set_sp,
        /// `DI` destination index.
        di / set_di,
        /// `CS` code selector.
        cs / set_cs,
        /// `IP` instruction pointer.
        ip / set_ip,
        /// Shadow `SS` swapped in on privilege changes.
        prev_ss / set_prev_ss,
        /// Shadow `SP` swapped in on privilege changes.
        prev_sp / set_prev_sp,
        /// `DEST_SEL` destination selector latch.
        dest_sel / set_dest_sel,
        /// `DEST_OFF` destination offset latch.
        dest_off / set_dest_off,
    }

    /// `AX` as `AH:AL`.
    #[must_use]
    pub const fn ax(&self) -> u16 {
        concat(self.ah, self.al)
    }

    /// Writes `AX`, splitting it into `AH:AL`.
    pub const fn set_ax(&mut self, value: u16) {
        self.ah = high_byte(value);
        self.al = low_byte(value);
    }

    /// Reads the `F` register.
    #[must_use]
    pub const fn flags(&self) -> u8 {
        self.flags
    }

    /// Writes the `F` register; inactive bits are dropped.
    pub const fn set_flags(&mut self, value: u8) {
        self.flags = value & FLAGS_ACTIVE_MASK;
    }

    /// Returns `true` when a specific `F` bit is set.
    #[must_use]
    pub const fn flag_is_set(&self, flag: u8) -> bool {
        (self.flags & flag) != 0
    }

    /// Sets or clears a specific active `F` bit.
    pub const fn set_flag(&mut self, flag: u8, enabled: bool) {
        if enabled {
            self.flags |= flag & FLAGS_ACTIVE_MASK;
        } else {
            self.flags &= !(flag & FLAGS_ACTIVE_MASK);
        }
    }

    /// Returns `true` while running in user mode.
    #[must_use]
    pub const fn user_mode(&self) -> bool {
        self.flag_is_set(FLAG_US)
    }

    /// Exchanges the live `SS:SP` pair with the shadow pair.
    pub const fn swap_stack(&mut self) {
        let (ss, sp) = (self.ss, self.sp);
        self.ss = self.prev_ss;
        self.sp = self.prev_sp;
        self.prev_ss = ss;
        self.prev_sp = sp;
    }
}
