//! Read-only processor snapshot and bus-access log records.

use crate::state::{BusLines, MicroState, Registers, FLAG_CF, FLAG_IF, FLAG_OF, FLAG_SF, FLAG_US, FLAG_ZF};

/// Kind of a completed bus cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BusAccessKind {
    /// Byte latched onto `D7..D0` from the bus.
    Read,
    /// `MBR` driven onto the bus.
    Write,
    /// Vector number driven onto `D7..D0` by the interrupt controller.
    InterruptAcknowledge,
}

/// One entry of the bounded bus-access log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BusAccess {
    /// Clock on which the cycle ran (1-based since reset).
    pub clock: u64,
    /// Cycle kind.
    pub kind: BusAccessKind,
    /// `true` when the IO strobes ran the cycle.
    pub io: bool,
    /// Physical address (`MAR`).
    pub address: u32,
    /// Byte transferred.
    pub data: u8,
}

impl std::fmt::Display for BusAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self.kind {
            BusAccessKind::Read => "Reading",
            BusAccessKind::Write => "Writing",
            BusAccessKind::InterruptAcknowledge => "Acknowledge",
        };
        let space = if self.io { "io" } else { "mem" };
        write!(
            f,
            "#{clock} {verb} {space} {address:#07X} {data:#04X}",
            clock = self.clock,
            address = self.address,
            data = self.data
        )
    }
}

/// Immutable snapshot of every processor register, line and latch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ProcessorStatus {
    /// Current micro-state (`STAR`).
    pub star: MicroState,
    /// Continuation micro-state (`MJR`).
    pub mjr: MicroState,
    /// Register file and decode latches.
    pub registers: Registers,
    /// Address, data and control lines.
    pub lines: BusLines,
    /// Hardware interrupt waiting for acknowledge.
    pub interrupt_pending: bool,
    /// Vector that will be acknowledged for the pending interrupt.
    pub interrupt_vector: u8,
    /// Parked on `hlt`.
    pub halted: bool,
    /// Clocks elapsed since reset.
    pub clocks: u64,
    /// Most recent bus cycles, oldest first.
    pub log: Vec<BusAccess>,
}

impl ProcessorStatus {
    /// Carry flag.
    #[must_use]
    pub const fn cf(&self) -> bool {
        self.registers.flag_is_set(FLAG_CF)
    }

    /// Zero flag.
    #[must_use]
    pub const fn zf(&self) -> bool {
        self.registers.flag_is_set(FLAG_ZF)
    }

    /// Sign flag.
    #[must_use]
    pub const fn sf(&self) -> bool {
        self.registers.flag_is_set(FLAG_SF)
    }

    /// Overflow flag.
    #[must_use]
    pub const fn of(&self) -> bool {
        self.registers.flag_is_set(FLAG_OF)
    }

    /// Interrupt-enable flag.
    #[must_use]
    pub const fn interrupts_enabled(&self) -> bool {
        self.registers.flag_is_set(FLAG_IF)
    }

    /// User-mode flag.
    #[must_use]
    pub const fn user_mode(&self) -> bool {
        self.registers.flag_is_set(FLAG_US)
    }
}
