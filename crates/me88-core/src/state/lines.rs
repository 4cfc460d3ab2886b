/// Bus-facing address, data and control latches.
///
/// Strobes are modelled active-high: `true` means asserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BusLines {
    /// 20-bit memory address register (`MAR`).
    pub mar: u32,
    /// Data lines `D7..D0` as latched by the last read cycle.
    pub data: u8,
    /// Direction: `true` while the processor drives the data lines.
    pub dir: bool,
    /// Memory read strobe.
    pub mem_read: bool,
    /// Memory write strobe.
    pub mem_write: bool,
    /// IO read strobe.
    pub io_read: bool,
    /// IO write strobe.
    pub io_write: bool,
    /// Interrupt acknowledge.
    pub inta: bool,
}

impl BusLines {
    /// Returns `true` when a read cycle will run at the end of this clock.
    #[must_use]
    pub const fn reading(&self) -> bool {
        self.mem_read || self.io_read
    }

    /// Returns `true` when a write cycle will run at the end of this clock.
    #[must_use]
    pub const fn writing(&self) -> bool {
        self.mem_write || self.io_write
    }
}
