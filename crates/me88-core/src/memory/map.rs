//! Fixed session address map.

use super::DeviceAccess;

/// Inclusive start address of RAM one.
pub const RAM_ONE_START: u32 = 0x0_0000;
/// Inclusive end address of RAM one.
pub const RAM_ONE_END: u32 = 0x9_FFFF;
/// Inclusive start address of the video (framebuffer) region.
pub const VIDEO_START: u32 = 0xA_0000;
/// Inclusive end address of the video region.
pub const VIDEO_END: u32 = 0xA_FFFF;
/// Inclusive start address of RAM two.
pub const RAM_TWO_START: u32 = 0xB_0000;
/// Inclusive end address of RAM two.
pub const RAM_TWO_END: u32 = 0xE_FFFF;
/// Inclusive start address of the program EPROM.
pub const EPROM_START: u32 = 0xF_0000;
/// Inclusive end address of the program EPROM.
pub const EPROM_END: u32 = 0xF_FFFF;

/// Inclusive end address of the interrupt vector table (256 four-byte entries).
pub const VECTOR_TABLE_END: u32 = 0x0_03FF;
/// Physical load address of the optional interrupt-handler image.
pub const INTERRUPT_HANDLER_BASE: u32 = 0x0_0400;
/// Code selector that reaches [`INTERRUPT_HANDLER_BASE`] at offset zero.
pub const INTERRUPT_HANDLER_SELECTOR: u16 = 0x0040;

const _: () = assert!(
    VECTOR_TABLE_END + 1 == INTERRUPT_HANDLER_BASE
        && INTERRUPT_HANDLER_BASE == (INTERRUPT_HANDLER_SELECTOR as u32) << 4,
    "handler image must sit directly above the vector table"
);

/// Region classification for physical addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MemoryRegion {
    /// Read/write RAM (`0x00000..=0x9FFFF`).
    RamOne,
    /// Write-only IO framebuffer (`0xA0000..=0xAFFFF`).
    Video,
    /// Read/write RAM (`0xB0000..=0xEFFFF`).
    RamTwo,
    /// Read-only program store (`0xF0000..=0xFFFFF`).
    Eprom,
}

impl MemoryRegion {
    /// Regions in the order the machine registers them on the bus.
    pub const REGISTRATION_ORDER: [Self; 4] = [Self::Eprom, Self::RamOne, Self::Video, Self::RamTwo];
    /// Regions in the order their dumps are rendered; video comes last.
    pub const DUMP_ORDER: [Self; 4] = [Self::Eprom, Self::RamOne, Self::RamTwo, Self::Video];

    /// Returns the inclusive bounds for this region.
    #[must_use]
    pub const fn bounds(self) -> (u32, u32) {
        match self {
            Self::RamOne => (RAM_ONE_START, RAM_ONE_END),
            Self::Video => (VIDEO_START, VIDEO_END),
            Self::RamTwo => (RAM_TWO_START, RAM_TWO_END),
            Self::Eprom => (EPROM_START, EPROM_END),
        }
    }

    /// Capability flags of the device backing this region.
    #[must_use]
    pub const fn access(self) -> DeviceAccess {
        match self {
            Self::RamOne | Self::RamTwo => DeviceAccess::READ_WRITE,
            Self::Video => DeviceAccess::WRITE_ONLY_IO,
            Self::Eprom => DeviceAccess::READ_ONLY,
        }
    }

    /// Short title used in memory dumps.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::RamOne => "RAMOne",
            Self::Video => "Video",
            Self::RamTwo => "RAMTwo",
            Self::Eprom => "Eprom",
        }
    }
}
