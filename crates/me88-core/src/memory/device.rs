//! Sparse byte-addressable memory device.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::image::ImageError;

/// Capability flags of a memory device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DeviceAccess {
    /// Reads return stored contents.
    pub readable: bool,
    /// Writes update stored contents.
    pub writeable: bool,
    /// Device sits on the IO side (memory-mapped peripheral).
    pub io: bool,
}

impl DeviceAccess {
    /// Plain RAM.
    pub const READ_WRITE: Self = Self {
        readable: true,
        writeable: true,
        io: false,
    };
    /// Program store.
    pub const READ_ONLY: Self = Self {
        readable: true,
        writeable: false,
        io: false,
    };
    /// Framebuffer-style peripheral.
    pub const WRITE_ONLY_IO: Self = Self {
        readable: false,
        writeable: true,
        io: true,
    };
}

/// A memory region `[low, high]` with lazily materialised cells.
///
/// Cells that were never written read back as a pseudo-random byte. For a
/// readable device the first such byte is cached, so an untouched cell stays
/// stable for the rest of the session.
#[derive(Debug, Clone)]
pub struct MemoryDevice {
    low: u32,
    high: u32,
    access: DeviceAccess,
    cells: BTreeMap<u32, u8>,
    rng: StdRng,
}

impl MemoryDevice {
    /// Creates an empty device. `low` and `high` are swapped when given in
    /// the wrong order.
    #[must_use]
    pub fn new(low: u32, high: u32, access: DeviceAccess, seed: u64) -> Self {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        Self {
            low,
            high,
            access,
            cells: BTreeMap::new(),
            rng: StdRng::seed_from_u64(seed ^ (u64::from(low) << 24)),
        }
    }

    /// Creates a device and loads `image` starting at `low`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::TooLarge`] when the image does not fit.
    pub fn with_image(
        low: u32,
        high: u32,
        access: DeviceAccess,
        seed: u64,
        image: &[u8],
    ) -> Result<Self, ImageError> {
        let mut device = Self::new(low, high, access, seed);
        device.load(device.low, image)?;
        Ok(device)
    }

    /// Places `image` at `base`, bypassing the writeable flag.
    ///
    /// This is the power-on initialisation path; runtime traffic goes
    /// through [`MemoryDevice::write`].
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::TooLarge`] when any byte would land outside the
    /// device range.
    pub fn load(&mut self, base: u32, image: &[u8]) -> Result<(), ImageError> {
        let capacity = if self.is_in_range(base) {
            (self.high - base) as usize + 1
        } else {
            0
        };
        if image.len() > capacity {
            return Err(ImageError::TooLarge {
                len: image.len(),
                capacity,
            });
        }
        for (addr, byte) in (base..).zip(image.iter().copied()) {
            self.cells.insert(addr, byte);
        }
        Ok(())
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn low(&self) -> u32 {
        self.low
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn high(&self) -> u32 {
        self.high
    }

    /// Capability flags.
    #[must_use]
    pub const fn access(&self) -> DeviceAccess {
        self.access
    }

    /// Returns `true` when `addr` lies within `[low, high]`.
    #[must_use]
    pub const fn is_in_range(&self, addr: u32) -> bool {
        addr >= self.low && addr <= self.high
    }

    /// Stores `value` at `addr`; ignored when out of range or not writeable.
    pub fn write(&mut self, addr: u32, value: u8) {
        if self.access.writeable && self.is_in_range(addr) {
            self.cells.insert(addr, value);
        }
    }

    /// Reads the byte at `addr`.
    ///
    /// Out-of-range or unreadable accesses return a fresh pseudo-random byte.
    pub fn read(&mut self, addr: u32) -> u8 {
        if !self.access.readable || !self.is_in_range(addr) {
            return self.rng.gen();
        }
        if let Some(value) = self.cells.get(&addr) {
            return *value;
        }
        let value = self.rng.gen();
        self.cells.insert(addr, value);
        value
    }

    /// Stored byte at `addr` without touching the cache or the generator.
    #[must_use]
    pub fn peek(&self, addr: u32) -> Option<u8> {
        self.cells.get(&addr).copied()
    }

    /// Number of materialised cells.
    #[must_use]
    pub fn populated(&self) -> usize {
        self.cells.len()
    }

    /// Renders the populated cells from the highest address down.
    ///
    /// `as_characters` concatenates the values as text instead of listing
    /// `[addr] value` pairs.
    #[must_use]
    pub fn dump(&self, title: &str, as_characters: bool) -> String {
        let mut out = format!("Dump {title}: ");
        for (addr, value) in self.cells.iter().rev() {
            if as_characters {
                out.push(char::from(*value));
            } else {
                let _ = write!(out, "[{addr:#07X}] {value} ");
            }
        }
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{DeviceAccess, MemoryDevice};
    use crate::image::ImageError;

    #[test]
    fn write_then_read_returns_stored_byte() {
        let mut device = MemoryDevice::new(0x100, 0x1FF, DeviceAccess::READ_WRITE, 7);
        device.write(0x180, 0x5A);
        assert_eq!(device.read(0x180), 0x5A);
    }

    #[test]
    fn untouched_cell_is_cached_after_first_read() {
        let mut device = MemoryDevice::new(0x100, 0x1FF, DeviceAccess::READ_WRITE, 7);
        let first = device.read(0x150);
        for _ in 0..8 {
            assert_eq!(device.read(0x150), first);
        }
        assert_eq!(device.peek(0x150), Some(first));
    }

    #[test]
    fn out_of_range_write_is_ignored() {
        let mut device = MemoryDevice::new(0x100, 0x1FF, DeviceAccess::READ_WRITE, 7);
        device.write(0x200, 0x11);
        device.write(0x0FF, 0x11);
        assert_eq!(device.populated(), 0);
    }

    #[test]
    fn read_only_device_ignores_writes() {
        let mut device = MemoryDevice::with_image(0, 3, DeviceAccess::READ_ONLY, 1, &[1, 2, 3, 4])
            .expect("image fits");
        device.write(2, 0xFF);
        assert_eq!(device.read(2), 3);
    }

    #[test]
    fn unreadable_device_does_not_cache_reads() {
        let mut device = MemoryDevice::new(0, 0xFF, DeviceAccess::WRITE_ONLY_IO, 3);
        device.write(0x10, b'A');
        let _ = device.read(0x20);
        assert_eq!(device.populated(), 1);
        assert_eq!(device.peek(0x10), Some(b'A'));
    }

    #[test]
    fn same_seed_reproduces_undefined_reads() {
        let mut a = MemoryDevice::new(0, 0xFF, DeviceAccess::READ_WRITE, 99);
        let mut b = MemoryDevice::new(0, 0xFF, DeviceAccess::READ_WRITE, 99);
        let left: Vec<u8> = (0..16).map(|addr| a.read(addr)).collect();
        let right: Vec<u8> = (0..16).map(|addr| b.read(addr)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn oversized_image_is_rejected() {
        let err = MemoryDevice::with_image(0, 1, DeviceAccess::READ_ONLY, 0, &[0, 0, 0])
            .expect_err("three bytes into two cells");
        assert!(matches!(err, ImageError::TooLarge { len: 3, capacity: 2 }));
    }

    #[test]
    fn dump_lists_cells_in_descending_order() {
        let mut device = MemoryDevice::new(0, 0xFF, DeviceAccess::READ_WRITE, 0);
        device.write(0x01, 10);
        device.write(0x02, 20);
        assert_eq!(device.dump("RAM", false), "Dump RAM: [0x00002] 20 [0x00001] 10 \n");
    }

    #[test]
    fn character_dump_concatenates_text() {
        let mut device = MemoryDevice::new(0, 0xFF, DeviceAccess::WRITE_ONLY_IO, 0);
        device.write(0x00, b'i');
        device.write(0x01, b'h');
        assert_eq!(device.dump("Video", true), "Dump Video: hi\n");
    }
}
