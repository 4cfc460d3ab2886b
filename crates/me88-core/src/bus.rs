//! Ordered device registry that routes processor bus cycles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{trace, warn};

use crate::memory::MemoryDevice;

/// Host-facing byte bus driven by the processor at the end of each clock.
///
/// Neither operation can fail: undefined reads return some byte and stray
/// writes are dropped.
pub trait SystemBus {
    /// Reads one byte at a 20-bit physical address.
    fn read(&mut self, addr: u32) -> u8;

    /// Writes one byte at a 20-bit physical address.
    fn write(&mut self, addr: u32, value: u8);
}

/// Bus made of memory devices scanned in registration order.
#[derive(Debug, Clone)]
pub struct Bus {
    devices: Vec<MemoryDevice>,
    rng: StdRng,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Bus {
    /// Creates an empty bus whose floating lines are seeded from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            devices: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Appends a device and returns its registry index.
    ///
    /// Ranges are not checked for overlap; the earliest registration wins.
    pub fn register_device(&mut self, device: MemoryDevice) -> usize {
        self.devices.push(device);
        self.devices.len() - 1
    }

    /// Registered devices in priority order.
    #[must_use]
    pub fn devices(&self) -> &[MemoryDevice] {
        &self.devices
    }

    /// Device at a registry index.
    #[must_use]
    pub fn device(&self, index: usize) -> Option<&MemoryDevice> {
        self.devices.get(index)
    }

    /// Index of the device that answers `addr`, if any.
    #[must_use]
    pub fn decode(&self, addr: u32) -> Option<usize> {
        self.devices
            .iter()
            .position(|device| device.is_in_range(addr))
    }
}

impl SystemBus for Bus {
    fn read(&mut self, addr: u32) -> u8 {
        match self.decode(addr) {
            Some(index) => self.devices[index].read(addr),
            None => {
                let value = self.rng.gen();
                trace!(addr, value, "unmapped bus read");
                value
            }
        }
    }

    fn write(&mut self, addr: u32, value: u8) {
        match self.decode(addr) {
            Some(index) => self.devices[index].write(addr, value),
            None => warn!(addr, value, "unmapped bus write dropped"),
        }
    }
}
