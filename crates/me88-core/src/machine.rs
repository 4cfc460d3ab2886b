//! Power-on assembly of the session address map around one processor.

use tracing::debug;

use crate::bus::Bus;
use crate::config::MachineConfig;
use crate::image::ImageError;
use crate::memory::{
    MemoryDevice, MemoryRegion, INTERRUPT_HANDLER_BASE, INTERRUPT_HANDLER_SELECTOR,
};
use crate::processor::Processor;
use crate::status::ProcessorStatus;

/// Interrupt vector table layout helpers.
///
/// Entry `n` lives at physical `n * 4` as `[IP low, IP high, CS low, CS high]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorTable;

impl VectorTable {
    /// Bytes per vector descriptor.
    pub const ENTRY_BYTES: u32 = 4;
    /// Number of vectors.
    pub const ENTRIES: usize = 256;

    /// Physical address of the descriptor for `vector`.
    #[must_use]
    pub const fn address(vector: u8) -> u32 {
        vector as u32 * Self::ENTRY_BYTES
    }

    /// Encodes a handler entry point.
    #[must_use]
    pub const fn encode(ip: u16, cs: u16) -> [u8; 4] {
        let [ip_lo, ip_hi] = ip.to_le_bytes();
        let [cs_lo, cs_hi] = cs.to_le_bytes();
        [ip_lo, ip_hi, cs_lo, cs_hi]
    }

    /// Decodes a descriptor into `(ip, cs)`.
    #[must_use]
    pub const fn decode(bytes: [u8; 4]) -> (u16, u16) {
        (
            u16::from_le_bytes([bytes[0], bytes[1]]),
            u16::from_le_bytes([bytes[2], bytes[3]]),
        )
    }

    /// Full table with every vector pointing at `cs:ip`.
    #[must_use]
    pub fn uniform(ip: u16, cs: u16) -> Vec<u8> {
        Self::encode(ip, cs).repeat(Self::ENTRIES)
    }
}

/// Aggregated result of [`Machine::run_until_halt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    /// The processor reached `hlt`.
    Halted {
        /// Clocks executed during this call.
        clocks: u64,
    },
    /// The clock budget ran out first.
    ClockLimit {
        /// Clocks executed during this call.
        clocks: u64,
    },
}

impl RunOutcome {
    /// Clocks executed during the run call.
    #[must_use]
    pub const fn clocks(self) -> u64 {
        match self {
            Self::Halted { clocks } | Self::ClockLimit { clocks } => clocks,
        }
    }
}

/// Processor plus the fixed four-device bus.
#[derive(Debug, Clone)]
pub struct Machine {
    processor: Processor,
    bus: Bus,
}

impl Machine {
    /// Builds the bus, loads the images and resets the processor.
    ///
    /// Devices are registered as EPROM, RAM one, video, RAM two. When an
    /// interrupt-handler image is given it is placed at `0x00400` and every
    /// vector is pointed at it.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::TooLarge`] when an image does not fit its
    /// device.
    pub fn power_on(
        config: &MachineConfig,
        program: &[u8],
        interrupt_image: Option<&[u8]>,
    ) -> Result<Self, ImageError> {
        let mut bus = Bus::new(config.noise_seed);
        for region in MemoryRegion::REGISTRATION_ORDER {
            let (low, high) = region.bounds();
            let mut device = MemoryDevice::new(low, high, region.access(), config.noise_seed);
            match region {
                MemoryRegion::Eprom => device.load(low, program)?,
                MemoryRegion::RamOne => {
                    if let Some(handler) = interrupt_image {
                        device.load(
                            0,
                            &VectorTable::uniform(0x0000, INTERRUPT_HANDLER_SELECTOR),
                        )?;
                        device.load(INTERRUPT_HANDLER_BASE, handler)?;
                    }
                }
                MemoryRegion::Video | MemoryRegion::RamTwo => {}
            }
            bus.register_device(device);
        }
        debug!(
            program_len = program.len(),
            handler_len = interrupt_image.map_or(0, <[u8]>::len),
            "machine powered on"
        );

        Ok(Self {
            processor: Processor::new(config),
            bus,
        })
    }

    /// Resets the processor; device contents are kept.
    pub fn on_reset(&mut self) {
        self.processor.on_reset();
    }

    /// Runs one clock.
    pub fn on_clock(&mut self) {
        self.processor.on_clock(&mut self.bus);
    }

    /// Clocks until `hlt` or until `max_clocks` clocks have run.
    pub fn run_until_halt(&mut self, max_clocks: u64) -> RunOutcome {
        let mut clocks = 0;
        while clocks < max_clocks {
            if self.processor.is_halted() {
                return RunOutcome::Halted { clocks };
            }
            self.on_clock();
            clocks += 1;
        }
        if self.processor.is_halted() {
            RunOutcome::Halted { clocks }
        } else {
            RunOutcome::ClockLimit { clocks }
        }
    }

    /// Raises a hardware interrupt.
    pub const fn raise_interrupt(&mut self, vector: u8) {
        self.processor.raise_interrupt(vector);
    }

    /// Returns `true` once the processor is parked on `hlt`.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.processor.is_halted()
    }

    /// Processor status snapshot.
    #[must_use]
    pub fn status(&self) -> ProcessorStatus {
        self.processor.status()
    }

    /// The processor.
    #[must_use]
    pub const fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Mutable processor access for register injection.
    pub const fn processor_mut(&mut self) -> &mut Processor {
        &mut self.processor
    }

    /// The bus and its devices.
    #[must_use]
    pub const fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Device backing a named region.
    #[must_use]
    pub fn device(&self, region: MemoryRegion) -> Option<&MemoryDevice> {
        MemoryRegion::REGISTRATION_ORDER
            .iter()
            .position(|candidate| *candidate == region)
            .and_then(|index| self.bus.device(index))
    }

    /// Dumps of every device in [`MemoryRegion::DUMP_ORDER`]; the video
    /// region is rendered as text.
    #[must_use]
    pub fn dumps(&self) -> Vec<String> {
        MemoryRegion::DUMP_ORDER
            .iter()
            .filter_map(|region| {
                self.device(*region)
                    .map(|device| device.dump(region.title(), *region == MemoryRegion::Video))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Machine, RunOutcome, VectorTable};
    use crate::config::MachineConfig;
    use crate::image::ImageError;
    use crate::memory::{MemoryRegion, EPROM_START, INTERRUPT_HANDLER_BASE};

    #[test]
    fn vector_descriptor_is_little_endian_ip_then_cs() {
        assert_eq!(VectorTable::encode(0x1234, 0xABCD), [0x34, 0x12, 0xCD, 0xAB]);
        assert_eq!(VectorTable::decode([0x34, 0x12, 0xCD, 0xAB]), (0x1234, 0xABCD));
        assert_eq!(VectorTable::address(0x06), 0x18);
        assert_eq!(VectorTable::uniform(0, 0x40).len(), 1024);
    }

    #[test]
    fn program_lands_at_eprom_base() {
        let machine =
            Machine::power_on(&MachineConfig::default(), &[0x14, 0x15], None).expect("power on");
        let eprom = machine.device(MemoryRegion::Eprom).expect("eprom");
        assert_eq!(eprom.peek(EPROM_START), Some(0x14));
        assert_eq!(eprom.peek(EPROM_START + 1), Some(0x15));
    }

    #[test]
    fn interrupt_image_populates_vectors_and_handler() {
        let machine = Machine::power_on(&MachineConfig::default(), &[0x15], Some(&[0x16]))
            .expect("power on");
        let ram = machine.device(MemoryRegion::RamOne).expect("ram one");
        let entry = [0, 1, 2, 3].map(|i| ram.peek(VectorTable::address(0xFF) + i).unwrap_or(0xEE));
        assert_eq!(VectorTable::decode(entry), (0x0000, 0x0040));
        assert_eq!(ram.peek(INTERRUPT_HANDLER_BASE), Some(0x16));
    }

    #[test]
    fn oversized_program_is_rejected() {
        let program = vec![0x14; 0x1_0001];
        let err = Machine::power_on(&MachineConfig::default(), &program, None)
            .expect_err("program exceeds eprom");
        assert!(matches!(err, ImageError::TooLarge { .. }));
    }

    #[test]
    fn run_until_halt_stops_on_hlt() {
        let mut machine =
            Machine::power_on(&MachineConfig::default(), &[0x14, 0x15], None).expect("power on");
        let outcome = machine.run_until_halt(1_000);
        assert!(matches!(outcome, RunOutcome::Halted { .. }));
        assert!(machine.is_halted());
        assert!(outcome.clocks() < 1_000);
    }

    #[test]
    fn run_until_halt_honours_clock_budget() {
        let mut machine =
            Machine::power_on(&MachineConfig::default(), &[0x14], None).expect("power on");
        assert_eq!(machine.run_until_halt(3), RunOutcome::ClockLimit { clocks: 3 });
    }

    #[test]
    fn dumps_cover_every_device() {
        let machine =
            Machine::power_on(&MachineConfig::default(), &[0x41], None).expect("power on");
        let dumps = machine.dumps();
        assert_eq!(dumps.len(), 4);
        assert!(dumps[0].starts_with("Dump Eprom: "));
        assert!(dumps[2].starts_with("Dump RAMTwo: "));
        assert_eq!(dumps[3], "Dump Video: \n");
    }
}
