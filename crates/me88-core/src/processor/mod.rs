//! Cycle-stepped me88 processor.
//!
//! Each [`Processor::on_clock`] runs exactly one micro-state handler and then
//! at most one bus cycle, selected by the strobes the handler left asserted.
//! A byte read in clock N is therefore visible on `D7..D0` in clock N+1.

/// Arithmetic/logic unit.
pub mod alu;
mod execute;
mod fetch;
mod interrupt;

use std::collections::VecDeque;

use tracing::{info, trace};

use crate::address::physical_address;
use crate::bus::SystemBus;
use crate::config::MachineConfig;
use crate::state::{
    BusLines, FetchState, InterruptState, MicroState, Registers, Transition, FLAG_IF,
};
use crate::status::{BusAccess, BusAccessKind, ProcessorStatus};

pub use alu::{evaluate, AluOutcome};

/// The me88 micro-state machine.
///
/// The processor owns no devices; every bus cycle goes through the
/// [`SystemBus`] passed to [`Processor::on_clock`].
#[derive(Debug, Clone)]
pub struct Processor {
    regs: Registers,
    lines: BusLines,
    star: MicroState,
    mjr: MicroState,
    interrupt_pending: bool,
    interrupt_vector: u8,
    clocks: u64,
    log: VecDeque<BusAccess>,
    log_capacity: usize,
    reset_cs: u16,
    reset_ip: u16,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new(&MachineConfig::default())
    }
}

impl Processor {
    /// Creates a processor in its reset state.
    #[must_use]
    pub fn new(config: &MachineConfig) -> Self {
        let mut processor = Self {
            regs: Registers::default(),
            lines: BusLines::default(),
            star: MicroState::FETCH_START,
            mjr: MicroState::FETCH_START,
            interrupt_pending: false,
            interrupt_vector: 0,
            clocks: 0,
            log: VecDeque::with_capacity(config.bus_log_capacity),
            log_capacity: config.bus_log_capacity,
            reset_cs: config.reset_cs,
            reset_ip: config.reset_ip,
        };
        processor.on_reset();
        processor
    }

    /// Returns every latch to its power-on value and restarts at the reset
    /// vector.
    ///
    /// The pending hardware interrupt belongs to the harness and survives.
    pub fn on_reset(&mut self) {
        self.regs = Registers::default();
        self.regs.set_cs(self.reset_cs);
        self.regs.set_ip(self.reset_ip);
        self.lines = BusLines::default();
        self.star = MicroState::FETCH_START;
        self.mjr = MicroState::FETCH_START;
        self.clocks = 0;
        self.log.clear();
    }

    /// Advances the machine by one micro-state and runs the resulting bus
    /// cycle, if any.
    pub fn on_clock<B: SystemBus + ?Sized>(&mut self, bus: &mut B) {
        let previous = self.star;
        let transition = match previous {
            MicroState::Fetch(state) => self.step_fetch(state),
            MicroState::Execute(state) => self.step_execute(state),
            MicroState::Interrupt(state) => self.step_interrupt(state),
        };
        self.star = transition.next;
        if let Some(resume) = transition.resume {
            self.mjr = resume;
        }
        self.clocks += 1;

        trace!(clock = self.clocks, from = %previous, to = %self.star, "micro-state");
        if self.star.is_halt() && !previous.is_halt() {
            info!(
                clock = self.clocks,
                cs = self.regs.cs(),
                ip = self.regs.ip(),
                "processor halted"
            );
        }

        self.run_bus_cycle(bus);
    }

    /// Signals a hardware interrupt with the vector the controller will
    /// drive during acknowledge.
    pub const fn raise_interrupt(&mut self, vector: u8) {
        self.interrupt_pending = true;
        self.interrupt_vector = vector;
    }

    /// Returns `true` while a hardware interrupt awaits acknowledge.
    #[must_use]
    pub const fn interrupt_pending(&self) -> bool {
        self.interrupt_pending
    }

    /// Returns `true` once `hlt` has parked the machine.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.star.is_halt()
    }

    /// Current micro-state (`STAR`).
    #[must_use]
    pub const fn star(&self) -> MicroState {
        self.star
    }

    /// Continuation micro-state (`MJR`).
    #[must_use]
    pub const fn mjr(&self) -> MicroState {
        self.mjr
    }

    /// Clocks since the last reset.
    #[must_use]
    pub const fn clocks(&self) -> u64 {
        self.clocks
    }

    /// Register file.
    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Mutable register file for direct injection by harnesses and tests.
    pub const fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    /// Address, data and control lines.
    #[must_use]
    pub const fn lines(&self) -> &BusLines {
        &self.lines
    }

    /// Builds a snapshot of the full processor state.
    #[must_use]
    pub fn status(&self) -> ProcessorStatus {
        ProcessorStatus {
            star: self.star,
            mjr: self.mjr,
            registers: self.regs.clone(),
            lines: self.lines,
            interrupt_pending: self.interrupt_pending,
            interrupt_vector: self.interrupt_vector,
            halted: self.is_halted(),
            clocks: self.clocks,
            log: self.log.iter().copied().collect(),
        }
    }

    fn run_bus_cycle<B: SystemBus + ?Sized>(&mut self, bus: &mut B) {
        let address = self.lines.mar;
        if self.lines.inta {
            self.lines.data = self.interrupt_vector;
            self.record(BusAccessKind::InterruptAcknowledge, false, address, self.lines.data);
        } else if self.lines.reading() {
            self.lines.data = bus.read(address);
            let io = self.lines.io_read && !self.lines.mem_read;
            self.record(BusAccessKind::Read, io, address, self.lines.data);
        } else if self.lines.writing() {
            let value = self.regs.mbr();
            bus.write(address, value);
            let io = self.lines.io_write && !self.lines.mem_write;
            self.record(BusAccessKind::Write, io, address, value);
        }
    }

    fn record(&mut self, kind: BusAccessKind, io: bool, address: u32, data: u8) {
        trace!(clock = self.clocks, ?kind, io, address, data, "bus cycle");
        if self.log_capacity == 0 {
            return;
        }
        while self.log.len() >= self.log_capacity {
            self.log.pop_front();
        }
        self.log.push_back(BusAccess {
            clock: self.clocks,
            kind,
            io,
            address,
            data,
        });
    }

    /// State that follows the last micro-state of an instruction.
    fn next_instruction(&self) -> MicroState {
        if self.regs.flag_is_set(FLAG_IF) && self.interrupt_pending {
            InterruptState::IntAck0.into()
        } else {
            FetchState::Fetch0.into()
        }
    }

    fn finish_instruction(&self) -> Transition {
        Transition::to(self.next_instruction())
    }

    fn resume(&self) -> Transition {
        Transition::to(self.mjr)
    }

    const fn begin_read(&mut self, address: u32) {
        self.lines.mar = address;
        self.lines.dir = false;
        self.lines.mem_read = true;
    }

    const fn end_read(&mut self) -> u8 {
        self.lines.mem_read = false;
        self.lines.io_read = false;
        self.lines.data
    }

    /// Addresses the next code byte and post-increments `IP`.
    const fn begin_code_read(&mut self) {
        let address = physical_address(self.regs.cs(), self.regs.ip());
        self.regs.set_ip(self.regs.ip().wrapping_add(1));
        self.begin_read(address);
    }

    /// Addresses the stack top and post-increments `SP`.
    const fn begin_pop(&mut self) {
        let address = physical_address(self.regs.ss(), self.regs.sp());
        self.regs.set_sp(self.regs.sp().wrapping_add(1));
        self.begin_read(address);
    }

    const fn stage_write(&mut self, address: u32, value: u8) {
        self.lines.mar = address;
        self.lines.dir = true;
        self.regs.set_mbr(value);
    }
}
