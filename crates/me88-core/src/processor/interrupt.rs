//! Interrupt acknowledge, entry (hardware, software and fault) and `iret`.
//!
//! Entry pushes `F`, `IP` (high, low) and `CS` (high, low) onto the system
//! stack, clears `F`, then loads the descriptor at `SOURCE * 4` laid out as
//! `[IP low, IP high, CS low, CS high]`.

use tracing::debug;

use super::Processor;
use crate::address::{concat, high_byte, low_byte, physical_address};
use crate::fault::FaultCode;
use crate::state::{FetchState, InterruptState, Transition};

impl Processor {
    pub(super) fn step_interrupt(&mut self, state: InterruptState) -> Transition {
        use InterruptState as S;
        match state {
            S::IntAck0 => {
                self.lines.dir = false;
                self.lines.inta = true;
                self.interrupt_pending = false;
                Transition::to(S::IntAck1)
            }
            S::IntAck1 => {
                self.regs.set_source(self.lines.data);
                self.lines.inta = false;
                Transition::to(S::Int0)
            }
            S::AccessViolation => {
                let fault = FaultCode::AccessViolation;
                debug!(
                    address = self.lines.mar,
                    cs = self.regs.cs(),
                    ip = self.regs.ip(),
                    %fault,
                    "store suppressed"
                );
                self.lines.mem_write = false;
                self.regs.set_source(fault.vector());
                Transition::to(S::Int0)
            }

            S::Int0 => {
                debug!(
                    vector = self.regs.source(),
                    user_mode = self.regs.user_mode(),
                    cs = self.regs.cs(),
                    ip = self.regs.ip(),
                    "entering interrupt"
                );
                if self.regs.user_mode() {
                    self.regs.swap_stack();
                }
                Transition::to(S::Int1)
            }
            S::Int1 => {
                self.stage_interrupt_push(self.regs.flags());
                Transition::to(S::Int2)
            }
            S::Int2 => {
                self.lines.mem_write = true;
                Transition::to(S::Int3)
            }
            S::Int3 => {
                self.lines.mem_write = false;
                self.regs.set_flags(0);
                Transition::to(S::Int4)
            }
            S::Int4 => {
                self.stage_interrupt_push(high_byte(self.regs.ip()));
                Transition::to(S::Int5)
            }
            S::Int5 => {
                self.lines.mem_write = true;
                Transition::to(S::Int6)
            }
            S::Int6 => {
                self.lines.mem_write = false;
                Transition::to(S::Int7)
            }
            S::Int7 => {
                self.stage_interrupt_push(low_byte(self.regs.ip()));
                Transition::to(S::Int8)
            }
            S::Int8 => {
                self.lines.mem_write = true;
                Transition::to(S::Int9)
            }
            S::Int9 => {
                self.lines.mem_write = false;
                Transition::to(S::Int10)
            }
            S::Int10 => {
                self.stage_interrupt_push(high_byte(self.regs.cs()));
                Transition::to(S::Int11)
            }
            S::Int11 => {
                self.lines.mem_write = true;
                Transition::to(S::Int12)
            }
            S::Int12 => {
                self.lines.mem_write = false;
                Transition::to(S::Int13)
            }
            S::Int13 => {
                self.stage_interrupt_push(low_byte(self.regs.cs()));
                Transition::to(S::Int14)
            }
            S::Int14 => {
                self.lines.mem_write = true;
                Transition::to(S::Int15)
            }
            S::Int15 => {
                self.lines.mem_write = false;
                Transition::to(S::Int16)
            }
            S::Int16 => {
                self.begin_read(u32::from(self.regs.source()) << 2);
                Transition::to(S::Int17)
            }
            S::Int17 => Transition::to(S::Int18),
            S::Int18 => {
                self.latch_vector_byte();
                Transition::to(S::Int19)
            }
            S::Int19 => Transition::to(S::Int20),
            S::Int20 => {
                self.regs.set_ip(concat(self.lines.data, self.regs.mbr()));
                self.lines.mar += 1;
                Transition::to(S::Int21)
            }
            S::Int21 => Transition::to(S::Int22),
            S::Int22 => {
                self.latch_vector_byte();
                Transition::to(S::Int23)
            }
            S::Int23 => Transition::to(S::Int24),
            S::Int24 => {
                let high = self.end_read();
                self.regs.set_cs(concat(high, self.regs.mbr()));
                Transition::to(FetchState::Fetch0)
            }

            S::Iret0 => {
                self.begin_pop();
                Transition::to(S::Iret1)
            }
            S::Iret1 => Transition::to(S::Iret2),
            S::Iret2 => {
                self.regs.set_mbr(self.lines.data);
                self.begin_pop();
                Transition::to(S::Iret3)
            }
            S::Iret3 => Transition::to(S::Iret4),
            S::Iret4 => {
                self.regs.set_cs(concat(self.lines.data, self.regs.mbr()));
                self.begin_pop();
                Transition::to(S::Iret5)
            }
            S::Iret5 => Transition::to(S::Iret6),
            S::Iret6 => {
                self.regs.set_mbr(self.lines.data);
                self.begin_pop();
                Transition::to(S::Iret7)
            }
            S::Iret7 => Transition::to(S::Iret8),
            S::Iret8 => {
                self.regs.set_ip(concat(self.lines.data, self.regs.mbr()));
                self.begin_pop();
                Transition::to(S::Iret9)
            }
            S::Iret9 => Transition::to(S::Iret10),
            S::Iret10 => {
                let flags = self.end_read();
                self.regs.set_flags(flags);
                Transition::to(S::Iret11)
            }
            S::Iret11 => {
                if self.regs.user_mode() {
                    self.regs.swap_stack();
                }
                debug!(
                    cs = self.regs.cs(),
                    ip = self.regs.ip(),
                    flags = self.regs.flags(),
                    "interrupt return"
                );
                Transition::to(FetchState::Fetch0)
            }
        }
    }

    /// Pre-decrements `SP` and stages `value` at the new stack top.
    ///
    /// Interrupt pushes bypass the store check: they always target the
    /// system stack.
    const fn stage_interrupt_push(&mut self, value: u8) {
        self.regs.set_sp(self.regs.sp().wrapping_sub(1));
        let address = physical_address(self.regs.ss(), self.regs.sp());
        self.stage_write(address, value);
    }

    const fn latch_vector_byte(&mut self) {
        self.regs.set_mbr(self.lines.data);
        self.lines.mar += 1;
    }
}
