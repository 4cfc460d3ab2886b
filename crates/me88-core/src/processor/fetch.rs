//! Opcode fetch and the eight operand-fetch sequences.

use tracing::debug;

use super::Processor;
use crate::address::{concat, physical_address};
use crate::fault::FaultCode;
use crate::instruction::Format;
use crate::opcode::Opcode;
use crate::state::{FetchState, InterruptState, MicroState, Transition};

impl Processor {
    pub(super) fn step_fetch(&mut self, state: FetchState) -> Transition {
        use FetchState as S;
        match state {
            S::Fetch0 => {
                self.begin_code_read();
                Transition::to(S::Fetch1)
            }
            S::Fetch1 => Transition::to(S::Fetch2),
            S::Fetch2 => {
                let code = self.end_read();
                self.regs.set_opcode(code);
                let next = match self.admit(code) {
                    Ok(()) => S::Fetch3,
                    Err(_) => S::Invalid,
                };
                Transition::with_resume(next, MicroState::format_entry(Format::of(code)))
            }
            S::Fetch3 => match Opcode::from_u8(self.regs.opcode()) {
                Some(opcode) => Transition::with_resume(self.mjr, MicroState::execution_entry(opcode)),
                None => Transition::to(S::Invalid),
            },
            S::F0Dispatch => self.resume(),

            S::F1Fetch0 => {
                self.begin_read(physical_address(self.regs.ds(), self.regs.di()));
                Transition::to(S::F1Fetch1)
            }
            S::F1Fetch1 => Transition::to(S::F1Fetch2),
            S::F1Fetch2 => {
                let value = self.end_read();
                self.regs.set_source(value);
                self.resume()
            }

            S::F2Fetch0 => {
                self.regs.set_dest_sel(self.regs.ds());
                self.regs.set_dest_off(self.regs.di());
                self.resume()
            }

            S::F3Fetch0 => {
                self.begin_code_read();
                Transition::to(S::F3Fetch1)
            }
            S::F3Fetch1 => Transition::to(S::F3Fetch2),
            S::F3Fetch2 => {
                let value = self.end_read();
                self.regs.set_source(value);
                self.resume()
            }

            S::F4Fetch0 => {
                self.begin_code_read();
                Transition::to(S::F4Fetch1)
            }
            S::F4Fetch1 => Transition::to(S::F4Fetch2),
            S::F4Fetch2 => {
                self.latch_low_and_read_next();
                Transition::to(S::F4Fetch3)
            }
            S::F4Fetch3 => Transition::to(S::F4Fetch4),
            S::F4Fetch4 => {
                let offset = concat(self.lines.data, self.regs.mbr());
                if self.regs.opcode() == Opcode::InOffAl.code() {
                    self.lines.mem_read = false;
                    self.lines.mar = physical_address(0, offset);
                    Transition::to(S::F4Fetch5)
                } else {
                    self.lines.mar = physical_address(self.regs.ds(), offset);
                    Transition::to(S::F4Fetch6)
                }
            }
            S::F4Fetch5 => {
                self.lines.io_read = true;
                Transition::to(S::F4Fetch6)
            }
            S::F4Fetch6 => Transition::to(S::F4Fetch7),
            S::F4Fetch7 => {
                let value = self.end_read();
                self.regs.set_source(value);
                self.resume()
            }

            S::F5Fetch0 => {
                self.begin_code_read();
                Transition::to(S::F5Fetch1)
            }
            S::F5Fetch1 => Transition::to(S::F5Fetch2),
            S::F5Fetch2 => {
                self.latch_low_and_read_next();
                Transition::to(S::F5Fetch3)
            }
            S::F5Fetch3 => Transition::to(S::F5Fetch4),
            S::F5Fetch4 => {
                let selector = if self.regs.opcode() == Opcode::OutAlOff.code() {
                    0
                } else {
                    self.regs.ds()
                };
                let offset = self.end_word();
                self.regs.set_dest_sel(selector);
                self.regs.set_dest_off(offset);
                self.resume()
            }

            S::F6Fetch0 => {
                self.begin_code_read();
                Transition::to(S::F6Fetch1)
            }
            S::F6Fetch1 => Transition::to(S::F6Fetch2),
            S::F6Fetch2 => {
                self.latch_low_and_read_next();
                Transition::to(S::F6Fetch3)
            }
            S::F6Fetch3 => Transition::to(S::F6Fetch4),
            S::F6Fetch4 => {
                let offset = self.end_word();
                self.regs.set_dest_sel(self.regs.cs());
                self.regs.set_dest_off(offset);
                self.resume()
            }

            S::F7Fetch0 => {
                self.begin_code_read();
                Transition::to(S::F7Fetch1)
            }
            S::F7Fetch1 => Transition::to(S::F7Fetch2),
            S::F7Fetch2 => {
                self.latch_low_and_read_next();
                Transition::to(S::F7Fetch3)
            }
            S::F7Fetch3 => Transition::to(S::F7Fetch4),
            S::F7Fetch4 => {
                let offset = concat(self.lines.data, self.regs.mbr());
                self.regs.set_dest_off(offset);
                self.begin_code_read();
                Transition::to(S::F7Fetch5)
            }
            S::F7Fetch5 => Transition::to(S::F7Fetch6),
            S::F7Fetch6 => {
                self.latch_low_and_read_next();
                Transition::to(S::F7Fetch7)
            }
            S::F7Fetch7 => Transition::to(S::F7Fetch8),
            S::F7Fetch8 => {
                let selector = self.end_word();
                self.regs.set_dest_sel(selector);
                self.resume()
            }

            S::Invalid => {
                let fault = self
                    .admit(self.regs.opcode())
                    .err()
                    .unwrap_or(FaultCode::InvalidOpcode);
                debug!(
                    opcode = self.regs.opcode(),
                    cs = self.regs.cs(),
                    ip = self.regs.ip(),
                    %fault,
                    "instruction rejected"
                );
                self.regs.set_source(fault.vector());
                Transition::to(InterruptState::Int0)
            }
        }
    }

    /// Decides whether `code` may run in the current privilege mode.
    fn admit(&self, code: u8) -> Result<(), FaultCode> {
        match Opcode::from_u8(code) {
            None => Err(FaultCode::InvalidOpcode),
            Some(opcode) if opcode.is_privileged() && self.regs.user_mode() => {
                Err(FaultCode::PrivilegedInstruction)
            }
            Some(_) => Ok(()),
        }
    }

    /// Keeps the low operand byte in `MBR` and addresses the next code byte.
    const fn latch_low_and_read_next(&mut self) {
        self.regs.set_mbr(self.lines.data);
        self.begin_code_read();
    }

    /// Ends the high-byte read and joins it with the low byte held in `MBR`.
    const fn end_word(&mut self) -> u16 {
        let high = self.end_read();
        concat(high, self.regs.mbr())
    }
}
