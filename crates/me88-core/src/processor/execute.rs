//! Execution sequences for every non-interrupt operation category.

use super::{alu, Processor};
use crate::address::{concat, high_byte, low_byte, physical_address};
use crate::instruction::{AluOp, JumpCondition};
use crate::memory::validate_store_access;
use crate::opcode::Opcode;
use crate::state::{ExecuteState, FetchState, InterruptState, Transition, FLAG_IF, FLAG_US};

impl Processor {
    pub(super) fn step_execute(&mut self, state: ExecuteState) -> Transition {
        use ExecuteState as S;
        match state {
            S::Nop => self.finish_instruction(),
            S::Halt => Transition::to(S::Halt),

            S::AhFromAl => {
                self.regs.set_ah(self.regs.al());
                self.finish_instruction()
            }
            S::AlFromAh => {
                self.regs.set_al(self.regs.ah());
                self.finish_instruction()
            }
            S::DsFromAx => {
                self.regs.set_ds(self.regs.ax());
                self.finish_instruction()
            }
            S::SsFromAx => {
                self.regs.set_ss(self.regs.ax());
                self.finish_instruction()
            }
            S::SpFromAx => {
                self.regs.set_sp(self.regs.ax());
                self.finish_instruction()
            }
            S::DiFromAx => {
                self.regs.set_di(self.regs.ax());
                self.finish_instruction()
            }
            S::AxFromDs => {
                self.regs.set_ax(self.regs.ds());
                self.finish_instruction()
            }
            S::AxFromSs => {
                self.regs.set_ax(self.regs.ss());
                self.finish_instruction()
            }
            S::AxFromSp => {
                self.regs.set_ax(self.regs.sp());
                self.finish_instruction()
            }
            S::AxFromDi => {
                self.regs.set_ax(self.regs.di());
                self.finish_instruction()
            }

            S::Store0 => {
                let address = physical_address(self.regs.dest_sel(), self.regs.dest_off());
                self.stage_write(address, self.regs.al());
                Transition::to(S::Store1)
            }
            S::Store1 => self.checked_write(S::Store2),
            S::Store2 => {
                self.lines.mem_write = false;
                self.finish_instruction()
            }

            S::Out0 => {
                let address = physical_address(self.regs.dest_sel(), self.regs.dest_off());
                self.stage_write(address, self.regs.al());
                Transition::to(S::Out1)
            }
            S::Out1 => {
                self.lines.io_write = true;
                Transition::to(S::Out2)
            }
            S::Out2 => {
                self.lines.io_write = false;
                self.finish_instruction()
            }

            S::Alu => {
                if let Some(op) = AluOp::classify(self.regs.opcode()) {
                    let outcome =
                        alu::evaluate(op, self.regs.al(), self.regs.source(), self.regs.flags());
                    self.regs.set_al(outcome.value);
                    self.regs.set_flags(outcome.flags);
                }
                self.finish_instruction()
            }
            S::AlFromSource => {
                self.regs.set_al(self.regs.source());
                self.finish_instruction()
            }

            S::Jump => {
                let taken = JumpCondition::classify(self.regs.opcode())
                    .is_some_and(|condition| condition.holds(self.regs.flags()));
                self.regs.set_cs(self.regs.dest_sel());
                if taken {
                    self.regs.set_ip(self.regs.dest_off());
                }
                self.finish_instruction()
            }

            S::Push0 => {
                self.stage_push(self.regs.al());
                Transition::to(S::Push1)
            }
            S::Push1 => self.checked_write(S::Push2),
            S::Push2 => {
                self.finish_push();
                self.finish_instruction()
            }

            S::Pop0 => {
                self.begin_pop();
                Transition::to(S::Pop1)
            }
            S::Pop1 => Transition::to(S::Pop2),
            S::Pop2 => {
                let value = self.end_read();
                self.regs.set_al(value);
                self.finish_instruction()
            }

            S::Call0 => {
                self.stage_push(high_byte(self.regs.ip()));
                Transition::to(S::Call1)
            }
            S::Call1 => self.checked_write(S::Call2),
            S::Call2 => {
                self.finish_push();
                Transition::to(S::Call3)
            }
            S::Call3 => {
                self.stage_push(low_byte(self.regs.ip()));
                Transition::to(S::Call4)
            }
            S::Call4 => self.checked_write(S::Call5),
            S::Call5 => {
                self.finish_push();
                self.regs.set_ip(self.regs.dest_off());
                if self.regs.opcode() == Opcode::CallFar.code() {
                    Transition::to(S::Call6)
                } else {
                    Transition::to(S::Call12)
                }
            }
            S::Call6 => {
                self.stage_push(high_byte(self.regs.cs()));
                Transition::to(S::Call7)
            }
            S::Call7 => self.checked_write(S::Call8),
            S::Call8 => {
                self.finish_push();
                Transition::to(S::Call9)
            }
            S::Call9 => {
                self.stage_push(low_byte(self.regs.cs()));
                Transition::to(S::Call10)
            }
            S::Call10 => self.checked_write(S::Call11),
            S::Call11 => {
                self.finish_push();
                self.regs.set_cs(self.regs.dest_sel());
                Transition::to(S::Call12)
            }
            S::Call12 => self.finish_instruction(),

            S::Ret0 => {
                self.begin_pop();
                Transition::to(S::Ret1)
            }
            S::Ret1 => Transition::to(S::Ret2),
            S::Ret2 => {
                self.regs.set_mbr(self.lines.data);
                self.begin_pop();
                Transition::to(S::Ret3)
            }
            S::Ret3 => {
                if self.regs.opcode() == Opcode::Retf.code() {
                    Transition::to(S::Ret4)
                } else {
                    Transition::to(S::Ret8)
                }
            }
            S::Ret4 => {
                self.regs.set_cs(concat(self.lines.data, self.regs.mbr()));
                self.begin_pop();
                Transition::to(S::Ret5)
            }
            S::Ret5 => Transition::to(S::Ret6),
            S::Ret6 => {
                self.regs.set_mbr(self.lines.data);
                self.begin_pop();
                Transition::to(S::Ret7)
            }
            S::Ret7 => Transition::to(S::Ret8),
            S::Ret8 => {
                let high = self.end_read();
                self.regs.set_ip(concat(high, self.regs.mbr()));
                self.finish_instruction()
            }

            S::Cli => {
                self.regs.set_flag(FLAG_IF, false);
                Transition::to(FetchState::Fetch0)
            }
            S::Sti => {
                self.regs.set_flag(FLAG_IF, true);
                self.finish_instruction()
            }
            S::Ldpsr => {
                self.regs.set_prev_ss(self.regs.ss());
                self.regs.set_prev_sp(self.regs.sp());
                self.finish_instruction()
            }
            S::Stum => {
                self.regs.set_flag(FLAG_US, true);
                self.regs.swap_stack();
                self.finish_instruction()
            }
        }
    }

    /// Stages a byte for the slot just below the stack top.
    const fn stage_push(&mut self, value: u8) {
        let address = physical_address(self.regs.ss(), self.regs.sp().wrapping_sub(1));
        self.stage_write(address, value);
    }

    const fn finish_push(&mut self) {
        self.lines.mem_write = false;
        self.regs.set_sp(self.regs.sp().wrapping_sub(1));
    }

    /// Asserts the write strobe for the staged store, or diverts a
    /// user-mode store into the protected range to the fault sequence.
    fn checked_write(&mut self, next: ExecuteState) -> Transition {
        if validate_store_access(self.lines.mar, self.regs.user_mode()).is_ok() {
            self.lines.mem_write = true;
            Transition::to(next)
        } else {
            Transition::to(InterruptState::AccessViolation)
        }
    }
}
