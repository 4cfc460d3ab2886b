//! Status rendering for the driver loop.

use std::fmt::Write as _;

use me88_core::{to_mnemonic, Machine, ProcessorStatus};

/// Output flavour selected on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Register block, bus log and device dumps.
    #[default]
    Text,
    /// One JSON status object per line.
    Json,
}

/// Renders the register block and bus log of `status`.
#[must_use]
pub fn render_status(status: &ProcessorStatus) -> String {
    let regs = &status.registers;
    let lines = &status.lines;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "STAR = {} MJR = {} CLK = {}{}",
        status.star,
        status.mjr,
        status.clocks,
        if status.halted { " HALTED" } else { "" }
    );
    let _ = writeln!(
        out,
        "CS = {:04X} IP = {:04X} OPCODE = {:02X} ({}) SOURCE = {:02X} AL = {:02X} AH = {:02X}",
        regs.cs(),
        regs.ip(),
        regs.opcode(),
        to_mnemonic(regs.opcode()),
        regs.source(),
        regs.al(),
        regs.ah()
    );
    let _ = writeln!(
        out,
        "DEST_SEL = {:04X} DEST_OFF = {:04X}",
        regs.dest_sel(),
        regs.dest_off()
    );
    let _ = writeln!(
        out,
        "SS = {:04X} SP = {:04X} PREV_SS = {:04X} PREV_SP = {:04X} DS = {:04X} DI = {:04X} D7_D0 = {:02X}",
        regs.ss(),
        regs.sp(),
        regs.prev_ss(),
        regs.prev_sp(),
        regs.ds(),
        regs.di(),
        lines.data
    );
    let _ = writeln!(
        out,
        "CF = {} OF = {} SF = {} ZF = {} IF = {} US = {}",
        u8::from(status.cf()),
        u8::from(status.of()),
        u8::from(status.sf()),
        u8::from(status.zf()),
        u8::from(status.interrupts_enabled()),
        u8::from(status.user_mode())
    );
    let _ = writeln!(
        out,
        "MAR = {:05X} MBR = {:02X} DIR = {} MR = {} MW = {} IOR = {} IOW = {} INTA = {} INT = {} ({:02X})",
        lines.mar,
        regs.mbr(),
        u8::from(lines.dir),
        u8::from(lines.mem_read),
        u8::from(lines.mem_write),
        u8::from(lines.io_read),
        u8::from(lines.io_write),
        u8::from(lines.inta),
        u8::from(status.interrupt_pending),
        status.interrupt_vector
    );
    for access in &status.log {
        let _ = writeln!(out, "  {access}");
    }
    out
}

/// Renders the full text frame: status block followed by the device dumps.
#[must_use]
pub fn render_text(machine: &Machine) -> String {
    let mut out = render_status(&machine.status());
    out.push('\n');
    for dump in machine.dumps() {
        out.push_str(&dump);
    }
    out
}

/// Renders the status snapshot as a single JSON line.
///
/// # Errors
///
/// Returns the serializer error, which does not occur for well-formed
/// snapshots.
pub fn render_json(machine: &Machine) -> Result<String, serde_json::Error> {
    serde_json::to_string(&machine.status())
}
