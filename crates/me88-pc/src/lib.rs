//! Driver for the me88 machine.
//!
//! Loads the program and interrupt-handler images, powers the machine on and
//! clocks it, optionally waiting for a line on the input before every clock.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use me88_core::{load_image, ImageError, Machine, MachineConfig};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber as _;

/// Status rendering.
pub mod printer;
pub use printer::{render_json, render_status, render_text, OutputFormat};

/// Failure while preparing or driving a session.
#[derive(Debug, Error)]
pub enum DriverError {
    /// A program image could not be loaded or placed.
    #[error(transparent)]
    Image(#[from] ImageError),
    /// Terminal input or output failed.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// A status snapshot could not be serialized.
    #[error("failed to encode status: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything one driver session needs.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// EPROM program image.
    pub program: PathBuf,
    /// Optional interrupt-handler image.
    pub interrupts: Option<PathBuf>,
    /// Wait for a line of input before each clock; `q` quits.
    pub debug: bool,
    /// Stop after this many clocks.
    pub max_clocks: Option<u64>,
    /// Print only the final frame.
    pub quiet: bool,
    /// Frame format.
    pub format: OutputFormat,
    /// Machine configuration.
    pub config: MachineConfig,
}

/// Why the clock loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The processor executed `hlt`.
    Halted,
    /// `max_clocks` was reached.
    ClockLimit,
    /// The user quit a debug session, or input ended.
    Quit,
}

/// Outcome of [`run_session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Why the loop ended.
    pub reason: StopReason,
    /// Clocks executed.
    pub clocks: u64,
}

/// Loads the images named in `options` and powers a machine on.
///
/// # Errors
///
/// Returns [`DriverError::Image`] when an image cannot be read, decoded or
/// placed.
pub fn power_on(options: &SessionOptions) -> Result<Machine, DriverError> {
    let program = load_image(&options.program)?;
    let interrupts = options
        .interrupts
        .as_deref()
        .map(load_image)
        .transpose()?;
    info!(
        program = %options.program.display(),
        bytes = program.len(),
        interrupts = interrupts.is_some(),
        "loaded images"
    );
    Ok(Machine::power_on(
        &options.config,
        &program,
        interrupts.as_deref(),
    )?)
}

/// Runs the clock loop, writing a frame to `output` before every clock.
///
/// In quiet mode only the final frame is written.
///
/// # Errors
///
/// Returns [`DriverError::Io`] when reading `input` or writing `output`
/// fails, or [`DriverError::Json`] when a JSON frame cannot be encoded.
pub fn run_session<R: BufRead, W: Write>(
    machine: &mut Machine,
    options: &SessionOptions,
    mut input: R,
    mut output: W,
) -> Result<SessionSummary, DriverError> {
    let mut clocks = 0_u64;
    let reason = loop {
        if machine.is_halted() {
            break StopReason::Halted;
        }
        if options.max_clocks.is_some_and(|max| clocks >= max) {
            break StopReason::ClockLimit;
        }
        if !options.quiet {
            write_frame(machine, options.format, &mut output)?;
        }
        if options.debug && !wait_for_step(&mut input)? {
            break StopReason::Quit;
        }
        machine.on_clock();
        clocks += 1;
    };

    write_frame(machine, options.format, &mut output)?;
    output.flush()?;
    debug!(?reason, clocks, "session finished");
    Ok(SessionSummary { reason, clocks })
}

fn write_frame<W: Write>(
    machine: &Machine,
    format: OutputFormat,
    output: &mut W,
) -> Result<(), DriverError> {
    match format {
        OutputFormat::Text => writeln!(output, "{}", render_text(machine))?,
        OutputFormat::Json => writeln!(output, "{}", render_json(machine)?)?,
    }
    Ok(())
}

/// Returns `false` when the user asked to quit or input is exhausted.
fn wait_for_step<R: BufRead>(input: &mut R) -> Result<bool, DriverError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(!line.trim_start().starts_with('q'))
}
