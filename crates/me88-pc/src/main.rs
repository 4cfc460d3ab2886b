//! CLI entry point for the me88 machine driver.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use me88_core::{MachineConfig, DEFAULT_BUS_LOG_CAPACITY, DEFAULT_NOISE_SEED};
use me88_pc::{power_on, run_session, OutputFormat, SessionOptions, StopReason};
use serde_json as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;
use tracing as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "me88-pc",
    version,
    about = "Powers on an me88 machine with a binary-text EPROM image and clocks it."
)]
struct Args {
    /// EPROM program image (one 8-digit binary byte per line).
    #[arg(value_name = "PROGRAM")]
    program: PathBuf,

    /// Interrupt-handler image placed at 0x00400; every vector points at it.
    #[arg(long, value_name = "IMAGE")]
    interrupts: Option<PathBuf>,

    /// Wait for Enter before every clock; `q` quits.
    #[arg(short = 'd', long, visible_short_alias = 'D')]
    debug: bool,

    /// Stop after this many clocks.
    #[arg(long, value_name = "N")]
    max_clocks: Option<u64>,

    /// Seed for bytes returned by undefined reads.
    #[arg(long, default_value_t = DEFAULT_NOISE_SEED)]
    seed: u64,

    /// Number of bus cycles kept in the status log.
    #[arg(long, default_value_t = DEFAULT_BUS_LOG_CAPACITY)]
    log_capacity: usize,

    /// Frame format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print only the final frame.
    #[arg(short, long)]
    quiet: bool,

    /// Raise the default log level (repeat for more).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            program: self.program.clone(),
            interrupts: self.interrupts.clone(),
            debug: self.debug,
            max_clocks: self.max_clocks,
            quiet: self.quiet,
            format: self.format,
            config: MachineConfig {
                noise_seed: self.seed,
                bus_log_capacity: self.log_capacity,
                ..MachineConfig::default()
            },
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = args.session_options();
    let mut machine = match power_on(&options) {
        Ok(machine) => machine,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    match run_session(&mut machine, &options, stdin.lock(), io::stdout().lock()) {
        Ok(summary) => {
            let verb = match summary.reason {
                StopReason::Halted => "halted",
                StopReason::ClockLimit => "stopped at clock limit",
                StopReason::Quit => "quit",
            };
            eprintln!("{verb} after {} clocks", summary.clocks);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Args;
    use me88_pc::OutputFormat;

    #[test]
    fn parses_program_and_flags() {
        let args = Args::try_parse_from([
            "me88-pc",
            "eprom.txt",
            "--interrupts",
            "int.txt",
            "-D",
            "--max-clocks",
            "100",
            "--seed",
            "7",
            "--format",
            "json",
            "-vv",
        ])
        .expect("valid arguments");

        assert!(args.debug);
        assert_eq!(args.max_clocks, Some(100));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.format, OutputFormat::Json);

        let options = args.session_options();
        assert_eq!(options.config.noise_seed, 7);
        assert_eq!(options.interrupts.as_deref(), Some(std::path::Path::new("int.txt")));
    }

    #[test]
    fn program_is_required() {
        assert!(Args::try_parse_from(["me88-pc"]).is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Args::try_parse_from(["me88-pc", "p.txt", "--format", "xml"]).is_err());
    }
}
