use clap::{ArgAction, Parser};
use lc3_vm::emulator::{Config, Emulator, image};
use lc3_vm::errors::ExecutionError;
use lc3_vm::hardware::keyboard::{ChannelInputProvider, KeyboardInputProvider, TerminalInputProvider};
use lc3_vm::terminal;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_LOAD_FAILURE: u8 = 1;
const EXIT_EXECUTION_FAILURE: u8 = 3;
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "lc3-vm", version)]
#[command(about = "Runs LC-3 program images", long_about = None)]
struct Args {
    /// Program images, big-endian words with the origin first. The first image's origin is
    /// where execution starts.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// More log output on stderr, repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Do not print a notice when the program halts
    #[arg(long, action = ArgAction::SetTrue)]
    no_halt_notice: bool,
}

fn init_logging(verbose: u8) {
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

fn run(emu: &mut Emulator) -> Result<(), ExecutionError> {
    if io::stdin().is_terminal() {
        let _lock = terminal::set_terminal_raw()?;
        let mut stdout = terminal::RawModeWriter::new(io::stdout().lock());
        emu.execute(&mut stdout)
    } else {
        let mut stdout = io::stdout().lock();
        emu.execute(&mut stdout)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let keyboard: Box<dyn KeyboardInputProvider> = if io::stdin().is_terminal() {
        Box::new(TerminalInputProvider::new())
    } else {
        Box::new(ChannelInputProvider::spawn_stdin_reader())
    };
    let mut config = Config::default();
    if args.no_halt_notice {
        config.halt_notice = None;
    }
    let mut emu = Emulator::new(keyboard, config);
    for path in &args.images {
        if let Err(e) = image::read_image_file(path).and_then(|program| emu.load_program(&program)) {
            eprintln!("failed to load image: {e}");
            return ExitCode::from(EXIT_LOAD_FAILURE);
        }
    }

    // raw mode is released before anything is reported
    let result = run(&mut emu);
    let _ = io::stdout().flush();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(ExecutionError::Interrupted) => {
            eprintln!();
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(EXIT_EXECUTION_FAILURE)
        }
    }
}
