//! Stacker - CLI
//!
//! Command-line driver: loads a program file, runs it, reports failures.

use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stacker_core::{BytecodeLoader, Program, StepOutcome, VirtualMachine, VmConfig};

mod dump;

/// Run a Stacker program.
///
/// Program output goes to stdout; diagnostics, timing and debug dumps go to stderr.
///
/// EXAMPLES:
///     stacker                     Run ./test.bc
///     stacker loop.bc --time      Run and report elapsed time
///     stacker loop.bc --debug     Dump machine state before every instruction
///
/// ENVIRONMENT VARIABLES:
///     RUST_LOG            Log filter (e.g. stacker_core=trace)
///     STACKER_MAX_STACK   Stack depth cap (unbounded if unset)
///     STACKER_MAX_STEPS   Maximum executed instructions
#[derive(Parser, Debug)]
#[command(name = "stacker")]
#[command(version)]
struct Cli {
    /// Path to the program file
    #[arg(default_value = "./test.bc")]
    file: PathBuf,

    /// Print elapsed wall-clock time after the run completes
    #[arg(long)]
    time: bool,

    /// Dump stack, heap and the next instruction before each step
    #[arg(long)]
    debug: bool,

    /// Parse the program without running it
    #[arg(long, conflicts_with = "debug")]
    check: bool,

    /// Cap the stack depth (unbounded by default)
    #[arg(long, env = "STACKER_MAX_STACK")]
    max_stack: Option<usize>,

    /// Stop after this many instructions
    #[arg(long, env = "STACKER_MAX_STEPS")]
    max_steps: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "stacker_core=debug,stacker=debug",
        _ => "stacker_core=trace,stacker=trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let program = BytecodeLoader::load_file(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;

    if cli.check {
        println!("{}: {} instructions", cli.file.display(), program.len());
        return Ok(());
    }

    let config = VmConfig::new()
        .with_max_stack_size(cli.max_stack)
        .with_max_steps(cli.max_steps);
    debug!(?config, "starting vm");

    let start = Instant::now();
    execute(program, config, cli.debug)
        .with_context(|| format!("runtime error in {}", cli.file.display()))?;
    let elapsed = start.elapsed();

    if cli.time {
        eprintln!("elapsed: {:.6}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn execute(program: Program, config: VmConfig, debug: bool) -> Result<()> {
    let mut vm = VirtualMachine::new(config, program);

    if !debug {
        return Ok(vm.execute()?);
    }

    let stderr = io::stderr();
    let mut err = stderr.lock();
    loop {
        dump::write_state(&mut err, &vm)?;
        if vm.step()? == StepOutcome::Halted {
            return Ok(());
        }
    }
}
