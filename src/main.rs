//! Command-line driver for the simulator.
//!
//! Reads a memory image of octal words from standard input, executes it,
//! and prints the execution (and cache) statistics. `-t` adds a one-line
//! trace per instruction; `-v` adds operand values, condition codes, and a
//! register dump to each. Exits 0 on a clean HALT and 1 on any fatal
//! error.

use std::io::Read as _;
use std::process::ExitCode;

use clap::Parser;

use pdp11_sim::err::{report, Error as _};
use pdp11_sim::parse::parse_image;
use pdp11_sim::sim::{SimErr, SimFlags, Simulator};
use pdp11_sim::trace;

/// A PDP-11 subset simulator with a write-back data-cache model.
///
/// Reads a memory image from standard input: one octal word per line, the
/// Nth line populating byte address 2*N. Execution starts at byte address
/// 0 and runs until a HALT.
#[derive(Parser, Debug)]
#[command(name = "pdp11-sim", version)]
struct Args {
    /// Emit a one-line instruction trace per executed opcode
    #[arg(short = 't')]
    trace: bool,

    /// Emit a verbose trace: operand values, NZVC bits, and a register
    /// dump after every instruction
    #[arg(short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    // Everything fatal exits 1, including bad flags; clap's own
    // convention of exiting 2 is overridden here.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.use_stderr() {
                true => ExitCode::FAILURE,
                false => ExitCode::SUCCESS, // --help and --version
            };
        }
    };

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("pdp11-sim: cannot read stdin: {e}");
        return ExitCode::FAILURE;
    }

    if args.verbose {
        println!("Reading words in octal from stdin:");
    }
    let words = match parse_image(&input) {
        Ok(words) => words,
        Err(e) => {
            report(&e);
            return ExitCode::FAILURE;
        }
    };
    if args.verbose {
        for word in &words {
            println!("{word:07o}");
        }
    }

    let mut sim = Simulator::new(SimFlags::default());
    sim.load_image(&words);

    if args.verbose {
        println!("instruction trace:");
    }
    let result = match args.trace || args.verbose {
        true => run_traced(&mut sim, args.verbose),
        false => sim.run(),
    };
    if let Err(e) = result {
        eprintln!("pdp11-sim: at {:07o}: {e}", sim.prefetch_pc());
        if let Some(help) = e.help() {
            eprintln!("help: {help}");
        }
        return ExitCode::FAILURE;
    }

    println!("{}", trace::exec_stats(&sim.stats));
    println!("{}", trace::memory_dump(&sim.mem));
    if let Some(stats) = sim.cache_stats() {
        println!("{}", trace::cache_stats(stats));
    }
    ExitCode::SUCCESS
}

/// The fetch-execute loop with per-instruction trace output.
fn run_traced(sim: &mut Simulator, verbose: bool) -> Result<(), SimErr> {
    while !sim.halted() {
        let step = sim.step()?;
        println!("{}", trace::trace_line(&step));
        if verbose {
            println!("{}", trace::verbose_detail(sim, &step));
        }
    }
    Ok(())
}
