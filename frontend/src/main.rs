use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use hyper9_core::disasm::Operation;
use hyper9_core::machine::{Hyper9, RunController, RunOptions};

mod config;
mod report;

use config::{Config, parse_address};
use report::{Output, RunSummary};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Turbo9 instruction-set simulator and disassembler
#[derive(Parser, Debug)]
#[command(name = "hyper9", version, about, long_about = None)]
struct Cli {
    /// Settings file (default: <config dir>/hyper9/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// More logging: -v info, -vv debug, -vvv trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an image until a breakpoint, the step limit, or a fault
    Run {
        image: PathBuf,
        /// Stop after this many instructions
        #[arg(long)]
        steps: Option<u64>,
        /// Stop when PC reaches this hex address (repeatable)
        #[arg(long = "break", value_name = "HEX", value_parser = parse_address)]
        breakpoints: Vec<u16>,
        /// Print a trace line per instruction
        #[arg(long)]
        trace: bool,
        /// Drive the interval timer from executed cycles
        #[arg(long)]
        timer: bool,
    },
    /// Execute instructions one at a time and list them
    Step {
        image: PathBuf,
        #[arg(long, default_value_t = 1)]
        count: u64,
    },
    /// Disassemble without executing
    Disasm {
        image: PathBuf,
        /// Start address (default: the reset vector target)
        #[arg(long, value_name = "HEX", value_parser = parse_address)]
        addr: Option<u16>,
        /// Instructions to list (default: the configured window)
        #[arg(long)]
        count: Option<usize>,
    },
    /// Hex dump of memory after loading
    Dump {
        image: PathBuf,
        #[arg(long, value_name = "HEX", value_parser = parse_address)]
        addr: Option<u16>,
        #[arg(long, default_value_t = 256)]
        len: usize,
    },
    /// Register listing, optionally after stepping
    Registers {
        image: PathBuf,
        #[arg(long, default_value_t = 0)]
        steps: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.verbose, config.log_level.as_deref());

    let output = Output { json: cli.json };
    match execute(cli.command, &config, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, config_level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    let level = match verbose {
        0 => config_level.and_then(|level| level.parse::<log::LevelFilter>().ok()),
        1 => Some(log::LevelFilter::Info),
        2 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    };
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

fn load_machine(image: &Path, config: &Config) -> Result<Hyper9, Box<dyn std::error::Error>> {
    let mut machine = Hyper9::new(config.cycles_per_tick);
    machine
        .load_file(image)
        .map_err(|e| format!("{}: {e}", image.display()))?;
    Ok(machine)
}

fn execute(command: Command, config: &Config, output: Output) -> CliResult {
    match command {
        Command::Run {
            image,
            steps,
            breakpoints,
            trace,
            timer,
        } => {
            let mut machine = load_machine(&image, config)?;
            machine.set_timer_ticking(timer);
            configure_trace(&mut machine, trace || config.trace);
            let mut all_breakpoints = config.breakpoint_addresses()?;
            all_breakpoints.extend(breakpoints);
            run(machine, steps, all_breakpoints, config.echo_console && !output.json, output)
        }
        Command::Step { image, count } => {
            let mut machine = load_machine(&image, config)?;
            configure_trace(&mut machine, false);
            let mut lines = Vec::new();
            for _ in 0..count {
                match machine.step() {
                    Ok(Some(op)) => lines.push(op.as_code()),
                    Ok(None) => {}
                    Err(e) => {
                        output.lines(&lines);
                        return Err(format!("at ${:04X}: {e}", machine.pc()).into());
                    }
                }
            }
            output.lines(&lines);
            Ok(())
        }
        Command::Disasm { image, addr, count } => {
            let machine = load_machine(&image, config)?;
            let disasm = machine.disassembler();
            let start = addr.unwrap_or(disasm.cpu().pc);
            let lines: Vec<String> = disasm
                .disassemble_range(start, count.unwrap_or(config.window))
                .iter()
                .map(Operation::as_code)
                .collect();
            output.lines(&lines);
            Ok(())
        }
        Command::Dump { image, addr, len } => {
            let machine = load_machine(&image, config)?;
            let disasm = machine.disassembler();
            let start = addr.unwrap_or(disasm.cpu().pc);
            output.text(&disasm.dump_memory(start, len));
            Ok(())
        }
        Command::Registers { image, steps } => {
            let mut machine = load_machine(&image, config)?;
            configure_trace(&mut machine, false);
            let outcome = machine.run(Some(steps), &[]);
            log::info!("{}", report::describe(outcome.reason));
            output.text(&machine.disassembler().registers());
            Ok(())
        }
    }
}

fn configure_trace(machine: &mut Hyper9, trace: bool) {
    let disasm = machine.disassembler_mut();
    if trace {
        disasm.set_trace(Some(Box::new(|line: &str| println!("{line}"))));
        disasm.set_logging(true);
    } else {
        disasm.set_trace(None);
        disasm.set_logging(log::log_enabled!(log::Level::Trace));
    }
}

fn run(
    machine: Hyper9,
    limit: Option<u64>,
    breakpoints: Vec<u16>,
    echo_console: bool,
    output: Output,
) -> CliResult {
    let console = machine.console().clone();
    let handle = RunController::spawn(machine, RunOptions { limit, breakpoints });
    while !handle.is_finished() {
        std::thread::sleep(Duration::from_millis(20));
        if echo_console {
            print!("{}", console.take_output());
            let _ = std::io::stdout().flush();
        }
    }
    let report = handle.join().map_err(|_| "run worker panicked")?;
    if echo_console {
        println!("{}", console.take_output());
    }
    output.run_summary(&RunSummary::from_report(&report));
    Ok(())
}
