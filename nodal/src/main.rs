use clap::Parser as ClapParser;
use std::{
    io::{self, BufWriter},
    path::PathBuf,
    process::ExitCode,
};

use env_logger::Env;
use nodal::{NodeState, Runtime, Scheduler, SchedulerConfig, load_dir};

#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Nodes to wake before the main loop
    #[arg(help = "Names of the nodes to seed, in order")]
    entries: Vec<String>,

    /// Directory holding the `.node` files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Keep running the healthy nodes after one faults
    #[arg(long)]
    keep_going: bool,

    /// Stop after this many scheduler rounds
    #[arg(long, value_name = "N")]
    max_rounds: Option<u64>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut runtime = Runtime::new(BufWriter::new(io::stdout()));
    if let Err(err) = load_dir(&mut runtime, &cli.dir) {
        eprintln!("Error loading {}: {}", cli.dir.display(), err);
        return ExitCode::FAILURE;
    }

    for entry in &cli.entries {
        if let Err(err) = runtime.seed(entry) {
            eprintln!("Skipping entry: {}", err);
        }
    }

    let mut scheduler = Scheduler::new(SchedulerConfig {
        halt_on_fault: !cli.keep_going,
        max_rounds: cli.max_rounds,
    });
    let report = scheduler.run(&mut runtime);

    if let Err(err) = runtime.flush() {
        eprintln!("Error flushing output: {}", err);
    }

    for node in &report.nodes {
        match &node.state {
            NodeState::Paused(reason) => eprintln!("{} paused: {}", node.name, reason),
            NodeState::Faulted(fault) => eprintln!("{} aborted: {}", node.name, fault),
            NodeState::Runnable => {}
        }
    }

    if report.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
