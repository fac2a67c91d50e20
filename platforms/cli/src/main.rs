use clap::Parser;
use std::path::PathBuf;
use std::process;
use tape_machine::{Machine, MachineError, MachineLoader, ProgramCatalog, RunOutcome};

/// Runs a Turing machine described by a JSON configuration on one of its tapes.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tape-cli demos/binary-increment.json
  tape-cli --demo binary-increment --index 1
  RUST_LOG=tape_machine=trace tape-cli demos/invert-bits.json -i 1")]
struct Cli {
    /// Path of the machine configuration file
    #[clap(required_unless_present_any = ["demo", "list"])]
    path: Option<PathBuf>,

    /// Index of the tape to run
    #[clap(short, long, default_value_t = 0)]
    index: usize,

    /// Run an embedded demo program instead of a file
    #[clap(short, long, conflicts_with = "path")]
    demo: Option<String>,

    /// List the embedded demo programs
    #[clap(short, long)]
    list: bool,

    /// Stop after this many steps instead of running until the machine halts
    #[clap(short, long)]
    max_steps: Option<usize>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list {
        for name in ProgramCatalog::names() {
            println!("{}", name);
        }
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), MachineError> {
    let mut machine = load(cli)?;

    let halted = match cli.max_steps {
        Some(limit) => matches!(
            machine.run_for(cli.index, limit)?,
            RunOutcome::Halted { .. }
        ),
        None => {
            machine.run(cli.index)?;
            true
        }
    };

    if !halted {
        println!("Step limit reached.");
    }
    println!("State: {}", machine.state());
    println!("{}", machine.tape(cli.index)?);

    Ok(())
}

fn load(cli: &Cli) -> Result<Machine, MachineError> {
    match (&cli.demo, &cli.path) {
        (Some(name), _) => ProgramCatalog::machine(name),
        (None, Some(path)) => MachineLoader::load_machine(path),
        (None, None) => Err(MachineError::File("no configuration given".to_string())),
    }
}
