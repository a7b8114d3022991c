//! qec Command-Line Interface
//!
//! Builds syndrome-extraction circuits for surface-code and heavy-hex
//! lattices, and logical-qubit programs from YAML experiment files.
//!
//! ```text
//! qec cycle --lattice square --width 5 --height 5 --rounds 3 --format qasm
//! qec cycle --lattice heavy-hex --distance 3 --format json -o hex.json
//! qec run -i braid.yaml --format summary
//! qec lattice --lattice heavy-hex --distance 5
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{cycle, lattice, run, version};

/// qec - surface-code syndrome circuits and defect-based logical qubits
#[derive(Parser)]
#[command(name = "qec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build syndrome-extraction rounds for a lattice
    Cycle {
        /// Lattice geometry (square, heavy-hex)
        #[arg(short, long, default_value = "square")]
        lattice: String,

        /// Square lattice width
        #[arg(long, default_value = "5")]
        width: usize,

        /// Square lattice height
        #[arg(long, default_value = "5")]
        height: usize,

        /// Heavy-hex code distance
        #[arg(short, long, default_value = "3")]
        distance: usize,

        /// Number of syndrome rounds
        #[arg(short, long, default_value = "1")]
        rounds: usize,

        /// Output format (summary, qasm, json)
        #[arg(short, long, default_value = "summary")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Build the circuit described by a YAML experiment file
    Run {
        /// Experiment file (YAML)
        #[arg(short, long)]
        input: String,

        /// Output format (summary, qasm, json)
        #[arg(short, long, default_value = "summary")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show node roles and layout of a lattice
    Lattice {
        /// Lattice geometry (square, heavy-hex)
        #[arg(short, long, default_value = "square")]
        lattice: String,

        /// Square lattice width
        #[arg(long, default_value = "5")]
        width: usize,

        /// Square lattice height
        #[arg(long, default_value = "5")]
        height: usize,

        /// Heavy-hex code distance
        #[arg(short, long, default_value = "3")]
        distance: usize,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Cycle {
            lattice,
            width,
            height,
            distance,
            rounds,
            format,
            output,
        } => cycle::execute(
            &lattice,
            width,
            height,
            distance,
            rounds,
            &format,
            output.as_deref(),
        ),

        Commands::Run {
            input,
            format,
            output,
        } => run::execute(&input, &format, output.as_deref()),

        Commands::Lattice {
            lattice,
            width,
            height,
            distance,
        } => lattice::execute(&lattice, width, height, distance),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
