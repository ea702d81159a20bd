//! qlab Command-Line Interface
//!
//! Builds the qlab example programs, simulates them on the local
//! statevector simulator and prints their measurement histograms.
//!
//! ```text
//! qlab bell
//! qlab adder 2 3 --digits 3
//! qlab addsub 5 2 --subtract
//! qlab grover --marked 5 --inputs 3
//! qlab teleport --alpha 0.6 --beta 0.8
//! qlab dump grover --output grover.json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::dump::DumpTarget;
use commands::{arithmetic, bell, dump, grover, teleport};
use config::QlabConfig;

/// qlab - statevector experiments with composable quantum circuits
#[derive(Parser)]
#[command(name = "qlab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "QLAB_CONFIG")]
    config: Option<PathBuf>,

    /// Number of shots (overrides configuration)
    #[arg(short, long, global = true)]
    shots: Option<u32>,

    /// Sampling seed (overrides configuration)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Entangle each of the four basis inputs into a Bell pair
    Bell,

    /// Add two integers with the ripple-carry adder
    Adder {
        /// First operand
        a: u64,

        /// Second operand
        b: u64,

        /// Operand width (overrides configuration)
        #[arg(short, long)]
        digits: Option<u32>,
    },

    /// Add or subtract two integers with the controlled adder/subtractor
    Addsub {
        /// First operand (minuend when subtracting)
        a: u64,

        /// Second operand
        b: u64,

        /// Assert the control qubit to subtract
        #[arg(long)]
        subtract: bool,

        /// Operand width (overrides configuration)
        #[arg(short, long)]
        digits: Option<u32>,
    },

    /// Grover search over a boolean oracle
    Grover {
        /// Mark only this assignment (reference predicate when omitted)
        #[arg(short, long)]
        marked: Option<u64>,

        /// Number of input qubits for --marked
        #[arg(short, long, default_value = "3")]
        inputs: u32,

        /// Oracle/diffusion rounds (defaults to floor(sqrt(2^n)))
        #[arg(long)]
        iterations: Option<u32>,
    },

    /// Teleport a real single-qubit state
    Teleport {
        /// Amplitude of |0⟩
        #[arg(long, default_value_t = std::f64::consts::FRAC_1_SQRT_2, allow_negative_numbers = true)]
        alpha: f64,

        /// Amplitude of |1⟩
        #[arg(long, default_value_t = std::f64::consts::FRAC_1_SQRT_2, allow_negative_numbers = true)]
        beta: f64,
    },

    /// Export a program as JSON
    Dump {
        /// Program to export
        #[arg(value_enum)]
        target: DumpTarget,

        /// First operand for arithmetic targets
        #[arg(long, default_value = "1")]
        a: u64,

        /// Second operand for arithmetic targets
        #[arg(long, default_value = "1")]
        b: u64,

        /// Output file (configured export directory or stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Resolve configuration: file and environment, then command-line flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<QlabConfig> {
    let mut config = QlabConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(shots) = cli.shots {
        config.simulation.shots = shots;
    }
    if cli.seed.is_some() {
        config.simulation.seed = cli.seed;
    }
    match &cli.command {
        Commands::Adder {
            digits: Some(d), ..
        }
        | Commands::Addsub {
            digits: Some(d), ..
        } => config.adder.digits = *d,
        _ => {}
    }
    config.validate()?;
    debug!("Resolved configuration: {config:?}");
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Bell => bell::execute(&config),

        Commands::Adder { a, b, .. } => arithmetic::execute_adder(&config, a, b),

        Commands::Addsub { a, b, subtract, .. } => {
            arithmetic::execute_addsub(&config, a, b, subtract)
        }

        Commands::Grover {
            marked,
            inputs,
            iterations,
        } => grover::execute(&config, marked, inputs, iterations),

        Commands::Teleport { alpha, beta } => teleport::execute(&config, alpha, beta),

        Commands::Dump {
            target,
            a,
            b,
            output,
        } => dump::execute(&config, target, a, b, output.as_deref()),
    }
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
        .init();

    // Handle errors
    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
