//! Export command implementation.

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

use qlab_algo::bell::bell_program;
use qlab_algo::{ArithmeticMode, ControlledAdderSubtractor, RippleCarryAdder, Teleportation};
use qlab_ir::Program;

use super::grover::build_search;
use crate::config::QlabConfig;

/// Program to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpTarget {
    /// Bell pair from |00⟩
    Bell,
    /// Ripple-carry adder
    Adder,
    /// Adder/subtractor in subtract mode
    Addsub,
    /// Grover search over the reference predicate
    Grover,
    /// Teleportation of an equal superposition
    Teleport,
}

impl DumpTarget {
    fn file_stem(self) -> &'static str {
        match self {
            DumpTarget::Bell => "bell",
            DumpTarget::Adder => "adder",
            DumpTarget::Addsub => "addsub",
            DumpTarget::Grover => "grover",
            DumpTarget::Teleport => "teleport",
        }
    }
}

/// Build the program a target exports; `a` and `b` feed the arithmetic targets.
pub fn build_program(target: DumpTarget, config: &QlabConfig, a: u64, b: u64) -> Result<Program> {
    let program = match target {
        DumpTarget::Bell => bell_program(false, false)?,
        DumpTarget::Adder => RippleCarryAdder::new(config.adder.digits)?.program(a, b)?,
        DumpTarget::Addsub => ControlledAdderSubtractor::new(config.adder.digits)?.program(
            a,
            b,
            ArithmeticMode::Subtract,
        )?,
        DumpTarget::Grover => build_search(None, 3, None)?.program()?,
        DumpTarget::Teleport => {
            let amp = std::f64::consts::FRAC_1_SQRT_2;
            Teleportation::new(amp, amp)?.program()?
        }
    };
    Ok(program)
}

/// Serialize a program to JSON and write it out.
///
/// An explicit `output` wins; otherwise the configured export directory is
/// used, and without either the JSON goes to stdout.
pub fn execute(
    config: &QlabConfig,
    target: DumpTarget,
    a: u64,
    b: u64,
    output: Option<&Path>,
) -> Result<()> {
    let program = build_program(target, config, a, b)?;
    let json = program.to_json()?;

    let path: Option<PathBuf> = output.map(Path::to_path_buf).or_else(|| {
        config
            .export
            .destination
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", target.file_stem())))
    });

    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create export directory: {}", parent.display())
                })?;
            }
            fs::write(&path, json)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            println!(
                "{} Wrote {} to {}",
                style("✓").green().bold(),
                style(program.circuit().name()).cyan(),
                style(path.display()).green()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
