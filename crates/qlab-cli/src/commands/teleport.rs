//! Teleportation command implementation.

use anyhow::Result;
use console::style;

use qlab_algo::Teleportation;

use super::common::{print_histogram, print_program_header, simulator};
use crate::config::QlabConfig;

/// Teleport `α|0⟩ + β|1⟩` and compare the receiver's statistics.
pub fn execute(config: &QlabConfig, alpha: f64, beta: f64) -> Result<()> {
    let sim = simulator(config);
    let teleport = Teleportation::new(alpha, beta)?;
    let program = teleport.program()?;
    print_program_header(&program);

    let counts = sim.run_shots(&program, config.simulation.shots, config.simulation.seed)?;
    print_histogram(&counts);

    let [p0, p1] = Teleportation::receiver_marginal(&counts);
    let [e0, e1] = teleport.expected_marginal();
    println!(
        "\n  receiver: P(0) = {} (expected {:.4}), P(1) = {} (expected {:.4})",
        style(format!("{p0:.4}")).yellow(),
        e0,
        style(format!("{p1:.4}")).yellow(),
        e1
    );
    Ok(())
}
