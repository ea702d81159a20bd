//! Adder and adder/subtractor command implementations.

use anyhow::Result;
use console::style;

use qlab_algo::{ArithmeticMode, ControlledAdderSubtractor, RippleCarryAdder};

use super::common::{print_histogram, print_program_header, simulator};
use crate::config::QlabConfig;

/// Add `a` and `b` with the ripple-carry adder.
pub fn execute_adder(config: &QlabConfig, a: u64, b: u64) -> Result<()> {
    let sim = simulator(config);
    let adder = RippleCarryAdder::new(config.adder.digits)?;
    let program = adder.program(a, b)?;
    print_program_header(&program);

    let outcome = adder.evaluate(&sim, a, b)?;
    println!(
        "  {} + {} = {} (mod 2^{}){}",
        a,
        b,
        style(outcome.sum).yellow().bold(),
        adder.digits(),
        if outcome.carry_out {
            style(" [carry out]").red().to_string()
        } else {
            String::new()
        }
    );

    let counts = sim.run_shots(&program, config.simulation.shots, config.simulation.seed)?;
    print_histogram(&counts);
    Ok(())
}

/// Add or subtract `a` and `b` with the controlled adder/subtractor.
pub fn execute_addsub(config: &QlabConfig, a: u64, b: u64, subtract: bool) -> Result<()> {
    let sim = simulator(config);
    let unit = ControlledAdderSubtractor::new(config.adder.digits)?;
    let mode = if subtract {
        ArithmeticMode::Subtract
    } else {
        ArithmeticMode::Add
    };
    let program = unit.program(a, b, mode)?;
    print_program_header(&program);

    let result = unit.evaluate(&sim, a, b, mode)?;
    let op = if subtract { '-' } else { '+' };
    println!(
        "  {} {} {} = {} (mod 2^{})",
        a,
        op,
        b,
        style(result).yellow().bold(),
        unit.digits()
    );

    let counts = sim.run_shots(&program, config.simulation.shots, config.simulation.seed)?;
    print_histogram(&counts);
    Ok(())
}
