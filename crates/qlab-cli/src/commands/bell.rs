//! Bell command implementation.

use anyhow::Result;

use qlab_algo::bell::all_bell_programs;

use super::common::{print_histogram, print_program_header, simulator};
use crate::config::QlabConfig;

/// Run the Bell pair for each of the four basis inputs.
pub fn execute(config: &QlabConfig) -> Result<()> {
    let sim = simulator(config);
    for program in all_bell_programs()? {
        print_program_header(&program);
        let counts = sim.run_shots(&program, config.simulation.shots, config.simulation.seed)?;
        print_histogram(&counts);
        println!();
    }
    Ok(())
}
