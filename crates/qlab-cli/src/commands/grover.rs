//! Grover command implementation.

use anyhow::Result;
use console::style;

use qlab_algo::{BoolExpr, GroverSearch, Oracle, reference_predicate};

use super::common::{print_histogram, print_program_header, simulator};
use crate::config::QlabConfig;

/// Predicate matching exactly `assignment` over `num_inputs` variables.
pub fn single_assignment(assignment: u64, num_inputs: u32) -> BoolExpr {
    BoolExpr::and((0..num_inputs).map(|i| {
        if (assignment >> i) & 1 == 1 {
            BoolExpr::var(i)
        } else {
            BoolExpr::not(BoolExpr::var(i))
        }
    }))
}

/// Build the search for a single marked assignment, or the reference predicate.
pub fn build_search(
    marked: Option<u64>,
    inputs: u32,
    iterations: Option<u32>,
) -> Result<GroverSearch> {
    let oracle = match marked {
        Some(assignment) => {
            if inputs < 64 && assignment >> inputs != 0 {
                anyhow::bail!("assignment {assignment} does not fit in {inputs} inputs");
            }
            Oracle::compile(single_assignment(assignment, inputs), inputs)?
        }
        None => Oracle::compile(reference_predicate(), 3)?,
    };
    let search = GroverSearch::new(oracle);
    Ok(match iterations {
        Some(k) => search.with_iterations(k),
        None => search,
    })
}

/// Run Grover search and report the amplified assignments.
pub fn execute(
    config: &QlabConfig,
    marked: Option<u64>,
    inputs: u32,
    iterations: Option<u32>,
) -> Result<()> {
    let sim = simulator(config);
    let search = build_search(marked, inputs, iterations)?;
    sim.check_budget(search.oracle().num_qubits())?;
    let program = search.program()?;
    print_program_header(&program);
    println!(
        "  predicate {} over {} inputs, {} iterations",
        style(search.oracle().expr()).cyan(),
        search.oracle().num_inputs(),
        search.iterations()
    );

    let report = search.run(&sim, config.simulation.shots, config.simulation.seed)?;
    println!(
        "  marked {:?}, success probability {}",
        report.marked,
        style(format!("{:.4}", report.success_probability)).yellow().bold()
    );
    print_histogram(&report.histogram);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_assignment_marks_one() {
        let oracle = Oracle::compile(single_assignment(6, 3), 3).unwrap();
        assert_eq!(oracle.marked_assignments(), vec![6]);
    }

    #[test]
    fn test_build_search_defaults_to_reference() {
        let search = build_search(None, 3, None).unwrap();
        assert_eq!(search.oracle().marked_assignments(), vec![3, 4, 5, 7]);
        assert_eq!(search.iterations(), 2);
    }

    #[test]
    fn test_build_search_rejects_wide_assignment() {
        assert!(build_search(Some(8), 3, None).is_err());
        assert_eq!(build_search(Some(2), 2, Some(4)).unwrap().iterations(), 4);
    }
}
