//! Grover search over a compiled boolean oracle.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use qlab_ir::{Circuit, Program};
use qlab_sim::{OutcomeHistogram, StatevectorSimulator};

use crate::error::AlgoResult;
use crate::oracle::Oracle;

/// Outcome of a Grover run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroverReport {
    /// Measured input assignments.
    pub histogram: OutcomeHistogram,
    /// Exact probability of measuring a satisfying assignment.
    pub success_probability: f64,
    /// Oracle/diffusion rounds applied.
    pub iterations: u32,
    /// Satisfying assignments of the predicate.
    pub marked: Vec<u64>,
}

/// Grover amplitude amplification driven by an [`Oracle`].
///
/// The workspace qubit is prepared in |−⟩ once and stays there, so both the
/// oracle's workspace flip and the diffusion's multi-controlled X act as
/// phase flips.
#[derive(Debug, Clone)]
pub struct GroverSearch {
    oracle: Oracle,
    iterations: Option<u32>,
}

impl GroverSearch {
    /// Search with the default `⌊√(2ⁿ)⌋` rounds.
    pub fn new(oracle: Oracle) -> Self {
        Self {
            oracle,
            iterations: None,
        }
    }

    /// Override the number of rounds.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// The oracle being amplified.
    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    /// Rounds that [`GroverSearch::circuit`] will apply.
    pub fn iterations(&self) -> u32 {
        self.iterations.unwrap_or_else(|| {
            let rounds = (1u64 << self.oracle.num_inputs()).isqrt();
            u32::try_from(rounds).unwrap_or(u32::MAX)
        })
    }

    /// Uniform superposition on the inputs, |−⟩ on the workspace.
    pub fn initialization(&self) -> AlgoResult<Circuit> {
        let workspace = self.oracle.workspace();
        let mut circuit = Circuit::with_size("grover_init", self.oracle.num_qubits());
        circuit.x(workspace)?.h(workspace)?;
        for q in self.oracle.inputs() {
            circuit.h(q)?;
        }
        Ok(circuit)
    }

    /// Reflection about the uniform superposition of the inputs.
    pub fn diffusion(&self) -> AlgoResult<Circuit> {
        let inputs = self.oracle.inputs();
        let mut circuit = Circuit::with_size("diffusion", self.oracle.num_qubits());
        for &q in &inputs {
            circuit.h(q)?.x(q)?;
        }
        circuit.mcx(&inputs, self.oracle.workspace())?;
        for &q in &inputs {
            circuit.x(q)?.h(q)?;
        }
        Ok(circuit)
    }

    /// Initialization followed by the oracle/diffusion rounds.
    pub fn circuit(&self) -> AlgoResult<Circuit> {
        let mut round = self.oracle.circuit().clone().with_name("grover_round");
        round.extend(&self.diffusion()?)?;

        let mut circuit = self.initialization()?.with_name("grover");
        circuit.barrier_all()?;
        circuit.extend(&round.repeat(self.iterations() as usize)?)?;
        Ok(circuit)
    }

    /// The search circuit with input `i` measured into classical bit `i`.
    pub fn program(&self) -> AlgoResult<Program> {
        let mut program = Program::new(self.circuit()?);
        let creg = program.add_creg("inputs", self.oracle.num_inputs());
        for (q, c) in self.oracle.inputs().into_iter().zip(creg.iter()) {
            program.measure(q, c)?;
        }
        Ok(program)
    }

    /// Run the search and sample `shots` input assignments.
    #[instrument(skip(self, sim))]
    pub fn run(
        &self,
        sim: &StatevectorSimulator,
        shots: u32,
        seed: Option<u64>,
    ) -> AlgoResult<GroverReport> {
        // The rounds grow with 2^(n/2); refuse before building them.
        sim.check_budget(self.oracle.num_qubits())?;
        let program = self.program()?;
        let state = sim.run_statevector(&program)?;
        let histogram = sim.sample(&state, &program, shots, seed)?;

        let marked = self.oracle.marked_assignments();
        let input_mask = (1usize << self.oracle.num_inputs()) - 1;
        let success_probability: f64 = state
            .probabilities()
            .iter()
            .enumerate()
            .filter(|&(i, _)| marked.contains(&((i & input_mask) as u64)))
            .map(|(_, p)| p)
            .sum();

        debug!(
            "Grover: {} marked of {}, success probability {:.4}",
            marked.len(),
            input_mask + 1,
            success_probability
        );
        Ok(GroverReport {
            histogram,
            success_probability,
            iterations: self.iterations(),
            marked,
        })
    }
}

/// Bitstring key for an input assignment, input 0 rightmost.
pub fn assignment_key(assignment: u64, num_inputs: u32) -> String {
    format!("{:0width$b}", assignment, width = num_inputs as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlgoError;
    use crate::oracle::{BoolExpr, reference_predicate};
    use qlab_sim::SimError;

    fn single_marked() -> Oracle {
        // Marks only q0=1, q1=0, q2=1 (assignment 5).
        let expr = BoolExpr::and([
            BoolExpr::var(0),
            BoolExpr::not(BoolExpr::var(1)),
            BoolExpr::var(2),
        ]);
        Oracle::compile(expr, 3).unwrap()
    }

    #[test]
    fn test_default_iterations() {
        assert_eq!(GroverSearch::new(single_marked()).iterations(), 2);
        let oracle = Oracle::compile(BoolExpr::var(0), 1).unwrap();
        assert_eq!(GroverSearch::new(oracle).iterations(), 1);
        assert_eq!(GroverSearch::new(single_marked()).with_iterations(5).iterations(), 5);
    }

    #[test]
    fn test_single_marked_amplified() {
        let sim = StatevectorSimulator::default();
        let report = GroverSearch::new(single_marked())
            .run(&sim, 1000, Some(17))
            .unwrap();

        assert_eq!(report.marked, vec![5]);
        assert!(report.success_probability > 0.9);
        assert_eq!(report.histogram.total(), 1000);
        assert_eq!(
            report.histogram.most_frequent().map(|(k, _)| k),
            Some(assignment_key(5, 3).as_str())
        );
    }

    #[test]
    fn test_reference_predicate_runs() {
        let sim = StatevectorSimulator::default();
        let report = GroverSearch::new(Oracle::compile(reference_predicate(), 3).unwrap())
            .run(&sim, 200, Some(3))
            .unwrap();
        assert_eq!(report.iterations, 2);
        assert_eq!(report.histogram.total(), 200);
        assert!((0.0..=1.0 + 1e-9).contains(&report.success_probability));
    }

    #[test]
    fn test_wide_search_reports_budget() {
        let sim = StatevectorSimulator::default();
        let oracle = Oracle::compile(BoolExpr::var(0), 63).unwrap();
        let result = GroverSearch::new(oracle).run(&sim, 10, Some(1));
        assert!(matches!(
            result,
            Err(AlgoError::Sim(SimError::QubitBudgetExceeded {
                requested: 64,
                max_qubits: 24
            }))
        ));

        let oracle = Oracle::compile(reference_predicate(), 3).unwrap();
        let narrow = StatevectorSimulator::with_max_qubits(6);
        assert!(matches!(
            GroverSearch::new(oracle).run(&narrow, 10, Some(1)),
            Err(AlgoError::Sim(SimError::QubitBudgetExceeded { requested: 8, .. }))
        ));
    }

    #[test]
    fn test_program_measures_inputs_only() {
        let search = GroverSearch::new(single_marked());
        let program = search.program().unwrap();
        assert_eq!(program.num_clbits(), 3);
        assert_eq!(program.measured_qubits().len(), 3);
    }
}
