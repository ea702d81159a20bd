//! Adder that subtracts when a control qubit is set.

use serde::{Deserialize, Serialize};
use std::fmt;

use qlab_ir::{Circuit, Program, QuantumRegister, QubitId};
use qlab_sim::StatevectorSimulator;

use crate::adder::{AdderLayout, RippleCarryAdder};
use crate::error::{AlgoError, AlgoResult};

const READOUT_TOLERANCE: f64 = 1e-9;

/// Operation selected by the control qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticMode {
    /// Control cleared: `sum = (a + b) mod 2^d`.
    Add,
    /// Control set: `sum = (a - b) mod 2^d`.
    Subtract,
}

impl fmt::Display for ArithmeticMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticMode::Add => write!(f, "add"),
            ArithmeticMode::Subtract => write!(f, "subtract"),
        }
    }
}

/// `CX(control, target_i)` for every target: control on qubit 0, targets on `1..=width`.
fn controlled_complement(width: u32) -> AlgoResult<Circuit> {
    let mut circuit = Circuit::with_size("controlled_complement", width + 1);
    for t in 1..=width {
        circuit.cx(QubitId(0), QubitId(t))?;
    }
    Ok(circuit)
}

/// Ripple-carry adder bracketed by controlled complements.
///
/// With the control set, register `a` is complemented before the adder and
/// `sum` after it, giving `~(~a + b) = a - b`. Register `a` holds the minuend.
/// The control qubit sits right after the adder's `sum` register.
#[derive(Debug, Clone)]
pub struct ControlledAdderSubtractor {
    adder: RippleCarryAdder,
    control: QubitId,
}

impl ControlledAdderSubtractor {
    /// Create an adder/subtractor for `digits`-wide operands.
    pub fn new(digits: u32) -> AlgoResult<Self> {
        let adder = RippleCarryAdder::new(digits)?;
        let control = QubitId(adder.num_qubits());
        Ok(Self { adder, control })
    }

    /// Operand width.
    pub fn digits(&self) -> u32 {
        self.adder.digits()
    }

    /// Layout of the wrapped adder.
    pub fn layout(&self) -> &AdderLayout {
        self.adder.layout()
    }

    /// The mode-selecting control qubit.
    pub fn control(&self) -> QubitId {
        self.control
    }

    /// Qubits used, control included.
    pub fn num_qubits(&self) -> u32 {
        self.control.0 + 1
    }

    /// `reg` flipped bit by bit when the control is set.
    pub fn complement_stage(&self, reg: &QuantumRegister) -> AlgoResult<Circuit> {
        let width = u32::try_from(reg.len()).unwrap_or(u32::MAX);
        let map: Vec<_> = std::iter::once(self.control).chain(reg.iter()).collect();
        let mut circuit =
            Circuit::with_size(format!("complement_{}", reg.name()), self.num_qubits());
        circuit.compose(&controlled_complement(width)?, &map)?;
        Ok(circuit)
    }

    /// Load operands and control, then complement, add, complement.
    pub fn circuit(&self, a: u64, b: u64, mode: ArithmeticMode) -> AlgoResult<Circuit> {
        let layout = self.adder.layout();
        let inputs = self.adder.prepare_inputs(a, b)?;

        let mut circuit = Circuit::with_size(format!("{mode}_{a}_{b}"), self.num_qubits());
        circuit.extend(&inputs)?;
        if mode == ArithmeticMode::Subtract {
            circuit.x(self.control)?;
        }
        circuit.barrier_all()?;
        circuit.extend(&self.complement_stage(&layout.a)?)?;
        circuit.extend(&self.adder.core()?)?;
        circuit.extend(&self.complement_stage(&layout.sum)?)?;
        Ok(circuit)
    }

    /// The circuit with `sum` measured into bits `0..d`.
    pub fn program(&self, a: u64, b: u64, mode: ArithmeticMode) -> AlgoResult<Program> {
        let mut program = Program::new(self.circuit(a, b, mode)?);
        let creg = program.add_creg("sum", self.digits());
        program.measure_register(&self.adder.layout().sum, &creg)?;
        Ok(program)
    }

    /// Compute `a ± b` modulo `2^d` by exact statevector readout.
    pub fn evaluate(
        &self,
        sim: &StatevectorSimulator,
        a: u64,
        b: u64,
        mode: ArithmeticMode,
    ) -> AlgoResult<u64> {
        let circuit = self.circuit(a, b, mode)?;
        let state = sim.run_circuit(&circuit)?;
        let index = state
            .expect_basis_state(READOUT_TOLERANCE)
            .ok_or_else(|| AlgoError::NonClassicalResult {
                circuit: circuit.name().to_string(),
            })?;
        Ok(self.adder.layout().sum.decode(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_follows_sum() {
        let unit = ControlledAdderSubtractor::new(2).unwrap();
        assert_eq!(unit.control(), QubitId(7));
        assert_eq!(unit.num_qubits(), 8);
    }

    #[test]
    fn test_complement_stage_targets_register() {
        let unit = ControlledAdderSubtractor::new(3).unwrap();
        let stage = unit.complement_stage(&unit.layout().sum).unwrap();
        assert_eq!(stage.len(), 3);
        for (inst, target) in stage.instructions().iter().zip(unit.layout().sum.iter()) {
            assert_eq!(inst.controls(), &[unit.control()]);
            assert_eq!(inst.targets(), &[target]);
        }
    }

    #[test]
    fn test_add_and_subtract() {
        let sim = StatevectorSimulator::default();
        let unit = ControlledAdderSubtractor::new(3).unwrap();
        assert_eq!(unit.evaluate(&sim, 5, 2, ArithmeticMode::Add).unwrap(), 7);
        assert_eq!(unit.evaluate(&sim, 5, 2, ArithmeticMode::Subtract).unwrap(), 3);
        assert_eq!(unit.evaluate(&sim, 2, 5, ArithmeticMode::Subtract).unwrap(), 5);
    }

    #[test]
    fn test_program_histogram() {
        let sim = StatevectorSimulator::default();
        let unit = ControlledAdderSubtractor::new(2).unwrap();
        let program = unit.program(1, 3, ArithmeticMode::Subtract).unwrap();
        let counts = sim.run_shots(&program, 10, Some(4)).unwrap();
        // (1 - 3) mod 4 = 2
        assert_eq!(counts.get("10"), 10);
    }
}
