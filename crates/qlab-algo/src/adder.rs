//! Ripple-carry adder built from a six-gate full-adder cell.

use serde::{Deserialize, Serialize};
use tracing::debug;

use qlab_ir::{Circuit, Program, QuantumRegister, QubitId};
use qlab_sim::StatevectorSimulator;

use crate::error::{AlgoError, AlgoResult};

/// Largest supported digit width; operands must fit in a `u64`.
pub const MAX_DIGITS: u32 = 63;

/// Tolerance used when reading a classical result out of the final state.
const READOUT_TOLERANCE: f64 = 1e-9;

/// The full-adder cell on four qubits: `a = 0`, `b = 1`, `carry = 2`, `sum = 3`.
///
/// With `sum` starting at |0⟩ it leaves `sum = a ⊕ b ⊕ carry` and replaces
/// `carry` with the majority of the three inputs.
pub fn full_adder_cell() -> AlgoResult<Circuit> {
    let (a, b, carry, sum) = (QubitId(0), QubitId(1), QubitId(2), QubitId(3));
    let mut cell = Circuit::with_size("full_adder", 4);
    cell.cx(carry, sum)?
        .cx(sum, carry)?
        .ccx(b, sum, carry)?
        .cx(b, sum)?
        .ccx(a, sum, carry)?
        .cx(a, sum)?;
    Ok(cell)
}

/// Qubit layout of the adder: `a[0..d)`, `b[0..d)`, carry, `sum[0..d)`.
///
/// All registers are little-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdderLayout {
    /// First operand.
    pub a: QuantumRegister,
    /// Second operand.
    pub b: QuantumRegister,
    /// Shared carry qubit.
    pub carry: QubitId,
    /// Result register.
    pub sum: QuantumRegister,
}

impl AdderLayout {
    fn new(digits: u32) -> Self {
        Self {
            a: QuantumRegister::contiguous("a", 0, digits),
            b: QuantumRegister::contiguous("b", digits, digits),
            carry: QubitId(2 * digits),
            sum: QuantumRegister::contiguous("sum", 2 * digits + 1, digits),
        }
    }

    /// Qubits used by the layout.
    pub fn num_qubits(&self) -> u32 {
        self.carry.0 + 1 + u32::try_from(self.sum.len()).unwrap_or(u32::MAX)
    }
}

/// Result of an addition read out of the final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdderOutcome {
    /// `(a + b) mod 2^d`.
    pub sum: u64,
    /// Whether `a + b` overflowed `d` digits.
    pub carry_out: bool,
}

/// Ripple-carry adder over `d`-digit operands.
///
/// The carry ripples from digit 0 upward through one shared carry qubit.
/// Overflow wraps; the final carry is left in the carry qubit and is
/// reported separately.
#[derive(Debug, Clone)]
pub struct RippleCarryAdder {
    digits: u32,
    layout: AdderLayout,
}

impl RippleCarryAdder {
    /// Create an adder for `digits`-wide operands.
    pub fn new(digits: u32) -> AlgoResult<Self> {
        if digits == 0 || digits > MAX_DIGITS {
            return Err(AlgoError::InvalidDigits {
                digits,
                max: MAX_DIGITS,
            });
        }
        Ok(Self {
            digits,
            layout: AdderLayout::new(digits),
        })
    }

    /// Operand width.
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Qubit layout.
    pub fn layout(&self) -> &AdderLayout {
        &self.layout
    }

    /// Qubits used by the adder.
    pub fn num_qubits(&self) -> u32 {
        self.layout.num_qubits()
    }

    /// Largest representable operand, `2^d - 1`.
    pub fn max_operand(&self) -> u64 {
        u64::MAX >> (64 - self.digits)
    }

    pub(crate) fn check_operand(&self, operand: u64) -> AlgoResult<()> {
        if operand > self.max_operand() {
            return Err(AlgoError::OperandOutOfRange {
                operand,
                digits: self.digits,
            });
        }
        Ok(())
    }

    /// X gates loading `a` and `b` into their registers.
    pub fn prepare_inputs(&self, a: u64, b: u64) -> AlgoResult<Circuit> {
        self.check_operand(a)?;
        self.check_operand(b)?;
        let mut circuit = Circuit::with_size("prepare_inputs", self.num_qubits());
        for (value, reg) in [(a, &self.layout.a), (b, &self.layout.b)] {
            for (i, qubit) in reg.iter().enumerate() {
                if (value >> i) & 1 == 1 {
                    circuit.x(qubit)?;
                }
            }
        }
        Ok(circuit)
    }

    /// The full-adder cell placed on digit `i`.
    pub fn full_adder_block(&self, i: usize) -> AlgoResult<Circuit> {
        let map = self.cell_map(i)?;
        let mut circuit = Circuit::with_size(format!("full_adder_{i}"), self.num_qubits());
        circuit.compose(&full_adder_cell()?, &map)?;
        Ok(circuit)
    }

    fn cell_map(&self, i: usize) -> AlgoResult<[QubitId; 4]> {
        let layout = &self.layout;
        match (layout.a.get(i), layout.b.get(i), layout.sum.get(i)) {
            (Some(a), Some(b), Some(sum)) => Ok([a, b, layout.carry, sum]),
            _ => Err(AlgoError::OperandOutOfRange {
                operand: i as u64,
                digits: self.digits,
            }),
        }
    }

    /// Every digit's full-adder cell, least significant digit first.
    pub fn core(&self) -> AlgoResult<Circuit> {
        let cell = full_adder_cell()?;
        let mut circuit = Circuit::with_size("ripple_carry_adder", self.num_qubits());
        for i in 0..self.digits as usize {
            circuit.compose(&cell, &self.cell_map(i)?)?;
        }
        Ok(circuit)
    }

    /// Input preparation followed by the adder core.
    pub fn circuit(&self, a: u64, b: u64) -> AlgoResult<Circuit> {
        let mut circuit = self.prepare_inputs(a, b)?.with_name(format!("add_{a}_{b}"));
        circuit.barrier_all()?;
        circuit.extend(&self.core()?)?;
        Ok(circuit)
    }

    /// The adder circuit with `sum` measured into bits `0..d` and the
    /// carry-out into bit `d`.
    pub fn program(&self, a: u64, b: u64) -> AlgoResult<Program> {
        let mut program = Program::new(self.circuit(a, b)?);
        let sum = program.add_creg("sum", self.digits);
        let carry = program.add_creg("carry", 1);
        program.measure_register(&self.layout.sum, &sum)?;
        program.measure(self.layout.carry, carry.clbit(0))?;
        Ok(program)
    }

    /// Add `a` and `b` by exact statevector readout.
    pub fn evaluate(&self, sim: &StatevectorSimulator, a: u64, b: u64) -> AlgoResult<AdderOutcome> {
        let circuit = self.circuit(a, b)?;
        let state = sim.run_circuit(&circuit)?;
        let index = state
            .expect_basis_state(READOUT_TOLERANCE)
            .ok_or_else(|| AlgoError::NonClassicalResult {
                circuit: circuit.name().to_string(),
            })?;

        let outcome = AdderOutcome {
            sum: self.layout.sum.decode(index),
            carry_out: (index >> self.layout.carry.index()) & 1 == 1,
        };
        debug!("{a} + {b} = {} (carry {})", outcome.sum, outcome.carry_out);
        Ok(outcome)
    }
}
