//! Statevector simulation engine.

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

use qlab_ir::{Gate, Instruction, InstructionKind, QubitId};

use crate::error::{SimError, SimResult};

/// Tolerance on the squared norm of caller-supplied amplitudes.
pub const INPUT_NORM_TOLERANCE: f64 = 1e-6;

/// A 2×2 unitary acting on the target qubit of a controlled gate.
type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A statevector representing a pure quantum state.
///
/// Qubit `q` is bit `q` of the basis index, so amplitude `i` belongs to the
/// basis state whose qubit `q` reads `(i >> q) & 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Create a statevector from explicit amplitudes.
    ///
    /// The length must be a non-zero power of two and the squared norm must
    /// be within [`INPUT_NORM_TOLERANCE`] of 1.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(SimError::InvalidInitialState(format!(
                "amplitude count {len} is not a power of two"
            )));
        }
        let norm_sqr: f64 = amplitudes.iter().map(Complex64::norm_sqr).sum();
        if (norm_sqr - 1.0).abs() > INPUT_NORM_TOLERANCE {
            return Err(SimError::InvalidInitialState(format!(
                "squared norm is {norm_sqr}, expected 1"
            )));
        }
        Ok(Self {
            amplitudes,
            num_qubits: len.trailing_zeros() as usize,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes, `2^n`.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// The raw amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Wrap amplitudes without checking their norm.
    #[cfg(test)]
    pub(crate) fn from_amplitudes_unchecked(amplitudes: Vec<Complex64>) -> Self {
        let num_qubits = amplitudes.len().trailing_zeros() as usize;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Apply an instruction to the statevector.
    ///
    /// Barriers and measurements leave the amplitudes untouched; measurement
    /// is handled by sampling the final state.
    pub fn apply(&mut self, instruction: &Instruction) {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                self.apply_gate(gate, instruction.controls(), instruction.targets());
            }
            InstructionKind::Barrier | InstructionKind::Measure => {}
        }
    }

    fn apply_gate(&mut self, gate: &Gate, controls: &[QubitId], targets: &[QubitId]) {
        let Some(target) = targets.first().map(|q| q.index()) else {
            return;
        };
        let control_mask = controls.iter().fold(0usize, |m, q| m | (1 << q.index()));

        match gate {
            Gate::X | Gate::CX | Gate::CCX | Gate::MCX { .. } => {
                self.apply_controlled_x(control_mask, target);
            }
            Gate::CZ => self.apply_controlled_z(control_mask, target),
            Gate::H => {
                let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
                self.apply_controlled(control_mask, target, [[s, s], [s, -s]]);
            }
            Gate::Ry(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new((theta / 2.0).sin(), 0.0);
                self.apply_controlled(control_mask, target, [[c, -s], [s, c]]);
            }
        }
    }

    // =========================================================================
    // Kernels
    // =========================================================================

    /// Apply `matrix` to `target` on every amplitude pair whose control bits are all set.
    fn apply_controlled(&mut self, control_mask: usize, target: usize, matrix: Matrix2) {
        let mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & control_mask == control_mask {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = matrix[0][0] * a + matrix[0][1] * b;
                self.amplitudes[j] = matrix[1][0] * a + matrix[1][1] * b;
            }
        }
    }

    fn apply_controlled_x(&mut self, control_mask: usize, target: usize) {
        let mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & control_mask == control_mask {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_controlled_z(&mut self, control_mask: usize, target: usize) {
        let mask = control_mask | (1 << target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
    }

    // =========================================================================
    // Readout
    // =========================================================================

    /// Sum of squared amplitude magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Born-rule probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Probability of a single basis state (0 outside the vector).
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map_or(0.0, Complex64::norm_sqr)
    }

    /// Probability that `qubit` reads 1.
    pub fn marginal_one(&self, qubit: QubitId) -> f64 {
        let mask = 1 << qubit.index();
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// The basis state holding probability at least `1 - tolerance`, if any.
    ///
    /// Used to read classical results out of reversible-arithmetic circuits.
    pub fn expect_basis_state(&self, tolerance: f64) -> Option<usize> {
        self.amplitudes
            .iter()
            .position(|a| a.norm_sqr() >= 1.0 - tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn gate(gate: Gate, qubits: &[u32]) -> Instruction {
        Instruction::gate(gate, qubits.iter().copied().map(QubitId))
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert_eq!(sv.dim(), 4);
        assert!(approx_eq(sv.amplitudes()[0], ONE));
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply(&gate(Gate::H, &[0]));
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        assert!(approx_eq(sv.amplitudes()[0], s));
        assert!(approx_eq(sv.amplitudes()[1], s));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply(&gate(Gate::H, &[0]));
        sv.apply(&gate(Gate::CX, &[0, 1]));

        let probs = sv.probabilities();
        assert!((probs[0] - 0.5).abs() < 1e-10);
        assert!(probs[1].abs() < 1e-10);
        assert!(probs[2].abs() < 1e-10);
        assert!((probs[3] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_x_gate() {
        let mut sv = Statevector::new(3);
        sv.apply(&gate(Gate::X, &[1]));
        assert_eq!(sv.expect_basis_state(1e-9), Some(0b010));
    }

    #[test]
    fn test_controlled_x_respects_controls() {
        // Controls clear: target untouched.
        let mut sv = Statevector::new(3);
        sv.apply(&gate(Gate::CCX, &[0, 1, 2]));
        assert_eq!(sv.expect_basis_state(1e-9), Some(0));

        // One control set: still untouched.
        sv.apply(&gate(Gate::X, &[0]));
        sv.apply(&gate(Gate::CCX, &[0, 1, 2]));
        assert_eq!(sv.expect_basis_state(1e-9), Some(0b001));

        // Both set: target flips.
        sv.apply(&gate(Gate::X, &[1]));
        sv.apply(&gate(Gate::CCX, &[0, 1, 2]));
        assert_eq!(sv.expect_basis_state(1e-9), Some(0b111));
    }

    #[test]
    fn test_mcx_four_controls() {
        let mut sv = Statevector::new(5);
        for q in 0..4 {
            sv.apply(&gate(Gate::X, &[q]));
        }
        sv.apply(&gate(Gate::MCX { num_controls: 4 }, &[0, 1, 2, 3, 4]));
        assert_eq!(sv.expect_basis_state(1e-9), Some(0b11111));
    }

    #[test]
    fn test_cz_phase() {
        let mut sv = Statevector::new(2);
        sv.apply(&gate(Gate::H, &[0]));
        sv.apply(&gate(Gate::H, &[1]));
        sv.apply(&gate(Gate::CZ, &[0, 1]));
        assert!(approx_eq(sv.amplitudes()[3], Complex64::new(-0.5, 0.0)));
        assert!(approx_eq(sv.amplitudes()[1], Complex64::new(0.5, 0.0)));
    }

    #[test]
    fn test_ry_rotation() {
        let mut sv = Statevector::new(1);
        sv.apply(&gate(Gate::Ry(PI / 2.0), &[0]));
        assert!((sv.marginal_one(QubitId(0)) - 0.5).abs() < 1e-10);

        sv.apply(&gate(Gate::Ry(-PI / 2.0), &[0]));
        assert_eq!(sv.expect_basis_state(1e-9), Some(0));
    }

    #[test]
    fn test_from_amplitudes_validation() {
        assert!(matches!(
            Statevector::from_amplitudes(vec![ONE; 3]),
            Err(SimError::InvalidInitialState(_))
        ));
        assert!(matches!(
            Statevector::from_amplitudes(vec![ONE, ONE]),
            Err(SimError::InvalidInitialState(_))
        ));
        let sv = Statevector::from_amplitudes(vec![ZERO, ZERO, ONE, ZERO]).unwrap();
        assert_eq!(sv.num_qubits(), 2);
        assert!((sv.marginal_one(QubitId(1)) - 1.0).abs() < 1e-12);
    }
}
