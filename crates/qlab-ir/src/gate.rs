//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Gates understood by the simulator.
///
/// Every gate is a (possibly controlled) single-target operation: the
/// target unitary is applied where all control qubits are `|1⟩` and the
/// identity everywhere else. Operands are always listed controls first,
/// target last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Pauli-X gate.
    X,
    /// Hadamard gate.
    H,
    /// Rotation around the Y axis by a real angle.
    Ry(f64),
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// Toffoli gate (CCX).
    CCX,
    /// X on the target, controlled by `num_controls` qubits.
    MCX {
        /// Number of control qubits.
        num_controls: u32,
    },
}

impl Gate {
    /// Multi-controlled X, collapsing to the named gate for 0, 1 or 2 controls.
    pub fn mcx(num_controls: u32) -> Self {
        match num_controls {
            0 => Gate::X,
            1 => Gate::CX,
            2 => Gate::CCX,
            n => Gate::MCX { num_controls: n },
        }
    }

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::X => "x",
            Gate::H => "h",
            Gate::Ry(_) => "ry",
            Gate::CX => "cx",
            Gate::CZ => "cz",
            Gate::CCX => "ccx",
            Gate::MCX { .. } => "mcx",
        }
    }

    /// Number of control qubits.
    #[inline]
    pub fn num_controls(&self) -> u32 {
        match self {
            Gate::X | Gate::H | Gate::Ry(_) => 0,
            Gate::CX | Gate::CZ => 1,
            Gate::CCX => 2,
            Gate::MCX { num_controls } => *num_controls,
        }
    }

    /// Total number of operands (controls plus the single target).
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_controls() + 1
    }

    /// The rotation angle, if the gate has one.
    pub fn parameter(&self) -> Option<f64> {
        match self {
            Gate::Ry(theta) => Some(*theta),
            _ => None,
        }
    }

    /// Whether the gate equals its own inverse.
    pub fn is_self_inverse(&self) -> bool {
        !matches!(self, Gate::Ry(_))
    }

    /// The inverse gate.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Gate::Ry(theta) => Gate::Ry(-theta),
            other => *other,
        }
    }
}
