//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors raised while constructing circuits and programs.
///
/// Every variant is a construction-time failure: nothing is appended to the
/// circuit when an error is returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside `[0, n)`.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit circuit{}", format_gate_context(.gate_name))]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of qubits declared by the circuit.
        num_qubits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit index outside `[0, m)`.
    #[error("Classical bit {clbit} out of range for program with {num_clbits} classical bits")]
    ClbitOutOfRange {
        /// The offending classical bit.
        clbit: ClbitId,
        /// Number of classical bits declared by the program.
        num_clbits: u32,
    },

    /// Gate requires a different number of operands.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// The same qubit appears twice among an instruction's operands.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Index map passed to composition does not cover the sub-circuit.
    #[error("Index map has {got} entries but sub-circuit '{circuit}' has {expected} qubits")]
    IndexMapMismatch {
        /// Name of the circuit being composed in.
        circuit: String,
        /// Number of qubits of the sub-circuit.
        expected: u32,
        /// Number of entries in the map.
        got: u32,
    },

    /// Rotation angle is NaN or infinite.
    #[error("Gate '{gate_name}' has non-finite angle {angle}")]
    NonFiniteAngle {
        /// Name of the gate.
        gate_name: String,
        /// The rejected angle.
        angle: f64,
    },

    /// Measurements belong to a [`Program`](crate::Program), not a circuit.
    #[error("Measurement of {qubit} cannot be appended to circuit '{circuit}'; attach it to a program")]
    MeasurementInCircuit {
        /// Name of the circuit.
        circuit: String,
        /// The qubit the measurement referenced.
        qubit: QubitId,
    },

    /// Quantum and classical registers of different sizes.
    #[error("Cannot measure register of {qubits} qubits into {clbits} classical bits")]
    RegisterSizeMismatch {
        /// Size of the quantum register.
        qubits: u32,
        /// Size of the classical register.
        clbits: u32,
    },

    /// Repetition would overflow the instruction count.
    #[error("Repeating circuit '{circuit}' ({instructions} instructions) {times} times overflows")]
    RepeatOverflow {
        /// Name of the repeated circuit.
        circuit: String,
        /// Instructions in one repetition.
        instructions: usize,
        /// Requested repetitions.
        times: usize,
    },

    /// JSON export failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
