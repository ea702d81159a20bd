//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while simulating or sampling a program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Shot count must be at least 1.
    #[error("shots must be at least 1, got {0}")]
    InvalidShotCount(u32),

    /// The amplitude vector would exceed the configured qubit ceiling.
    #[error("circuit needs {requested} qubits but the simulator is limited to {max_qubits}")]
    QubitBudgetExceeded {
        /// Qubits the circuit declares.
        requested: u32,
        /// Configured ceiling.
        max_qubits: u32,
    },

    /// Statevector norm drifted away from 1. This is an internal defect.
    #[error("statevector norm {norm_sqr} deviates from 1 by more than {tolerance}{}", format_step(.step))]
    Normalization {
        /// Observed squared norm.
        norm_sqr: f64,
        /// Tolerance that was exceeded.
        tolerance: f64,
        /// Instruction index after which the drift was seen, if checked per step.
        step: Option<usize>,
    },

    /// A caller-supplied state cannot be used.
    #[error("invalid initial state: {0}")]
    InvalidInitialState(String),

    /// Statevector and circuit disagree on width.
    #[error("statevector has {got} qubits but the circuit needs {expected}")]
    StateSizeMismatch {
        /// Qubits the circuit declares.
        expected: u32,
        /// Qubits held by the statevector.
        got: u32,
    },

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qlab_ir::IrError),
}

#[allow(clippy::ref_option)]
fn format_step(step: &Option<usize>) -> String {
    match step {
        Some(i) => format!(" after instruction {i}"),
        None => String::new(),
    }
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
