//! Error types for the algorithm constructions.

use thiserror::Error;

/// Errors raised while assembling or evaluating an algorithm.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlgoError {
    /// Amplitudes of a state to prepare are not normalized.
    #[error("amplitudes ({alpha}, {beta}) are not normalized: α² + β² = {norm_sqr}")]
    InvalidStateParameters {
        /// Amplitude of |0⟩.
        alpha: f64,
        /// Amplitude of |1⟩.
        beta: f64,
        /// Observed α² + β².
        norm_sqr: f64,
    },

    /// Register width outside the supported range.
    #[error("digit width must be between 1 and {max}, got {digits}")]
    InvalidDigits {
        /// Requested width.
        digits: u32,
        /// Largest supported width.
        max: u32,
    },

    /// Operand does not fit in the register.
    #[error("operand {operand} does not fit in {digits} digits")]
    OperandOutOfRange {
        /// The rejected operand.
        operand: u64,
        /// Register width.
        digits: u32,
    },

    /// Boolean expression cannot be compiled.
    #[error("invalid boolean expression: {0}")]
    InvalidExpression(String),

    /// A circuit expected to end in a single basis state did not.
    #[error("circuit '{circuit}' did not finish in a classical basis state")]
    NonClassicalResult {
        /// Name of the circuit.
        circuit: String,
    },

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qlab_ir::IrError),

    /// Simulator returned an error.
    #[error("Simulation error: {0}")]
    Sim(#[from] qlab_sim::SimError),
}

/// Result type for algorithm constructions.
pub type AlgoResult<T> = Result<T, AlgoError>;
