//! Program constructions for qlab.
//!
//! Each module assembles sub-circuits with [`qlab_ir::Circuit::compose`],
//! attaches measurements, and reads results back through
//! [`qlab_sim::StatevectorSimulator`].
//!
//! - [`bell`]: Bell pairs over every basis input
//! - [`adder`]: ripple-carry adder with exact readout
//! - [`subtractor`]: adder/subtractor selected by a control qubit
//! - [`oracle`]: boolean expressions compiled to compute/uncompute oracles
//! - [`grover`]: amplitude amplification over an oracle
//! - [`teleport`]: teleportation of a real single-qubit state
//!
//! # Example
//!
//! ```rust
//! use qlab_algo::adder::RippleCarryAdder;
//! use qlab_sim::StatevectorSimulator;
//!
//! let sim = StatevectorSimulator::default();
//! let adder = RippleCarryAdder::new(3).unwrap();
//! let outcome = adder.evaluate(&sim, 5, 6).unwrap();
//!
//! assert_eq!(outcome.sum, 3);
//! assert!(outcome.carry_out);
//! ```

pub mod adder;
pub mod bell;
pub mod error;
pub mod grover;
pub mod oracle;
pub mod subtractor;
pub mod teleport;

pub use adder::{AdderLayout, AdderOutcome, RippleCarryAdder};
pub use error::{AlgoError, AlgoResult};
pub use grover::{GroverReport, GroverSearch};
pub use oracle::{BoolExpr, Oracle, reference_predicate};
pub use subtractor::{ArithmeticMode, ControlledAdderSubtractor};
pub use teleport::{Teleportation, prepare_state};
