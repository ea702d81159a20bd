//! qlab Circuit Intermediate Representation
//!
//! This crate provides the data structures every qlab experiment is built
//! from: qubit and classical bit indices, the gate set, circuits that can be
//! composed and inverted, and programs that attach measurements to a circuit.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] and the
//!   [`QuantumRegister`] / [`ClassicalRegister`] groups built from them
//! - **Gates**: [`Gate`], every one a controlled single-target operation
//! - **Instructions**: [`Instruction`] combining a gate, barrier or
//!   measurement with its operands
//! - **Circuit**: [`Circuit`] builder with composition and structural inverse
//! - **Program**: [`Program`], a circuit plus terminal measurements
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qlab_ir::{Circuit, Program, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let mut program = Program::new(circuit);
//! program.measure_all().unwrap();
//!
//! assert_eq!(program.num_clbits(), 2);
//! assert_eq!(program.circuit().depth(), 2);
//! ```
//!
//! # Example: Compute and Uncompute
//!
//! ```rust
//! use qlab_ir::{Circuit, QubitId, compose};
//!
//! let mut stage = Circuit::with_size("and", 3);
//! stage.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
//!
//! // Splice the stage onto qubits 4, 5, 6 of a larger circuit, then undo it.
//! let map = [QubitId(4), QubitId(5), QubitId(6)];
//! let mut full = compose(&Circuit::with_size("main", 7), &stage, &map).unwrap();
//! full.compose(&stage.inverse(), &map).unwrap();
//!
//! assert_eq!(full.gate_count(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `X` | 1 | Pauli-X |
//! | `H` | 1 | Hadamard |
//! | `Ry` | 1 | Real rotation about Y |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CZ` | 2 | Controlled-Z |
//! | `CCX` | 3 | Toffoli (CCNOT) |
//! | `MCX` | k+1 | X controlled by k qubits |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod program;
pub mod qubit;

pub use circuit::{Circuit, compose, invert};
pub use error::{IrError, IrResult};
pub use gate::Gate;
pub use instruction::{Instruction, InstructionKind};
pub use program::{Measurement, Program, attach_measurements};
pub use qubit::{ClassicalRegister, ClbitId, QuantumRegister, QubitId};
