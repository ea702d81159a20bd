//! Statevector simulation for qlab programs.
//!
//! This crate evolves a dense complex amplitude vector under a
//! [`qlab_ir::Circuit`] and samples measurement outcomes for a
//! [`qlab_ir::Program`].
//!
//! # Components
//!
//! - [`Statevector`]: `2^n` amplitudes with one controlled 2×2 kernel shared
//!   by every gate, plus readout helpers
//! - [`StatevectorSimulator`]: runs circuits and programs under a
//!   [`SimulatorConfig`] qubit ceiling and checks normalization
//! - [`MeasurementSampler`]: cumulative-distribution sampler projecting basis
//!   states onto classical bits
//! - [`OutcomeHistogram`]: bitstring counts, classical bit 0 rightmost
//!
//! # Example
//!
//! ```rust
//! use qlab_ir::{Circuit, Program};
//! use qlab_sim::StatevectorSimulator;
//!
//! let mut program = Program::new(Circuit::bell().unwrap());
//! program.measure_all().unwrap();
//!
//! let sim = StatevectorSimulator::default();
//! let counts = sim.run_shots(&program, 1000, Some(7)).unwrap();
//!
//! assert_eq!(counts.total(), 1000);
//! assert_eq!(counts.get("01") + counts.get("10"), 0);
//! ```

pub mod error;
pub mod histogram;
pub mod sampler;
pub mod simulator;
pub mod statevector;

pub use error::{SimError, SimResult};
pub use histogram::OutcomeHistogram;
pub use sampler::MeasurementSampler;
pub use simulator::{
    FINAL_NORM_TOLERANCE, MAX_QUBITS, STEP_NORM_TOLERANCE, SimulatorConfig, StatevectorSimulator,
};
pub use statevector::Statevector;
