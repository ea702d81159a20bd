//! Statevector simulator driving circuits, programs and shot sampling.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, trace};

use qlab_ir::{Circuit, Program};

use crate::error::{SimError, SimResult};
use crate::histogram::OutcomeHistogram;
use crate::sampler::MeasurementSampler;
use crate::statevector::Statevector;

/// Tolerance on the squared norm after every instruction when stepping is checked.
pub const STEP_NORM_TOLERANCE: f64 = 1e-9;

/// Tolerance on the squared norm once the whole circuit has run.
pub const FINAL_NORM_TOLERANCE: f64 = 1e-6;

/// Hard ceiling on `max_qubits`; larger settings are clamped to it.
pub const MAX_QUBITS: u32 = 30;

/// Simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Largest circuit, in qubits, the simulator will allocate a state for.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,

    /// Re-check normalization after every instruction.
    #[serde(default)]
    pub check_each_step: bool,
}

fn default_max_qubits() -> u32 {
    24
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: default_max_qubits(),
            check_each_step: false,
        }
    }
}

/// Local statevector simulator.
///
/// Every run owns a fresh amplitude vector and, for shot runs, its own
/// random source; nothing carries over between runs.
#[derive(Debug, Clone, Default)]
pub struct StatevectorSimulator {
    config: SimulatorConfig,
}

impl StatevectorSimulator {
    /// Create a simulator with the given configuration.
    ///
    /// `max_qubits` is clamped to [`MAX_QUBITS`].
    pub fn new(mut config: SimulatorConfig) -> Self {
        config.max_qubits = config.max_qubits.min(MAX_QUBITS);
        Self { config }
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::new(SimulatorConfig {
            max_qubits,
            ..SimulatorConfig::default()
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Fail with [`SimError::QubitBudgetExceeded`] if `num_qubits` is over the ceiling.
    pub fn check_budget(&self, num_qubits: u32) -> SimResult<()> {
        if num_qubits > self.config.max_qubits {
            return Err(SimError::QubitBudgetExceeded {
                requested: num_qubits,
                max_qubits: self.config.max_qubits,
            });
        }
        Ok(())
    }

    /// Evolve |0...0⟩ under `circuit`.
    pub fn run_circuit(&self, circuit: &Circuit) -> SimResult<Statevector> {
        self.check_budget(circuit.num_qubits())?;
        self.evolve(circuit, Statevector::new(circuit.num_qubits() as usize))
    }

    /// Evolve a caller-supplied state under `circuit`.
    pub fn run_circuit_from(
        &self,
        circuit: &Circuit,
        initial: Statevector,
    ) -> SimResult<Statevector> {
        self.check_budget(circuit.num_qubits())?;
        if initial.num_qubits() != circuit.num_qubits() as usize {
            return Err(SimError::StateSizeMismatch {
                expected: circuit.num_qubits(),
                got: u32::try_from(initial.num_qubits()).unwrap_or(u32::MAX),
            });
        }
        self.evolve(circuit, initial)
    }

    /// Final statevector of a program. Measurements are not applied.
    #[instrument(skip(self, program), fields(circuit = program.circuit().name()))]
    pub fn run_statevector(&self, program: &Program) -> SimResult<Statevector> {
        self.run_circuit(program.circuit())
    }

    /// Run `program` and sample `shots` measurement outcomes.
    ///
    /// With `seed` set the histogram is reproducible; otherwise the random
    /// source is seeded from the operating system.
    #[instrument(skip(self, program), fields(circuit = program.circuit().name()))]
    pub fn run_shots(
        &self,
        program: &Program,
        shots: u32,
        seed: Option<u64>,
    ) -> SimResult<OutcomeHistogram> {
        if shots == 0 {
            return Err(SimError::InvalidShotCount(shots));
        }
        let state = self.run_statevector(program)?;
        self.sample(&state, program, shots, seed)
    }

    /// Sample `shots` outcomes of `program`'s measurements from an existing state.
    pub fn sample(
        &self,
        state: &Statevector,
        program: &Program,
        shots: u32,
        seed: Option<u64>,
    ) -> SimResult<OutcomeHistogram> {
        if shots == 0 {
            return Err(SimError::InvalidShotCount(shots));
        }
        if state.num_qubits() != program.num_qubits() as usize {
            return Err(SimError::StateSizeMismatch {
                expected: program.num_qubits(),
                got: u32::try_from(state.num_qubits()).unwrap_or(u32::MAX),
            });
        }

        let start = Instant::now();
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sampler = MeasurementSampler::new(state, program);
        let histogram = sampler.sample(shots, &mut rng);

        debug!(
            "Sampled {} shots into {} outcomes in {:?}",
            shots,
            histogram.len(),
            start.elapsed()
        );
        Ok(histogram)
    }

    fn evolve(&self, circuit: &Circuit, mut state: Statevector) -> SimResult<Statevector> {
        let start = Instant::now();
        debug!(
            "Starting simulation: {} qubits, {} instructions",
            circuit.num_qubits(),
            circuit.len()
        );

        for (step, inst) in circuit.instructions().iter().enumerate() {
            state.apply(inst);
            trace!(step, op = inst.name(), "applied instruction");
            if self.config.check_each_step {
                check_norm(&state, STEP_NORM_TOLERANCE, Some(step))?;
            }
        }
        check_norm(&state, FINAL_NORM_TOLERANCE, None)?;

        debug!("Simulation completed in {:?}", start.elapsed());
        Ok(state)
    }
}

fn check_norm(state: &Statevector, tolerance: f64, step: Option<usize>) -> SimResult<()> {
    let norm_sqr = state.norm_sqr();
    if (norm_sqr - 1.0).abs() > tolerance {
        return Err(SimError::Normalization {
            norm_sqr,
            tolerance,
            step,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use qlab_ir::{ClbitId, QubitId, attach_measurements};

    fn bell_program() -> Program {
        let mut program = Program::new(Circuit::bell().unwrap());
        program.measure_all().unwrap();
        program
    }

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert_eq!(config.max_qubits, 24);
        assert!(!config.check_each_step);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: SimulatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SimulatorConfig::default());
    }

    #[test]
    fn test_bell_shots() {
        let sim = StatevectorSimulator::default();
        let counts = sim.run_shots(&bell_program(), 1000, Some(42)).unwrap();

        assert_eq!(counts.total(), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
        assert!(counts.get("00") > 400);
        assert!(counts.get("11") > 400);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let sim = StatevectorSimulator::default();
        let a = sim.run_shots(&bell_program(), 200, Some(9)).unwrap();
        let b = sim.run_shots(&bell_program(), 200, Some(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_shots_rejected() {
        let sim = StatevectorSimulator::default();
        assert!(matches!(
            sim.run_shots(&bell_program(), 0, None),
            Err(SimError::InvalidShotCount(0))
        ));
    }

    #[test]
    fn test_qubit_budget() {
        let sim = StatevectorSimulator::with_max_qubits(3);
        let program = Program::new(Circuit::with_size("wide", 4));
        assert!(matches!(
            sim.run_statevector(&program),
            Err(SimError::QubitBudgetExceeded {
                requested: 4,
                max_qubits: 3
            })
        ));
    }

    #[test]
    fn test_max_qubits_clamped() {
        let sim = StatevectorSimulator::with_max_qubits(64);
        assert_eq!(sim.config().max_qubits, MAX_QUBITS);

        let program = Program::new(Circuit::with_size("wide", 40));
        assert!(matches!(
            sim.run_statevector(&program),
            Err(SimError::QubitBudgetExceeded {
                requested: 40,
                max_qubits: MAX_QUBITS
            })
        ));
    }

    #[test]
    fn test_step_drift_reported() {
        let sim = StatevectorSimulator::new(SimulatorConfig {
            check_each_step: true,
            ..SimulatorConfig::default()
        });
        // Accepted as input (within 1e-6) but outside the per-step tolerance.
        let amplitudes = vec![Complex64::new((1.0f64 + 5e-7).sqrt(), 0.0), Complex64::new(0.0, 0.0)];
        let initial = Statevector::from_amplitudes(amplitudes).unwrap();
        let mut circuit = Circuit::with_size("c", 1);
        circuit.x(QubitId(0)).unwrap();

        match sim.run_circuit_from(&circuit, initial.clone()) {
            Err(SimError::Normalization {
                step, tolerance, ..
            }) => {
                assert_eq!(step, Some(0));
                assert_eq!(tolerance, STEP_NORM_TOLERANCE);
            }
            other => panic!("expected normalization error, got {other:?}"),
        }

        // Within the final tolerance when steps are not checked.
        let state = StatevectorSimulator::default()
            .run_circuit_from(&circuit, initial)
            .unwrap();
        assert!((state.probability(1) - (1.0 + 5e-7)).abs() < 1e-12);
    }

    #[test]
    fn test_final_drift_reported() {
        let sim = StatevectorSimulator::default();
        let initial = Statevector::from_amplitudes_unchecked(vec![
            Complex64::new(1.01, 0.0),
            Complex64::new(0.0, 0.0),
        ]);
        let mut circuit = Circuit::with_size("c", 1);
        circuit.h(QubitId(0)).unwrap();

        match sim.run_circuit_from(&circuit, initial) {
            Err(SimError::Normalization { step, norm_sqr, .. }) => {
                assert_eq!(step, None);
                assert!((norm_sqr - 1.0201).abs() < 1e-9);
            }
            other => panic!("expected normalization error, got {other:?}"),
        }
    }

    #[test]
    fn test_step_checking_passes_for_unitary_circuits() {
        let sim = StatevectorSimulator::new(SimulatorConfig {
            check_each_step: true,
            ..SimulatorConfig::default()
        });
        let mut circuit = Circuit::with_size("c", 3);
        circuit
            .h(QubitId(0))
            .unwrap()
            .ry(0.3, QubitId(1))
            .unwrap()
            .ccx(QubitId(0), QubitId(1), QubitId(2))
            .unwrap()
            .cz(QubitId(2), QubitId(0))
            .unwrap();
        let state = sim.run_circuit(&circuit).unwrap();
        assert!((state.norm_sqr() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_run_circuit_from_checks_width() {
        let sim = StatevectorSimulator::default();
        let circuit = Circuit::with_size("c", 2);
        assert!(matches!(
            sim.run_circuit_from(&circuit, Statevector::new(3)),
            Err(SimError::StateSizeMismatch {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn test_sample_intermediate_state() {
        let sim = StatevectorSimulator::default();
        let mut circuit = Circuit::with_size("c", 2);
        circuit.x(QubitId(1)).unwrap();
        let state = sim.run_circuit(&circuit).unwrap();

        let program = attach_measurements(circuit, [(QubitId(1), ClbitId(0))]).unwrap();
        let counts = sim.sample(&state, &program, 10, Some(0)).unwrap();
        assert_eq!(counts.get("1"), 10);
    }
}
