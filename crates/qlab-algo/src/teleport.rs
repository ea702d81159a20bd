//! Teleportation of a real single-qubit state.

use tracing::debug;

use qlab_ir::{Circuit, ClbitId, Program, QubitId, attach_measurements};
use qlab_sim::OutcomeHistogram;

use crate::error::{AlgoError, AlgoResult};

/// Allowed deviation of `α² + β²` from 1.
pub const STATE_TOLERANCE: f64 = 1e-5;

/// Rotate `qubit` from |0⟩ into `α|0⟩ + β|1⟩`.
///
/// The angle is `2·acos(α)`, negated when `β < 0`. Nothing is appended if
/// the amplitudes are not normalized.
pub fn prepare_state(circuit: &mut Circuit, qubit: QubitId, alpha: f64, beta: f64) -> AlgoResult<()> {
    let theta = preparation_angle(alpha, beta)?;
    circuit.ry(theta, qubit)?;
    Ok(())
}

fn preparation_angle(alpha: f64, beta: f64) -> AlgoResult<f64> {
    let norm_sqr = alpha * alpha + beta * beta;
    if !norm_sqr.is_finite() || (norm_sqr - 1.0).abs() > STATE_TOLERANCE {
        return Err(AlgoError::InvalidStateParameters {
            alpha,
            beta,
            norm_sqr,
        });
    }
    let theta = 2.0 * alpha.clamp(-1.0, 1.0).acos();
    Ok(if beta < 0.0 { -theta } else { theta })
}

/// Three-qubit teleportation: `q0` holds the state, `q1`/`q2` share an EPR
/// pair, and `q2` receives the state.
///
/// Corrections are the coherent `CX(q1, q2)` and `CZ(q0, q2)`. All
/// measurements come after them, so each shot's receiver bit is distributed
/// exactly as with classically controlled corrections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teleportation {
    alpha: f64,
    beta: f64,
}

impl Teleportation {
    /// Teleport `α|0⟩ + β|1⟩`.
    pub fn new(alpha: f64, beta: f64) -> AlgoResult<Self> {
        preparation_angle(alpha, beta)?;
        Ok(Self { alpha, beta })
    }

    /// Amplitude of |0⟩.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Amplitude of |1⟩.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Expected receiver distribution `[α², β²]`.
    pub fn expected_marginal(&self) -> [f64; 2] {
        let norm = self.alpha * self.alpha + self.beta * self.beta;
        [self.alpha * self.alpha / norm, self.beta * self.beta / norm]
    }

    /// Preparation, Bell-basis rotation and corrections.
    pub fn circuit(&self) -> AlgoResult<Circuit> {
        let (source, sender, receiver) = (QubitId(0), QubitId(1), QubitId(2));
        let mut circuit = Circuit::with_size("teleport", 3);

        prepare_state(&mut circuit, source, self.alpha, self.beta)?;
        circuit.barrier_all()?;
        circuit.h(sender)?.cx(sender, receiver)?;
        circuit.barrier_all()?;
        circuit.cx(source, sender)?.h(source)?;
        circuit.barrier_all()?;
        circuit.cx(sender, receiver)?.cz(source, receiver)?;
        Ok(circuit)
    }

    /// The circuit with qubit `i` measured into classical bit `i`.
    pub fn program(&self) -> AlgoResult<Program> {
        let pairs = (0..3).map(|i| (QubitId(i), ClbitId(i)));
        Ok(attach_measurements(self.circuit()?, pairs)?)
    }

    /// Observed receiver distribution `[P(0), P(1)]` from a histogram of
    /// [`Teleportation::program`].
    pub fn receiver_marginal(histogram: &OutcomeHistogram) -> [f64; 2] {
        let [zeros, ones] = histogram.marginal(2);
        let total = (zeros + ones) as f64;
        if total == 0.0 {
            return [0.0, 0.0];
        }
        let marginal = [zeros as f64 / total, ones as f64 / total];
        debug!("Receiver marginal: {:?}", marginal);
        marginal
    }
}
