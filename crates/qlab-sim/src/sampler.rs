//! Shot sampling from a final statevector.

use rand::Rng;

use qlab_ir::{Measurement, Program};

use crate::histogram::OutcomeHistogram;
use crate::statevector::Statevector;

/// Draws measurement outcomes for a program from a fixed statevector.
///
/// The cumulative distribution is built once; each shot is then a single
/// uniform draw and a binary search. A drawn basis index is projected onto
/// the program's classical bits by applying its measurements in order, so a
/// later measurement into the same bit overwrites an earlier one.
#[derive(Debug, Clone)]
pub struct MeasurementSampler {
    cdf: Vec<f64>,
    measurements: Vec<Measurement>,
    num_clbits: usize,
}

impl MeasurementSampler {
    /// Build a sampler for `program`'s measurements over `state`.
    pub fn new(state: &Statevector, program: &Program) -> Self {
        let mut cumulative = 0.0;
        let cdf = state
            .amplitudes()
            .iter()
            .map(|a| {
                cumulative += a.norm_sqr();
                cumulative
            })
            .collect();
        Self {
            cdf,
            measurements: program.measurements().to_vec(),
            num_clbits: program.num_clbits() as usize,
        }
    }

    /// Draw one full basis index.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let total = self.cdf.last().copied().unwrap_or(0.0);
        let u = rng.r#gen::<f64>() * total;
        // First index whose cumulative weight exceeds u; zero-weight entries
        // share their predecessor's value and are never selected.
        self.cdf
            .partition_point(|&c| c <= u)
            .min(self.cdf.len().saturating_sub(1))
    }

    /// Project a basis index onto the classical bits, bit 0 rightmost.
    pub fn project(&self, basis_index: usize) -> String {
        let mut bits = vec![b'0'; self.num_clbits];
        for m in &self.measurements {
            let Some(pos) = self.num_clbits.checked_sub(m.clbit.index() + 1) else {
                continue;
            };
            bits[pos] = if (basis_index >> m.qubit.index()) & 1 == 1 {
                b'1'
            } else {
                b'0'
            };
        }
        bits.into_iter().map(char::from).collect()
    }

    /// Draw `shots` samples and aggregate them.
    pub fn sample<R: Rng + ?Sized>(&self, shots: u32, rng: &mut R) -> OutcomeHistogram {
        let mut histogram = OutcomeHistogram::new();
        for _ in 0..shots {
            let outcome = self.draw(rng);
            histogram.insert(self.project(outcome), 1);
        }
        histogram
    }
}
