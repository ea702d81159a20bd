//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::Gate;
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit or program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary gate.
    Gate(Gate),
    /// Synchronization point with no numeric effect.
    Barrier,
    /// Measurement of one qubit into one classical bit.
    Measure,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubit operands. For gates: controls first, target last.
    pub qubits: Vec<QubitId>,
    /// Classical bits written (measurements only).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: Gate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: Gate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: Gate, control: QubitId, target: QubitId) -> Self {
        Self::gate(gate, [control, target])
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Control qubits (empty for non-gates and uncontrolled gates).
    pub fn controls(&self) -> &[QubitId] {
        match &self.kind {
            InstructionKind::Gate(g) => &self.qubits[..self.split_point(g)],
            _ => &[],
        }
    }

    /// Target qubits. For barriers and measurements this is every operand.
    pub fn targets(&self) -> &[QubitId] {
        match &self.kind {
            InstructionKind::Gate(g) => &self.qubits[self.split_point(g)..],
            _ => &self.qubits,
        }
    }

    fn split_point(&self, gate: &Gate) -> usize {
        (gate.num_controls() as usize).min(self.qubits.len())
    }

    /// The inverse instruction. Barriers and measurements are returned unchanged.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match &self.kind {
            InstructionKind::Gate(g) => Self {
                kind: InstructionKind::Gate(g.inverse()),
                qubits: self.qubits.clone(),
                clbits: self.clbits.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Translate every qubit operand through `map` (`map[old] = new`).
    ///
    /// Returns `None` if an operand has no entry in the map.
    pub fn remap(&self, map: &[QubitId]) -> Option<Self> {
        let qubits = self
            .qubits
            .iter()
            .map(|q| map.get(q.index()).copied())
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            kind: self.kind.clone(),
            qubits,
            clbits: self.clbits.clone(),
        })
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Barrier => "barrier",
            InstructionKind::Measure => "measure",
        }
    }
}
