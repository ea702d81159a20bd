//! Qubit and classical bit indices, and the registers that group them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Bit position of this qubit in a statevector basis index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// Index of a classical bit within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// Position of this bit in a classical outcome word.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

impl From<usize> for ClbitId {
    fn from(id: usize) -> Self {
        ClbitId(u32::try_from(id).expect("ClbitId overflow: exceeds u32::MAX"))
    }
}

/// A named, ordered group of qubits.
///
/// Registers are little-endian: `qubit(0)` carries the least significant
/// bit when the register encodes an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantumRegister {
    name: String,
    qubits: Vec<QubitId>,
}

impl QuantumRegister {
    /// Create a register over explicit qubit indices.
    pub fn new(name: impl Into<String>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            name: name.into(),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a register over `size` contiguous qubits starting at `start`.
    pub fn contiguous(name: impl Into<String>, start: u32, size: u32) -> Self {
        Self::new(name, (start..start + size).map(QubitId))
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits in the register.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Whether the register is empty.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// The `i`-th qubit of the register.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn qubit(&self, i: usize) -> QubitId {
        self.qubits[i]
    }

    /// The `i`-th qubit, or `None` past the end.
    pub fn get(&self, i: usize) -> Option<QubitId> {
        self.qubits.get(i).copied()
    }

    /// All qubits in register order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Iterate over the register's qubits.
    pub fn iter(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().copied()
    }

    /// Read the register's value out of a statevector basis index.
    pub fn decode(&self, basis_index: usize) -> u64 {
        self.qubits
            .iter()
            .enumerate()
            .fold(0u64, |acc, (bit, q)| {
                acc | ((((basis_index >> q.index()) & 1) as u64) << bit)
            })
    }
}

impl fmt::Display for QuantumRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.qubits.len())
    }
}

/// A named, ordered group of classical bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassicalRegister {
    name: String,
    clbits: Vec<ClbitId>,
}

impl ClassicalRegister {
    /// Create a register over `size` contiguous classical bits starting at `start`.
    pub fn contiguous(name: impl Into<String>, start: u32, size: u32) -> Self {
        Self {
            name: name.into(),
            clbits: (start..start + size).map(ClbitId).collect(),
        }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bits in the register.
    pub fn len(&self) -> usize {
        self.clbits.len()
    }

    /// Whether the register is empty.
    pub fn is_empty(&self) -> bool {
        self.clbits.is_empty()
    }

    /// The `i`-th classical bit of the register.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn clbit(&self, i: usize) -> ClbitId {
        self.clbits[i]
    }

    /// All bits in register order.
    pub fn clbits(&self) -> &[ClbitId] {
        &self.clbits
    }

    /// Iterate over the register's bits.
    pub fn iter(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.clbits.iter().copied()
    }
}

impl fmt::Display for ClassicalRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.clbits.len())
    }
}
