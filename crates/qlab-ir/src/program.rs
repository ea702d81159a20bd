//! Programs: a circuit plus the measurements read out after it.

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::qubit::{ClassicalRegister, ClbitId, QuantumRegister, QubitId};

/// Record the value of `qubit` into classical bit `clbit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measurement {
    /// Measured qubit.
    pub qubit: QubitId,
    /// Destination classical bit.
    pub clbit: ClbitId,
}

impl Measurement {
    /// Create a measurement.
    pub fn new(qubit: impl Into<QubitId>, clbit: impl Into<ClbitId>) -> Self {
        Self {
            qubit: qubit.into(),
            clbit: clbit.into(),
        }
    }
}

/// A circuit together with an ordered list of terminal measurements.
///
/// All measurements are applied after every gate of the circuit. Measuring
/// twice into the same classical bit is allowed; the later measurement wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    circuit: Circuit,
    num_clbits: u32,
    cregs: Vec<ClassicalRegister>,
    measurements: Vec<Measurement>,
}

impl Program {
    /// Wrap a circuit with no classical bits.
    pub fn new(circuit: Circuit) -> Self {
        Self::with_clbits(circuit, 0)
    }

    /// Wrap a circuit with `num_clbits` anonymous classical bits.
    pub fn with_clbits(circuit: Circuit, num_clbits: u32) -> Self {
        Self {
            circuit,
            num_clbits,
            cregs: vec![],
            measurements: vec![],
        }
    }

    /// Allocate a classical register of `size` fresh bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> ClassicalRegister {
        let reg = ClassicalRegister::contiguous(name, self.num_clbits, size);
        self.num_clbits += size;
        self.cregs.push(reg.clone());
        reg
    }

    /// Measure `qubit` into `clbit`.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        if qubit.0 >= self.circuit.num_qubits() {
            return Err(IrError::QubitOutOfRange {
                qubit,
                num_qubits: self.circuit.num_qubits(),
                gate_name: Some("measure".into()),
            });
        }
        if clbit.0 >= self.num_clbits {
            return Err(IrError::ClbitOutOfRange {
                clbit,
                num_clbits: self.num_clbits,
            });
        }
        self.measurements.push(Measurement { qubit, clbit });
        Ok(self)
    }

    /// Measure a quantum register bit-for-bit into a classical register.
    pub fn measure_register(
        &mut self,
        qreg: &QuantumRegister,
        creg: &ClassicalRegister,
    ) -> IrResult<&mut Self> {
        if qreg.len() != creg.len() {
            return Err(IrError::RegisterSizeMismatch {
                qubits: u32::try_from(qreg.len()).unwrap_or(u32::MAX),
                clbits: u32::try_from(creg.len()).unwrap_or(u32::MAX),
            });
        }
        for (qubit, clbit) in qreg.iter().zip(creg.iter()) {
            self.measure(qubit, clbit)?;
        }
        Ok(self)
    }

    /// Measure every qubit into a fresh `meas` register, qubit `i` into its bit `i`.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let n = self.circuit.num_qubits();
        let creg = self.add_creg("meas", n);
        for (i, clbit) in creg.iter().enumerate() {
            self.measure(QubitId::from(i), clbit)?;
        }
        Ok(self)
    }

    /// The underlying circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Consume the program and return its circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// Number of qubits of the underlying circuit.
    pub fn num_qubits(&self) -> u32 {
        self.circuit.num_qubits()
    }

    /// Number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Classical registers allocated through [`Program::add_creg`].
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Measurements in the order they were attached.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Qubits read by at least one measurement, ascending.
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        let mut qubits: Vec<_> = self.measurements.iter().map(|m| m.qubit).collect();
        qubits.sort_unstable();
        qubits.dedup();
        qubits
    }

    /// Every instruction of the program: the circuit's gates, then one
    /// `Measure` per measurement in attachment order.
    pub fn instructions(&self) -> impl Iterator<Item = Instruction> + '_ {
        self.circuit.instructions().iter().cloned().chain(
            self.measurements
                .iter()
                .map(|m| Instruction::measure(m.qubit, m.clbit)),
        )
    }

    /// Serialize the program to JSON for external renderers.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Attach `(qubit, clbit)` measurements to a circuit.
///
/// The program gets `max(clbit) + 1` classical bits.
pub fn attach_measurements(
    circuit: Circuit,
    pairs: impl IntoIterator<Item = (QubitId, ClbitId)>,
) -> IrResult<Program> {
    let pairs: Vec<_> = pairs.into_iter().collect();
    let num_clbits = pairs.iter().map(|(_, c)| c.0 + 1).max().unwrap_or(0);
    let mut program = Program::with_clbits(circuit, num_clbits);
    for (qubit, clbit) in pairs {
        program.measure(qubit, clbit)?;
    }
    Ok(program)
}
