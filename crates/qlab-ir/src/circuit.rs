//! High-level circuit builder API.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{QuantumRegister, QubitId};

/// A quantum circuit: an ordered list of gates and barriers over a fixed
/// number of qubits.
///
/// Every append is validated (operand range, arity, disjoint operands), so
/// a `Circuit` that exists is always well formed. Circuits are combined by
/// [`Circuit::compose`] and undone by [`Circuit::inverse`]; measurements are
/// attached separately through [`Program`](crate::Program).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Named registers allocated through [`Circuit::add_qreg`].
    registers: Vec<QuantumRegister>,
    /// Gate and barrier instructions in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits: 0,
            registers: vec![],
            instructions: vec![],
        }
    }

    /// Create a circuit over `num_qubits` qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        let mut circuit = Self::new(name);
        circuit.num_qubits = num_qubits;
        circuit
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.num_qubits);
        self.num_qubits += 1;
        id
    }

    /// Add a quantum register of `size` fresh qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> QuantumRegister {
        let reg = QuantumRegister::contiguous(name, self.num_qubits, size);
        self.num_qubits += size;
        self.registers.push(reg.clone());
        reg
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(Gate::X, qubit))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(Gate::H, qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(Gate::Ry(theta), qubit))
    }

    // =========================================================================
    // Controlled gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(Gate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(Gate::CZ, control, target))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::gate(Gate::CCX, [c1, c2, target]))
    }

    /// Apply X to `target` controlled by every qubit in `controls`.
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        let gate = Gate::mcx(u32::try_from(controls.len()).unwrap_or(u32::MAX));
        let qubits = controls.iter().copied().chain(std::iter::once(target));
        self.append(Instruction::gate(gate, qubits))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.append(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits).map(QubitId).collect();
        self.append(Instruction::barrier(qubits))
    }

    /// Validate and append an instruction.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let got = u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX);
                if got != gate.num_qubits() {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().into(),
                        expected: gate.num_qubits(),
                        got,
                    });
                }
                if let Some(angle) = gate.parameter() {
                    if !angle.is_finite() {
                        return Err(IrError::NonFiniteAngle {
                            gate_name: gate.name().into(),
                            angle,
                        });
                    }
                }
                Some(gate.name())
            }
            InstructionKind::Barrier => None,
            InstructionKind::Measure => {
                return Err(IrError::MeasurementInCircuit {
                    circuit: self.name.clone(),
                    qubit: instruction.qubits.first().copied().unwrap_or(QubitId(0)),
                });
            }
        };

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name: gate_name.map(String::from),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.map(String::from),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Splice `sub` onto the end of this circuit.
    ///
    /// Qubit `i` of `sub` becomes `map[i]` here. The map must have exactly one
    /// entry per qubit of `sub` and no repeated entries. If the map names
    /// qubits beyond this circuit's width, the circuit grows to
    /// `max(map) + 1` qubits.
    pub fn compose(&mut self, sub: &Circuit, map: &[QubitId]) -> IrResult<&mut Self> {
        let got = u32::try_from(map.len()).unwrap_or(u32::MAX);
        if got != sub.num_qubits {
            return Err(IrError::IndexMapMismatch {
                circuit: sub.name.clone(),
                expected: sub.num_qubits,
                got,
            });
        }

        let mut seen = FxHashSet::default();
        for &qubit in map {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: None,
                });
            }
        }

        // A deserialized sub-circuit may reference qubits past its width.
        let mut remapped = Vec::with_capacity(sub.instructions.len());
        for inst in &sub.instructions {
            let Some(mapped) = inst.remap(map) else {
                let qubit = inst
                    .qubits
                    .iter()
                    .copied()
                    .find(|q| q.index() >= map.len())
                    .unwrap_or(QubitId(sub.num_qubits));
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    num_qubits: sub.num_qubits,
                    gate_name: Some(inst.name().to_string()),
                });
            };
            remapped.push(mapped);
        }

        if let Some(max) = map.iter().map(|q| q.0).max() {
            self.num_qubits = self.num_qubits.max(max + 1);
        }
        self.instructions.extend(remapped);
        Ok(self)
    }

    /// Splice `sub` onto the end of this circuit with the identity map.
    pub fn extend(&mut self, sub: &Circuit) -> IrResult<&mut Self> {
        let map: Vec<_> = (0..sub.num_qubits).map(QubitId).collect();
        self.compose(sub, &map)
    }

    /// The structural inverse: instructions reversed, each replaced by its inverse.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            name: format!("{}_dg", self.name),
            num_qubits: self.num_qubits,
            registers: self.registers.clone(),
            instructions: self.instructions.iter().rev().map(Instruction::inverse).collect(),
        }
    }

    /// This circuit's instructions repeated `times` times.
    pub fn repeat(&self, times: usize) -> IrResult<Self> {
        let len = self
            .instructions
            .len()
            .checked_mul(times)
            .filter(|&len| len <= isize::MAX as usize / size_of::<Instruction>())
            .ok_or_else(|| IrError::RepeatOverflow {
                circuit: self.name.clone(),
                instructions: self.instructions.len(),
                times,
            })?;
        let mut instructions = Vec::with_capacity(len);
        for _ in 0..times {
            instructions.extend(self.instructions.iter().cloned());
        }
        Ok(Self {
            name: format!("{}^{times}", self.name),
            num_qubits: self.num_qubits,
            registers: self.registers.clone(),
            instructions,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Registers allocated through [`Circuit::add_qreg`].
    pub fn registers(&self) -> &[QuantumRegister] {
        &self.registers
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions, barriers included.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of gate instructions.
    pub fn gate_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Instruction counts keyed by name.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Circuit depth: the longest chain of gates sharing a qubit.
    ///
    /// Barriers contribute no layer but align every qubit they cover.
    pub fn depth(&self) -> usize {
        let mut levels = vec![0usize; self.num_qubits as usize];
        for inst in &self.instructions {
            let current = inst
                .qubits
                .iter()
                .map(|q| levels[q.index()])
                .max()
                .unwrap_or(0);
            let next = if inst.is_gate() { current + 1 } else { current };
            for q in &inst.qubits {
                levels[q.index()] = next;
            }
        }
        levels.into_iter().max().unwrap_or(0)
    }

    /// Serialize the circuit to JSON for external renderers.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell pair circuit: `H(q0); CX(q0, q1)`.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(circuit)
    }
}

/// Return a new circuit equal to `base` followed by `sub` remapped through `map`.
pub fn compose(base: &Circuit, sub: &Circuit, map: &[QubitId]) -> IrResult<Circuit> {
    let mut out = base.clone();
    out.compose(sub, map)?;
    Ok(out)
}

/// Return the structural inverse of `circuit`.
pub fn invert(circuit: &Circuit) -> Circuit {
    circuit.inverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let a = circuit.add_qreg("a", 4);
        let b = circuit.add_qreg("b", 2);

        assert_eq!(a.qubit(0), QubitId(0));
        assert_eq!(b.qubit(0), QubitId(4));
        assert_eq!(circuit.num_qubits(), 6);
        assert_eq!(circuit.registers().len(), 2);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 3);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .ccx(QubitId(0), QubitId(1), QubitId(2))
            .unwrap();

        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut circuit = Circuit::with_size("test", 2);
        let err = circuit.cx(QubitId(0), QubitId(2)).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitOutOfRange {
                qubit: QubitId(2),
                num_qubits: 2,
                ..
            }
        ));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_duplicate_operand_rejected() {
        let mut circuit = Circuit::with_size("test", 3);
        let err = circuit.ccx(QubitId(0), QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_arity_checked_on_append() {
        let mut circuit = Circuit::with_size("test", 3);
        let inst = Instruction::gate(Gate::CCX, [QubitId(0), QubitId(1)]);
        assert!(matches!(
            circuit.append(inst),
            Err(IrError::QubitCountMismatch {
                expected: 3,
                got: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_measure_rejected_in_circuit() {
        let mut circuit = Circuit::with_size("test", 1);
        let inst = Instruction::measure(QubitId(0), crate::ClbitId(0));
        assert!(matches!(
            circuit.append(inst),
            Err(IrError::MeasurementInCircuit { .. })
        ));
    }

    #[test]
    fn test_non_finite_angle_rejected() {
        let mut circuit = Circuit::with_size("test", 1);
        assert!(matches!(
            circuit.ry(f64::NAN, QubitId(0)),
            Err(IrError::NonFiniteAngle { .. })
        ));
    }

    #[test]
    fn test_mcx_picks_named_gate() {
        let mut circuit = Circuit::with_size("test", 5);
        circuit.mcx(&[QubitId(0), QubitId(1)], QubitId(4)).unwrap();
        circuit
            .mcx(&[QubitId(0), QubitId(1), QubitId(2), QubitId(3)], QubitId(4))
            .unwrap();
        let names: Vec<_> = circuit.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, vec!["ccx", "mcx"]);
    }

    #[test]
    fn test_compose_remaps_and_grows() {
        let mut sub = Circuit::with_size("sub", 2);
        sub.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();

        let base = Circuit::with_size("base", 2);
        let out = compose(&base, &sub, &[QubitId(3), QubitId(1)]).unwrap();

        assert_eq!(out.num_qubits(), 4);
        assert_eq!(out.instructions()[0].qubits, vec![QubitId(3)]);
        assert_eq!(out.instructions()[1].qubits, vec![QubitId(3), QubitId(1)]);
        // base is untouched
        assert!(base.is_empty());
    }

    #[test]
    fn test_compose_rejects_bad_maps() {
        let sub = Circuit::with_size("sub", 2);
        let mut base = Circuit::with_size("base", 2);
        assert!(matches!(
            base.compose(&sub, &[QubitId(0)]),
            Err(IrError::IndexMapMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
        assert!(matches!(
            base.compose(&sub, &[QubitId(1), QubitId(1)]),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_inverse_reverses_and_negates() {
        let mut circuit = Circuit::with_size("prep", 2);
        circuit
            .ry(PI / 3.0, QubitId(0))
            .unwrap()
            .barrier_all()
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();

        let inv = invert(&circuit);
        assert_eq!(inv.name(), "prep_dg");
        let names: Vec<_> = inv.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, vec!["cx", "barrier", "ry"]);
        assert_eq!(inv.instructions()[2].as_gate(), Some(&Gate::Ry(-PI / 3.0)));
        assert_eq!(inv.inverse().instructions(), circuit.instructions());
    }

    #[test]
    fn test_repeat() {
        let bell = Circuit::bell().unwrap();
        let twice = bell.repeat(2).unwrap();
        assert_eq!(twice.len(), 4);
        assert_eq!(twice.gate_count(), 4);
        assert!(bell.repeat(0).unwrap().is_empty());
    }

    #[test]
    fn test_repeat_overflow() {
        let bell = Circuit::bell().unwrap();
        assert!(matches!(
            bell.repeat(usize::MAX / 2),
            Err(IrError::RepeatOverflow { instructions: 2, .. })
        ));
    }

    #[test]
    fn test_compose_rejects_unmappable_instruction() {
        // Deserialization skips validation, so the width can be understated.
        let mut wide = Circuit::with_size("wide", 2);
        wide.cx(QubitId(0), QubitId(1)).unwrap();
        let mut value = serde_json::to_value(&wide).unwrap();
        value["num_qubits"] = serde_json::json!(1);
        let narrow: Circuit = serde_json::from_value(value).unwrap();

        let mut base = Circuit::with_size("base", 1);
        base.h(QubitId(0)).unwrap();
        assert!(matches!(
            base.compose(&narrow, &[QubitId(0)]),
            Err(IrError::QubitOutOfRange {
                qubit: QubitId(1),
                num_qubits: 1,
                ..
            })
        ));
        assert_eq!(base.len(), 1);
        assert_eq!(base.num_qubits(), 1);
    }

    #[test]
    fn test_depth_ignores_barriers() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .barrier_all()
            .unwrap()
            .h(QubitId(1))
            .unwrap();
        // The barrier aligns q1 with q0, so the second H lands in layer 2.
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_count_ops() {
        let circuit = Circuit::bell().unwrap();
        let ops = circuit.count_ops();
        assert_eq!(ops.get("h"), Some(&1));
        assert_eq!(ops.get("cx"), Some(&1));
    }

    #[test]
    fn test_json_export() {
        let circuit = Circuit::bell().unwrap();
        let json = circuit.to_json().unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
