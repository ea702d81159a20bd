//! Tests for circuit composition, inversion and measurement attachment.

use proptest::prelude::*;

use qlab_ir::{
    Circuit, ClbitId, Gate, Instruction, IrError, QubitId, attach_measurements, compose, invert,
};

fn random_circuit(num_qubits: u32, ops: &[(u8, u32, u32, f64)]) -> Circuit {
    let mut circuit = Circuit::with_size("random", num_qubits);
    for &(kind, a, b, theta) in ops {
        let qa = QubitId(a % num_qubits);
        let qb = QubitId(b % num_qubits);
        let _ = match kind % 4 {
            0 => circuit.h(qa),
            1 => circuit.ry(theta, qa),
            2 if qa != qb => circuit.cx(qa, qb),
            3 if qa != qb => circuit.cz(qa, qb),
            _ => circuit.x(qa),
        };
    }
    circuit
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

#[test]
fn compose_widens_to_highest_mapped_index() {
    let bell = Circuit::bell().unwrap();
    let out = compose(&Circuit::with_size("base", 1), &bell, &[QubitId(0), QubitId(6)]).unwrap();
    assert_eq!(out.num_qubits(), 7);
    assert_eq!(out.instructions()[1].qubits, vec![QubitId(0), QubitId(6)]);
}

#[test]
fn compose_keeps_wider_base() {
    let bell = Circuit::bell().unwrap();
    let out = compose(&Circuit::with_size("base", 10), &bell, &[QubitId(1), QubitId(0)]).unwrap();
    assert_eq!(out.num_qubits(), 10);
}

#[test]
fn extend_uses_identity_map() {
    let mut circuit = Circuit::with_size("main", 2);
    circuit.extend(&Circuit::bell().unwrap()).unwrap();
    assert_eq!(circuit.instructions(), Circuit::bell().unwrap().instructions());
}

#[test]
fn compute_uncompute_pattern() {
    let mut compute = Circuit::with_size("compute", 3);
    compute
        .x(QubitId(0))
        .unwrap()
        .ccx(QubitId(0), QubitId(1), QubitId(2))
        .unwrap()
        .x(QubitId(0))
        .unwrap();

    let mut full = Circuit::with_size("oracle", 4);
    full.extend(&compute).unwrap();
    full.cx(QubitId(2), QubitId(3)).unwrap();
    full.extend(&invert(&compute)).unwrap();

    let names: Vec<_> = full.instructions().iter().map(Instruction::name).collect();
    assert_eq!(names, vec!["x", "ccx", "x", "cx", "x", "ccx", "x"]);
}

#[test]
fn construction_errors_leave_circuit_untouched() {
    let mut circuit = Circuit::with_size("c", 3);
    circuit.h(QubitId(0)).unwrap();

    assert!(circuit.x(QubitId(3)).is_err());
    assert!(circuit.cz(QubitId(1), QubitId(1)).is_err());
    assert!(
        circuit
            .append(Instruction::gate(Gate::MCX { num_controls: 3 }, [QubitId(0)]))
            .is_err()
    );
    assert_eq!(circuit.len(), 1);
}

#[test]
fn attach_measurements_rejects_unknown_qubit() {
    let err = attach_measurements(Circuit::with_size("c", 2), [(QubitId(2), ClbitId(0))])
        .unwrap_err();
    assert!(matches!(err, IrError::QubitOutOfRange { .. }));
    assert!(err.to_string().contains("q2"));
}

#[test]
fn program_json_export() {
    let program =
        attach_measurements(Circuit::bell().unwrap(), [(QubitId(0), ClbitId(0))]).unwrap();
    let json = program.to_json().unwrap();
    assert!(json.contains("\"measurements\""));
    assert!(json.contains("\"bell\""));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn double_inverse_is_identity(
        ops in proptest::collection::vec((0u8..5, 0u32..4, 0u32..4, -3.0f64..3.0), 0..40)
    ) {
        let circuit = random_circuit(4, &ops);
        let twice = circuit.inverse().inverse();
        prop_assert_eq!(twice.instructions(), circuit.instructions());
    }

    #[test]
    fn inverse_preserves_counts(
        ops in proptest::collection::vec((0u8..5, 0u32..4, 0u32..4, -3.0f64..3.0), 0..40)
    ) {
        let circuit = random_circuit(4, &ops);
        let inv = circuit.inverse();
        prop_assert_eq!(inv.len(), circuit.len());
        prop_assert_eq!(inv.count_ops(), circuit.count_ops());
        prop_assert_eq!(inv.depth(), circuit.depth());
    }

    #[test]
    fn compose_appends_every_instruction(
        ops in proptest::collection::vec((0u8..5, 0u32..3, 0u32..3, -3.0f64..3.0), 0..20),
        offset in 0u32..5,
    ) {
        let sub = random_circuit(3, &ops);
        let map: Vec<_> = (0..3).map(|q| QubitId(q + offset)).collect();
        let out = compose(&Circuit::with_size("base", 1), &sub, &map).unwrap();
        prop_assert_eq!(out.len(), sub.len());
        prop_assert_eq!(out.num_qubits(), (offset + 3).max(1));
    }
}
