//! Tests for oracle compilation, Grover search and teleportation.

use qlab_algo::{BoolExpr, GroverSearch, Oracle, Teleportation, bell, reference_predicate};
use qlab_ir::{Circuit, QubitId};
use qlab_sim::StatevectorSimulator;

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

#[test]
fn oracle_restores_every_ancilla() {
    let sim = StatevectorSimulator::default();
    let oracle = Oracle::compile(reference_predicate(), 3).unwrap();

    for x in 0u64..8 {
        let mut circuit = Circuit::with_size("restore", oracle.num_qubits());
        for i in 0..3 {
            if (x >> i) & 1 == 1 {
                circuit.x(QubitId(i)).unwrap();
            }
        }
        circuit.extend(oracle.circuit()).unwrap();
        let state = sim.run_circuit(&circuit).unwrap();

        for ancilla in oracle.ancillas() {
            assert!(state.marginal_one(ancilla) < 1e-12, "ancilla {ancilla} on input {x:03b}");
        }
    }
}

#[test]
fn oracle_restores_ancillas_in_superposition() {
    let sim = StatevectorSimulator::default();
    let oracle = Oracle::compile(reference_predicate(), 3).unwrap();
    let search = GroverSearch::new(oracle.clone());

    let mut circuit = search.initialization().unwrap();
    circuit.extend(oracle.circuit()).unwrap();
    let state = sim.run_circuit(&circuit).unwrap();
    for ancilla in oracle.ancillas() {
        assert!(state.marginal_one(ancilla) < 1e-12);
    }
}

#[test]
fn compute_stage_is_mirrored() {
    let oracle = Oracle::compile(reference_predicate(), 3).unwrap();
    let compute = oracle.compute_stage();
    let full = oracle.circuit();
    assert_eq!(full.len(), 2 * compute.len() + 1);
    assert_eq!(
        &full.instructions()[compute.len() + 1..],
        compute.inverse().instructions()
    );
}

// ---------------------------------------------------------------------------
// Grover
// ---------------------------------------------------------------------------

#[test]
fn grover_amplifies_every_single_assignment() {
    let sim = StatevectorSimulator::default();
    for target in 0u64..8 {
        let literals = (0..3u32).map(|i| {
            if (target >> i) & 1 == 1 {
                BoolExpr::var(i)
            } else {
                BoolExpr::not(BoolExpr::var(i))
            }
        });
        let oracle = Oracle::compile(BoolExpr::and(literals), 3).unwrap();
        let report = GroverSearch::new(oracle).run(&sim, 100, Some(target)).unwrap();

        assert_eq!(report.marked, vec![target]);
        assert_eq!(report.iterations, 2);
        assert!(report.success_probability > 0.9, "target {target}");
        assert!((report.success_probability - 0.9453).abs() < 1e-3);
    }
}

// ---------------------------------------------------------------------------
// Bell and teleportation
// ---------------------------------------------------------------------------

#[test]
fn bell_program_thousand_shots() {
    let sim = StatevectorSimulator::default();
    let counts = sim
        .run_shots(&bell::bell_program(false, false).unwrap(), 1000, Some(1))
        .unwrap();
    assert_eq!(counts.total(), 1000);
    assert_eq!(counts.get("01") + counts.get("10"), 0);
}

#[test]
fn teleportation_marginal_converges() {
    let sim = StatevectorSimulator::default();
    let amp = std::f64::consts::FRAC_1_SQRT_2;
    let teleport = Teleportation::new(amp, amp).unwrap();
    let counts = sim
        .run_shots(&teleport.program().unwrap(), 10_000, Some(2))
        .unwrap();
    let [p0, p1] = Teleportation::receiver_marginal(&counts);
    assert!((p0 - 0.5).abs() < 0.03);
    assert!((p1 - 0.5).abs() < 0.03);
}
