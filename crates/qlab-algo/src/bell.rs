//! Bell pair preparation over every computational-basis input.

use qlab_ir::{Circuit, Program, QubitId};

use crate::error::AlgoResult;

/// Program preparing `|q1 q0⟩`, entangling it with `H(q0); CX(q0, q1)`,
/// and measuring both qubits (qubit `i` into classical bit `i`).
pub fn bell_program(q0: bool, q1: bool) -> AlgoResult<Program> {
    let label = format!("{}{}", u8::from(q1), u8::from(q0));
    let mut circuit = Circuit::with_size(format!("bell_{label}"), 2);
    if q0 {
        circuit.x(QubitId(0))?;
    }
    if q1 {
        circuit.x(QubitId(1))?;
    }
    circuit.barrier_all()?;
    circuit.extend(&Circuit::bell()?)?;

    let mut program = Program::new(circuit);
    program.measure_all()?;
    Ok(program)
}

/// The four Bell programs for inputs `00`, `01`, `10` and `11`.
pub fn all_bell_programs() -> AlgoResult<Vec<Program>> {
    [(false, false), (true, false), (false, true), (true, true)]
        .into_iter()
        .map(|(q0, q1)| bell_program(q0, q1))
        .collect()
}
