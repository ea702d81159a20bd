//! Boolean predicates compiled into reversible phase-kickback oracles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use qlab_ir::{Circuit, QubitId};

use crate::error::{AlgoError, AlgoResult};

/// A boolean expression over input variables `q0, q1, ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolExpr {
    /// Input variable by index.
    Var(u32),
    /// Negation.
    Not(Box<BoolExpr>),
    /// Conjunction of one or more terms.
    And(Vec<BoolExpr>),
    /// Disjunction of one or more terms.
    Or(Vec<BoolExpr>),
}

impl BoolExpr {
    /// Input variable `i`.
    pub fn var(i: u32) -> Self {
        BoolExpr::Var(i)
    }

    /// Negation of `expr`.
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: BoolExpr) -> Self {
        BoolExpr::Not(Box::new(expr))
    }

    /// Conjunction of `terms`.
    pub fn and(terms: impl IntoIterator<Item = BoolExpr>) -> Self {
        BoolExpr::And(terms.into_iter().collect())
    }

    /// Disjunction of `terms`.
    pub fn or(terms: impl IntoIterator<Item = BoolExpr>) -> Self {
        BoolExpr::Or(terms.into_iter().collect())
    }

    /// Evaluate with variable `i` read from bit `i` of `assignment`.
    pub fn evaluate(&self, assignment: u64) -> bool {
        match self {
            BoolExpr::Var(i) => (assignment >> i) & 1 == 1,
            BoolExpr::Not(e) => !e.evaluate(assignment),
            BoolExpr::And(terms) => terms.iter().all(|t| t.evaluate(assignment)),
            BoolExpr::Or(terms) => terms.iter().any(|t| t.evaluate(assignment)),
        }
    }

    /// Highest variable index used, if any.
    pub fn max_var(&self) -> Option<u32> {
        match self {
            BoolExpr::Var(i) => Some(*i),
            BoolExpr::Not(e) => e.max_var(),
            BoolExpr::And(terms) | BoolExpr::Or(terms) => {
                terms.iter().filter_map(BoolExpr::max_var).max()
            }
        }
    }
}

impl fmt::Display for BoolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter<'_>, terms: &[BoolExpr], op: &str| {
            write!(f, "(")?;
            for (i, t) in terms.iter().enumerate() {
                if i > 0 {
                    write!(f, " {op} ")?;
                }
                write!(f, "{t}")?;
            }
            write!(f, ")")
        };
        match self {
            BoolExpr::Var(i) => write!(f, "q{i}"),
            BoolExpr::Not(e) => write!(f, "¬{e}"),
            BoolExpr::And(terms) => join(f, terms, "&"),
            BoolExpr::Or(terms) => join(f, terms, "|"),
        }
    }
}

/// The three-variable predicate `(q0 | ¬q1) & (¬q0 | q1 | q2) & (q0 | q2)`.
pub fn reference_predicate() -> BoolExpr {
    let q = BoolExpr::var;
    BoolExpr::and([
        BoolExpr::or([q(0), BoolExpr::not(q(1))]),
        BoolExpr::or([BoolExpr::not(q(0)), q(1), q(2)]),
        BoolExpr::or([q(0), q(2)]),
    ])
}

/// A compiled oracle.
///
/// Layout: inputs on `0..n`, the workspace qubit on `n`, ancillas after it.
/// The circuit computes every AND/OR node into its own ancilla, XORs the
/// root into the workspace, then runs the inverse of the compute stage so
/// every ancilla returns to |0⟩. With the workspace prepared in |−⟩ the
/// net effect is a phase of -1 on satisfying inputs.
#[derive(Debug, Clone)]
pub struct Oracle {
    expr: BoolExpr,
    num_inputs: u32,
    num_ancillas: u32,
    compute: Circuit,
    circuit: Circuit,
}

impl Oracle {
    /// Compile `expr` over `num_inputs` input qubits.
    pub fn compile(expr: BoolExpr, num_inputs: u32) -> AlgoResult<Self> {
        if num_inputs == 0 || num_inputs > 63 {
            return Err(AlgoError::InvalidExpression(format!(
                "input count must be between 1 and 63, got {num_inputs}"
            )));
        }
        if let Some(max) = expr.max_var() {
            if max >= num_inputs {
                return Err(AlgoError::InvalidExpression(format!(
                    "variable q{max} exceeds {num_inputs} inputs"
                )));
            }
        }

        let workspace = QubitId(num_inputs);
        let mut compute = Circuit::with_size("oracle_compute", num_inputs + 1);
        let (root, negated) = stage(&mut compute, &expr)?;
        let num_ancillas = compute.num_qubits() - num_inputs - 1;

        let mut circuit = compute.clone().with_name("oracle");
        circuit.cx(root, workspace)?;
        if negated {
            circuit.x(workspace)?;
        }
        circuit.extend(&compute.inverse())?;

        debug!(
            "Compiled oracle for {expr}: {num_ancillas} ancillas, {} gates",
            circuit.gate_count()
        );
        Ok(Self {
            expr,
            num_inputs,
            num_ancillas,
            compute,
            circuit,
        })
    }

    /// The compiled predicate.
    pub fn expr(&self) -> &BoolExpr {
        &self.expr
    }

    /// Number of input qubits.
    pub fn num_inputs(&self) -> u32 {
        self.num_inputs
    }

    /// Number of ancillas used to stage sub-expressions.
    pub fn num_ancillas(&self) -> u32 {
        self.num_ancillas
    }

    /// Total width: inputs, workspace and ancillas.
    pub fn num_qubits(&self) -> u32 {
        self.num_inputs + 1 + self.num_ancillas
    }

    /// Input qubits in variable order.
    pub fn inputs(&self) -> Vec<QubitId> {
        (0..self.num_inputs).map(QubitId).collect()
    }

    /// The qubit flipped for satisfying inputs.
    pub fn workspace(&self) -> QubitId {
        QubitId(self.num_inputs)
    }

    /// Ancilla qubits.
    pub fn ancillas(&self) -> Vec<QubitId> {
        (self.num_inputs + 1..self.num_qubits()).map(QubitId).collect()
    }

    /// The compute stage alone, without the workspace flip or uncompute.
    pub fn compute_stage(&self) -> &Circuit {
        &self.compute
    }

    /// The full oracle circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Every input assignment satisfying the predicate, ascending.
    pub fn marked_assignments(&self) -> Vec<u64> {
        (0..1u64 << self.num_inputs)
            .filter(|&x| self.expr.evaluate(x))
            .collect()
    }
}

/// Stage `expr` into `circuit`, returning the qubit holding its value and
/// whether that qubit holds the negation.
fn stage(circuit: &mut Circuit, expr: &BoolExpr) -> AlgoResult<(QubitId, bool)> {
    match expr {
        BoolExpr::Var(i) => Ok((QubitId(*i), false)),
        BoolExpr::Not(e) => {
            let (q, negated) = stage(circuit, e)?;
            Ok((q, !negated))
        }
        BoolExpr::And(terms) => stage_conjunction(circuit, terms, false),
        // De Morgan: a | b = ¬(¬a & ¬b)
        BoolExpr::Or(terms) => stage_conjunction(circuit, terms, true),
    }
}

/// Stage an AND of `terms` (or an OR when `de_morgan` is set) into a fresh ancilla.
fn stage_conjunction(
    circuit: &mut Circuit,
    terms: &[BoolExpr],
    de_morgan: bool,
) -> AlgoResult<(QubitId, bool)> {
    match terms {
        [] => {
            return Err(AlgoError::InvalidExpression(
                "AND/OR needs at least one term".into(),
            ));
        }
        [single] => return stage(circuit, single),
        _ => {}
    }

    // Control polarity per qubit: `true` means the control must read 0.
    let mut controls: BTreeMap<QubitId, bool> = BTreeMap::new();
    let mut contradiction = false;
    for term in terms {
        let (q, negated) = stage(circuit, term)?;
        let flip = negated != de_morgan;
        match controls.insert(q, flip) {
            Some(prev) if prev != flip => contradiction = true,
            _ => {}
        }
    }

    let ancilla = circuit.add_qubit();
    if contradiction {
        // x & ¬x is never true; the ancilla stays |0⟩.
        return Ok((ancilla, de_morgan));
    }

    let flipped: Vec<_> = controls
        .iter()
        .filter(|&(_, &flip)| flip)
        .map(|(&q, _)| q)
        .collect();
    let qubits: Vec<_> = controls.keys().copied().collect();

    for &q in &flipped {
        circuit.x(q)?;
    }
    circuit.mcx(&qubits, ancilla)?;
    for &q in &flipped {
        circuit.x(q)?;
    }
    Ok((ancilla, de_morgan))
}
