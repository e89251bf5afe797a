//! Propositional logic and satisfiability checking.
//!
//! The verdict engine models guilt as one boolean variable per suspect
//! and accumulates formulas over those variables as the player gathers
//! statements. This module provides the formula representation and a
//! small complete satisfiability procedure used to find a model.
//!
//! The search is plain chronological backtracking with partial-evaluation
//! pruning. For the variable counts a mystery plot can plausibly reach
//! (single digits to low tens) this terminates well within a frame.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a boolean variable in an [`Assignment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A propositional formula over boolean variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Formula {
    /// A single variable.
    Var(VarId),
    /// Logical negation.
    Not(Box<Formula>),
    /// Conjunction of all operands. Empty conjunction is true.
    And(Vec<Formula>),
    /// Disjunction of all operands. Empty disjunction is false.
    Or(Vec<Formula>),
    /// Material implication.
    Implies(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// A variable reference.
    pub fn var(id: VarId) -> Formula {
        Formula::Var(id)
    }

    /// Negate a formula.
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Formula) -> Formula {
        Formula::Not(Box::new(inner))
    }

    /// Conjunction of the given formulas.
    pub fn and(operands: Vec<Formula>) -> Formula {
        Formula::And(operands)
    }

    /// Disjunction of the given formulas.
    pub fn or(operands: Vec<Formula>) -> Formula {
        Formula::Or(operands)
    }

    /// `antecedent -> consequent`.
    pub fn implies(antecedent: Formula, consequent: Formula) -> Formula {
        Formula::Implies(Box::new(antecedent), Box::new(consequent))
    }

    /// Evaluate under a complete assignment.
    ///
    /// Variables beyond the assignment's range evaluate to false.
    pub fn eval(&self, assignment: &Assignment) -> bool {
        match self {
            Formula::Var(id) => assignment.value(*id),
            Formula::Not(inner) => !inner.eval(assignment),
            Formula::And(operands) => operands.iter().all(|f| f.eval(assignment)),
            Formula::Or(operands) => operands.iter().any(|f| f.eval(assignment)),
            Formula::Implies(a, b) => !a.eval(assignment) || b.eval(assignment),
        }
    }

    /// Evaluate under a partial assignment.
    ///
    /// Returns `None` when the value still depends on unassigned
    /// variables. Short-circuits where one operand already decides the
    /// result, which is what lets the solver prune early.
    fn eval_partial(&self, values: &[Option<bool>]) -> Option<bool> {
        match self {
            Formula::Var(id) => values.get(id.0).copied().flatten(),
            Formula::Not(inner) => inner.eval_partial(values).map(|v| !v),
            Formula::And(operands) => {
                let mut all_true = true;
                for f in operands {
                    match f.eval_partial(values) {
                        Some(false) => return Some(false),
                        Some(true) => {}
                        None => all_true = false,
                    }
                }
                if all_true {
                    Some(true)
                } else {
                    None
                }
            }
            Formula::Or(operands) => {
                let mut all_false = true;
                for f in operands {
                    match f.eval_partial(values) {
                        Some(true) => return Some(true),
                        Some(false) => {}
                        None => all_false = false,
                    }
                }
                if all_false {
                    Some(false)
                } else {
                    None
                }
            }
            Formula::Implies(a, b) => match (a.eval_partial(values), b.eval_partial(values)) {
                (Some(false), _) | (_, Some(true)) => Some(true),
                (Some(true), Some(false)) => Some(false),
                _ => None,
            },
        }
    }

    /// Largest variable index mentioned anywhere in the formula.
    fn max_var(&self) -> Option<usize> {
        match self {
            Formula::Var(id) => Some(id.0),
            Formula::Not(inner) => inner.max_var(),
            Formula::And(operands) | Formula::Or(operands) => {
                operands.iter().filter_map(Formula::max_var).max()
            }
            Formula::Implies(a, b) => a.max_var().max(b.max_var()),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Var(id) => write!(f, "{id}"),
            Formula::Not(inner) => write!(f, "!{inner}"),
            Formula::And(operands) => {
                let parts: Vec<String> = operands.iter().map(|o| o.to_string()).collect();
                write!(f, "({})", parts.join(" & "))
            }
            Formula::Or(operands) => {
                let parts: Vec<String> = operands.iter().map(|o| o.to_string()).collect();
                write!(f, "({})", parts.join(" | "))
            }
            Formula::Implies(a, b) => write!(f, "({a} -> {b})"),
        }
    }
}

/// A complete truth assignment — one satisfying model of the constraint
/// set when produced by [`Solver::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    /// Truth value of a variable. Out-of-range variables are false.
    pub fn value(&self, var: VarId) -> bool {
        self.values.get(var.0).copied().unwrap_or(false)
    }

    /// Number of variables covered by this assignment.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the assignment covers no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An accumulating conjunction of formulas with a satisfiability check.
///
/// Formulas only ever grow until [`Solver::reset`]; duplicates are
/// accepted (a repeated formula changes nothing logically).
#[derive(Debug, Clone, Default)]
pub struct Solver {
    formulas: Vec<Formula>,
    num_vars: usize,
}

impl Solver {
    /// Create a solver over `num_vars` variables with an empty
    /// constraint set.
    pub fn new(num_vars: usize) -> Self {
        Solver {
            formulas: Vec::new(),
            num_vars,
        }
    }

    /// Append a formula to the constraint set.
    ///
    /// The variable range widens automatically if the formula mentions a
    /// variable beyond the current range.
    pub fn assert(&mut self, formula: Formula) {
        if let Some(max) = formula.max_var() {
            self.num_vars = self.num_vars.max(max + 1);
        }
        self.formulas.push(formula);
    }

    /// Number of formulas asserted so far.
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    /// True when no formulas have been asserted.
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// Drop every asserted formula. The variable range is kept.
    pub fn reset(&mut self) {
        self.formulas.clear();
    }

    /// Find a satisfying assignment, or `None` when the conjunction is
    /// unsatisfiable.
    ///
    /// The search is deterministic: variables are decided in index
    /// order, `true` branch first, so an unchanged constraint set always
    /// yields the same model.
    pub fn check(&self) -> Option<Assignment> {
        let mut values = vec![None; self.num_vars];
        self.search(&mut values, 0)
    }

    fn search(&self, values: &mut Vec<Option<bool>>, next: usize) -> Option<Assignment> {
        if self
            .formulas
            .iter()
            .any(|f| f.eval_partial(values) == Some(false))
        {
            return None;
        }
        if next == values.len() {
            return Some(Assignment {
                values: values.iter().map(|v| v.unwrap_or(false)).collect(),
            });
        }
        for choice in [true, false] {
            values[next] = Some(choice);
            if let Some(model) = self.search(values, next + 1) {
                return Some(model);
            }
        }
        values[next] = None;
        None
    }

    /// Count the satisfying assignments by exhaustive enumeration.
    ///
    /// Exponential in the variable count; meant for authoring checks and
    /// tests, not the per-frame resolution path.
    pub fn count_models(&self) -> usize {
        let n = self.num_vars;
        (0u64..(1u64 << n))
            .filter(|bits| {
                let assignment = Assignment {
                    values: (0..n).map(|i| bits & (1 << i) != 0).collect(),
                };
                self.formulas.iter().all(|f| f.eval(&assignment))
            })
            .count()
    }
}
