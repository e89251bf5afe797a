//! The verdict engine: interaction tracking, constraint accumulation,
//! and killer determination.
//!
//! The engine owns three pieces of per-round state: the clue ledger (the
//! set of suspects already consulted), each suspect's position in their
//! cyclic statement list, and the constraint set. The UI layer reports
//! every suspect interaction through [`VerdictEngine::record_interaction`];
//! once every suspect has been consulted the engine resolves the
//! constraints and hands back a [`Verdict`].

use crate::case::{Case, CaseError, Exoneration, SuspectId};
use crate::logic::{Formula, Solver, VarId};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors from engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller passed an id outside the case roster. This is an
    /// integration bug in the caller, not a game condition.
    #[error("Unknown {0}")]
    InvalidSuspect(SuspectId),
}

/// Where the current round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Gathering statements; resolution fires once every suspect has
    /// been consulted.
    Collecting,
    /// Every suspect was consulted but the constraints admitted no
    /// killer. The round is stuck until [`VerdictEngine::reset`].
    Stalled,
}

/// Outcome of resolving the accumulated constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// A single suspect's guilt is consistent with every statement.
    Determined {
        suspect: SuspectId,
        name: String,
        explanation: String,
    },
    /// The constraints admit no satisfying assignment, or none in which
    /// any suspect is guilty.
    Undetermined,
}

/// What one call to [`VerdictEngine::record_interaction`] produced.
#[derive(Debug, Clone)]
pub struct Interaction {
    /// The statement the UI should display for this interaction.
    pub statement: String,
    /// Set when this interaction completed the round and triggered
    /// resolution.
    pub verdict: Option<Verdict>,
}

impl Interaction {
    /// True when this interaction triggered resolution.
    pub fn solved(&self) -> bool {
        self.verdict.is_some()
    }
}

/// The mystery-resolution core.
///
/// Content comes in at construction as a [`Case`]; everything else is
/// derived. Single-threaded and synchronous by design: each call runs to
/// completion inside the caller's frame.
#[derive(Debug)]
pub struct VerdictEngine {
    case: Case,
    /// Per-suspect cursor into their cyclic statement list.
    cursors: Vec<usize>,
    /// The clue ledger: suspects consulted in the current round.
    consulted: HashSet<SuspectId>,
    solver: Solver,
    phase: RoundPhase,
    rounds_solved: u32,
}

impl VerdictEngine {
    /// Build an engine for the given case.
    ///
    /// Validates the content and seeds the base constraints: at least
    /// one suspect is guilty, and no two are guilty at once.
    pub fn new(case: Case) -> Result<Self, CaseError> {
        case.validate()?;
        let n = case.suspect_count();
        let mut engine = VerdictEngine {
            cursors: vec![0; n],
            consulted: HashSet::new(),
            solver: Solver::new(n),
            case,
            phase: RoundPhase::Collecting,
            rounds_solved: 0,
        };
        engine.seed_constraints();
        Ok(engine)
    }

    /// Coverage (someone is guilty) plus pairwise exclusivity (no two
    /// guilty at once): together, exactly one guilty suspect in any
    /// model. Works for any roster size.
    fn seed_constraints(&mut self) {
        let n = self.case.suspect_count();
        self.solver.assert(Formula::or(
            (0..n).map(|i| Formula::var(VarId(i))).collect(),
        ));
        for i in 0..n {
            for j in (i + 1)..n {
                self.solver.assert(Formula::not(Formula::and(vec![
                    Formula::var(VarId(i)),
                    Formula::var(VarId(j)),
                ])));
            }
        }
    }

    /// Return the engine to its initial state: ledger cleared,
    /// constraints reseeded, every statement cursor rewound.
    pub fn reset(&mut self) {
        self.consulted.clear();
        self.cursors.fill(0);
        self.solver.reset();
        self.seed_constraints();
        self.phase = RoundPhase::Collecting;
    }

    /// Record one player interaction with `suspect`.
    ///
    /// The suspect's current statement feeds the rule table, their
    /// cursor advances (wrapping), and the clue ledger records them.
    /// When this interaction consults the last unconsulted suspect the
    /// round resolves and the returned [`Interaction::verdict`] is set.
    ///
    /// Repeat interactions with an already-consulted suspect keep
    /// cycling their dialogue and keep feeding the rule table, but the
    /// ledger is a set and does not grow.
    pub fn record_interaction(&mut self, suspect: SuspectId) -> Result<Interaction, EngineError> {
        let entry = self
            .case
            .suspects
            .get(suspect.0)
            .ok_or(EngineError::InvalidSuspect(suspect))?;
        let cursor = self.cursors[suspect.0];
        let statement = entry.statements[cursor].clone();

        // The statement about to be shown is the one that feeds the
        // table; the cursor advances afterwards.
        self.apply_statement(suspect, cursor);
        self.cursors[suspect.0] = (cursor + 1) % self.case.suspects[suspect.0].statements.len();
        self.consulted.insert(suspect);

        let verdict = if self.phase == RoundPhase::Collecting
            && self.consulted.len() == self.case.suspect_count()
        {
            Some(self.conclude_round())
        } else {
            None
        };

        Ok(Interaction { statement, verdict })
    }

    /// Append the implications contributed by one statement to the
    /// constraint set. Statements with no rule contribute nothing.
    fn apply_statement(&mut self, suspect: SuspectId, statement: usize) {
        let implications = self.case.implications_for(suspect, statement);
        let name = &self.case.suspects[suspect.0].name;
        if implications.is_empty() {
            // Not an error: red-herring dialogue is authored this way.
            // Logged so a mistyped rule index is discoverable.
            debug!("no rule for {name} statement {statement}");
            return;
        }
        for imp in implications {
            let formula = exoneration_formula(imp);
            debug!("{name} statement {statement} contributes {formula}");
            self.solver.assert(formula);
        }
    }

    /// Resolve the round that the last interaction completed.
    fn conclude_round(&mut self) -> Verdict {
        let verdict = self.resolve();
        match &verdict {
            Verdict::Determined { name, .. } => {
                debug!("round solved: {name}");
                self.rounds_solved += 1;
                // New round: fresh ledger and constraints, but statement
                // cursors carry over so dialogue keeps cycling.
                self.consulted.clear();
                self.solver.reset();
                self.seed_constraints();
            }
            Verdict::Undetermined => {
                warn!("statements are contradictory; no killer can be determined");
                self.phase = RoundPhase::Stalled;
            }
        }
        verdict
    }

    /// Determine the killer from the current constraint set.
    ///
    /// A pure query: satisfiability check, then the first suspect in
    /// roster order whose guilt proposition holds in the model. The
    /// roster-order scan makes the reported suspect deterministic even
    /// if authored content accidentally permits several guilty suspects
    /// at once.
    pub fn resolve(&self) -> Verdict {
        let Some(model) = self.solver.check() else {
            return Verdict::Undetermined;
        };
        for (i, suspect) in self.case.suspects.iter().enumerate() {
            if model.value(VarId(i)) {
                return Verdict::Determined {
                    suspect: SuspectId(i),
                    name: suspect.name.clone(),
                    explanation: format!(
                        "Based on the statements, {} is the killer.",
                        suspect.name
                    ),
                };
            }
        }
        // Reachable only if the coverage seed has been removed.
        Verdict::Undetermined
    }

    /// The case this engine was built from.
    pub fn case(&self) -> &Case {
        &self.case
    }

    /// Current round phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Number of distinct suspects consulted this round.
    pub fn clue_count(&self) -> usize {
        self.consulted.len()
    }

    /// Whether `suspect` has been consulted this round.
    pub fn consulted(&self, suspect: SuspectId) -> bool {
        self.consulted.contains(&suspect)
    }

    /// Number of formulas in the constraint set, seeds included.
    pub fn constraint_count(&self) -> usize {
        self.solver.len()
    }

    /// Total rounds solved since construction. Survives [`reset`], like
    /// a score would.
    ///
    /// [`reset`]: VerdictEngine::reset
    pub fn rounds_solved(&self) -> u32 {
        self.rounds_solved
    }
}

/// "If S is not guilty, then T is not guilty" as a formula.
fn exoneration_formula(imp: Exoneration) -> Formula {
    Formula::implies(
        Formula::not(Formula::var(VarId(imp.if_innocent.0))),
        Formula::not(Formula::var(VarId(imp.then_innocent.0))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::sample_case;

    fn two_suspect_case() -> Case {
        Case::new()
            .with_suspect("Ana", &["first", "second"])
            .with_suspect("Bruno", &["only"])
    }

    #[test]
    fn test_seed_is_satisfiable() {
        let engine = VerdictEngine::new(sample_case()).unwrap();
        // Coverage + C(3,2) exclusions.
        assert_eq!(engine.constraint_count(), 4);
        assert!(matches!(engine.resolve(), Verdict::Determined { .. }));
    }

    #[test]
    fn test_invalid_suspect_is_an_error() {
        let mut engine = VerdictEngine::new(sample_case()).unwrap();
        let result = engine.record_interaction(SuspectId(9));
        assert!(matches!(result, Err(EngineError::InvalidSuspect(SuspectId(9)))));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let engine = VerdictEngine::new(sample_case()).unwrap();
        assert_eq!(engine.resolve(), engine.resolve());
    }

    #[test]
    fn test_ledger_is_a_set() {
        let mut engine = VerdictEngine::new(sample_case()).unwrap();
        engine.record_interaction(SuspectId(0)).unwrap();
        assert_eq!(engine.clue_count(), 1);
        engine.record_interaction(SuspectId(0)).unwrap();
        assert_eq!(engine.clue_count(), 1);
        assert!(engine.consulted(SuspectId(0)));
        assert!(!engine.consulted(SuspectId(1)));
    }

    #[test]
    fn test_repeat_interaction_still_feeds_the_table() {
        let mut engine = VerdictEngine::new(sample_case()).unwrap();
        let before = engine.constraint_count();
        engine.record_interaction(SuspectId(0)).unwrap();
        engine.record_interaction(SuspectId(0)).unwrap();
        // Carla's first two statements each contribute one implication.
        assert_eq!(engine.constraint_count(), before + 2);
    }

    #[test]
    fn test_unknown_statement_is_a_no_op() {
        let mut engine = VerdictEngine::new(sample_case()).unwrap();
        engine.record_interaction(SuspectId(0)).unwrap();
        engine.record_interaction(SuspectId(0)).unwrap();
        let before = engine.constraint_count();
        // Third statement is the red herring with no rule.
        engine.record_interaction(SuspectId(0)).unwrap();
        assert_eq!(engine.constraint_count(), before);
    }

    #[test]
    fn test_cursor_wraps_around() {
        let mut engine = VerdictEngine::new(two_suspect_case()).unwrap();
        let a = engine.record_interaction(SuspectId(0)).unwrap();
        let b = engine.record_interaction(SuspectId(0)).unwrap();
        let c = engine.record_interaction(SuspectId(0)).unwrap();
        assert_eq!(a.statement, "first");
        assert_eq!(b.statement, "second");
        assert_eq!(c.statement, "first");
    }

    #[test]
    fn test_round_resolves_on_last_distinct_suspect() {
        let mut engine = VerdictEngine::new(sample_case()).unwrap();
        assert!(!engine.record_interaction(SuspectId(2)).unwrap().solved());
        assert!(!engine.record_interaction(SuspectId(0)).unwrap().solved());
        let last = engine.record_interaction(SuspectId(1)).unwrap();
        assert!(last.solved());
    }

    #[test]
    fn test_sample_case_first_statements_convict_rodys() {
        let mut engine = VerdictEngine::new(sample_case()).unwrap();
        engine.record_interaction(SuspectId(0)).unwrap();
        engine.record_interaction(SuspectId(1)).unwrap();
        let verdict = engine.record_interaction(SuspectId(2)).unwrap().verdict;
        match verdict {
            Some(Verdict::Determined {
                suspect,
                name,
                explanation,
            }) => {
                assert_eq!(suspect, SuspectId(2));
                assert_eq!(name, "Rodys");
                assert_eq!(explanation, "Based on the statements, Rodys is the killer.");
            }
            other => panic!("expected a determined verdict, got {other:?}"),
        }
    }

    #[test]
    fn test_solved_round_starts_a_fresh_round() {
        let mut engine = VerdictEngine::new(sample_case()).unwrap();
        engine.record_interaction(SuspectId(0)).unwrap();
        engine.record_interaction(SuspectId(1)).unwrap();
        assert!(engine.record_interaction(SuspectId(2)).unwrap().solved());

        assert_eq!(engine.rounds_solved(), 1);
        assert_eq!(engine.clue_count(), 0);
        // Back to the bare seed.
        assert_eq!(engine.constraint_count(), 4);
        assert_eq!(engine.phase(), RoundPhase::Collecting);

        // A fourth interaction starts a new ledger, no re-trigger.
        let next = engine.record_interaction(SuspectId(1)).unwrap();
        assert!(!next.solved());
        // Cursors persisted across the solve: Juan is on his second
        // statement now.
        assert_eq!(next.statement, "Rodys was in the living room.");
    }

    #[test]
    fn test_contradictory_content_stalls_the_round() {
        // Ana's statement exonerates no one and Bruno's pins guilt both
        // ways: if either is innocent the other must be too, which
        // contradicts the coverage seed.
        let contradictory = Case::new()
            .with_suspect("Ana", &["..."])
            .with_suspect("Bruno", &["..."])
            .with_rule(
                SuspectId(1),
                0,
                vec![
                    Exoneration {
                        if_innocent: SuspectId(0),
                        then_innocent: SuspectId(1),
                    },
                    Exoneration {
                        if_innocent: SuspectId(1),
                        then_innocent: SuspectId(0),
                    },
                ],
            );
        let mut engine = VerdictEngine::new(contradictory).unwrap();
        engine.record_interaction(SuspectId(0)).unwrap();
        let last = engine.record_interaction(SuspectId(1)).unwrap();
        assert_eq!(last.verdict, Some(Verdict::Undetermined));
        assert_eq!(engine.phase(), RoundPhase::Stalled);
        assert_eq!(engine.rounds_solved(), 0);

        // No re-trigger while stalled.
        let again = engine.record_interaction(SuspectId(0)).unwrap();
        assert!(!again.solved());

        // A reset recovers fully.
        engine.reset();
        assert_eq!(engine.phase(), RoundPhase::Collecting);
        assert_eq!(engine.clue_count(), 0);
        assert!(matches!(engine.resolve(), Verdict::Determined { .. }));
    }

    #[test]
    fn test_reset_rewinds_cursors() {
        let mut engine = VerdictEngine::new(two_suspect_case()).unwrap();
        engine.record_interaction(SuspectId(0)).unwrap();
        engine.reset();
        let first = engine.record_interaction(SuspectId(0)).unwrap();
        assert_eq!(first.statement, "first");
    }
}
