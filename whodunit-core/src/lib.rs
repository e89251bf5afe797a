//! Verdict engine for a point-and-click murder mystery.
//!
//! This crate is the mystery-resolution core of the game, kept free of
//! rendering, input, and asset concerns so it can be tested and reused
//! on its own. It provides:
//! - A propositional model of guilt: one boolean variable per suspect
//!   plus seeded exactly-one-killer constraints
//! - A content-driven rule table turning dialogue statements into
//!   implication constraints
//! - A small complete satisfiability check that names the killer once
//!   every suspect has been questioned
//!
//! # Quick Start
//!
//! ```
//! use whodunit_core::{sample_case, SuspectId, VerdictEngine};
//!
//! let mut engine = VerdictEngine::new(sample_case())?;
//!
//! // The UI layer reports each interaction; the engine hands back the
//! // statement to display and, on the round's last suspect, a verdict.
//! let first = engine.record_interaction(SuspectId(0))?;
//! println!("Carla: {}", first.statement);
//! assert!(!first.solved());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod case;
pub mod engine;
pub mod logic;

// Primary public API
pub use case::{sample_case, Case, CaseError, Exoneration, StatementRule, Suspect, SuspectId};
pub use engine::{EngineError, Interaction, RoundPhase, Verdict, VerdictEngine};
pub use logic::{Assignment, Formula, Solver, VarId};
