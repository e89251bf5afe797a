//! Case content: the suspect roster and the statement-to-implication
//! rule table.
//!
//! A [`Case`] is pure data. The engine never hardcodes suspect names,
//! counts, or dialogue; content authors supply all of it here (or in a
//! JSON file loaded with [`Case::load`]) and the engine works for any
//! roster size.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating case content.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Case has no suspects")]
    NoSuspects,

    #[error("Duplicate suspect name: {0}")]
    DuplicateName(String),

    #[error("Suspect {0} has no statements")]
    NoStatements(String),

    #[error("Rule references unknown suspect index {0}")]
    UnknownSuspect(usize),

    #[error("Rule references statement {statement} of {suspect}, who has only {count}")]
    UnknownStatement {
        suspect: String,
        statement: usize,
        count: usize,
    },
}

/// Identifies a suspect by position in the case roster.
///
/// Roster order is stable: it is the order suspects were declared in the
/// case, and it doubles as the deterministic tie-break order during
/// verdict resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SuspectId(pub usize);

impl fmt::Display for SuspectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "suspect #{}", self.0)
    }
}

/// A suspect and the canned statements they cycle through.
///
/// Statements are identified by index, not text; the display text lives
/// alongside so the UI layer can show it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suspect {
    /// Display name, unique within the case.
    pub name: String,
    /// Ordered statement list. Repeat interactions cycle through it.
    pub statements: Vec<String>,
}

/// "If `if_innocent` is not guilty, then `then_innocent` is not guilty."
///
/// The one implication shape dialogue can contribute: a statement
/// transfers exoneration from its speaker (usually) to someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exoneration {
    pub if_innocent: SuspectId,
    pub then_innocent: SuspectId,
}

/// One row of the dialogue-to-constraint table: a specific statement of
/// a specific suspect, and the implications hearing it contributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementRule {
    /// Who speaks.
    pub suspect: SuspectId,
    /// Which of their statements, by index.
    pub statement: usize,
    /// Implications added to the constraint set each time it is heard.
    pub implications: Vec<Exoneration>,
}

/// Complete content for one mystery: the roster plus the rule table.
///
/// Statements with no matching rule are fine — hearing them contributes
/// nothing, which is how red-herring dialogue is authored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Case {
    pub suspects: Vec<Suspect>,
    pub rules: Vec<StatementRule>,
}

impl Case {
    /// An empty case. Chain [`Case::with_suspect`] and
    /// [`Case::with_rule`] to populate it.
    pub fn new() -> Self {
        Case::default()
    }

    /// Add a suspect; the id handed back by [`Case::suspect_id`] is the
    /// roster position.
    pub fn with_suspect(mut self, name: impl Into<String>, statements: &[&str]) -> Self {
        self.suspects.push(Suspect {
            name: name.into(),
            statements: statements.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Add a rule for statement `statement` of `suspect`.
    pub fn with_rule(
        mut self,
        suspect: SuspectId,
        statement: usize,
        implications: Vec<Exoneration>,
    ) -> Self {
        self.rules.push(StatementRule {
            suspect,
            statement,
            implications,
        });
        self
    }

    /// Number of suspects in the roster.
    pub fn suspect_count(&self) -> usize {
        self.suspects.len()
    }

    /// Look up a suspect id by exact name.
    pub fn suspect_id(&self, name: &str) -> Option<SuspectId> {
        self.suspects
            .iter()
            .position(|s| s.name == name)
            .map(SuspectId)
    }

    /// All implications contributed by hearing statement `statement` of
    /// `suspect`. Empty for (suspect, statement) pairs with no rule.
    pub fn implications_for(&self, suspect: SuspectId, statement: usize) -> Vec<Exoneration> {
        self.rules
            .iter()
            .filter(|r| r.suspect == suspect && r.statement == statement)
            .flat_map(|r| r.implications.iter().copied())
            .collect()
    }

    /// Check the content for authoring errors: empty roster, duplicate
    /// names, suspects with no dialogue, rules pointing outside the
    /// roster or past a suspect's statement list.
    pub fn validate(&self) -> Result<(), CaseError> {
        if self.suspects.is_empty() {
            return Err(CaseError::NoSuspects);
        }
        for (i, suspect) in self.suspects.iter().enumerate() {
            if suspect.statements.is_empty() {
                return Err(CaseError::NoStatements(suspect.name.clone()));
            }
            if self.suspects[..i].iter().any(|s| s.name == suspect.name) {
                return Err(CaseError::DuplicateName(suspect.name.clone()));
            }
        }
        for rule in &self.rules {
            let speaker = self
                .suspects
                .get(rule.suspect.0)
                .ok_or(CaseError::UnknownSuspect(rule.suspect.0))?;
            if rule.statement >= speaker.statements.len() {
                return Err(CaseError::UnknownStatement {
                    suspect: speaker.name.clone(),
                    statement: rule.statement,
                    count: speaker.statements.len(),
                });
            }
            for imp in &rule.implications {
                for id in [imp.if_innocent, imp.then_innocent] {
                    if id.0 >= self.suspects.len() {
                        return Err(CaseError::UnknownSuspect(id.0));
                    }
                }
            }
        }
        Ok(())
    }

    /// Load and validate a case from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Case, CaseError> {
        let json = fs::read_to_string(path)?;
        let case: Case = serde_json::from_str(&json)?;
        case.validate()?;
        Ok(case)
    }

    /// Save the case as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CaseError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// The reference case shipped with the game: three suspects in the
/// manor, each with two meaningful statements and one red herring.
///
/// Working it by hand: after one interaction with each suspect (their
/// first statements), the accumulated implications leave Rodys as the
/// only consistent killer.
pub fn sample_case() -> Case {
    let carla = SuspectId(0);
    let juan = SuspectId(1);
    let rodys = SuspectId(2);
    let exonerates = |if_innocent, then_innocent| Exoneration {
        if_innocent,
        then_innocent,
    };

    Case::new()
        .with_suspect(
            "Carla",
            &[
                "I was in my room all night.",
                "I didn't see anyone in the hallway.",
                "I don't know who the killer is.",
            ],
        )
        .with_suspect(
            "Juan",
            &[
                "I saw Carla in the hallway.",
                "Rodys was in the living room.",
                "I don't know who the killer is.",
            ],
        )
        .with_suspect(
            "Rodys",
            &[
                "The storm knocked out the cameras.",
                "I didn't see anyone suspicious.",
                "I don't know who the killer is.",
            ],
        )
        .with_rule(carla, 0, vec![exonerates(carla, juan)])
        .with_rule(carla, 1, vec![exonerates(carla, juan)])
        .with_rule(juan, 0, vec![exonerates(juan, carla)])
        .with_rule(juan, 1, vec![exonerates(juan, rodys)])
        .with_rule(rodys, 0, vec![exonerates(rodys, juan)])
        .with_rule(rodys, 1, vec![exonerates(rodys, juan)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_case_is_valid() {
        let case = sample_case();
        assert!(case.validate().is_ok());
        assert_eq!(case.suspect_count(), 3);
        assert_eq!(case.suspect_id("Juan"), Some(SuspectId(1)));
        assert_eq!(case.suspect_id("Alex"), None);
    }

    #[test]
    fn test_implications_lookup() {
        let case = sample_case();
        let imps = case.implications_for(SuspectId(1), 1);
        assert_eq!(imps.len(), 1);
        assert_eq!(imps[0].if_innocent, SuspectId(1));
        assert_eq!(imps[0].then_innocent, SuspectId(2));

        // The red-herring statement maps to nothing.
        assert!(case.implications_for(SuspectId(0), 2).is_empty());
        // So does an out-of-range statement index.
        assert!(case.implications_for(SuspectId(0), 99).is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_roster() {
        assert!(matches!(Case::new().validate(), Err(CaseError::NoSuspects)));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let case = Case::new()
            .with_suspect("Carla", &["..."])
            .with_suspect("Carla", &["..."]);
        assert!(matches!(
            case.validate(),
            Err(CaseError::DuplicateName(name)) if name == "Carla"
        ));
    }

    #[test]
    fn test_validate_rejects_mute_suspect() {
        let case = Case::new().with_suspect("Carla", &[]);
        assert!(matches!(
            case.validate(),
            Err(CaseError::NoStatements(name)) if name == "Carla"
        ));
    }

    #[test]
    fn test_validate_rejects_dangling_rule() {
        let case = Case::new()
            .with_suspect("Carla", &["hello"])
            .with_rule(SuspectId(4), 0, vec![]);
        assert!(matches!(
            case.validate(),
            Err(CaseError::UnknownSuspect(4))
        ));

        let case = Case::new()
            .with_suspect("Carla", &["hello"])
            .with_rule(SuspectId(0), 7, vec![]);
        assert!(matches!(
            case.validate(),
            Err(CaseError::UnknownStatement { statement: 7, .. })
        ));
    }

    #[test]
    fn test_case_deserializes_from_json() {
        let json = r#"{
            "suspects": [
                { "name": "Ana", "statements": ["I heard nothing."] },
                { "name": "Bruno", "statements": ["Ana was outside."] }
            ],
            "rules": [
                {
                    "suspect": 1,
                    "statement": 0,
                    "implications": [{ "if_innocent": 1, "then_innocent": 0 }]
                }
            ]
        }"#;
        let case: Case = serde_json::from_str(json).unwrap();
        assert!(case.validate().is_ok());
        assert_eq!(case.suspect_count(), 2);
        assert_eq!(case.implications_for(SuspectId(1), 0).len(), 1);
    }
}
