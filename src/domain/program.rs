use serde::{Deserialize, Serialize};

use crate::domain::types::{ProgramDescription, ProgramId, ProgramName};

/// Display name used when an enrolled program id has no catalog entry.
pub const UNKNOWN_PROGRAM_NAME: &str = "Unknown Program";

/// Health program as returned by the catalog endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Program {
    /// Placeholder for an enrollment whose program is missing from the catalog.
    #[must_use]
    pub fn unknown(id: ProgramId) -> Self {
        Self {
            id,
            name: UNKNOWN_PROGRAM_NAME.to_string(),
            description: Some(String::new()),
        }
    }

    /// Case-insensitive substring match against name or description.
    ///
    /// A blank term matches every program.
    pub fn matches(&self, term: &str) -> bool {
        if term.trim().is_empty() {
            return true;
        }

        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

/// Program reference embedded in a client record.
///
/// The server may send only the id, or an id with a possibly stale name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrolledProgram {
    pub id: ProgramId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Payload for creating a program.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NewProgram {
    pub name: ProgramName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ProgramDescription>,
}

impl NewProgram {
    #[must_use]
    pub fn new(name: ProgramName, description: Option<ProgramDescription>) -> Self {
        Self { name, description }
    }
}

/// Keeps the programs that match `term`, preserving order.
pub fn filter_programs(programs: &[Program], term: &str) -> Vec<Program> {
    programs
        .iter()
        .filter(|program| program.matches(term))
        .cloned()
        .collect()
}
