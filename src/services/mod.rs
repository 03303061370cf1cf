//! Page-level view models driving the portal.
//!
//! Each view owns the data it fetched; nothing is shared between views, so a
//! mutation made in one page is only visible elsewhere after that page
//! re-fetches.

pub mod client_detail;
pub mod clients;
pub mod dashboard;
pub mod enrollment;
pub mod programs;
pub mod registration;

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// An answer that was already collected, e.g. from a confirmation page.
impl Confirm for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}

/// Where the user is sent after a successful workflow step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub target: String,
}

impl Navigation {
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::client::Client;
    use crate::domain::program::{EnrolledProgram, Program};
    use crate::domain::types::{ClientId, ProgramId};

    pub fn program(id: &str, name: &str) -> Program {
        Program {
            id: ProgramId::new(id).expect("valid program id"),
            name: name.to_string(),
            description: None,
        }
    }

    pub fn client(id: &str, first: &str, last: &str) -> Client {
        Client {
            id: ClientId::new(id).expect("valid client id"),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            age: None,
            gender: None,
            enrolled_programs: Vec::new(),
        }
    }

    pub fn enrolled(id: &str) -> EnrolledProgram {
        EnrolledProgram {
            id: ProgramId::new(id).expect("valid program id"),
            name: None,
        }
    }

    pub fn api_failure() -> crate::api::ApiError {
        crate::api::ApiError::Status {
            status: 500,
            body: "boom".to_string(),
        }
    }

    pub fn api_not_found() -> crate::api::ApiError {
        crate::api::ApiError::Status {
            status: 404,
            body: "Client not found".to_string(),
        }
    }
}
