//! Form definitions backing the portal routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod client;
pub mod enrollment;
pub mod program;

/// Errors that can occur when processing form data.
///
/// The display text of the named variants is shown to the user verbatim.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("First name is required")]
    FirstNameRequired,

    #[error("Last name is required")]
    LastNameRequired,

    #[error("Email is required")]
    EmailRequired,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Program name is required")]
    ProgramNameRequired,

    #[error("invalid program id")]
    InvalidProgramId,
}
