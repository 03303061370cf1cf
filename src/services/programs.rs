//! Programs page: catalog listing, local filtering, creation and deletion.

use serde::Serialize;
use validator::Validate;

use crate::api::HealthApi;
use crate::domain::program::{NewProgram, Program, filter_programs};
use crate::domain::types::ProgramId;
use crate::forms::FormError;
use crate::forms::program::AddProgramForm;
use crate::services::Confirm;

pub const DELETE_PROGRAM_PROMPT: &str = "Are you sure you want to delete this program?";

const LOAD_FAILED: &str = "Failed to load programs. Please try again later.";
const CREATE_FAILED: &str = "Failed to create program. Please try again.";
const CREATED: &str = "Program created successfully!";
const DELETE_FAILED: &str = "Failed to delete program. Please try again.";
const DELETED: &str = "Program deleted successfully!";

/// Result of a deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    Deleted,
    Failed,
}

/// State of the programs page.
///
/// `programs` is the fetched catalog; `filtered` is what the page shows.
#[derive(Debug, Default, Serialize)]
pub struct ProgramsView {
    programs: Vec<Program>,
    filtered: Vec<Program>,
    search_term: String,
    is_loading: bool,
    error: Option<String>,
    success: Option<String>,
}

impl ProgramsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the filter, e.g. from a query parameter, before loading.
    pub fn with_search_term(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..Self::default()
        }
    }

    /// Fetches the full catalog and applies the current filter.
    pub async fn load<A>(&mut self, api: &A)
    where
        A: HealthApi + ?Sized,
    {
        self.is_loading = true;
        match api.get_programs().await {
            Ok(programs) => {
                self.programs = programs;
                self.refilter();
            }
            Err(err) => {
                log::error!("Error fetching programs: {err}");
                self.error = Some(LOAD_FAILED.to_string());
            }
        }
        self.is_loading = false;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.refilter();
    }

    pub fn clear_search(&mut self) {
        self.set_search_term(String::new());
    }

    /// Validates the form, creates the program and appends it locally.
    ///
    /// Returns the created program. Validation failures never reach the API.
    pub async fn create_program<A>(&mut self, api: &A, form: &AddProgramForm) -> Option<Program>
    where
        A: HealthApi + ?Sized,
    {
        let payload = match form
            .validate()
            .map_err(FormError::from)
            .and_then(|()| NewProgram::try_from(form))
        {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("Rejected program form: {err}");
                self.error = Some(FormError::ProgramNameRequired.to_string());
                return None;
            }
        };

        self.is_loading = true;
        let result = api.create_program(&payload).await;
        self.is_loading = false;

        match result {
            Ok(program) => {
                self.programs.push(program.clone());
                self.refilter();
                self.success = Some(CREATED.to_string());
                Some(program)
            }
            Err(err) => {
                log::error!("Error creating program: {err}");
                self.error = Some(CREATE_FAILED.to_string());
                None
            }
        }
    }

    /// Deletes a program after confirmation and drops it from both local
    /// lists without re-fetching.
    pub async fn delete_program<A, C>(
        &mut self,
        api: &A,
        program_id: &ProgramId,
        confirm: &C,
    ) -> DeleteOutcome
    where
        A: HealthApi + ?Sized,
        C: Confirm + ?Sized,
    {
        if !confirm.confirm(DELETE_PROGRAM_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        self.is_loading = true;
        let result = api.delete_program(program_id).await;
        self.is_loading = false;

        match result {
            Ok(()) => {
                self.programs.retain(|p| &p.id != program_id);
                self.filtered.retain(|p| &p.id != program_id);
                self.success = Some(DELETED.to_string());
                DeleteOutcome::Deleted
            }
            Err(err) => {
                log::error!("Error deleting program {program_id}: {err}");
                self.error = Some(DELETE_FAILED.to_string());
                DeleteOutcome::Failed
            }
        }
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn filtered(&self) -> &[Program] {
        &self.filtered
    }

    pub fn find(&self, program_id: &ProgramId) -> Option<&Program> {
        self.programs.iter().find(|p| &p.id == program_id)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Text shown when the visible list is empty.
    pub fn empty_message(&self) -> &'static str {
        if self.search_term.is_empty() {
            "Get started by creating your first health program."
        } else {
            "No programs match your search criteria."
        }
    }

    fn refilter(&mut self) {
        self.filtered = filter_programs(&self.programs, &self.search_term);
    }
}
