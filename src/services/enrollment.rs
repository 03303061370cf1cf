//! Enrollment page: pick the programs a client belongs to.

use std::collections::HashSet;

use serde::Deserialize;

use crate::api::HealthApi;
use crate::domain::client::Client;
use crate::domain::program::{Program, filter_programs};
use crate::domain::types::{ClientId, ProgramId};
use crate::services::Navigation;

const LOAD_FAILED: &str = "Failed to load data. Please try again later.";
const ENROLL_FAILED: &str = "Failed to enroll client. Please try again.";
const ENROLLED: &str = "Client successfully enrolled in selected programs!";

/// How the external API applies an `enroll` call.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentSemantics {
    /// `enroll` adds to the existing set; removals need `unenroll`.
    #[default]
    Union,
    /// `enroll` replaces the existing set.
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentState {
    Loading,
    Ready,
    Succeeded,
    NotFound,
    Error(String),
}

/// Selection state for one client's enrollment.
#[derive(Debug)]
pub struct EnrollmentView {
    client_id: ClientId,
    semantics: EnrollmentSemantics,
    state: EnrollmentState,
    client: Option<Client>,
    programs: Vec<Program>,
    /// Ids enrolled when the page loaded.
    enrolled_on_load: Vec<ProgramId>,
    /// Selected ids in the order they were picked.
    selected: Vec<ProgramId>,
    filter: String,
    is_submitting: bool,
    error: Option<String>,
    success: Option<String>,
}

impl EnrollmentView {
    pub fn new(client_id: ClientId, semantics: EnrollmentSemantics) -> Self {
        Self {
            client_id,
            semantics,
            state: EnrollmentState::Loading,
            client: None,
            programs: Vec::new(),
            enrolled_on_load: Vec::new(),
            selected: Vec::new(),
            filter: String::new(),
            is_submitting: false,
            error: None,
            success: None,
        }
    }

    /// Loads the client and the catalog and pre-selects current enrollments.
    pub async fn load<A>(&mut self, api: &A)
    where
        A: HealthApi + ?Sized,
    {
        self.state = EnrollmentState::Loading;
        let (client, programs) =
            tokio::join!(api.get_client(&self.client_id), api.get_programs());
        // A missing client takes precedence over a catalog failure.
        match client.and_then(|client| Ok((client, programs?))) {
            Ok((client, programs)) => {
                let mut enrolled = Vec::with_capacity(client.enrolled_programs.len());
                for program in &client.enrolled_programs {
                    if !enrolled.contains(&program.id) {
                        enrolled.push(program.id.clone());
                    }
                }
                self.selected = enrolled.clone();
                self.enrolled_on_load = enrolled;
                self.client = Some(client);
                self.programs = programs;
                self.state = EnrollmentState::Ready;
            }
            Err(err) if err.is_not_found() => {
                log::warn!("Client {} not found for enrollment", self.client_id);
                self.state = EnrollmentState::NotFound;
            }
            Err(err) => {
                log::error!("Error fetching enrollment data: {err}");
                self.state = EnrollmentState::Error(LOAD_FAILED.to_string());
            }
        }
    }

    /// Flips one program in or out of the selection.
    pub fn toggle(&mut self, program_id: &ProgramId) {
        if let Some(index) = self.selected.iter().position(|id| id == program_id) {
            self.selected.remove(index);
        } else {
            self.selected.push(program_id.clone());
        }
    }

    /// Replaces the selection wholesale, e.g. with the boxes checked in a
    /// posted form.
    pub fn replace_selection(&mut self, selection: Vec<ProgramId>) {
        let mut seen = HashSet::with_capacity(selection.len());
        self.selected = selection
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
    }

    /// Narrows the visible candidates. The selection is untouched.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn visible_programs(&self) -> Vec<Program> {
        filter_programs(&self.programs, &self.filter)
    }

    pub fn is_selected(&self, program_id: &ProgramId) -> bool {
        self.selected.contains(program_id)
    }

    pub fn selection(&self) -> &[ProgramId] {
        &self.selected
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Previously enrolled programs that are no longer selected.
    pub fn deselected(&self) -> Vec<ProgramId> {
        self.enrolled_on_load
            .iter()
            .filter(|id| !self.selected.contains(id))
            .cloned()
            .collect()
    }

    /// Sends the whole selection to the enroll endpoint.
    ///
    /// With [`EnrollmentSemantics::Union`] the programs deselected since load
    /// are then removed in a single unenroll call. On success the caller is
    /// pointed back at the client detail page.
    pub async fn submit<A>(&mut self, api: &A) -> Option<Navigation>
    where
        A: HealthApi + ?Sized,
    {
        if self.state != EnrollmentState::Ready {
            return None;
        }

        self.is_submitting = true;
        self.error = None;
        let result = self.send_selection(api).await;
        self.is_submitting = false;

        match result {
            Ok(()) => {
                log::info!(
                    "Enrolled client {} in {} program(s)",
                    self.client_id,
                    self.selected.len()
                );
                self.state = EnrollmentState::Succeeded;
                self.success = Some(ENROLLED.to_string());
                Some(Navigation::to(format!("/clients/{}", self.client_id)))
            }
            Err(err) => {
                log::error!("Error enrolling client {}: {err}", self.client_id);
                self.error = Some(ENROLL_FAILED.to_string());
                None
            }
        }
    }

    async fn send_selection<A>(&self, api: &A) -> crate::api::ApiResult<()>
    where
        A: HealthApi + ?Sized,
    {
        api.enroll_client(&self.client_id, &self.selected).await?;

        if self.semantics == EnrollmentSemantics::Union {
            let removed = self.deselected();
            if !removed.is_empty() {
                api.unenroll_programs(&self.client_id, &removed).await?;
            }
        }

        Ok(())
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn state(&self) -> &EnrollmentState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn error(&self) -> Option<&str> {
        match (&self.error, &self.state) {
            (Some(message), _) => Some(message),
            (None, EnrollmentState::Error(message)) => Some(message),
            _ => None,
        }
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn empty_message(&self) -> &'static str {
        if self.filter.trim().is_empty() {
            "No programs available for enrollment."
        } else {
            "No programs match your search criteria."
        }
    }
}
