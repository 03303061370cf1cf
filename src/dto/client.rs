//! DTOs shaped for the client detail and enrollment templates.

use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::program::Program;
use crate::services::client_detail::ClientDetail;
use crate::services::enrollment::{EnrollmentState, EnrollmentView};

/// Data required to render the client details page.
#[derive(Debug, Serialize)]
pub struct ClientPageData {
    pub client: Client,
    pub full_name: String,
    pub gender: Option<&'static str>,
    pub enrolled_programs: Vec<Program>,
}

impl From<&ClientDetail> for ClientPageData {
    fn from(detail: &ClientDetail) -> Self {
        Self {
            client: detail.client.clone(),
            full_name: detail.client.full_name(),
            gender: detail.client.gender.map(|gender| gender.label()),
            enrolled_programs: detail.enrolled_programs.clone(),
        }
    }
}

/// One checkbox row on the enrollment page.
#[derive(Debug, Serialize)]
pub struct EnrollmentCandidate {
    pub program: Program,
    pub selected: bool,
}

/// Data required to render the enrollment page.
#[derive(Debug, Serialize)]
pub struct EnrollmentPageData {
    pub client: Option<Client>,
    pub full_name: Option<String>,
    pub candidates: Vec<EnrollmentCandidate>,
    /// Selected ids hidden by the filter; posted back so they stay selected.
    pub hidden_selection: Vec<String>,
    pub filter: String,
    pub selected_count: usize,
    pub empty_message: &'static str,
    pub ready: bool,
}

impl From<&EnrollmentView> for EnrollmentPageData {
    fn from(view: &EnrollmentView) -> Self {
        let candidates: Vec<EnrollmentCandidate> = view
            .visible_programs()
            .into_iter()
            .map(|program| EnrollmentCandidate {
                selected: view.is_selected(&program.id),
                program,
            })
            .collect();
        let hidden_selection = view
            .selection()
            .iter()
            .filter(|id| !candidates.iter().any(|c| &c.program.id == *id))
            .map(|id| id.to_string())
            .collect();

        Self {
            client: view.client().cloned(),
            full_name: view.client().map(Client::full_name),
            candidates,
            hidden_selection,
            filter: view.filter().to_string(),
            selected_count: view.selected_count(),
            empty_message: view.empty_message(),
            ready: *view.state() == EnrollmentState::Ready,
        }
    }
}
