//! Client detail page: profile plus the enrollments resolved against the
//! live program catalog.

use serde::Serialize;

use crate::api::{self, HealthApi};
use crate::domain::client::Client;
use crate::domain::program::Program;
use crate::domain::types::{ClientId, ProgramId};

const LOAD_FAILED: &str = "Failed to load client details. Please try again later.";
const UNENROLL_FAILED: &str = "Failed to delete enrolled program. Please try again.";

/// Loaded client with enrollments resolved to full program records.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClientDetail {
    pub client: Client,
    pub enrolled_programs: Vec<Program>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientDetailState {
    Loading,
    Loaded(ClientDetail),
    NotFound,
    Error(String),
}

/// Resolves each enrolled id against `catalog`, keeping the server's order.
///
/// Ids missing from the catalog (e.g. a program deleted after enrollment)
/// become the "Unknown Program" placeholder.
pub fn reconcile_enrollments(client: &Client, catalog: &[Program]) -> Vec<Program> {
    client
        .enrolled_programs
        .iter()
        .map(|enrolled| {
            catalog
                .iter()
                .find(|program| program.id == enrolled.id)
                .cloned()
                .unwrap_or_else(|| Program::unknown(enrolled.id.clone()))
        })
        .collect()
}

/// Fetches the client and the catalog together and reconciles them.
///
/// The client lookup's outcome is judged first, so a missing client reads as
/// `NotFound` even when the catalog call fails too.
pub async fn load_client_detail<A>(api: &A, client_id: &ClientId) -> ClientDetailState
where
    A: HealthApi + ?Sized,
{
    let (client, catalog) = tokio::join!(api.get_client(client_id), api.get_programs());
    match client.and_then(|client| Ok((client, catalog?))) {
        Ok((client, catalog)) => {
            let enrolled_programs = reconcile_enrollments(&client, &catalog);
            ClientDetailState::Loaded(ClientDetail {
                client,
                enrolled_programs,
            })
        }
        Err(err) if err.is_not_found() => {
            log::warn!("Client {client_id} not found");
            ClientDetailState::NotFound
        }
        Err(err) => {
            log::error!("Error fetching client or programs: {err}");
            ClientDetailState::Error(LOAD_FAILED.to_string())
        }
    }
}

/// State machine behind the client detail page.
#[derive(Debug)]
pub struct ClientDetailView {
    client_id: ClientId,
    state: ClientDetailState,
    error: Option<String>,
}

impl ClientDetailView {
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            state: ClientDetailState::Loading,
            error: None,
        }
    }

    pub async fn load<A>(&mut self, api: &A)
    where
        A: HealthApi + ?Sized,
    {
        self.state = ClientDetailState::Loading;
        self.state = load_client_detail(api, &self.client_id).await;
    }

    /// Removes one program, then reloads client and catalog from the server.
    ///
    /// The page never patches its enrollment list locally; the server's
    /// answer after the mutation is the only source of truth.
    pub async fn unenroll<A>(&mut self, api: &A, program_id: &ProgramId) -> bool
    where
        A: HealthApi + ?Sized,
    {
        self.error = None;
        match api::remove_enrolled_program(api, &self.client_id, program_id).await {
            Ok(()) => {
                self.load(api).await;
                true
            }
            Err(err) => {
                log::error!("Failed to delete enrolled program {program_id}: {err}");
                self.error = Some(UNENROLL_FAILED.to_string());
                false
            }
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn state(&self) -> &ClientDetailState {
        &self.state
    }

    pub fn detail(&self) -> Option<&ClientDetail> {
        match &self.state {
            ClientDetailState::Loaded(detail) => Some(detail),
            _ => None,
        }
    }

    /// Banner message: an action failure or a load failure.
    pub fn error(&self) -> Option<&str> {
        match (&self.error, &self.state) {
            (Some(message), _) => Some(message),
            (None, ClientDetailState::Error(message)) => Some(message),
            _ => None,
        }
    }
}
