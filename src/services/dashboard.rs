use serde::Serialize;

use crate::api::HealthApi;
use crate::domain::client::Client;
use crate::domain::program::Program;

const LOAD_FAILED: &str = "Failed to load dashboard data. Please try again later.";

/// How many recent entries of each collection the dashboard lists.
pub const DASHBOARD_PREVIEW_LEN: usize = 6;

/// Counts and a short preview of both collections.
#[derive(Debug, Default, Serialize)]
pub struct DashboardView {
    client_count: usize,
    program_count: usize,
    clients: Vec<Client>,
    programs: Vec<Program>,
    is_loading: bool,
    error: Option<String>,
}

impl DashboardView {
    pub async fn load<A>(&mut self, api: &A)
    where
        A: HealthApi + ?Sized,
    {
        self.is_loading = true;
        match tokio::try_join!(api.get_clients(), api.get_programs()) {
            Ok((mut clients, mut programs)) => {
                self.client_count = clients.len();
                self.program_count = programs.len();
                clients.truncate(DASHBOARD_PREVIEW_LEN);
                programs.truncate(DASHBOARD_PREVIEW_LEN);
                self.clients = clients;
                self.programs = programs;
            }
            Err(err) => {
                log::error!("Error fetching dashboard data: {err}");
                self.error = Some(LOAD_FAILED.to_string());
            }
        }
        self.is_loading = false;
    }

    pub fn client_count(&self) -> usize {
        self.client_count
    }

    pub fn program_count(&self) -> usize {
        self.program_count
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
