//! DTOs exposed by the JSON endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::client::Client;

/// Query parameters accepted by `/api/v1/clients`.
#[derive(Debug, Default, Deserialize)]
pub struct ClientsQuery {
    #[serde(default)]
    pub search: String,
}

/// Response body of `/api/v1/clients`.
#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    /// The term the results were filtered by, echoed for live-search callers.
    pub search: String,
    pub total: usize,
    pub clients: Vec<Client>,
}
