//! Client for the external health-information HTTP API.
//!
//! Every operation maps to one REST call and surfaces transport or status
//! failures to the caller untouched. Nothing here retries.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::client::{Client, NewClient};
use crate::domain::program::{NewProgram, Program};
use crate::domain::types::{ClientId, ProgramId};

pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use http::HttpHealthApi;

/// Errors from the API client layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status code.
    #[error("health API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The configured base URL cannot have API paths appended to it.
    #[error("invalid health API base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// Whether the API reported the requested entity as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Operations offered by the remote health-information service.
#[async_trait]
pub trait HealthApi: Send + Sync {
    async fn create_program(&self, program: &NewProgram) -> ApiResult<Program>;
    async fn get_programs(&self) -> ApiResult<Vec<Program>>;
    async fn delete_program(&self, program_id: &ProgramId) -> ApiResult<()>;
    async fn create_client(&self, client: &NewClient) -> ApiResult<Client>;
    async fn get_clients(&self) -> ApiResult<Vec<Client>>;
    async fn get_client(&self, client_id: &ClientId) -> ApiResult<Client>;
    /// Sends the program ids to the enroll endpoint. Merge or replace is
    /// decided by the server.
    async fn enroll_client(&self, client_id: &ClientId, program_ids: &[ProgramId])
    -> ApiResult<()>;
    /// Sends the program ids to the unenroll endpoint.
    async fn unenroll_programs(
        &self,
        client_id: &ClientId,
        program_ids: &[ProgramId],
    ) -> ApiResult<()>;
}

/// Removes a single program from a client's enrollment.
pub async fn remove_enrolled_program<A>(
    api: &A,
    client_id: &ClientId,
    program_id: &ProgramId,
) -> ApiResult<()>
where
    A: HealthApi + ?Sized,
{
    api.unenroll_programs(client_id, std::slice::from_ref(program_id))
        .await
}

/// Keeps the clients whose first name, last name or email contain `query`.
pub fn filter_clients(clients: Vec<Client>, query: &str) -> Vec<Client> {
    if query.is_empty() {
        return clients;
    }

    clients
        .into_iter()
        .filter(|client| client.matches(query))
        .collect()
}

/// Fetches the whole client collection and filters it locally.
///
/// The API offers no server-side search, so every call downloads all clients.
pub async fn search_clients<A>(api: &A, query: &str) -> ApiResult<Vec<Client>>
where
    A: HealthApi + ?Sized,
{
    let clients = api.get_clients().await?;
    Ok(filter_clients(clients, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockHealthApi;

    fn client(id: &str, first: &str, last: &str, email: &str) -> Client {
        Client {
            id: ClientId::new(id).unwrap(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            age: None,
            gender: None,
            enrolled_programs: Vec::new(),
        }
    }

    #[tokio::test]
    async fn search_filters_by_name_or_email() {
        let mut api = MockHealthApi::new();
        api.expect_get_clients().times(3).returning(|| {
            Ok(vec![
                client("c1", "Amina", "Wanjiru", "amina@clinic.ke"),
                client("c2", "Brian", "Otieno", "b.otieno@mail.com"),
            ])
        });

        let by_last = search_clients(&api, "OTIE").await.unwrap();
        assert_eq!(by_last.len(), 1);
        assert_eq!(by_last[0].id.as_str(), "c2");

        let by_email = search_clients(&api, "clinic").await.unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].id.as_str(), "c1");

        let all = search_clients(&api, "").await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn remove_enrolled_program_sends_single_id() {
        let mut api = MockHealthApi::new();
        api.expect_unenroll_programs()
            .withf(|client_id, ids| {
                client_id.as_str() == "c1" && ids.len() == 1 && ids[0].as_str() == "p1"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        remove_enrolled_program(
            &api,
            &ClientId::new("c1").unwrap(),
            &ProgramId::new("p1").unwrap(),
        )
        .await
        .unwrap();
    }

    #[test]
    fn only_404_counts_as_not_found() {
        let missing = ApiError::Status {
            status: 404,
            body: String::new(),
        };
        let broken = ApiError::Status {
            status: 500,
            body: String::new(),
        };
        assert!(missing.is_not_found());
        assert!(!broken.is_not_found());
    }
}
