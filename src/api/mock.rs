//! Mock API client for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::api::{ApiResult, HealthApi};
use crate::domain::client::{Client, NewClient};
use crate::domain::program::{NewProgram, Program};
use crate::domain::types::{ClientId, ProgramId};

mock! {
    pub HealthApi {}

    #[async_trait]
    impl HealthApi for HealthApi {
        async fn create_program(&self, program: &NewProgram) -> ApiResult<Program>;
        async fn get_programs(&self) -> ApiResult<Vec<Program>>;
        async fn delete_program(&self, program_id: &ProgramId) -> ApiResult<()>;
        async fn create_client(&self, client: &NewClient) -> ApiResult<Client>;
        async fn get_clients(&self) -> ApiResult<Vec<Client>>;
        async fn get_client(&self, client_id: &ClientId) -> ApiResult<Client>;
        async fn enroll_client(
            &self,
            client_id: &ClientId,
            program_ids: &[ProgramId],
        ) -> ApiResult<()>;
        async fn unenroll_programs(
            &self,
            client_id: &ClientId,
            program_ids: &[ProgramId],
        ) -> ApiResult<()>;
    }
}
