use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, Level, storage::CookieMessageStore};
use async_trait::async_trait;
use tera::Tera;

use health_portal::api::{ApiError, ApiResult, HealthApi};
use health_portal::domain::client::{Client, NewClient};
use health_portal::domain::program::{EnrolledProgram, NewProgram, Program};
use health_portal::domain::types::{ClientId, ProgramId};
use health_portal::models::config::ServerConfig;
use health_portal::routes::alert_level_to_str;
use health_portal::routes::api::api_v1_clients;
use health_portal::routes::client::{
    register_client, show_client, show_clients, show_register, unenroll_client,
};
use health_portal::routes::enrollment::{save_enrollment, show_enrollment};
use health_portal::routes::main::{show_index, toggle_theme};
use health_portal::routes::programs::{
    add_program, confirm_delete_program, delete_program, show_programs,
};
use health_portal::services::enrollment::EnrollmentSemantics;

/// In-memory stand-in for the external health API that records mutations.
#[derive(Default)]
struct FakeApi {
    programs: Mutex<Vec<Program>>,
    clients: Mutex<Vec<Client>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn seeded() -> Self {
        let api = FakeApi::default();
        *api.programs.lock().unwrap() = vec![
            program("p1", "Diabetes Care"),
            program("p2", "Maternal Health"),
            program("p3", "TB Screening"),
        ];
        *api.clients.lock().unwrap() = vec![
            client("c1", "Amina", "Wanjiru", &["p1", "p2"]),
            client("c2", "Brian", "Otieno", &["p1", "retired"]),
        ];
        api
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn program(id: &str, name: &str) -> Program {
    Program {
        id: ProgramId::new(id).unwrap(),
        name: name.to_string(),
        description: None,
    }
}

fn client(id: &str, first: &str, last: &str, enrolled: &[&str]) -> Client {
    Client {
        id: ClientId::new(id).unwrap(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        age: Some(30),
        gender: None,
        enrolled_programs: enrolled
            .iter()
            .map(|id| EnrolledProgram {
                id: ProgramId::new(*id).unwrap(),
                name: None,
            })
            .collect(),
    }
}

fn joined(ids: &[ProgramId]) -> String {
    ids.iter()
        .map(ProgramId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        body: "Not found".to_string(),
    }
}

#[async_trait]
impl HealthApi for FakeApi {
    async fn create_program(&self, payload: &NewProgram) -> ApiResult<Program> {
        self.record(format!("create_program {}", payload.name));
        let mut programs = self.programs.lock().unwrap();
        let created = Program {
            id: ProgramId::new(format!("p{}", programs.len() + 1)).unwrap(),
            name: payload.name.to_string(),
            description: payload.description.as_ref().map(|d| d.to_string()),
        };
        programs.push(created.clone());
        Ok(created)
    }

    async fn get_programs(&self) -> ApiResult<Vec<Program>> {
        Ok(self.programs.lock().unwrap().clone())
    }

    async fn delete_program(&self, program_id: &ProgramId) -> ApiResult<()> {
        self.record(format!("delete_program {program_id}"));
        self.programs
            .lock()
            .unwrap()
            .retain(|program| &program.id != program_id);
        Ok(())
    }

    async fn create_client(&self, payload: &NewClient) -> ApiResult<Client> {
        self.record(format!("create_client {}", payload.email));
        let mut clients = self.clients.lock().unwrap();
        let created = Client {
            id: ClientId::new(format!("c{}", clients.len() + 1)).unwrap(),
            first_name: payload.first_name.to_string(),
            last_name: payload.last_name.to_string(),
            email: payload.email.to_string(),
            age: payload.age,
            gender: payload.gender,
            enrolled_programs: Vec::new(),
        };
        clients.push(created.clone());
        Ok(created)
    }

    async fn get_clients(&self) -> ApiResult<Vec<Client>> {
        Ok(self.clients.lock().unwrap().clone())
    }

    async fn get_client(&self, client_id: &ClientId) -> ApiResult<Client> {
        self.clients
            .lock()
            .unwrap()
            .iter()
            .find(|client| &client.id == client_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn enroll_client(&self, client_id: &ClientId, program_ids: &[ProgramId]) -> ApiResult<()> {
        self.record(format!("enroll {client_id} {}", joined(program_ids)));
        Ok(())
    }

    async fn unenroll_programs(
        &self,
        client_id: &ClientId,
        program_ids: &[ProgramId],
    ) -> ApiResult<()> {
        self.record(format!("unenroll {client_id} {}", joined(program_ids)));
        let mut clients = self.clients.lock().unwrap();
        if let Some(client) = clients.iter_mut().find(|client| &client.id == client_id) {
            client
                .enrolled_programs
                .retain(|enrolled| !program_ids.contains(&enrolled.id));
        }
        Ok(())
    }
}

fn server_config() -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 0,
        api_base_url: "http://localhost:8000".to_string(),
        api_timeout_secs: 5,
        templates_dir: "templates/**/*".to_string(),
        secret: "x".repeat(64),
        redirect_delay_ms: 1500,
        search_debounce_ms: 0,
        enrollment_semantics: EnrollmentSemantics::Union,
    }
}

macro_rules! portal_app {
    ($api:expr) => {{
        let secret_key = Key::from(&[7u8; 64]);
        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let api: Arc<dyn HealthApi> = $api;
        test::init_service(
            App::new()
                .wrap(FlashMessagesFramework::builder(message_store).build())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key)
                        .cookie_secure(false)
                        .build(),
                )
                .service(web::scope("/api").service(api_v1_clients))
                .service(show_index)
                .service(toggle_theme)
                .service(show_programs)
                .service(add_program)
                .service(confirm_delete_program)
                .service(delete_program)
                .service(show_clients)
                .service(show_client)
                .service(unenroll_client)
                .service(show_register)
                .service(register_client)
                .service(show_enrollment)
                .service(save_enrollment)
                .app_data(web::Data::new(Tera::new("templates/**/*").unwrap()))
                .app_data(web::Data::from(api))
                .app_data(web::Data::new(server_config())),
        )
        .await
    }};
}

fn body_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[actix_web::test]
async fn dashboard_shows_counts() {
    let app = portal_app!(Arc::new(FakeApi::seeded()));

    let req = test::TestRequest::get().uri("/").to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(body.contains(r#"<div class="display-6" id="client-count">2</div>"#));
    assert!(body.contains(r#"<div class="display-6" id="program-count">3</div>"#));
}

#[actix_web::test]
async fn programs_search_filters_list() {
    let app = portal_app!(Arc::new(FakeApi::seeded()));

    let req = test::TestRequest::get()
        .uri("/programs?search=mat")
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(body.contains("Maternal Health"));
    assert!(!body.contains("Diabetes Care"));
}

#[actix_web::test]
async fn blank_program_name_is_rejected_without_request() {
    let api = Arc::new(FakeApi::seeded());
    let app = portal_app!(api.clone());

    let req = test::TestRequest::post()
        .uri("/programs")
        .set_form([("name", "   "), ("description", ""), ("search", "")])
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(body.contains("Program name is required"));
    assert!(api.calls().is_empty());
}

#[actix_web::test]
async fn declined_delete_issues_no_request() {
    let api = Arc::new(FakeApi::seeded());
    let app = portal_app!(api.clone());

    let req = test::TestRequest::post()
        .uri("/programs/p1/delete")
        .set_form([("confirm", "no"), ("search", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/programs");
    assert!(api.calls().is_empty());
}

#[actix_web::test]
async fn confirmed_delete_removes_program_from_page() {
    let api = Arc::new(FakeApi::seeded());
    let app = portal_app!(api.clone());

    let req = test::TestRequest::post()
        .uri("/programs/p1/delete")
        .set_form([("confirm", "yes"), ("search", "")])
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert_eq!(api.calls(), vec!["delete_program p1".to_string()]);
    assert!(body.contains("Program deleted successfully!"));
    assert!(!body.contains("Diabetes Care"));
}

#[actix_web::test]
async fn client_detail_marks_missing_programs_unknown() {
    let app = portal_app!(Arc::new(FakeApi::seeded()));

    let req = test::TestRequest::get().uri("/clients/c2").to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(body.contains("Brian Otieno"));
    assert!(body.contains("Diabetes Care"));
    assert!(body.contains("Unknown Program"));
}

#[actix_web::test]
async fn missing_client_renders_not_found() {
    let app = portal_app!(Arc::new(FakeApi::seeded()));

    let req = test::TestRequest::get().uri("/clients/nobody").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains("Client not found"));
}

#[actix_web::test]
async fn unenroll_reloads_detail_from_server() {
    let api = Arc::new(FakeApi::seeded());
    let app = portal_app!(api.clone());

    let req = test::TestRequest::post()
        .uri("/clients/c1/unenroll")
        .set_form([("program_id", "p2")])
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert_eq!(api.calls(), vec!["unenroll c1 p2".to_string()]);
    assert!(body.contains("Diabetes Care"));
    assert!(!body.contains("Maternal Health"));
}

#[actix_web::test]
async fn registration_requires_first_name() {
    let api = Arc::new(FakeApi::seeded());
    let app = portal_app!(api.clone());

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form([
            ("first_name", ""),
            ("last_name", "Wanjiru"),
            ("email", "a@b.co"),
            ("age", ""),
            ("gender", ""),
        ])
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(body.contains("First name is required"));
    assert!(api.calls().is_empty());
}

#[actix_web::test]
async fn registration_moves_on_to_enrollment() {
    let api = Arc::new(FakeApi::seeded());
    let app = portal_app!(api.clone());

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form([
            ("first_name", "Chloe"),
            ("last_name", "Amadi"),
            ("email", "chloe@example.com"),
            ("age", "41"),
            ("gender", "female"),
        ])
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert_eq!(
        api.calls(),
        vec!["create_client chloe@example.com".to_string()]
    );
    assert!(body.contains("Client registered successfully!"));
    assert!(body.contains(r#"http-equiv="refresh" content="2;url="#));
    assert!(body.contains("c3"));
}

#[actix_web::test]
async fn enrollment_page_pre_checks_current_programs() {
    let app = portal_app!(Arc::new(FakeApi::seeded()));

    let req = test::TestRequest::get().uri("/enroll/c1").to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(body.contains(r#"value="p1" checked"#));
    assert!(body.contains(r#"value="p2" checked"#));
    assert!(body.contains(r#"value="p3" >"#));
    assert!(body.contains("2 program(s) selected"));
}

#[actix_web::test]
async fn enrollment_filter_keeps_hidden_selection() {
    let api = Arc::new(FakeApi::seeded());
    let app = portal_app!(api.clone());

    let req = test::TestRequest::post()
        .uri("/enroll/c1")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("program_ids=p1&program_ids=p2&filter=tb&action=filter")
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(api.calls().is_empty());
    assert!(body.contains("TB Screening"));
    assert!(!body.contains("Maternal Health"));
    assert!(body.contains(r#"<input type="hidden" name="program_ids" value="p2">"#));
    assert!(body.contains("2 program(s) selected"));
}

#[actix_web::test]
async fn saving_enrollment_sends_whole_selection_then_removals() {
    let api = Arc::new(FakeApi::seeded());
    let app = portal_app!(api.clone());

    let req = test::TestRequest::post()
        .uri("/enroll/c1")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("program_ids=p1&program_ids=p3&filter=&action=save")
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert_eq!(
        api.calls(),
        vec!["enroll c1 p1,p3".to_string(), "unenroll c1 p2".to_string()]
    );
    assert!(body.contains("Client successfully enrolled in selected programs!"));
}

#[actix_web::test]
async fn json_search_filters_clients() {
    let app = portal_app!(Arc::new(FakeApi::seeded()));

    let req = test::TestRequest::get()
        .uri("/api/v1/clients?search=OTIE")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 1);
    assert_eq!(body["search"], "OTIE");
    assert_eq!(body["clients"][0]["id"], "c2");
}

#[actix_web::test]
async fn theme_toggle_redirects_back() {
    let app = portal_app!(Arc::new(FakeApi::seeded()));

    let req = test::TestRequest::post()
        .uri("/theme")
        .set_form([("return_to", "/clients")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/clients");
}
