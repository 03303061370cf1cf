//! Exercises the reqwest client against a local server speaking the health
//! API's REST dialect.

use std::sync::Mutex;
use std::time::Duration;

use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

use health_portal::api::{HealthApi, HttpHealthApi};
use health_portal::domain::client::NewClient;
use health_portal::domain::program::NewProgram;
use health_portal::domain::types::{
    ClientEmail, ClientId, PersonName, ProgramDescription, ProgramId, ProgramName,
};

#[derive(Default)]
struct Backend {
    programs: Mutex<Vec<Value>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl Backend {
    fn record(&self, what: &str, body: Value) {
        self.requests
            .lock()
            .unwrap()
            .push((what.to_string(), body));
    }
}

async fn list_programs(backend: web::Data<Backend>) -> HttpResponse {
    HttpResponse::Ok().json(backend.programs.lock().unwrap().clone())
}

async fn create_program(backend: web::Data<Backend>, body: web::Json<Value>) -> HttpResponse {
    backend.record("create_program", body.0.clone());
    let mut programs = backend.programs.lock().unwrap();
    let mut created = body.0;
    created["id"] = json!(format!("p{}", programs.len() + 1));
    programs.push(created.clone());
    HttpResponse::Ok().json(created)
}

async fn delete_program(backend: web::Data<Backend>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    let mut programs = backend.programs.lock().unwrap();
    let before = programs.len();
    programs.retain(|program| program["id"] != json!(id));
    if programs.len() == before {
        HttpResponse::NotFound().json(json!({ "detail": "Program not found" }))
    } else {
        HttpResponse::NoContent().finish()
    }
}

async fn create_client(backend: web::Data<Backend>, body: web::Json<Value>) -> HttpResponse {
    backend.record("create_client", body.0.clone());
    let mut created = body.0;
    created["id"] = json!("c1");
    created["enrolled_programs"] = json!([]);
    HttpResponse::Ok().json(created)
}

async fn get_client(path: web::Path<String>) -> HttpResponse {
    if path.as_str() == "c1" {
        HttpResponse::Ok().json(json!({
            "id": "c1",
            "first_name": "Amina",
            "last_name": "Wanjiru",
            "email": "amina@example.com",
            "gender": "female",
            "enrolled_programs": [{ "id": "p1", "name": "Diabetes Care" }, { "id": "p9" }]
        }))
    } else {
        HttpResponse::NotFound().json(json!({ "detail": "Client not found" }))
    }
}

async fn enroll(
    backend: web::Data<Backend>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    backend.record(&format!("enroll {}", path.into_inner()), body.0);
    HttpResponse::Ok().json(json!({ "message": "ok" }))
}

async fn unenroll(
    backend: web::Data<Backend>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    backend.record(&format!("unenroll {}", path.into_inner()), body.0);
    HttpResponse::Ok().json(json!({ "message": "ok" }))
}

/// Starts the backend on an ephemeral port and returns its base URL.
fn spawn_backend(backend: web::Data<Backend>) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(backend.clone())
            .route("/programs/", web::get().to(list_programs))
            .route("/programs/", web::post().to(create_program))
            .route("/programs/{id}", web::delete().to(delete_program))
            .route("/clients/", web::post().to(create_client))
            .route("/clients/{id}", web::get().to(get_client))
            .route("/clients/{id}/enroll", web::post().to(enroll))
            .route("/clients/{id}/unenroll", web::post().to(unenroll))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}/")
}

fn api_for(backend: &web::Data<Backend>) -> HttpHealthApi {
    HttpHealthApi::new(spawn_backend(backend.clone()), Duration::from_secs(5)).unwrap()
}

#[actix_web::test]
async fn created_program_is_listed_and_listing_is_stable() {
    let backend = web::Data::new(Backend::default());
    let api = api_for(&backend);

    let created = api
        .create_program(&NewProgram::new(
            ProgramName::new("Maternal Health").unwrap(),
            ProgramDescription::parse("Antenatal visits"),
        ))
        .await
        .unwrap();

    assert_eq!(created.id.as_str(), "p1");
    assert_eq!(created.description.as_deref(), Some("Antenatal visits"));

    let first = api.get_programs().await.unwrap();
    let second = api.get_programs().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, vec![created]);
}

#[actix_web::test]
async fn program_without_description_omits_the_field() {
    let backend = web::Data::new(Backend::default());
    let api = api_for(&backend);

    api.create_program(&NewProgram::new(ProgramName::new("TB").unwrap(), None))
        .await
        .unwrap();

    let requests = backend.requests.lock().unwrap();
    assert_eq!(requests[0].1, json!({ "name": "TB" }));
}

#[actix_web::test]
async fn deleting_unknown_program_fails() {
    let backend = web::Data::new(Backend::default());
    let api = api_for(&backend);

    let err = api
        .delete_program(&ProgramId::new("nope").unwrap())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[actix_web::test]
async fn get_client_decodes_enrollments_and_reports_missing() {
    let backend = web::Data::new(Backend::default());
    let api = api_for(&backend);

    let client = api.get_client(&ClientId::new("c1").unwrap()).await.unwrap();
    assert_eq!(client.full_name(), "Amina Wanjiru");
    assert_eq!(client.enrolled_programs.len(), 2);
    assert_eq!(client.enrolled_programs[1].name, None);

    let missing = api
        .get_client(&ClientId::new("c404").unwrap())
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
}

#[actix_web::test]
async fn create_client_posts_only_given_fields() {
    let backend = web::Data::new(Backend::default());
    let api = api_for(&backend);

    let created = api
        .create_client(&NewClient {
            first_name: PersonName::new("Amina").unwrap(),
            last_name: PersonName::new("Wanjiru").unwrap(),
            email: ClientEmail::new("amina@example.com").unwrap(),
            age: Some(34),
            gender: None,
        })
        .await
        .unwrap();

    assert_eq!(created.id.as_str(), "c1");
    assert!(created.enrolled_programs.is_empty());
    let requests = backend.requests.lock().unwrap();
    assert_eq!(
        requests[0].1,
        json!({
            "first_name": "Amina",
            "last_name": "Wanjiru",
            "email": "amina@example.com",
            "age": 34
        })
    );
}

#[actix_web::test]
async fn enrollment_calls_send_id_arrays() {
    let backend = web::Data::new(Backend::default());
    let api = api_for(&backend);
    let client_id = ClientId::new("c1").unwrap();

    api.enroll_client(
        &client_id,
        &[ProgramId::new("p1").unwrap(), ProgramId::new("p2").unwrap()],
    )
    .await
    .unwrap();
    health_portal::api::remove_enrolled_program(&api, &client_id, &ProgramId::new("p1").unwrap())
        .await
        .unwrap();

    let requests = backend.requests.lock().unwrap();
    assert_eq!(
        *requests,
        vec![
            ("enroll c1".to_string(), json!(["p1", "p2"])),
            ("unenroll c1".to_string(), json!(["p1"])),
        ]
    );
}

#[actix_web::test]
async fn description_is_posted_verbatim() {
    let backend = web::Data::new(Backend::default());
    let api = api_for(&backend);

    let created = api
        .create_program(&NewProgram::new(
            ProgramName::new("Maternal Health").unwrap(),
            ProgramDescription::parse("Mother & child, BMI < 25"),
        ))
        .await
        .unwrap();

    assert_eq!(
        created.description.as_deref(),
        Some("Mother & child, BMI < 25")
    );
    let requests = backend.requests.lock().unwrap();
    assert_eq!(
        requests[0].1,
        json!({ "name": "Maternal Health", "description": "Mother & child, BMI < 25" })
    );
}

#[actix_web::test]
async fn ids_are_encoded_as_single_path_segments() {
    let backend = web::Data::new(Backend::default());
    let api = api_for(&backend);

    let err = api
        .get_client(&ClientId::new("c1/enroll?x#y").unwrap())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(backend.requests.lock().unwrap().is_empty());
}
