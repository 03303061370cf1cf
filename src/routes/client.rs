use std::sync::Arc;

use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::api::HealthApi;
use crate::domain::client::Gender;
use crate::domain::types::ClientId;
use crate::dto::client::ClientPageData;
use crate::forms::client::RegisterClientForm;
use crate::forms::enrollment::UnenrollForm;
use crate::models::config::ServerConfig;
use crate::models::theme::Theme;
use crate::routes::{base_context, delayed_redirect, redirect, render_template};
use crate::search::LatestOnly;
use crate::services::client_detail::{ClientDetailState, ClientDetailView};
use crate::services::clients::ClientsView;
use crate::services::registration::RegistrationView;

#[derive(Deserialize)]
struct ClientsQueryParams {
    #[serde(default)]
    search: String,
}

#[get("/clients")]
pub async fn show_clients(
    params: web::Query<ClientsQueryParams>,
    api: web::Data<dyn HealthApi>,
    server_config: web::Data<ServerConfig>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let dispatcher = Arc::new(LatestOnly::new(server_config.search_debounce()));
    let mut view = ClientsView::new(dispatcher);
    view.load_with_search(api.get_ref(), params.search.trim())
        .await;

    let mut context = base_context(
        &flash_messages,
        "clients",
        Theme::from_session(&session),
        view.error(),
        None,
    );
    context.insert("clients", view.filtered());
    context.insert("total", &view.clients().len());
    context.insert("search", view.search_term());
    context.insert("empty_message", view.empty_message());

    render_template(&tera, "clients/index.html", &context)
}

fn parse_client_id(raw: String) -> Option<ClientId> {
    ClientId::new(raw).ok()
}

fn render_detail(
    view: &ClientDetailView,
    session: &Session,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    let mut context = base_context(
        flash_messages,
        "clients",
        Theme::from_session(session),
        view.error(),
        None,
    );
    context.insert("client_id", view.client_id().as_str());

    match view.state() {
        ClientDetailState::NotFound => {
            let mut response = render_template(tera, "clients/not_found.html", &context);
            *response.status_mut() = actix_web::http::StatusCode::NOT_FOUND;
            response
        }
        ClientDetailState::Loaded(detail) => {
            context.insert("page", &ClientPageData::from(detail));
            render_template(tera, "clients/show.html", &context)
        }
        ClientDetailState::Loading | ClientDetailState::Error(_) => {
            render_template(tera, "clients/show.html", &context)
        }
    }
}

#[get("/clients/{client_id}")]
pub async fn show_client(
    client_id: web::Path<String>,
    api: web::Data<dyn HealthApi>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(client_id) = parse_client_id(client_id.into_inner()) else {
        FlashMessage::error("Client not found.").send();
        return redirect("/clients");
    };

    let mut view = ClientDetailView::new(client_id);
    view.load(api.get_ref()).await;

    render_detail(&view, &session, &flash_messages, &tera)
}

#[post("/clients/{client_id}/unenroll")]
pub async fn unenroll_client(
    client_id: web::Path<String>,
    api: web::Data<dyn HealthApi>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<UnenrollForm>,
) -> impl Responder {
    let Some(client_id) = parse_client_id(client_id.into_inner()) else {
        FlashMessage::error("Client not found.").send();
        return redirect("/clients");
    };

    let mut view = ClientDetailView::new(client_id);
    match form.program_id() {
        Ok(program_id) => {
            if !view.unenroll(api.get_ref(), &program_id).await {
                // The removal failed, so the page still needs its data.
                view.load(api.get_ref()).await;
            }
        }
        Err(err) => {
            log::warn!("Rejected unenroll form: {err}");
            view.load(api.get_ref()).await;
        }
    }

    render_detail(&view, &session, &flash_messages, &tera)
}

fn render_registration(
    view: &RegistrationView,
    session: &Session,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    let mut context = base_context(
        flash_messages,
        "register",
        Theme::from_session(session),
        view.error(),
        None,
    );
    let genders: Vec<(&str, &str)> = Gender::ALL
        .iter()
        .map(|gender| (gender.as_str(), gender.label()))
        .collect();
    context.insert("form", view.form());
    context.insert("genders", &genders);

    render_template(tera, "clients/register.html", &context)
}

#[get("/register")]
pub async fn show_register(
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_registration(&RegistrationView::new(), &session, &flash_messages, &tera)
}

#[post("/register")]
pub async fn register_client(
    api: web::Data<dyn HealthApi>,
    server_config: web::Data<ServerConfig>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<RegisterClientForm>,
) -> impl Responder {
    let mut view = RegistrationView::with_form(form);

    match view.submit(api.get_ref()).await {
        Some(next) => {
            let context = base_context(
                &flash_messages,
                "register",
                Theme::from_session(&session),
                None,
                None,
            );
            delayed_redirect(
                &tera,
                context,
                view.success().unwrap_or_default(),
                &next.target,
                server_config.redirect_delay_ms,
            )
        }
        None => render_registration(&view, &session, &flash_messages, &tera),
    }
}
