use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::api::HealthApi;
use crate::domain::types::ClientId;
use crate::dto::client::EnrollmentPageData;
use crate::forms::enrollment::{EnrollmentAction, EnrollmentForm};
use crate::models::config::ServerConfig;
use crate::models::theme::Theme;
use crate::routes::{base_context, delayed_redirect, redirect, render_template};
use crate::services::enrollment::{EnrollmentState, EnrollmentView};

#[derive(Deserialize)]
struct EnrollmentQueryParams {
    #[serde(default)]
    filter: String,
}

fn render_enrollment(
    view: &EnrollmentView,
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

    if *view.state() == EnrollmentState::NotFound {
        let mut response = render_template(tera, "clients/not_found.html", &context);
        *response.status_mut() = StatusCode::NOT_FOUND;
        return response;
    }

    context.insert("page", &EnrollmentPageData::from(view));
    render_template(tera, "enroll/index.html", &context)
}

#[get("/enroll/{client_id}")]
pub async fn show_enrollment(
    client_id: web::Path<String>,
    params: web::Query<EnrollmentQueryParams>,
    api: web::Data<dyn HealthApi>,
    server_config: web::Data<ServerConfig>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(client_id) = ClientId::new(client_id.into_inner()) else {
        FlashMessage::error("Client not found.").send();
        return redirect("/clients");
    };

    let mut view = EnrollmentView::new(client_id, server_config.enrollment_semantics);
    view.load(api.get_ref()).await;
    view.set_filter(params.filter.trim());

    render_enrollment(&view, &session, &flash_messages, &tera)
}

/// Handles both buttons of the enrollment form.
///
/// The body is decoded with `serde_html_form` because every checked box
/// repeats the `program_ids` key.
#[post("/enroll/{client_id}")]
pub async fn save_enrollment(
    client_id: web::Path<String>,
    body: web::Bytes,
    api: web::Data<dyn HealthApi>,
    server_config: web::Data<ServerConfig>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(client_id) = ClientId::new(client_id.into_inner()) else {
        FlashMessage::error("Client not found.").send();
        return redirect("/clients");
    };

    let form: EnrollmentForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Rejected enrollment form: {err}");
            return HttpResponse::BadRequest().finish();
        }
    };
    let selection = match form.selection() {
        Ok(selection) => selection,
        Err(err) => {
            log::warn!("Rejected enrollment selection: {err}");
            return HttpResponse::BadRequest().finish();
        }
    };

    let mut view = EnrollmentView::new(client_id, server_config.enrollment_semantics);
    view.load(api.get_ref()).await;
    view.replace_selection(selection);
    view.set_filter(form.filter.trim());

    if form.action == EnrollmentAction::Save {
        if let Some(next) = view.submit(api.get_ref()).await {
            let context = base_context(
                &flash_messages,
                "clients",
                Theme::from_session(&session),
                None,
                None,
            );
            return delayed_redirect(
                &tera,
                context,
                view.success().unwrap_or_default(),
                &next.target,
                server_config.redirect_delay_ms,
            );
        }
    }

    render_enrollment(&view, &session, &flash_messages, &tera)
}
