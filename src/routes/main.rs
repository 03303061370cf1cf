use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::api::HealthApi;
use crate::models::theme::Theme;
use crate::routes::{base_context, redirect, render_template, safe_return_path};
use crate::services::dashboard::DashboardView;

#[get("/")]
pub async fn show_index(
    api: web::Data<dyn HealthApi>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut view = DashboardView::default();
    view.load(api.get_ref()).await;

    let mut context = base_context(
        &flash_messages,
        "index",
        Theme::from_session(&session),
        view.error(),
        None,
    );
    context.insert("dashboard", &view);

    render_template(&tera, "main/index.html", &context)
}

#[derive(Deserialize)]
struct ThemeForm {
    #[serde(default)]
    return_to: String,
}

#[post("/theme")]
pub async fn toggle_theme(session: Session, web::Form(form): web::Form<ThemeForm>) -> impl Responder {
    let theme = Theme::from_session(&session).toggled();
    theme.store(&session);
    redirect(safe_return_path(&form.return_to))
}
