//! HTTP handlers rendering the portal pages.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::dto::main::RedirectPageData;
use crate::models::theme::Theme;

pub mod api;
pub mod client;
pub mod enrollment;
pub mod main;
pub mod programs;

/// Maps a flash level onto the Bootstrap alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every page: alerts, the active nav entry and the theme.
///
/// `error` and `success` are the messages held by the page's own view and are
/// shown after any flashed messages.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    current_page: &str,
    theme: Theme,
    error: Option<&str>,
    success: Option<&str>,
) -> Context {
    let mut alerts = flash_messages
        .iter()
        .map(|f| (f.content().to_string(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    if let Some(message) = error {
        alerts.push((message.to_string(), alert_level_to_str(&Level::Error)));
    }
    if let Some(message) = success {
        alerts.push((message.to_string(), alert_level_to_str(&Level::Success)));
    }

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context.insert("theme", theme.as_str());
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Renders the interstitial that moves on to `target` after `delay_ms`.
pub fn delayed_redirect(
    tera: &Tera,
    mut context: Context,
    message: &str,
    target: &str,
    delay_ms: u64,
) -> HttpResponse {
    context.insert("redirect", &RedirectPageData::new(message, target, delay_ms));
    render_template(tera, "main/redirect.html", &context)
}

/// Only same-site absolute paths are accepted as redirect targets.
pub fn safe_return_path(candidate: &str) -> &str {
    if candidate.starts_with('/') && !candidate.starts_with("//") {
        candidate
    } else {
        "/"
    }
}
