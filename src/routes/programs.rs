use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::{Context, Tera};

use crate::api::HealthApi;
use crate::domain::types::ProgramId;
use crate::forms::program::{AddProgramForm, DeleteProgramForm};
use crate::models::theme::Theme;
use crate::routes::{base_context, redirect, render_template};
use crate::services::programs::{DELETE_PROGRAM_PROMPT, DeleteOutcome, ProgramsView};

#[derive(Deserialize)]
struct ProgramsQueryParams {
    #[serde(default)]
    search: String,
}

fn programs_url(search: &str) -> String {
    if search.is_empty() {
        return "/programs".to_string();
    }
    match serde_html_form::to_string([("search", search)]) {
        Ok(query) => format!("/programs?{query}"),
        Err(_) => "/programs".to_string(),
    }
}

fn programs_context(
    view: &ProgramsView,
    flash_messages: &IncomingFlashMessages,
    theme: Theme,
) -> Context {
    let mut context = base_context(
        flash_messages,
        "programs",
        theme,
        view.error(),
        view.success(),
    );
    context.insert("programs", view.filtered());
    context.insert("total", &view.programs().len());
    context.insert("search", view.search_term());
    context.insert("empty_message", view.empty_message());
    context
}

#[get("/programs")]
pub async fn show_programs(
    params: web::Query<ProgramsQueryParams>,
    api: web::Data<dyn HealthApi>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut view = ProgramsView::with_search_term(params.search.trim());
    view.load(api.get_ref()).await;

    let mut context = programs_context(&view, &flash_messages, Theme::from_session(&session));
    context.insert("form_name", "");
    context.insert("form_description", "");

    render_template(&tera, "programs/index.html", &context)
}

#[post("/programs")]
pub async fn add_program(
    api: web::Data<dyn HealthApi>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<AddProgramForm>,
) -> impl Responder {
    let mut view = ProgramsView::with_search_term(form.search.trim());
    view.load(api.get_ref()).await;

    let created = if view.error().is_none() {
        view.create_program(api.get_ref(), &form).await
    } else {
        None
    };

    let mut context = programs_context(&view, &flash_messages, Theme::from_session(&session));
    // Keep what was typed unless the program now exists.
    if created.is_some() {
        context.insert("form_name", "");
        context.insert("form_description", "");
    } else {
        context.insert("form_name", &form.name);
        context.insert("form_description", &form.description);
    }

    render_template(&tera, "programs/index.html", &context)
}

#[get("/programs/{program_id}/delete")]
pub async fn confirm_delete_program(
    program_id: web::Path<String>,
    params: web::Query<ProgramsQueryParams>,
    api: web::Data<dyn HealthApi>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(program_id) = ProgramId::new(program_id.into_inner()) else {
        FlashMessage::error("Program not found.").send();
        return redirect("/programs");
    };

    let mut view = ProgramsView::new();
    view.load(api.get_ref()).await;
    if let Some(message) = view.error() {
        FlashMessage::error(message).send();
        return redirect(&programs_url(&params.search));
    }

    let Some(program) = view.find(&program_id) else {
        FlashMessage::error("Program not found.").send();
        return redirect(&programs_url(&params.search));
    };

    let mut context = base_context(
        &flash_messages,
        "programs",
        Theme::from_session(&session),
        None,
        None,
    );
    context.insert("program", program);
    context.insert("prompt", DELETE_PROGRAM_PROMPT);
    context.insert("search", &params.search);

    render_template(&tera, "programs/confirm_delete.html", &context)
}

#[post("/programs/{program_id}/delete")]
pub async fn delete_program(
    program_id: web::Path<String>,
    api: web::Data<dyn HealthApi>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<DeleteProgramForm>,
) -> impl Responder {
    let Ok(program_id) = ProgramId::new(program_id.into_inner()) else {
        FlashMessage::error("Program not found.").send();
        return redirect("/programs");
    };

    // A declined confirmation goes straight back without touching the API.
    if !form.confirmed() {
        return redirect(&programs_url(&form.search));
    }

    let mut view = ProgramsView::with_search_term(form.search.trim());
    view.load(api.get_ref()).await;
    if view.error().is_none() {
        let outcome = view
            .delete_program(api.get_ref(), &program_id, &form.confirmed())
            .await;
        if outcome == DeleteOutcome::Deleted {
            log::info!("Deleted program {program_id}");
        }
    }

    let mut context = programs_context(&view, &flash_messages, Theme::from_session(&session));
    context.insert("form_name", "");
    context.insert("form_description", "");

    render_template(&tera, "programs/index.html", &context)
}
