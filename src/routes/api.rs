use std::sync::Arc;

use actix_web::{HttpResponse, Responder, get, web};

use crate::api::HealthApi;
use crate::dto::api::{ClientsQuery, ClientsResponse};
use crate::models::config::ServerConfig;
use crate::search::LatestOnly;
use crate::services::clients::ClientsView;

/// Client search for live-search widgets.
#[get("/v1/clients")]
pub async fn api_v1_clients(
    params: web::Query<ClientsQuery>,
    api: web::Data<dyn HealthApi>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let search = params.search.trim();
    let mut view = ClientsView::new(Arc::new(LatestOnly::new(server_config.search_debounce())));
    if search.is_empty() {
        view.load(api.get_ref()).await;
    } else {
        view.search(api.get_ref(), search).await;
    }

    if let Some(message) = view.error() {
        return HttpResponse::InternalServerError().json(serde_json::json!({ "error": message }));
    }

    let clients = view.filtered().to_vec();
    HttpResponse::Ok().json(ClientsResponse {
        search: search.to_string(),
        total: clients.len(),
        clients,
    })
}
