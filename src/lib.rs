//! Health-information portal: a server-rendered front end for an external
//! programs-and-clients API.
//!
//! With only the `data` feature the crate exposes the reusable client layer
//! (`domain`, `forms`, `api`, `search`, `services`). The `server` feature adds
//! the Actix-web application on top.

pub mod api;
pub mod domain;
pub mod forms;
pub mod search;
pub mod services;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;

#[cfg(feature = "server")]
pub use server::{build_api, run};

#[cfg(feature = "server")]
mod server {
    use std::sync::Arc;

    use actix_cors::Cors;
    use actix_files::Files;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::api::{HealthApi, HttpHealthApi};
    use crate::models::config::ServerConfig;
    use crate::routes::api::api_v1_clients;
    use crate::routes::client::{
        register_client, show_client, show_clients, show_register, unenroll_client,
    };
    use crate::routes::enrollment::{save_enrollment, show_enrollment};
    use crate::routes::main::{show_index, toggle_theme};
    use crate::routes::programs::{
        add_program, confirm_delete_program, delete_program, show_programs,
    };

    /// Builds the HTTP client for the configured health API host.
    pub fn build_api(server_config: &ServerConfig) -> std::io::Result<Arc<dyn HealthApi>> {
        let api = HttpHealthApi::new(&server_config.api_base_url, server_config.api_timeout())
            .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;
        Ok(Arc::new(api))
    }

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let api = web::Data::from(build_api(&server_config)?);
        log::info!("Using health API at {}", server_config.api_base_url);

        // Keys and stores for sessions and flash messages.
        let secret_key = Key::try_from(server_config.secret.as_bytes()).map_err(|e| {
            std::io::Error::other(format!("Secret must be at least 64 bytes long: {e}"))
        })?;

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
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
                .app_data(web::Data::new(tera.clone()))
                .app_data(api.clone())
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
