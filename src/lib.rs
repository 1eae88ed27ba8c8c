#[cfg(feature = "server")]
use std::time::Duration;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;

pub mod db;
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
pub mod forms;
pub mod models;
pub mod query;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool)
        .slow_query_threshold(Duration::from_millis(server_config.slow_query_ms));

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Serving clients API on {}:{}{}",
        bind_address.0,
        bind_address.1,
        server_config.api_prefix
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(web::scope(&server_config.api_prefix).configure(routes::configure))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
