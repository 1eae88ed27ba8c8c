use actix_web::{HttpResponse, web};

use crate::dto::api::MessageResponse;
use crate::services::{ServiceError, ServiceResult};

pub mod api;

/// Registers every clients API route on the given (usually versioned) scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api::index)
        .service(api::list_clients)
        .service(api::show_client)
        .service(api::show_client_hierarchy)
        .service(api::show_client_hierarchy_ids);
}

/// Maps a service failure onto the `404 {message}` body.
pub fn service_error_response(err: &ServiceError) -> HttpResponse {
    HttpResponse::NotFound().json(MessageResponse::new(err.to_string()))
}

/// Runs a blocking service call on the Actix thread pool.
pub async fn run_blocking<T, F>(f: F) -> Result<T, HttpResponse>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    match web::block(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(service_error_response(&err)),
        Err(err) => {
            log::error!("Blocking task failed: {err}");
            Err(HttpResponse::InternalServerError().finish())
        }
    }
}
