use std::sync::LazyLock;

use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use log::{error, info, warn};
use regex::Regex;

use crate::dto::api::{
    IndexResponse, ListResponse, LookupResponse, MessageResponse, NotFoundResponse,
};
use crate::forms::filter::ClientFilter;
use crate::models::config::ServerConfig;
use crate::query::hierarchy::HierarchyQuery;
use crate::repository::DieselRepository;
use crate::routes::run_blocking;
use crate::services::clients::get_clients;
use crate::services::hierarchy::{get_client_hierarchy, get_client_hierarchy_ids};
use crate::services::schema::SchemaViolations;

static CLIENT_ID_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid client id pattern"));
static SEED_IDS_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(,\d+)*$").expect("valid seed ids pattern"));

fn parse_client_id(raw: &str) -> Option<i32> {
    if CLIENT_ID_PARAM.is_match(raw) {
        raw.parse().ok()
    } else {
        None
    }
}

fn parse_seed_ids(raw: &str) -> Option<Vec<i32>> {
    if !SEED_IDS_PARAM.is_match(raw) {
        return None;
    }
    raw.split(',').map(|id| id.parse().ok()).collect()
}

fn invalid_parameter(req: &HttpRequest) -> HttpResponse {
    error!(
        "[clients][Method: {}][INVALID_PARAMETER: {}]",
        req.method(),
        req.uri()
    );
    HttpResponse::BadRequest().json(MessageResponse::new("INVALID_PARAMETER"))
}

/// Parses the query string; `ids_clients` may be repeated.
fn parse_filter(req: &HttpRequest) -> Result<ClientFilter, HttpResponse> {
    serde_html_form::from_str::<ClientFilter>(req.query_string()).map_err(|err| {
        let violations = SchemaViolations::single("query", err.to_string());
        error!("[clients][entry] {violations}");
        HttpResponse::NotFound().json(MessageResponse::new("Filter is invalid"))
    })
}

#[get("/")]
pub async fn index(req: HttpRequest, server_config: web::Data<ServerConfig>) -> impl Responder {
    info!("[index][Method: {}][URI: {}]", req.method(), req.uri());

    HttpResponse::Ok().json(IndexResponse {
        message: format!("API - version: {}", server_config.api_prefix),
        uri: req.uri().to_string(),
    })
}

#[get("/clients")]
pub async fn list_clients(req: HttpRequest, repo: web::Data<DieselRepository>) -> impl Responder {
    info!("[clients][Method: {}][URI: {}]", req.method(), req.uri());

    let filter = match parse_filter(&req) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    let repo = repo.into_inner();
    let page = match run_blocking(move || get_clients(repo.as_ref(), None, Some(&filter))).await {
        Ok(page) => page,
        Err(response) => return response,
    };

    if !page.is_empty() {
        HttpResponse::Ok().json(ListResponse {
            total: page.total,
            content: page.content,
        })
    } else {
        warn!("[clients][Method: {}][NOT_FOUND: {}]", req.method(), req.uri());
        HttpResponse::Ok().json(NotFoundResponse::<i32> {
            total: page.total,
            id: None,
            message: "NOT_FOUND",
        })
    }
}

#[get("/client/{id}")]
pub async fn show_client(
    req: HttpRequest,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Some(id) = parse_client_id(&path) else {
        return invalid_parameter(&req);
    };

    info!("[clients][Method: {}][URI: {}]", req.method(), req.uri());

    let repo = repo.into_inner();
    let page = match run_blocking(move || get_clients(repo.as_ref(), Some(id), None)).await {
        Ok(page) => page,
        Err(response) => return response,
    };

    if !page.is_empty() {
        HttpResponse::Ok().json(LookupResponse {
            total: page.total,
            id,
            content: page.content,
        })
    } else {
        warn!(
            "[clients][Method: {}][CLIENT_NOT_FOUND: {}]",
            req.method(),
            req.uri()
        );
        HttpResponse::Ok().json(NotFoundResponse {
            total: page.total,
            id: Some(id),
            message: "CLIENT_NOT_FOUND",
        })
    }
}

#[get("/client/{ids}/hierarchy")]
pub async fn show_client_hierarchy(
    req: HttpRequest,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Some(seeds) = parse_seed_ids(&path) else {
        return invalid_parameter(&req);
    };

    info!("[clients][Method: {}][URI: {}]", req.method(), req.uri());

    let filter = match parse_filter(&req) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    let query = HierarchyQuery::new(seeds.clone());
    let repo = repo.into_inner();
    let page = match run_blocking(move || {
        get_client_hierarchy(repo.as_ref(), &query, Some(&filter))
    })
    .await
    {
        Ok(page) => page,
        Err(response) => return response,
    };

    if !page.is_empty() {
        HttpResponse::Ok().json(LookupResponse {
            total: page.total,
            id: seeds,
            content: page.content,
        })
    } else {
        warn!(
            "[clients][Method: {}][CLIENT_NOT_FOUND: {}]",
            req.method(),
            req.uri()
        );
        HttpResponse::Ok().json(NotFoundResponse {
            total: page.total,
            id: Some(seeds),
            message: "CLIENT_NOT_FOUND",
        })
    }
}

#[get("/client/{ids}/hierarchy/ids")]
pub async fn show_client_hierarchy_ids(
    req: HttpRequest,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Some(seeds) = parse_seed_ids(&path) else {
        return invalid_parameter(&req);
    };

    info!("[clients][Method: {}][URI: {}]", req.method(), req.uri());

    let filter = match parse_filter(&req) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    let query = HierarchyQuery::new(seeds.clone());
    let repo = repo.into_inner();
    let ids = match run_blocking(move || {
        get_client_hierarchy_ids(repo.as_ref(), &query, Some(&filter))
    })
    .await
    {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    if !ids.is_empty() {
        HttpResponse::Ok().json(LookupResponse {
            total: ids.total,
            id: seeds,
            content: ids.id_client,
        })
    } else {
        warn!(
            "[clients][Method: {}][CLIENT_NOT_FOUND: {}]",
            req.method(),
            req.uri()
        );
        HttpResponse::Ok().json(NotFoundResponse {
            total: ids.total,
            id: Some(seeds),
            message: "CLIENT_NOT_FOUND",
        })
    }
}
