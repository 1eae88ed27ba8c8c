//! Client query services: validate the filter, run the compiled statement,
//! and check the result shape before handing it to the caller.

use serde_json::Value;
use thiserror::Error;

use crate::domain::client::{ClientIds, ClientsPage};
use crate::forms::filter::ClientFilter;
use crate::query::SqlStatement;
use crate::repository::QueryExecutor;
use crate::repository::errors::RepositoryError;
use crate::services::schema::{
    RETURN_CONTENT, RETURN_IDS, SchemaViolations, validate_entry, validate_return,
};

pub mod clients;
pub mod hierarchy;
pub mod schema;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The filter failed the entry shape; no statement was executed.
    #[error("Filter is invalid")]
    InvalidFilter(SchemaViolations),

    /// The store answered with rows that do not fit the declared shape.
    #[error("Return is invalid")]
    InvalidReturn(SchemaViolations),

    #[error("{0}")]
    QueryFailed(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        ServiceError::QueryFailed(err.to_string())
    }
}

pub(crate) fn check_entry(operation: &str, filter: Option<&ClientFilter>) -> ServiceResult<()> {
    validate_entry(filter).map_err(|violations| {
        log::error!("[{operation}][entry] {violations}");
        ServiceError::InvalidFilter(violations)
    })
}

/// Returns the reported row count and the rows as JSON values.
fn execute<R>(
    repo: &R,
    operation: &str,
    statement: &SqlStatement,
) -> ServiceResult<(usize, Vec<Value>)>
where
    R: QueryExecutor + ?Sized,
{
    let rows = repo.execute(statement).map_err(|err| {
        log::error!("[{operation}] Query failed: {err}");
        ServiceError::from(err)
    })?;

    if rows.row_count != rows.rows.len() {
        log::warn!(
            "[{operation}] Executor reported {} rows but returned {}",
            rows.row_count,
            rows.rows.len()
        );
    }

    Ok((
        rows.row_count,
        rows.rows.into_iter().map(Value::Object).collect(),
    ))
}

fn invalid_return(operation: &str, violations: SchemaViolations) -> ServiceError {
    log::error!("[{operation}][return] {violations}");
    ServiceError::InvalidReturn(violations)
}

/// Runs a content statement and returns the validated page.
pub(crate) fn load_page<R>(
    repo: &R,
    operation: &str,
    statement: &SqlStatement,
) -> ServiceResult<ClientsPage>
where
    R: QueryExecutor + ?Sized,
{
    let (total, rows) = execute(repo, operation, statement)?;
    let envelope = serde_json::json!({ "total": total, "content": rows });

    validate_return(&RETURN_CONTENT, &envelope).map_err(|v| invalid_return(operation, v))?;

    serde_json::from_value(envelope)
        .map_err(|err| invalid_return(operation, SchemaViolations::single("content", err.to_string())))
}

/// Runs an identifier statement and returns the validated id list.
pub(crate) fn load_ids<R>(
    repo: &R,
    operation: &str,
    statement: &SqlStatement,
) -> ServiceResult<ClientIds>
where
    R: QueryExecutor + ?Sized,
{
    let (total, rows) = execute(repo, operation, statement)?;
    let ids = rows
        .into_iter()
        .map(|row| row.get("id_client").cloned().unwrap_or(Value::Null))
        .collect::<Vec<_>>();
    let envelope = serde_json::json!({ "total": total, "id_client": ids });

    validate_return(&RETURN_IDS, &envelope).map_err(|v| invalid_return(operation, v))?;

    serde_json::from_value(envelope).map_err(|err| {
        invalid_return(operation, SchemaViolations::single("id_client", err.to_string()))
    })
}
