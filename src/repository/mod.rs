use std::time::Duration;

use serde_json::{Map, Value};

use crate::db::{DbConnection, DbPool, get_connection};
use crate::query::SqlStatement;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod executor;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

/// Default threshold above which executed statements are logged as slow.
pub const DEFAULT_SLOW_QUERY: Duration = Duration::from_millis(1000);

/// Rows returned by a [`QueryExecutor`], one JSON object per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRows {
    pub rows: Vec<Map<String, Value>>,
    pub row_count: usize,
}

impl QueryRows {
    pub fn new(rows: Vec<Map<String, Value>>) -> Self {
        let row_count = rows.len();
        Self { rows, row_count }
    }
}

/// Runs parameterized statements against the relational store.
///
/// Implementations must be safe to share between concurrent callers.
pub trait QueryExecutor {
    fn execute(&self, statement: &SqlStatement) -> RepositoryResult<QueryRows>;
}

/// Diesel backed executor sharing one connection pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
    slow_query: Duration,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            slow_query: DEFAULT_SLOW_QUERY,
        }
    }

    pub fn slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query = threshold;
        self
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}
