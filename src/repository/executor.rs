use std::time::Instant;

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Integer, Text};
use diesel::sqlite::Sqlite;
use serde_json::{Map, Value};

use crate::models::client::PayloadRow;
use crate::query::{BindValue, SqlStatement};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, QueryExecutor, QueryRows};

impl QueryExecutor for DieselRepository {
    fn execute(&self, statement: &SqlStatement) -> RepositoryResult<QueryRows> {
        let mut conn = self.conn()?;

        let query = statement.binds.iter().fold(
            sql_query(statement.sql.as_str()).into_boxed::<Sqlite>(),
            |query, bind| match bind {
                BindValue::Integer(value) => query.bind::<Integer, _>(*value),
                BindValue::Text(value) => query.bind::<Text, _>(value.clone()),
            },
        );

        let started = Instant::now();
        let loaded = query.load::<PayloadRow>(&mut conn);
        let elapsed = started.elapsed();

        if elapsed >= self.slow_query {
            log::warn!(
                "Slow query ({} ms, {} binds): {}",
                elapsed.as_millis(),
                statement.binds.len(),
                statement.sql
            );
        } else {
            log::debug!("Query took {} ms: {}", elapsed.as_millis(), statement.sql);
        }

        let rows = loaded?
            .into_iter()
            .map(|row| serde_json::from_str::<Map<String, Value>>(&row.payload))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryRows::new(rows))
    }
}
