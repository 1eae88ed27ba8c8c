use diesel::prelude::*;
use diesel::sql_types::Text;

/// One row of a compiled statement: a JSON object rendered by SQLite.
#[derive(Debug, Clone, QueryableByName)]
pub struct PayloadRow {
    #[diesel(sql_type = Text)]
    pub payload: String,
}
