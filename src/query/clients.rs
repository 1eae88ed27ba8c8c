//! Flat lookups over the `clients` table.

use crate::forms::filter::ClientFilter;
use crate::query::SqlStatement;
use crate::query::filter::{FilterContext, compile};

const CLIENT_PAYLOAD: &str = "json_object(\
    'id_client', id_client, \
    'id_parent', id_parent, \
    'description', json(description), \
    'tags', json(tags)\
) AS payload";

fn live_clients() -> SqlStatement {
    SqlStatement::new(format!(
        "SELECT {CLIENT_PAYLOAD} FROM clients WHERE date_deleted IS NULL"
    ))
}

/// Exact match on `id_client` among live rows.
pub fn client_by_id(id: i32) -> SqlStatement {
    let mut statement = live_clients();
    statement.push_sql(" AND id_client = ").push_bind(id);
    statement
}

/// Live rows narrowed by the flat filter predicates and ordering.
pub fn client_list(filter: Option<&ClientFilter>) -> SqlStatement {
    let fragments = compile(filter, FilterContext::Flat);

    let mut statement = live_clients();
    statement
        .append(fragments.predicates)
        .push_sql(&fragments.order_by);
    statement
}
