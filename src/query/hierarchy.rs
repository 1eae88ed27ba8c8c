//! Recursive descendant traversal over the client forest.
//!
//! The traversal seeds from live rows, follows `id_parent` links through live
//! rows only, keeps each client once at its smallest depth, and then drops
//! every row whose immediate parent is soft-deleted. Each branch carries the
//! ids it has visited so corrupted cyclic links end the branch instead of
//! recursing forever.

use crate::forms::filter::ClientFilter;
use crate::query::SqlStatement;
use crate::query::filter::{FilterContext, compile};

/// Seeds of one traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyQuery {
    pub seeds: Vec<i32>,
}

impl HierarchyQuery {
    pub fn new(seeds: impl Into<Vec<i32>>) -> Self {
        Self {
            seeds: seeds.into(),
        }
    }
}

const TRAVERSAL_HEAD: &str = "WITH RECURSIVE hierarchy (id_client, id_parent, description, tags, depth, path) AS (\
    SELECT id_client, id_parent, description, tags, 1, ',' || id_client || ',' \
    FROM clients \
    WHERE date_deleted IS NULL AND id_client IN (";

// `path` holds the visited ids as `,1,2,3,`.
const TRAVERSAL_STEP: &str = ") \
    UNION ALL \
    SELECT c.id_client, c.id_parent, c.description, c.tags, h.depth + 1, h.path || c.id_client || ',' \
    FROM clients c \
    JOIN hierarchy h ON c.id_parent = h.id_client \
    WHERE c.date_deleted IS NULL AND instr(h.path, ',' || c.id_client || ',') = 0";

// SQLite takes the bare columns from the row that holds MIN(depth).
const TRAVERSAL_TAIL: &str = "), \
    closure AS (\
    SELECT id_client, id_parent, description, tags, MIN(depth) AS depth \
    FROM hierarchy \
    GROUP BY id_client\
    ) ";

const CONTENT_PAYLOAD: &str = "SELECT json_object(\
    'id_client', child.id_client, \
    'id_parent', child.id_parent, \
    'description', json(child.description), \
    'tags', json(child.tags), \
    'depth', child.depth\
    ) AS payload ";

const IDS_PAYLOAD: &str = "SELECT json_object('id_client', child.id_client) AS payload ";

const PARENT_JOIN: &str = "FROM closure child \
    LEFT JOIN clients parent ON parent.id_client = child.id_parent \
    WHERE parent.date_deleted IS NULL";

fn traversal(query: &HierarchyQuery, projection: &str) -> SqlStatement {
    let mut statement = SqlStatement::new(TRAVERSAL_HEAD);
    statement
        .push_bind_list(query.seeds.iter().copied())
        .push_sql(TRAVERSAL_STEP)
        .push_sql(TRAVERSAL_TAIL)
        .push_sql(projection)
        .push_sql(PARENT_JOIN);
    statement
}

/// Full rows of the closure, narrowed and ordered by the hierarchy filter.
pub fn hierarchy_content(query: &HierarchyQuery, filter: Option<&ClientFilter>) -> SqlStatement {
    let fragments = compile(filter, FilterContext::Hierarchy);

    let mut statement = traversal(query, CONTENT_PAYLOAD);
    statement
        .append(fragments.predicates)
        .push_sql(&fragments.order_by);
    statement
}

/// Identifiers of the closure, always ordered by `id_client`.
pub fn hierarchy_ids(query: &HierarchyQuery) -> SqlStatement {
    let mut statement = traversal(query, IDS_PAYLOAD);
    statement.push_sql(" ORDER BY child.id_client");
    statement
}
