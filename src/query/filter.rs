//! Compiles a validated [`ClientFilter`] into predicate and ordering fragments.
//!
//! Two contexts are supported. The flat context targets the `clients` table
//! directly and folds both case and accents when matching names. The
//! hierarchy context targets the `child` alias of the traversal and matches
//! names case-insensitively without folding accents.

use deunicode::deunicode;

use crate::forms::filter::ClientFilter;
use crate::query::SqlStatement;

/// Where the compiled fragments are spliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterContext {
    Flat,
    Hierarchy,
}

impl FilterContext {
    fn column(self, name: &str) -> String {
        match self {
            FilterContext::Flat => name.to_string(),
            FilterContext::Hierarchy => format!("child.{name}"),
        }
    }

    fn description_field(self, field: &str) -> String {
        format!("json_extract({}, '$.{field}')", self.column("description"))
    }
}

/// Sortable columns accepted by `orderby`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    IdParent,
    Name,
    Email,
    Cnpj,
    IdClient,
}

impl OrderBy {
    /// Unrecognized names yield `None` and are ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "id_parent" => Some(OrderBy::IdParent),
            "name" => Some(OrderBy::Name),
            "email" => Some(OrderBy::Email),
            "cnpj" => Some(OrderBy::Cnpj),
            "id_client" => Some(OrderBy::IdClient),
            _ => None,
        }
    }

    fn expression(self, context: FilterContext) -> String {
        match self {
            OrderBy::IdParent => context.column("id_parent"),
            OrderBy::Name => context.description_field("name"),
            OrderBy::Email => context.description_field("email"),
            OrderBy::Cnpj => context.description_field("cnpj"),
            OrderBy::IdClient => context.column("id_client"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the exact upper-case keywords are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ASC" => Some(SortDirection::Asc),
            "DESC" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Output of [`compile`]: `AND` predicates followed by one `ORDER BY` clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterFragments {
    pub predicates: SqlStatement,
    pub order_by: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Escapes LIKE wildcards so the value only matches literally.
fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Builds the ordering clause, defaulting to `id_client` ascending.
pub fn order_by_clause(filter: Option<&ClientFilter>, context: FilterContext) -> String {
    let order = filter.and_then(|f| non_empty(&f.orderby).and_then(OrderBy::parse));

    match order {
        Some(order) => {
            let mut clause = format!(" ORDER BY {}", order.expression(context));
            let direction = filter.and_then(|f| non_empty(&f.sort).and_then(SortDirection::parse));
            if let Some(direction) = direction {
                clause.push(' ');
                clause.push_str(direction.keyword());
            }
            if order != OrderBy::IdClient {
                clause.push_str(&format!(", {}", context.column("id_client")));
            }
            clause
        }
        None => format!(" ORDER BY {}", context.column("id_client")),
    }
}

/// Compiles the filter predicates in their fixed order.
///
/// The filter must have passed entry validation; unparsable identifiers are
/// skipped rather than reported.
pub fn compile(filter: Option<&ClientFilter>, context: FilterContext) -> FilterFragments {
    let mut predicates = SqlStatement::default();

    if let Some(filter) = filter.filter(|f| !f.is_empty()) {
        if let Some(id_parent) = non_empty(&filter.id_parent).and_then(|v| v.parse::<i32>().ok())
        {
            predicates
                .push_sql(&format!(" AND {} = ", context.column("id_parent")))
                .push_bind(id_parent);
        }

        if let Some(name) = non_empty(&filter.name) {
            let column = context.description_field("name");
            match context {
                FilterContext::Flat => predicates
                    .push_sql(&format!(
                        " AND lower(unaccent(coalesce({column}, ''))) LIKE lower("
                    ))
                    // Folded before escaping so folded characters stay literal.
                    .push_bind(like_pattern(&deunicode(name)))
                    .push_sql(") ESCAPE '\\'"),
                FilterContext::Hierarchy => predicates
                    .push_sql(&format!(" AND lower({column}) LIKE lower("))
                    .push_bind(like_pattern(name))
                    .push_sql(") ESCAPE '\\'"),
            };
        }

        if let Some(email) = non_empty(&filter.email) {
            predicates
                .push_sql(&format!(
                    " AND lower({}) LIKE lower(",
                    context.description_field("email")
                ))
                .push_bind(like_pattern(email))
                .push_sql(") ESCAPE '\\'");
        }

        if let Some(cnpj) = non_empty(&filter.cnpj) {
            predicates
                .push_sql(&format!(
                    " AND instr({}, ",
                    context.description_field("cnpj")
                ))
                .push_bind(cnpj)
                .push_sql(") > 0");
        }

        if context == FilterContext::Flat {
            let ids = filter.client_ids().unwrap_or_default();
            if !ids.is_empty() {
                predicates
                    .push_sql(&format!(" AND {} IN (", context.column("id_client")))
                    .push_bind_list(ids)
                    .push_sql(")");
            }
        }
    }

    FilterFragments {
        predicates,
        order_by: order_by_clause(filter, context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::BindValue;

    fn filter() -> ClientFilter {
        ClientFilter::default()
    }

    #[test]
    fn no_filter_orders_by_id_client() {
        let fragments = compile(None, FilterContext::Flat);

        assert!(fragments.predicates.sql.is_empty());
        assert_eq!(fragments.order_by, " ORDER BY id_client");
    }

    #[test]
    fn predicates_follow_the_fixed_order() {
        let f = ClientFilter {
            cnpj: Some("12.345".into()),
            email: Some("acme.com".into()),
            name: Some("acme".into()),
            id_parent: Some("7".into()),
            ids_clients: vec!["2,3".into()],
            ..filter()
        };

        let fragments = compile(Some(&f), FilterContext::Flat);
        let sql = &fragments.predicates.sql;

        let positions: Vec<usize> = ["id_parent = ", "'$.name'", "'$.email'", "'$.cnpj'", "id_client IN"]
            .iter()
            .map(|needle| sql.find(needle).expect("predicate present"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(
            fragments.predicates.binds,
            vec![
                BindValue::Integer(7),
                BindValue::Text("%acme%".into()),
                BindValue::Text("%acme.com%".into()),
                BindValue::Text("12.345".into()),
                BindValue::Integer(2),
                BindValue::Integer(3),
            ]
        );
        assert_eq!(
            fragments.predicates.placeholder_count(),
            fragments.predicates.binds.len()
        );
    }

    #[test]
    fn values_never_reach_the_sql_text() {
        let f = ClientFilter {
            name: Some("x'); DROP TABLE clients; --".into()),
            ..filter()
        };

        let fragments = compile(Some(&f), FilterContext::Flat);

        assert!(!fragments.predicates.sql.contains("DROP"));
        assert_eq!(
            fragments.predicates.binds,
            vec![BindValue::Text("%x'); DROP TABLE clients; --%".into())]
        );
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn flat_name_folds_accents_hierarchy_does_not() {
        let f = ClientFilter {
            name: Some("acme".into()),
            ..filter()
        };

        let flat = compile(Some(&f), FilterContext::Flat);
        let tree = compile(Some(&f), FilterContext::Hierarchy);

        assert!(flat.predicates.sql.contains("unaccent"));
        assert!(!tree.predicates.sql.contains("unaccent"));
        assert!(tree.predicates.sql.contains("child.description"));
    }

    #[test]
    fn flat_name_is_folded_before_escaping() {
        let f = ClientFilter {
            name: Some("Jos\u{e9}\u{ff05}\u{ff3f}".into()),
            ..filter()
        };

        let fragments = compile(Some(&f), FilterContext::Flat);

        assert_eq!(
            fragments.predicates.binds,
            vec![BindValue::Text("%Jose\\%\\_%".into())]
        );
        assert!(fragments.predicates.sql.contains("LIKE lower(?) ESCAPE"));
    }

    #[test]
    fn hierarchy_context_ignores_ids_clients() {
        let f = ClientFilter {
            ids_clients: vec!["2,3".into()],
            ..filter()
        };

        let fragments = compile(Some(&f), FilterContext::Hierarchy);

        assert!(fragments.predicates.sql.is_empty());
        assert!(fragments.predicates.binds.is_empty());
    }

    #[test]
    fn recognized_orderby_with_sort() {
        let f = ClientFilter {
            orderby: Some("name".into()),
            sort: Some("DESC".into()),
            ..filter()
        };

        assert_eq!(
            order_by_clause(Some(&f), FilterContext::Flat),
            " ORDER BY json_extract(description, '$.name') DESC, id_client"
        );
        assert_eq!(
            order_by_clause(Some(&f), FilterContext::Hierarchy),
            " ORDER BY json_extract(child.description, '$.name') DESC, child.id_client"
        );
    }

    #[test]
    fn unrecognized_orderby_falls_back_to_id_client() {
        let f = ClientFilter {
            orderby: Some("phone".into()),
            sort: Some("DESC".into()),
            ..filter()
        };

        assert_eq!(
            order_by_clause(Some(&f), FilterContext::Flat),
            " ORDER BY id_client"
        );
    }

    #[test]
    fn sort_is_case_sensitive() {
        let f = ClientFilter {
            orderby: Some("id_client".into()),
            sort: Some("desc".into()),
            ..filter()
        };

        assert_eq!(
            order_by_clause(Some(&f), FilterContext::Flat),
            " ORDER BY id_client"
        );
    }
}
