use crate::domain::client::{ClientIds, ClientsPage};
use crate::forms::filter::ClientFilter;
use crate::query::hierarchy::{HierarchyQuery, hierarchy_content, hierarchy_ids};
use crate::repository::QueryExecutor;
use crate::services::{ServiceResult, check_entry, load_ids, load_page};

/// Returns every live descendant of the seeds, seeds included, with depth.
pub fn get_client_hierarchy<R>(
    repo: &R,
    query: &HierarchyQuery,
    filter: Option<&ClientFilter>,
) -> ServiceResult<ClientsPage>
where
    R: QueryExecutor + ?Sized,
{
    check_entry("get_client_hierarchy", filter)?;

    if query.seeds.is_empty() {
        return Ok(ClientsPage::default());
    }

    load_page(
        repo,
        "get_client_hierarchy",
        &hierarchy_content(query, filter),
    )
}

/// Returns the identifiers of the same closure as [`get_client_hierarchy`].
///
/// The filter is validated, but neither its predicates nor its ordering are
/// applied: ids always come back in ascending order.
pub fn get_client_hierarchy_ids<R>(
    repo: &R,
    query: &HierarchyQuery,
    filter: Option<&ClientFilter>,
) -> ServiceResult<ClientIds>
where
    R: QueryExecutor + ?Sized,
{
    check_entry("get_client_hierarchy_ids", filter)?;

    if query.seeds.is_empty() {
        return Ok(ClientIds::default());
    }

    load_ids(repo, "get_client_hierarchy_ids", &hierarchy_ids(query))
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::*;
    use crate::query::BindValue;
    use crate::repository::QueryRows;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockExecutor;
    use crate::services::ServiceError;

    fn rows(values: Vec<Value>) -> QueryRows {
        QueryRows::new(
            values
                .into_iter()
                .filter_map(|v| v.as_object().cloned())
                .collect::<Vec<Map<String, Value>>>(),
        )
    }

    fn node(id: i32, parent: Option<i32>, depth: i32) -> Value {
        json!({
            "id_client": id,
            "id_parent": parent,
            "description": {"name": format!("Client {id}")},
            "tags": {"segment": "retail"},
            "depth": depth
        })
    }

    #[test]
    fn hierarchy_returns_rows_with_depth() {
        let mut repo = MockExecutor::new();
        repo.expect_execute()
            .times(1)
            .withf(|statement| statement.sql.starts_with("WITH RECURSIVE"))
            .returning(|_| {
                Ok(rows(vec![
                    node(1, None, 1),
                    node(2, Some(1), 2),
                    node(3, Some(2), 3),
                ]))
            });

        let page = get_client_hierarchy(&repo, &HierarchyQuery::new(vec![1]), None).unwrap();

        assert_eq!(page.total, 3);
        let depths: Vec<Option<i32>> = page.content.iter().map(|c| c.depth).collect();
        assert_eq!(depths, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(page.content[2].tags, json!({"segment": "retail"}));
    }

    #[test]
    fn ids_ignore_filter_predicates_and_ordering() {
        let filter = ClientFilter {
            name: Some("acme".into()),
            orderby: Some("name".into()),
            sort: Some("DESC".into()),
            ..ClientFilter::default()
        };

        let mut repo = MockExecutor::new();
        repo.expect_execute()
            .times(1)
            .withf(|statement| {
                statement.sql.ends_with("ORDER BY child.id_client")
                    && statement.binds == vec![BindValue::Integer(4)]
            })
            .returning(|_| {
                Ok(rows(vec![
                    json!({"id_client": 4}),
                    json!({"id_client": 9}),
                ]))
            });

        let ids =
            get_client_hierarchy_ids(&repo, &HierarchyQuery::new(vec![4]), Some(&filter)).unwrap();

        assert_eq!(ids.total, 2);
        assert_eq!(ids.id_client, vec![4, 9]);
    }

    #[test]
    fn invalid_filter_never_reaches_the_executor() {
        let mut repo = MockExecutor::new();
        repo.expect_execute().never();
        let filter = ClientFilter {
            email: Some("!!!".into()),
            ..ClientFilter::default()
        };

        let result = get_client_hierarchy(&repo, &HierarchyQuery::new(vec![1]), Some(&filter));

        assert!(matches!(result, Err(ServiceError::InvalidFilter(_))));
    }

    #[test]
    fn executor_failure_is_not_retried() {
        let mut repo = MockExecutor::new();
        repo.expect_execute()
            .times(1)
            .returning(|_| Err(RepositoryError::DatabaseError("disk I/O error".into())));

        let result = get_client_hierarchy_ids(&repo, &HierarchyQuery::new(vec![1]), None);

        assert!(matches!(result, Err(ServiceError::QueryFailed(m)) if m.contains("disk I/O")));
    }

    #[test]
    fn ids_without_an_id_column_are_an_invalid_return() {
        let mut repo = MockExecutor::new();
        repo.expect_execute()
            .times(1)
            .returning(|_| Ok(rows(vec![json!({"other": 1})])));

        let result = get_client_hierarchy_ids(&repo, &HierarchyQuery::new(vec![1]), None);

        assert!(matches!(result, Err(ServiceError::InvalidReturn(_))));
    }

    #[test]
    fn empty_seed_list_short_circuits() {
        let mut repo = MockExecutor::new();
        repo.expect_execute().never();

        let page = get_client_hierarchy(&repo, &HierarchyQuery::new(Vec::new()), None).unwrap();

        assert!(page.is_empty());
    }
}
