use crate::domain::client::ClientsPage;
use crate::forms::filter::ClientFilter;
use crate::query::clients::{client_by_id, client_list};
use crate::repository::QueryExecutor;
use crate::services::{ServiceResult, check_entry, load_page};

/// Fetches one live client by id, or the live clients matching `filter`.
///
/// When `id` is given the filter is validated but otherwise ignored. A miss is
/// a page with `total == 0`, never an error.
pub fn get_clients<R>(
    repo: &R,
    id: Option<i32>,
    filter: Option<&ClientFilter>,
) -> ServiceResult<ClientsPage>
where
    R: QueryExecutor + ?Sized,
{
    match id {
        Some(id) => {
            check_entry("get_client", filter)?;
            load_page(repo, "get_client", &client_by_id(id))
        }
        None => {
            check_entry("get_clients", filter)?;
            load_page(repo, "get_clients", &client_list(filter))
        }
    }
}
