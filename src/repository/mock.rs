//! Mock executor for isolating services in tests.

use mockall::mock;

use crate::query::SqlStatement;
use crate::repository::errors::RepositoryResult;
use crate::repository::{QueryExecutor, QueryRows};

mock! {
    pub Executor {}

    impl QueryExecutor for Executor {
        fn execute(&self, statement: &SqlStatement) -> RepositoryResult<QueryRows>;
    }
}
