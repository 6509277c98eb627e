use async_trait::async_trait;

use crate::error::Result;
use crate::types::{IssueSummary, Query, RepositoryIdentifier, RepositorySummary};

/// Remote backing the repository page.
#[async_trait]
pub trait IssueSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    async fn load_repository(&self, id: &RepositoryIdentifier) -> Result<RepositorySummary>;
    async fn load_issues(&self, id: &RepositoryIdentifier, query: &Query)
        -> Result<Vec<IssueSummary>>;
}
