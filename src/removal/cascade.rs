use std::collections::BTreeMap;

use futures::future::try_join_all;
use tracing::{error, info};

use crate::core::models::{ResourceKind, Space};
use crate::errors::AdminError;
use crate::store::ResourceStore;

/// Counts of records removed by one cascade, per collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CascadeReport {
    pub spaces: usize,
    pub removed: BTreeMap<ResourceKind, u64>,
}

impl CascadeReport {
    #[must_use]
    pub fn removed_of(&self, kind: ResourceKind) -> u64 {
        self.removed.get(&kind).copied().unwrap_or(0)
    }
}

/// Deletes spaces together with every cluster, cache, domain model and
/// notebook inside them.
pub struct CascadeDeleter<'a> {
    store: &'a dyn ResourceStore,
}

impl<'a> CascadeDeleter<'a> {
    #[must_use]
    pub fn new(store: &'a dyn ResourceStore) -> Self {
        Self { store }
    }

    /// Empties every space and then deletes the space record itself. Spaces
    /// are processed concurrently; within a space the four dependent
    /// collections are cleared concurrently and the space record goes last,
    /// so a failed cascade never leaves dependents behind a missing space.
    ///
    /// The first failure fails the whole cascade. Dropping the join cancels
    /// deletions that have not completed yet; deletions the store already
    /// applied stay applied.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Cascade`] carrying the first failure.
    pub async fn delete_all(&self, spaces: &[Space]) -> Result<CascadeReport, AdminError> {
        if spaces.is_empty() {
            return Ok(CascadeReport::default());
        }

        let per_space = spaces.iter().map(|space| self.delete_space(space));
        let results = try_join_all(per_space).await.map_err(|e| {
            error!("Cascade deletion failed: {}", e);
            AdminError::Cascade(e.to_string())
        })?;

        let mut report = CascadeReport {
            spaces: spaces.len(),
            removed: BTreeMap::new(),
        };
        for (kind, count) in results.into_iter().flatten() {
            *report.removed.entry(kind).or_default() += count;
        }

        info!(spaces = report.spaces, removed = ?report.removed, "Cascade deletion finished");
        Ok(report)
    }

    async fn delete_space(&self, space: &Space) -> Result<Vec<(ResourceKind, u64)>, AdminError> {
        let store = self.store;
        let dependents = ResourceKind::DEPENDENTS.into_iter().map(|kind| async move {
            store
                .delete_by_space(kind, &space.id)
                .await
                .map(|count| (kind, count))
        });
        let mut removed = try_join_all(dependents).await?;

        let spaces = store.delete_by_space(ResourceKind::Space, &space.id).await?;
        removed.push((ResourceKind::Space, spaces));
        Ok(removed)
    }
}
