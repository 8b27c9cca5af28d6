//! Orphaned space reconciliation
//!
//! Account removal never rolls back, so a failed cascade can leave spaces
//! whose owner no longer exists. This job finds those spaces and cascades them
//! away. Running it repeatedly is harmless.

pub mod handler;

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::core::models::Space;
use crate::errors::AdminError;
use crate::removal::CascadeDeleter;
use crate::store::ResourceStore;

pub use handler::handler;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub scanned: usize,
    pub orphaned: usize,
    pub removed: u64,
    pub dry_run: bool,
}

pub struct OrphanReconciler<'a> {
    store: &'a dyn ResourceStore,
}

impl<'a> OrphanReconciler<'a> {
    #[must_use]
    pub fn new(store: &'a dyn ResourceStore) -> Self {
        Self { store }
    }

    /// Spaces whose owner account does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if spaces or accounts cannot be read.
    pub async fn find_orphans(&self) -> Result<(usize, Vec<Space>), AdminError> {
        let spaces = self.store.find_all_spaces().await?;
        let scanned = spaces.len();

        let mut owner_exists: HashMap<String, bool> = HashMap::new();
        let mut orphans = Vec::new();
        for space in spaces {
            let exists = match owner_exists.get(&space.owner) {
                Some(exists) => *exists,
                None => {
                    let exists = self.store.find_account(&space.owner).await?.is_some();
                    owner_exists.insert(space.owner.clone(), exists);
                    exists
                }
            };
            if !exists {
                orphans.push(space);
            }
        }

        Ok((scanned, orphans))
    }

    /// # Errors
    ///
    /// Returns an error if the scan or the cascade fails.
    pub async fn run(&self, dry_run: bool) -> Result<ReconcileReport, AdminError> {
        let (scanned, orphans) = self.find_orphans().await?;

        let mut report = ReconcileReport {
            scanned,
            orphaned: orphans.len(),
            removed: 0,
            dry_run,
        };

        if !dry_run && !orphans.is_empty() {
            let cascade = CascadeDeleter::new(self.store).delete_all(&orphans).await?;
            report.removed = cascade.removed.values().sum();
        }

        info!(
            scanned = report.scanned,
            orphaned = report.orphaned,
            removed = report.removed,
            dry_run,
            "Orphan reconciliation finished"
        );
        Ok(report)
    }
}
