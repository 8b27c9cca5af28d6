use tracing::debug;

use crate::core::models::Space;
use crate::errors::AdminError;
use crate::store::ResourceStore;

/// Looks up the spaces owned by an account.
pub struct SpaceResolver<'a> {
    store: &'a dyn ResourceStore,
}

impl<'a> SpaceResolver<'a> {
    #[must_use]
    pub fn new(store: &'a dyn ResourceStore) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Store failures are returned unchanged.
    pub async fn resolve(&self, account_id: &str) -> Result<Vec<Space>, AdminError> {
        let spaces = self.store.find_spaces_by_owner(account_id).await?;
        debug!(account_id = %account_id, count = spaces.len(), "Resolved owned spaces");
        Ok(spaces)
    }
}
