//! Persistence for accounts, spaces and the resources living in spaces.
//!
//! The workflow code only talks to [`ResourceStore`]; backends:
//! - [`memory::MemoryStore`] for tests and local runs
//! - [`dynamo::DynamoStore`] for deployed Lambdas

pub mod dynamo;
pub mod memory;

use async_trait::async_trait;

use crate::core::models::{Account, ResourceKind, Space};
use crate::errors::AdminError;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// All accounts ordered by username.
    async fn find_accounts(&self) -> Result<Vec<Account>, AdminError>;

    async fn find_account(&self, id: &str) -> Result<Option<Account>, AdminError>;

    /// Removes the account and returns the record as it was before removal.
    /// Fails with [`AdminError::NotFound`] when no such account exists.
    async fn delete_account(&self, id: &str) -> Result<Account, AdminError>;

    /// Fails with [`AdminError::NotFound`] when no such account exists.
    async fn update_admin_flag(&self, id: &str, admin: bool) -> Result<(), AdminError>;

    async fn find_spaces_by_owner(&self, owner: &str) -> Result<Vec<Space>, AdminError>;

    async fn find_all_spaces(&self) -> Result<Vec<Space>, AdminError>;

    /// Deletes every record of `kind` belonging to `space_id`. For
    /// [`ResourceKind::Space`] the space record itself is deleted.
    /// Returns the number of records removed.
    async fn delete_by_space(&self, kind: ResourceKind, space_id: &str)
    -> Result<u64, AdminError>;
}
