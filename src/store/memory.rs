//! In-memory storage backend for testing and development

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ResourceStore;
use crate::core::models::{Account, DependentResource, ResourceKind, Space};
use crate::errors::AdminError;

#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

#[derive(Default)]
struct MemoryData {
    accounts: HashMap<String, Account>,
    spaces: HashMap<String, Space>,
    /// Dependent resources keyed by kind, then by resource id
    resources: HashMap<ResourceKind, HashMap<String, DependentResource>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_account(&self, account: Account) {
        let mut data = self.data.write().await;
        data.accounts.insert(account.id.clone(), account);
    }

    pub async fn insert_space(&self, space: Space) {
        let mut data = self.data.write().await;
        data.spaces.insert(space.id.clone(), space);
    }

    pub async fn insert_resource(&self, resource: DependentResource) {
        let mut data = self.data.write().await;
        data.resources
            .entry(resource.kind)
            .or_default()
            .insert(resource.id.clone(), resource);
    }

    /// Number of resources of `kind` that reference `space_id`.
    pub async fn count_in_space(&self, kind: ResourceKind, space_id: &str) -> usize {
        let data = self.data.read().await;
        match kind {
            ResourceKind::Space => usize::from(data.spaces.contains_key(space_id)),
            _ => data
                .resources
                .get(&kind)
                .map_or(0, |by_id| by_id.values().filter(|r| r.space == space_id).count()),
        }
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn find_accounts(&self) -> Result<Vec<Account>, AdminError> {
        let data = self.data.read().await;
        let mut accounts: Vec<Account> = data.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(accounts)
    }

    async fn find_account(&self, id: &str) -> Result<Option<Account>, AdminError> {
        let data = self.data.read().await;
        Ok(data.accounts.get(id).cloned())
    }

    async fn delete_account(&self, id: &str) -> Result<Account, AdminError> {
        let mut data = self.data.write().await;
        data.accounts
            .remove(id)
            .ok_or_else(|| AdminError::NotFound(format!("account {id}")))
    }

    async fn update_admin_flag(&self, id: &str, admin: bool) -> Result<(), AdminError> {
        let mut data = self.data.write().await;
        let account = data
            .accounts
            .get_mut(id)
            .ok_or_else(|| AdminError::NotFound(format!("account {id}")))?;
        account.admin = admin;
        Ok(())
    }

    async fn find_spaces_by_owner(&self, owner: &str) -> Result<Vec<Space>, AdminError> {
        let data = self.data.read().await;
        let mut spaces: Vec<Space> = data
            .spaces
            .values()
            .filter(|s| s.owner == owner)
            .cloned()
            .collect();
        spaces.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(spaces)
    }

    async fn find_all_spaces(&self) -> Result<Vec<Space>, AdminError> {
        let data = self.data.read().await;
        Ok(data.spaces.values().cloned().collect())
    }

    async fn delete_by_space(
        &self,
        kind: ResourceKind,
        space_id: &str,
    ) -> Result<u64, AdminError> {
        let mut data = self.data.write().await;

        if kind == ResourceKind::Space {
            return Ok(u64::from(data.spaces.remove(space_id).is_some()));
        }

        let Some(by_id) = data.resources.get_mut(&kind) else {
            return Ok(0);
        };
        let before = by_id.len();
        by_id.retain(|_, r| r.space != space_id);
        Ok((before - by_id.len()) as u64)
    }
}
