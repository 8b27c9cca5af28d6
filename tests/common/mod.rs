#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use admin_console::clients::{MailTransport, OutgoingMail};
use admin_console::core::config::{AppConfig, MailConfig, StoreBackend};
use admin_console::core::models::{Account, ResourceKind, Space};
use admin_console::errors::AdminError;
use admin_console::state::AppState;
use admin_console::store::{MemoryStore, ResourceStore};
use async_trait::async_trait;

pub const SESSION_SECRET: &str = "test-session-secret";

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FindAccounts,
    FindAccount,
    DeleteAccount,
    UpdateAdminFlag,
    FindSpacesByOwner,
    FindAllSpaces,
    DeleteBySpace(ResourceKind),
}

/// Wraps a `MemoryStore`, recording every call and failing selected ones.
#[derive(Clone, Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    failing: Arc<Mutex<HashSet<Op>>>,
    calls: Arc<Mutex<Vec<Op>>>,
}

impl FaultyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn fail_on(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, predicate: impl Fn(&Op) -> bool) -> bool {
        self.calls().iter().any(predicate)
    }

    fn enter(&self, op: Op) -> Result<(), AdminError> {
        self.calls.lock().unwrap().push(op);
        if self.failing.lock().unwrap().contains(&op) {
            Err(AdminError::Store(format!("injected failure on {op:?}")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ResourceStore for FaultyStore {
    async fn find_accounts(&self) -> Result<Vec<Account>, AdminError> {
        self.enter(Op::FindAccounts)?;
        self.inner.find_accounts().await
    }

    async fn find_account(&self, id: &str) -> Result<Option<Account>, AdminError> {
        self.enter(Op::FindAccount)?;
        self.inner.find_account(id).await
    }

    async fn delete_account(&self, id: &str) -> Result<Account, AdminError> {
        self.enter(Op::DeleteAccount)?;
        self.inner.delete_account(id).await
    }

    async fn update_admin_flag(&self, id: &str, admin: bool) -> Result<(), AdminError> {
        self.enter(Op::UpdateAdminFlag)?;
        self.inner.update_admin_flag(id, admin).await
    }

    async fn find_spaces_by_owner(&self, owner: &str) -> Result<Vec<Space>, AdminError> {
        self.enter(Op::FindSpacesByOwner)?;
        self.inner.find_spaces_by_owner(owner).await
    }

    async fn find_all_spaces(&self) -> Result<Vec<Space>, AdminError> {
        self.enter(Op::FindAllSpaces)?;
        self.inner.find_all_spaces().await
    }

    async fn delete_by_space(
        &self,
        kind: ResourceKind,
        space_id: &str,
    ) -> Result<u64, AdminError> {
        self.enter(Op::DeleteBySpace(kind))?;
        self.inner.delete_by_space(kind, space_id).await
    }
}

/// Mail transport that records messages instead of sending them.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    attempts: Arc<Mutex<usize>>,
    failure: Option<String>,
}

impl RecordingMailer {
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, _config: &MailConfig, mail: &OutgoingMail) -> Result<(), AdminError> {
        *self.attempts.lock().unwrap() += 1;
        if let Some(reason) = &self.failure {
            return Err(AdminError::MailDelivery(reason.clone()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

pub fn configured_mail() -> MailConfig {
    MailConfig {
        service: "smtp.example.com".into(),
        user: "console@example.com".into(),
        password: "secret".into(),
        display_name: "Web Console".into(),
    }
}

pub fn unconfigured_mail() -> MailConfig {
    MailConfig {
        display_name: "Web Console".into(),
        ..MailConfig::default()
    }
}

pub fn test_config(mail: MailConfig) -> AppConfig {
    AppConfig {
        mail,
        smtp_password_param: None,
        session_secret: SESSION_SECRET.into(),
        store_backend: StoreBackend::Memory,
        table_prefix: "test_".into(),
        reconcile_dry_run: false,
    }
}

pub fn test_state(store: Arc<dyn ResourceStore>, mailer: RecordingMailer, mail: MailConfig) -> AppState {
    AppState::new(test_config(mail.clone()), mail, store, Arc::new(mailer))
}

pub async fn seed_account(store: &MemoryStore, id: &str, username: &str) -> Account {
    let account = Account::new(username, &format!("{username}@example.com")).with_id(id);
    store.insert_account(account.clone()).await;
    account
}

pub async fn seed_space(store: &MemoryStore, id: &str, owner: &str) -> Space {
    let space = Space::new(id, &format!("{id} space"), owner);
    store.insert_space(space.clone()).await;
    space
}
