//! DynamoDB storage backend.
//!
//! One table per collection, named `{prefix}{collection}` (for example
//! `admin_console_accounts`, `admin_console_clusters`). Every table is keyed by
//! a string `id`. Lookups by owner and by space go through the `owner-index`
//! and `space-index` global secondary indexes.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::ResourceStore;
use crate::core::models::{Account, ResourceKind, Space};
use crate::errors::AdminError;

type Item = HashMap<String, AttributeValue>;

const ACCOUNTS: &str = "accounts";
const OWNER_INDEX: &str = "owner-index";
const SPACE_INDEX: &str = "space-index";

pub struct DynamoStore {
    client: DynamoClient,
    table_prefix: String,
}

impl DynamoStore {
    #[must_use]
    pub fn new(client: DynamoClient, table_prefix: &str) -> Self {
        Self {
            client,
            table_prefix: table_prefix.to_string(),
        }
    }

    pub async fn from_env(table_prefix: &str) -> Self {
        let shared = aws_config::from_env().load().await;
        Self::new(DynamoClient::new(&shared), table_prefix)
    }

    fn table(&self, collection: &str) -> String {
        format!("{}{}", self.table_prefix, collection)
    }

    async fn scan_all(&self, table: &str) -> Result<Vec<Item>, AdminError> {
        let mut items = Vec::new();
        let mut start: Option<Item> = None;

        loop {
            let out = self
                .client
                .scan()
                .table_name(table)
                .set_exclusive_start_key(start)
                .send()
                .await
                .map_err(|e| AdminError::Store(format!("dynamodb scan {table}: {e}")))?;

            items.extend(out.items().iter().cloned());
            start = out.last_evaluated_key().cloned();
            if start.is_none() {
                break;
            }
        }

        Ok(items)
    }

    async fn query_index(
        &self,
        table: &str,
        index: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, AdminError> {
        let mut items = Vec::new();
        let mut start: Option<Item> = None;

        loop {
            let out = self
                .client
                .query()
                .table_name(table)
                .index_name(index)
                .key_condition_expression("#k = :v")
                .expression_attribute_names("#k", attribute)
                .expression_attribute_values(":v", AttributeValue::S(value.to_string()))
                .set_exclusive_start_key(start)
                .send()
                .await
                .map_err(|e| AdminError::Store(format!("dynamodb query {table}/{index}: {e}")))?;

            items.extend(out.items().iter().cloned());
            start = out.last_evaluated_key().cloned();
            if start.is_none() {
                break;
            }
        }

        Ok(items)
    }

    async fn delete_item(&self, table: &str, id: &str) -> Result<Option<Item>, AdminError> {
        let out = self
            .client
            .delete_item()
            .table_name(table)
            .key("id", AttributeValue::S(id.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| AdminError::Store(format!("dynamodb delete_item {table}: {e}")))?;

        Ok(out.attributes().cloned())
    }
}

fn string_attr(item: &Item, name: &str) -> Result<String, AdminError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| AdminError::Store(format!("item is missing attribute '{name}'")))
}

fn account_from_item(item: &Item) -> Result<Account, AdminError> {
    let registered_at = item
        .get("registeredAt")
        .and_then(|v| v.as_s().ok())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_default();

    Ok(Account {
        id: string_attr(item, "id")?,
        username: string_attr(item, "username")?,
        email: string_attr(item, "email")?,
        admin: item
            .get("admin")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        registered_at,
    })
}

/// Snapshot of an account item that has already been deleted. The record is
/// gone whatever its shape, so missing attributes fall back to empty values
/// instead of failing the removal.
fn removed_account_from_item(id: &str, item: &Item) -> Account {
    account_from_item(item).unwrap_or_else(|e| {
        warn!(account_id = %id, "Deleted account record was malformed: {}", e);
        Account {
            id: string_attr(item, "id").unwrap_or_else(|_| id.to_string()),
            username: string_attr(item, "username").unwrap_or_default(),
            email: string_attr(item, "email").unwrap_or_default(),
            admin: item
                .get("admin")
                .and_then(|v| v.as_bool().ok())
                .copied()
                .unwrap_or(false),
            registered_at: DateTime::<Utc>::default(),
        }
    })
}

fn space_from_item(item: &Item) -> Result<Space, AdminError> {
    Ok(Space {
        id: string_attr(item, "id")?,
        name: string_attr(item, "name").unwrap_or_default(),
        owner: string_attr(item, "owner")?,
    })
}

#[async_trait]
impl ResourceStore for DynamoStore {
    async fn find_accounts(&self) -> Result<Vec<Account>, AdminError> {
        let items = self.scan_all(&self.table(ACCOUNTS)).await?;
        let mut accounts = items
            .iter()
            .map(account_from_item)
            .collect::<Result<Vec<_>, _>>()?;
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(accounts)
    }

    async fn find_account(&self, id: &str) -> Result<Option<Account>, AdminError> {
        let table = self.table(ACCOUNTS);
        let out = self
            .client
            .get_item()
            .table_name(&table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| AdminError::Store(format!("dynamodb get_item {table}: {e}")))?;

        out.item().map(account_from_item).transpose()
    }

    async fn delete_account(&self, id: &str) -> Result<Account, AdminError> {
        let removed = self.delete_item(&self.table(ACCOUNTS), id).await?;
        match removed {
            Some(item) => Ok(removed_account_from_item(id, &item)),
            None => Err(AdminError::NotFound(format!("account {id}"))),
        }
    }

    async fn update_admin_flag(&self, id: &str, admin: bool) -> Result<(), AdminError> {
        let table = self.table(ACCOUNTS);
        let result = self
            .client
            .update_item()
            .table_name(&table)
            .key("id", AttributeValue::S(id.to_string()))
            .update_expression("SET #admin = :admin")
            .condition_expression("attribute_exists(id)")
            .expression_attribute_names("#admin", "admin")
            .expression_attribute_values(":admin", AttributeValue::Bool(admin))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Err(AdminError::NotFound(format!("account {id}")))
            }
            Err(e) => Err(AdminError::Store(format!("dynamodb update_item {table}: {e}"))),
        }
    }

    async fn find_spaces_by_owner(&self, owner: &str) -> Result<Vec<Space>, AdminError> {
        let items = self
            .query_index(&self.table(ResourceKind::Space.as_str()), OWNER_INDEX, "owner", owner)
            .await?;
        items.iter().map(space_from_item).collect()
    }

    async fn find_all_spaces(&self) -> Result<Vec<Space>, AdminError> {
        let items = self.scan_all(&self.table(ResourceKind::Space.as_str())).await?;
        items.iter().map(space_from_item).collect()
    }

    async fn delete_by_space(
        &self,
        kind: ResourceKind,
        space_id: &str,
    ) -> Result<u64, AdminError> {
        let table = self.table(kind.as_str());

        if kind == ResourceKind::Space {
            let removed = self.delete_item(&table, space_id).await?;
            return Ok(u64::from(removed.is_some()));
        }

        let items = self.query_index(&table, SPACE_INDEX, "space", space_id).await?;
        let mut removed = 0;
        for item in &items {
            let id = string_attr(item, "id")?;
            if self.delete_item(&table, &id).await?.is_some() {
                removed += 1;
            }
        }

        debug!(table = %table, space_id = %space_id, removed, "Deleted resources of space");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    #[test]
    fn strict_conversion_rejects_item_without_email() {
        let item = Item::from([("id".to_string(), s("u1")), ("username".to_string(), s("alice"))]);

        assert!(account_from_item(&item).is_err());
    }

    #[test]
    fn deleted_malformed_account_still_yields_snapshot() {
        let item = Item::from([("username".to_string(), s("alice"))]);

        let account = removed_account_from_item("u1", &item);

        assert_eq!(account.id, "u1");
        assert_eq!(account.username, "alice");
        assert!(account.email.is_empty());
        assert!(!account.admin);
    }

    #[test]
    fn deleted_well_formed_account_keeps_every_attribute() {
        let item = Item::from([
            ("id".to_string(), s("u1")),
            ("username".to_string(), s("alice")),
            ("email".to_string(), s("alice@example.com")),
            ("admin".to_string(), AttributeValue::Bool(true)),
            ("registeredAt".to_string(), s("2024-05-01T10:00:00Z")),
        ]);

        let account = removed_account_from_item("u1", &item);

        assert_eq!(account.email, "alice@example.com");
        assert!(account.admin);
        assert_eq!(account.registered_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }
}
