use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub registered_at: DateTime<Utc>,
}

impl Account {
    /// Builds a non-admin account with a fresh identifier.
    #[must_use]
    pub fn new(username: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            admin: false,
            registered_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }
}

/// A workspace owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub owner: String,
}

impl Space {
    #[must_use]
    pub fn new(id: &str, name: &str, owner: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            owner: owner.to_string(),
        }
    }
}

/// Collections that hang off a space.
///
/// `Space` itself is listed so cascade deletion can treat the space record
/// like any other per-space collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Cluster,
    Cache,
    DomainModel,
    Notebook,
    Space,
}

impl ResourceKind {
    /// Resources that reference a space but are not the space itself.
    pub const DEPENDENTS: [ResourceKind; 4] = [
        ResourceKind::Cluster,
        ResourceKind::Cache,
        ResourceKind::DomainModel,
        ResourceKind::Notebook,
    ];

    /// Everything removed when a space is cascaded away.
    pub const CASCADE: [ResourceKind; 5] = [
        ResourceKind::Cluster,
        ResourceKind::Cache,
        ResourceKind::DomainModel,
        ResourceKind::Notebook,
        ResourceKind::Space,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Cluster => "clusters",
            ResourceKind::Cache => "caches",
            ResourceKind::DomainModel => "domain_models",
            ResourceKind::Notebook => "notebooks",
            ResourceKind::Space => "spaces",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cluster, cache, domain model or notebook living inside a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentResource {
    #[serde(rename = "_id")]
    pub id: String,
    pub kind: ResourceKind,
    pub space: String,
    pub name: String,
}

impl DependentResource {
    #[must_use]
    pub fn new(kind: ResourceKind, space: &str, name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            space: space.to_string(),
            name: name.to_string(),
        }
    }
}
