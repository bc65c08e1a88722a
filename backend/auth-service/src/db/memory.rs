/// In-memory stores for tests and database-less local runs
use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tokio::sync::RwLock;

use super::{CompanyStore, UserStore};
use crate::error::Result;
use crate::models::{Company, UserRecord};

/// Username -> record map satisfying the [`UserStore`] lookup contract
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.username.clone(), user))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Insert or replace the record for `user.username`
    pub async fn insert(&self, user: UserRecord) {
        self.users.write().await.insert(user.username.clone(), user);
    }

    pub async fn remove(&self, username: &str) -> Option<UserRecord> {
        self.users.write().await.remove(username)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

/// Id -> company map, listed by name like the SQL store
#[derive(Default)]
pub struct InMemoryCompanyStore {
    companies: RwLock<BTreeMap<i32, Company>>,
}

impl InMemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_companies(companies: impl IntoIterator<Item = Company>) -> Self {
        let companies = companies.into_iter().map(|c| (c.id, c)).collect();
        Self {
            companies: RwLock::new(companies),
        }
    }

    pub async fn insert(&self, company: Company) {
        self.companies.write().await.insert(company.id, company);
    }
}

#[async_trait]
impl CompanyStore for InMemoryCompanyStore {
    async fn list(&self) -> Result<Vec<Company>> {
        let mut companies: Vec<Company> = self.companies.read().await.values().cloned().collect();
        companies.sort_by(|a, b| a.company_name.cmp(&b.company_name));
        Ok(companies)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Company>> {
        Ok(self.companies.read().await.get(&id).cloned())
    }
}

/// Seed file contents for database-less runs
///
/// ```json
/// { "users": [{ "id": 1, "username": "alice", "password_hash": "$2b$12$..." }],
///   "companies": [{ "id": 1, "company_name": "Acme" }] }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub companies: Vec<Company>,
}

impl SeedData {
    pub fn from_json(json: &str) -> AnyResult<Self> {
        serde_json::from_str(json).context("Invalid seed data")
    }

    pub fn load(path: impl AsRef<Path>) -> AnyResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn into_stores(self) -> (InMemoryUserStore, InMemoryCompanyStore) {
        (
            InMemoryUserStore::with_users(self.users),
            InMemoryCompanyStore::with_companies(self.companies),
        )
    }
}
