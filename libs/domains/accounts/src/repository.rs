use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};
use crate::models::{Account, NewAccount};

/// Storage collaborator for accounts.
///
/// Implementations own the persisted records and must reject a second
/// account with the same email (exact match) with [`StorageError::Conflict`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// All accounts, in storage order
    async fn list_all(&self) -> StorageResult<Vec<Account>>;

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Account>>;

    /// Insert a new account; storage assigns the id
    async fn insert(&self, account: NewAccount) -> StorageResult<Account>;

    /// Overwrite name and email of an existing account
    async fn update_by_id(&self, id: Uuid, name: &str, email: &str) -> StorageResult<()>;

    /// Replace the stored credential hash
    async fn update_password_by_id(&self, id: Uuid, password_hash: &str) -> StorageResult<()>;

    /// Hard delete
    async fn delete_by_id(&self, id: Uuid) -> StorageResult<()>;
}

/// In-memory implementation of AccountRepository (for development/testing)
///
/// Keeps insertion order. Uniqueness is checked under the write lock, so
/// concurrent inserts of the same email cannot both succeed.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<Vec<Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn list_all(&self) -> StorageResult<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn insert(&self, account: NewAccount) -> StorageResult<Account> {
        let mut accounts = self.accounts.write().await;

        if accounts.iter().any(|a| a.email == account.email) {
            return Err(StorageError::Conflict(account.email));
        }

        let now = Utc::now();
        let created = Account {
            id: Uuid::now_v7(),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };
        accounts.push(created.clone());

        tracing::debug!(account_id = %created.id, "Inserted account");
        Ok(created)
    }

    async fn update_by_id(&self, id: Uuid, name: &str, email: &str) -> StorageResult<()> {
        let mut accounts = self.accounts.write().await;

        if accounts.iter().any(|a| a.id != id && a.email == email) {
            return Err(StorageError::Conflict(email.to_string()));
        }

        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StorageError::Backend(format!("account {} vanished", id)))?;

        account.name = name.to_string();
        account.email = email.to_string();
        account.updated_at = Utc::now();

        tracing::debug!(account_id = %id, "Updated account");
        Ok(())
    }

    async fn update_password_by_id(&self, id: Uuid, password_hash: &str) -> StorageResult<()> {
        let mut accounts = self.accounts.write().await;

        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StorageError::Backend(format!("account {} vanished", id)))?;

        account.password_hash = password_hash.to_string();
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> StorageResult<()> {
        let mut accounts = self.accounts.write().await;

        let before = accounts.len();
        accounts.retain(|a| a.id != id);

        if accounts.len() == before {
            return Err(StorageError::Backend(format!("account {} vanished", id)));
        }

        tracing::debug!(account_id = %id, "Deleted account");
        Ok(())
    }
}
