use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::AccountResult;
use crate::models::AccountView;
use crate::repository::AccountRepository;

/// Read-only query surface over accounts.
///
/// Every result is a projection; credential hashes never leave this type.
pub struct AccountDirectory<R: AccountRepository> {
    repository: Arc<R>,
}

impl<R: AccountRepository> Clone for AccountDirectory<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: AccountRepository> AccountDirectory<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// All accounts in storage order; empty when there are none.
    #[instrument(skip(self))]
    pub async fn list_accounts(&self) -> AccountResult<Vec<AccountView>> {
        let accounts = self.repository.list_all().await?;
        debug!(count = accounts.len(), "Listed accounts");
        Ok(accounts.into_iter().map(AccountView::from).collect())
    }

    /// `None` when no account has this id.
    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn get_account(&self, id: Uuid) -> AccountResult<Option<AccountView>> {
        let account = self.repository.find_by_id(id).await?;
        Ok(account.map(AccountView::from))
    }

    /// Exact-match existence check; no trimming or case folding.
    #[instrument(skip(self))]
    pub async fn is_email_taken(&self, email: &str) -> AccountResult<bool> {
        Ok(self.repository.find_by_email(email).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AccountError, StorageError};
    use crate::models::Account;
    use crate::repository::MockAccountRepository;
    use chrono::Utc;

    fn stored(name: &str, email: &str) -> Account {
        let now = Utc::now();
        Account {
            id: Uuid::now_v7(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stored".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_list_accounts_empty() {
        let mut repo = MockAccountRepository::new();
        repo.expect_list_all().returning(|| Ok(vec![]));

        let directory = AccountDirectory::new(Arc::new(repo));
        assert!(directory.list_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_accounts_projects_in_storage_order() {
        let first = stored("Alice", "a@x.com");
        let second = stored("Bob", "b@x.com");
        let expected = vec![AccountView::from(&first), AccountView::from(&second)];

        let mut repo = MockAccountRepository::new();
        repo.expect_list_all()
            .returning(move || Ok(vec![first.clone(), second.clone()]));

        let directory = AccountDirectory::new(Arc::new(repo));
        assert_eq!(directory.list_accounts().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_list_accounts_propagates_storage_failure() {
        let mut repo = MockAccountRepository::new();
        repo.expect_list_all()
            .returning(|| Err(StorageError::Backend("down".to_string())));

        let directory = AccountDirectory::new(Arc::new(repo));
        let result = directory.list_accounts().await;
        assert!(matches!(result, Err(AccountError::Storage(_))));
    }

    #[tokio::test]
    async fn test_get_account_missing_is_none() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let directory = AccountDirectory::new(Arc::new(repo));
        assert_eq!(directory.get_account(Uuid::now_v7()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_is_email_taken_passes_email_through_untouched() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .withf(|email: &str| email == " A@x.com ")
            .times(1)
            .returning(|_| Ok(None));

        let directory = AccountDirectory::new(Arc::new(repo));
        assert!(!directory.is_email_taken(" A@x.com ").await.unwrap());
    }
}
