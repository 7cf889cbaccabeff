use std::sync::Arc;
use uuid::Uuid;

use crate::directory::AccountDirectory;
use crate::error::AccountResult;
use crate::hashing::CredentialHasher;
use crate::models::{AccountView, WriteOutcome};
use crate::repository::AccountRepository;
use crate::writer::AccountWriter;

/// Service layer for accounts: one directory and one writer over a shared store.
pub struct AccountService<R: AccountRepository, H: CredentialHasher> {
    directory: AccountDirectory<R>,
    writer: AccountWriter<R, H>,
}

impl<R: AccountRepository, H: CredentialHasher> Clone for AccountService<R, H> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            writer: self.writer.clone(),
        }
    }
}

impl<R: AccountRepository, H: CredentialHasher> AccountService<R, H> {
    pub fn new(repository: R, hasher: H) -> Self {
        let repository = Arc::new(repository);
        Self {
            directory: AccountDirectory::new(Arc::clone(&repository)),
            writer: AccountWriter::new(repository, Arc::new(hasher)),
        }
    }

    pub async fn list_accounts(&self) -> AccountResult<Vec<AccountView>> {
        self.directory.list_accounts().await
    }

    pub async fn get_account(&self, id: Uuid) -> AccountResult<Option<AccountView>> {
        self.directory.get_account(id).await
    }

    pub async fn is_email_taken(&self, email: &str) -> AccountResult<bool> {
        self.directory.is_email_taken(email).await
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> AccountResult<WriteOutcome<AccountView>> {
        self.writer
            .create(name, email, password, password_confirmation)
            .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
    ) -> AccountResult<WriteOutcome<AccountView>> {
        self.writer.update(id, name, email).await
    }

    pub async fn delete(&self, id: Uuid) -> AccountResult<WriteOutcome> {
        self.writer.delete(id).await
    }

    pub async fn change_password(
        &self,
        id: Uuid,
        old_password: &str,
        new_password: &str,
        confirm_new_password: &str,
    ) -> AccountResult<WriteOutcome> {
        self.writer
            .change_password(id, old_password, new_password, confirm_new_password)
            .await
    }
}
