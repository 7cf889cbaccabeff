use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::directory::AccountDirectory;
use crate::error::{AccountError, AccountResult, Rejection, StorageError};
use crate::hashing::CredentialHasher;
use crate::models::{AccountView, NewAccount, WriteOutcome};
use crate::repository::AccountRepository;

/// Shortest password the write path accepts, in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

const EMAIL_TAKEN_ON_CREATE: &str = "Email got taken";
const EMAIL_TAKEN_ON_UPDATE: &str = "Email already taken";

/// Mutation surface over accounts.
///
/// Each operation re-reads from storage, checks business rules, then issues
/// at most one write. Rule violations come back as `Err`; a missing account
/// or a failed write comes back as a [`WriteOutcome`] sentinel.
pub struct AccountWriter<R: AccountRepository, H: CredentialHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    directory: AccountDirectory<R>,
}

impl<R: AccountRepository, H: CredentialHasher> Clone for AccountWriter<R, H> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hasher: Arc::clone(&self.hasher),
            directory: self.directory.clone(),
        }
    }
}

impl<R: AccountRepository, H: CredentialHasher> AccountWriter<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        let directory = AccountDirectory::new(Arc::clone(&repository));
        Self {
            repository,
            hasher,
            directory,
        }
    }

    /// Create an account.
    ///
    /// Checks run in order and stop at the first failure: email not taken,
    /// password long enough, confirmation matches.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> AccountResult<WriteOutcome<AccountView>> {
        if self.directory.is_email_taken(email).await? {
            return Err(AccountError::new(Rejection::EmailAlreadyTaken, EMAIL_TAKEN_ON_CREATE));
        }

        validate_password(password)?;

        if password != password_confirmation {
            return Err(AccountError::new(Rejection::InvalidInput, "Passwords do not match"));
        }

        let password_hash = self.hasher.hash(password).await?;

        let new_account = NewAccount {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        };

        match self.repository.insert(new_account).await {
            Ok(account) => {
                info!(account_id = %account.id, "Created account");
                Ok(WriteOutcome::Applied(account.into()))
            }
            Err(e) => absorb(e, "create", EMAIL_TAKEN_ON_CREATE),
        }
    }

    /// Replace name and email of an existing account.
    ///
    /// The email may stay the same; it is only rejected when another account
    /// owns it.
    #[instrument(skip_all, fields(account_id = %id, email = %email))]
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
    ) -> AccountResult<WriteOutcome<AccountView>> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Ok(WriteOutcome::NotFound);
        }

        if let Some(owner) = self.repository.find_by_email(email).await? {
            if owner.id != id {
                return Err(AccountError::new(
                    Rejection::EmailAlreadyTaken,
                    EMAIL_TAKEN_ON_UPDATE,
                ));
            }
        }

        match self.repository.update_by_id(id, name, email).await {
            Ok(()) => {
                info!(account_id = %id, "Updated account");
                Ok(WriteOutcome::Applied(AccountView {
                    id,
                    name: name.to_string(),
                    email: email.to_string(),
                }))
            }
            Err(e) => absorb(e, "update", EMAIL_TAKEN_ON_UPDATE),
        }
    }

    /// Hard-delete an account.
    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn delete(&self, id: Uuid) -> AccountResult<WriteOutcome> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Ok(WriteOutcome::NotFound);
        }

        match self.repository.delete_by_id(id).await {
            Ok(()) => {
                info!(account_id = %id, "Deleted account");
                Ok(WriteOutcome::Applied(()))
            }
            Err(e) => {
                warn!(account_id = %id, error = %e, "Account delete did not complete");
                Ok(WriteOutcome::Failed)
            }
        }
    }

    /// Replace the password after checking the current one.
    #[instrument(skip_all, fields(account_id = %id))]
    pub async fn change_password(
        &self,
        id: Uuid,
        old_password: &str,
        new_password: &str,
        confirm_new_password: &str,
    ) -> AccountResult<WriteOutcome> {
        let Some(account) = self.repository.find_by_id(id).await? else {
            return Ok(WriteOutcome::NotFound);
        };

        validate_password(new_password)?;

        if new_password != confirm_new_password {
            return Err(AccountError::new(Rejection::InvalidInput, "Passwords do not match"));
        }

        if !self.hasher.verify(old_password, &account.password_hash).await? {
            return Err(AccountError::new(Rejection::InvalidInput, "Old password is incorrect"));
        }

        let password_hash = self.hasher.hash(new_password).await?;

        match self.repository.update_password_by_id(id, &password_hash).await {
            Ok(()) => {
                info!(account_id = %id, "Changed account password");
                Ok(WriteOutcome::Applied(()))
            }
            Err(e) => absorb(e, "change_password", EMAIL_TAKEN_ON_UPDATE),
        }
    }
}

fn validate_password(password: &str) -> AccountResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AccountError::new(
            Rejection::InvalidInput,
            format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ),
        ));
    }
    Ok(())
}

/// Turn a failed storage write into the write-path result.
///
/// A unique-constraint conflict means another writer claimed the email
/// between our check and our write; it is reported with the operation's own
/// `taken_message`. Anything else becomes [`WriteOutcome::Failed`] with the
/// cause only in the log.
fn absorb<T>(
    error: StorageError,
    operation: &'static str,
    taken_message: &'static str,
) -> AccountResult<WriteOutcome<T>> {
    match error {
        StorageError::Conflict(_) => Err(AccountError::new(
            Rejection::EmailAlreadyTaken,
            taken_message,
        )),
        StorageError::Backend(cause) => {
            warn!(operation, error = %cause, "Account write did not complete");
            Ok(WriteOutcome::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::MockCredentialHasher;
    use crate::models::Account;
    use crate::repository::MockAccountRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn stored(id: Uuid, email: &str) -> Account {
        let now = Utc::now();
        Account {
            id,
            name: "Alice".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stored".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn hasher() -> MockCredentialHasher {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|plain: &str| Ok(format!("hashed:{plain}")));
        hasher
    }

    fn writer(
        repo: MockAccountRepository,
        hasher: MockCredentialHasher,
    ) -> AccountWriter<MockAccountRepository, MockCredentialHasher> {
        AccountWriter::new(Arc::new(repo), Arc::new(hasher))
    }

    #[tokio::test]
    async fn test_create_hashes_password_before_insert() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|account: &NewAccount| account.password_hash == "hashed:secret1")
            .times(1)
            .returning(|account| {
                let mut created = stored(Uuid::now_v7(), &account.email);
                created.name = account.name;
                created.password_hash = account.password_hash;
                Ok(created)
            });

        let outcome = writer(repo, hasher())
            .create("Alice", "a@x.com", "secret1", "secret1")
            .await
            .unwrap();

        let view = outcome.applied().unwrap();
        assert_eq!(view.name, "Alice");
        assert_eq!(view.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_create_taken_email_short_circuits() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored(Uuid::now_v7(), email))));
        repo.expect_insert().never();

        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash().never();

        let result = writer(repo, hasher)
            .create("Bob", "a@x.com", "abc", "xyz")
            .await;
        assert!(matches!(result, Err(AccountError::EmailAlreadyTaken(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_short_password_before_confirmation() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert().never();

        let result = writer(repo, MockCredentialHasher::new())
            .create("A", "a@x.com", "abc", "different")
            .await;

        match result {
            Err(AccountError::InvalidInput(msg)) => assert!(msg.contains('6')),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_counts_characters_not_bytes() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        // five characters, ten bytes
        let result = writer(repo, MockCredentialHasher::new())
            .create("A", "a@x.com", "ééééé", "ééééé")
            .await;
        assert!(matches!(result, Err(AccountError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_confirmation_mismatch() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert().never();

        let result = writer(repo, MockCredentialHasher::new())
            .create("A", "a@x.com", "secret1", "secret2")
            .await;
        assert!(matches!(result, Err(AccountError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_create_storage_failure_is_absorbed() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert()
            .returning(|_| Err(StorageError::Backend("disk full".to_string())));

        let outcome = writer(repo, hasher())
            .create("A", "a@x.com", "secret1", "secret1")
            .await
            .unwrap();
        assert!(outcome.is_failed());
    }

    #[tokio::test]
    async fn test_create_lost_race_reports_taken_email() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert()
            .returning(|account| Err(StorageError::Conflict(account.email)));

        let result = writer(repo, hasher())
            .create("A", "a@x.com", "secret1", "secret1")
            .await;

        // same message as the pre-check on create
        match result {
            Err(AccountError::EmailAlreadyTaken(msg)) => assert_eq!(msg, "Email got taken"),
            other => panic!("expected EmailAlreadyTaken, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_missing_account_is_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_find_by_email().never();
        repo.expect_update_by_id().never();

        let outcome = writer(repo, MockCredentialHasher::new())
            .update(Uuid::now_v7(), "A", "a@x.com")
            .await
            .unwrap();
        assert!(outcome.is_not_found());
    }

    #[tokio::test]
    async fn test_update_keeping_own_email_succeeds() {
        let id = Uuid::now_v7();
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(move |id| Ok(Some(stored(id, "a@x.com"))));
        repo.expect_find_by_email()
            .returning(move |email| Ok(Some(stored(id, email))));
        repo.expect_update_by_id()
            .withf(move |target: &Uuid, name: &str, email: &str| {
                *target == id && name == "Alice2" && email == "a@x.com"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let outcome = writer(repo, MockCredentialHasher::new())
            .update(id, "Alice2", "a@x.com")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            WriteOutcome::Applied(AccountView {
                id,
                name: "Alice2".to_string(),
                email: "a@x.com".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_update_to_email_of_other_account_is_rejected() {
        let id = Uuid::now_v7();
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(stored(id, "a@x.com"))));
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored(Uuid::now_v7(), email))));
        repo.expect_update_by_id().never();

        let result = writer(repo, MockCredentialHasher::new())
            .update(id, "Alice", "b@x.com")
            .await;
        assert!(matches!(result, Err(AccountError::EmailAlreadyTaken(_))));
    }

    #[tokio::test]
    async fn test_update_lost_race_reports_taken_email() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "a@x.com"))));
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_update_by_id()
            .times(1)
            .returning(|_, _, email| Err(StorageError::Conflict(email.to_string())));

        let result = writer(repo, MockCredentialHasher::new())
            .update(Uuid::now_v7(), "A", "b@x.com")
            .await;

        match result {
            Err(AccountError::EmailAlreadyTaken(msg)) => assert_eq!(msg, "Email already taken"),
            other => panic!("expected EmailAlreadyTaken, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_storage_failure_is_absorbed() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "a@x.com"))));
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_update_by_id()
            .returning(|_, _, _| Err(StorageError::Backend("timeout".to_string())));

        let outcome = writer(repo, MockCredentialHasher::new())
            .update(Uuid::now_v7(), "A", "new@x.com")
            .await
            .unwrap();
        assert!(outcome.is_failed());
    }

    #[tokio::test]
    async fn test_delete_outcomes() {
        let present = Uuid::now_v7();
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().returning(move |id| {
            Ok((id == present).then(|| stored(id, "a@x.com")))
        });
        repo.expect_delete_by_id()
            .with(eq(present))
            .times(1)
            .returning(|_| Ok(()));

        let writer = writer(repo, MockCredentialHasher::new());
        assert!(writer.delete(present).await.unwrap().is_applied());
        assert!(writer.delete(Uuid::now_v7()).await.unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_storage_failure_is_absorbed() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "a@x.com"))));
        repo.expect_delete_by_id()
            .returning(|_| Err(StorageError::Backend("locked".to_string())));

        let outcome = writer(repo, MockCredentialHasher::new())
            .delete(Uuid::now_v7())
            .await
            .unwrap();
        assert!(outcome.is_failed());
    }

    #[tokio::test]
    async fn test_change_password_requires_old_password() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "a@x.com"))));
        repo.expect_update_password_by_id().never();

        let mut hasher = MockCredentialHasher::new();
        hasher.expect_verify().returning(|_, _| Ok(false));
        hasher.expect_hash().never();

        let result = writer(repo, hasher)
            .change_password(Uuid::now_v7(), "wrong", "secret2", "secret2")
            .await;
        assert!(matches!(result, Err(AccountError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_change_password_stores_new_hash() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "a@x.com"))));
        repo.expect_update_password_by_id()
            .withf(|_: &Uuid, hash: &str| hash == "hashed:secret2")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut hasher = hasher();
        hasher
            .expect_verify()
            .withf(|plain: &str, hash: &str| plain == "secret1" && hash == "$argon2id$stored")
            .returning(|_, _| Ok(true));

        let outcome = writer(repo, hasher)
            .change_password(Uuid::now_v7(), "secret1", "secret2", "secret2")
            .await
            .unwrap();
        assert!(outcome.is_applied());
    }

    #[tokio::test]
    async fn test_change_password_mismatch_skips_verification() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "a@x.com"))));

        let mut hasher = MockCredentialHasher::new();
        hasher.expect_verify().never();

        let result = writer(repo, hasher)
            .change_password(Uuid::now_v7(), "secret1", "secret2", "secret3")
            .await;
        assert!(matches!(result, Err(AccountError::InvalidInput(_))));
    }
}
