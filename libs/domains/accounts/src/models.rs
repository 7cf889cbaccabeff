use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Account entity as persisted by the storage collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Assigned by storage at insert time, never reassigned
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Unique across all accounts (exact match)
    pub email: String,
    /// Argon2 PHC string (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read projection of an account. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
        }
    }
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
        }
    }
}

/// Fields handed to storage when inserting an account. The password is
/// already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Result of a mutation on the write path.
///
/// Business-rule violations are reported as errors instead; this covers the
/// outcomes that are not the caller's fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T = ()> {
    /// The write went through.
    Applied(T),
    /// No account with the requested id.
    NotFound,
    /// Storage rejected or lost the write. The cause is logged, not returned.
    Failed,
}

impl<T> WriteOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WriteOutcome::NotFound)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, WriteOutcome::Failed)
    }

    /// The applied value, if any.
    pub fn applied(self) -> Option<T> {
        match self {
            WriteOutcome::Applied(value) => Some(value),
            _ => None,
        }
    }
}

/// Response body of the email availability check
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailCheckResponse {
    pub email: String,
    pub taken: bool,
}

/// Query string of the email availability check
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, utoipa::IntoParams)]
pub struct EmailCheckQuery {
    pub email: String,
}
