//! Accounts Domain
//!
//! User accounts with a read side and a write side over one store.
//!
//! # Features
//!
//! - Account listing and lookup by id
//! - Email availability check (exact match)
//! - Create, update and delete with business-rule checks
//! - Password change with old-password verification
//! - Argon2 credential hashing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, request schemas
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← AccountDirectory (reads) + AccountWriter (writes)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory + Postgres)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Account, AccountView, WriteOutcome
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_accounts::{
//!     handlers,
//!     hashing::Argon2Hasher,
//!     repository::InMemoryAccountRepository,
//!     service::AccountService,
//! };
//!
//! let service = AccountService::new(InMemoryAccountRepository::new(), Argon2Hasher::new());
//! let router = handlers::router(service);
//! ```

pub mod directory;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod hashing;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;
pub mod writer;

// Re-export commonly used types
pub use directory::AccountDirectory;
pub use error::{
    AccountError, AccountErrorKind, AccountResult, Rejection, StorageError, StorageResult,
};
pub use hashing::{Argon2Hasher, CredentialHasher};
pub use models::{Account, AccountView, NewAccount, WriteOutcome};
pub use postgres::PgAccountRepository;
pub use repository::{AccountRepository, InMemoryAccountRepository};
pub use service::AccountService;
pub use validation::{ChangePasswordRequest, CreateAccountRequest, UpdateAccountRequest};
pub use writer::{AccountWriter, MIN_PASSWORD_LENGTH};
