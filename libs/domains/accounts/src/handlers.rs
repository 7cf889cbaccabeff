use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{UuidPath, ValidatedJson, ValidatedQuery};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AccountError, AccountResult};
use crate::hashing::CredentialHasher;
use crate::models::{AccountView, EmailCheckQuery, EmailCheckResponse, WriteOutcome};
use crate::repository::AccountRepository;
use crate::service::AccountService;
use crate::validation::{ChangePasswordRequest, CreateAccountRequest, UpdateAccountRequest};

/// Create the accounts router with all HTTP endpoints
pub fn router<R, H>(service: AccountService<R, H>) -> Router
where
    R: AccountRepository + 'static,
    H: CredentialHasher + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_accounts::<R, H>).post(create_account::<R, H>))
        .route("/email-check", get(check_email::<R, H>))
        .route(
            "/{id}",
            get(get_account::<R, H>)
                .put(update_account::<R, H>)
                .delete(delete_account::<R, H>),
        )
        .route("/{id}/change-password", post(change_password::<R, H>))
        .with_state(shared_service)
}

type SharedService<R, H> = State<Arc<AccountService<R, H>>>;

/// Turn a write outcome into the handler result for account `id`.
fn settle<T>(outcome: WriteOutcome<T>, id: Uuid) -> AccountResult<T> {
    match outcome {
        WriteOutcome::Applied(value) => Ok(value),
        WriteOutcome::NotFound => Err(AccountError::NotFound(id)),
        WriteOutcome::Failed => Err(AccountError::WriteFailed),
    }
}

/// List all accounts
///
/// GET /accounts
async fn list_accounts<R: AccountRepository, H: CredentialHasher>(
    State(service): SharedService<R, H>,
) -> AccountResult<Json<Vec<AccountView>>> {
    let accounts = service.list_accounts().await?;
    Ok(Json(accounts))
}

/// Create an account
///
/// POST /accounts
async fn create_account<R: AccountRepository, H: CredentialHasher>(
    State(service): SharedService<R, H>,
    ValidatedJson(input): ValidatedJson<CreateAccountRequest>,
) -> AccountResult<impl IntoResponse> {
    let outcome = service
        .create(
            &input.name,
            &input.email,
            &input.password,
            &input.password_confirmation,
        )
        .await?;

    let account = match outcome {
        WriteOutcome::Applied(account) => account,
        WriteOutcome::NotFound | WriteOutcome::Failed => return Err(AccountError::WriteFailed),
    };

    Ok((StatusCode::CREATED, Json(account)))
}

/// Check whether an email is registered
///
/// GET /accounts/email-check?email=a@x.com
async fn check_email<R: AccountRepository, H: CredentialHasher>(
    State(service): SharedService<R, H>,
    ValidatedQuery(query): ValidatedQuery<EmailCheckQuery>,
) -> AccountResult<Json<EmailCheckResponse>> {
    let taken = service.is_email_taken(&query.email).await?;
    Ok(Json(EmailCheckResponse {
        email: query.email,
        taken,
    }))
}

/// Get an account by ID
///
/// GET /accounts/{id}
async fn get_account<R: AccountRepository, H: CredentialHasher>(
    State(service): SharedService<R, H>,
    UuidPath(id): UuidPath,
) -> AccountResult<Json<AccountView>> {
    let account = service
        .get_account(id)
        .await?
        .ok_or(AccountError::NotFound(id))?;
    Ok(Json(account))
}

/// Update name and email
///
/// PUT /accounts/{id}
async fn update_account<R: AccountRepository, H: CredentialHasher>(
    State(service): SharedService<R, H>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateAccountRequest>,
) -> AccountResult<Json<AccountView>> {
    let outcome = service.update(id, &input.name, &input.email).await?;
    Ok(Json(settle(outcome, id)?))
}

/// Delete an account
///
/// DELETE /accounts/{id}
async fn delete_account<R: AccountRepository, H: CredentialHasher>(
    State(service): SharedService<R, H>,
    UuidPath(id): UuidPath,
) -> AccountResult<impl IntoResponse> {
    settle(service.delete(id).await?, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change the password after checking the current one
///
/// POST /accounts/{id}/change-password
async fn change_password<R: AccountRepository, H: CredentialHasher>(
    State(service): SharedService<R, H>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AccountResult<impl IntoResponse> {
    let outcome = service
        .change_password(
            id,
            &input.old_password,
            &input.new_password,
            &input.confirm_new_password,
        )
        .await?;

    settle(outcome, id)?;
    Ok(StatusCode::NO_CONTENT)
}
