//! Account handlers
//!
//! Admin account management plus the self-service profile operations

use crate::entity::{Account, Role};
use crate::error::{AppError, AppResult, OptionExt};
use crate::state::App;
use crate::validation;
use crate::view::DataKind;

/// Only admins manage accounts other than their own
fn can_manage_accounts(app: &App) -> bool {
    app.session.is_admin()
}

/// Admin account creation input. Unlike self-registration the role and the
/// verified flag are chosen by the admin.
#[derive(Debug, Clone)]
pub struct NewAccountInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub verified: bool,
}

/// Admin account edit input; `None` leaves a field unchanged
#[derive(Debug, Clone)]
pub struct UpdateAccountInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<Role>,
    pub verified: Option<bool>,
}

pub fn list(app: &App) -> &[Account] {
    &app.store.accounts
}

pub fn create(app: &mut App, input: NewAccountInput) -> AppResult<()> {
    if !can_manage_accounts(app) {
        return Err(AppError::Forbidden);
    }

    validation::validate_name("First name", &input.first_name).map_err(AppError::Validation)?;
    validation::validate_name("Last name", &input.last_name).map_err(AppError::Validation)?;
    validation::validate_email(&input.email).map_err(AppError::Validation)?;
    validation::validate_password(&input.password).map_err(AppError::Validation)?;

    if app.store.account_by_email(&input.email).is_some() {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    app.store.accounts.push(Account {
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email.clone(),
        password: input.password,
        role: input.role,
        verified: input.verified,
    });
    app.commit(&[DataKind::Accounts])?;

    tracing::info!("Account created by admin: {}", input.email);
    Ok(())
}

pub fn update(app: &mut App, input: UpdateAccountInput) -> AppResult<()> {
    if !can_manage_accounts(app) {
        return Err(AppError::Forbidden);
    }

    validation::validate_name("First name", &input.first_name).map_err(AppError::Validation)?;
    validation::validate_name("Last name", &input.last_name).map_err(AppError::Validation)?;

    {
        let account = app
            .store
            .account_by_email_mut(&input.email)
            .ok_or_not_found(format!("No account with email {}", input.email))?;
        account.first_name = input.first_name;
        account.last_name = input.last_name;
        if let Some(role) = input.role {
            account.role = role;
        }
        if let Some(verified) = input.verified {
            account.verified = verified;
        }
    }

    // The admin may have edited their own account
    app.session.refresh_identity(&app.store);
    app.commit(&[DataKind::Accounts, DataKind::Session])?;
    Ok(())
}

/// Delete an account. Deleting the identity the session is logged in with
/// is blocked.
pub fn delete(app: &mut App, email: &str) -> AppResult<()> {
    if !can_manage_accounts(app) {
        return Err(AppError::Forbidden);
    }

    if app.session.email() == Some(email) {
        return Err(AppError::Validation(
            "You cannot delete the account you are logged in with".to_string(),
        ));
    }

    if app.store.account_by_email(email).is_none() {
        return Err(AppError::NotFound(format!(
            "No account with email {}",
            email
        )));
    }

    app.store.accounts.retain(|a| a.email != email);
    app.commit(&[DataKind::Accounts])?;

    tracing::info!("Account deleted: {}", email);
    Ok(())
}

/// Admin sets a new password for any account
pub fn reset_password(app: &mut App, email: &str, new_password: &str) -> AppResult<()> {
    if !can_manage_accounts(app) {
        return Err(AppError::Forbidden);
    }

    validation::validate_password(new_password).map_err(AppError::Validation)?;

    {
        let account = app
            .store
            .account_by_email_mut(email)
            .ok_or_not_found(format!("No account with email {}", email))?;
        account.password = new_password.to_string();
    }

    app.session.refresh_identity(&app.store);
    app.commit(&[DataKind::Accounts])?;

    tracing::info!("Password reset for {}", email);
    Ok(())
}

/// Self-service: edit the logged-in account's name fields
pub fn update_profile(app: &mut App, first_name: &str, last_name: &str) -> AppResult<()> {
    let email = app
        .session
        .email()
        .ok_or(AppError::Unauthorized)?
        .to_string();

    validation::validate_name("First name", first_name).map_err(AppError::Validation)?;
    validation::validate_name("Last name", last_name).map_err(AppError::Validation)?;

    {
        let account = app
            .store
            .account_by_email_mut(&email)
            .ok_or_not_found(format!("No account with email {}", email))?;
        account.first_name = first_name.to_string();
        account.last_name = last_name.to_string();
    }

    app.session.refresh_identity(&app.store);
    app.commit(&[DataKind::Accounts, DataKind::Session])?;
    Ok(())
}

/// Self-service: change the logged-in account's password
pub fn change_password(app: &mut App, old_password: &str, new_password: &str) -> AppResult<()> {
    let email = app
        .session
        .email()
        .ok_or(AppError::Unauthorized)?
        .to_string();

    validation::validate_password(new_password).map_err(AppError::Validation)?;

    {
        let account = app
            .store
            .account_by_email_mut(&email)
            .ok_or_not_found(format!("No account with email {}", email))?;
        if account.password != old_password {
            return Err(AppError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }
        account.password = new_password.to_string();
    }

    app.session.refresh_identity(&app.store);
    app.commit(&[DataKind::Accounts])?;

    tracing::info!("Password changed for {}", email);
    Ok(())
}
