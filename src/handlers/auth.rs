//! Authentication handlers
//!
//! Registration, email verification, login and logout

use crate::entity::{Account, Role};
use crate::error::{AppError, AppResult, OptionExt};
use crate::router::Route;
use crate::state::App;
use crate::validation;
use crate::view::DataKind;

/// Registration form input
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Register a new account. New accounts are regular users and start
/// unverified; they cannot log in until verified.
pub fn register(app: &mut App, input: RegisterInput) -> AppResult<Route> {
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
        role: Role::User,
        verified: false,
    });
    app.commit(&[DataKind::Accounts])?;

    tracing::info!("Account registered: {}", input.email);
    Ok(Route::VerifyEmail)
}

/// Mark an account as verified. Stands in for the email round trip a real
/// deployment would do; idempotent for already verified accounts.
pub fn verify_email(app: &mut App, email: &str) -> AppResult<()> {
    {
        let account = app
            .store
            .account_by_email_mut(email)
            .ok_or_not_found(format!("No account with email {}", email))?;
        account.verified = true;
    }
    app.commit(&[DataKind::Accounts])?;

    tracing::info!("Account verified: {}", email);
    Ok(())
}

/// Log in and direct to the home page
pub fn login(app: &mut App, email: &str, password: &str) -> AppResult<Route> {
    app.login(email, password)?;
    Ok(Route::Home)
}

/// Log out and direct to the home page
pub fn logout(app: &mut App) -> Route {
    app.logout();
    Route::Home
}
