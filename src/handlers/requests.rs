//! Supply request handlers
//!
//! Requests are created by the logged-in account for itself and start
//! Pending. There is no approval operation.

use chrono::Utc;

use crate::entity::{Request, RequestItem, RequestStatus};
use crate::error::{AppError, AppResult};
use crate::state::App;
use crate::view::DataKind;

#[derive(Debug, Clone)]
pub struct RequestInput {
    pub kind: String,
    pub items: Vec<RequestItem>,
}

/// Create a request owned by the current session. The id and the creation
/// date both derive from the same timestamp.
pub fn create(app: &mut App, input: RequestInput) -> AppResult<Request> {
    let email = app
        .session
        .email()
        .ok_or(AppError::Unauthorized)?
        .to_string();

    if input.kind.trim().is_empty() {
        return Err(AppError::Validation("Request type is required".to_string()));
    }
    if input.items.is_empty() {
        return Err(AppError::Validation(
            "A request needs at least one item".to_string(),
        ));
    }
    for item in &input.items {
        if item.name.trim().is_empty() {
            return Err(AppError::Validation("Item name is required".to_string()));
        }
        if item.qty == 0 {
            return Err(AppError::Validation(
                "Item quantity must be greater than zero".to_string(),
            ));
        }
    }

    let date = Utc::now();
    let request = Request {
        id: date.timestamp_millis(),
        kind: input.kind,
        items: input.items,
        status: RequestStatus::Pending,
        date,
        employee_email: email,
    };
    app.store.requests.push(request.clone());
    app.commit(&[DataKind::Requests])?;

    tracing::info!("Request created: {} by {}", request.id, request.employee_email);
    Ok(request)
}

/// Requests visible to the current session: admins see every request,
/// users see their own, an empty session sees nothing (the router keeps
/// the page itself behind the login gate).
pub fn list(app: &App) -> Vec<&Request> {
    match app.session.email() {
        Some(_) if app.session.is_admin() => app.store.requests.iter().collect(),
        Some(email) => app
            .store
            .requests
            .iter()
            .filter(|r| r.employee_email == email)
            .collect(),
        None => Vec::new(),
    }
}
