//! Employee handlers
//!
//! Employee records tie an account to a department; both references are
//! checked here, at write time.

use chrono::NaiveDate;

use crate::entity::Employee;
use crate::error::{AppError, AppResult};
use crate::state::App;
use crate::view::DataKind;

fn can_manage_employees(app: &App) -> bool {
    app.session.is_admin()
}

#[derive(Debug, Clone)]
pub struct EmployeeInput {
    pub employee_id: String,
    pub user_email: String,
    pub position: String,
    pub dept_id: u32,
    /// ISO date, YYYY-MM-DD
    pub hire_date: String,
}

pub fn list(app: &App) -> &[Employee] {
    &app.store.employees
}

/// Shared checks for create and update; returns the parsed hire date
fn check_input(app: &App, input: &EmployeeInput) -> AppResult<NaiveDate> {
    if input.employee_id.trim().is_empty() {
        return Err(AppError::Validation("Employee id is required".to_string()));
    }
    if input.position.trim().is_empty() {
        return Err(AppError::Validation("Position is required".to_string()));
    }

    let hire_date = NaiveDate::parse_from_str(&input.hire_date, "%Y-%m-%d").map_err(|_| {
        AppError::Validation("Hire date must be a valid YYYY-MM-DD date".to_string())
    })?;

    if app.store.account_by_email(&input.user_email).is_none() {
        return Err(AppError::Referential(format!(
            "No account with email {}",
            input.user_email
        )));
    }
    if app.store.department_by_id(input.dept_id).is_none() {
        return Err(AppError::Referential(format!(
            "No department with id {}",
            input.dept_id
        )));
    }

    Ok(hire_date)
}

pub fn create(app: &mut App, input: EmployeeInput) -> AppResult<()> {
    if !can_manage_employees(app) {
        return Err(AppError::Forbidden);
    }

    let hire_date = check_input(app, &input)?;

    if app.store.employee_by_id(&input.employee_id).is_some() {
        return Err(AppError::Conflict(
            "An employee with this id already exists".to_string(),
        ));
    }

    app.store.employees.push(Employee {
        employee_id: input.employee_id.clone(),
        user_email: input.user_email,
        position: input.position,
        dept_id: input.dept_id,
        hire_date,
    });
    app.commit(&[DataKind::Employees])?;

    tracing::info!("Employee created: {}", input.employee_id);
    Ok(())
}

/// Update the employee keyed by `input.employee_id`
pub fn update(app: &mut App, input: EmployeeInput) -> AppResult<()> {
    if !can_manage_employees(app) {
        return Err(AppError::Forbidden);
    }

    let hire_date = check_input(app, &input)?;

    {
        let Some(employee) = app.store.employee_by_id_mut(&input.employee_id) else {
            return Err(AppError::NotFound(format!(
                "No employee with id {}",
                input.employee_id
            )));
        };
        employee.user_email = input.user_email;
        employee.position = input.position;
        employee.dept_id = input.dept_id;
        employee.hire_date = hire_date;
    }
    app.commit(&[DataKind::Employees])?;
    Ok(())
}

pub fn delete(app: &mut App, employee_id: &str) -> AppResult<()> {
    if !can_manage_employees(app) {
        return Err(AppError::Forbidden);
    }

    if app.store.employee_by_id(employee_id).is_none() {
        return Err(AppError::NotFound(format!(
            "No employee with id {}",
            employee_id
        )));
    }

    app.store.employees.retain(|e| e.employee_id != employee_id);
    app.commit(&[DataKind::Employees])?;

    tracing::info!("Employee deleted: {}", employee_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStorage;

    fn admin_app() -> App {
        let mut app = App::with_storage(Config::default(), Box::new(MemoryStorage::new()));
        app.login("admin@staffdesk.local", "admin1234").unwrap();
        app
    }

    fn employee_input() -> EmployeeInput {
        EmployeeInput {
            employee_id: "E-100".to_string(),
            user_email: "admin@staffdesk.local".to_string(),
            position: "Engineer".to_string(),
            dept_id: 1,
            hire_date: "2026-01-15".to_string(),
        }
    }

    #[test]
    fn test_create_and_duplicate_id() {
        let mut app = admin_app();
        create(&mut app, employee_input()).unwrap();
        assert_eq!(list(&app).len(), 1);

        let err = create(&mut app, employee_input()).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(list(&app).len(), 1);
    }

    #[test]
    fn test_unknown_account_is_referential_error() {
        let mut app = admin_app();
        let mut input = employee_input();
        input.user_email = "ghost@x.com".to_string();
        let err = create(&mut app, input).unwrap_err();
        assert!(matches!(err, AppError::Referential(_)));
        assert!(app.store.employees.is_empty());
    }

    #[test]
    fn test_unknown_department_is_referential_error() {
        let mut app = admin_app();
        let mut input = employee_input();
        input.dept_id = 99;
        let err = create(&mut app, input).unwrap_err();
        assert!(matches!(err, AppError::Referential(_)));
    }

    #[test]
    fn test_bad_hire_date_is_validation_error() {
        let mut app = admin_app();
        for bad in ["2026-13-40", "15/01/2026", "soon"] {
            let mut input = employee_input();
            input.hire_date = bad.to_string();
            let err = create(&mut app, input).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn test_update_and_delete() {
        let mut app = admin_app();
        create(&mut app, employee_input()).unwrap();

        let mut input = employee_input();
        input.position = "Staff Engineer".to_string();
        input.dept_id = 2;
        update(&mut app, input).unwrap();
        let employee = app.store.employee_by_id("E-100").unwrap();
        assert_eq!(employee.position, "Staff Engineer");
        assert_eq!(employee.dept_id, 2);

        delete(&mut app, "E-100").unwrap();
        assert!(app.store.employees.is_empty());
        assert!(matches!(
            delete(&mut app, "E-100"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_requires_admin() {
        let mut app = App::with_storage(Config::default(), Box::new(MemoryStorage::new()));
        let err = create(&mut app, employee_input()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
