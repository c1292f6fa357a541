//! Department handlers

use crate::entity::Department;
use crate::error::{AppError, AppResult, OptionExt};
use crate::state::App;
use crate::validation;
use crate::view::DataKind;

fn can_manage_departments(app: &App) -> bool {
    app.session.is_admin()
}

#[derive(Debug, Clone)]
pub struct DepartmentInput {
    pub name: String,
    pub description: String,
}

pub fn list(app: &App) -> &[Department] {
    &app.store.departments
}

/// Create a department. Ids are assigned monotonically: max existing + 1.
pub fn create(app: &mut App, input: DepartmentInput) -> AppResult<Department> {
    if !can_manage_departments(app) {
        return Err(AppError::Forbidden);
    }

    validation::validate_name("Department name", &input.name).map_err(AppError::Validation)?;

    let department = Department {
        id: app.store.next_department_id(),
        name: input.name,
        description: input.description,
    };
    app.store.departments.push(department.clone());
    app.commit(&[DataKind::Departments])?;

    tracing::info!("Department created: {} ({})", department.name, department.id);
    Ok(department)
}

pub fn update(app: &mut App, id: u32, input: DepartmentInput) -> AppResult<()> {
    if !can_manage_departments(app) {
        return Err(AppError::Forbidden);
    }

    validation::validate_name("Department name", &input.name).map_err(AppError::Validation)?;

    {
        let department = app
            .store
            .department_by_id_mut(id)
            .ok_or_not_found(format!("No department with id {}", id))?;
        department.name = input.name;
        department.description = input.description;
    }
    app.commit(&[DataKind::Departments])?;
    Ok(())
}

/// Delete a department. Blocked while any employee still references it.
pub fn delete(app: &mut App, id: u32) -> AppResult<()> {
    if !can_manage_departments(app) {
        return Err(AppError::Forbidden);
    }

    if app.store.department_by_id(id).is_none() {
        return Err(AppError::NotFound(format!("No department with id {}", id)));
    }

    if app.store.department_in_use(id) {
        return Err(AppError::Referential(
            "Department is assigned to one or more employees".to_string(),
        ));
    }

    app.store.departments.retain(|d| d.id != id);
    app.commit(&[DataKind::Departments])?;

    tracing::info!("Department deleted: {}", id);
    Ok(())
}
