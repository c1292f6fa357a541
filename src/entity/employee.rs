//! Employee entity
//!
//! Links an account to a department. Both references are checked when an
//! employee record is written, not continuously.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique key, externally supplied (badge number or similar)
    pub employee_id: String,

    /// Must reference an existing account
    pub user_email: String,

    pub position: String,

    /// Must reference an existing department
    pub dept_id: u32,

    pub hire_date: NaiveDate,
}
