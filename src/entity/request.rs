//! Supply request entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request lifecycle status
///
/// Requests are created Pending. No transition operation is exposed; the
/// other states exist so stored documents carrying them stay readable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "Pending"),
            RequestStatus::Approved => write!(f, "Approved"),
            RequestStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// One line of a supply request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestItem {
    pub name: String,
    pub qty: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Derived from the creation timestamp
    pub id: i64,

    /// Free-form request category ("Equipment", "Stationery", ...)
    pub kind: String,

    /// Ordered; every qty is > 0
    pub items: Vec<RequestItem>,

    pub status: RequestStatus,

    pub date: DateTime<Utc>,

    /// Owning account email
    pub employee_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(RequestStatus::Pending.to_string(), "Pending");
        assert_eq!(RequestStatus::Rejected.to_string(), "Rejected");
    }

    #[test]
    fn test_request_serde_round_trip() {
        let request = Request {
            id: 1722860000000,
            kind: "Stationery".to_string(),
            items: vec![RequestItem {
                name: "Notebook".to_string(),
                qty: 3,
            }],
            status: RequestStatus::Pending,
            date: "2026-08-05T12:00:00Z".parse().unwrap(),
            employee_email: "a@x.com".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
