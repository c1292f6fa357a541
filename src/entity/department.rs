//! Department entity

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Unique, monotonically assigned (max existing + 1)
    pub id: u32,

    pub name: String,

    pub description: String,
}
