//! Persisted store
//!
//! The whole application data set is one JSON document kept under a single
//! versioned storage key. It is loaded once at startup and rewritten in full
//! after every mutation; there are no partial updates. An absent or
//! unparsable document is replaced by the seed document: recovery destroys
//! prior data by policy, there is no partial repair.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use crate::entity::{Account, Department, Employee, Request, Role};
use crate::error::AppResult;

/// Storage key for the persisted document. The version suffix is part of the
/// key: a future incompatible document shape gets a new key, not a migration.
pub const STORE_KEY: &str = "staffdesk_store_v1";

/// Storage key for the session token (the logged-in account's email)
pub const TOKEN_KEY: &str = "staffdesk_auth_token";

/// Flat keyed string storage, the durability boundary of the system.
///
/// Implementations must make `write` durable before returning so that a
/// process restart after any completed call observes the written value.
pub trait StorageBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// One file per key under the configured data directory
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-memory storage for tests and embedding.
///
/// Clones share the same underlying map, so a second `MemoryStorage` handle
/// simulates reopening the storage after a restart.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// The full persisted application data set
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub accounts: Vec<Account>,
    pub departments: Vec<Department>,
    pub employees: Vec<Employee>,
    pub requests: Vec<Request>,
}

impl Store {
    /// The fixed default data set used on first run or after corruption
    pub fn seed() -> Self {
        Self {
            accounts: vec![Account {
                first_name: "System".to_string(),
                last_name: "Administrator".to_string(),
                email: "admin@staffdesk.local".to_string(),
                password: "admin1234".to_string(),
                role: Role::Admin,
                verified: true,
            }],
            departments: vec![
                Department {
                    id: 1,
                    name: "Engineering".to_string(),
                    description: "Product development and platform maintenance".to_string(),
                },
                Department {
                    id: 2,
                    name: "Human Resources".to_string(),
                    description: "Hiring, onboarding and staff welfare".to_string(),
                },
                Department {
                    id: 3,
                    name: "Operations".to_string(),
                    description: "Facilities, logistics and supplies".to_string(),
                },
            ],
            employees: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Load the store, seeding defaults when the stored document is absent
    /// or does not parse. The seed is persisted immediately so a reload
    /// observes the same data set.
    pub fn load(backend: &mut dyn StorageBackend) -> Self {
        match backend.read(STORE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Store>(&raw) {
                Ok(store) => return store,
                Err(e) => {
                    tracing::warn!("Stored document is corrupt, replacing with seed: {}", e);
                }
            },
            Ok(None) => {
                tracing::info!("No stored document found, seeding defaults");
            }
            Err(e) => {
                tracing::warn!("Could not read stored document, replacing with seed: {}", e);
            }
        }

        let seed = Store::seed();
        if let Err(e) = seed.save(backend) {
            tracing::error!("Failed to persist seed document: {}", e);
        }
        seed
    }

    /// Serialize the whole store and overwrite the stored document.
    /// Completes before returning; callers rely on that for durability.
    pub fn save(&self, backend: &mut dyn StorageBackend) -> AppResult<()> {
        let raw = serde_json::to_string_pretty(self)?;
        backend.write(STORE_KEY, &raw)?;
        Ok(())
    }

    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.email == email)
    }

    pub fn account_by_email_mut(&mut self, email: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.email == email)
    }

    pub fn department_by_id(&self, id: u32) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn department_by_id_mut(&mut self, id: u32) -> Option<&mut Department> {
        self.departments.iter_mut().find(|d| d.id == id)
    }

    pub fn employee_by_id(&self, employee_id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.employee_id == employee_id)
    }

    pub fn employee_by_id_mut(&mut self, employee_id: &str) -> Option<&mut Employee> {
        self.employees
            .iter_mut()
            .find(|e| e.employee_id == employee_id)
    }

    /// Next department id: max existing + 1, starting at 1
    pub fn next_department_id(&self) -> u32 {
        self.departments.iter().map(|d| d.id).max().unwrap_or(0) + 1
    }

    /// Whether any employee still references the department
    pub fn department_in_use(&self, id: u32) -> bool {
        self.employees.iter().any(|e| e.dept_id == id)
    }
}
