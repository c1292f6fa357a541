//! Session state
//!
//! The single current authenticated identity for the running process. The
//! session itself is never persisted; only its token (the account email) is,
//! under a dedicated storage key, and the session is reconstructed from that
//! token at startup.

use crate::entity::Account;
use crate::error::{AppError, AppResult};
use crate::store::{StorageBackend, Store, TOKEN_KEY};

/// Single-slot session: empty, or exactly one account
#[derive(Default)]
pub struct Session {
    current: Option<Account>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Account> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current.as_ref().map_or(false, |a| a.role.is_admin())
    }

    pub fn email(&self) -> Option<&str> {
        self.current.as_ref().map(|a| a.email.as_str())
    }

    /// Reconstruct the session from the stored token. Runs once at startup,
    /// after the store has been loaded. An absent or stale token leaves the
    /// session empty; a stale token is also removed from storage.
    pub fn resolve_from_token(&mut self, store: &Store, backend: &mut dyn StorageBackend) {
        let token = match backend.read(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Could not read session token: {}", e);
                return;
            }
        };

        let Some(email) = token else {
            return;
        };

        match store.account_by_email(&email) {
            Some(account) => {
                tracing::info!("Session restored for {}", email);
                self.current = Some(account.clone());
            }
            None => {
                tracing::warn!("Stale session token for {}, discarding", email);
                if let Err(e) = backend.remove(TOKEN_KEY) {
                    tracing::error!("Failed to remove stale session token: {}", e);
                }
            }
        }
    }

    /// Log in. Succeeds only for a verified account with matching email and
    /// password; every failure is the same uniform error so callers cannot
    /// tell a wrong password from an unverified account.
    pub fn login(
        &mut self,
        store: &Store,
        backend: &mut dyn StorageBackend,
        email: &str,
        password: &str,
    ) -> AppResult<Account> {
        let account = match store.account_by_email(email) {
            Some(a) if a.password == password && a.verified => a.clone(),
            _ => {
                tracing::warn!("Login failed for {}", email);
                return Err(AppError::InvalidCredentials);
            }
        };

        backend.write(TOKEN_KEY, &account.email)?;
        tracing::info!("User logged in: {}", account.email);
        self.current = Some(account.clone());
        Ok(account)
    }

    /// Log out. Unconditionally succeeds; a token removal failure is logged
    /// and the in-memory session is cleared regardless.
    pub fn logout(&mut self, backend: &mut dyn StorageBackend) {
        if let Some(email) = self.email() {
            tracing::info!("User logged out: {}", email);
        }
        self.current = None;
        if let Err(e) = backend.remove(TOKEN_KEY) {
            tracing::error!("Failed to remove session token: {}", e);
        }
    }

    /// Re-derive the session identity from the store after an account
    /// mutation. Clears the session if the account no longer exists.
    pub fn refresh_identity(&mut self, store: &Store) {
        if let Some(email) = self.email().map(str::to_string) {
            self.current = store.account_by_email(&email).cloned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Role;
    use crate::store::MemoryStorage;

    fn store_with_user(verified: bool) -> Store {
        let mut store = Store::seed();
        store.accounts.push(Account {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "a@x.com".to_string(),
            password: "pw1234".to_string(),
            role: Role::User,
            verified,
        });
        store
    }

    #[test]
    fn test_login_sets_session_and_token() {
        let store = store_with_user(true);
        let mut backend = MemoryStorage::new();
        let mut session = Session::new();

        let account = session
            .login(&store, &mut backend, "a@x.com", "pw1234")
            .unwrap();
        assert_eq!(account.role, Role::User);
        assert_eq!(session.email(), Some("a@x.com"));
        assert!(!session.is_admin());
        assert_eq!(backend.read(TOKEN_KEY).unwrap().as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_login_failures_are_uniform() {
        let store = store_with_user(false);
        let mut backend = MemoryStorage::new();
        let mut session = Session::new();

        // Correct password but unverified
        let unverified = session
            .login(&store, &mut backend, "a@x.com", "pw1234")
            .unwrap_err();
        // Wrong password
        let wrong_password = session
            .login(&store, &mut backend, "a@x.com", "nope")
            .unwrap_err();
        // Unknown account
        let unknown = session
            .login(&store, &mut backend, "b@x.com", "pw1234")
            .unwrap_err();

        for err in [&unverified, &wrong_password, &unknown] {
            assert!(matches!(err, AppError::InvalidCredentials));
        }
        assert_eq!(unverified.user_message(), wrong_password.user_message());
        assert_eq!(wrong_password.user_message(), unknown.user_message());

        // Session and token untouched
        assert!(!session.is_authenticated());
        assert!(backend.read(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_logout_clears_session_and_token() {
        let store = store_with_user(true);
        let mut backend = MemoryStorage::new();
        let mut session = Session::new();

        session
            .login(&store, &mut backend, "a@x.com", "pw1234")
            .unwrap();
        session.logout(&mut backend);

        assert!(!session.is_authenticated());
        assert!(backend.read(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_resolve_from_token() {
        let store = store_with_user(true);
        let mut backend = MemoryStorage::new();
        backend.write(TOKEN_KEY, "a@x.com").unwrap();

        let mut session = Session::new();
        session.resolve_from_token(&store, &mut backend);
        assert_eq!(session.email(), Some("a@x.com"));
    }

    #[test]
    fn test_resolve_stale_token_discards_it() {
        let store = Store::seed();
        let mut backend = MemoryStorage::new();
        backend.write(TOKEN_KEY, "gone@x.com").unwrap();

        let mut session = Session::new();
        session.resolve_from_token(&store, &mut backend);

        assert!(!session.is_authenticated());
        assert!(backend.read(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_resolve_absent_token_leaves_session_empty() {
        let store = Store::seed();
        let mut backend = MemoryStorage::new();

        let mut session = Session::new();
        session.resolve_from_token(&store, &mut backend);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_refresh_identity_follows_store() {
        let mut store = store_with_user(true);
        let mut backend = MemoryStorage::new();
        let mut session = Session::new();
        session
            .login(&store, &mut backend, "a@x.com", "pw1234")
            .unwrap();

        store.account_by_email_mut("a@x.com").unwrap().first_name = "Augusta".to_string();
        session.refresh_identity(&store);
        assert_eq!(session.current().unwrap().first_name, "Augusta");

        store.accounts.retain(|a| a.email != "a@x.com");
        session.refresh_identity(&store);
        assert!(!session.is_authenticated());
    }
}
