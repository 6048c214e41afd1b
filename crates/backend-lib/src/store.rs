// ============================
// crates/backend-lib/src/store.rs
// ============================
//! In-memory credential store.
//!
//! Accounts are keyed by normalized email. Registration goes through the
//! map's entry API so the uniqueness check and the insert are a single
//! critical section per email key; two concurrent registrations for the
//! same address cannot both succeed.

use dashmap::{mapref::entry::Entry, DashMap};
use thiserror::Error;
use uuid::Uuid;

/// A registered account. Created on register, never mutated.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

/// Registration failed because the email is already taken.
#[derive(Debug, Error)]
#[error("account already exists")]
pub struct DuplicateEmail;

/// Owns all registered accounts. Constructed once at process start and
/// injected into the handlers; tests build fresh instances for isolation.
#[derive(Debug, Default)]
pub struct CredentialStore {
    accounts: DashMap<String, Account>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account under `email` (must be pre-normalized by the
    /// caller). Atomic per email key.
    pub fn register(&self, email: &str, password_hash: &str) -> Result<Account, DuplicateEmail> {
        match self.accounts.entry(email.to_string()) {
            Entry::Occupied(_) => Err(DuplicateEmail),
            Entry::Vacant(slot) => {
                let account = Account {
                    id: Uuid::new_v4().to_string(),
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                };
                slot.insert(account.clone());
                Ok(account)
            },
        }
    }

    /// Look up an account by normalized email.
    pub fn find_by_email(&self, email: &str) -> Option<Account> {
        self.accounts.get(email).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
