//! Pay-per-use credit accounts.
//!
//! Each social-network username owns a count of remaining requests. New
//! accounts start with a free allowance; every ranked login consumes one
//! request and a completed purchase resets the count to the product quantity.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;

/// Remaining requests of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub username: String,
    pub requests_remaining: u32,
}

/// Credit collaborator.
pub trait CreditLedger: Send + Sync {
    fn get(&self, username: &str) -> Option<Account>;
    /// Fetch the account, creating it with the free allowance on first use.
    fn get_or_create(&self, username: &str) -> Account;
    /// Overwrite the remaining requests, creating the account if needed.
    fn set(&self, username: &str, requests_remaining: u32) -> Account;
    /// Consume one request. Saturates at zero; `None` for unknown accounts.
    fn decrement(&self, username: &str) -> Option<Account>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process ledger.
pub struct MemoryLedger {
    accounts: Mutex<HashMap<String, u32>>,
    free_requests: u32,
}

impl MemoryLedger {
    /// A ledger granting `free_requests` to new accounts.
    pub fn new(free_requests: u32) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            free_requests,
        }
    }
}

fn account(username: &str, requests_remaining: u32) -> Account {
    Account {
        username: username.to_string(),
        requests_remaining,
    }
}

impl CreditLedger for MemoryLedger {
    fn get(&self, username: &str) -> Option<Account> {
        self.accounts
            .lock()
            .get(username)
            .map(|&remaining| account(username, remaining))
    }

    fn get_or_create(&self, username: &str) -> Account {
        let mut accounts = self.accounts.lock();
        let remaining = *accounts.entry(username.to_string()).or_insert_with(|| {
            tracing::info!(username, free = self.free_requests, "Created account");
            self.free_requests
        });
        account(username, remaining)
    }

    fn set(&self, username: &str, requests_remaining: u32) -> Account {
        self.accounts
            .lock()
            .insert(username.to_string(), requests_remaining);
        account(username, requests_remaining)
    }

    fn decrement(&self, username: &str) -> Option<Account> {
        let mut accounts = self.accounts.lock();
        let remaining = accounts.get_mut(username)?;
        *remaining = remaining.saturating_sub(1);
        Some(account(username, *remaining))
    }

    fn len(&self) -> usize {
        self.accounts.lock().len()
    }
}
