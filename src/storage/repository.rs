use std::collections::HashMap;

use tracing::{debug, trace};

use crate::domain::{Account, AccountId};

/// The authoritative store of accounts, keyed by identity.
///
/// Lookups hand out copies. A mutation only becomes visible to the rest of
/// the ledger once it goes back through [`AccountStore::update`].
pub trait AccountStore {
    /// Insert keyed by identity. An existing entry with the same id is
    /// replaced.
    fn add(&mut self, account: Account);

    fn get_by_id(&self, id: AccountId) -> Option<Account>;

    /// First account whose number matches. Numbers are unique by convention
    /// only, so with duplicates any one of them may come back.
    fn get_by_account_number(&self, number: &str) -> Option<Account>;

    /// All accounts, in no particular order.
    fn get_all(&self) -> Vec<Account>;

    /// Overwrite the entry at `account.id`, inserting it if absent.
    fn update(&mut self, account: Account);

    /// Delete by identity. Missing accounts are ignored.
    fn remove(&mut self, account: &Account);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory account store. Lives as long as the process; nothing is written
/// anywhere.
#[derive(Debug, Default)]
pub struct AccountRepository {
    accounts: HashMap<AccountId, Account>,
}

impl AccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for AccountRepository {
    fn add(&mut self, account: Account) {
        debug!(id = %account.id, number = %account.number, "adding account");
        self.accounts.insert(account.id, account);
    }

    fn get_by_id(&self, id: AccountId) -> Option<Account> {
        trace!(%id, "fetching account by id");
        self.accounts.get(&id).cloned()
    }

    fn get_by_account_number(&self, number: &str) -> Option<Account> {
        trace!(number, "fetching account by number");
        self.accounts
            .values()
            .find(|account| account.number == number)
            .cloned()
    }

    fn get_all(&self) -> Vec<Account> {
        self.accounts.values().cloned().collect()
    }

    fn update(&mut self, account: Account) {
        debug!(
            id = %account.id,
            number = %account.number,
            balance = %account.balance,
            "updating account"
        );
        self.accounts.insert(account.id, account);
    }

    fn remove(&mut self, account: &Account) {
        if self.accounts.remove(&account.id).is_some() {
            debug!(id = %account.id, number = %account.number, "removed account");
        }
    }

    fn len(&self) -> usize {
        self.accounts.len()
    }
}
