use tracing::debug;

use crate::audit::{AuditLog, ConsoleAuditLog};
use crate::domain::{format_amount, Account, AccountType, BalancePredicate, Money};
use crate::storage::{AccountRepository, AccountStore};

use super::{deposit_funds, withdraw_funds, LedgerError, TransferHelper};

/// Application service providing the ledger operations.
/// This is the primary interface for any client (menu, tests, embedders).
///
/// The service owns the account store and the audit log; build one per
/// process and hand out references to it.
pub struct AccountService<S: AccountStore = AccountRepository, L: AuditLog = ConsoleAuditLog> {
    store: S,
    log: L,
}

impl AccountService {
    /// In-memory store, audit lines on stdout.
    pub fn in_memory() -> Self {
        Self::new(AccountRepository::new(), ConsoleAuditLog::new())
    }
}

impl<S: AccountStore, L: AuditLog> AccountService<S, L> {
    pub fn new(store: S, log: L) -> Self {
        Self { store, log }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audit_log(&self) -> &L {
        &self.log
    }

    // ========================
    // Account operations
    // ========================

    /// Open a new account with a starting balance.
    pub fn open_account(
        &mut self,
        number: impl Into<String>,
        initial_balance: Money,
        account_type: AccountType,
    ) -> Result<Account, LedgerError> {
        let number = number.into();

        if initial_balance < Money::ZERO {
            return Err(LedgerError::InvalidAmount(format!(
                "initial balance cannot be negative: {}",
                initial_balance
            )));
        }

        // The store accepts duplicate numbers; the ledger does not.
        if self.store.get_by_account_number(&number).is_some() {
            return Err(LedgerError::AccountAlreadyExists(number));
        }

        let account = Account::new(number, initial_balance, account_type);
        self.store.add(account.clone());

        self.log.log(&format!(
            "Opened account {} ({}) with balance {}.",
            account.number,
            account.account_type,
            format_amount(account.balance)
        ));
        Ok(account)
    }

    /// Look an account up by its number.
    pub fn find_account(&self, number: &str) -> Option<Account> {
        self.store.get_by_account_number(number)
    }

    /// All accounts, sorted by number.
    pub fn list_accounts(&self) -> Vec<Account> {
        let mut accounts = self.store.get_all();
        accounts.sort_by(|a, b| a.number.cmp(&b.number));
        accounts
    }

    /// Current stored state of `account`. Every mutating operation starts
    /// here so it never acts on a stale copy.
    pub fn reload(&self, account: &Account) -> Result<Account, LedgerError> {
        match self.store.get_by_id(account.id) {
            Some(current) => Ok(current),
            None => {
                self.log
                    .log(&format!("Account {} not found.", account.number));
                Err(LedgerError::not_found("Account", account.number.clone()))
            }
        }
    }

    // ========================
    // Balance operations
    // ========================

    /// Add `amount` to the account and notify `on_applied` once it is stored.
    ///
    /// The amount is not validated here; callers parse and check raw input.
    pub fn deposit<F>(
        &mut self,
        account: &mut Account,
        amount: Money,
        on_applied: F,
    ) -> Result<(), LedgerError>
    where
        F: FnOnce(Money),
    {
        let mut current = self.reload(account)?;
        deposit_funds(&mut current, amount)?;
        self.store.update(current.clone());

        self.log.log(&format!(
            "Deposited {} into account {}. New balance: {}.",
            format_amount(amount),
            current.number,
            format_amount(current.balance)
        ));

        *account = current;
        on_applied(amount);
        Ok(())
    }

    /// Take `amount` out of the account if `allow` accepts its balance.
    pub fn withdraw(
        &mut self,
        account: &mut Account,
        amount: Money,
        allow: BalancePredicate,
    ) -> Result<(), LedgerError> {
        let mut current = self.reload(account)?;

        if !allow(current.balance) {
            self.log.log(&format!(
                "Failed to withdraw {} from account {}: insufficient balance.",
                format_amount(amount),
                current.number
            ));
            let balance = current.balance;
            *account = current;
            return Err(LedgerError::InsufficientBalance {
                number: account.number.clone(),
                balance,
                amount,
            });
        }

        withdraw_funds(&mut current, amount)?;
        self.store.update(current.clone());

        self.log.log(&format!(
            "Withdraw: {} from account {}. New balance: {}.",
            format_amount(amount),
            current.number,
            format_amount(current.balance)
        ));

        *account = current;
        Ok(())
    }

    /// Move `amount` from one account to another.
    ///
    /// `from_allowed` is checked against the source balance and `to_allowed`
    /// against the destination balance; both must hold. On success both
    /// caller copies are refreshed from the store.
    pub fn transfer(
        &mut self,
        from: &mut Account,
        to: &mut Account,
        amount: Money,
        from_allowed: BalancePredicate,
        to_allowed: BalancePredicate,
    ) -> Result<(), LedgerError> {
        if from.id == to.id {
            return Err(LedgerError::SameAccount(from.number.clone()));
        }

        let mut helper = TransferHelper::new(&mut self.store, &self.log);

        let mut source = helper.get_valid_account(from, "Source")?;
        let mut destination = helper.get_valid_account(to, "Destination")?;

        let accept_any = |_: Money| true;
        for (account, allowed) in [(&source, from_allowed), (&destination, to_allowed)] {
            if !helper.has_sufficient_balance(account, amount, allowed, &accept_any) {
                return Err(LedgerError::InsufficientBalance {
                    number: account.number.clone(),
                    balance: account.balance,
                    amount,
                });
            }
        }

        helper.execute_transfer(
            &mut source,
            &mut destination,
            amount,
            withdraw_funds,
            deposit_funds,
        )?;
        debug!(from = %source.number, to = %destination.number, %amount, "transfer applied");

        *from = source;
        *to = destination;
        Ok(())
    }

    // ========================
    // Queries
    // ========================

    /// Apply `formula` to the stored balance and report the result. The
    /// balance is not touched.
    pub fn calculate_interest<F>(
        &self,
        account: &Account,
        formula: F,
        rate: Money,
    ) -> Result<Money, LedgerError>
    where
        F: Fn(Money, Money) -> Option<Money>,
    {
        let current = self.reload(account)?;

        let Some(interest) = formula(current.balance, rate) else {
            self.log.log(&format!(
                "Failed to calculate interest for account {} at rate {}: overflow.",
                current.number, rate
            ));
            return Err(LedgerError::AmountOverflow {
                number: current.number,
            });
        };

        self.log.log(&format!(
            "Calculated interest {} for account {} at rate {}.",
            format_amount(interest),
            current.number,
            rate
        ));
        Ok(interest)
    }

    /// Stored balance of `account`, or zero if the store does not know it.
    pub fn get_balance(&self, account: &Account) -> Money {
        match self.store.get_by_id(account.id) {
            Some(current) => {
                self.log.log(&format!(
                    "Checked balance for account {}: {}.",
                    current.number,
                    format_amount(current.balance)
                ));
                current.balance
            }
            None => {
                self.log
                    .log(&format!("Account {} not found.", account.number));
                Money::ZERO
            }
        }
    }
}
