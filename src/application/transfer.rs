use crate::audit::AuditLog;
use crate::domain::{format_amount, Account, BalancePredicate, Money};
use crate::storage::AccountStore;

use super::LedgerError;

/// Remove `amount` from `account`, as a transfer or withdraw step.
pub fn withdraw_funds(account: &mut Account, amount: Money) -> Result<(), LedgerError> {
    match account.debit(amount) {
        Some(_) => Ok(()),
        None => Err(LedgerError::AmountOverflow {
            number: account.number.clone(),
        }),
    }
}

/// Add `amount` to `account`, as a transfer or deposit step.
pub fn deposit_funds(account: &mut Account, amount: Money) -> Result<(), LedgerError> {
    match account.credit(amount) {
        Some(_) => Ok(()),
        None => Err(LedgerError::AmountOverflow {
            number: account.number.clone(),
        }),
    }
}

/// The two-account transfer protocol: reload, check, mutate, persist, log.
///
/// Borrows the store and the audit log from whoever owns them for the length
/// of one transfer.
pub struct TransferHelper<'a, S: AccountStore + ?Sized, L: AuditLog + ?Sized> {
    store: &'a mut S,
    log: &'a L,
}

impl<'a, S: AccountStore + ?Sized, L: AuditLog + ?Sized> TransferHelper<'a, S, L> {
    pub fn new(store: &'a mut S, log: &'a L) -> Self {
        Self { store, log }
    }

    /// Fetch the stored state of `account` by identity.
    ///
    /// The copy passed in may be older than what the store holds; only the
    /// returned value should be trusted for balance decisions.
    pub fn get_valid_account(&self, account: &Account, role: &str) -> Result<Account, LedgerError> {
        match self.store.get_by_id(account.id) {
            Some(current) => Ok(current),
            None => {
                self.log.log(&format!(
                    "{} account {} not found.",
                    role, account.number
                ));
                Err(LedgerError::not_found(role, account.number.clone()))
            }
        }
    }

    /// Both predicates must accept `account.balance`. Only a rejection is
    /// logged.
    pub fn has_sufficient_balance(
        &self,
        account: &Account,
        amount: Money,
        can_withdraw: BalancePredicate,
        can_transfer: BalancePredicate,
    ) -> bool {
        if can_withdraw(account.balance) && can_transfer(account.balance) {
            return true;
        }

        self.log.log(&format!(
            "Insufficient balance in account {} ({}) for transfer of {}.",
            account.number,
            format_amount(account.balance),
            format_amount(amount)
        ));
        false
    }

    /// Apply `withdraw` to `from` and `deposit` to `to`, then persist both and
    /// log the transfer.
    ///
    /// If either step fails the error is returned as-is: nothing is persisted
    /// and nothing is logged. `from` may already carry the withdrawal at that
    /// point; the store does not.
    pub fn execute_transfer<W, D>(
        &mut self,
        from: &mut Account,
        to: &mut Account,
        amount: Money,
        withdraw: W,
        deposit: D,
    ) -> Result<(), LedgerError>
    where
        W: FnOnce(&mut Account, Money) -> Result<(), LedgerError>,
        D: FnOnce(&mut Account, Money) -> Result<(), LedgerError>,
    {
        withdraw(from, amount)?;
        deposit(to, amount)?;

        self.store.update(from.clone());
        self.store.update(to.clone());

        self.log.log(&format!(
            "Transferred {} from account {} to account {}.",
            format_amount(amount),
            from.number,
            to.number
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::audit::MemoryAuditLog;
    use crate::domain::AccountType;
    use crate::storage::AccountRepository;

    fn setup() -> (AccountRepository, MemoryAuditLog) {
        (AccountRepository::new(), MemoryAuditLog::new())
    }

    #[test]
    fn test_get_valid_account_returns_stored_state() {
        let (mut repo, log) = setup();
        let stale = Account::new("123", dec!(1000), AccountType::Checking);
        let mut stored = stale.clone();
        stored.balance = dec!(600);
        repo.add(stored.clone());

        let helper = TransferHelper::new(&mut repo, &log);
        let result = helper.get_valid_account(&stale, "Source").unwrap();

        assert_eq!(result, stored);
        assert!(log.is_empty());
    }

    #[test]
    fn test_get_valid_account_missing_logs_and_fails() {
        let (mut repo, log) = setup();
        let account = Account::new("123", dec!(1000), AccountType::Checking);

        let helper = TransferHelper::new(&mut repo, &log);
        let err = helper.get_valid_account(&account, "Source").unwrap_err();

        assert_eq!(err.to_string(), "Source account not found.");
        assert_eq!(log.lines(), vec!["Source account 123 not found."]);
    }

    #[test]
    fn test_has_sufficient_balance_truth_table() {
        let cases = [
            (true, true, true),
            (false, true, false),
            (true, false, false),
            (false, false, false),
        ];

        for (can_withdraw, can_transfer, expected) in cases {
            let (mut repo, log) = setup();
            let account = Account::new("123", dec!(500), AccountType::Checking);
            let helper = TransferHelper::new(&mut repo, &log);

            let result = helper.has_sufficient_balance(
                &account,
                dec!(200),
                &|_| can_withdraw,
                &|_| can_transfer,
            );

            assert_eq!(result, expected);
            if expected {
                assert!(log.is_empty());
            } else {
                assert_eq!(
                    log.lines(),
                    vec!["Insufficient balance in account 123 (500.00) for transfer of 200.00."]
                );
            }
        }
    }

    #[test]
    fn test_execute_transfer_mutates_persists_and_logs() {
        let (mut repo, log) = setup();
        let mut from = Account::new("from123", dec!(500), AccountType::Checking);
        let mut to = Account::new("to456", dec!(300), AccountType::Savings);

        let mut helper = TransferHelper::new(&mut repo, &log);
        helper
            .execute_transfer(&mut from, &mut to, dec!(200), withdraw_funds, deposit_funds)
            .unwrap();

        assert_eq!(from.balance, dec!(300));
        assert_eq!(to.balance, dec!(500));
        assert_eq!(repo.get_by_id(from.id), Some(from.clone()));
        assert_eq!(repo.get_by_id(to.id), Some(to.clone()));
        assert_eq!(
            log.lines(),
            vec!["Transferred 200.00 from account from123 to account to456."]
        );
    }

    #[test]
    fn test_execute_transfer_calls_actions_with_amount() {
        let (mut repo, log) = setup();
        let mut from = Account::new("a", dec!(10), AccountType::Checking);
        let mut to = Account::new("b", dec!(10), AccountType::Checking);
        let seen = RefCell::new(Vec::new());

        let mut helper = TransferHelper::new(&mut repo, &log);
        helper
            .execute_transfer(
                &mut from,
                &mut to,
                dec!(7),
                |account, amount| {
                    seen.borrow_mut().push(("withdraw", account.number.clone(), amount));
                    Ok(())
                },
                |account, amount| {
                    seen.borrow_mut().push(("deposit", account.number.clone(), amount));
                    Ok(())
                },
            )
            .unwrap();

        assert_eq!(
            seen.into_inner(),
            vec![
                ("withdraw", "a".to_string(), dec!(7)),
                ("deposit", "b".to_string(), dec!(7)),
            ]
        );
    }

    #[test]
    fn test_failed_deposit_persists_and_logs_nothing() {
        let (mut repo, log) = setup();
        let mut from = Account::new("a", dec!(10), AccountType::Checking);
        let mut to = Account::new("b", dec!(10), AccountType::Checking);
        repo.add(from.clone());
        repo.add(to.clone());

        let mut helper = TransferHelper::new(&mut repo, &log);
        let err = helper
            .execute_transfer(&mut from, &mut to, dec!(5), withdraw_funds, |account, _| {
                Err(LedgerError::AmountOverflow {
                    number: account.number.clone(),
                })
            })
            .unwrap_err();

        assert!(matches!(err, LedgerError::AmountOverflow { .. }));
        assert_eq!(repo.get_by_id(from.id).unwrap().balance, dec!(10));
        assert_eq!(repo.get_by_id(to.id).unwrap().balance, dec!(10));
        assert!(log.is_empty());
    }
}
