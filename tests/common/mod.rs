// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use bankops::application::AccountService;
use bankops::audit::MemoryAuditLog;
use bankops::domain::{Account, AccountType, Money};
use bankops::storage::AccountRepository;

pub type TestService = AccountService<AccountRepository, MemoryAuditLog>;

/// Helper to create a service over an empty store with a captured audit log
pub fn test_service() -> TestService {
    AccountService::new(AccountRepository::new(), MemoryAuditLog::new())
}

/// Test fixture: Standard account setup
pub struct StandardAccounts;

impl StandardAccounts {
    /// Open "123456" (checking) and "999" (savings) with the given balances
    pub fn create_pair(service: &mut TestService, first: Money, second: Money) -> (Account, Account) {
        let main = service
            .open_account("123456", first, AccountType::Checking)
            .expect("open 123456");
        let other = service
            .open_account("999", second, AccountType::Savings)
            .expect("open 999");
        service.audit_log().clear();
        (main, other)
    }
}
