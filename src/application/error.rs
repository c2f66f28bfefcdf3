use thiserror::Error;

use crate::domain::Money;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// An identity lookup came back empty. `role` names which side of the
    /// operation the account played ("Source", "Destination", "Account").
    #[error("{role} account not found.")]
    AccountNotFound { role: String, number: String },

    #[error("Insufficient balance in account {number}: balance {balance}, required {amount}")]
    InsufficientBalance {
        number: String,
        balance: Money,
        amount: Money,
    },

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("Cannot transfer from account {0} to itself")]
    SameAccount(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount overflow in account {number}")]
    AmountOverflow { number: String },
}

impl LedgerError {
    pub fn not_found(role: impl Into<String>, number: impl Into<String>) -> Self {
        LedgerError::AccountNotFound {
            role: role.into(),
            number: number.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::AccountNotFound { .. })
    }

    pub fn is_insufficient_balance(&self) -> bool {
        matches!(self, LedgerError::InsufficientBalance { .. })
    }
}
