use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Money;

pub type AccountId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "checking" => Some(AccountType::Checking),
            "savings" => Some(AccountType::Savings),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A balance-bearing account.
///
/// `id` is the only key the ledger trusts; `number` is what people type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub number: String,
    pub balance: Money,
    pub account_type: AccountType,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(number: impl Into<String>, balance: Money, account_type: AccountType) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
            balance,
            account_type,
            created_at: Utc::now(),
        }
    }

    /// Add `amount` to the balance. Returns the new balance, or `None` on
    /// overflow, in which case the balance is unchanged.
    pub fn credit(&mut self, amount: Money) -> Option<Money> {
        self.balance = self.balance.checked_add(amount)?;
        Some(self.balance)
    }

    /// Subtract `amount` from the balance. Returns the new balance, or `None`
    /// on overflow, in which case the balance is unchanged.
    ///
    /// No sufficiency check happens here; that is the caller's predicate.
    pub fn debit(&mut self, amount: Money) -> Option<Money> {
        self.balance = self.balance.checked_sub(amount)?;
        Some(self.balance)
    }
}
