use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::AccountService;
use crate::audit::AuditLog;
use crate::domain::{format_amount, Account};
use crate::storage::AccountStore;

/// Point-in-time copy of every account, for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub accounts: Vec<Account>,
}

/// Output format for [`Exporter::export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// Writes the current ledger state out. Read-only: nothing here is ever
/// loaded back.
pub struct Exporter<'a, S: AccountStore, L: AuditLog> {
    service: &'a AccountService<S, L>,
}

impl<'a, S: AccountStore, L: AuditLog> Exporter<'a, S, L> {
    pub fn new(service: &'a AccountService<S, L>) -> Self {
        Self { service }
    }

    /// Export in `format`, returning the number of accounts written.
    pub fn export<W: Write>(&self, format: ExportFormat, writer: W) -> Result<usize> {
        match format {
            ExportFormat::Csv => self.export_accounts_csv(writer),
            ExportFormat::Json => Ok(self.export_accounts_json(writer)?.accounts.len()),
        }
    }

    /// Export accounts to CSV format, sorted by number.
    pub fn export_accounts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "number", "type", "balance", "created_at"])?;

        let mut count = 0;
        for account in &accounts {
            csv_writer.write_record([
                account.id.to_string(),
                account.number.clone(),
                account.account_type.as_str().to_string(),
                format_amount(account.balance),
                account.created_at.to_rfc3339(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export accounts as a pretty-printed JSON snapshot.
    pub fn export_accounts_json<W: Write>(&self, mut writer: W) -> Result<AccountsSnapshot> {
        let snapshot = AccountsSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            accounts: self.service.list_accounts(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::audit::MemoryAuditLog;
    use crate::domain::AccountType;
    use crate::storage::AccountRepository;

    fn service_with_accounts() -> AccountService<AccountRepository, MemoryAuditLog> {
        let mut service = AccountService::new(AccountRepository::new(), MemoryAuditLog::new());
        service
            .open_account("999", dec!(0), AccountType::Savings)
            .unwrap();
        service
            .open_account("123456", dec!(1500.5), AccountType::Checking)
            .unwrap();
        service
    }

    #[test]
    fn test_export_accounts_csv() {
        let service = service_with_accounts();
        let mut out = Vec::new();

        let count = Exporter::new(&service).export_accounts_csv(&mut out).unwrap();

        assert_eq!(count, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,number,type,balance,created_at");
        assert!(lines[1].contains(",123456,checking,1500.50,"));
        assert!(lines[2].contains(",999,savings,0.00,"));
    }

    #[test]
    fn test_export_accounts_json() {
        let service = service_with_accounts();
        let mut out = Vec::new();

        let snapshot = Exporter::new(&service).export_accounts_json(&mut out).unwrap();

        assert_eq!(snapshot.accounts.len(), 2);
        let parsed: AccountsSnapshot = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.accounts, snapshot.accounts);
        assert_eq!(parsed.accounts[0].number, "123456");
        assert_eq!(parsed.accounts[0].balance, dec!(1500.5));
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!(ExportFormat::from_str("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_str("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_str("xml"), None);
        assert_eq!(ExportFormat::Json.as_str(), "json");
    }
}
