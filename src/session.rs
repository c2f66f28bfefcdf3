// Interactive text menu. Raw input is parsed and checked here; the service
// only sees positive amounts and accounts found by number.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::application::{AccountService, LedgerError};
use crate::audit::AuditLog;
use crate::domain::{
    format_amount, parse_amount, percent_interest, requested_amount, Account, AccountType, Money,
};
use crate::storage::AccountStore;

const MENU: &str = "\
Welcome to bankops! Choose an option:
1. Open account
2. View balance
3. Deposit
4. Withdraw
5. Transfer between accounts
6. Calculate interest
7. List accounts
9. Exit";

/// What the loop should do after handling one choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Session<'a, R, W, S: AccountStore, L: AuditLog> {
    service: &'a mut AccountService<S, L>,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write, S: AccountStore, L: AuditLog> Session<'a, R, W, S, L> {
    pub fn new(service: &'a mut AccountService<S, L>, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Show the menu and dispatch choices until "9" or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            self.output.flush()?;

            let Some(choice) = self.read_line()? else {
                return Ok(());
            };

            if self.dispatch(choice.trim())? == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, choice: &str) -> Result<Flow> {
        match choice {
            "1" => self.open_account()?,
            "2" => self.with_account(Self::view_balance)?,
            "3" => self.with_account(Self::deposit)?,
            "4" => self.with_account(Self::withdraw)?,
            "5" => self.with_accounts(Self::transfer)?,
            "6" => self.with_account(Self::calculate_interest)?,
            "7" => self.list_accounts()?,
            "9" => {
                writeln!(self.output, "Thank you for using bankops!")?;
                return Ok(Flow::Exit);
            }
            _ => writeln!(self.output, "Invalid option, please try again.")?,
        }
        Ok(Flow::Continue)
    }

    // ========================
    // Menu actions
    // ========================

    fn open_account(&mut self) -> Result<()> {
        let number = self.prompt("Enter the account number: ")?;
        if number.is_empty() {
            writeln!(self.output, "Invalid account number.")?;
            return Ok(());
        }

        let Ok(initial_balance) = parse_amount(&self.prompt("Enter the initial balance: ")?)
        else {
            writeln!(self.output, "Invalid amount.")?;
            return Ok(());
        };

        let type_input = self.prompt("Enter the account type (checking/savings) [checking]: ")?;
        let account_type = if type_input.is_empty() {
            AccountType::Checking
        } else {
            match AccountType::from_str(&type_input) {
                Some(account_type) => account_type,
                None => {
                    writeln!(self.output, "Invalid account type.")?;
                    return Ok(());
                }
            }
        };

        match self
            .service
            .open_account(number, initial_balance, account_type)
        {
            Ok(account) => writeln!(
                self.output,
                "Account {} created with balance {}.",
                account.number,
                format_amount(account.balance)
            )?,
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn view_balance(&mut self, account: Account) -> Result<()> {
        let balance = self.service.get_balance(&account);
        writeln!(
            self.output,
            "Current balance of account {}: {}",
            account.number,
            format_amount(balance)
        )?;
        Ok(())
    }

    fn deposit(&mut self, mut account: Account) -> Result<()> {
        let Some(amount) = self.prompt_amount("Enter the amount to deposit: ")? else {
            return Ok(());
        };

        let mut applied = None;
        match self
            .service
            .deposit(&mut account, amount, |amount| applied = Some(amount))
        {
            Ok(()) => {
                if let Some(amount) = applied {
                    writeln!(self.output, "Deposited: {}", format_amount(amount))?;
                }
            }
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn withdraw(&mut self, mut account: Account) -> Result<()> {
        let Some(amount) = self.prompt_amount("Enter the amount to withdraw: ")? else {
            return Ok(());
        };

        match self
            .service
            .withdraw(&mut account, amount, &requested_amount(amount))
        {
            Ok(()) => writeln!(self.output, "Withdrawn: {}", format_amount(amount))?,
            Err(LedgerError::InsufficientBalance { .. }) => {
                writeln!(self.output, "Insufficient balance.")?
            }
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn transfer(&mut self, mut from: Account, mut to: Account) -> Result<()> {
        let Some(amount) = self.prompt_amount("Enter the amount to transfer: ")? else {
            return Ok(());
        };

        match self.service.transfer(
            &mut from,
            &mut to,
            amount,
            &requested_amount(amount),
            &|_| true,
        ) {
            Ok(()) => writeln!(
                self.output,
                "Transferred: {} from account {} to {}",
                format_amount(amount),
                from.number,
                to.number
            )?,
            Err(LedgerError::InsufficientBalance { .. }) => writeln!(
                self.output,
                "Transfer failed: insufficient balance."
            )?,
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn calculate_interest(&mut self, account: Account) -> Result<()> {
        let Ok(rate) = parse_amount(&self.prompt("Enter the interest rate (%): ")?) else {
            writeln!(self.output, "Invalid rate.")?;
            return Ok(());
        };

        match self
            .service
            .calculate_interest(&account, percent_interest, rate)
        {
            Ok(interest) => writeln!(self.output, "Interest: {}", format_amount(interest))?,
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn list_accounts(&mut self) -> Result<()> {
        let accounts = self.service.list_accounts();
        if accounts.is_empty() {
            writeln!(self.output, "No accounts found.")?;
            return Ok(());
        }

        for account in accounts {
            writeln!(
                self.output,
                "{} ({}): {}",
                account.number,
                account.account_type,
                format_amount(account.balance)
            )?;
        }
        Ok(())
    }

    // ========================
    // Input helpers
    // ========================

    fn with_account(&mut self, action: fn(&mut Self, Account) -> Result<()>) -> Result<()> {
        let number = self.prompt("Enter the account number: ")?;
        match self.service.find_account(&number) {
            Some(account) => action(self, account),
            None => {
                writeln!(self.output, "Account not found.")?;
                Ok(())
            }
        }
    }

    fn with_accounts(
        &mut self,
        action: fn(&mut Self, Account, Account) -> Result<()>,
    ) -> Result<()> {
        let from_number = self.prompt("Enter the source account number: ")?;
        let Some(from) = self.service.find_account(&from_number) else {
            writeln!(self.output, "Source account not found.")?;
            return Ok(());
        };

        let to_number = self.prompt("Enter the destination account number: ")?;
        let Some(to) = self.service.find_account(&to_number) else {
            writeln!(self.output, "Destination account not found.")?;
            return Ok(());
        };

        action(self, from, to)
    }

    /// Read a strictly positive amount. Anything else prints "Invalid
    /// amount." and yields `None`.
    fn prompt_amount(&mut self, label: &str) -> Result<Option<Money>> {
        match parse_amount(&self.prompt(label)?) {
            Ok(amount) if amount > Money::ZERO => Ok(Some(amount)),
            _ => {
                writeln!(self.output, "Invalid amount.")?;
                Ok(None)
            }
        }
    }

    /// Print `label` and read one trimmed line; end of input reads as "".
    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default().trim().to_string())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
