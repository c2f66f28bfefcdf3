use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::application::AccountService;
use crate::audit::{AuditLog, ConsoleAuditLog};
use crate::io::{ExportFormat, Exporter};
use crate::session::Session;
use crate::storage::{AccountRepository, AccountStore};

/// bankops - in-memory bank account ledger
#[derive(Parser, Debug)]
#[command(name = "bankops")]
#[command(about = "Open accounts, move money between them and compute interest from a text menu")]
#[command(version)]
pub struct Cli {
    /// Enable verbose diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Read menu input from a file instead of stdin
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Write audit lines to a file instead of stdout
    #[arg(long)]
    pub audit_file: Option<PathBuf>,

    /// Export all accounts when the session ends: csv, json
    #[arg(short, long)]
    pub export: Option<String>,

    /// Export destination (stdout if omitted)
    #[arg(long, requires = "export")]
    pub export_output: Option<PathBuf>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        // Reject a bad format before the session starts, not after.
        let export_format = self
            .export
            .as_deref()
            .map(|format| {
                ExportFormat::from_str(format).ok_or_else(|| {
                    anyhow::anyhow!("Invalid export format '{}'. Valid formats: csv, json", format)
                })
            })
            .transpose()?;

        let audit_log = match &self.audit_file {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create audit file: {}", path.display()))?;
                ConsoleAuditLog::with_writer(file)
            }
            None => ConsoleAuditLog::new(),
        };

        let mut service = AccountService::new(AccountRepository::new(), audit_log);

        match &self.script {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open script: {}", path.display()))?;
                info!(script = %path.display(), "running scripted session");
                Session::new(&mut service, BufReader::new(file), io::stdout()).run()?;
            }
            None => {
                let stdin = io::stdin();
                Session::new(&mut service, stdin.lock(), io::stdout()).run()?;
            }
        }

        if let Some(format) = export_format {
            run_export(&service, format, self.export_output.as_ref())?;
        }

        info!(accounts = service.store().len(), "session finished");
        Ok(())
    }
}

fn run_export<S: AccountStore, L: AuditLog>(
    service: &AccountService<S, L>,
    format: ExportFormat,
    output: Option<&PathBuf>,
) -> Result<()> {
    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(io::stdout()),
    };

    let count = exporter.export(format, writer)?;
    if let Some(path) = output {
        eprintln!(
            "Exported {} accounts as {} to {}",
            count,
            format.as_str(),
            path.display()
        );
    }
    Ok(())
}
