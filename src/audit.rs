// Audit trail sinks. Write failures never reach the ledger.

use std::cell::RefCell;
use std::io::{self, Write};

use chrono::Local;

/// Append-only sink for audit lines.
pub trait AuditLog {
    fn log(&self, message: &str);
}

impl<T: AuditLog + ?Sized> AuditLog for &T {
    fn log(&self, message: &str) {
        (**self).log(message)
    }
}

/// Writes `[LOG] <local timestamp>: <message>` lines to a writer (stdout by
/// default).
pub struct ConsoleAuditLog {
    writer: RefCell<Box<dyn Write>>,
}

impl ConsoleAuditLog {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer(writer: impl Write + 'static) -> Self {
        Self {
            writer: RefCell::new(Box::new(writer)),
        }
    }
}

impl Default for ConsoleAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLog for ConsoleAuditLog {
    fn log(&self, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut writer = self.writer.borrow_mut();
        if let Err(err) = writeln!(writer, "[LOG] {}: {}", timestamp, message)
            .and_then(|_| writer.flush())
        {
            tracing::warn!(error = %err, "failed to write audit line");
        }
    }
}

/// Keeps every line in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    lines: RefCell<Vec<String>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }

    pub fn last(&self) -> Option<String> {
        self.lines.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl AuditLog for MemoryAuditLog {
    fn log(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }
}
