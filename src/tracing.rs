//! Debug tracing infrastructure for development diagnostics
//!
//! The core logs through `tracing` with scoped targets so hosts can filter:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=cursor=trace,selection=debug` - scoped filtering
//! - `RUST_LOG=edit=debug,undo=trace` - edit and history activity
//!
//! Hosts that already install a subscriber can ignore [`init`].

use std::path::Path;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths;
use crate::editable::EditSession;

/// Initialize a tracing subscriber with console and optional file logging
///
/// Console output respects RUST_LOG (default `warn`). When `log_dir` is given,
/// a daily-rotated `linebuf.log` is written there at debug level.
pub fn init(log_dir: Option<&Path>) {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = log_dir.and_then(|dir| match std::fs::create_dir_all(dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(dir, "linebuf.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    });

    if let Err(e) = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("Warning: tracing subscriber already set: {}", e);
    }
}

/// [`init`] with file logging under [`config_paths::logs_dir`], falling back to
/// console only if the directory cannot be created
pub fn init_default() {
    match config_paths::ensure_logs_dir() {
        Ok(dir) => init(Some(&dir)),
        Err(e) => {
            eprintln!("Warning: {}", e);
            init(None);
        }
    }
}

/// Lightweight snapshot of cursor/selection state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub line: usize,
    pub column: usize,
    pub start: Option<(usize, usize)>,
    pub end: Option<(usize, usize)>,
    pub has_selection: bool,
}

impl SelectionSnapshot {
    pub fn from_session(session: &EditSession) -> Self {
        let cursor = session.cursor_position();
        let selection = session.selection();
        Self {
            line: cursor.line,
            column: cursor.column,
            start: selection.start.map(|p| (p.line, p.column)),
            end: selection.end.map(|p| (p.line, p.column)),
            has_selection: selection.has_selection(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.line != other.line || self.column != other.column {
            changes.push(format!(
                "cursor: ({},{}) → ({},{})",
                self.line, self.column, other.line, other.column
            ));
        }
        if self.has_selection != other.has_selection {
            let status = if other.has_selection {
                "active"
            } else {
                "cleared"
            };
            changes.push(format!("selection {}", status));
        } else if other.has_selection && (self.start != other.start || self.end != other.end) {
            changes.push(format!("selection {:?} → {:?}", other.start, other.end));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
