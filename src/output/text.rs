//! Text output formatter for human-readable display

use crate::domain::{DependencyRecord, ModuleIdentity};
use crate::output::ReportFormatter;
use colored::Colorize;
use std::io::Write;

/// Header printed before the list of updatable dependencies
pub const UPDATES_HEADER: &str = "Dependencies that can be updated:";

/// Line printed when nothing can be updated
pub const UP_TO_DATE: &str = "All dependencies are up to date.";

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter without colors
    pub fn new() -> Self {
        Self { color: false }
    }

    /// Create a new text formatter with color option
    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for TextFormatter {
    fn format(
        &self,
        identity: &ModuleIdentity,
        records: &[DependencyRecord],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        // Module identity
        writeln!(writer, "Module: {}", identity.name)?;
        writeln!(writer, "Go Module Version: {}", identity.toolchain_version)?;

        // Nothing to update
        if records.is_empty() {
            let line = if self.color {
                UP_TO_DATE.green().to_string()
            } else {
                UP_TO_DATE.to_string()
            };
            writeln!(writer, "{}", line)?;
            return Ok(());
        }

        // Updatable dependencies, in listing order
        writeln!(writer, "{}", self.header(UPDATES_HEADER))?;
        for record in records {
            // Filtered out upstream; never print a record without an update
            let Some(update) = &record.update else {
                continue;
            };
            writeln!(
                writer,
                "- {}: {} -> {}",
                record.import_path, record.current_version, update.new_version
            )?;
        }
        Ok(())
    }
}
