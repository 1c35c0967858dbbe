//! JSON output formatter for machine processing

use crate::domain::{DependencyRecord, ModuleIdentity};
use crate::output::ReportFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Module path
    module: &'a str,
    /// Go version declared by the manifest
    go_version: &'a str,
    /// Updatable dependencies
    updates: Vec<JsonUpdate<'a>>,
}

/// JSON representation of an update
#[derive(Serialize)]
struct JsonUpdate<'a> {
    /// Module path
    path: &'a str,
    /// Current version
    current: &'a str,
    /// Newer version
    latest: &'a str,
    /// Whether the module is an indirect requirement
    indirect: bool,
}

impl ReportFormatter for JsonFormatter {
    fn format(
        &self,
        identity: &ModuleIdentity,
        records: &[DependencyRecord],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let updates = records
            .iter()
            .filter_map(|record| {
                let update = record.update.as_ref()?;
                Some(JsonUpdate {
                    path: &record.import_path,
                    current: &record.current_version,
                    latest: &update.new_version,
                    indirect: record.indirect,
                })
            })
            .collect();

        let output = JsonOutput {
            module: &identity.name,
            go_version: &identity.toolchain_version,
            updates,
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;
        Ok(())
    }
}
