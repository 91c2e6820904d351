//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use repropack_core::ArchiveReport;
use serde::Serialize;
use std::io;
use std::io::Write;
use std::path::Path;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct CreationOutput {
    output_path: String,
    format: Option<String>,
    files_added: usize,
    directories_added: usize,
    symlinks_added: usize,
    hardlinks_added: usize,
    entries_skipped: usize,
    bytes_read: u64,
    archive_size: u64,
    compression_ratio: f64,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl CreationOutput {
    fn new(output_path: &Path, report: &ArchiveReport) -> Self {
        Self {
            output_path: output_path.display().to_string(),
            format: report.format.map(|f| f.to_string()),
            files_added: report.files_added,
            directories_added: report.directories_added,
            symlinks_added: report.symlinks_added,
            hardlinks_added: report.hardlinks_added,
            entries_skipped: report.entries_skipped,
            bytes_read: report.bytes_read,
            archive_size: report.archive_size,
            compression_ratio: report.compression_ratio(),
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_creation_result(&self, output_path: &Path, report: &ArchiveReport) -> Result<()> {
        let output = JsonOutput::success("create", CreationOutput::new(output_path, report));
        Self::output(&output)
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
