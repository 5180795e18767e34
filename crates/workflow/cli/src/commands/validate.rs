//! Document validation command

use crate::error::CliResult;
use crate::output::{print_structured, OutputFormat};
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Validate the document at `file`; a schema violation is returned as an error
pub fn execute(file: &Path, format: OutputFormat) -> CliResult<()> {
    let document = std::fs::read_to_string(file)?;
    workflow_schema::validate(&document)?;
    info!(file = %file.display(), "Document is valid");

    let report = serde_json::json!({
        "file": file.display().to_string(),
        "valid": true,
    });
    if !print_structured(&report, format)? {
        println!(
            "{} {} is a valid workflow document",
            "✓".green(),
            file.display().to_string().bold()
        );
    }
    Ok(())
}
