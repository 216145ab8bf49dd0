use crate::batch::DiagramReport;
use log::{error, info};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub fn read_source(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => {
            info!("Read {} bytes from {:?}", content.len(), path);
            Ok(content)
        }
        Err(e) => {
            error!("Failed to read {:?}: {}", path, e);
            Err(e)
        }
    }
}

pub fn export_reports_to_json(reports: &[DiagramReport], output_path: &Path) -> io::Result<()> {
    info!(
        "Exporting {} diagram reports to JSON: {:?}",
        reports.len(),
        output_path
    );

    let json = match serde_json::to_string_pretty(reports) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize reports to JSON: {}", e);
            return Err(io::Error::other(e));
        }
    };

    match fs::write(output_path, &json) {
        Ok(_) => {
            info!(
                "Successfully wrote {} bytes to {:?}",
                json.len(),
                output_path
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to write JSON to file {:?}: {}", output_path, e);
            Err(e)
        }
    }
}

/// Writes markup to `output_path`, or to stdout when no path is given.
pub fn write_markup(markup: &str, output_path: Option<&Path>) -> io::Result<()> {
    match output_path {
        Some(path) => {
            fs::write(path, markup).inspect_err(|e| {
                error!("Failed to write markup to {:?}: {}", path, e);
            })?;
            info!("Wrote {} bytes of markup to {:?}", markup.len(), path);
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(markup.as_bytes())?;
            stdout.write_all(b"\n")
        }
    }
}
