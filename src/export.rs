//! CSV report writing and naming.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::records::ErrorRecord;
use crate::window::DateRange;

const CSV_HEADER: [&str; 4] = ["class", "service", "msg", "count"];
const FILENAME_SUFFIX: &str = "Error_Monitoring.csv";

/// A written report. Serializes with camelCase keys; the stdout payload is
/// parsed by the automation that invokes this tool.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub full_path: PathBuf,
    pub filename: String,
}

#[derive(Debug)]
pub enum ExportError {
    CreateDir { path: PathBuf, source: io::Error },
    Io { path: PathBuf, source: io::Error },
    Csv { path: PathBuf, source: csv::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, source } => write!(
                f,
                "could not create reports directory {}: {source}",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "could not write report {}: {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "could not write CSV rows to {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } | Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}

/// Report filename for the run: the explicit range when one was given,
/// otherwise the current report date. Same inputs, same name, so reruns
/// land on the same file.
pub fn report_filename(range: Option<&DateRange>, today: NaiveDate) -> String {
    match range {
        Some(range) => format!(
            "{}_to_{}_{FILENAME_SUFFIX}",
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d")
        ),
        None => format!("{}_{FILENAME_SUFFIX}", today.format("%Y-%m-%d")),
    }
}

/// Write the filtered records as a UTF-8 CSV under `reports_dir`, creating
/// the directory if needed. The header row is always written; zero records
/// produce a header-only file. An existing file of the same name is
/// replaced whole.
///
/// # Errors
///
/// Returns an error when the directory cannot be created or the file
/// cannot be created, written, or flushed.
pub fn write_report(
    records: &[ErrorRecord],
    range: Option<&DateRange>,
    today: NaiveDate,
    reports_dir: &Path,
) -> Result<Report, ExportError> {
    fs::create_dir_all(reports_dir).map_err(|source| ExportError::CreateDir {
        path: reports_dir.to_path_buf(),
        source,
    })?;

    let filename = report_filename(range, today);
    let path = reports_dir.join(&filename);

    let file = fs::File::create(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(CSV_HEADER)
        .map_err(|source| ExportError::Csv {
            path: path.clone(),
            source,
        })?;
    for record in records {
        let count = record.count.to_string();
        writer
            .write_record([
                record.class.as_str(),
                record.service.as_str(),
                record.msg.as_str(),
                count.as_str(),
            ])
            .map_err(|source| ExportError::Csv {
                path: path.clone(),
                source,
            })?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    let full_path = std::path::absolute(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(Report { full_path, filename })
}
