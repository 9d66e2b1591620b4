use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("No data directory configured (set data_dir in the config file or pass --data-dir)")]
    NoDataDir,

    #[error("{0}")]
    Import(#[from] ImportError),
}

#[derive(Debug, Error)]
pub(crate) enum ImportError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: csv::Error,
    },

    /// One or more rows failed validation; the whole batch is rejected.
    #[error("{}", format_invalid_rows(.path, .errors))]
    InvalidRows {
        path: PathBuf,
        errors: Vec<String>,
    },
}

fn format_invalid_rows(path: &PathBuf, errors: &[String]) -> String {
    let mut msg = format!(
        "{} invalid row(s) in {}, nothing imported:",
        errors.len(),
        path.display()
    );
    for e in errors {
        msg.push_str("\n  ");
        msg.push_str(e);
    }
    msg
}
