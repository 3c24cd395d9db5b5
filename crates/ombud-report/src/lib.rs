// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tabular period reports over the request store.
//!
//! Renders all requests created within the trailing day or week into a
//! CSV file, one row per content item, for delivery to the head office
//! mailbox.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Duration, Utc};
use ombud_core::{OmbudError, RequestStore};
use tracing::info;

/// The trailing window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
}

impl Period {
    fn cutoff(self) -> chrono::DateTime<Utc> {
        match self {
            Period::Day => Utc::now() - Duration::days(1),
            Period::Week => Utc::now() - Duration::weeks(1),
        }
    }
}

impl FromStr for Period {
    type Err = OmbudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            other => Err(OmbudError::Validation(format!(
                "unknown report period `{other}` (expected `day` or `week`)"
            ))),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Week => write!(f, "week"),
        }
    }
}

/// Generate a CSV report of all requests created within the trailing
/// period and return the file path.
pub async fn generate_report(
    store: &dyn RequestStore,
    period: Period,
    output_dir: &Path,
) -> Result<PathBuf, OmbudError> {
    let cutoff = period
        .cutoff()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    let requests = store.fetch_requests_since(&cutoff).await?;

    std::fs::create_dir_all(output_dir).map_err(|e| {
        OmbudError::Internal(format!("cannot create report directory: {e}"))
    })?;
    let file_path = output_dir.join(format!(
        "report_{period}_{}.csv",
        Utc::now().format("%Y%m%d")
    ));

    let mut writer = csv::Writer::from_path(&file_path)
        .map_err(|e| OmbudError::Internal(format!("cannot open report file: {e}")))?;
    writer
        .write_record([
            "request_id",
            "client_id",
            "branch",
            "kind",
            "content",
            "created_at",
        ])
        .map_err(|e| OmbudError::Internal(format!("report write failed: {e}")))?;

    let mut rows = 0usize;
    for request in &requests {
        let branch = request.branch.as_deref().unwrap_or("");
        if request.items.is_empty() {
            // A request without content still shows up in the report.
            let record = [
                request.request_id.to_string(),
                request.client_id.to_string(),
                branch.to_string(),
                String::new(),
                String::new(),
                request.created_at.clone(),
            ];
            writer
                .write_record(&record)
                .map_err(|e| OmbudError::Internal(format!("report write failed: {e}")))?;
            rows += 1;
            continue;
        }
        for item in &request.items {
            let record = [
                request.request_id.to_string(),
                request.client_id.to_string(),
                branch.to_string(),
                item.kind.to_string(),
                item.content.clone(),
                item.created_at.clone(),
            ];
            writer
                .write_record(&record)
                .map_err(|e| OmbudError::Internal(format!("report write failed: {e}")))?;
            rows += 1;
        }
    }
    writer
        .flush()
        .map_err(|e| OmbudError::Internal(format!("report flush failed: {e}")))?;

    info!(
        period = %period,
        requests = requests.len(),
        rows,
        path = %file_path.display(),
        "report generated"
    );
    Ok(file_path)
}
