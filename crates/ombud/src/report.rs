// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `report` subcommand: render the trailing period and mail it.

use std::path::Path;

use ombud_config::OmbudConfig;
use ombud_core::traits::Mailer as _;
use ombud_core::OmbudError;
use ombud_report::{generate_report, Period};
use ombud_storage::SqliteStore;
use tracing::info;

pub async fn run(config: OmbudConfig, period_str: &str) -> Result<(), OmbudError> {
    let period: Period = period_str.parse()?;

    let store = SqliteStore::open(&config.storage.database_path).await?;
    let path = generate_report(&store, period, Path::new(&config.report.output_dir)).await?;
    println!("report written to {}", path.display());

    // Mail the report to the head office when both sides are configured.
    let Some(ref address) = config.head_office.email else {
        info!("head_office.email not set; report not mailed");
        return Ok(());
    };
    let mailer = crate::serve::build_mailer(&config)?;
    mailer
        .send(
            &format!("Ombud {period} report"),
            "The requested report is attached.",
            address,
            Some(&path),
        )
        .await?;
    println!("report mailed to {address}");
    Ok(())
}
