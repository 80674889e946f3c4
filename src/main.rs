// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

mod app;
mod config;
mod logic;
mod models;
mod mvu;
mod ui;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = config::AppConfig::from_env()?;
    tracing::info!(
        endpoint = %config.endpoint,
        schema_fields = config.catalog.fields().len(),
        "starting segment form"
    );

    app::run(config)
}
