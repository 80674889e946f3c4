// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring egui/eframe, the HTTP transport and the segment UI.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use eframe::egui;
use egui_phosphor::Variant;

use crate::config::AppConfig;
use crate::logic::submission::{HttpTransport, SubmissionGateway};
use crate::ui::SegmentPackApp;

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run(config: AppConfig) -> Result<()> {
    let transport = HttpTransport::new(config.timeout)?;
    let gateway = Arc::new(SubmissionGateway::new(config.endpoint, transport));
    let catalog = config.catalog;
    tracing::debug!(endpoint = %gateway.endpoint(), "submission gateway ready");

    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 560.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SegmentPack",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(SegmentPackApp::new(catalog, gateway)))
        }),
    )
    .map_err(|err| anyhow!("UI event loop failed: {err}"))
}
