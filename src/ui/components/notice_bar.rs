// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Status panel showing the latest transient notice and background activity.

use eframe::egui;

use crate::models::notice::{Notice, NoticeLevel};

/// Seconds a notice stays visible before it is dismissed automatically.
pub const NOTICE_TTL_SECS: f64 = 4.0;

/// Icon and text colour for a notice level.
fn style_for(level: NoticeLevel) -> (&'static str, egui::Color32) {
    match level {
        NoticeLevel::Success => (
            egui_phosphor::regular::CHECK_CIRCLE,
            egui::Color32::from_rgb(0x38, 0x9e, 0x0d),
        ),
        NoticeLevel::Warning => (
            egui_phosphor::regular::WARNING,
            egui::Color32::from_rgb(0xd4, 0x88, 0x06),
        ),
        NoticeLevel::Error => (
            egui_phosphor::regular::X_CIRCLE,
            egui::Color32::from_rgb(0xcf, 0x13, 0x22),
        ),
    }
}

/// Whether a notice first shown at `shown_at` has outlived its TTL at `now`.
pub fn is_expired(shown_at: f64, now: f64) -> bool {
    now - shown_at >= NOTICE_TTL_SECS
}

/// Render the notice (if any) plus a spinner while commands run.
/// Returns `true` when the user clicked the notice to dismiss it.
pub fn view(ui: &mut egui::Ui, notice: Option<&Notice>, pending_commands: usize) -> bool {
    let mut dismiss = false;

    ui.horizontal(|ui| {
        if let Some(notice) = notice {
            let (icon, color) = style_for(notice.level);
            let label = egui::Label::new(
                egui::RichText::new(format!("{icon} {}", notice.message)).color(color),
            )
            .sense(egui::Sense::click());
            if ui.add(label).on_hover_text("Click to dismiss").clicked() {
                dismiss = true;
            }
        }

        if pending_commands > 0 {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add(egui::Spinner::new().size(14.0))
                    .on_hover_text(format!("{pending_commands} request(s) in flight"));
            });
        }
    });

    dismiss
}
