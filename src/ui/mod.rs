// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for composing and sending segments.
//! Handles layout, the form modal, and wiring to the submission worker.

pub mod components;

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::logic::submission::{SubmissionGateway, Transport};
use crate::models::catalog::SchemaCatalog;
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::{notice_bar, segment_form};

/// Stateful egui application hosting the "Save Segment" form.
pub struct SegmentPackApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
    /// Notice sequence number and the frame time it was first shown.
    notice_shown: Option<(u64, f64)>,
}

impl SegmentPackApp {
    /// Create the app and start the command worker.
    ///
    /// A single worker keeps at most one outbound request in flight at a time.
    pub fn new<T>(catalog: SchemaCatalog, gateway: Arc<SubmissionGateway<T>>) -> Self
    where
        T: Transport + 'static,
    {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        std::thread::spawn(move || {
            for cmd in cmd_rx.iter() {
                let msg = mvu::run_command(cmd, &gateway);
                if msg_tx.send(msg).is_err() {
                    break;
                }
            }
        });

        Self {
            model: AppModel::new(catalog),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
            notice_shown: None,
        }
    }
}

impl eframe::App for SegmentPackApp {
    /// Drives a single UI frame: drains worker results, applies queued messages,
    /// then renders the launcher, the form modal and the status panel.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        // Pull messages produced by the command worker.
        mvu::drain_worker(&mut self.model, &self.msg_rx, &mut self.inbox);

        self.expire_notice(ctx);

        // Process pending messages in arrival order.
        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            mvu::dispatch(&mut self.model, commands, &self.cmd_tx);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Segments");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_theme_controls(ui);
                });
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                let notice = self.model.notice.as_ref();
                if notice_bar::view(ui, notice, self.model.pending_commands) {
                    self.inbox.push(Msg::DismissNotice(self.model.notice_seq));
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(40.0);
            self.render_launcher(ui);
        });

        if let Some(form) = &self.model.form {
            let form_msgs = segment_form::view(ctx, form, &self.model.catalog);
            self.inbox.extend(form_msgs.into_iter().map(Msg::Form));
        }

        if !self.inbox.is_empty() {
            ctx.request_repaint();
        } else if self.model.pending_commands > 0 {
            // Poll the worker channel while a request is in flight.
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl SegmentPackApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    fn render_theme_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(2.0);
        egui::widgets::global_theme_preference_switch(ui);
    }

    /// Render the "Save segment" button that opens the form modal.
    fn render_launcher(&mut self, ui: &mut egui::Ui) {
        let button = egui::Button::new(format!(
            "{} Save segment",
            egui_phosphor::regular::FLOPPY_DISK
        ));
        if ui
            .add_enabled(self.model.form.is_none(), button)
            .on_disabled_hover_text("The segment form is already open")
            .clicked()
        {
            self.inbox.push(Msg::OpenForm);
        }
    }

    /// Dismiss the current notice once it has been visible long enough.
    fn expire_notice(&mut self, ctx: &egui::Context) {
        if self.model.notice.is_none() {
            self.notice_shown = None;
            return;
        }

        let now = ctx.input(|i| i.time);
        let seq = self.model.notice_seq;
        let shown_at = match self.notice_shown {
            Some((shown_seq, at)) if shown_seq == seq => at,
            _ => {
                self.notice_shown = Some((seq, now));
                now
            }
        };

        if notice_bar::is_expired(shown_at, now) {
            self.inbox.push(Msg::DismissNotice(seq));
        } else {
            let left = notice_bar::NOTICE_TTL_SECS - (now - shown_at);
            ctx.request_repaint_after(Duration::from_secs_f64(left.max(0.0)));
        }
    }
}
