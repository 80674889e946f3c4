// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! "Save Segment" form in an MVU-friendly shape: name input, pending schema
//! selector, editable schema rows and the save action.

use eframe::egui;

use crate::logic::submission::{self, SubmissionPayload};
use crate::models::catalog::{SchemaCatalog, SchemaField};
use crate::models::notice::Notice;
use crate::models::segment::SegmentDraft;

/// Lifecycle of one open form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Empty,
    Editing,
    Submitting,
    Succeeded,
    Failed,
}

/// UI model for the segment form, kept free of side effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentFormModel {
    id: u64,
    draft: SegmentDraft,
    phase: FormPhase,
}

impl SegmentFormModel {
    /// Fresh form; `id` ties submission results back to this instance.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn draft(&self) -> &SegmentDraft {
        &self.draft
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    fn touch(&mut self) {
        if self.phase != FormPhase::Empty || !self.draft.is_pristine() {
            self.phase = FormPhase::Editing;
        }
    }
}

/// Messages emitted by the segment form view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentFormMsg {
    NameChanged(String),
    PendingSelected(String),
    AddPending,
    ReplaceField { index: usize, key: String },
    SaveRequested,
    SaveCompleted(Result<String, String>),
    CloseRequested,
}

/// Side effects requested by the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentFormCommand {
    Submit(SubmissionPayload),
}

/// Apply a message to the model. Returns a notice when the user should be told something.
pub fn update(
    model: &mut SegmentFormModel,
    msg: SegmentFormMsg,
    catalog: &SchemaCatalog,
    cmds: &mut Vec<SegmentFormCommand>,
) -> Option<Notice> {
    // Inputs are locked until the in-flight request settles.
    if model.is_submitting()
        && !matches!(
            msg,
            SegmentFormMsg::SaveCompleted(_) | SegmentFormMsg::CloseRequested
        )
    {
        return None;
    }

    match msg {
        SegmentFormMsg::NameChanged(text) => {
            model.draft.set_name(text);
            model.touch();
            None
        }
        SegmentFormMsg::PendingSelected(key) => match model.draft.select_pending(catalog, &key) {
            Ok(()) => {
                model.touch();
                None
            }
            Err(err) => Some(Notice::warning(err.to_string())),
        },
        SegmentFormMsg::AddPending => match model.draft.commit_pending() {
            Ok(()) => {
                model.touch();
                None
            }
            Err(warning) => Some(Notice::warning(warning.to_string())),
        },
        SegmentFormMsg::ReplaceField { index, key } => {
            match model.draft.replace_field(catalog, index, &key) {
                Ok(()) => {
                    model.touch();
                    None
                }
                Err(err) => Some(Notice::warning(err.to_string())),
            }
        }
        SegmentFormMsg::SaveRequested => match submission::prepare(&model.draft, catalog) {
            Ok(payload) => {
                model.phase = FormPhase::Submitting;
                cmds.push(SegmentFormCommand::Submit(payload));
                None
            }
            Err(err) => {
                tracing::debug!(form = model.id, error = %err, "segment rejected before sending");
                Some(Notice::error(err.to_string()))
            }
        },
        SegmentFormMsg::SaveCompleted(result) => {
            model.phase = if result.is_ok() {
                FormPhase::Succeeded
            } else {
                FormPhase::Failed
            };
            Some(completion_notice(&result))
        }
        SegmentFormMsg::CloseRequested => {
            model.draft.clear_pending();
            None
        }
    }
}

/// Notice for a finished submission, whether or not its form is still open.
pub fn completion_notice(result: &Result<String, String>) -> Notice {
    match result {
        Ok(_) => Notice::success("Data sent successfully!"),
        Err(err) => Notice::error(format!("Failed to send data: {err}")),
    }
}

/// Render the form as a centered modal and return triggered messages.
pub fn view(
    ctx: &egui::Context,
    model: &SegmentFormModel,
    catalog: &SchemaCatalog,
) -> Vec<SegmentFormMsg> {
    let mut msgs = Vec::new();

    egui::Window::new("Save Segment")
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.add_enabled_ui(!model.is_submitting(), |ui| {
                render_name_input(ui, model, &mut msgs);
                ui.add_space(10.0);
                render_pending_selector(ui, model, catalog, &mut msgs);
                if !model.draft().added_fields().is_empty() {
                    ui.add_space(8.0);
                    render_schema_rows(ui, model, catalog, &mut msgs);
                }
            });

            ui.add_space(12.0);
            render_actions(ui, model, &mut msgs);
        });

    msgs
}

fn render_name_input(ui: &mut egui::Ui, model: &SegmentFormModel, msgs: &mut Vec<SegmentFormMsg>) {
    ui.label(egui::RichText::new("Enter the Name of the Segment").strong());
    ui.add_space(4.0);
    let mut name = model.draft().name().to_string();
    let resp = ui.add(
        egui::TextEdit::singleline(&mut name)
            .hint_text("Enter segment name")
            .desired_width(f32::INFINITY),
    );
    if resp.changed() {
        msgs.push(SegmentFormMsg::NameChanged(name));
    }
}

fn render_pending_selector(
    ui: &mut egui::Ui,
    model: &SegmentFormModel,
    catalog: &SchemaCatalog,
    msgs: &mut Vec<SegmentFormMsg>,
) {
    ui.label(egui::RichText::new("Add schema to segment").strong());
    ui.add_space(4.0);

    let remaining = model.draft().remaining_candidates(catalog);
    let pending = model.draft().pending_selection();
    let selected_text = pending
        .and_then(|key| catalog.label_of(key))
        .unwrap_or("Select schema");

    egui::ComboBox::from_id_salt("pending-schema")
        .width(ui.available_width())
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            if remaining.is_empty() {
                ui.label(
                    egui::RichText::new("All schemas added.")
                        .italics()
                        .color(egui::Color32::from_gray(110)),
                );
            }
            let mut current = pending.unwrap_or_default().to_string();
            for field in remaining {
                if ui
                    .selectable_value(&mut current, field.key.clone(), field.label.as_str())
                    .clicked()
                {
                    msgs.push(SegmentFormMsg::PendingSelected(field.key.clone()));
                }
            }
        });

    if ui
        .link(format!("{} Add new schema", egui_phosphor::regular::PLUS))
        .clicked()
    {
        msgs.push(SegmentFormMsg::AddPending);
    }
}

/// Added schemas, one selector per row, inside a tinted card.
fn render_schema_rows(
    ui: &mut egui::Ui,
    model: &SegmentFormModel,
    catalog: &SchemaCatalog,
    msgs: &mut Vec<SegmentFormMsg>,
) {
    let (fill, stroke) = if ui.visuals().dark_mode {
        (
            egui::Color32::from_rgb(0x11, 0x1d, 0x2c),
            egui::Color32::from_rgb(0x15, 0x41, 0x7e),
        )
    } else {
        (
            egui::Color32::from_rgb(0xe6, 0xf7, 0xff),
            egui::Color32::from_rgb(0x91, 0xd5, 0xff),
        )
    };

    egui::Frame::group(ui.style())
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, stroke))
        .corner_radius(egui::CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            for (index, key) in model.draft().added_fields().iter().enumerate() {
                let candidates = model.draft().row_candidates(catalog, index);
                render_schema_row(ui, index, key, candidates, catalog, msgs);
            }
        });
}

fn render_schema_row(
    ui: &mut egui::Ui,
    index: usize,
    key: &str,
    candidates: Vec<&SchemaField>,
    catalog: &SchemaCatalog,
    msgs: &mut Vec<SegmentFormMsg>,
) {
    let mut current = key.to_string();
    egui::ComboBox::from_id_salt(format!("schema-row-{index}"))
        .width(ui.available_width())
        .selected_text(catalog.label_of(key).unwrap_or(key))
        .show_ui(ui, |ui| {
            for field in candidates {
                if ui
                    .selectable_value(&mut current, field.key.clone(), field.label.as_str())
                    .clicked()
                    && field.key != key
                {
                    msgs.push(SegmentFormMsg::ReplaceField {
                        index,
                        key: field.key.clone(),
                    });
                }
            }
        });
}

fn render_actions(ui: &mut egui::Ui, model: &SegmentFormModel, msgs: &mut Vec<SegmentFormMsg>) {
    ui.horizontal(|ui| {
        let save = egui::Button::new(format!(
            "{} Save the segment",
            egui_phosphor::regular::FLOPPY_DISK
        ));
        if ui
            .add_enabled(!model.is_submitting(), save)
            .on_disabled_hover_text("Sending segment…")
            .clicked()
        {
            msgs.push(SegmentFormMsg::SaveRequested);
        }

        if ui.button("Cancel").clicked() {
            msgs.push(SegmentFormMsg::CloseRequested);
        }

        if model.is_submitting() {
            ui.add(egui::Spinner::new().size(14.0));
        }
    });
}
