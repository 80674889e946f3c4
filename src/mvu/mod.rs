// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use crossbeam_channel::{Receiver, Sender};

use crate::logic::submission::{SubmissionGateway, SubmissionPayload, Transport};
use crate::models::catalog::SchemaCatalog;
use crate::models::notice::Notice;
use crate::ui::components::segment_form::{
    self, SegmentFormCommand, SegmentFormModel, SegmentFormMsg,
};

/// Top-level application state.
pub struct AppModel {
    /// Schema fields offered by every form.
    pub catalog: SchemaCatalog,
    /// The open "Save Segment" form, if any. Dropping it discards the draft.
    pub form: Option<SegmentFormModel>,
    /// Latest notice to display.
    pub notice: Option<Notice>,
    /// Bumped on every new notice so the view can restart its timer.
    pub notice_seq: u64,
    /// Count of queued background commands.
    pub pending_commands: usize,
    next_form_id: u64,
}

impl AppModel {
    pub fn new(catalog: SchemaCatalog) -> Self {
        Self {
            catalog,
            form: None,
            notice: None,
            notice_seq: 0,
            pending_commands: 0,
            next_form_id: 0,
        }
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    OpenForm,
    Form(SegmentFormMsg),
    SaveCompleted {
        form_id: u64,
        result: Result<String, String>,
    },
    /// Dismiss the notice with this sequence number, if it is still current.
    DismissNotice(u64),
}

/// Commands represent side-effects executed between frames.
#[derive(Debug)]
pub enum Command {
    Submit {
        form_id: u64,
        payload: SubmissionPayload,
    },
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::OpenForm => {
            if model.form.is_none() {
                model.next_form_id += 1;
                model.form = Some(SegmentFormModel::new(model.next_form_id));
            }
        }
        Msg::DismissNotice(seq) => {
            if seq == model.notice_seq {
                model.notice = None;
            }
        }
        Msg::Form(m) => {
            let Some(form) = model.form.as_mut() else {
                return;
            };
            let closing = matches!(m, SegmentFormMsg::CloseRequested);
            let form_id = form.id();

            let mut form_cmds = Vec::new();
            let event = segment_form::update(form, m, &model.catalog, &mut form_cmds);
            for c in form_cmds {
                match c {
                    SegmentFormCommand::Submit(payload) => {
                        cmds.push(Command::Submit { form_id, payload })
                    }
                }
            }
            if closing {
                model.form = None;
            }
            if let Some(notice) = event {
                surface_notice(model, notice);
            }
        }
        Msg::SaveCompleted { form_id, result } => {
            let notice = match model.form.as_mut() {
                Some(form) if form.id() == form_id => {
                    let mut ignored = Vec::new();
                    segment_form::update(
                        form,
                        SegmentFormMsg::SaveCompleted(result),
                        &model.catalog,
                        &mut ignored,
                    )
                }
                // The form was closed while its request was in flight.
                _ => Some(segment_form::completion_notice(&result)),
            };
            if let Some(notice) = notice {
                surface_notice(model, notice);
            }
        }
    }
}

/// Execute a command synchronously on the worker thread and return a resulting message.
pub fn run_command<T: Transport>(cmd: Command, gateway: &SubmissionGateway<T>) -> Msg {
    match cmd {
        Command::Submit { form_id, payload } => {
            let result = gateway.transmit(&payload).map_err(|err| err.to_string());
            Msg::SaveCompleted { form_id, result }
        }
    }
}

/// Hand commands to the worker, counting the ones it accepted.
pub fn dispatch(model: &mut AppModel, cmds: Vec<Command>, tx: &Sender<Command>) {
    for cmd in cmds {
        match tx.send(cmd) {
            Ok(()) => model.pending_commands += 1,
            Err(err) => tracing::error!(?err, "command worker is gone"),
        }
    }
}

/// Move finished worker results into `inbox`, settling one pending command each.
pub fn drain_worker(model: &mut AppModel, rx: &Receiver<Msg>, inbox: &mut Vec<Msg>) {
    while let Ok(msg) = rx.try_recv() {
        model.pending_commands = model.pending_commands.saturating_sub(1);
        inbox.push(msg);
    }
}

/// Replace the current notice and restart its display timer.
fn surface_notice(model: &mut AppModel, notice: Notice) {
    model.notice_seq += 1;
    model.notice = Some(notice);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{Receiver, Sender};

use crate::logic::submission::tests::RecordingTransport;
    use crate::models::notice::NoticeLevel;
    use crate::ui::components::segment_form::FormPhase;
    use serde_json::json;
    use url::Url;

    fn gateway(transport: RecordingTransport) -> SubmissionGateway<RecordingTransport> {
        SubmissionGateway::new(
            Url::parse("https://collector.example/hook").unwrap(),
            transport,
        )
    }

    fn model() -> AppModel {
        AppModel::new(SchemaCatalog::builtin().unwrap())
    }

    fn send(model: &mut AppModel, msg: Msg) -> Vec<Command> {
        let mut cmds = Vec::new();
        update(model, msg, &mut cmds);
        cmds
    }

    fn fill_form(model: &mut AppModel, name: &str, keys: &[&str]) {
        send(model, Msg::OpenForm);
        send(model, Msg::Form(SegmentFormMsg::NameChanged(name.into())));
        for key in keys {
            send(model, Msg::Form(SegmentFormMsg::PendingSelected((*key).into())));
            send(model, Msg::Form(SegmentFormMsg::AddPending));
        }
    }

    #[test]
    fn save_request_enqueues_and_completes() {
        let gateway = gateway(RecordingTransport::succeeding());
        let mut model = model();
        fill_form(&mut model, "VIP Users", &["first_name", "state"]);

        let mut cmds = send(&mut model, Msg::Form(SegmentFormMsg::SaveRequested));
        assert_eq!(cmds.len(), 1, "save should enqueue command");

        let msg = run_command(cmds.pop().unwrap(), &gateway);
        send(&mut model, msg);

        let notice = model.notice.as_ref().expect("notice expected");
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(
            gateway_sent(&gateway),
            vec![json!({
                "segment_name": "VIP Users",
                "schema": [{"first_name": "First Name"}, {"state": "State"}]
            })]
        );
        assert_eq!(
            model.form.as_ref().map(|f| f.phase()),
            Some(FormPhase::Succeeded)
        );
    }

    #[test]
    fn save_request_with_empty_name_sets_error() {
        let gateway = gateway(RecordingTransport::succeeding());
        let mut model = model();
        fill_form(&mut model, "", &["age"]);

        let cmds = send(&mut model, Msg::Form(SegmentFormMsg::SaveRequested));

        assert!(cmds.is_empty());
        assert_eq!(model.notice, Some(Notice::error("Please enter a segment name")));
        assert!(gateway_sent(&gateway).is_empty());
    }

    #[test]
    fn save_request_without_schema_sets_error() {
        let mut model = model();
        fill_form(&mut model, "VIP Users", &[]);

        let cmds = send(&mut model, Msg::Form(SegmentFormMsg::SaveRequested));

        assert!(cmds.is_empty());
        assert_eq!(
            model.notice,
            Some(Notice::error("Please add at least one schema"))
        );
    }

    #[test]
    fn failed_send_keeps_draft_for_retry() {
        let gateway = gateway(RecordingTransport::failing(500));
        let mut model = model();
        fill_form(&mut model, "VIP Users", &["age", "city"]);

        let mut cmds = send(&mut model, Msg::Form(SegmentFormMsg::SaveRequested));
        let msg = run_command(cmds.pop().unwrap(), &gateway);
        send(&mut model, msg);

        let form = model.form.as_ref().expect("form stays open");
        assert_eq!(form.phase(), FormPhase::Failed);
        assert_eq!(form.draft().name(), "VIP Users");
        assert_eq!(form.draft().added_fields(), ["age", "city"]);
        assert_eq!(
            model.notice.as_ref().map(|n| n.level),
            Some(NoticeLevel::Error)
        );

        let retry = send(&mut model, Msg::Form(SegmentFormMsg::SaveRequested));
        assert_eq!(retry.len(), 1);
    }

    #[test]
    fn close_discards_draft_and_reopen_starts_fresh() {
        let mut model = model();
        fill_form(&mut model, "VIP Users", &["age"]);

        send(&mut model, Msg::Form(SegmentFormMsg::CloseRequested));
        assert!(model.form.is_none());

        send(&mut model, Msg::OpenForm);
        let form = model.form.as_ref().unwrap();
        assert_eq!(form.phase(), FormPhase::Empty);
        assert!(form.draft().is_pristine());
    }

    #[test]
    fn completion_for_closed_form_only_notifies() {
        let gateway = gateway(RecordingTransport::succeeding());
        let mut model = model();
        fill_form(&mut model, "VIP Users", &["age"]);
        let mut cmds = send(&mut model, Msg::Form(SegmentFormMsg::SaveRequested));

        send(&mut model, Msg::Form(SegmentFormMsg::CloseRequested));
        send(&mut model, Msg::OpenForm);
        let msg = run_command(cmds.pop().unwrap(), &gateway);
        send(&mut model, msg);

        let form = model.form.as_ref().unwrap();
        assert_eq!(form.phase(), FormPhase::Empty);
        assert_eq!(
            model.notice,
            Some(Notice::success("Data sent successfully!"))
        );
    }

    #[test]
    fn form_messages_without_open_form_are_ignored() {
        let mut model = model();

        let cmds = send(&mut model, Msg::Form(SegmentFormMsg::SaveRequested));

        assert!(cmds.is_empty());
        assert!(model.notice.is_none());
    }

    #[test]
    fn add_without_selection_surfaces_warning() {
        let mut model = model();
        send(&mut model, Msg::OpenForm);

        send(&mut model, Msg::Form(SegmentFormMsg::AddPending));

        assert_eq!(
            model.notice.as_ref().map(|n| n.level),
            Some(NoticeLevel::Warning)
        );
        assert_eq!(model.notice_seq, 1);
        send(&mut model, Msg::DismissNotice(0));
        assert!(model.notice.is_some(), "stale dismissal is ignored");
        send(&mut model, Msg::DismissNotice(1));
        assert!(model.notice.is_none());
    }

    #[test]
    fn worker_round_trip_settles_pending_count() {
        let gateway = gateway(RecordingTransport::succeeding());
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded();
        let mut model = model();
        fill_form(&mut model, "VIP Users", &["gender"]);

        let cmds = send(&mut model, Msg::Form(SegmentFormMsg::SaveRequested));
        dispatch(&mut model, cmds, &cmd_tx);
        assert_eq!(model.pending_commands, 1);

        let mut inbox = Vec::new();
        drain_worker(&mut model, &msg_rx, &mut inbox);
        assert_eq!(model.pending_commands, 1, "nothing finished yet");
        assert!(inbox.is_empty());

        let cmd = cmd_rx.try_recv().unwrap();
        msg_tx.send(run_command(cmd, &gateway)).unwrap();
        drain_worker(&mut model, &msg_rx, &mut inbox);

        assert_eq!(model.pending_commands, 0);
        assert_eq!(inbox.len(), 1);
        for msg in inbox {
            send(&mut model, msg);
        }
        assert_eq!(
            model.form.as_ref().map(|f| f.phase()),
            Some(FormPhase::Succeeded)
        );
    }

    #[test]
    fn dispatch_to_stopped_worker_is_not_counted() {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        drop(cmd_rx);
        let mut model = model();
        fill_form(&mut model, "VIP Users", &["age"]);

        let cmds = send(&mut model, Msg::Form(SegmentFormMsg::SaveRequested));
        assert_eq!(cmds.len(), 1);
        dispatch(&mut model, cmds, &cmd_tx);

        assert_eq!(model.pending_commands, 0);
    }

    fn gateway_sent(gateway: &SubmissionGateway<RecordingTransport>) -> Vec<serde_json::Value> {
        gateway.transport().sent.lock().unwrap().clone()
    }
}
