use dashboard_logging::{dash_debug, dash_info, dash_warn};

use crate::intake::{first_candidate, validate_candidate};
use crate::{AppState, CandidateFile, Effect, Msg, UploadPhase};

pub const UPLOAD_BUSY_ALERT: &str = "An upload is already in progress.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            if state.start() {
                vec![Effect::ProbeBackend, Effect::StartAnimator]
            } else {
                Vec::new()
            }
        }
        Msg::DragEntered => {
            state.set_drag_active(true);
            Vec::new()
        }
        Msg::DragLeft => {
            state.set_drag_active(false);
            Vec::new()
        }
        Msg::FilesDropped(files) => {
            state.set_drag_active(false);
            accept_candidate(&mut state, files)
        }
        Msg::FilesPicked(files) => accept_candidate(&mut state, files),
        Msg::UploadCompleted { attempt, result } => {
            if !state.take_in_flight(attempt) {
                dash_warn!("Ignoring completion for stale upload attempt {}", attempt);
                return (state, Vec::new());
            }
            match result {
                Ok(analysis) => {
                    dash_info!(
                        "Upload {} succeeded: {} rows, {} fraud, {} safe",
                        attempt,
                        analysis.total_rows,
                        analysis.fraud_count,
                        analysis.safe_count
                    );
                    state.complete_success(analysis);
                }
                Err(failure) => {
                    dash_warn!("Upload {} failed: {}", attempt, failure);
                    state.complete_failure(failure);
                }
            }
            Vec::new()
        }
        Msg::StatusDismissed => {
            state.dismiss_status();
            Vec::new()
        }
        Msg::ExportClicked => match state.held_result() {
            Some(result) => vec![Effect::ExportCsv {
                result: result.clone(),
            }],
            None => {
                dash_debug!("Export requested with no held result");
                Vec::new()
            }
        },
        Msg::ProbeCompleted(status) => {
            dash_info!("Backend status: {}", status.label());
            state.set_backend_status(status);
            Vec::new()
        }
        Msg::AnimatorTick {
            transactions,
            fraud,
        } => {
            state.apply_animator_tick(transactions, fraud);
            Vec::new()
        }
    };

    (state, effects)
}

fn accept_candidate(state: &mut AppState, files: Vec<CandidateFile>) -> Vec<Effect> {
    let Some(file) = first_candidate(files) else {
        return Vec::new();
    };
    if let Err(err) = validate_candidate(&file) {
        dash_info!("Rejected candidate: {}", err);
        return vec![Effect::ShowAlert {
            message: err.alert_message().to_string(),
        }];
    }
    if state.phase() == UploadPhase::Uploading {
        dash_info!("Rejected {:?}: upload already in flight", file.name);
        return vec![Effect::ShowAlert {
            message: UPLOAD_BUSY_ALERT.to_string(),
        }];
    }

    let attempt = state.begin_upload();
    dash_info!(
        "Submitting {:?} ({} bytes) as attempt {}",
        file.name,
        file.bytes.len(),
        attempt
    );
    vec![Effect::SubmitUpload { attempt, file }]
}
