use std::sync::{mpsc, Arc};

use chrono::Utc;
use dashboard_logging::{dash_error, dash_info, dash_warn};
use fraudscope_core::{Effect, Msg, UploadFailure, UploadFailureKind};
use fraudscope_engine::{
    EngineError, EngineEvent, EngineHandle, EngineSettings, EventSink, ExportWriter,
    TransportError, UploadError,
};

use super::app::LoopEvent;

/// Executes core effects against the engine and the export directory.
pub struct EffectRunner {
    engine: EngineHandle,
    exports: ExportWriter,
}

impl EffectRunner {
    pub fn new(
        settings: EngineSettings,
        exports: ExportWriter,
        loop_tx: mpsc::Sender<LoopEvent>,
    ) -> Result<Self, EngineError> {
        let sink = Arc::new(MsgSink { loop_tx });
        let engine = EngineHandle::new(settings, sink)?;
        Ok(Self { engine, exports })
    }

    /// Runs the effects and returns notices for the operator.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<String> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::ProbeBackend => self.engine.probe(),
                Effect::StartAnimator => self.engine.start_animator(),
                Effect::SubmitUpload { attempt, file } => {
                    dash_info!(
                        "SubmitUpload attempt={} file={:?} bytes={}",
                        attempt,
                        file.name,
                        file.bytes.len()
                    );
                    notices.push(format!("Analyzing {}...", file.name));
                    self.engine.submit(attempt, file);
                }
                Effect::ExportCsv { result } => {
                    let stamp = Utc::now().timestamp_millis();
                    match self.exports.write_result(&result, stamp) {
                        Ok(path) => notices.push(format!(
                            "Exported {} rows to {}",
                            result.transactions.len(),
                            path.display()
                        )),
                        Err(err) => {
                            dash_error!("Export failed: {}", err);
                            notices.push(format!("Export failed: {err}"));
                        }
                    }
                }
                Effect::ShowAlert { message } => notices.push(format!("! {message}")),
            }
        }
        notices
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

struct MsgSink {
    loop_tx: mpsc::Sender<LoopEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.loop_tx.send(LoopEvent::Msg(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProbeFinished(status) => Msg::ProbeCompleted(status),
        EngineEvent::UploadFinished { attempt, result } => Msg::UploadCompleted {
            attempt,
            result: result.map_err(|err| {
                dash_warn!("Upload attempt {} failed: {}", attempt, err);
                map_failure(err)
            }),
        },
        EngineEvent::CountersAdvanced {
            transactions,
            fraud,
        } => Msg::AnimatorTick {
            transactions,
            fraud,
        },
    }
}

fn map_failure(err: UploadError) -> UploadFailure {
    match err {
        UploadError::Transport(TransportError::HttpStatus { status, detail }) => {
            UploadFailure::new(UploadFailureKind::HttpStatus(status), detail)
        }
        UploadError::Transport(other) => {
            UploadFailure::new(UploadFailureKind::Transport, other.to_string())
        }
        UploadError::Decode(other) => {
            UploadFailure::new(UploadFailureKind::Decode, other.to_string())
        }
    }
}
