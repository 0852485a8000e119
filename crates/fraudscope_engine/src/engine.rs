use std::io;
use std::sync::Arc;
use std::thread;

use dashboard_logging::{dash_debug, dash_info, dash_warn};
use fraudscope_core::{AttemptId, BackendStatus, CandidateFile};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::animator::{run_animator, AnimatorSettings};
use crate::backend::{BackendSettings, ReqwestBackend, ScoringBackend};
use crate::{EngineEvent, TransportError};

/// Receives engine events on whatever thread produced them.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub backend: BackendSettings,
    pub animator: AnimatorSettings,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

enum EngineCommand {
    Probe,
    Submit {
        attempt: AttemptId,
        file: CandidateFile,
    },
    StartAnimator,
}

/// Runs backend calls and the animator on a single-threaded tokio runtime
/// owned by a worker thread. Dropping the handle cancels the animator.
pub struct EngineHandle {
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let backend = ReqwestBackend::new(settings.backend)?;
        dash_info!("Scoring backend at {}", backend.base_url());
        Self::with_backend(Arc::new(backend), settings.animator, sink)
    }

    pub fn with_backend(
        backend: Arc<dyn ScoringBackend>,
        animator: AnimatorSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        thread::Builder::new()
            .name("fraudscope-engine".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let mut animator_started = false;
                    while let Some(command) = cmd_rx.recv().await {
                        match command {
                            EngineCommand::StartAnimator if animator_started => {
                                dash_debug!("Animator already running");
                            }
                            EngineCommand::StartAnimator => {
                                animator_started = true;
                                let sink = sink.clone();
                                let cancel = task_cancel.clone();
                                let settings = animator.clone();
                                tokio::spawn(async move {
                                    run_animator(settings, cancel, sink.as_ref()).await;
                                    dash_debug!("Animator stopped");
                                });
                            }
                            command => {
                                let backend = backend.clone();
                                let sink = sink.clone();
                                tokio::spawn(async move {
                                    handle_command(backend.as_ref(), command, sink.as_ref()).await;
                                });
                            }
                        }
                    }
                    task_cancel.cancel();
                });
            })?;

        Ok(Self { cmd_tx, cancel })
    }

    pub fn probe(&self) {
        self.send(EngineCommand::Probe);
    }

    pub fn submit(&self, attempt: AttemptId, file: CandidateFile) {
        self.send(EngineCommand::Submit { attempt, file });
    }

    pub fn start_animator(&self) {
        self.send(EngineCommand::StartAnimator);
    }

    /// Stops the animator. In-flight uploads are left to finish.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            dash_warn!("Engine worker is gone; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn handle_command(
    backend: &dyn ScoringBackend,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Probe => {
            let status = match backend.probe().await {
                Ok(()) => BackendStatus::Connected,
                Err(err) => {
                    dash_warn!("Liveness probe failed: {}", err);
                    BackendStatus::Disconnected
                }
            };
            sink.emit(EngineEvent::ProbeFinished(status));
        }
        EngineCommand::Submit { attempt, file } => {
            let result = backend.upload(file).await;
            sink.emit(EngineEvent::UploadFinished { attempt, result });
        }
        EngineCommand::StartAnimator => {}
    }
}
