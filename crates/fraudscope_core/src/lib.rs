//! FraudScope core: pure upload state machine and view-model helpers.
mod effect;
pub mod intake;
mod model;
mod msg;
mod results;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use intake::{IntakeError, ACCEPTED_EXTENSION};
pub use model::{
    AnalysisResult, AttemptId, BackendStatus, CandidateFile, DashboardCounters, RiskStatus,
    TransactionResult, UploadFailure, UploadFailureKind, UploadPhase,
};
pub use msg::Msg;
pub use results::ResultView;
pub use state::AppState;
pub use update::{update, UPLOAD_BUSY_ALERT};
pub use view_model::{AppViewModel, ResultSummary, TransactionRowView, DISPLAY_LIMIT};
