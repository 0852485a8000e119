use crate::{AnalysisResult, AttemptId, BackendStatus, CandidateFile, UploadFailure};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Dashboard mounted: kick off the probe and the animator.
    Started,
    /// Pointer drag entered the drop zone.
    DragEntered,
    /// Pointer drag left the drop zone without dropping.
    DragLeft,
    /// Files released on the drop zone.
    FilesDropped(Vec<CandidateFile>),
    /// Files chosen through the picker.
    FilesPicked(Vec<CandidateFile>),
    /// Backend answered (or failed) an upload attempt.
    UploadCompleted {
        attempt: AttemptId,
        result: Result<AnalysisResult, UploadFailure>,
    },
    /// User dismissed the success/error notice.
    StatusDismissed,
    /// User asked for a CSV export of the held result.
    ExportClicked,
    /// Outcome of the one-shot liveness probe.
    ProbeCompleted(BackendStatus),
    /// Synthetic counter increments from the animator.
    AnimatorTick { transactions: u64, fraud: u64 },
}
