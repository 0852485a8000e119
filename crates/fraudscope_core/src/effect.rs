use crate::{AnalysisResult, AttemptId, CandidateFile};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue the one-shot backend reachability check.
    ProbeBackend,
    /// Start the synthetic counter animator.
    StartAnimator,
    /// Encode the file and POST it to the scoring backend.
    SubmitUpload {
        attempt: AttemptId,
        file: CandidateFile,
    },
    /// Write the full result set to a CSV file.
    ExportCsv { result: AnalysisResult },
    /// Blocking notice for the operator.
    ShowAlert { message: String },
}
