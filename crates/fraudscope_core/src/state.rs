use crate::results::ResultView;
use crate::view_model::{AppViewModel, ResultSummary, TransactionRowView};
use crate::{
    AnalysisResult, AttemptId, BackendStatus, DashboardCounters, UploadFailure, UploadPhase,
};

/// Session state. Owned by the event loop; changed only through `update`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    phase: UploadPhase,
    in_flight: Option<AttemptId>,
    next_attempt: AttemptId,
    last_failure: Option<UploadFailure>,
    drag_active: bool,
    backend_status: BackendStatus,
    counters: DashboardCounters,
    results: ResultView,
    started: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn counters(&self) -> &DashboardCounters {
        &self.counters
    }

    pub fn held_result(&self) -> Option<&AnalysisResult> {
        self.results.full()
    }

    pub fn view(&self) -> AppViewModel {
        let summary = self.results.full().map(|result| ResultSummary {
            filename: result.filename.clone(),
            total_rows: result.total_rows,
            safe_count: result.safe_count,
            fraud_count: result.fraud_count,
        });
        AppViewModel {
            phase: self.phase,
            failure_notice: self.last_failure.as_ref().map(|_| {
                "Upload failed. Check the backend and the file format, then try again."
                    .to_string()
            }),
            drag_active: self.drag_active,
            backend_status: self.backend_status,
            counters: self.counters.clone(),
            summary,
            rows: self
                .results
                .display_slice()
                .iter()
                .map(TransactionRowView::from)
                .collect(),
            hidden_rows: self.results.hidden_count(),
            can_export: self.results.full().is_some(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        self.backend_status = BackendStatus::Checking;
        self.mark_dirty();
        true
    }

    pub(crate) fn set_drag_active(&mut self, active: bool) {
        if self.drag_active != active {
            self.drag_active = active;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_upload(&mut self) -> AttemptId {
        self.next_attempt += 1;
        let attempt = self.next_attempt;
        self.phase = UploadPhase::Uploading;
        self.in_flight = Some(attempt);
        self.last_failure = None;
        self.mark_dirty();
        attempt
    }

    /// Clears the in-flight slot if `attempt` owns it.
    pub(crate) fn take_in_flight(&mut self, attempt: AttemptId) -> bool {
        if self.in_flight == Some(attempt) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn complete_success(&mut self, result: AnalysisResult) {
        self.counters.add_analysis(&result);
        self.results.install(result);
        self.phase = UploadPhase::Success;
        self.mark_dirty();
    }

    pub(crate) fn complete_failure(&mut self, failure: UploadFailure) {
        self.last_failure = Some(failure);
        self.phase = UploadPhase::Error;
        self.mark_dirty();
    }

    pub(crate) fn dismiss_status(&mut self) -> bool {
        match self.phase {
            UploadPhase::Success | UploadPhase::Error => {
                self.phase = UploadPhase::Idle;
                self.last_failure = None;
                self.mark_dirty();
                true
            }
            UploadPhase::Idle | UploadPhase::Uploading => false,
        }
    }

    pub(crate) fn set_backend_status(&mut self, status: BackendStatus) {
        self.backend_status = status;
        self.mark_dirty();
    }

    pub(crate) fn apply_animator_tick(&mut self, transactions: u64, fraud: u64) {
        if transactions == 0 && fraud == 0 {
            return;
        }
        self.counters.add_animator_tick(transactions, fraud);
        self.mark_dirty();
    }
}
