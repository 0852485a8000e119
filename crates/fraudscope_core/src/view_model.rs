use crate::{BackendStatus, DashboardCounters, RiskStatus, TransactionResult, UploadPhase};

pub use crate::results::DISPLAY_LIMIT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub filename: String,
    pub total_rows: u64,
    pub safe_count: u64,
    pub fraud_count: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub phase: UploadPhase,
    pub failure_notice: Option<String>,
    pub drag_active: bool,
    pub backend_status: BackendStatus,
    pub counters: DashboardCounters,
    pub summary: Option<ResultSummary>,
    pub rows: Vec<TransactionRowView>,
    pub hidden_rows: u64,
    pub can_export: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRowView {
    pub row_index: u64,
    pub amount: f64,
    pub time: String,
    pub risk_score: f64,
    pub flagged_by: String,
    pub status: RiskStatus,
}

impl From<&TransactionResult> for TransactionRowView {
    fn from(tx: &TransactionResult) -> Self {
        Self {
            row_index: tx.row_index,
            amount: tx.amount,
            time: tx.time.clone(),
            risk_score: tx.risk_score,
            flagged_by: tx.flagged_by.clone(),
            status: tx.status(),
        }
    }
}
