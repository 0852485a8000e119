use std::fmt;

/// Identifier handed out to each accepted upload.
pub type AttemptId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Checking,
    Connected,
    Disconnected,
}

impl BackendStatus {
    pub fn label(self) -> &'static str {
        match self {
            BackendStatus::Checking => "Checking...",
            BackendStatus::Connected => "Connected",
            BackendStatus::Disconnected => "Disconnected",
        }
    }
}

/// A file offered through drop or picker. Moved into the upload effect and
/// never kept in state.
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskStatus {
    Safe,
    Fraud,
    Anomaly,
}

impl RiskStatus {
    pub fn label(self) -> &'static str {
        match self {
            RiskStatus::Safe => "SAFE",
            RiskStatus::Fraud => "FRAUD",
            RiskStatus::Anomaly => "ANOMALY",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "SAFE" => Some(RiskStatus::Safe),
            "FRAUD" => Some(RiskStatus::Fraud),
            "ANOMALY" => Some(RiskStatus::Anomaly),
            _ => None,
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scored row as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionResult {
    pub row_index: u64,
    pub amount: f64,
    pub time: String,
    pub risk_score: f64,
    pub flagged_by: String,
    pub is_fraud: bool,
    /// Set when the anomaly detector flagged the row. Always implies `is_fraud`.
    pub is_red_flag: bool,
}

impl TransactionResult {
    pub fn status(&self) -> RiskStatus {
        match (self.is_fraud, self.is_red_flag) {
            (false, _) => RiskStatus::Safe,
            (true, false) => RiskStatus::Fraud,
            (true, true) => RiskStatus::Anomaly,
        }
    }
}

/// A complete scored batch. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisResult {
    pub filename: String,
    pub total_rows: u64,
    pub safe_count: u64,
    pub fraud_count: u64,
    pub transactions: Vec<TransactionResult>,
}

impl AnalysisResult {
    pub fn red_flag_count(&self) -> u64 {
        self.transactions.iter().filter(|tx| tx.is_red_flag).count() as u64
    }

    /// Checks the count and per-row invariants, returning a description of
    /// the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.safe_count.checked_add(self.fraud_count) != Some(self.total_rows) {
            return Err(format!(
                "safe ({}) + fraud ({}) != total rows ({})",
                self.safe_count, self.fraud_count, self.total_rows
            ));
        }
        if self.transactions.len() as u64 != self.total_rows {
            return Err(format!(
                "{} transactions for {} total rows",
                self.transactions.len(),
                self.total_rows
            ));
        }
        for tx in &self.transactions {
            if !(tx.amount.is_finite() && tx.amount >= 0.0) {
                return Err(format!("row {}: invalid amount {}", tx.row_index, tx.amount));
            }
            if !(0.0..=100.0).contains(&tx.risk_score) {
                return Err(format!(
                    "row {}: risk score {} outside [0, 100]",
                    tx.row_index, tx.risk_score
                ));
            }
            if tx.is_red_flag && !tx.is_fraud {
                return Err(format!("row {}: red flag without fraud", tx.row_index));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardCounters {
    pub total_transactions: u64,
    pub fraud_detected: u64,
    pub red_flags: u64,
    pub uptime_label: String,
}

impl Default for DashboardCounters {
    fn default() -> Self {
        Self {
            total_transactions: 12_530,
            fraud_detected: 304,
            red_flags: 89,
            uptime_label: "99.9%".to_string(),
        }
    }
}

impl DashboardCounters {
    pub(crate) fn add_animator_tick(&mut self, transactions: u64, fraud: u64) {
        self.total_transactions = self.total_transactions.saturating_add(transactions);
        self.fraud_detected = self.fraud_detected.saturating_add(fraud);
    }

    pub(crate) fn add_analysis(&mut self, result: &AnalysisResult) {
        self.total_transactions = self.total_transactions.saturating_add(result.total_rows);
        self.fraud_detected = self.fraud_detected.saturating_add(result.fraud_count);
        self.red_flags = self.red_flags.saturating_add(result.red_flag_count());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFailureKind {
    Transport,
    HttpStatus(u16),
    Decode,
}

/// Why an upload attempt ended in the `Error` phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub kind: UploadFailureKind,
    pub message: String,
}

impl UploadFailure {
    pub fn new(kind: UploadFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            UploadFailureKind::Transport => write!(f, "transport error: {}", self.message),
            UploadFailureKind::HttpStatus(code) => {
                write!(f, "http status {code}: {}", self.message)
            }
            UploadFailureKind::Decode => write!(f, "decode error: {}", self.message),
        }
    }
}
