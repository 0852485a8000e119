use crate::{AnalysisResult, TransactionResult};

/// Rows shown in the result table; the remainder is counted as hidden.
pub const DISPLAY_LIMIT: usize = 10;

/// Holds the last successful batch. The full set backs export, the capped
/// slice backs rendering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultView {
    held: Option<AnalysisResult>,
}

impl ResultView {
    pub fn full(&self) -> Option<&AnalysisResult> {
        self.held.as_ref()
    }

    pub fn display_slice(&self) -> &[TransactionResult] {
        match &self.held {
            Some(result) => {
                let end = result.transactions.len().min(DISPLAY_LIMIT);
                &result.transactions[..end]
            }
            None => &[],
        }
    }

    pub fn hidden_count(&self) -> u64 {
        self.held
            .as_ref()
            .map(|result| result.total_rows.saturating_sub(DISPLAY_LIMIT as u64))
            .unwrap_or(0)
    }

    pub(crate) fn install(&mut self, result: AnalysisResult) {
        self.held = Some(result);
    }
}
