//! Normalises drop and picker input into a single validated candidate.

use thiserror::Error;

use crate::CandidateFile;

pub const ACCEPTED_EXTENSION: &str = ".csv";
pub const EXTENSION_ALERT: &str = "Please upload a CSV file.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("unsupported file {name:?}: expected a .csv file")]
    UnsupportedExtension { name: String },
}

impl IntakeError {
    /// Text of the blocking notice shown to the operator.
    pub fn alert_message(&self) -> &'static str {
        match self {
            IntakeError::UnsupportedExtension { .. } => EXTENSION_ALERT,
        }
    }
}

/// Takes the first offered file; the rest are dropped.
pub fn first_candidate(files: Vec<CandidateFile>) -> Option<CandidateFile> {
    files.into_iter().next()
}

/// Case-sensitive suffix check on the file name.
pub fn validate_candidate(file: &CandidateFile) -> Result<(), IntakeError> {
    if file.name.ends_with(ACCEPTED_EXTENSION) {
        Ok(())
    } else {
        Err(IntakeError::UnsupportedExtension {
            name: file.name.clone(),
        })
    }
}
