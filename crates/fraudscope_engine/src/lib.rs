//! FraudScope engine: backend IO, payload codec and effect execution.
mod animator;
mod backend;
pub mod codec;
mod engine;
mod persist;
mod types;

pub use animator::{draw_increment, run_animator, AnimatorSettings, CounterIncrement};
pub use backend::{BackendSettings, ReqwestBackend, ScoringBackend, UPLOAD_PATH};
pub use codec::{
    decode_analysis, export_csv, export_filename, parse_export, ExportedRow, REQUIRED_COLUMNS,
};
pub use engine::{EngineError, EngineHandle, EngineSettings, EventSink};
pub use persist::{ensure_export_dir, ExportWriter, PersistError};
pub use types::{DecodeError, EngineEvent, ProbeError, TransportError, UploadError};
