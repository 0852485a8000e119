//! Turns console lines into dashboard input.
//!
//! Dragging files onto most terminals pastes their paths, so a bare line of
//! paths is treated as a drop. `open <path>` is the picker.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dashboard_logging::{dash_debug, dash_warn};
use fraudscope_core::CandidateFile;
use fraudscope_engine::REQUIRED_COLUMNS;
use thiserror::Error;

const COMMANDS: &str = "\
Commands:
  <path> [<path>...]   drop file(s) onto the dashboard (first one is used)
  open <path>          pick a file to upload
  drag | leave         toggle the drop-zone highlight
  export               save the full result set as CSV
  dismiss              clear the upload status notice
  status               redraw the dashboard
  help                 show this help
  quit                 exit";

pub fn help_text() -> String {
    format!(
        "{COMMANDS}\nThe CSV must contain the columns: {}",
        REQUIRED_COLUMNS.join(", ")
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Drop(Vec<PathBuf>),
    Pick(Vec<PathBuf>),
    DragEnter,
    DragLeave,
    Export,
    Dismiss,
    Status,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_line(line: &str) -> ConsoleInput {
    let words = match shell_words::split(line.trim()) {
        Ok(words) => words,
        Err(err) => return ConsoleInput::Invalid(err.to_string()),
    };
    let Some((first, rest)) = words.split_first() else {
        return ConsoleInput::Empty;
    };

    match first.as_str() {
        "open" | "pick" if rest.is_empty() => {
            ConsoleInput::Invalid("open needs a file path".to_string())
        }
        "open" | "pick" => ConsoleInput::Pick(rest.iter().map(PathBuf::from).collect()),
        "drag" => ConsoleInput::DragEnter,
        "leave" => ConsoleInput::DragLeave,
        "export" => ConsoleInput::Export,
        "dismiss" => ConsoleInput::Dismiss,
        "status" => ConsoleInput::Status,
        "help" | "?" => ConsoleInput::Help,
        "quit" | "exit" => ConsoleInput::Quit,
        _ => ConsoleInput::Drop(words.iter().map(PathBuf::from).collect()),
    }
}

#[derive(Debug, Error)]
#[error("cannot read {}: {source}", .path.display())]
pub struct ReadError {
    pub path: PathBuf,
    source: io::Error,
}

/// Reads the first offered path into a candidate. Later paths are discarded
/// unread.
pub fn load_first_candidate(paths: &[PathBuf]) -> Result<Vec<CandidateFile>, ReadError> {
    let Some((path, rest)) = paths.split_first() else {
        return Ok(Vec::new());
    };
    if !rest.is_empty() {
        dash_debug!("Discarding {} extra path(s)", rest.len());
    }
    let bytes = fs::read(path).map_err(|source| {
        dash_warn!("Cannot read {}: {}", path.display(), source);
        ReadError {
            path: path.clone(),
            source,
        }
    })?;
    let file = CandidateFile::new(display_name(path), bytes);
    dash_debug!("Loaded {:?} ({} bytes)", file.name, file.bytes.len());
    Ok(vec![file])
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_paths_are_a_drop() {
        assert_eq!(
            parse_line("'/home/op/My Batch.csv' /tmp/other.csv"),
            ConsoleInput::Drop(vec![
                PathBuf::from("/home/op/My Batch.csv"),
                PathBuf::from("/tmp/other.csv"),
            ])
        );
        assert_eq!(
            parse_line(r"/home/op/My\ Batch.csv"),
            ConsoleInput::Drop(vec![PathBuf::from("/home/op/My Batch.csv")])
        );
    }

    #[test]
    fn quoted_windows_path_keeps_backslashes() {
        assert_eq!(
            parse_line(r#""C:\data\batch.csv""#),
            ConsoleInput::Drop(vec![PathBuf::from(r"C:\data\batch.csv")])
        );
        assert_eq!(
            parse_line(r"open 'C:\My Data\jan.csv'"),
            ConsoleInput::Pick(vec![PathBuf::from(r"C:\My Data\jan.csv")])
        );
    }

    #[test]
    fn help_lists_required_columns() {
        let help = help_text();
        assert!(help.starts_with("Commands:"));
        assert!(help.ends_with("amount, time, v1, v2, v3"));
    }

    #[test]
    fn open_is_a_pick() {
        assert_eq!(
            parse_line("open \"data/jan.csv\""),
            ConsoleInput::Pick(vec![PathBuf::from("data/jan.csv")])
        );
        assert!(matches!(parse_line("open"), ConsoleInput::Invalid(_)));
    }

    #[test]
    fn commands_and_blank_lines() {
        assert_eq!(parse_line("  "), ConsoleInput::Empty);
        assert_eq!(parse_line("export"), ConsoleInput::Export);
        assert_eq!(parse_line("dismiss"), ConsoleInput::Dismiss);
        assert_eq!(parse_line("quit"), ConsoleInput::Quit);
        assert_eq!(parse_line("drag"), ConsoleInput::DragEnter);
        assert!(matches!(parse_line("'oops"), ConsoleInput::Invalid(_)));
    }

    #[test]
    fn only_first_path_is_read() {
        let temp = tempfile::TempDir::new().unwrap();
        let first = temp.path().join("batch.csv");
        fs::write(&first, "amount,time,v1,v2,v3\n").unwrap();

        let files =
            load_first_candidate(&[first, temp.path().join("missing.csv")]).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "batch.csv");
        assert_eq!(files[0].bytes, b"amount,time,v1,v2,v3\n");
    }

    #[test]
    fn unreadable_first_path_is_not_replaced_by_later_ones() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("missing.csv");
        let second = temp.path().join("batch.csv");
        fs::write(&second, "amount,time,v1,v2,v3\n").unwrap();

        let err = load_first_candidate(&[missing.clone(), second]).unwrap_err();

        assert_eq!(err.path, missing);
        assert!(err.to_string().starts_with("cannot read"));
    }
}
