//! Wire formats: multipart upload body, JSON analysis payload and the CSV
//! export.

use fraudscope_core::{AnalysisResult, CandidateFile, RiskStatus, TransactionResult};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::{DecodeError, TransportError};

/// Multipart field the backend reads the batch from.
pub const UPLOAD_FIELD: &str = "file";

/// Columns the backend requires in the uploaded CSV. Informational only;
/// nothing on this side inspects the file.
pub const REQUIRED_COLUMNS: [&str; 5] = ["amount", "time", "v1", "v2", "v3"];

pub const EXPORT_HEADER: [&str; 6] = [
    "Row ID",
    "Amount",
    "Time",
    "Risk Score",
    "Flagged By",
    "Status",
];

/// Wraps the raw file into a single-part multipart form.
pub fn encode_upload(file: CandidateFile) -> Result<Form, TransportError> {
    let part = Part::bytes(file.bytes)
        .file_name(file.name)
        .mime_str("text/csv")
        .map_err(|err| TransportError::ClientBuild(err.to_string()))?;
    Ok(Form::new().part(UPLOAD_FIELD, part))
}

#[derive(Debug, Deserialize)]
struct AnalysisPayload {
    #[serde(default)]
    filename: String,
    total_rows: u64,
    safe_detected: u64,
    fraud_detected: u64,
    transactions: Vec<TransactionPayload>,
}

#[derive(Debug, Deserialize)]
struct TransactionPayload {
    row_index: u64,
    amount: f64,
    time: TimeLabel,
    risk_score: f64,
    flagged_by: String,
    is_fraud: bool,
    red_flag: bool,
}

/// The scoring service sends the raw `time` column, which is numeric in the
/// reference datasets.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimeLabel {
    Text(String),
    Number(f64),
}

impl TimeLabel {
    fn into_label(self) -> String {
        match self {
            TimeLabel::Text(text) => text,
            TimeLabel::Number(value) => format_number(value),
        }
    }
}

/// Parses a success body into an [`AnalysisResult`], rejecting payloads whose
/// counts or rows break the model invariants.
pub fn decode_analysis(bytes: &[u8]) -> Result<AnalysisResult, DecodeError> {
    let payload: AnalysisPayload =
        serde_json::from_slice(bytes).map_err(|err| DecodeError::Json(err.to_string()))?;

    let result = AnalysisResult {
        filename: payload.filename,
        total_rows: payload.total_rows,
        safe_count: payload.safe_detected,
        fraud_count: payload.fraud_detected,
        transactions: payload
            .transactions
            .into_iter()
            .map(|tx| TransactionResult {
                row_index: tx.row_index,
                amount: tx.amount,
                time: tx.time.into_label(),
                risk_score: tx.risk_score,
                flagged_by: tx.flagged_by,
                is_fraud: tx.is_fraud,
                is_red_flag: tx.red_flag,
            })
            .collect(),
    };
    result
        .check_invariants()
        .map_err(DecodeError::Inconsistent)?;
    Ok(result)
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    detail: serde_json::Value,
}

/// Pulls the `detail` message out of an error body, if there is one.
pub fn decode_error_detail(bytes: &[u8]) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_slice(bytes).ok()?;
    match payload.detail {
        serde_json::Value::String(text) => Some(text),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Shortest decimal text for a number: `5.0` becomes `5`, `88.4` stays `88.4`.
pub fn format_number(value: f64) -> String {
    format!("{}", without_negative_zero(value))
}

/// Fixed-point text with `digits` decimals. Exact halves round away from
/// zero and `-0.0` prints as zero.
pub fn format_fixed(value: f64, digits: u32) -> String {
    let value = without_negative_zero(value);
    let precision = digits as usize;
    // A binary double is an exact decimal half at `digits` places only when
    // it is an odd multiple of 2^-(digits + 1).
    let halves = value * 2f64.powi(digits as i32 + 1);
    if halves.is_finite() && halves.fract() == 0.0 && halves % 2.0 != 0.0 {
        let scale = 10f64.powi(digits as i32);
        let rounded = ((value.abs() * scale).floor() + 1.0) / scale;
        return format!("{:.*}", precision, rounded.copysign(value));
    }
    format!("{value:.precision$}")
}

fn without_negative_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

pub fn export_filename(unix_millis: i64) -> String {
    format!("Fraud_Analysis_Results_{unix_millis}.csv")
}

/// Renders the full result set, in backend order, as comma-separated text.
pub fn export_csv(result: &AnalysisResult) -> String {
    let mut lines = Vec::with_capacity(result.transactions.len() + 1);
    lines.push(EXPORT_HEADER.join(","));
    for tx in &result.transactions {
        lines.push(format!(
            "{},{},{},{}%,{},{}",
            tx.row_index,
            format_fixed(tx.amount, 2),
            quote_if_needed(&tx.time),
            format_number(tx.risk_score),
            quote(&tx.flagged_by),
            tx.status().label()
        ));
    }
    lines.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn quote_if_needed(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}

/// One line of an export read back from text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedRow {
    pub row_index: u64,
    pub amount: f64,
    pub time: String,
    pub risk_score: f64,
    pub flagged_by: String,
    pub status: RiskStatus,
}

/// Reads text produced by [`export_csv`] back into rows.
pub fn parse_export(text: &str) -> Result<Vec<ExportedRow>, DecodeError> {
    let mut records = parse_records(text)?.into_iter();
    let header = records.next().ok_or_else(|| malformed(1, "missing header"))?;
    if header != EXPORT_HEADER {
        return Err(malformed(1, "unexpected header"));
    }

    records
        .enumerate()
        .map(|(i, record)| parse_row(i + 2, record))
        .collect()
}

fn parse_row(line: usize, record: Vec<String>) -> Result<ExportedRow, DecodeError> {
    let [row_index, amount, time, risk, flagged_by, status]: [String; 6] = record
        .try_into()
        .map_err(|fields: Vec<String>| {
            malformed(line, &format!("expected 6 fields, found {}", fields.len()))
        })?;

    let risk = risk
        .strip_suffix('%')
        .ok_or_else(|| malformed(line, "risk score without %"))?;
    Ok(ExportedRow {
        row_index: row_index
            .parse()
            .map_err(|_| malformed(line, "invalid row id"))?,
        amount: amount.parse().map_err(|_| malformed(line, "invalid amount"))?,
        time,
        risk_score: risk.parse().map_err(|_| malformed(line, "invalid risk score"))?,
        flagged_by,
        status: RiskStatus::from_label(&status)
            .ok_or_else(|| malformed(line, "unknown status"))?,
    })
}

fn malformed(line: usize, message: &str) -> DecodeError {
    DecodeError::MalformedExport {
        line,
        message: message.to_string(),
    }
}

/// Quote-aware record splitter: doubled quotes inside quoted fields, quoted
/// line breaks, and `\r\n` endings.
fn parse_records(text: &str) -> Result<Vec<Vec<String>>, DecodeError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            '"' => return Err(malformed(line, "stray quote")),
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                line += 1;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(malformed(line, "unterminated quoted field"));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}
