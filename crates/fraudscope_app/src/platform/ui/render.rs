use fraudscope_core::{AppViewModel, TransactionRowView, UploadPhase};
use fraudscope_engine::codec::format_fixed;
use fraudscope_engine::REQUIRED_COLUMNS;

const RULE: &str = "------------------------------------------------------------------------";

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(RULE.to_string());
    lines.push(format!(
        "FraudScope | Backend: {} | Transactions: {} | Fraud detected: {} | Red flags: {} | Uptime: {}",
        view.backend_status.label(),
        format_with_commas(view.counters.total_transactions),
        format_with_commas(view.counters.fraud_detected),
        format_with_commas(view.counters.red_flags),
        view.counters.uptime_label
    ));

    let drop_zone = if view.drag_active {
        "Drop zone: release to upload"
    } else {
        "Drop zone: drag a CSV here or type `open <path>`"
    };
    lines.push(drop_zone.to_string());
    lines.push(format!("Required columns: {}", REQUIRED_COLUMNS.join(", ")));
    lines.push(format!("Upload: {}", phase_label(view.phase)));
    if let Some(notice) = &view.failure_notice {
        lines.push(format!("! {notice}"));
    }

    if let Some(summary) = &view.summary {
        lines.push(format!(
            "Results for {}: {} rows, {} safe, {} fraud",
            summary.filename,
            format_with_commas(summary.total_rows),
            format_with_commas(summary.safe_count),
            format_with_commas(summary.fraud_count)
        ));
        lines.push(format!(
            "{:>6}  {:>12}  {:<20}  {:>6}  {:<8}  {}",
            "Row", "Amount", "Time", "Risk", "Status", "Flagged by"
        ));
        lines.extend(view.rows.iter().map(row_line));
        if view.hidden_rows > 0 {
            lines.push(format!(
                "... {} more rows hidden (export to see all)",
                format_with_commas(view.hidden_rows)
            ));
        }
    }

    if view.can_export {
        lines.push("Type `export` to save the full results as CSV.".to_string());
    }
    lines
}

fn phase_label(phase: UploadPhase) -> &'static str {
    match phase {
        UploadPhase::Idle => "Ready",
        UploadPhase::Uploading => "Analyzing...",
        UploadPhase::Success => "Analysis complete",
        UploadPhase::Error => "Failed",
    }
}

fn row_line(row: &TransactionRowView) -> String {
    format!(
        "{:>6}  {:>12}  {:<20}  {:>5}%  {:<8}  {}",
        row.row_index,
        format_fixed(row.amount, 2),
        row.time,
        format_fixed(row.risk_score, 1),
        row.status.label(),
        row.flagged_by
    )
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
