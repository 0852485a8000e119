use fraudscope_core::{AnalysisResult, RiskStatus, TransactionResult};
use fraudscope_engine::codec::format_fixed;
use fraudscope_engine::{decode_analysis, export_csv, parse_export, DecodeError};
use pretty_assertions::assert_eq;

const SCENARIO_A: &str = r#"{
  "total_rows": 3, "safe_detected": 2, "fraud_detected": 1,
  "transactions": [
    {"row_index":1,"amount":10.5,"time":"t1","risk_score":5,"flagged_by":"","is_fraud":false,"red_flag":false},
    {"row_index":2,"amount":999.99,"time":"t2","risk_score":88,"flagged_by":"RandomForest","is_fraud":true,"red_flag":false},
    {"row_index":3,"amount":50,"time":"t3","risk_score":97,"flagged_by":"IsolationForest","is_fraud":true,"red_flag":true}
  ]
}"#;

fn tx(
    row_index: u64,
    amount: f64,
    time: &str,
    by: &str,
    fraud: bool,
    red: bool,
) -> TransactionResult {
    TransactionResult {
        row_index,
        amount,
        time: time.to_string(),
        risk_score: if fraud { 91.25 } else { 4.0 },
        flagged_by: by.to_string(),
        is_fraud: fraud,
        is_red_flag: red,
    }
}

fn result_of(transactions: Vec<TransactionResult>) -> AnalysisResult {
    let fraud = transactions.iter().filter(|t| t.is_fraud).count() as u64;
    let total = transactions.len() as u64;
    AnalysisResult {
        filename: "batch.csv".to_string(),
        total_rows: total,
        safe_count: total - fraud,
        fraud_count: fraud,
        transactions,
    }
}

#[test]
fn decodes_scenario_a_payload() {
    let result = decode_analysis(SCENARIO_A.as_bytes()).expect("decode");

    assert_eq!(result.filename, "");
    assert_eq!(result.total_rows, 3);
    assert_eq!(result.safe_count + result.fraud_count, result.total_rows);
    let statuses: Vec<_> = result.transactions.iter().map(|t| t.status()).collect();
    assert_eq!(
        statuses,
        vec![RiskStatus::Safe, RiskStatus::Fraud, RiskStatus::Anomaly]
    );
    assert_eq!(result.transactions[2].amount, 50.0);
    assert_eq!(result.transactions[1].flagged_by, "RandomForest");
}

#[test]
fn numeric_time_becomes_label() {
    let body = r#"{"filename":"b.csv","total_rows":1,"safe_detected":1,"fraud_detected":0,
        "transactions":[{"row_index":1,"amount":2.5,"time":406.0,"risk_score":1.5,
        "flagged_by":"None","is_fraud":false,"red_flag":false}]}"#;

    let result = decode_analysis(body.as_bytes()).expect("decode");
    assert_eq!(result.filename, "b.csv");
    assert_eq!(result.transactions[0].time, "406");
}

#[test]
fn missing_field_is_decode_error() {
    let body = r#"{"total_rows":0,"safe_detected":0,"transactions":[]}"#;
    assert!(matches!(
        decode_analysis(body.as_bytes()),
        Err(DecodeError::Json(_))
    ));
}

#[test]
fn wrong_shape_is_decode_error() {
    let body = r#"{"total_rows":"3","safe_detected":0,"fraud_detected":0,"transactions":[]}"#;
    assert!(matches!(
        decode_analysis(body.as_bytes()),
        Err(DecodeError::Json(_))
    ));
    assert!(matches!(
        decode_analysis(b"<html>oops</html>"),
        Err(DecodeError::Json(_))
    ));
}

#[test]
fn inconsistent_counts_are_rejected() {
    let body = r#"{"total_rows":2,"safe_detected":2,"fraud_detected":1,"transactions":[]}"#;
    assert!(matches!(
        decode_analysis(body.as_bytes()),
        Err(DecodeError::Inconsistent(_))
    ));
}

#[test]
fn export_matches_expected_text() {
    let result = decode_analysis(SCENARIO_A.as_bytes()).expect("decode");

    let text = export_csv(&result);

    assert_eq!(
        text,
        "Row ID,Amount,Time,Risk Score,Flagged By,Status\n\
         1,10.50,t1,5%,\"\",SAFE\n\
         2,999.99,t2,88%,\"RandomForest\",FRAUD\n\
         3,50.00,t3,97%,\"IsolationForest\",ANOMALY"
    );
}

#[test]
fn empty_result_exports_header_only() {
    let result = result_of(Vec::new());

    let text = export_csv(&result);
    assert_eq!(text, "Row ID,Amount,Time,Risk Score,Flagged By,Status");
    assert!(parse_export(&text).expect("parse").is_empty());
}

#[test]
fn export_round_trips_rows() {
    let result = result_of(vec![
        tx(1, 0.004, "0", "None", false, false),
        tx(2, 12345.678, "10:02, Tue", "Random Forest, Isolation Forest", true, true),
        tx(3, 7.1, "say \"hi\"", "rule \"R7\"", true, false),
        tx(4, 100.0, "line\nbreak", "", false, false),
    ]);

    let rows = parse_export(&export_csv(&result)).expect("parse");

    assert_eq!(rows.len(), result.transactions.len());
    for (row, tx) in rows.iter().zip(&result.transactions) {
        assert_eq!(row.row_index, tx.row_index);
        assert_eq!(format_fixed(row.amount, 2), format_fixed(tx.amount, 2));
        assert_eq!(row.time, tx.time);
        assert_eq!(row.flagged_by, tx.flagged_by);
        assert_eq!(row.status, tx.status());
        assert_eq!(row.risk_score, tx.risk_score);
    }
}

#[test]
fn export_rounds_cent_halves_up_and_drops_negative_zero() {
    let mut rows = vec![
        tx(1, 0.125, "t", "", false, false),
        tx(2, 10.125, "t", "", false, false),
        tx(3, -0.0, "t", "", false, false),
    ];
    rows[2].risk_score = -0.0;
    let result = result_of(rows);
    result.check_invariants().expect("valid result");

    let text = export_csv(&result);

    assert_eq!(
        text,
        "Row ID,Amount,Time,Risk Score,Flagged By,Status\n\
         1,0.13,t,4%,\"\",SAFE\n\
         2,10.13,t,4%,\"\",SAFE\n\
         3,0.00,t,0%,\"\",SAFE"
    );
}

#[test]
fn export_is_idempotent() {
    let result = decode_analysis(SCENARIO_A.as_bytes()).expect("decode");
    assert_eq!(export_csv(&result), export_csv(&result));
}

#[test]
fn export_covers_rows_beyond_display_slice() {
    let result = result_of((1..=25).map(|i| tx(i, 1.0, "t", "", false, false)).collect());

    let rows = parse_export(&export_csv(&result)).expect("parse");
    assert_eq!(rows.len(), 25);
    assert_eq!(rows.last().map(|r| r.row_index), Some(25));
}

#[test]
fn parse_rejects_unknown_status() {
    let text = "Row ID,Amount,Time,Risk Score,Flagged By,Status\n1,1.00,t,1%,\"\",MAYBE";
    assert!(matches!(
        parse_export(text),
        Err(DecodeError::MalformedExport { line: 2, .. })
    ));
}
