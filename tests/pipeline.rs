mod common;

use common::{incident_line, with_captured_logs, write_inputs};
use incident_cards::{run, PipelineConfig, PipelineError};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

const BEGIN: &str = "2023-03-01T10:00:00.000000";

fn config(dir: &Path, incident: PathBuf, revenue: PathBuf) -> PipelineConfig {
    PipelineConfig {
        out_dir: dir.to_path_buf(),
        ..PipelineConfig::new(incident, revenue)
    }
}

#[test]
fn consistent_incident_produces_one_card() {
    let dir = tempfile::tempdir().unwrap();
    let (inc, rev) = write_inputs(
        dir.path(),
        &[
            incident_line("100", BEGIN, "Internet", "c1", "10"),
            incident_line("100", BEGIN, "TV", "c2", "5"),
        ],
        &["c1;100", "c2;200"],
    );

    let summary = run(&config(dir.path(), inc, rev)).unwrap();
    assert_eq!(summary.groups, 1);
    assert_eq!(summary.written, 1);
    assert_eq!(summary.rows[0].compensation, "20.00");
    assert_eq!(summary.rows[0].outcome, "saved");

    let html = fs::read_to_string(dir.path().join("card_100.html")).unwrap();
    assert!(html.contains("20.00"));
    assert!(html.contains("Internet<br>TV"));
    assert!(html.contains("01/03/2023 <br> 10:00:00"));
    assert!(html.contains("2:30:15"));
    assert!(html.contains("Outage incore system"));
    // Highest revenue first.
    let c2 = html.find("<td>c2</td>").unwrap();
    let c1 = html.find("<td>c1</td>").unwrap();
    assert!(c2 < c1);
}

#[test]
fn diverging_begin_time_skips_incident_and_logs_once() {
    let dir = tempfile::tempdir().unwrap();
    let (inc, rev) = write_inputs(
        dir.path(),
        &[
            incident_line("100", BEGIN, "Internet", "c1", "10"),
            incident_line("100", "2023-03-01T10:05:00.000000", "Internet", "c2", "5"),
        ],
        &["c1;100", "c2;200"],
    );

    let cfg = config(dir.path(), inc, rev);
    let (summary, logs) = with_captured_logs(|| run(&cfg).unwrap());
    assert_eq!(summary.written, 0);
    assert_eq!(summary.integrity_skipped, 1);
    assert!(!dir.path().join("card_100.html").exists());
    assert_eq!(logs.matches("Immutable values are not unique").count(), 1);
    assert!(logs.contains("Начало аварии"));
    assert!(logs.contains("100"));
}

#[test]
fn bad_incident_does_not_block_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let (inc, rev) = write_inputs(
        dir.path(),
        &[
            incident_line("200", "01.03.2023 10:00", "Internet", "c1", "10"),
            incident_line("300", BEGIN, "Internet", "c2", "lots"),
            incident_line("100", BEGIN, "Internet", "c3", "10"),
        ],
        &["c1;100", "c2;200", "c3;300"],
    );

    let cfg = config(dir.path(), inc, rev);
    let (summary, logs) = with_captured_logs(|| run(&cfg).unwrap());
    let outcomes: Vec<(&str, &str)> = summary
        .rows
        .iter()
        .map(|r| (r.incident_id.as_str(), r.outcome.as_str()))
        .collect();
    assert_eq!(
        outcomes,
        vec![("200", "format error"), ("300", "format error"), ("100", "saved")]
    );
    assert_eq!(summary.format_failed, 2);
    assert!(dir.path().join("card_100.html").exists());
    assert!(!dir.path().join("card_200.html").exists());
    assert!(logs.contains("01.03.2023 10:00"));
    assert!(logs.contains("Data saved"));
}

#[test]
fn customers_without_revenue_are_dropped_by_the_join() {
    let dir = tempfile::tempdir().unwrap();
    let (inc, rev) = write_inputs(
        dir.path(),
        &[
            incident_line("5", BEGIN, "Internet", "c1", "10"),
            incident_line("5", BEGIN, "Internet", "ghost", "50"),
        ],
        &["c1;1 000,50"],
    );

    let summary = run(&config(dir.path(), inc, rev)).unwrap();
    assert_eq!(summary.rows[0].rows, 1);
    assert_eq!(summary.rows[0].compensation, "100.05");
}

#[test]
fn empty_join_does_no_work() {
    let dir = tempfile::tempdir().unwrap();
    let (inc, rev) = write_inputs(
        dir.path(),
        &[incident_line("1", BEGIN, "Internet", "c1", "10")],
        &["c9;100"],
    );

    let summary = run(&config(dir.path(), inc, rev)).unwrap();
    assert_eq!(summary.groups, 0);
    assert!(summary.files.is_empty());
}

#[test]
fn json_cards_are_written_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let (inc, rev) = write_inputs(
        dir.path(),
        &[incident_line("42", BEGIN, "Internet", "c1", "10")],
        &["c1;100"],
    );
    let cfg = PipelineConfig {
        write_json: true,
        ..config(dir.path(), inc, rev)
    };

    let summary = run(&cfg).unwrap();
    assert_eq!(summary.files.len(), 2);
    let json = fs::read_to_string(dir.path().join("card_42.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["number_inj"], "42");
    assert_eq!(value["planned_works"], "N/A");
}

#[test]
fn missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(
        dir.path(),
        dir.path().join("nope.csv"),
        dir.path().join("revenue.csv"),
    );
    let err = run(&cfg).unwrap_err();
    assert!(matches!(err, PipelineError::Open { .. }));
}

#[test]
fn missing_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let inc = dir.path().join("incident_data.csv");
    let rev = dir.path().join("revenue.csv");
    fs::write(&inc, "Порядковый номер аварии;Customer_care_user_id\n1;c1\n").unwrap();
    fs::write(&rev, "Customer_care_user_id;Выручка\nc1;10\n").unwrap();

    let err = run(&config(dir.path(), inc, rev)).unwrap_err();
    assert!(matches!(err, PipelineError::MissingColumn { .. }));
}

#[test]
fn ids_sharing_a_file_name_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (inc, rev) = write_inputs(
        dir.path(),
        &[
            incident_line("INC 7", BEGIN, "Internet", "c1", "10"),
            incident_line("INC/7", BEGIN, "Internet", "c2", "10"),
        ],
        &["c1;100", "c2;100"],
    );

    let cfg = config(dir.path(), inc, rev);
    let (summary, logs) = with_captured_logs(|| run(&cfg).unwrap());
    assert_eq!(summary.written, 2);
    assert!(dir.path().join("card_INC_7.html").exists());
    assert_eq!(logs.matches("already written in this run").count(), 1);
}
