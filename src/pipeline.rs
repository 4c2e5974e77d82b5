use crate::config::PipelineConfig;
use crate::error::Result;
use crate::grouping::group_by_incident;
use crate::loader::{incident_records, load_inputs, LoadReport};
use crate::output::{card_path, write_card, write_card_json};
use crate::transform::build_card;
use crate::types::CardSummaryRow;
use crate::util::format_int;
use std::path::{Path, PathBuf};
use tracing::{error, info, info_span, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessSummary {
    pub load: Option<LoadReport>,
    pub groups: usize,
    pub written: usize,
    pub integrity_skipped: usize,
    pub format_failed: usize,
    pub files: Vec<PathBuf>,
    pub rows: Vec<CardSummaryRow>,
}

/// Load, join, group, and write one card per consistent incident.
///
/// A group that fails validation or parsing is logged and skipped; the rest of
/// the batch still runs. Only input, schema and write failures abort the run.
pub fn run(config: &PipelineConfig) -> Result<ProcessSummary> {
    let (joined, load) = load_inputs(&config.incident_path, &config.revenue_path)?;
    let records = incident_records(&joined)?;
    let groups = group_by_incident(&records);
    if groups.is_empty() {
        warn!("no joined rows, nothing to render");
    }

    let mut summary = ProcessSummary {
        load: Some(load),
        groups: groups.len(),
        ..Default::default()
    };

    for group in &groups {
        let span = info_span!("incident", id = %group.incident_id);
        let _enter = span.enter();

        let (compensation, outcome) = match build_card(group) {
            Ok(Some(card)) => {
                info!("Data transformed");
                let target = card_path(&config.out_dir, &card.idx, "html");
                if summary.files.contains(&target) {
                    warn!(
                        path = %target.display(),
                        "card file already written in this run, overwriting"
                    );
                }
                let path = write_card(&config.out_dir, &card)?;
                if config.write_json {
                    summary.files.push(write_card_json(&config.out_dir, &card)?);
                }
                info!(path = %path.display(), "Data saved");
                summary.files.push(path);
                summary.written += 1;
                (card.compensation, "saved".to_string())
            }
            Ok(None) => {
                summary.integrity_skipped += 1;
                ("-".to_string(), "invariant mismatch".to_string())
            }
            Err(e) => {
                error!(error = %e, "incident skipped");
                summary.format_failed += 1;
                ("-".to_string(), "format error".to_string())
            }
        };
        summary.rows.push(CardSummaryRow {
            incident_id: group.incident_id.clone(),
            rows: group.rows.len(),
            compensation,
            outcome,
        });
    }

    info!(
        incidents = %format_int(summary.groups),
        written = summary.written,
        integrity_skipped = summary.integrity_skipped,
        format_failed = summary.format_failed,
        "run finished"
    );
    Ok(summary)
}

/// Build cards for the two logs into the working directory. Outcomes are only
/// visible through the written files and the log.
pub fn process(incident_path: impl AsRef<Path>, revenue_path: impl AsRef<Path>) {
    let config = PipelineConfig::new(incident_path.as_ref(), revenue_path.as_ref());
    if let Err(e) = run(&config) {
        error!(error = %e, "Fatal error");
    }
}
