use crate::error::{PipelineError, Result};
use crate::types::{CardSummaryRow, IncidentCard};
use askama::Template;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

#[derive(Template)]
#[template(path = "card.html")]
pub struct CardTemplate<'a> {
    pub card: &'a IncidentCard,
}

/// `card_<id>.html`, with any character outside `[A-Za-z0-9_.-]` in the
/// identifier replaced by `_`.
pub fn card_file_name(idx: &str, extension: &str) -> String {
    let safe: String = idx
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("card_{}.{}", safe, extension)
}

pub fn card_path(dir: &Path, idx: &str, extension: &str) -> PathBuf {
    dir.join(card_file_name(idx, extension))
}

pub fn render_card(card: &IncidentCard) -> Result<String> {
    CardTemplate { card }
        .render()
        .map_err(|source| PipelineError::Render {
            incident: card.idx.clone(),
            source,
        })
}

fn write_file(path: PathBuf, contents: &str) -> Result<PathBuf> {
    fs::write(&path, contents).map_err(|source| PipelineError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Render `card` and write it into `dir`. Returns the written path.
pub fn write_card(dir: &Path, card: &IncidentCard) -> Result<PathBuf> {
    let html = render_card(card)?;
    write_file(card_path(dir, &card.idx, "html"), &html)
}

pub fn write_card_json(dir: &Path, card: &IncidentCard) -> Result<PathBuf> {
    let s = serde_json::to_string_pretty(card).map_err(|source| PipelineError::Json {
        incident: card.idx.clone(),
        source,
    })?;
    write_file(card_path(dir, &card.idx, "json"), &s)
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no incidents)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

pub fn preview_summary(rows: &[CardSummaryRow], max_rows: usize) {
    preview_table_rows(rows, max_rows);
    if rows.len() > max_rows {
        println!("({} more incidents not shown)\n", rows.len() - max_rows);
    }
}
