use crate::error::{PipelineError, Result};
use crate::types::{RawIncidentRecord, CUSTOMER_ID, INCIDENT_ID, INVARIANT_FIELDS};
use crate::util::format_int;
use csv::{ReaderBuilder, StringRecord};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Columns the card needs besides the invariant ones.
const ROW_FIELDS: [&str; 6] = [
    INCIDENT_ID,
    "Услуга",
    CUSTOMER_ID,
    "Статус",
    "% компенсации",
    "Выручка",
];

/// An in-memory delimited table. Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

impl Table {
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub incident_rows: usize,
    pub revenue_rows: usize,
    pub joined_rows: usize,
}

/// Read a `;`-separated file with a header row. Short records are padded with
/// empty cells and surplus cells are dropped.
pub fn read_table(path: &Path) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .map_err(|source| PipelineError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let csv_err = |source| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let headers = rdr.headers().map_err(csv_err)?.clone();
    let width = headers.len();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let mut record = result.map_err(csv_err)?;
        if record.len() > width {
            record.truncate(width);
        }
        while record.len() < width {
            record.push_field("");
        }
        rows.push(record);
    }
    debug!(path = %path.display(), rows = rows.len(), "table read");
    Ok(Table {
        name: path.display().to_string(),
        headers,
        rows,
    })
}

/// Inner join of `left` and `right` on the `key` column.
///
/// Columns: all of `left`, then `right` without the key. Names present on both
/// sides get `_x` / `_y` suffixes. Rows come in `left` order, each followed by
/// its matches in `right` order. A row with an empty key never matches.
pub fn merge_tables(left: &Table, right: &Table, key: &str) -> Result<Table> {
    let lk = left.column(key)?;
    let rk = right.column(key)?;

    let left_names: HashSet<&str> = left.headers.iter().filter(|h| *h != key).collect();
    let shared: HashSet<&str> = right
        .headers
        .iter()
        .filter(|h| *h != key && left_names.contains(h))
        .collect();
    let suffixed = |name: &str, suffix: &str| {
        if shared.contains(name) {
            format!("{}{}", name, suffix)
        } else {
            name.to_string()
        }
    };

    let mut headers = StringRecord::new();
    for h in left.headers.iter() {
        headers.push_field(&suffixed(h, "_x"));
    }
    for (i, h) in right.headers.iter().enumerate() {
        if i != rk {
            headers.push_field(&suffixed(h, "_y"));
        }
    }

    let mut by_key: HashMap<&str, Vec<&StringRecord>> = HashMap::new();
    for row in &right.rows {
        match row.get(rk) {
            Some(k) if !k.is_empty() => by_key.entry(k).or_default().push(row),
            _ => {}
        }
    }

    let mut rows = Vec::new();
    for lrow in &left.rows {
        let Some(matches) = lrow.get(lk).filter(|k| !k.is_empty()).and_then(|k| by_key.get(k))
        else {
            continue;
        };
        for rrow in matches {
            let mut joined = lrow.clone();
            for (i, cell) in rrow.iter().enumerate() {
                if i != rk {
                    joined.push_field(cell);
                }
            }
            rows.push(joined);
        }
    }

    Ok(Table {
        name: format!("{} + {}", left.name, right.name),
        headers,
        rows,
    })
}

/// Read both logs and join them on the customer identifier.
pub fn load_inputs(incident_path: &Path, revenue_path: &Path) -> Result<(Table, LoadReport)> {
    let incidents = read_table(incident_path)?;
    let revenue = read_table(revenue_path)?;
    info!(
        incident_rows = %format_int(incidents.len()),
        revenue_rows = %format_int(revenue.len()),
        "Files read"
    );

    let joined = merge_tables(&incidents, &revenue, CUSTOMER_ID)?;
    debug!(joined_rows = joined.len(), "tables merged");
    let report = LoadReport {
        incident_rows: incidents.len(),
        revenue_rows: revenue.len(),
        joined_rows: joined.len(),
    };
    Ok((joined, report))
}

/// Deserialize every joined row into a `RawIncidentRecord`. Empty cells
/// become `None`.
pub fn incident_records(table: &Table) -> Result<Vec<RawIncidentRecord>> {
    for column in INVARIANT_FIELDS.iter().chain(ROW_FIELDS.iter()) {
        table.column(column)?;
    }
    table
        .rows
        .iter()
        .enumerate()
        .map(|(row, record)| {
            record
                .deserialize::<RawIncidentRecord>(Some(&table.headers))
                .map_err(|source| PipelineError::Schema { row, source })
        })
        .collect()
}
