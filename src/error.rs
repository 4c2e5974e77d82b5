use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort the whole run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV read failed in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("missing column `{column}` in {table}")]
    MissingColumn { table: String, column: String },

    #[error("joined row {row} does not match the incident schema: {source}")]
    Schema {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("template rendering failed for incident {incident}: {source}")]
    Render {
        incident: String,
        #[source]
        source: askama::Error,
    },

    #[error("JSON serialization failed for incident {incident}: {source}")]
    Json {
        incident: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The log file cannot be opened at startup.
#[derive(Error, Debug)]
pub enum LogInitError {
    #[error("cannot create log directory {path}: {source}")]
    Dir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open log file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: tracing_appender::rolling::InitError,
    },
}

/// A value inside one incident group does not have the expected shape.
/// Fatal for that group only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CardError {
    #[error("incident {incident}: `{field}` value {value:?} is not a YYYY-MM-DDTHH:MM:SS.ffffff timestamp")]
    Timestamp {
        incident: String,
        field: &'static str,
        value: String,
    },

    #[error("incident {incident}: no digits in `{field}` value {value:?}")]
    NoDigits {
        incident: String,
        field: &'static str,
        value: String,
    },

    #[error("incident {incident}: `{field}` value {value:?} is not a number (customer {customer})")]
    Amount {
        incident: String,
        field: &'static str,
        customer: String,
        value: String,
    },
}

/// An invariant field takes more than one value inside an incident group.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergentField {
    pub field: &'static str,
    pub distinct: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityViolation {
    pub incident: String,
    pub fields: Vec<DivergentField>,
}

impl fmt::Display for DivergentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` has {} values", self.field, self.distinct)
    }
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "incident {}: invariant fields are not unique: ", self.incident)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for IntegrityViolation {}

pub type Result<T> = std::result::Result<T, PipelineError>;
