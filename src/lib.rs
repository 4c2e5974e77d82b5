//! Incident cards: joins an incident log with a revenue log and renders one
//! HTML card per incident.
//!
//! The interesting part is [`transform::build_card`], which checks that all
//! rows of an incident agree on the incident-level fields and aggregates the
//! per-customer rows into report values.
pub mod config;
pub mod error;
pub mod grouping;
pub mod loader;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod transform;
pub mod types;
pub mod util;

pub use config::PipelineConfig;
pub use error::{CardError, IntegrityViolation, LogInitError, PipelineError};
pub use pipeline::{process, run, ProcessSummary};
pub use types::IncidentCard;
