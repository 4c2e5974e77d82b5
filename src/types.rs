use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Sentinel written in place of every missing value before comparison.
pub const MISSING: &str = "N/A";

pub const INCIDENT_ID: &str = "Порядковый номер аварии";
pub const CUSTOMER_ID: &str = "Customer_care_user_id";

/// Columns that must hold exactly one value across an incident group, in
/// report order. Names match `RawIncidentRecord`'s serde renames.
pub const INVARIANT_FIELDS: [&str; 12] = [
    "Начало аварии",
    "Конец аварии",
    "Точка отказа Сервис",
    "Точка отказа Система",
    "Точка отказа Проект",
    "Затронуло",
    "SLA",
    "Обратились",
    "Краткое описание аварии",
    "Детальное описание аварии",
    "Плановые работы",
    "Недоступность",
];

/// One row of the joined incident/revenue table, as read. Empty cells are `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIncidentRecord {
    #[serde(rename = "Порядковый номер аварии")]
    pub incident_id: Option<String>,
    #[serde(rename = "Начало аварии")]
    pub begin: Option<String>,
    #[serde(rename = "Конец аварии")]
    pub end: Option<String>,
    #[serde(rename = "Точка отказа Сервис")]
    pub failure_service: Option<String>,
    #[serde(rename = "Точка отказа Система")]
    pub failure_system: Option<String>,
    #[serde(rename = "Точка отказа Проект")]
    pub failure_project: Option<String>,
    #[serde(rename = "Затронуло")]
    pub affected: Option<String>,
    #[serde(rename = "SLA")]
    pub sla: Option<String>,
    #[serde(rename = "Обратились")]
    pub called: Option<String>,
    #[serde(rename = "Краткое описание аварии")]
    pub short_description: Option<String>,
    #[serde(rename = "Детальное описание аварии")]
    pub long_description: Option<String>,
    #[serde(rename = "Плановые работы")]
    pub planned_works: Option<String>,
    #[serde(rename = "Недоступность")]
    pub downtime: Option<String>,
    #[serde(rename = "Услуга")]
    pub service: Option<String>,
    #[serde(rename = "Customer_care_user_id")]
    pub customer_id: Option<String>,
    #[serde(rename = "Статус")]
    pub status: Option<String>,
    #[serde(rename = "% компенсации")]
    pub compensation_pct: Option<String>,
    #[serde(rename = "Выручка")]
    pub revenue: Option<String>,
}

/// Group-local, normalized copy of a `RawIncidentRecord`: no value is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRow {
    pub incident_id: String,
    pub begin: String,
    pub end: String,
    pub failure_service: String,
    pub failure_system: String,
    pub failure_project: String,
    pub affected: String,
    pub sla: String,
    pub called: String,
    pub short_description: String,
    pub long_description: String,
    pub planned_works: String,
    pub downtime: String,
    pub service: String,
    pub customer_id: String,
    pub status: String,
    pub compensation_pct: String,
    pub revenue: String,
}

impl IncidentRow {
    /// Values of the invariant fields, aligned with `INVARIANT_FIELDS`.
    pub fn invariant_values(&self) -> [&str; 12] {
        [
            self.begin.as_str(),
            self.end.as_str(),
            self.failure_service.as_str(),
            self.failure_system.as_str(),
            self.failure_project.as_str(),
            self.affected.as_str(),
            self.sla.as_str(),
            self.called.as_str(),
            self.short_description.as_str(),
            self.long_description.as_str(),
            self.planned_works.as_str(),
            self.downtime.as_str(),
        ]
    }
}

/// All joined rows sharing one incident identifier, in join order.
#[derive(Debug, Clone)]
pub struct IncidentGroup {
    pub incident_id: String,
    pub rows: Vec<RawIncidentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerEntry {
    pub customer_id: String,
    pub status: String,
}

/// Report-ready values for one incident. Field names are the names the card
/// template reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentCard {
    pub idx: String,
    pub dt_begin: String,
    pub dt_end: String,
    pub dt_duration: String,
    pub service_machine: String,
    pub system: String,
    pub project: String,
    /// Distinct service names in first-seen order; the template joins them.
    pub services: Vec<String>,
    pub description: String,
    pub planned_works: String,
    pub accessibility: String,
    pub details: String,
    pub number_inj: String,
    pub number_called: String,
    pub sla: String,
    pub compensation: String,
    pub customers: Vec<CustomerEntry>,
    /// Rows the card was built from.
    #[serde(skip)]
    pub row_count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CardSummaryRow {
    #[serde(rename = "Incident")]
    #[tabled(rename = "Incident")]
    pub incident_id: String,
    #[serde(rename = "Rows")]
    #[tabled(rename = "Rows")]
    pub rows: usize,
    #[serde(rename = "Compensation")]
    #[tabled(rename = "Compensation")]
    pub compensation: String,
    #[serde(rename = "Outcome")]
    #[tabled(rename = "Outcome")]
    pub outcome: String,
}
