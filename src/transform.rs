// Validation and aggregation of one incident group into a report card.
//
// Every step works on a normalized, group-local copy of the rows. Integrity
// violations end here (logged, no card); shape errors in timestamps, counts or
// amounts are returned to the caller as `CardError`.
use crate::error::{CardError, DivergentField, IntegrityViolation};
use crate::types::{
    CustomerEntry, IncidentCard, IncidentGroup, IncidentRow, RawIncidentRecord, INVARIANT_FIELDS,
    MISSING,
};
use crate::util::{
    clean_description, first_number, format_display_timestamp, format_duration, parse_amount,
    parse_timestamp, unique_in_order,
};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use tracing::{debug, error};

/// Number of customers listed on a card.
pub const TOP_CUSTOMERS: usize = 15;

const BEGIN: &str = "Начало аварии";
const END: &str = "Конец аварии";
const AFFECTED: &str = "Затронуло";
const CALLED: &str = "Обратились";
const SLA: &str = "SLA";
const COMPENSATION_PCT: &str = "% компенсации";
const REVENUE: &str = "Выручка";

fn fill(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| MISSING.to_string())
}

/// Replace every missing value with the `N/A` sentinel.
pub fn normalize(raw: &RawIncidentRecord) -> IncidentRow {
    IncidentRow {
        incident_id: fill(&raw.incident_id),
        begin: fill(&raw.begin),
        end: fill(&raw.end),
        failure_service: fill(&raw.failure_service),
        failure_system: fill(&raw.failure_system),
        failure_project: fill(&raw.failure_project),
        affected: fill(&raw.affected),
        sla: fill(&raw.sla),
        called: fill(&raw.called),
        short_description: fill(&raw.short_description),
        long_description: fill(&raw.long_description),
        planned_works: fill(&raw.planned_works),
        downtime: fill(&raw.downtime),
        service: fill(&raw.service),
        customer_id: fill(&raw.customer_id),
        status: fill(&raw.status),
        compensation_pct: fill(&raw.compensation_pct),
        revenue: fill(&raw.revenue),
    }
}

/// Every invariant field must take exactly one value across `rows`.
pub fn check_invariants(incident: &str, rows: &[IncidentRow]) -> Result<(), IntegrityViolation> {
    let mut fields = Vec::new();
    for (i, field) in INVARIANT_FIELDS.into_iter().enumerate() {
        let distinct = rows
            .iter()
            .map(|r| r.invariant_values()[i])
            .collect::<HashSet<_>>()
            .len();
        if distinct != 1 {
            fields.push(DivergentField { field, distinct });
        }
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(IntegrityViolation {
            incident: incident.to_string(),
            fields,
        })
    }
}

fn timestamp(
    incident: &str,
    field: &'static str,
    value: &str,
) -> Result<NaiveDateTime, CardError> {
    parse_timestamp(value).ok_or_else(|| CardError::Timestamp {
        incident: incident.to_string(),
        field,
        value: value.to_string(),
    })
}

fn count(incident: &str, field: &'static str, value: &str) -> Result<String, CardError> {
    first_number(value)
        .map(str::to_string)
        .ok_or_else(|| CardError::NoDigits {
            incident: incident.to_string(),
            field,
            value: value.to_string(),
        })
}

fn amount(
    incident: &str,
    field: &'static str,
    row: &IncidentRow,
    value: &str,
) -> Result<f64, CardError> {
    parse_amount(value).ok_or_else(|| CardError::Amount {
        incident: incident.to_string(),
        field,
        customer: row.customer_id.clone(),
        value: value.to_string(),
    })
}

/// Highest-revenue customers first; rows with equal revenue keep join order.
pub fn top_customers(ranked: &[(f64, &IncidentRow)]) -> Vec<CustomerEntry> {
    let mut ranked = ranked.to_vec();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked
        .into_iter()
        .take(TOP_CUSTOMERS)
        .map(|(_, r)| CustomerEntry {
            customer_id: r.customer_id.clone(),
            status: r.status.clone(),
        })
        .collect()
}

/// Build the card for one incident group.
///
/// Returns `Ok(None)` when the invariant fields disagree; the violation is
/// logged with the diverging fields. Scalar fields are read from the first row
/// in join order.
pub fn build_card(group: &IncidentGroup) -> Result<Option<IncidentCard>, CardError> {
    let id = group.incident_id.as_str();
    let rows: Vec<IncidentRow> = group.rows.iter().map(normalize).collect();

    if let Err(violation) = check_invariants(id, &rows) {
        error!(incident = %id, %violation, "Immutable values are not unique");
        return Ok(None);
    }
    // `check_invariants` rejects an empty group.
    let Some(first) = rows.first() else {
        return Ok(None);
    };

    // Duration comes from the parsed values, never from the display strings.
    let begin = timestamp(id, BEGIN, &first.begin)?;
    let end = timestamp(id, END, &first.end)?;

    let mut compensation = 0.0;
    let mut ranked: Vec<(f64, &IncidentRow)> = Vec::with_capacity(rows.len());
    for r in &rows {
        let pct = amount(id, COMPENSATION_PCT, r, &r.compensation_pct)?;
        let revenue = amount(id, REVENUE, r, &r.revenue)?;
        compensation += pct * revenue / 100.0;
        ranked.push((revenue, r));
    }

    let card = IncidentCard {
        idx: id.to_string(),
        dt_begin: format_display_timestamp(&begin),
        dt_end: format_display_timestamp(&end),
        dt_duration: format_duration(end - begin),
        service_machine: first.failure_service.clone(),
        system: first.failure_system.clone(),
        project: first.failure_project.clone(),
        services: unique_in_order(rows.iter().map(|r| r.service.as_str()))
            .into_iter()
            .map(str::to_string)
            .collect(),
        description: clean_description(&first.short_description),
        planned_works: first.planned_works.clone(),
        accessibility: first.downtime.clone(),
        details: first.long_description.clone(),
        number_inj: count(id, AFFECTED, &first.affected)?,
        number_called: count(id, CALLED, &first.called)?,
        sla: count(id, SLA, &first.sla)?,
        compensation: format!("{:.2}", compensation),
        customers: top_customers(&ranked),
        row_count: rows.len(),
    };
    debug!(incident = %id, rows = rows.len(), compensation = %card.compensation, "card built");
    Ok(Some(card))
}
