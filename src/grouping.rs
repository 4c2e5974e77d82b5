use crate::types::{IncidentGroup, RawIncidentRecord, MISSING};
use std::collections::HashMap;

/// Split joined rows into one group per incident identifier, in the order
/// identifiers are first seen. Rows are cloned, so each group is independent
/// of the joined table and of every other group.
pub fn group_by_incident(records: &[RawIncidentRecord]) -> Vec<IncidentGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<IncidentGroup> = Vec::new();
    for r in records {
        let id = r.incident_id.as_deref().unwrap_or(MISSING);
        let slot = *index.entry(id).or_insert_with(|| {
            groups.push(IncidentGroup {
                incident_id: id.to_string(),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(r.clone());
    }
    groups
}
