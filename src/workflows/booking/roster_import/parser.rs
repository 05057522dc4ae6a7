use std::io::Read;
use std::str::FromStr;

use serde::Deserialize;

use super::super::domain::{ServiceType, WorkerId, Zone};
use super::RosterImportError;

/// One validated roster row, before it becomes a `Worker`.
#[derive(Debug)]
pub(crate) struct RosterRecord {
    pub(crate) id: WorkerId,
    pub(crate) name: String,
    pub(crate) skills: Vec<String>,
    pub(crate) zones: Vec<Zone>,
    pub(crate) preferred_job_types: Vec<ServiceType>,
    pub(crate) max_daily_jobs: u8,
    pub(crate) rating: f32,
    pub(crate) completed_jobs: u32,
    pub(crate) active: bool,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RosterRecord>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
        // Header is line 1.
        let line = index as u64 + 2;
        let row = row?;
        records.push(validate(row, line)?);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Worker ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Skills")]
    skills: String,
    #[serde(rename = "Zones")]
    zones: String,
    #[serde(rename = "Preferred Jobs", default)]
    preferred_jobs: String,
    #[serde(rename = "Max Daily Jobs")]
    max_daily_jobs: u8,
    #[serde(rename = "Rating")]
    rating: f32,
    #[serde(rename = "Completed Jobs", default)]
    completed_jobs: u32,
    #[serde(rename = "Active", default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

fn validate(row: RosterRow, line: u64) -> Result<RosterRecord, RosterImportError> {
    if row.id.is_empty() {
        return Err(RosterImportError::InvalidRow {
            line,
            reason: "empty worker id".to_string(),
        });
    }

    if !(0.0..=5.0).contains(&row.rating) {
        return Err(RosterImportError::InvalidRow {
            line,
            reason: format!("rating {} outside 0.0-5.0", row.rating),
        });
    }

    if row.max_daily_jobs == 0 {
        return Err(RosterImportError::InvalidRow {
            line,
            reason: "max daily jobs must be at least 1".to_string(),
        });
    }

    let preferred_job_types = split_multi(&row.preferred_jobs)
        .iter()
        .map(|raw| {
            ServiceType::from_str(raw).map_err(|reason| RosterImportError::InvalidRow {
                line,
                reason,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RosterRecord {
        id: WorkerId(row.id),
        name: row.name,
        skills: split_multi(&row.skills),
        zones: split_multi(&row.zones).into_iter().map(Zone).collect(),
        preferred_job_types,
        max_daily_jobs: row.max_daily_jobs,
        rating: row.rating,
        completed_jobs: row.completed_jobs,
        active: row.active,
    })
}

/// Semicolon-separated multi-value cell.
fn split_multi(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) fn split_multi_for_tests(cell: &str) -> Vec<String> {
    split_multi(cell)
}
