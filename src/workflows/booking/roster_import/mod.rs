//! Roster onboarding from spreadsheet exports.
//!
//! Operations maintains the crew roster in a spreadsheet; this importer turns
//! the CSV export into `Worker` entries for the in-memory store. Expected
//! columns: `Worker ID`, `Name`, `Skills`, `Zones`, `Preferred Jobs`,
//! `Max Daily Jobs`, `Rating`, `Completed Jobs`, `Active`. Multi-value cells
//! are semicolon-separated.

mod parser;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;

use super::dispatch::Worker;

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster row at line {line} rejected: {reason}")]
    InvalidRow { line: u64, reason: String },
}

pub struct RosterCsvImporter;

impl RosterCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Worker>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Worker>, RosterImportError> {
        let mut seen = HashSet::new();
        let mut workers = Vec::new();

        for record in parser::parse_records(reader)? {
            if !seen.insert(record.id.clone()) {
                return Err(RosterImportError::InvalidRow {
                    line: 0,
                    reason: format!("duplicate worker id {}", record.id),
                });
            }

            workers.push(Worker {
                id: record.id,
                name: record.name,
                skills: BTreeSet::from_iter(record.skills),
                zones: record.zones,
                preferred_job_types: record.preferred_job_types,
                max_daily_jobs: record.max_daily_jobs,
                rating: record.rating,
                completed_jobs: record.completed_jobs,
                is_active: record.active,
                availability: BTreeMap::new(),
            });
        }

        Ok(workers)
    }
}

#[cfg(test)]
mod tests {
    use super::super::domain::ServiceType;
    use super::*;
    use std::io::Cursor;

    const HEADER: &str =
        "Worker ID,Name,Skills,Zones,Preferred Jobs,Max Daily Jobs,Rating,Completed Jobs,Active\n";

    #[test]
    fn importer_builds_workers_from_export_rows() {
        let csv = format!(
            "{HEADER}W010,Lena Ortiz,standard;deep,78701;78702,deep,3,4.6,120,true\n"
        );
        let workers =
            RosterCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(workers.len(), 1);
        let lena = &workers[0];
        assert_eq!(lena.id.0, "W010");
        assert!(lena.has_skill("deep"));
        assert_eq!(lena.zones.len(), 2);
        assert_eq!(lena.preferred_job_types, vec![ServiceType::Deep]);
        assert!(lena.is_active);
        assert!(lena.availability.is_empty());
    }

    #[test]
    fn importer_rejects_out_of_range_ratings() {
        let csv = format!("{HEADER}W011,Bad Rating,standard,78701,,3,6.2,0,true\n");
        let error =
            RosterCsvImporter::from_reader(Cursor::new(csv)).expect_err("rating rejected");
        match error {
            RosterImportError::InvalidRow { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("rating"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn importer_rejects_duplicate_worker_ids() {
        let csv = format!(
            "{HEADER}W012,First,standard,78701,,3,4.0,0,true\nW012,Second,standard,78701,,3,4.0,0,true\n"
        );
        let error = RosterCsvImporter::from_reader(Cursor::new(csv)).expect_err("duplicate id");
        assert!(matches!(error, RosterImportError::InvalidRow { .. }));
    }

    #[test]
    fn importer_rejects_unknown_preferred_job_types() {
        let csv = format!("{HEADER}W013,Odd Prefs,standard,78701,window-washing,3,4.0,0,true\n");
        let error = RosterCsvImporter::from_reader(Cursor::new(csv)).expect_err("bad job type");
        match error {
            RosterImportError::InvalidRow { reason, .. } => {
                assert!(reason.contains("window-washing"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = RosterCsvImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");
        assert!(matches!(error, RosterImportError::Io(_)));
    }

    #[test]
    fn split_multi_trims_and_drops_empties() {
        assert_eq!(
            parser::split_multi_for_tests(" standard ; deep ;"),
            vec!["standard".to_string(), "deep".to_string()]
        );
        assert!(parser::split_multi_for_tests("  ").is_empty());
    }
}
