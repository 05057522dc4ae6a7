//! Built-in reference roster used by the demo server and the test suites.

use std::collections::{BTreeMap, BTreeSet};

use super::dispatch::Worker;
use super::domain::{ServiceType, WorkerId, Zone};

fn worker(
    id: &str,
    name: &str,
    skills: &[&str],
    zones: &[&str],
    preferred: &[ServiceType],
    max_daily_jobs: u8,
    rating: f32,
    completed_jobs: u32,
) -> Worker {
    Worker {
        id: WorkerId(id.to_string()),
        name: name.to_string(),
        skills: BTreeSet::from_iter(skills.iter().map(|tag| tag.to_string())),
        zones: zones.iter().map(|zone| Zone(zone.to_string())).collect(),
        preferred_job_types: preferred.to_vec(),
        max_daily_jobs,
        rating,
        completed_jobs,
        is_active: true,
        availability: BTreeMap::new(),
    }
}

/// The four-crew roster the dispatcher demo ships with.
pub fn demo_roster() -> Vec<Worker> {
    vec![
        worker(
            "W001",
            "Maria Delgado",
            &["standard", "deep", "airbnb"],
            &["78701", "78702"],
            &[ServiceType::Airbnb],
            3,
            4.9,
            214,
        ),
        worker(
            "W002",
            "James Okafor",
            &["standard", "deep", "move_in_out"],
            &["78704", "78745"],
            &[ServiceType::Deep],
            4,
            4.7,
            162,
        ),
        worker(
            "W003",
            "Sofia Reyes",
            &["standard", "post_construction"],
            &["78745", "78701"],
            &[ServiceType::PostConstruction],
            2,
            4.8,
            98,
        ),
        worker(
            "W004",
            "Dana Whitfield",
            &["standard", "airbnb"],
            &["78702", "78703"],
            &[ServiceType::Standard],
            3,
            4.5,
            310,
        ),
    ]
}
