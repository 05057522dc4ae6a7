use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::super::domain::{BookingId, ServiceType, WorkerId, Zone};
use super::schedule::{BookedSlot, DaySchedule, TimeSlot};

/// Roster entry for a cleaning crew member. The `availability` map is the
/// only state the dispatcher mutates; everything else is reference data
/// maintained by onboarding and the completion flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    pub skills: BTreeSet<String>,
    /// Service areas in priority order; the first entry is the home zone.
    pub zones: Vec<Zone>,
    pub preferred_job_types: Vec<ServiceType>,
    pub max_daily_jobs: u8,
    /// 0.0 - 5.0 customer rating.
    pub rating: f32,
    pub completed_jobs: u32,
    pub is_active: bool,
    #[serde(default)]
    pub availability: BTreeMap<NaiveDate, DaySchedule>,
}

impl Worker {
    pub fn primary_zone(&self) -> Option<&Zone> {
        self.zones.first()
    }

    pub fn services_zone(&self, zone: &Zone) -> bool {
        self.zones.iter().any(|candidate| candidate == zone)
    }

    pub fn has_skill(&self, tag: &str) -> bool {
        self.skills.contains(tag)
    }

    pub fn jobs_on(&self, date: NaiveDate) -> usize {
        self.availability
            .get(&date)
            .map(DaySchedule::jobs)
            .unwrap_or(0)
    }

    /// A date with no schedule entry is implicitly free all day.
    pub fn is_free(&self, date: NaiveDate, slot: &TimeSlot) -> bool {
        self.availability
            .get(&date)
            .map(|day| day.is_free(slot))
            .unwrap_or(true)
    }

    pub fn under_daily_cap(&self, date: NaiveDate) -> bool {
        self.jobs_on(date) < usize::from(self.max_daily_jobs)
    }
}

/// Storage abstraction so the dispatcher can be exercised without shared
/// globals and so writes can be mediated by a single owner.
pub trait WorkerRoster: Send + Sync {
    fn all(&self) -> Result<Vec<Worker>, RosterError>;
    fn get(&self, id: &WorkerId) -> Result<Option<Worker>, RosterError>;
    fn upsert(&self, worker: Worker) -> Result<(), RosterError>;

    /// Reserve a slot for a booking, re-validating the overlap and capacity
    /// invariants under the store's own synchronization. Returns the updated
    /// worker on success.
    fn reserve(
        &self,
        id: &WorkerId,
        date: NaiveDate,
        slot: TimeSlot,
        booking: &BookingId,
    ) -> Result<Worker, RosterError>;

    /// Remove a previously reserved slot, returning the released entry.
    fn release(
        &self,
        id: &WorkerId,
        date: NaiveDate,
        booking: &BookingId,
    ) -> Result<BookedSlot, RosterError>;
}

/// Error enumeration for roster failures.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("worker {0} is not on the roster")]
    WorkerNotFound(WorkerId),
    #[error("worker {worker} already has a booking overlapping {start}-{end} on {date}")]
    SlotConflict {
        worker: WorkerId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    },
    #[error("worker {worker} is at the daily cap of {cap} jobs on {date}")]
    CapacityReached {
        worker: WorkerId,
        date: NaiveDate,
        cap: u8,
    },
    #[error("booking {0} is not on the schedule")]
    BookingNotFound(BookingId),
    #[error("roster unavailable: {0}")]
    Unavailable(String),
}

/// Mutex-guarded in-memory roster. All writes serialize through the lock, so
/// the reserve-time re-check cannot interleave with a competing assignment.
#[derive(Default)]
pub struct InMemoryRoster {
    workers: Mutex<BTreeMap<WorkerId, Worker>>,
}

impl InMemoryRoster {
    pub fn new(seed: Vec<Worker>) -> Self {
        let workers = seed
            .into_iter()
            .map(|worker| (worker.id.clone(), worker))
            .collect();
        Self {
            workers: Mutex::new(workers),
        }
    }
}

impl WorkerRoster for InMemoryRoster {
    fn all(&self) -> Result<Vec<Worker>, RosterError> {
        let guard = self.workers.lock().expect("roster mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn get(&self, id: &WorkerId) -> Result<Option<Worker>, RosterError> {
        let guard = self.workers.lock().expect("roster mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, worker: Worker) -> Result<(), RosterError> {
        let mut guard = self.workers.lock().expect("roster mutex poisoned");
        guard.insert(worker.id.clone(), worker);
        Ok(())
    }

    fn reserve(
        &self,
        id: &WorkerId,
        date: NaiveDate,
        slot: TimeSlot,
        booking: &BookingId,
    ) -> Result<Worker, RosterError> {
        let mut guard = self.workers.lock().expect("roster mutex poisoned");
        let worker = guard
            .get_mut(id)
            .ok_or_else(|| RosterError::WorkerNotFound(id.clone()))?;

        if !worker.under_daily_cap(date) {
            return Err(RosterError::CapacityReached {
                worker: id.clone(),
                date,
                cap: worker.max_daily_jobs,
            });
        }

        let day = worker.availability.entry(date).or_default();
        if !day.is_free(&slot) {
            return Err(RosterError::SlotConflict {
                worker: id.clone(),
                date,
                start: slot.start,
                end: slot.end,
            });
        }

        day.insert_sorted(BookedSlot {
            slot,
            booking_id: booking.clone(),
        });

        Ok(worker.clone())
    }

    fn release(
        &self,
        id: &WorkerId,
        date: NaiveDate,
        booking: &BookingId,
    ) -> Result<BookedSlot, RosterError> {
        let mut guard = self.workers.lock().expect("roster mutex poisoned");
        let worker = guard
            .get_mut(id)
            .ok_or_else(|| RosterError::WorkerNotFound(id.clone()))?;

        let day = worker
            .availability
            .get_mut(&date)
            .ok_or_else(|| RosterError::BookingNotFound(booking.clone()))?;

        let position = day
            .booked
            .iter()
            .position(|entry| &entry.booking_id == booking)
            .ok_or_else(|| RosterError::BookingNotFound(booking.clone()))?;

        Ok(day.booked.remove(position))
    }
}

/// Outbound notification hook fired after a successful assignment. Delivery
/// (SMS, chat) is a collaborator concern behind this trait.
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: DispatchAlert) -> Result<(), AlertError>;
}

/// Assignment notification payload handed to the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchAlert {
    pub template: String,
    pub booking_id: BookingId,
    pub details: BTreeMap<String, String>,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Publisher that records assignments in the service log; the real SMS/chat
/// transport is wired in deployment, not here.
#[derive(Debug, Default, Clone)]
pub struct LogAlerts;

impl AlertPublisher for LogAlerts {
    fn publish(&self, alert: DispatchAlert) -> Result<(), AlertError> {
        tracing::info!(
            booking = %alert.booking_id,
            template = %alert.template,
            "dispatch alert"
        );
        Ok(())
    }
}
