//! Crew dispatch: filter the roster, score the candidates, reserve the slot.
//!
//! Assignment is a snapshot-filter-score pass followed by an atomic reserve
//! against the roster store. The store re-validates the overlap and capacity
//! invariants under its own lock, so two concurrent assignments can never
//! double-book a crew member; the loser simply falls through to the next
//! candidate.

pub mod roster;
pub mod schedule;
pub(crate) mod scoring;

pub use roster::{
    AlertError, AlertPublisher, DispatchAlert, InMemoryRoster, LogAlerts, RosterError, Worker,
    WorkerRoster,
};
pub use schedule::{BookedSlot, DaySchedule, ScheduleError, TimeSlot};

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{extract_zone, BookingId, BookingRequest, ServiceType, WorkerId, Zone};
use scoring::AssignmentContext;

/// Dispatcher outcome: either a reserved crew member or a best-effort
/// suggestion list for manual dispatch. "No eligible crew" is an expected
/// result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    Assigned {
        worker: Worker,
        score: f32,
    },
    Unassigned {
        reason: String,
        /// Up to three active crews with the right skill, regardless of zone,
        /// availability, or capacity. Suggestions only.
        alternatives: Vec<WorkerSummary>,
    },
}

/// Sanitized roster view for suggestion lists and availability queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSummary {
    pub id: WorkerId,
    pub name: String,
    pub rating: f32,
    pub zones: Vec<Zone>,
}

impl From<&Worker> for WorkerSummary {
    fn from(worker: &Worker) -> Self {
        Self {
            id: worker.id.clone(),
            name: worker.name.clone(),
            rating: worker.rating,
            zones: worker.zones.clone(),
        }
    }
}

/// A crew member's day as exposed to dispatchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerScheduleView {
    pub worker_id: WorkerId,
    pub name: String,
    pub date: NaiveDate,
    pub window: TimeSlot,
    pub booked: Vec<BookedSlot>,
}

/// Reputation and load snapshot for a crew member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerMetrics {
    pub worker_id: WorkerId,
    pub name: String,
    pub rating: f32,
    pub completed_jobs: u32,
    pub days: Vec<DayLoad>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLoad {
    pub date: NaiveDate,
    pub jobs: usize,
    pub booked_minutes: i64,
    /// Booked minutes over the working window.
    pub utilization: f32,
}

/// Error raised by the dispatcher. Schedule and roster problems carry their
/// own taxonomies; "no eligible crew" is an [`AssignmentOutcome`], not here.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Alert(#[from] AlertError),
    #[error("booking {0} is not on any schedule for that date")]
    UnknownBooking(BookingId),
    #[error("worker {worker} is not eligible for this booking: {reason}")]
    IneligibleWorker { worker: WorkerId, reason: String },
}

/// Service composing the roster store and the outbound alert hook.
pub struct DispatchService<R, A> {
    roster: Arc<R>,
    alerts: Arc<A>,
}

impl<R, A> DispatchService<R, A>
where
    R: WorkerRoster + 'static,
    A: AlertPublisher + 'static,
{
    pub fn new(roster: Arc<R>, alerts: Arc<A>) -> Self {
        Self { roster, alerts }
    }

    /// Assign the best available crew member to a booking and reserve the
    /// slot on their schedule.
    pub fn assign(&self, booking: &BookingRequest) -> Result<AssignmentOutcome, DispatchError> {
        let slot = TimeSlot::new(booking.service_time, booking.duration_minutes())?;
        let zone = extract_zone(&booking.address);
        let ctx = AssignmentContext {
            service_type: booking.service_type,
            zone: zone.as_ref(),
            date: booking.service_date,
            slot,
        };

        let roster = self.roster.all()?;
        let mut candidates: Vec<(&Worker, f32)> = roster
            .iter()
            .filter(|worker| scoring::is_eligible(worker, &ctx))
            .map(|worker| (worker, scoring::score(worker, &ctx)))
            .collect();

        if candidates.is_empty() {
            return Ok(AssignmentOutcome::Unassigned {
                reason: no_match_reason(&ctx),
                alternatives: alternatives(&roster, ctx.service_type),
            });
        }

        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });

        for (candidate, score) in &candidates {
            match self
                .roster
                .reserve(&candidate.id, ctx.date, ctx.slot, &booking.booking_id)
            {
                Ok(reserved) => {
                    self.alerts
                        .publish(assignment_alert("crew_assigned", booking, &reserved, &ctx))?;
                    return Ok(AssignmentOutcome::Assigned {
                        worker: reserved,
                        score: *score,
                    });
                }
                // Lost the slot to a concurrent assignment; next candidate.
                Err(RosterError::SlotConflict { .. }) | Err(RosterError::CapacityReached { .. }) => {
                    continue
                }
                Err(other) => return Err(other.into()),
            }
        }

        Ok(AssignmentOutcome::Unassigned {
            reason: "every eligible crew was reserved by a concurrent booking".to_string(),
            alternatives: alternatives(&roster, ctx.service_type),
        })
    }

    /// Move a booking to another crew member, validating the target through
    /// the same eligibility checks as an initial assignment.
    pub fn reassign(
        &self,
        booking: &BookingRequest,
        to: &WorkerId,
    ) -> Result<Worker, DispatchError> {
        let slot = TimeSlot::new(booking.service_time, booking.duration_minutes())?;
        let date = booking.service_date;

        let roster = self.roster.all()?;
        let holder = roster
            .iter()
            .find(|worker| {
                worker
                    .availability
                    .get(&date)
                    .map(|day| {
                        day.booked
                            .iter()
                            .any(|entry| entry.booking_id == booking.booking_id)
                    })
                    .unwrap_or(false)
            })
            .ok_or_else(|| DispatchError::UnknownBooking(booking.booking_id.clone()))?;

        if &holder.id == to {
            return Ok(holder.clone());
        }

        let target = self
            .roster
            .get(to)?
            .ok_or_else(|| RosterError::WorkerNotFound(to.clone()))?;

        let zone = extract_zone(&booking.address);
        let ctx = AssignmentContext {
            service_type: booking.service_type,
            zone: zone.as_ref(),
            date,
            slot,
        };
        if let Some(reason) = scoring::ineligibility(&target, &ctx) {
            return Err(DispatchError::IneligibleWorker {
                worker: to.clone(),
                reason: reason.to_string(),
            });
        }

        let reserved = self
            .roster
            .reserve(to, date, slot, &booking.booking_id)?;

        if let Err(release_error) = self.roster.release(&holder.id, date, &booking.booking_id) {
            // The original entry vanished mid-move; undo the new reservation.
            let _ = self.roster.release(to, date, &booking.booking_id);
            return Err(release_error.into());
        }

        self.alerts
            .publish(assignment_alert("crew_reassigned", booking, &reserved, &ctx))?;

        Ok(reserved)
    }

    pub fn schedule(
        &self,
        worker_id: &WorkerId,
        date: NaiveDate,
    ) -> Result<WorkerScheduleView, DispatchError> {
        let worker = self
            .roster
            .get(worker_id)?
            .ok_or_else(|| RosterError::WorkerNotFound(worker_id.clone()))?;

        let day = worker.availability.get(&date).cloned().unwrap_or_default();

        Ok(WorkerScheduleView {
            worker_id: worker.id,
            name: worker.name,
            date,
            window: day.window,
            booked: day.booked,
        })
    }

    /// Active crews free for the slot and under their daily cap, regardless
    /// of zone or skill.
    pub fn available_workers(
        &self,
        date: NaiveDate,
        slot: TimeSlot,
    ) -> Result<Vec<WorkerSummary>, DispatchError> {
        let roster = self.roster.all()?;
        Ok(roster
            .iter()
            .filter(|worker| {
                worker.is_active && worker.is_free(date, &slot) && worker.under_daily_cap(date)
            })
            .map(WorkerSummary::from)
            .collect())
    }

    pub fn metrics(&self, worker_id: &WorkerId) -> Result<WorkerMetrics, DispatchError> {
        let worker = self
            .roster
            .get(worker_id)?
            .ok_or_else(|| RosterError::WorkerNotFound(worker_id.clone()))?;

        let days = worker
            .availability
            .iter()
            .map(|(date, day)| {
                let window_minutes = day.window.minutes().max(1);
                DayLoad {
                    date: *date,
                    jobs: day.jobs(),
                    booked_minutes: day.booked_minutes(),
                    utilization: day.booked_minutes() as f32 / window_minutes as f32,
                }
            })
            .collect();

        Ok(WorkerMetrics {
            worker_id: worker.id,
            name: worker.name,
            rating: worker.rating,
            completed_jobs: worker.completed_jobs,
            days,
        })
    }
}

fn no_match_reason(ctx: &AssignmentContext<'_>) -> String {
    let zone_part = match ctx.zone {
        Some(zone) => format!(" in zone {zone}"),
        None => String::new(),
    };
    format!(
        "no active crew with the '{}' skill is available{} on {} between {}-{}",
        ctx.service_type.skill_tag(),
        zone_part,
        ctx.date,
        ctx.slot.start.format("%H:%M"),
        ctx.slot.end.format("%H:%M"),
    )
}

fn alternatives(roster: &[Worker], service_type: ServiceType) -> Vec<WorkerSummary> {
    roster
        .iter()
        .filter(|worker| worker.is_active && worker.has_skill(service_type.skill_tag()))
        .take(3)
        .map(WorkerSummary::from)
        .collect()
}

fn assignment_alert(
    template: &str,
    booking: &BookingRequest,
    worker: &Worker,
    ctx: &AssignmentContext<'_>,
) -> DispatchAlert {
    let mut details = BTreeMap::new();
    details.insert("worker".to_string(), worker.name.clone());
    details.insert("date".to_string(), ctx.date.to_string());
    details.insert(
        "window".to_string(),
        format!(
            "{}-{}",
            ctx.slot.start.format("%H:%M"),
            ctx.slot.end.format("%H:%M")
        ),
    );
    details.insert("address".to_string(), booking.address.clone());

    DispatchAlert {
        template: template.to_string(),
        booking_id: booking.booking_id.clone(),
        details,
    }
}
