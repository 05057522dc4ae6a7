use chrono::NaiveDate;

use super::super::domain::{ServiceType, Zone};
use super::roster::Worker;
use super::schedule::TimeSlot;

/// Everything the filter and scorer need to know about a booking.
pub(crate) struct AssignmentContext<'a> {
    pub service_type: ServiceType,
    pub zone: Option<&'a Zone>,
    pub date: NaiveDate,
    pub slot: TimeSlot,
}

/// First failing eligibility check, or `None` when the worker can take the
/// job. A booking with no extractable zone skips the zone check entirely.
pub(crate) fn ineligibility(worker: &Worker, ctx: &AssignmentContext<'_>) -> Option<&'static str> {
    if !worker.is_active {
        return Some("inactive");
    }
    if let Some(zone) = ctx.zone {
        if !worker.services_zone(zone) {
            return Some("does not service the booking zone");
        }
    }
    if !worker.has_skill(ctx.service_type.skill_tag()) {
        return Some("missing the required skill");
    }
    if !worker.is_free(ctx.date, &ctx.slot) {
        return Some("schedule conflict in the requested window");
    }
    if !worker.under_daily_cap(ctx.date) {
        return Some("daily job cap reached");
    }
    None
}

pub(crate) fn is_eligible(worker: &Worker, ctx: &AssignmentContext<'_>) -> bool {
    ineligibility(worker, ctx).is_none()
}

/// Composite suitability score. Higher wins; equal scores resolve to the
/// lowest worker id in the caller's sort.
///
/// rating (0-50) + capped experience (0-20) + preferred job type (15) +
/// home-zone match (10) + remaining daily headroom (0-max_daily_jobs).
pub(crate) fn score(worker: &Worker, ctx: &AssignmentContext<'_>) -> f32 {
    let rating = worker.rating * 10.0;
    let experience = (worker.completed_jobs as f32 / 50.0).min(20.0);
    let preferred = if worker.preferred_job_types.contains(&ctx.service_type) {
        15.0
    } else {
        0.0
    };
    let home_zone = match (ctx.zone, worker.primary_zone()) {
        (Some(requested), Some(primary)) if requested == primary => 10.0,
        _ => 0.0,
    };
    let headroom = f32::from(worker.max_daily_jobs) - worker.jobs_on(ctx.date) as f32;

    rating + experience + preferred + home_zone + headroom
}
