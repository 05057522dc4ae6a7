//! Quote calculation and crew dispatch for the booking funnel.
//!
//! The two components are independent: intake calls the pricing engine for a
//! priced quote and the dispatcher for a crew, and hands both results to the
//! storage/notification collaborators. Neither component needs the other.

pub mod dispatch;
pub mod domain;
pub mod pricing;
pub mod roster_import;
pub mod router;
pub mod seed;

#[cfg(test)]
mod tests;

pub use dispatch::{
    AlertError, AlertPublisher, AssignmentOutcome, BookedSlot, DaySchedule, DispatchAlert,
    DispatchError, DispatchService, InMemoryRoster, LogAlerts, RosterError, ScheduleError,
    TimeSlot, Worker, WorkerMetrics, WorkerRoster, WorkerScheduleView, WorkerSummary,
};
pub use domain::{
    extract_zone, BookingId, BookingRequest, Frequency, QuoteRequest, ServiceType, TimeOfDay,
    WorkerId, Zone,
};
pub use pricing::{CompetitorComparison, Quote, QuoteBreakdown, QuoteEngine, RateCard};
pub use roster_import::{RosterCsvImporter, RosterImportError};
pub use router::{booking_router, BookingApi};
