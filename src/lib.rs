//! Booking core for a residential and commercial cleaning service.
//!
//! Two components carry the business logic: a pure quote calculator
//! ([`workflows::booking::pricing`]) and the crew dispatcher
//! ([`workflows::booking::dispatch`]). The rest of the crate is the wiring a
//! deployable service needs: configuration, telemetry, an HTTP surface, and a
//! roster import path for onboarding crews from spreadsheet exports.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
