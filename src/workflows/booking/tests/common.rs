use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use crate::workflows::booking::dispatch::{
    AlertError, AlertPublisher, DispatchAlert, DispatchService, InMemoryRoster,
};
use crate::workflows::booking::domain::{
    BookingId, BookingRequest, Frequency, QuoteRequest, ServiceType,
};
use crate::workflows::booking::pricing::QuoteEngine;
use crate::workflows::booking::router::{booking_router, BookingApi};
use crate::workflows::booking::seed;

pub(super) fn quote_request() -> QuoteRequest {
    QuoteRequest {
        bedrooms: 3,
        bathrooms: 2,
        square_feet: 1500,
        service_type: ServiceType::Standard,
        frequency: Frequency::Onetime,
        add_ons: Vec::new(),
        location: None,
        time_of_day: None,
        day_of_week: None,
        rush_service: false,
    }
}

pub(super) fn engine() -> QuoteEngine {
    QuoteEngine::default()
}

pub(super) fn service_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date")
}

pub(super) fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub(super) fn booking(
    id: &str,
    address: &str,
    service_type: ServiceType,
    start: NaiveTime,
) -> BookingRequest {
    BookingRequest {
        booking_id: BookingId(id.to_string()),
        address: address.to_string(),
        service_type,
        service_date: service_date(),
        service_time: start,
        duration_hours: None,
    }
}

pub(super) fn build_dispatch() -> (
    DispatchService<InMemoryRoster, MemoryAlerts>,
    Arc<InMemoryRoster>,
    Arc<MemoryAlerts>,
) {
    build_dispatch_with(seed::demo_roster())
}

pub(super) fn build_dispatch_with(
    crews: Vec<crate::workflows::booking::dispatch::Worker>,
) -> (
    DispatchService<InMemoryRoster, MemoryAlerts>,
    Arc<InMemoryRoster>,
    Arc<MemoryAlerts>,
) {
    let roster = Arc::new(InMemoryRoster::new(crews));
    let alerts = Arc::new(MemoryAlerts::default());
    let service = DispatchService::new(roster.clone(), alerts.clone());
    (service, roster, alerts)
}

pub(super) fn build_router() -> axum::Router {
    let (service, _, _) = build_dispatch();
    booking_router(BookingApi {
        quotes: Arc::new(QuoteEngine::default()),
        dispatch: Arc::new(service),
    })
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<DispatchAlert>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<DispatchAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for MemoryAlerts {
    fn publish(&self, alert: DispatchAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
