use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::dispatch::{
    AlertPublisher, AssignmentOutcome, DispatchError, DispatchService, RosterError, TimeSlot,
    WorkerRoster,
};
use super::domain::{
    hhmm, BookingId, BookingRequest, QuoteRequest, ServiceType, WorkerId, DEFAULT_DURATION_HOURS,
};
use super::pricing::{CompetitorComparison, Quote, QuoteEngine};

/// Shared handler state: the stateless quote calculator and the dispatcher.
pub struct BookingApi<R, A> {
    pub quotes: Arc<QuoteEngine>,
    pub dispatch: Arc<DispatchService<R, A>>,
}

impl<R, A> Clone for BookingApi<R, A> {
    fn clone(&self) -> Self {
        Self {
            quotes: self.quotes.clone(),
            dispatch: self.dispatch.clone(),
        }
    }
}

/// Router builder exposing the booking endpoints.
pub fn booking_router<R, A>(api: BookingApi<R, A>) -> Router
where
    R: WorkerRoster + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route("/api/v1/bookings/quote", post(quote_handler::<R, A>))
        .route(
            "/api/v1/bookings/assignments",
            post(assign_handler::<R, A>),
        )
        .route(
            "/api/v1/bookings/:booking_id/reassign",
            post(reassign_handler::<R, A>),
        )
        .route(
            "/api/v1/workers/available",
            get(available_handler::<R, A>),
        )
        .route(
            "/api/v1/workers/:worker_id/schedule/:date",
            get(schedule_handler::<R, A>),
        )
        .route(
            "/api/v1/workers/:worker_id/metrics",
            get(metrics_handler::<R, A>),
        )
        .with_state(api)
}

#[derive(Debug, Serialize)]
struct QuoteResponse {
    quote: Quote,
    comparison: CompetitorComparison,
}

async fn quote_handler<R, A>(
    State(api): State<BookingApi<R, A>>,
    axum::Json(request): axum::Json<QuoteRequest>,
) -> Response
where
    R: WorkerRoster + 'static,
    A: AlertPublisher + 'static,
{
    if let Some(day) = request.day_of_week {
        if day > 6 {
            let payload = json!({ "error": format!("dayOfWeek must be 0-6, got {day}") });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    }

    let quote = api.quotes.quote(&request);
    let comparison = api.quotes.competitor_comparison(quote.total);
    (
        StatusCode::OK,
        axum::Json(QuoteResponse { quote, comparison }),
    )
        .into_response()
}

async fn assign_handler<R, A>(
    State(api): State<BookingApi<R, A>>,
    axum::Json(booking): axum::Json<BookingRequest>,
) -> Response
where
    R: WorkerRoster + 'static,
    A: AlertPublisher + 'static,
{
    match api.dispatch.assign(&booking) {
        Ok(outcome @ AssignmentOutcome::Assigned { .. }) => {
            (StatusCode::OK, axum::Json(outcome)).into_response()
        }
        Ok(outcome @ AssignmentOutcome::Unassigned { .. }) => {
            (StatusCode::CONFLICT, axum::Json(outcome)).into_response()
        }
        Err(error) => dispatch_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReassignRequest {
    to_worker: String,
    address: String,
    service_type: ServiceType,
    service_date: NaiveDate,
    #[serde(with = "hhmm")]
    service_time: chrono::NaiveTime,
    #[serde(default)]
    duration_hours: Option<f32>,
}

async fn reassign_handler<R, A>(
    State(api): State<BookingApi<R, A>>,
    Path(booking_id): Path<String>,
    axum::Json(request): axum::Json<ReassignRequest>,
) -> Response
where
    R: WorkerRoster + 'static,
    A: AlertPublisher + 'static,
{
    let booking = BookingRequest {
        booking_id: BookingId(booking_id),
        address: request.address,
        service_type: request.service_type,
        service_date: request.service_date,
        service_time: request.service_time,
        duration_hours: request.duration_hours,
    };

    match api
        .dispatch
        .reassign(&booking, &WorkerId(request.to_worker))
    {
        Ok(worker) => (StatusCode::OK, axum::Json(json!({ "worker": worker }))).into_response(),
        Err(error @ DispatchError::IneligibleWorker { .. }) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(error) => dispatch_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityQuery {
    date: NaiveDate,
    start: String,
    #[serde(default)]
    duration_hours: Option<f32>,
}

async fn available_handler<R, A>(
    State(api): State<BookingApi<R, A>>,
    Query(query): Query<AvailabilityQuery>,
) -> Response
where
    R: WorkerRoster + 'static,
    A: AlertPublisher + 'static,
{
    let minutes =
        (query.duration_hours.unwrap_or(DEFAULT_DURATION_HOURS) * 60.0).round() as i64;
    let slot = match TimeSlot::parse(&query.start, minutes) {
        Ok(slot) => slot,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match api.dispatch.available_workers(query.date, slot) {
        Ok(workers) => (StatusCode::OK, axum::Json(workers)).into_response(),
        Err(error) => dispatch_error_response(error),
    }
}

async fn schedule_handler<R, A>(
    State(api): State<BookingApi<R, A>>,
    Path((worker_id, date)): Path<(String, NaiveDate)>,
) -> Response
where
    R: WorkerRoster + 'static,
    A: AlertPublisher + 'static,
{
    match api.dispatch.schedule(&WorkerId(worker_id), date) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => dispatch_error_response(error),
    }
}

async fn metrics_handler<R, A>(
    State(api): State<BookingApi<R, A>>,
    Path(worker_id): Path<String>,
) -> Response
where
    R: WorkerRoster + 'static,
    A: AlertPublisher + 'static,
{
    match api.dispatch.metrics(&WorkerId(worker_id)) {
        Ok(metrics) => (StatusCode::OK, axum::Json(metrics)).into_response(),
        Err(error) => dispatch_error_response(error),
    }
}

fn dispatch_error_response(error: DispatchError) -> Response {
    let status = match &error {
        DispatchError::Schedule(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DispatchError::Roster(RosterError::WorkerNotFound(_))
        | DispatchError::Roster(RosterError::BookingNotFound(_))
        | DispatchError::UnknownBooking(_) => StatusCode::NOT_FOUND,
        DispatchError::Roster(RosterError::SlotConflict { .. })
        | DispatchError::Roster(RosterError::CapacityReached { .. })
        | DispatchError::IneligibleWorker { .. } => StatusCode::CONFLICT,
        DispatchError::Roster(_) | DispatchError::Alert(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
