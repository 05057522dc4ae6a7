//! Integration specifications for the quote and dispatch workflow.
//!
//! Scenarios drive the public service facades and the HTTP router end to end
//! so pricing, assignment, and schedule bookkeeping are validated without
//! reaching into private modules.

mod common {
    use std::sync::{Arc, Mutex};

    use chrono::{NaiveDate, NaiveTime};

    use tidyflow::workflows::booking::{
        booking_router, AlertError, AlertPublisher, BookingApi, BookingId, BookingRequest,
        DispatchAlert, DispatchService, Frequency, InMemoryRoster, QuoteEngine, QuoteRequest,
        ServiceType,
    };

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

    pub(super) fn service_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date")
    }

    pub(super) fn nine_am() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).expect("valid time")
    }

    pub(super) fn booking(id: &str, address: &str, service_type: ServiceType) -> BookingRequest {
        BookingRequest {
            booking_id: BookingId(id.to_string()),
            address: address.to_string(),
            service_type,
            service_date: service_date(),
            service_time: nine_am(),
            duration_hours: None,
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryAlerts {
        events: Arc<Mutex<Vec<DispatchAlert>>>,
    }

    impl MemoryAlerts {
        pub(super) fn events(&self) -> Vec<DispatchAlert> {
            self.events.lock().expect("lock").clone()
        }
    }

    impl AlertPublisher for MemoryAlerts {
        fn publish(&self, alert: DispatchAlert) -> Result<(), AlertError> {
            self.events.lock().expect("lock").push(alert);
            Ok(())
        }
    }

    pub(super) fn build_dispatch() -> (
        DispatchService<InMemoryRoster, MemoryAlerts>,
        Arc<InMemoryRoster>,
        Arc<MemoryAlerts>,
    ) {
        let roster = Arc::new(InMemoryRoster::new(
            tidyflow::workflows::booking::seed::demo_roster(),
        ));
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
}

mod pricing {
    use super::common::*;
    use tidyflow::workflows::booking::{Frequency, QuoteEngine, TimeOfDay};

    #[test]
    fn published_tariff_prices_the_reference_property_at_base() {
        let engine = QuoteEngine::default();
        let quote = engine.quote(&quote_request());
        assert_eq!(quote.total, 135.0);
        assert_eq!(quote.savings, 0.0);
    }

    #[test]
    fn recurring_service_is_cheaper_than_one_time() {
        let engine = QuoteEngine::default();
        let onetime = engine.quote(&quote_request());

        for frequency in [Frequency::Weekly, Frequency::Biweekly, Frequency::Monthly] {
            let mut request = quote_request();
            request.frequency = frequency;
            let recurring = engine.quote(&request);
            assert!(
                recurring.total < onetime.total,
                "{frequency:?} should discount the one-time price"
            );
        }
    }

    #[test]
    fn surcharges_survive_the_discount() {
        let engine = QuoteEngine::default();
        let mut request = quote_request();
        request.frequency = Frequency::Weekly;
        request.time_of_day = Some(TimeOfDay::Evening);
        request.day_of_week = Some(6);
        request.rush_service = true;

        let quote = engine.quote(&request);
        assert!(quote.surcharge > 0.0);
        assert!((quote.discount - (quote.subtotal + quote.add_ons_total) * 0.20).abs() < 0.01);
    }

    #[test]
    fn competitor_comparison_marks_up_the_quoted_total() {
        let engine = QuoteEngine::default();
        let quote = engine.quote(&quote_request());
        let comparison = engine.competitor_comparison(quote.total);

        assert_eq!(comparison.our_price, quote.total);
        for competitor in &comparison.competitors {
            assert!(competitor.price > quote.total);
        }
    }
}

mod dispatch {
    use super::common::*;
    use tidyflow::workflows::booking::{AssignmentOutcome, ServiceType, WorkerId};

    #[test]
    fn the_reference_booking_goes_to_the_zone_and_skill_match() {
        let (service, _, alerts) = build_dispatch();
        let request = booking(
            "B-1",
            "1100 Congress Ave, Austin, TX 78701",
            ServiceType::Airbnb,
        );

        match service.assign(&request).expect("assignment runs") {
            AssignmentOutcome::Assigned { worker, score } => {
                assert_eq!(worker.id.0, "W001");
                assert!(score > 0.0);
            }
            other => panic!("expected assignment, got {other:?}"),
        }

        assert_eq!(alerts.events().len(), 1);
    }

    #[test]
    fn schedules_accumulate_without_overlap() {
        let (service, roster, _) = build_dispatch();

        let first = booking("B-1", "501 E 6th St, 78701", ServiceType::Standard);
        let second = booking("B-2", "502 E 6th St, 78701", ServiceType::Standard);

        let first_outcome = service.assign(&first).expect("first assignment");
        let second_outcome = service.assign(&second).expect("second assignment");

        let first_worker = match first_outcome {
            AssignmentOutcome::Assigned { worker, .. } => worker,
            other => panic!("expected assignment, got {other:?}"),
        };
        let second_worker = match second_outcome {
            AssignmentOutcome::Assigned { worker, .. } => worker,
            other => panic!("expected assignment, got {other:?}"),
        };

        // Identical windows cannot share a crew.
        assert_ne!(first_worker.id, second_worker.id);

        use tidyflow::workflows::booking::WorkerRoster;
        for id in [first_worker.id, second_worker.id] {
            let worker = roster.get(&id).expect("roster read").expect("present");
            let day = worker
                .availability
                .get(&service_date())
                .expect("day entry");
            for pair in day.booked.windows(2) {
                assert!(!pair[0].slot.overlaps(&pair[1].slot));
            }
        }
    }

    #[test]
    fn validated_reassignment_keeps_exactly_one_reservation() {
        let (service, roster, _) = build_dispatch();
        let request = booking("B-1", "900 Red River St, 78701", ServiceType::Standard);

        let assigned = match service.assign(&request).expect("assignment") {
            AssignmentOutcome::Assigned { worker, .. } => worker,
            other => panic!("expected assignment, got {other:?}"),
        };

        let target = WorkerId("W003".to_string());
        let moved = service
            .reassign(&request, &target)
            .expect("reassignment succeeds");
        assert_eq!(moved.id, target);

        use tidyflow::workflows::booking::WorkerRoster;
        let holders: usize = roster
            .all()
            .expect("roster read")
            .iter()
            .filter(|worker| {
                worker
                    .availability
                    .get(&service_date())
                    .map(|day| {
                        day.booked
                            .iter()
                            .any(|entry| entry.booking_id == request.booking_id)
                    })
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(holders, 1);
        assert_ne!(assigned.id, target);
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn quote_then_assign_through_the_http_surface() {
        let router = build_router();

        let quote_request = Request::builder()
            .method("POST")
            .uri("/api/v1/bookings/quote")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "bedrooms": 4,
                    "bathrooms": 2,
                    "squareFeet": 2100,
                    "serviceType": "deep",
                    "frequency": "biweekly",
                    "addOns": ["insideOven"],
                    "location": "Downtown Austin"
                })
                .to_string(),
            ))
            .expect("request");

        let response = router
            .clone()
            .oneshot(quote_request)
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        let total = payload
            .pointer("/quote/total")
            .and_then(Value::as_f64)
            .expect("total present");
        assert!(total > 0.0);

        let assign_request = Request::builder()
            .method("POST")
            .uri("/api/v1/bookings/assignments")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "bookingId": "B-INT-1",
                    "address": "1100 Congress Ave, Austin, TX 78701",
                    "serviceType": "airbnb",
                    "serviceDate": "2026-03-14",
                    "serviceTime": "09:00"
                })
                .to_string(),
            ))
            .expect("request");

        let response = router
            .clone()
            .oneshot(assign_request)
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(
            payload.pointer("/worker/id").and_then(Value::as_str),
            Some("W001")
        );

        let schedule_request = Request::builder()
            .method("GET")
            .uri("/api/v1/workers/W001/schedule/2026-03-14")
            .body(Body::empty())
            .expect("request");
        let response = router
            .oneshot(schedule_request)
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(
            payload
                .get("booked")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(1)
        );
    }
}
