mod common;

use agenda_backend::domain::models::booking::{CreateBooking, PaymentMethod};
use agenda_backend::domain::models::slot::SlotStatus;
use agenda_backend::error::AppError;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use common::TestApp;

fn target_day() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(3)
}

fn day_at(h: u32, m: u32) -> DateTime<Utc> {
    target_day().and_hms_opt(h, m, 0).unwrap().and_utc()
}

#[tokio::test]
async fn test_reconcile_replaces_the_free_day() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    app.calendar
        .generate("pro-1", day_at(9, 0), day_at(11, 0))
        .await
        .unwrap();

    let day = app
        .calendar
        .reconcile(
            "pro-1",
            target_day(),
            &[(day_at(14, 0), day_at(14, 30)), (day_at(14, 30), day_at(15, 0))],
        )
        .await
        .unwrap();

    assert_eq!(day.len(), 2);
    assert_eq!(day[0].start_at, day_at(14, 0));
    assert_eq!(day[1].start_at, day_at(14, 30));
    assert!(day.iter().all(|s| s.status == SlotStatus::Free));
}

#[tokio::test]
async fn test_reconcile_never_touches_booked_slots() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    app.calendar
        .generate("pro-1", day_at(9, 0), day_at(10, 0))
        .await
        .unwrap();

    // 09:00 goes RESERVED through a real booking.
    app.bookings
        .create(CreateBooking {
            professional_id: "pro-1".to_string(),
            client_id: "client-1".to_string(),
            start_at: day_at(9, 0),
            payment_method: PaymentMethod::Card,
        })
        .await
        .unwrap();

    let day = app
        .calendar
        .reconcile("pro-1", target_day(), &[(day_at(10, 0), day_at(10, 30))])
        .await
        .unwrap();

    // The reserved 09:00 survives, the free 09:30 is gone, 10:00 is new.
    assert_eq!(day.len(), 2);
    assert_eq!(day[0].start_at, day_at(9, 0));
    assert_eq!(day[0].status, SlotStatus::Reserved);
    assert_eq!(day[1].start_at, day_at(10, 0));
    assert_eq!(day[1].status, SlotStatus::Free);
}

#[tokio::test]
async fn test_reconcile_skips_desired_intervals_shadowed_by_bookings() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    app.calendar
        .generate("pro-1", day_at(9, 0), day_at(10, 0))
        .await
        .unwrap();
    app.bookings
        .create(CreateBooking {
            professional_id: "pro-1".to_string(),
            client_id: "client-1".to_string(),
            start_at: day_at(9, 0),
            payment_method: PaymentMethod::Card,
        })
        .await
        .unwrap();

    let day = app
        .calendar
        .reconcile("pro-1", target_day(), &[(day_at(9, 0), day_at(9, 30))])
        .await
        .unwrap();

    // No duplicate FREE slot appears under the reserved one.
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].status, SlotStatus::Reserved);
}

#[tokio::test]
async fn test_reconcile_rejects_intervals_outside_the_day() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    let next_day = day_at(9, 0) + Duration::days(1);
    let err = app
        .calendar
        .reconcile("pro-1", target_day(), &[(next_day, next_day + Duration::minutes(30))])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRange(_)));
}

#[tokio::test]
async fn test_reconcile_rejects_business_rule_violations() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    let before_opening = app
        .calendar
        .reconcile("pro-1", target_day(), &[(day_at(6, 0), day_at(6, 30))])
        .await
        .unwrap_err();
    assert!(matches!(before_opening, AppError::InvalidRange(_)));

    let through_lunch = app
        .calendar
        .reconcile("pro-1", target_day(), &[(day_at(11, 45), day_at(12, 15))])
        .await
        .unwrap_err();
    assert!(matches!(through_lunch, AppError::InvalidRange(_)));
}

#[tokio::test]
async fn test_reconcile_rejects_overlapping_desired_intervals() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    let err = app
        .calendar
        .reconcile(
            "pro-1",
            target_day(),
            &[(day_at(9, 0), day_at(10, 0)), (day_at(9, 30), day_at(10, 30))],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Overlap(_)));
}
