mod common;

use agenda_backend::error::AppError;
use chrono::{DateTime, Duration, Timelike, Utc};
use common::TestApp;

/// A whole-second instant a few days out, so lead-time rules never interfere.
fn future_day_at(h: u32, m: u32) -> DateTime<Utc> {
    let date = Utc::now().date_naive() + Duration::days(3);
    date.and_hms_opt(h, m, 0).unwrap().and_utc()
}

#[tokio::test]
async fn test_generate_fills_the_business_day_and_skips_lunch() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    let slots = app
        .calendar
        .generate("pro-1", future_day_at(7, 0), future_day_at(21, 0))
        .await
        .unwrap();

    // 28 half-hour slots fit between 07:00 and 21:00; the two inside the
    // lunch window are skipped.
    assert_eq!(slots.len(), 26);
    assert!(slots.iter().all(|s| s.start_at.hour() != 12));
    assert_eq!(slots[0].start_at, future_day_at(7, 0));
    assert_eq!(slots[25].end_at, future_day_at(21, 0));
}

#[tokio::test]
async fn test_generate_drops_intervals_outside_business_hours() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    let slots = app
        .calendar
        .generate("pro-1", future_day_at(6, 0), future_day_at(8, 0))
        .await
        .unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start_at, future_day_at(7, 0));
    assert_eq!(slots[1].start_at, future_day_at(7, 30));
}

#[tokio::test]
async fn test_generate_ignores_trailing_partial_slot() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    let slots = app
        .calendar
        .generate("pro-1", future_day_at(9, 0), future_day_at(9, 45))
        .await
        .unwrap();

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].end_at, future_day_at(9, 30));
}

#[tokio::test]
async fn test_generate_unknown_professional() {
    let app = TestApp::new().await;

    let err = app
        .calendar
        .generate("ghost", future_day_at(9, 0), future_day_at(10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_generate_rejects_inverted_range() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    let err = app
        .calendar
        .generate("pro-1", future_day_at(10, 0), future_day_at(9, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRange(_)));
}

#[tokio::test]
async fn test_generate_rejects_short_notice() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    let start = Utc::now() + Duration::hours(2);
    let err = app
        .calendar
        .generate("pro-1", start, start + Duration::hours(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRange(_)));
}

#[tokio::test]
async fn test_generate_rejects_the_whole_batch_on_overlap() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    app.calendar
        .generate("pro-1", future_day_at(9, 0), future_day_at(10, 0))
        .await
        .unwrap();

    let err = app
        .calendar
        .generate("pro-1", future_day_at(9, 30), future_day_at(10, 30))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Overlap(_)));

    // Nothing from the rejected batch may land, not even 10:00.
    let slots = app
        .calendar
        .list_range("pro-1", future_day_at(7, 0), future_day_at(21, 0))
        .await
        .unwrap();
    assert_eq!(slots.len(), 2);
}

#[tokio::test]
async fn test_find_by_schedule_matches_exact_start() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    app.calendar
        .generate("pro-1", future_day_at(9, 0), future_day_at(10, 0))
        .await
        .unwrap();

    let hit = app
        .calendar
        .find_by_schedule("pro-1", future_day_at(9, 30))
        .await
        .unwrap();
    assert!(hit.is_some());

    let miss = app
        .calendar
        .find_by_schedule("pro-1", future_day_at(9, 15))
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn test_delete_only_removes_free_slots() {
    let app = TestApp::new().await;
    app.seed_professional("pro-1", "Dra. Ana").await;

    let slots = app
        .calendar
        .generate("pro-1", future_day_at(9, 0), future_day_at(10, 0))
        .await
        .unwrap();

    app.calendar.delete_slot(&slots[0].id).await.unwrap();

    sqlx::query("UPDATE slots SET status = 'RESERVED' WHERE id = ?")
        .bind(&slots[1].id)
        .execute(&app.pool)
        .await
        .unwrap();

    let err = app.calendar.delete_slot(&slots[1].id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(app.slot_status(&slots[1].id).await, "RESERVED");
}
