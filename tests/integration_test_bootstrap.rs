use agenda_backend::config::Config;
use agenda_backend::domain::models::booking::{BookingStatus, CreateBooking, PaymentMethod};
use agenda_backend::domain::models::slot::SlotStatus;
use agenda_backend::infra::factory::bootstrap_state;
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use uuid::Uuid;

fn future_day_at(h: u32, m: u32) -> DateTime<Utc> {
    let date = Utc::now().date_naive() + Duration::days(3);
    date.and_hms_opt(h, m, 0).unwrap().and_utc()
}

// Boots the whole stack the way a deployment would: env -> Config ->
// bootstrap_state, then drives one booking through the resulting services.
// The notifier points at a dead localhost port; dispatch failures are
// swallowed, so the flow must still succeed.
#[tokio::test]
async fn test_bootstrap_wires_the_sqlite_stack_from_env() {
    let db_filename = format!("bootstrap_{}.db", Uuid::new_v4());
    std::env::set_var("DATABASE_URL", format!("sqlite://{}?mode=rwc", db_filename));
    std::env::set_var("SLOT_MINUTES", "45");
    let _guard = agenda_backend::init_logging();

    let config = Config::from_env();
    assert_eq!(config.rules.slot_minutes, 45);

    let state = bootstrap_state(&config).await;

    // The factory already ran the migrations; seed the directory directly.
    let pool = SqlitePoolOptions::new()
        .connect_with(SqliteConnectOptions::from_str(&config.database_url).unwrap())
        .await
        .expect("Failed to open the bootstrapped db");
    sqlx::query("INSERT INTO professionals (id, name, specialty, created_at) VALUES (?, ?, NULL, ?)")
        .bind("pro-1")
        .bind("Dra. Ana")
        .bind(Utc::now())
        .execute(&pool)
        .await
        .expect("Failed to seed professional");

    // SLOT_MINUTES=45 reached the calendar: 09:00 - 10:30 is two slots.
    let slots = state
        .calendar_service
        .generate("pro-1", future_day_at(9, 0), future_day_at(10, 30))
        .await
        .unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].end_at, future_day_at(9, 45));

    let booking = state
        .booking_service
        .create(CreateBooking {
            professional_id: "pro-1".to_string(),
            client_id: "client-1".to_string(),
            start_at: future_day_at(9, 0),
            payment_method: PaymentMethod::Card,
        })
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);

    let slot = state
        .slot_repo
        .find_by_id(&booking.slot_id)
        .await
        .unwrap()
        .expect("slot missing");
    assert_eq!(slot.status, SlotStatus::Reserved);

    let _ = std::fs::remove_file(&db_filename);
}
