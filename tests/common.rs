use agenda_backend::{
    domain::models::booking::PaymentMethod,
    domain::models::notice::ScheduleNotice,
    domain::ports::{ChargeOutcome, Notifier, SettlementGateway},
    domain::services::booking_service::BookingService,
    domain::services::calendar::CalendarService,
    domain::services::interval::ScheduleRules,
    domain::services::ledger_service::LedgerService,
    domain::services::room_service::RoomService,
    error::AppError,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo, sqlite_directory_repo::SqliteDirectoryRepo,
        sqlite_ledger_repo::SqliteLedgerRepo, sqlite_reservation_repo::SqliteReservationRepo,
        sqlite_slot_repo::SqliteSlotRepo,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

#[allow(dead_code)]
pub struct MockSettlementGateway;

#[async_trait]
impl SettlementGateway for MockSettlementGateway {
    async fn charge(
        &self,
        _amount: i64,
        _method: PaymentMethod,
        _payer_ref: &str,
    ) -> Result<ChargeOutcome, AppError> {
        Ok(ChargeOutcome {
            external_reference: format!("charge_{}", Uuid::new_v4()),
            settled: true,
        })
    }
}

/// Declines every charge, the way the gateway does for an expired card.
#[allow(dead_code)]
pub struct FailingSettlementGateway;

#[async_trait]
impl SettlementGateway for FailingSettlementGateway {
    async fn charge(
        &self,
        _amount: i64,
        _method: PaymentMethod,
        _payer_ref: &str,
    ) -> Result<ChargeOutcome, AppError> {
        Err(AppError::Settlement("charge declined".to_string()))
    }
}

/// Accepts every charge but settles asynchronously, like a PIX charge
/// awaiting confirmation.
#[allow(dead_code)]
pub struct AsyncSettlementGateway;

#[async_trait]
impl SettlementGateway for AsyncSettlementGateway {
    async fn charge(
        &self,
        _amount: i64,
        _method: PaymentMethod,
        _payer_ref: &str,
    ) -> Result<ChargeOutcome, AppError> {
        Ok(ChargeOutcome {
            external_reference: format!("charge_{}", Uuid::new_v4()),
            settled: false,
        })
    }
}

#[allow(dead_code)]
pub struct MockNotifier;

#[async_trait]
impl Notifier for MockNotifier {
    async fn dispatch(&self, _notice: &ScheduleNotice) -> Result<(), AppError> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub rules: ScheduleRules,
    pub calendar: Arc<CalendarService>,
    pub bookings: Arc<BookingService>,
    pub rooms: Arc<RoomService>,
    pub ledger: Arc<LedgerService>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_gateway(Arc::new(MockSettlementGateway)).await
    }

    pub async fn with_gateway(gateway: Arc<dyn SettlementGateway>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let rules = ScheduleRules::default();
        let slot_repo = Arc::new(SqliteSlotRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let reservation_repo = Arc::new(SqliteReservationRepo::new(pool.clone()));
        let ledger_repo = Arc::new(SqliteLedgerRepo::new(pool.clone()));
        let directory = Arc::new(SqliteDirectoryRepo::new(pool.clone()));
        let notifier = Arc::new(MockNotifier);

        Self {
            calendar: Arc::new(CalendarService::new(
                slot_repo.clone(),
                directory.clone(),
                rules,
            )),
            bookings: Arc::new(BookingService::new(
                booking_repo,
                slot_repo,
                directory.clone(),
                directory.clone(),
                gateway.clone(),
                notifier.clone(),
                rules,
            )),
            rooms: Arc::new(RoomService::new(
                reservation_repo,
                directory.clone(),
                directory,
                gateway,
                notifier,
            )),
            ledger: Arc::new(LedgerService::new(ledger_repo)),
            pool,
            db_filename,
            rules,
        }
    }

    pub async fn seed_professional(&self, id: &str, name: &str) {
        sqlx::query("INSERT INTO professionals (id, name, specialty, created_at) VALUES (?, ?, NULL, ?)")
            .bind(id)
            .bind(name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .expect("Failed to seed professional");
    }

    pub async fn seed_room(&self, id: &str, name: &str, hourly_rate: i64) {
        sqlx::query("INSERT INTO rooms (id, name, hourly_rate, created_at) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(hourly_rate)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .expect("Failed to seed room");
    }

    pub async fn slot_status(&self, slot_id: &str) -> String {
        sqlx::query_scalar("SELECT status FROM slots WHERE id = ?")
            .bind(slot_id)
            .fetch_one(&self.pool)
            .await
            .expect("slot not found")
    }

    pub async fn booking_status(&self, booking_id: &str) -> String {
        sqlx::query_scalar("SELECT status FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_one(&self.pool)
            .await
            .expect("booking not found")
    }

    pub async fn ledger_row_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM ledger_entries")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count ledger entries")
    }

    pub async fn reservation_row_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM room_reservations")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count reservations")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
