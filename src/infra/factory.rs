use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::notify::http_notifier::HttpNotifier;
use crate::infra::settlement::http_gateway::HttpSettlementGateway;
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::calendar::CalendarService;
use crate::domain::services::ledger_service::LedgerService;
use crate::domain::services::room_service::RoomService;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_directory_repo::PostgresDirectoryRepo,
    postgres_ledger_repo::PostgresLedgerRepo, postgres_reservation_repo::PostgresReservationRepo,
    postgres_slot_repo::PostgresSlotRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_directory_repo::SqliteDirectoryRepo,
    sqlite_ledger_repo::SqliteLedgerRepo, sqlite_reservation_repo::SqliteReservationRepo,
    sqlite_slot_repo::SqliteSlotRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let settlement_gateway = Arc::new(HttpSettlementGateway::new(
        config.settlement_service_url.clone(),
        config.settlement_service_token.clone(),
    ));
    let notifier = Arc::new(HttpNotifier::new(
        config.notify_service_url.clone(),
        config.notify_service_token.clone(),
    ));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let slot_repo = Arc::new(PostgresSlotRepo::new(pool.clone()));
        let booking_repo = Arc::new(PostgresBookingRepo::new(pool.clone()));
        let reservation_repo = Arc::new(PostgresReservationRepo::new(pool.clone()));
        let ledger_repo = Arc::new(PostgresLedgerRepo::new(pool.clone()));
        let directory = Arc::new(PostgresDirectoryRepo::new(pool.clone()));

        AppState {
            config: config.clone(),
            slot_repo: slot_repo.clone(),
            booking_repo: booking_repo.clone(),
            reservation_repo: reservation_repo.clone(),
            ledger_repo: ledger_repo.clone(),
            professional_directory: directory.clone(),
            room_directory: directory.clone(),
            settlement_gateway: settlement_gateway.clone(),
            notifier: notifier.clone(),
            calendar_service: Arc::new(CalendarService::new(
                slot_repo.clone(),
                directory.clone(),
                config.rules,
            )),
            booking_service: Arc::new(BookingService::new(
                booking_repo,
                slot_repo,
                directory.clone(),
                directory.clone(),
                settlement_gateway.clone(),
                notifier.clone(),
                config.rules,
            )),
            room_service: Arc::new(RoomService::new(
                reservation_repo,
                directory.clone(),
                directory,
                settlement_gateway,
                notifier,
            )),
            ledger_service: Arc::new(LedgerService::new(ledger_repo)),
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let slot_repo = Arc::new(SqliteSlotRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let reservation_repo = Arc::new(SqliteReservationRepo::new(pool.clone()));
        let ledger_repo = Arc::new(SqliteLedgerRepo::new(pool.clone()));
        let directory = Arc::new(SqliteDirectoryRepo::new(pool.clone()));

        AppState {
            config: config.clone(),
            slot_repo: slot_repo.clone(),
            booking_repo: booking_repo.clone(),
            reservation_repo: reservation_repo.clone(),
            ledger_repo: ledger_repo.clone(),
            professional_directory: directory.clone(),
            room_directory: directory.clone(),
            settlement_gateway: settlement_gateway.clone(),
            notifier: notifier.clone(),
            calendar_service: Arc::new(CalendarService::new(
                slot_repo.clone(),
                directory.clone(),
                config.rules,
            )),
            booking_service: Arc::new(BookingService::new(
                booking_repo,
                slot_repo,
                directory.clone(),
                directory.clone(),
                settlement_gateway.clone(),
                notifier.clone(),
                config.rules,
            )),
            room_service: Arc::new(RoomService::new(
                reservation_repo,
                directory.clone(),
                directory,
                settlement_gateway,
                notifier,
            )),
            ledger_service: Arc::new(LedgerService::new(ledger_repo)),
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
