pub mod sqlite_booking_repo;
pub mod sqlite_directory_repo;
pub mod sqlite_ledger_repo;
pub mod sqlite_reservation_repo;
pub mod sqlite_slot_repo;

pub mod postgres_booking_repo;
pub mod postgres_directory_repo;
pub mod postgres_ledger_repo;
pub mod postgres_reservation_repo;
pub mod postgres_slot_repo;
