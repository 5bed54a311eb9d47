use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, LedgerRepository, Notifier, ProfessionalDirectory,
    ReservationRepository, RoomDirectory, SettlementGateway, SlotRepository,
};
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::calendar::CalendarService;
use crate::domain::services::ledger_service::LedgerService;
use crate::domain::services::room_service::RoomService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub slot_repo: Arc<dyn SlotRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub ledger_repo: Arc<dyn LedgerRepository>,
    pub professional_directory: Arc<dyn ProfessionalDirectory>,
    pub room_directory: Arc<dyn RoomDirectory>,
    pub settlement_gateway: Arc<dyn SettlementGateway>,
    pub notifier: Arc<dyn Notifier>,
    pub calendar_service: Arc<CalendarService>,
    pub booking_service: Arc<BookingService>,
    pub room_service: Arc<RoomService>,
    pub ledger_service: Arc<LedgerService>,
}
