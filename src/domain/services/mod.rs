pub mod booking_service;
pub mod calendar;
pub mod interval;
pub mod ledger_service;
pub mod room_service;
