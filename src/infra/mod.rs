pub mod factory;
pub mod notify;
pub mod repositories;
pub mod settlement;
