use std::env;

use chrono::NaiveTime;

use crate::domain::services::interval::ScheduleRules;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub settlement_service_url: String,
    pub settlement_service_token: String,
    pub notify_service_url: String,
    pub notify_service_token: String,
    pub rules: ScheduleRules,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            settlement_service_url: env::var("SETTLEMENT_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8100/api/v1/charges".to_string()),
            settlement_service_token: env::var("SETTLEMENT_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            notify_service_url: env::var("NOTIFY_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8200/api/v1/notices".to_string()),
            notify_service_token: env::var("NOTIFY_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            rules: ScheduleRules {
                business_open: parse_time(&env::var("BUSINESS_OPEN").unwrap_or_else(|_| "07:00".to_string())),
                business_close: parse_time(&env::var("BUSINESS_CLOSE").unwrap_or_else(|_| "21:00".to_string())),
                lunch_start: parse_time(&env::var("LUNCH_START").unwrap_or_else(|_| "12:00".to_string())),
                lunch_end: parse_time(&env::var("LUNCH_END").unwrap_or_else(|_| "13:00".to_string())),
                min_lead_hours: env::var("MIN_LEAD_HOURS").unwrap_or_else(|_| "24".to_string()).parse().expect("MIN_LEAD_HOURS must be a number"),
                slot_minutes: env::var("SLOT_MINUTES").unwrap_or_else(|_| "30".to_string()).parse().expect("SLOT_MINUTES must be a number"),
            },
        }
    }
}

fn parse_time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").expect("schedule times must be HH:MM")
}
