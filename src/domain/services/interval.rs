use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Business-rule knobs for the slot grid. One fixed set applies to the whole
/// installation; per-professional tuning is out of scope. All time-of-day
/// rules are evaluated against the clock face of the single zone the caller
/// committed to, so no conversion logic lives here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleRules {
    pub business_open: NaiveTime,
    pub business_close: NaiveTime,
    pub lunch_start: NaiveTime,
    pub lunch_end: NaiveTime,
    pub min_lead_hours: i64,
    pub slot_minutes: i64,
}

impl Default for ScheduleRules {
    fn default() -> Self {
        Self {
            business_open: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            business_close: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            lunch_start: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            lunch_end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            min_lead_hours: 24,
            slot_minutes: 30,
        }
    }
}

/// Half-open interval intersection. Touching endpoints do not overlap.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// The window sits inside one business day: same calendar day, opening at or
/// after business hours start, closing by business hours end.
pub fn within_business_hours(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rules: &ScheduleRules,
) -> bool {
    start.date_naive() == end.date_naive()
        && start.time() >= rules.business_open
        && end.time() <= rules.business_close
}

/// Point query: the instant falls inside the lunch break.
pub fn is_lunch_window(at: DateTime<Utc>, rules: &ScheduleRules) -> bool {
    let t = at.time();
    t >= rules.lunch_start && t < rules.lunch_end
}

/// Interval form of the lunch test. A window that merely touches the lunch
/// boundary does not cross it.
pub fn crosses_lunch_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rules: &ScheduleRules,
) -> bool {
    overlaps(start.time(), end.time(), rules.lunch_start, rules.lunch_end)
}

pub fn has_minimum_lead_time(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    rules: &ScheduleRules,
) -> bool {
    start - now >= Duration::hours(rules.min_lead_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 10, h, m, 0).unwrap()
    }

    #[test]
    fn test_touching_endpoints_do_not_overlap() {
        assert!(!overlaps(at(9, 0), at(10, 0), at(10, 0), at(11, 0)));
        assert!(!overlaps(at(10, 0), at(11, 0), at(9, 0), at(10, 0)));
    }

    #[test]
    fn test_partial_and_contained_intervals_overlap() {
        assert!(overlaps(at(9, 0), at(10, 0), at(9, 30), at(10, 30)));
        assert!(overlaps(at(9, 0), at(12, 0), at(10, 0), at(11, 0)));
        assert!(overlaps(at(10, 0), at(11, 0), at(9, 0), at(12, 0)));
    }

    #[test]
    fn test_business_hours_bounds_are_inclusive() {
        let rules = ScheduleRules::default();
        assert!(within_business_hours(at(7, 0), at(7, 30), &rules));
        assert!(within_business_hours(at(20, 30), at(21, 0), &rules));
        assert!(!within_business_hours(at(6, 30), at(7, 0), &rules));
        assert!(!within_business_hours(at(20, 45), at(21, 15), &rules));
    }

    #[test]
    fn test_business_hours_require_a_single_day() {
        let rules = ScheduleRules::default();
        let start = Utc.with_ymd_and_hms(2030, 6, 10, 20, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 6, 11, 7, 30, 0).unwrap();
        assert!(!within_business_hours(start, end, &rules));
    }

    #[test]
    fn test_lunch_window_is_half_open() {
        let rules = ScheduleRules::default();
        assert!(is_lunch_window(at(12, 0), &rules));
        assert!(is_lunch_window(at(12, 59), &rules));
        assert!(!is_lunch_window(at(13, 0), &rules));
        assert!(!is_lunch_window(at(11, 59), &rules));
    }

    #[test]
    fn test_touching_the_lunch_boundary_does_not_cross() {
        let rules = ScheduleRules::default();
        assert!(!crosses_lunch_window(at(11, 30), at(12, 0), &rules));
        assert!(!crosses_lunch_window(at(13, 0), at(13, 30), &rules));
        assert!(crosses_lunch_window(at(11, 45), at(12, 15), &rules));
        assert!(crosses_lunch_window(at(12, 15), at(12, 45), &rules));
    }

    #[test]
    fn test_lead_time_boundary_is_inclusive() {
        let rules = ScheduleRules::default();
        let now = at(10, 0);
        assert!(has_minimum_lead_time(now + Duration::hours(24), now, &rules));
        assert!(!has_minimum_lead_time(
            now + Duration::hours(24) - Duration::minutes(1),
            now,
            &rules
        ));
    }
}
