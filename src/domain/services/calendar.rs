use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::info;

use crate::domain::models::slot::{Slot, SlotStatus};
use crate::domain::ports::{ProfessionalDirectory, SlotRepository};
use crate::domain::services::interval::{self, ScheduleRules};
use crate::error::AppError;

/// Authoritative set of bookable intervals per professional.
pub struct CalendarService {
    slots: Arc<dyn SlotRepository>,
    professionals: Arc<dyn ProfessionalDirectory>,
    rules: ScheduleRules,
}

impl CalendarService {
    pub fn new(
        slots: Arc<dyn SlotRepository>,
        professionals: Arc<dyn ProfessionalDirectory>,
        rules: ScheduleRules,
    ) -> Self {
        Self { slots, professionals, rules }
    }

    /// Partitions the range into fixed-duration FREE slots, skipping
    /// sub-intervals outside business hours or crossing the lunch break.
    /// Any overlap with an existing slot rejects the whole batch.
    pub async fn generate(
        &self,
        professional_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Slot>, AppError> {
        self.professionals
            .find_by_id(professional_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("professional {} not found", professional_id))
            })?;

        if range_start >= range_end {
            return Err(AppError::InvalidRange(
                "range start must precede range end".to_string(),
            ));
        }
        if !interval::has_minimum_lead_time(range_start, Utc::now(), &self.rules) {
            return Err(AppError::InvalidRange(format!(
                "range must start at least {}h ahead",
                self.rules.min_lead_hours
            )));
        }

        let step = Duration::minutes(self.rules.slot_minutes);
        let mut candidates = Vec::new();
        let mut cursor = range_start;
        while cursor + step <= range_end {
            let slot_end = cursor + step;
            if interval::within_business_hours(cursor, slot_end, &self.rules)
                && !interval::crosses_lunch_window(cursor, slot_end, &self.rules)
            {
                candidates.push(Slot::new(professional_id.to_string(), cursor, slot_end));
            }
            cursor = slot_end;
        }

        let existing = self
            .slots
            .list_in_range(professional_id, range_start, range_end)
            .await?;
        for candidate in &candidates {
            let clash = existing.iter().find(|s| {
                interval::overlaps(candidate.start_at, candidate.end_at, s.start_at, s.end_at)
            });
            if let Some(s) = clash {
                return Err(AppError::Overlap(format!(
                    "candidate {} - {} overlaps existing slot {}",
                    candidate.start_at, candidate.end_at, s.id
                )));
            }
        }

        self.slots.insert_batch(professional_id, &candidates).await?;
        info!(
            "Generated {} slots for professional {}",
            candidates.len(),
            professional_id
        );
        Ok(candidates)
    }

    /// Atomically regenerates one day of a professional's calendar toward the
    /// desired interval set. Slots that are not FREE are never touched.
    pub async fn reconcile(
        &self,
        professional_id: &str,
        day: NaiveDate,
        desired: &[(DateTime<Utc>, DateTime<Utc>)],
    ) -> Result<Vec<Slot>, AppError> {
        self.professionals
            .find_by_id(professional_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("professional {} not found", professional_id))
            })?;

        let day_start = day.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let day_end = day_start + Duration::days(1);

        for (start, end) in desired {
            if start >= end {
                return Err(AppError::InvalidRange(format!(
                    "desired interval {} - {} is inverted",
                    start, end
                )));
            }
            if *start < day_start || *end > day_end {
                return Err(AppError::InvalidRange(format!(
                    "desired interval {} - {} falls outside {}",
                    start, end, day
                )));
            }
            if !interval::within_business_hours(*start, *end, &self.rules)
                || interval::crosses_lunch_window(*start, *end, &self.rules)
            {
                return Err(AppError::InvalidRange(format!(
                    "desired interval {} - {} violates business hours",
                    start, end
                )));
            }
        }
        for (i, (start, end)) in desired.iter().enumerate() {
            if let Some((os, oe)) = desired[..i]
                .iter()
                .find(|(os, oe)| interval::overlaps(*start, *end, *os, *oe))
            {
                return Err(AppError::Overlap(format!(
                    "desired intervals {} - {} and {} - {} overlap",
                    start, end, os, oe
                )));
            }
        }

        let rows: Vec<Slot> = desired
            .iter()
            .map(|(start, end)| Slot::new(professional_id.to_string(), *start, *end))
            .collect();

        let day_slots = self
            .slots
            .reconcile_day(professional_id, day_start, day_end, &rows)
            .await?;
        info!(
            "Reconciled {} for professional {}: {} slots",
            day,
            professional_id,
            day_slots.len()
        );
        Ok(day_slots)
    }

    /// Exact-start lookup used by booking creation.
    pub async fn find_by_schedule(
        &self,
        professional_id: &str,
        start_at: DateTime<Utc>,
    ) -> Result<Option<Slot>, AppError> {
        self.slots.find_by_schedule(professional_id, start_at).await
    }

    pub async fn list_range(
        &self,
        professional_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Slot>, AppError> {
        self.slots.list_in_range(professional_id, start, end).await
    }

    /// Removes a slot from the calendar. Only FREE slots may go.
    pub async fn delete_slot(&self, slot_id: &str) -> Result<(), AppError> {
        let slot = self
            .slots
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("slot {} not found", slot_id)))?;
        if slot.status != SlotStatus::Free {
            return Err(AppError::Conflict(
                "only free slots can be deleted".to_string(),
            ));
        }
        self.slots.delete(slot_id).await
    }
}

/// The delete/insert sets that turn `current` into the desired day. Pure;
/// the slot repositories execute it inside their reconcile transaction.
pub struct ReconcilePlan {
    pub delete_ids: Vec<String>,
    pub insert: Vec<Slot>,
}

pub fn plan_reconcile(current: &[Slot], desired: &[Slot]) -> ReconcilePlan {
    let mut delete_ids = Vec::new();
    for slot in current {
        if slot.status != SlotStatus::Free {
            continue;
        }
        let kept = desired
            .iter()
            .any(|d| d.start_at == slot.start_at && d.end_at == slot.end_at);
        if !kept {
            delete_ids.push(slot.id.clone());
        }
    }

    let mut insert = Vec::new();
    for d in desired {
        let already_covered = current.iter().any(|s| {
            s.status == SlotStatus::Free && s.start_at == d.start_at && s.end_at == d.end_at
        });
        let shadowed = current.iter().any(|s| {
            s.status != SlotStatus::Free
                && interval::overlaps(d.start_at, d.end_at, s.start_at, s.end_at)
        });
        if !already_covered && !shadowed {
            insert.push(d.clone());
        }
    }

    ReconcilePlan { delete_ids, insert }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot_at(h: u32, m: u32, status: SlotStatus) -> Slot {
        let start = Utc.with_ymd_and_hms(2030, 6, 10, h, m, 0).unwrap();
        let mut slot = Slot::new("pro-1".to_string(), start, start + Duration::minutes(30));
        slot.status = status;
        slot
    }

    #[test]
    fn test_plan_keeps_exactly_matching_free_slots() {
        let current = vec![slot_at(9, 0, SlotStatus::Free)];
        let desired = vec![slot_at(9, 0, SlotStatus::Free)];

        let plan = plan_reconcile(&current, &desired);
        assert!(plan.delete_ids.is_empty(), "exact match must not be deleted");
        assert!(plan.insert.is_empty(), "exact match must not be re-inserted");
    }

    #[test]
    fn test_plan_deletes_free_slots_outside_the_desired_set() {
        let current = vec![
            slot_at(9, 0, SlotStatus::Free),
            slot_at(10, 0, SlotStatus::Free),
        ];
        let desired = vec![slot_at(9, 0, SlotStatus::Free)];

        let plan = plan_reconcile(&current, &desired);
        assert_eq!(plan.delete_ids, vec![current[1].id.clone()]);
        assert!(plan.insert.is_empty());
    }

    #[test]
    fn test_plan_never_deletes_non_free_slots() {
        let current = vec![
            slot_at(9, 0, SlotStatus::Occupied),
            slot_at(10, 0, SlotStatus::Reserved),
            slot_at(11, 0, SlotStatus::Blocked),
        ];
        let plan = plan_reconcile(&current, &[]);
        assert!(plan.delete_ids.is_empty());
    }

    #[test]
    fn test_plan_skips_desired_intervals_shadowed_by_preserved_slots() {
        let current = vec![slot_at(9, 0, SlotStatus::Occupied)];
        let desired = vec![slot_at(9, 0, SlotStatus::Free)];

        let plan = plan_reconcile(&current, &desired);
        assert!(plan.insert.is_empty(), "occupied slot already covers 09:00");
        assert!(plan.delete_ids.is_empty());
    }

    #[test]
    fn test_plan_inserts_new_coverage() {
        let current = vec![slot_at(9, 0, SlotStatus::Free)];
        let desired = vec![
            slot_at(9, 0, SlotStatus::Free),
            slot_at(10, 0, SlotStatus::Free),
        ];

        let plan = plan_reconcile(&current, &desired);
        assert!(plan.delete_ids.is_empty());
        assert_eq!(plan.insert.len(), 1);
        assert_eq!(plan.insert[0].start_at, desired[1].start_at);
    }
}
