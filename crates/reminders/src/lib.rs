//! Reminder scheduling for statutory deadlines.
//!
//! Converts a deadline into the dates on which reminders should fire.
//! Delivery (email, SMS, dashboard) is left to the caller.

use chrono::NaiveDate;
use ilegalflow_calendar::subtract_days;
use ilegalflow_model::DeadlineInfo;
use serde::{Deserialize, Serialize};

/// Days before the due date at which reminders fire by default.
pub const DEFAULT_OFFSETS: [u32; 9] = [365, 180, 90, 60, 30, 14, 7, 3, 1];

/// A single reminder trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub days_before: u32,
    pub trigger_date: NaiveDate,
}

/// The reminders still ahead for one deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSchedule {
    pub deadline: DeadlineInfo,
    pub reminders: Vec<Reminder>,
}

impl ReminderSchedule {
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.reminders.iter().map(|r| r.trigger_date).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }
}

/// Which offsets to schedule reminders at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPolicy {
    /// Days before the due date, applied in the order given
    #[serde(default = "default_offsets")]
    pub offsets: Vec<u32>,
}

fn default_offsets() -> Vec<u32> {
    DEFAULT_OFFSETS.to_vec()
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            offsets: default_offsets(),
        }
    }
}

impl ReminderPolicy {
    pub fn with_offsets(offsets: Vec<u32>) -> Self {
        Self { offsets }
    }

    /// Build the schedule for a deadline.
    ///
    /// Offsets at or beyond the deadline's days remaining are dropped, so
    /// every reminder falls strictly after today.
    pub fn build(&self, deadline: &DeadlineInfo) -> ReminderSchedule {
        let reminders = self
            .offsets
            .iter()
            .filter(|&&offset| i64::from(offset) < deadline.days_remaining)
            .filter_map(|&offset| {
                subtract_days(deadline.date, offset).map(|trigger_date| Reminder {
                    days_before: offset,
                    trigger_date,
                })
            })
            .collect();

        ReminderSchedule {
            deadline: *deadline,
            reminders,
        }
    }
}

/// Reminder dates for a deadline using the given offsets.
pub fn schedule(deadline: &DeadlineInfo, offsets: &[u32]) -> Vec<NaiveDate> {
    ReminderPolicy::with_offsets(offsets.to_vec())
        .build(deadline)
        .dates()
}

/// Reminder dates for a deadline using `DEFAULT_OFFSETS`.
pub fn schedule_default(deadline: &DeadlineInfo) -> Vec<NaiveDate> {
    schedule(deadline, &DEFAULT_OFFSETS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilegalflow_model::DeadlineKind;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn deadline_in(days: i64) -> DeadlineInfo {
        DeadlineInfo {
            kind: DeadlineKind::Renewal,
            date: date("2025-03-01"),
            days_remaining: days,
        }
    }

    #[test]
    fn test_forty_five_days_out() {
        let schedule = ReminderPolicy::default().build(&deadline_in(45));
        let offsets: Vec<u32> = schedule.reminders.iter().map(|r| r.days_before).collect();
        assert_eq!(offsets, vec![30, 14, 7, 3, 1]);
        assert_eq!(
            schedule.dates(),
            vec![
                date("2025-01-30"),
                date("2025-02-15"),
                date("2025-02-22"),
                date("2025-02-26"),
                date("2025-02-28"),
            ]
        );
    }

    #[test]
    fn test_offset_equal_to_days_remaining_is_dropped() {
        let offsets: Vec<u32> = ReminderPolicy::default()
            .build(&deadline_in(60))
            .reminders
            .iter()
            .map(|r| r.days_before)
            .collect();
        assert_eq!(offsets, vec![30, 14, 7, 3, 1]);
    }

    #[test]
    fn test_far_deadline_keeps_all_offsets_in_order() {
        let schedule = ReminderPolicy::default().build(&deadline_in(1000));
        let offsets: Vec<u32> = schedule.reminders.iter().map(|r| r.days_before).collect();
        assert_eq!(offsets, DEFAULT_OFFSETS.to_vec());
        assert!(schedule.dates().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_due_or_past_has_no_reminders() {
        for days in [-30, 0, 1] {
            assert!(schedule_default(&deadline_in(days)).is_empty(), "days = {days}");
        }
    }

    #[test]
    fn test_never_schedules_offset_at_or_past_remaining() {
        for days in -10..400 {
            let schedule = ReminderPolicy::default().build(&deadline_in(days));
            assert!(schedule
                .reminders
                .iter()
                .all(|r| i64::from(r.days_before) < days));
        }
    }

    #[test]
    fn test_custom_offsets_keep_caller_order() {
        let dates = schedule(&deadline_in(20), &[7, 21, 1, 14]);
        assert_eq!(
            dates,
            vec![date("2025-02-22"), date("2025-02-28"), date("2025-02-15")]
        );
    }

    #[test]
    fn test_policy_deserializes_with_default_offsets() {
        let policy: ReminderPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, ReminderPolicy::default());
    }
}
