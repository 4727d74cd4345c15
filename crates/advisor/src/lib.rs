//! Next-action advice and deadline explanations.
//!
//! Converts the surfaced deadline into a recommended action and turns
//! individual deadlines into human-readable text suitable for display in
//! the dashboard and reminder emails.

use ilegalflow_model::{DeadlineInfo, DeadlineKind, TrademarkDeadlineSet, UrgencyLevel};
use serde::{Deserialize, Serialize};

pub const MONITOR_UPCOMING: &str = "Monitor for upcoming deadlines";
pub const FILE_OVERDUE: &str = "File overdue renewal immediately";
pub const FILE_DOCUMENTS: &str = "File renewal documents";
pub const PREPARE_FILING: &str = "Prepare renewal filing";
pub const MONITOR_TIMELINE: &str = "Monitor renewal timeline";

/// What to do next about a trademark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAdvice {
    pub next_action: String,
    pub urgency: UrgencyLevel,

    /// Days until the action is due; `None` when nothing is scheduled
    pub days_until_action: Option<i64>,

    pub recommended_actions: Vec<String>,
}

/// Advise on the next major deadline, if any.
pub fn advise(next_major_deadline: Option<&DeadlineInfo>) -> ActionAdvice {
    let Some(deadline) = next_major_deadline else {
        return ActionAdvice {
            next_action: MONITOR_UPCOMING.to_string(),
            urgency: UrgencyLevel::Low,
            days_until_action: None,
            recommended_actions: to_strings(&[
                "Keep registration and ownership records up to date",
                "Watch for new filings that conflict with your mark",
            ]),
        };
    };

    let days = deadline.days_remaining;
    let next_action = if days < 0 {
        FILE_OVERDUE
    } else if days <= 30 {
        FILE_DOCUMENTS
    } else if days <= 90 {
        PREPARE_FILING
    } else {
        MONITOR_TIMELINE
    };

    let urgency = deadline.urgency_level();

    ActionAdvice {
        next_action: next_action.to_string(),
        urgency,
        days_until_action: Some(days),
        recommended_actions: to_strings(recommended_actions(urgency)),
    }
}

/// Advise on a full deadline set.
pub fn advise_set(set: &TrademarkDeadlineSet) -> ActionAdvice {
    advise(set.next_major_deadline.as_ref())
}

/// Canned recommendations for an urgency level.
pub fn recommended_actions(urgency: UrgencyLevel) -> &'static [&'static str] {
    match urgency {
        UrgencyLevel::Critical => &[
            "Contact your trademark attorney immediately",
            "Gather current specimens showing the mark in use",
            "File the required documents before the deadline passes",
        ],
        UrgencyLevel::High => &[
            "Schedule a filing review with your attorney",
            "Collect specimens of current use for each class",
            "Confirm which goods and services are still in use",
        ],
        UrgencyLevel::Medium => &[
            "Add the deadline to your docketing calendar",
            "Review whether every registered class is still in use",
        ],
        UrgencyLevel::Low => &[
            "Keep records of continued use of the mark",
            "Review the registration annually",
        ],
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A structured explanation for a deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineExplanation {
    /// Short summary (1 line)
    pub summary: String,

    /// Detailed explanation (1-2 sentences)
    pub detail: String,

    pub urgency: UrgencyLevel,
}

/// Explain a single deadline.
pub fn explain_deadline(deadline: &DeadlineInfo) -> DeadlineExplanation {
    let label = deadline.kind.label();
    let days = deadline.days_remaining;

    let summary = match days {
        d if d < 0 => format!("{} overdue by {}", label, plural_days(-d)),
        0 => format!("{} due today", label),
        d => format!("{} due in {}", label, plural_days(d)),
    };

    let detail = match deadline.kind {
        DeadlineKind::GracePeriod => format!(
            "The grace period closes on {}. \
             After that date a lapsed registration can no longer be revived by late filing.",
            deadline.date
        ),
        DeadlineKind::Renewal => format!(
            "The ten-year renewal is due on {}. \
             Renewing keeps the registration in force for another decade.",
            deadline.date
        ),
        DeadlineKind::Section8 => format!(
            "A declaration of continued use is due on {}. \
             Missing it cancels the registration.",
            deadline.date
        ),
        DeadlineKind::Section71 => format!(
            "A Section 71 declaration for the Madrid Protocol extension is due on {}. \
             Missing it cancels the U.S. extension of protection.",
            deadline.date
        ),
    };

    DeadlineExplanation {
        summary,
        detail,
        urgency: deadline.urgency_level(),
    }
}

/// One-line summary of a deadline set, led by its next major deadline.
pub fn summarize_deadlines(set: &TrademarkDeadlineSet) -> String {
    match &set.next_major_deadline {
        None => "No upcoming deadlines.".to_string(),
        Some(next) => format!(
            "{}: {}",
            next.urgency_level().to_string().to_uppercase(),
            explain_deadline(next).summary
        ),
    }
}

fn plural_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn deadline(kind: DeadlineKind, days_remaining: i64) -> DeadlineInfo {
        DeadlineInfo {
            kind,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            days_remaining,
        }
    }

    #[test]
    fn test_no_deadline() {
        let advice = advise(None);
        assert_eq!(advice.next_action, MONITOR_UPCOMING);
        assert_eq!(advice.urgency, UrgencyLevel::Low);
        assert_eq!(advice.days_until_action, None);
        assert!(!advice.recommended_actions.is_empty());
    }

    #[test]
    fn test_next_action_thresholds() {
        let cases = [
            (-1, FILE_OVERDUE, UrgencyLevel::Critical),
            (0, FILE_DOCUMENTS, UrgencyLevel::Critical),
            (30, FILE_DOCUMENTS, UrgencyLevel::Critical),
            (31, PREPARE_FILING, UrgencyLevel::High),
            (90, PREPARE_FILING, UrgencyLevel::High),
            (91, MONITOR_TIMELINE, UrgencyLevel::Medium),
            (400, MONITOR_TIMELINE, UrgencyLevel::Low),
        ];
        for (days, action, urgency) in cases {
            let advice = advise(Some(&deadline(DeadlineKind::Renewal, days)));
            assert_eq!(advice.next_action, action, "days = {days}");
            assert_eq!(advice.urgency, urgency, "days = {days}");
            assert_eq!(advice.days_until_action, Some(days));
        }
    }

    #[test]
    fn test_recommendations_keyed_by_urgency() {
        for urgency in [
            UrgencyLevel::Low,
            UrgencyLevel::Medium,
            UrgencyLevel::High,
            UrgencyLevel::Critical,
        ] {
            let count = recommended_actions(urgency).len();
            assert!((2..=3).contains(&count));
        }
        let advice = advise(Some(&deadline(DeadlineKind::Section8, 10)));
        assert_eq!(
            advice.recommended_actions[0],
            "Contact your trademark attorney immediately"
        );
    }

    #[test]
    fn test_advise_set_without_deadlines() {
        let advice = advise_set(&TrademarkDeadlineSet::default());
        assert_eq!(advice.next_action, MONITOR_UPCOMING);
    }

    #[test]
    fn test_explain_overdue_section71() {
        let explanation = explain_deadline(&deadline(DeadlineKind::Section71, -1));
        assert_eq!(explanation.summary, "Section 71 Declaration overdue by 1 day");
        assert!(explanation.detail.contains("Madrid Protocol"));
        assert_eq!(explanation.urgency, UrgencyLevel::Critical);
    }

    #[test]
    fn test_summarize_deadlines() {
        let renewal = deadline(DeadlineKind::Renewal, 12);
        let set = TrademarkDeadlineSet {
            renewal: Some(renewal),
            next_major_deadline: Some(renewal),
            ..Default::default()
        };
        assert_eq!(summarize_deadlines(&set), "CRITICAL: Renewal due in 12 days");
        assert_eq!(
            summarize_deadlines(&TrademarkDeadlineSet::default()),
            "No upcoming deadlines."
        );
    }
}
