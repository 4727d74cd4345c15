//! Renewal fee estimation.
//!
//! Prices a maintenance filing per Nice class from a fixed fee schedule and
//! explains each line in the order it was computed.

use ilegalflow_model::{RenewalCostEstimate, RenewalType, TrademarkRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FEE_CHANGE_DISCLAIMER: &str =
    "Government fees are subject to change; confirm current fees before filing.";

pub const ATTORNEY_FEE_DISCLAIMER: &str = "This estimate excludes attorney and service fees.";

pub const SECTION71_NOT_REQUIRED: &str =
    "Section 71 Declaration: not required for marks without a foreign basis";

/// Largest per-class fee a schedule may carry.
///
/// At this cap, four components over `u32::MAX` classes still fit in a `u64`,
/// so a validated schedule never clamps.
pub const MAX_FEE_PER_CLASS: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Fee for {field} is {fee}, above the per-class limit of {max}",
    max = MAX_FEE_PER_CLASS
)]
pub struct FeeScheduleError {
    pub field: &'static str,
    pub fee: u64,
}

/// Per-class government fees, in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub section8: u64,
    pub section71: u64,
    pub renewal: u64,
    pub late_renewal_surcharge: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            section8: 225,
            section71: 150,
            renewal: 400,
            late_renewal_surcharge: 100,
        }
    }
}

impl FeeSchedule {
    /// Check every fee against `MAX_FEE_PER_CLASS`.
    pub fn validate(&self) -> Result<(), FeeScheduleError> {
        let fees = [
            ("section8", self.section8),
            ("section71", self.section71),
            ("renewal", self.renewal),
            ("late_renewal_surcharge", self.late_renewal_surcharge),
        ];
        match fees.into_iter().find(|&(_, fee)| fee > MAX_FEE_PER_CLASS) {
            Some((field, fee)) => Err(FeeScheduleError { field, fee }),
            None => Ok(()),
        }
    }

    /// Estimate the fees for a filing.
    ///
    /// Fees above `MAX_FEE_PER_CLASS` saturate at `u64::MAX`, where the total
    /// may no longer equal the sum of its components; call `validate` on
    /// schedules from outside the program.
    pub fn estimate(
        &self,
        class_count: u32,
        renewal_type: RenewalType,
        is_foreign_based: bool,
        is_overdue: bool,
    ) -> RenewalCostEstimate {
        let mut estimate = RenewalCostEstimate::default();

        if class_count == 0 {
            tracing::debug!(%renewal_type, "Pricing a filing with no classes");
        }

        let charge = |per_class: u64| per_class.saturating_mul(u64::from(class_count));
        let line = |label: &str, per_class: u64| {
            format!(
                "{}: ${} ({} {} x ${})",
                label,
                charge(per_class),
                class_count,
                if class_count == 1 { "class" } else { "classes" },
                per_class
            )
        };

        if matches!(renewal_type, RenewalType::Section8 | RenewalType::Combined) {
            estimate.section8_fee = charge(self.section8);
            estimate.notes.push(line("Section 8 Declaration", self.section8));
        }

        if matches!(renewal_type, RenewalType::Renewal | RenewalType::Combined) {
            estimate.renewal_fee = charge(self.renewal);
            estimate.notes.push(line("Renewal", self.renewal));
        }

        match renewal_type {
            RenewalType::Section71 | RenewalType::Combined if is_foreign_based => {
                estimate.section71_fee = charge(self.section71);
                estimate.notes.push(line("Section 71 Declaration", self.section71));
            }
            RenewalType::Section71 => {
                estimate.notes.push(SECTION71_NOT_REQUIRED.to_string());
            }
            _ => {}
        }

        if is_overdue {
            let late = charge(self.late_renewal_surcharge);
            estimate.late_renewal_fee = Some(late);
            estimate
                .notes
                .push(line("Late filing surcharge", self.late_renewal_surcharge));
        }

        estimate.total_estimate = estimate.component_sum();
        push_disclaimers(&mut estimate.notes);
        estimate
    }
}

fn push_disclaimers(notes: &mut Vec<String>) {
    notes.push(FEE_CHANGE_DISCLAIMER.to_string());
    notes.push(ATTORNEY_FEE_DISCLAIMER.to_string());
}

/// Estimate fees with the default schedule.
pub fn estimate(
    class_count: u32,
    renewal_type: RenewalType,
    is_foreign_based: bool,
    is_overdue: bool,
) -> RenewalCostEstimate {
    FeeSchedule::default().estimate(class_count, renewal_type, is_foreign_based, is_overdue)
}

/// Estimate fees for a registry record's classes and basis.
pub fn estimate_for_record(
    record: &TrademarkRecord,
    renewal_type: RenewalType,
    is_overdue: bool,
) -> RenewalCostEstimate {
    estimate(
        record.class_count(),
        renewal_type,
        record.is_foreign_based,
        is_overdue,
    )
}
