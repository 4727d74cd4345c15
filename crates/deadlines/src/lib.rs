//! Statutory deadline calculation for registered trademarks.
//!
//! Turns a registration date (and the foreign-based flag) into the grace
//! period, renewal, Section 8 and Section 71 deadlines, then picks the one
//! deadline to surface first.
//!
//! Every function takes `today` explicitly. Unparseable registration dates
//! and non-applicable deadlines yield `None`, never an error.

use chrono::NaiveDate;
use ilegalflow_calendar::{add_years, add_years_months, parse_date, whole_years_between};
use ilegalflow_model::{DeadlineInfo, DeadlineKind, TrademarkDeadlineSet, TrademarkRecord};

/// Years after registration of the first Section 8 / Section 71 declaration.
pub const FIRST_DECLARATION_YEARS: i32 = 5;

/// Offset of the Section 8 declaration within each ten-year cycle.
pub const CYCLE_DECLARATION_YEARS: i32 = 9;

/// Length of a renewal cycle.
pub const RENEWAL_CYCLE_YEARS: i32 = 10;

fn parse_registration(registration_date: &str) -> Option<NaiveDate> {
    match parse_date(registration_date) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!(error = %e, "Skipping deadline for unparseable registration date");
            None
        }
    }
}

/// Grace period deadline: registration + 9 years + 6 months.
pub fn grace_period(registration_date: &str, today: NaiveDate) -> Option<DeadlineInfo> {
    grace_period_from_date(parse_registration(registration_date)?, today)
}

pub fn grace_period_from_date(registration: NaiveDate, today: NaiveDate) -> Option<DeadlineInfo> {
    let date = add_years_months(registration, 9, 6)?;
    Some(DeadlineInfo::new(DeadlineKind::GracePeriod, date, today))
}

/// Next renewal: the first ten-year anniversary strictly after today.
pub fn renewal(registration_date: &str, today: NaiveDate) -> Option<DeadlineInfo> {
    renewal_from_date(parse_registration(registration_date)?, today)
}

pub fn renewal_from_date(registration: NaiveDate, today: NaiveDate) -> Option<DeadlineInfo> {
    // Skip straight to the current decade instead of walking from k = 1.
    let elapsed = whole_years_between(registration, today);
    let mut cycles = (elapsed / RENEWAL_CYCLE_YEARS).max(1);

    loop {
        let date = add_years(registration, cycles.checked_mul(RENEWAL_CYCLE_YEARS)?)?;
        if date > today {
            return Some(DeadlineInfo::new(DeadlineKind::Renewal, date, today));
        }
        cycles = cycles.checked_add(1)?;
    }
}

/// Next Section 8 declaration.
///
/// The declaration falls at +5 and +9 years, then at +9 within every later
/// decade (+19, +29, ...). Returns the first of those marks strictly after
/// today.
pub fn section8(registration_date: &str, today: NaiveDate) -> Option<DeadlineInfo> {
    section8_from_date(parse_registration(registration_date)?, today)
}

pub fn section8_from_date(registration: NaiveDate, today: NaiveDate) -> Option<DeadlineInfo> {
    let elapsed = whole_years_between(registration, today);

    let offset = if elapsed < FIRST_DECLARATION_YEARS {
        FIRST_DECLARATION_YEARS
    } else if elapsed < CYCLE_DECLARATION_YEARS {
        CYCLE_DECLARATION_YEARS
    } else {
        let mut cycle_start = (elapsed - CYCLE_DECLARATION_YEARS) / RENEWAL_CYCLE_YEARS
            * RENEWAL_CYCLE_YEARS;
        while add_years(registration, cycle_start.checked_add(CYCLE_DECLARATION_YEARS)?)?
            <= today
        {
            cycle_start = cycle_start.checked_add(RENEWAL_CYCLE_YEARS)?;
        }
        cycle_start + CYCLE_DECLARATION_YEARS
    };

    let date = add_years(registration, offset)?;
    Some(DeadlineInfo::new(DeadlineKind::Section8, date, today))
}

/// Section 71 declaration: registration + 5 years, foreign-based marks only.
pub fn section71(
    registration_date: &str,
    is_foreign_based: bool,
    today: NaiveDate,
) -> Option<DeadlineInfo> {
    if !is_foreign_based {
        return None;
    }
    section71_from_date(parse_registration(registration_date)?, is_foreign_based, today)
}

pub fn section71_from_date(
    registration: NaiveDate,
    is_foreign_based: bool,
    today: NaiveDate,
) -> Option<DeadlineInfo> {
    if !is_foreign_based {
        return None;
    }
    let date = add_years(registration, FIRST_DECLARATION_YEARS)?;
    Some(DeadlineInfo::new(DeadlineKind::Section71, date, today))
}

/// Pick the deadline to surface: most urgent first, then soonest.
///
/// Equally urgent deadlines with the same days remaining keep input order.
pub fn next_major_deadline<'a>(
    deadlines: impl IntoIterator<Item = &'a DeadlineInfo>,
) -> Option<DeadlineInfo> {
    let mut ranked: Vec<&DeadlineInfo> = deadlines.into_iter().collect();

    ranked.sort_by(|a, b| {
        b.urgency_level()
            .cmp(&a.urgency_level())
            .then(a.days_remaining.cmp(&b.days_remaining))
    });

    let next = ranked.first().map(|d| **d);
    if let Some(d) = &next {
        tracing::trace!(
            kind = ?d.kind,
            days_remaining = d.days_remaining,
            urgency = %d.urgency_level(),
            "Selected next major deadline"
        );
    }
    next
}

/// Compute every applicable deadline for a registration.
pub fn compute_deadlines(
    registration_date: &str,
    is_foreign_based: bool,
    today: NaiveDate,
) -> TrademarkDeadlineSet {
    match parse_registration(registration_date) {
        Some(registration) => compute_deadlines_from_date(registration, is_foreign_based, today),
        None => TrademarkDeadlineSet::default(),
    }
}

pub fn compute_deadlines_from_date(
    registration: NaiveDate,
    is_foreign_based: bool,
    today: NaiveDate,
) -> TrademarkDeadlineSet {
    let mut set = TrademarkDeadlineSet {
        grace_period: grace_period_from_date(registration, today),
        renewal: renewal_from_date(registration, today),
        section8: section8_from_date(registration, today),
        section71: section71_from_date(registration, is_foreign_based, today),
        next_major_deadline: None,
    };
    set.next_major_deadline = next_major_deadline(set.iter());
    set
}

/// Compute deadlines from a registry record.
///
/// A record without a registration date (e.g. a pending application) has
/// no deadlines.
pub fn deadlines_for_record(record: &TrademarkRecord, today: NaiveDate) -> TrademarkDeadlineSet {
    match record.registration_date.as_deref() {
        Some(registration_date) => {
            compute_deadlines(registration_date, record.is_foreign_based, today)
        }
        None => {
            tracing::debug!(serial = %record.serial_number, "Record has no registration date");
            TrademarkDeadlineSet::default()
        }
    }
}
