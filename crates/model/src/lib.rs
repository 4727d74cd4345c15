//! Core domain model for iLegalFlow trademark renewal tracking.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `TrademarkRecord`: The registry data a deadline computation starts from
//! - `DeadlineInfo`: A statutory due date relative to "today"
//! - `DeadlineStatus` / `UrgencyLevel`: Classifications derived from days remaining
//! - `TrademarkDeadlineSet`: All deadlines for one mark plus the one to surface
//! - `RenewalType` / `RenewalCostEstimate`: Fee estimation inputs and outputs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Days remaining at or below which a deadline is `DueSoon` / `High`.
pub const DUE_SOON_DAYS: i64 = 90;

/// Days remaining at or below which a deadline is `Critical`.
pub const CRITICAL_DAYS: i64 = 30;

/// Days remaining at or below which a deadline is `Medium`.
pub const MEDIUM_DAYS: i64 = 365;

/// Status of a trademark registration as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrademarkStatus {
    /// Active registration
    Live,
    /// Cancelled, expired, or abandoned
    Dead,
    /// Application in progress
    Pending,
    /// Unknown status
    Unknown,
}

impl Default for TrademarkStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<&str> for TrademarkStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "LIVE" => Self::Live,
            "DEAD" => Self::Dead,
            "PENDING" => Self::Pending,
            _ => Self::Unknown,
        }
    }
}

/// A trademark record as supplied by the registry lookup.
///
/// Only the registration date, class list and foreign-based flag feed the
/// deadline engine; the rest is carried for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrademarkRecord {
    /// USPTO serial number (8 digits, zero-padded)
    pub serial_number: String,

    /// Registration number (if registered)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,

    /// The mark text (word mark)
    #[serde(default)]
    pub mark_text: String,

    /// Current registry status
    #[serde(default)]
    pub status: TrademarkStatus,

    /// Nice classification codes
    #[serde(default)]
    pub classes: Vec<u16>,

    /// Owner/registrant name
    #[serde(default)]
    pub owner_name: String,

    /// Registration date (ISO format)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,

    /// Registered through a foreign (Madrid Protocol) basis
    #[serde(default)]
    pub is_foreign_based: bool,
}

impl TrademarkRecord {
    /// Create a minimal record for testing.
    pub fn new(serial_number: impl Into<String>, mark_text: impl Into<String>) -> Self {
        Self {
            serial_number: serial_number.into(),
            registration_number: None,
            mark_text: mark_text.into(),
            status: TrademarkStatus::Unknown,
            classes: Vec::new(),
            owner_name: String::new(),
            registration_date: None,
            is_foreign_based: false,
        }
    }

    pub fn with_registration_date(mut self, date: impl Into<String>) -> Self {
        self.registration_date = Some(date.into());
        self
    }

    pub fn with_classes(mut self, classes: Vec<u16>) -> Self {
        self.classes = classes;
        self
    }

    pub fn foreign_based(mut self, is_foreign_based: bool) -> Self {
        self.is_foreign_based = is_foreign_based;
        self
    }

    /// Number of distinct Nice classes; fees are charged per class.
    pub fn class_count(&self) -> u32 {
        let mut classes = self.classes.clone();
        classes.sort_unstable();
        classes.dedup();
        classes.len() as u32
    }
}

/// The statutory filing a deadline belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    /// End of the six-month window after the 9.5-year point
    GracePeriod,
    /// Decennial re-registration
    Renewal,
    /// Declaration of continued use
    Section8,
    /// Madrid Protocol declaration of continued use
    Section71,
}

impl DeadlineKind {
    /// Get a human-readable label for this deadline.
    pub fn label(&self) -> &'static str {
        match self {
            Self::GracePeriod => "Grace Period",
            Self::Renewal => "Renewal",
            Self::Section8 => "Section 8 Declaration",
            Self::Section71 => "Section 71 Declaration",
        }
    }
}

impl fmt::Display for DeadlineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a deadline stands relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    /// More than 90 days away
    Current,
    /// Due today or within 90 days
    DueSoon,
    /// Past the due date
    Overdue,
    /// Lapsed registration. `classify` never yields this; it is reserved for
    /// callers that track marks past their grace window.
    Expired,
}

impl DeadlineStatus {
    /// Status for a given number of days remaining.
    pub fn from_days_remaining(days_remaining: i64) -> Self {
        if days_remaining < 0 {
            Self::Overdue
        } else if days_remaining <= DUE_SOON_DAYS {
            Self::DueSoon
        } else {
            Self::Current
        }
    }
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::DueSoon => write!(f, "due_soon"),
            Self::Overdue => write!(f, "overdue"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// How soon action is needed.
///
/// Variants are declared in ascending order so `Ord` matches urgency rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl UrgencyLevel {
    /// Urgency for a given number of days remaining.
    pub fn from_days_remaining(days_remaining: i64) -> Self {
        if days_remaining <= CRITICAL_DAYS {
            Self::Critical
        } else if days_remaining <= DUE_SOON_DAYS {
            Self::High
        } else if days_remaining <= MEDIUM_DAYS {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Numeric rank, higher = more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Critical => 3,
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Status and urgency derived together from days remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: DeadlineStatus,
    pub urgency_level: UrgencyLevel,
}

/// Classify a deadline by its days remaining.
///
/// Total over `i64`. Due today (0) is `DueSoon`, not `Overdue`.
pub fn classify(days_remaining: i64) -> Classification {
    Classification {
        status: DeadlineStatus::from_days_remaining(days_remaining),
        urgency_level: UrgencyLevel::from_days_remaining(days_remaining),
    }
}

/// A computed statutory deadline relative to a given "today".
///
/// Status and urgency are accessors over `days_remaining` so they can never
/// disagree with it. They appear in serialized output and are ignored (and
/// recomputed) on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "DeadlineInfoWire")]
pub struct DeadlineInfo {
    pub kind: DeadlineKind,
    pub date: NaiveDate,
    pub days_remaining: i64,
}

impl DeadlineInfo {
    pub fn new(kind: DeadlineKind, date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            kind,
            date,
            days_remaining: (date - today).num_days(),
        }
    }

    pub fn status(&self) -> DeadlineStatus {
        DeadlineStatus::from_days_remaining(self.days_remaining)
    }

    pub fn urgency_level(&self) -> UrgencyLevel {
        UrgencyLevel::from_days_remaining(self.days_remaining)
    }

    pub fn classification(&self) -> Classification {
        classify(self.days_remaining)
    }

    pub fn is_overdue(&self) -> bool {
        self.days_remaining < 0
    }
}

#[derive(Serialize)]
struct DeadlineInfoWire {
    kind: DeadlineKind,
    date: NaiveDate,
    days_remaining: i64,
    status: DeadlineStatus,
    urgency_level: UrgencyLevel,
}

impl From<DeadlineInfo> for DeadlineInfoWire {
    fn from(info: DeadlineInfo) -> Self {
        let Classification {
            status,
            urgency_level,
        } = info.classification();
        Self {
            kind: info.kind,
            date: info.date,
            days_remaining: info.days_remaining,
            status,
            urgency_level,
        }
    }
}

/// All deadlines computed for one trademark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrademarkDeadlineSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period: Option<DeadlineInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal: Option<DeadlineInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section8: Option<DeadlineInfo>,

    /// Present only for foreign-based marks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section71: Option<DeadlineInfo>,

    /// The deadline to surface first; always one of the entries above
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_major_deadline: Option<DeadlineInfo>,
}

impl TrademarkDeadlineSet {
    /// Present deadlines in field order (grace period, renewal, Section 8, Section 71).
    pub fn iter(&self) -> impl Iterator<Item = &DeadlineInfo> {
        [
            self.grace_period.as_ref(),
            self.renewal.as_ref(),
            self.section8.as_ref(),
            self.section71.as_ref(),
        ]
        .into_iter()
        .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn get(&self, kind: DeadlineKind) -> Option<&DeadlineInfo> {
        match kind {
            DeadlineKind::GracePeriod => self.grace_period.as_ref(),
            DeadlineKind::Renewal => self.renewal.as_ref(),
            DeadlineKind::Section8 => self.section8.as_ref(),
            DeadlineKind::Section71 => self.section71.as_ref(),
        }
    }
}

/// Which filing a fee estimate covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalType {
    Section8,
    Section71,
    Renewal,
    /// Section 8 plus renewal, and Section 71 for foreign-based marks
    Combined,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown renewal type: {0}")]
pub struct ParseRenewalTypeError(pub String);

impl FromStr for RenewalType {
    type Err = ParseRenewalTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "section8" => Ok(Self::Section8),
            "section71" => Ok(Self::Section71),
            "renewal" => Ok(Self::Renewal),
            "combined" => Ok(Self::Combined),
            _ => Err(ParseRenewalTypeError(s.to_string())),
        }
    }
}

impl fmt::Display for RenewalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section8 => write!(f, "section8"),
            Self::Section71 => write!(f, "section71"),
            Self::Renewal => write!(f, "renewal"),
            Self::Combined => write!(f, "combined"),
        }
    }
}

/// A priced fee breakdown in whole currency units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalCostEstimate {
    pub section8_fee: u64,
    pub section71_fee: u64,
    pub renewal_fee: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_renewal_fee: Option<u64>,

    pub total_estimate: u64,

    /// One line per fee, in the order fees were computed, then disclaimers
    #[serde(default)]
    pub notes: Vec<String>,
}

impl RenewalCostEstimate {
    /// Sum of the component fees.
    pub fn component_sum(&self) -> u64 {
        self.section8_fee
            .saturating_add(self.section71_fee)
            .saturating_add(self.renewal_fee)
            .saturating_add(self.late_renewal_fee.unwrap_or(0))
    }
}
