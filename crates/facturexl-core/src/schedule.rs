//! # Subscription Schedule Generator
//!
//! Renewal dates for subscriptions and the "renewal approaching" predicate
//! used to highlight subscriptions on the dashboard.
//!
//! ## Two Algorithms
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PERIODIC (monthly, bimonthly, quarterly, semiannual)                   │
//! │                                                                         │
//! │    start ──+N──► start+N ──+N──► start+2N ── ... ──► (≤ end)            │
//! │                                                                         │
//! │  ANNUAL ANCHOR (yearly, custom)                                         │
//! │                                                                         │
//! │    start, start+1m, start+2m, ...  keep the ones whose month == anchor  │
//! │    → one date per year, on the start date's day of month                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Month Arithmetic
//! Every date is computed as `start + k months` with chrono's
//! `checked_add_months`, which clamps to the end of short months.
//! Offsets are always taken from `start`, never from the previous date, so a
//! subscription started on Jan 31 renews Feb 29, Mar 31, Apr 30, ...
//!
//! Nothing here reads the clock: `now` is always a parameter.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::types::{AnchorMonth, Frequency};

/// Days before a renewal (or the end date) at which it starts being flagged.
pub const DEFAULT_LEAD_DAYS: i64 = 7;

/// Days after a missed renewal during which it is still flagged.
pub const DEFAULT_GRACE_DAYS: i64 = 30;

// =============================================================================
// Alert Window
// =============================================================================

/// The window, in days relative to `now`, in which a date counts as approaching.
///
/// ```text
///      -grace_days            0            lead_days
///   ────────[──────────────── now ────────────]────────► days
///            overdue, still flagged     upcoming
/// ```
///
/// The end date is only checked against `0..=lead_days`. The next renewal is
/// always strictly after `now`, so with the current lookup the overdue side
/// of the window is never reached and `grace_days` has no effect on the
/// result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertWindow {
    pub lead_days: i64,
    pub grace_days: i64,
}

impl Default for AlertWindow {
    fn default() -> Self {
        AlertWindow {
            lead_days: DEFAULT_LEAD_DAYS,
            grace_days: DEFAULT_GRACE_DAYS,
        }
    }
}

// =============================================================================
// Renewal Rule
// =============================================================================

/// A frequency together with its resolved anchor month.
///
/// Construction is where invalid input is rejected; once built, a rule
/// never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalRule {
    frequency: Frequency,
    anchor: Option<AnchorMonth>,
}

impl RenewalRule {
    /// Builds a rule from a raw month number.
    ///
    /// ## Errors
    /// - `InvalidAnchorMonth` if `anchor_month` is outside 1..=12
    /// - `MissingAnchorMonth` for `custom` without a month
    pub fn new(frequency: Frequency, anchor_month: Option<u32>) -> CoreResult<Self> {
        let anchor = anchor_month.map(AnchorMonth::new).transpose()?;
        RenewalRule::from_anchor(frequency, anchor)
    }

    /// Builds a rule from an already validated month.
    ///
    /// `yearly` falls back to December. The anchor is dropped for periodic
    /// frequencies, which do not use it.
    pub fn from_anchor(frequency: Frequency, anchor: Option<AnchorMonth>) -> CoreResult<Self> {
        let anchor = match frequency {
            Frequency::Yearly => Some(anchor.unwrap_or(AnchorMonth::DECEMBER)),
            Frequency::Custom => Some(anchor.ok_or_else(|| CoreError::MissingAnchorMonth {
                frequency: frequency.to_string(),
            })?),
            _ => None,
        };
        Ok(RenewalRule { frequency, anchor })
    }

    /// Returns the frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the anchor month, `None` for periodic frequencies.
    pub fn anchor_month(&self) -> Option<AnchorMonth> {
        self.anchor
    }

    /// All renewal dates in `[start, end]`, ascending.
    ///
    /// Empty when `start > end`.
    pub fn renewal_dates(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let dates: Vec<NaiveDate> = match (self.frequency.period_months(), self.anchor) {
            (Some(step), _) => month_offsets(start, step)
                .take_while(|date| *date <= end)
                .collect(),
            (None, Some(anchor)) => month_offsets(start, 1)
                .take_while(|date| *date <= end)
                .filter(|date| date.month() == anchor.get())
                .collect(),
            (None, None) => Vec::new(),
        };

        debug!(
            frequency = %self.frequency,
            %start,
            %end,
            count = dates.len(),
            "Generated renewal dates"
        );
        dates
    }

    /// The next renewal strictly after `now`, if it is not past `end`.
    ///
    /// ## Periodic
    /// Steps from `start` until passing `now` or `end`. A subscription that
    /// has not started yet renews first on its start date.
    ///
    /// ## Annual Anchor
    /// This year's anchor date (next year's if already passed), kept only if
    /// it falls in `[start, end]`.
    pub fn next_renewal(&self, start: NaiveDate, end: NaiveDate, now: NaiveDate) -> Option<NaiveDate> {
        match (self.frequency.period_months(), self.anchor) {
            (Some(step), _) => month_offsets(start, step)
                .find(|date| *date > now || *date > end)
                .filter(|date| *date <= end),
            (None, Some(anchor)) => {
                let this_year = anchor_date(now.year(), anchor, start.day())?;
                let candidate = if this_year <= now {
                    anchor_date(now.year() + 1, anchor, start.day())?
                } else {
                    this_year
                };
                (start..=end).contains(&candidate).then_some(candidate)
            }
            (None, None) => None,
        }
    }
}

/// `start`, `start + step months`, `start + 2·step months`, ...
///
/// Ends only when chrono runs out of representable dates.
fn month_offsets(start: NaiveDate, step: u32) -> impl Iterator<Item = NaiveDate> {
    (0u32..).map_while(move |k| {
        k.checked_mul(step)
            .and_then(|months| start.checked_add_months(Months::new(months)))
    })
}

/// The `day`-th of the anchor month in `year`, clamped to the month's length.
fn anchor_date(year: i32, anchor: AnchorMonth, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, anchor.get(), 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    first.with_day(day.min(last.day()))
}

// =============================================================================
// Operations
// =============================================================================

/// Generates the renewal dates of a subscription.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use facturexl_core::schedule::generate_renewal_dates;
/// use facturexl_core::types::Frequency;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
///
/// let dates = generate_renewal_dates(start, end, Frequency::Custom, Some(6)).unwrap();
/// assert_eq!(dates.len(), 3);
/// assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
/// ```
pub fn generate_renewal_dates(
    start: NaiveDate,
    end: NaiveDate,
    frequency: Frequency,
    anchor_month: Option<u32>,
) -> CoreResult<Vec<NaiveDate>> {
    Ok(RenewalRule::new(frequency, anchor_month)?.renewal_dates(start, end))
}

/// Finds the next renewal after `now`, or `None` once past `end`.
pub fn find_next_renewal(
    start: NaiveDate,
    frequency: Frequency,
    now: NaiveDate,
    end: NaiveDate,
    anchor_month: Option<u32>,
) -> CoreResult<Option<NaiveDate>> {
    Ok(RenewalRule::new(frequency, anchor_month)?.next_renewal(start, end, now))
}

/// Whether a subscription should be highlighted, with the default
/// 7-day lead and 30-day grace.
///
/// See [`is_renewal_approaching_with_window`].
pub fn is_renewal_approaching(
    end: NaiveDate,
    start: Option<NaiveDate>,
    frequency: Option<Frequency>,
    anchor_month: Option<u32>,
    now: NaiveDate,
) -> CoreResult<bool> {
    is_renewal_approaching_with_window(
        end,
        start,
        frequency,
        anchor_month,
        now,
        AlertWindow::default(),
    )
}

/// Whether a subscription should be highlighted.
///
/// True when either:
/// - the end date is `0..=lead_days` days away, or
/// - the next renewal is `-grace_days..=lead_days` days away.
///
/// Without a start date or a frequency only the end date is checked.
pub fn is_renewal_approaching_with_window(
    end: NaiveDate,
    start: Option<NaiveDate>,
    frequency: Option<Frequency>,
    anchor_month: Option<u32>,
    now: NaiveDate,
    window: AlertWindow,
) -> CoreResult<bool> {
    let rule = match frequency {
        Some(frequency) => Some(RenewalRule::new(frequency, anchor_month)?),
        None => None,
    };

    let days_until_end = (end - now).num_days();
    if (0..=window.lead_days).contains(&days_until_end) {
        return Ok(true);
    }

    let (Some(start), Some(rule)) = (start, rule) else {
        return Ok(false);
    };

    Ok(rule.next_renewal(start, end, now).is_some_and(|next| {
        let days_until_renewal = (next - now).num_days();
        (-window.grace_days..=window.lead_days).contains(&days_until_renewal)
    }))
}

// =============================================================================
// By-Name Entry Points
// =============================================================================
// Subscription records store the frequency as free text. An unrecognised
// value yields no schedule instead of an error.

fn lookup_frequency(name: &str) -> Option<Frequency> {
    match name.parse::<Frequency>() {
        Ok(frequency) => Some(frequency),
        Err(e) => {
            warn!(error = %e, "Ignoring subscription with unknown frequency");
            None
        }
    }
}

/// [`generate_renewal_dates`] for a stored frequency name.
/// Unknown names yield an empty schedule.
pub fn renewal_dates_by_name(
    start: NaiveDate,
    end: NaiveDate,
    frequency: &str,
    anchor_month: Option<u32>,
) -> CoreResult<Vec<NaiveDate>> {
    match lookup_frequency(frequency) {
        Some(frequency) => generate_renewal_dates(start, end, frequency, anchor_month),
        None => Ok(Vec::new()),
    }
}

/// [`find_next_renewal`] for a stored frequency name.
/// Unknown names yield `None`.
pub fn next_renewal_by_name(
    start: NaiveDate,
    frequency: &str,
    now: NaiveDate,
    end: NaiveDate,
    anchor_month: Option<u32>,
) -> CoreResult<Option<NaiveDate>> {
    match lookup_frequency(frequency) {
        Some(frequency) => find_next_renewal(start, frequency, now, end, anchor_month),
        None => Ok(None),
    }
}

/// [`is_renewal_approaching_with_window`] for a stored frequency name.
/// Unknown names fall back to the end-date check alone.
pub fn is_renewal_approaching_by_name(
    end: NaiveDate,
    start: Option<NaiveDate>,
    frequency: Option<&str>,
    anchor_month: Option<u32>,
    now: NaiveDate,
    window: AlertWindow,
) -> CoreResult<bool> {
    let frequency = frequency.and_then(lookup_frequency);
    is_renewal_approaching_with_window(end, start, frequency, anchor_month, now, window)
}

// =============================================================================
// Unit Tests
// =============================================================================
