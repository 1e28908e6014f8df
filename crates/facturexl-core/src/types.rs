//! # Domain Types
//!
//! Core domain types used throughout the FactureXL engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    LineItem     │   │  LineBreakdown  │   │  TotalsResult   │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  quantity       │──►│  subtotal       │──►│  total_excl_tax │        │
//! │  │  unit_price     │   │  discount       │   │  total_tax      │        │
//! │  │  discount %     │   │  after_discount │   │  total_incl_tax │        │
//! │  │  tax %          │   │  tax / total    │   └────────┬────────┘        │
//! │  └─────────────────┘   └─────────────────┘            ▼                 │
//! │                                              ┌─────────────────┐        │
//! │                                              │  RoundedTotals  │        │
//! │                                              └─────────────────┘        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │   Frequency     │   │   AnchorMonth   │   │  Subscription   │        │
//! │  │  monthly ...    │   │   1..=12        │   │  start / end    │        │
//! │  │  yearly/custom  │   │   (validated)   │   │  frequency      │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every type here is ephemeral input or output; the invoicing app persists
//! line items, subscription parameters and final totals on its own records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::schedule::{self, AlertWindow, RenewalRule};

// =============================================================================
// Percent
// =============================================================================

/// A percentage as entered on the invoice form (`11` means 11%).
///
/// ## No Clamping
/// Discounts above 100% or negative tax rates are carried through the
/// arithmetic unchanged. Range checks live in [`crate::validation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Percent(#[ts(type = "string")] Decimal);

impl Percent {
    /// Creates a percentage from its displayed value.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percent(value)
    }

    /// Creates a percentage from a whole number (`Percent::from_integer(11)` = 11%).
    #[inline]
    pub fn from_integer(value: i64) -> Self {
        Percent(Decimal::from(value))
    }

    /// Returns the displayed value (11 for 11%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the multiplier (0.11 for 11%).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(Decimal::ZERO)
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of an invoice, credit note, quote or subscription invoice.
///
/// Field names follow the JSON the invoicing app already posts:
/// `{ quantity, unitPrice, discountPercent, taxPercent }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Optional description, carried to the PDF; ignored by the arithmetic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub label: Option<String>,

    /// Quantity. The form enforces >= 1; the engine accepts 0 and below.
    pub quantity: i64,

    /// Unit price in francs before discount and tax.
    pub unit_price: Money,

    /// Discount applied to `quantity × unit_price`.
    #[serde(default)]
    pub discount_percent: Percent,

    /// Tax applied after the discount (TGC in New Caledonia).
    #[serde(default)]
    pub tax_percent: Percent,
}

impl LineItem {
    /// Creates an unlabelled line.
    pub fn new(
        quantity: i64,
        unit_price: Money,
        discount_percent: Percent,
        tax_percent: Percent,
    ) -> Self {
        LineItem {
            label: None,
            quantity,
            unit_price,
            discount_percent,
            tax_percent,
        }
    }

    /// Sets the description shown on the PDF.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// =============================================================================
// Line Breakdown
// =============================================================================

/// The intermediate amounts of one line, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineBreakdown {
    /// `quantity × unit_price`.
    pub subtotal: Money,
    /// `subtotal × discount%`.
    pub discount_amount: Money,
    /// `subtotal − discount_amount`.
    pub after_discount: Money,
    /// `after_discount × tax%`.
    pub tax_amount: Money,
    /// `after_discount + tax_amount`.
    pub line_total: Money,
}

// =============================================================================
// Totals
// =============================================================================

/// Aggregate totals of a document, in full precision.
///
/// `total_incl_tax == total_excl_tax + total_tax` holds exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TotalsResult {
    /// Σ after-discount line amounts (HT).
    pub total_excl_tax: Money,
    /// Σ line taxes.
    pub total_tax: Money,
    /// Σ line totals (TTC).
    pub total_incl_tax: Money,
}

impl TotalsResult {
    /// All-zero totals (empty document).
    pub const fn zero() -> Self {
        TotalsResult {
            total_excl_tax: Money::zero(),
            total_tax: Money::zero(),
            total_incl_tax: Money::zero(),
        }
    }

    /// Rounds each total independently for display or export.
    ///
    /// The rounded values need not add up: 10 HT + 4 tax = 14 TTC rounds to
    /// 10 + 5 and 15.
    pub fn rounded(&self) -> RoundedTotals {
        RoundedTotals {
            total_excl_tax: self.total_excl_tax.round_to_denomination(),
            total_tax: self.total_tax.round_to_denomination(),
            total_incl_tax: self.total_incl_tax.round_to_denomination(),
        }
    }
}

/// Totals rounded to the 5 F denomination, as printed on the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoundedTotals {
    pub total_excl_tax: i64,
    pub total_tax: i64,
    pub total_incl_tax: i64,
}

// =============================================================================
// Frequency
// =============================================================================

/// How often a subscription renews.
///
/// ## Two Classes
/// ```text
/// Periodic       monthly (1) · bimonthly (2) · quarterly (3) · semiannual (6)
///                every N months counted from the start date
///
/// Annual anchor  yearly (December unless told otherwise) · custom (month required)
///                once a year, in a fixed calendar month
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Monthly,
    Bimonthly,
    Quarterly,
    Semiannual,
    Yearly,
    Custom,
}

impl Frequency {
    /// All frequencies, in the order the subscription form lists them.
    pub const ALL: [Frequency; 6] = [
        Frequency::Monthly,
        Frequency::Bimonthly,
        Frequency::Quarterly,
        Frequency::Semiannual,
        Frequency::Yearly,
        Frequency::Custom,
    ];

    /// Months between renewals for the periodic class, `None` for the
    /// annual-anchor class.
    pub const fn period_months(&self) -> Option<u32> {
        match self {
            Frequency::Monthly => Some(1),
            Frequency::Bimonthly => Some(2),
            Frequency::Quarterly => Some(3),
            Frequency::Semiannual => Some(6),
            Frequency::Yearly | Frequency::Custom => None,
        }
    }

    /// The snake_case name stored on subscription records.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Bimonthly => "bimonthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Semiannual => "semiannual",
            Frequency::Yearly => "yearly",
            Frequency::Custom => "custom",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "mensuel" => Ok(Frequency::Monthly),
            "bimonthly" | "bimestriel" => Ok(Frequency::Bimonthly),
            "quarterly" | "trimestriel" => Ok(Frequency::Quarterly),
            "semiannual" | "semi_annual" | "semestriel" => Ok(Frequency::Semiannual),
            "yearly" | "annual" | "annuel" => Ok(Frequency::Yearly),
            "custom" => Ok(Frequency::Custom),
            other => Err(CoreError::UnknownFrequency(other.to_string())),
        }
    }
}

// =============================================================================
// Anchor Month
// =============================================================================

/// A calendar month, 1 (January) to 12 (December).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "u32", into = "u32")]
#[ts(export)]
pub struct AnchorMonth(u32);

impl AnchorMonth {
    /// Month used by `yearly` subscriptions without an explicit anchor.
    pub const DECEMBER: AnchorMonth = AnchorMonth(12);

    /// Validates a 1-indexed month number.
    pub fn new(month: u32) -> CoreResult<Self> {
        if (1..=12).contains(&month) {
            Ok(AnchorMonth(month))
        } else {
            Err(CoreError::InvalidAnchorMonth { month })
        }
    }

    /// Returns the month number (1-12).
    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for AnchorMonth {
    type Error = CoreError;

    fn try_from(month: u32) -> Result<Self, Self::Error> {
        AnchorMonth::new(month)
    }
}

impl From<AnchorMonth> for u32 {
    fn from(month: AnchorMonth) -> Self {
        month.0
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// The renewal parameters stored on a subscription record.
///
/// Renewal dates are never persisted; they are recomputed from these four
/// fields whenever the subscription list or dashboard is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Subscription {
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub anchor_month: Option<AnchorMonth>,
}

impl Subscription {
    /// Returns the validated renewal rule.
    pub fn rule(&self) -> CoreResult<RenewalRule> {
        RenewalRule::from_anchor(self.frequency, self.anchor_month)
    }

    /// Checks what the subscription form checks before saving:
    /// a usable renewal rule and `start_date <= end_date`.
    pub fn validate(&self) -> CoreResult<()> {
        self.rule()?;
        crate::validation::validate_date_range(self.start_date, self.end_date)?;
        Ok(())
    }

    /// All renewal dates between start and end.
    pub fn renewal_dates(&self) -> CoreResult<Vec<NaiveDate>> {
        Ok(self.rule()?.renewal_dates(self.start_date, self.end_date))
    }

    /// The next renewal strictly after `now`, if still before the end date.
    pub fn next_renewal(&self, now: NaiveDate) -> CoreResult<Option<NaiveDate>> {
        Ok(self.rule()?.next_renewal(self.start_date, self.end_date, now))
    }

    /// Whether the dashboard should highlight this subscription.
    pub fn is_renewal_approaching(&self, now: NaiveDate, window: AlertWindow) -> CoreResult<bool> {
        schedule::is_renewal_approaching_with_window(
            self.end_date,
            Some(self.start_date),
            Some(self.frequency),
            self.anchor_month.map(|m| m.get()),
            now,
            window,
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_fraction() {
        let rate = Percent::new(dec!(11));
        assert_eq!(rate.fraction(), dec!(0.11));
        assert_eq!(rate.to_string(), "11%");
        assert_eq!(Percent::new(dec!(12.50)).to_string(), "12.5%");
    }

    #[test]
    fn test_percent_default_is_zero() {
        assert!(Percent::default().is_zero());
    }

    #[test]
    fn test_line_item_deserializes_from_form_json() {
        let json = r#"{"quantity": 2, "unitPrice": 12000, "discountPercent": 10, "taxPercent": 11}"#;
        let line: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price, Money::from_francs(12_000));
        assert_eq!(line.discount_percent, Percent::from_integer(10));
        assert_eq!(line.tax_percent, Percent::from_integer(11));
        assert!(line.label.is_none());
    }

    #[test]
    fn test_line_item_percentages_default_to_zero() {
        let json = r#"{"quantity": 1, "unitPrice": "1500.50"}"#;
        let line: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(line.unit_price.amount(), dec!(1500.50));
        assert!(line.discount_percent.is_zero());
        assert!(line.tax_percent.is_zero());
    }

    #[test]
    fn test_frequency_from_str() {
        assert_eq!("monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!("Quarterly".parse::<Frequency>().unwrap(), Frequency::Quarterly);
        assert_eq!(" semestriel ".parse::<Frequency>().unwrap(), Frequency::Semiannual);
        assert_eq!("annuel".parse::<Frequency>().unwrap(), Frequency::Yearly);
        assert!(matches!(
            "weekly".parse::<Frequency>(),
            Err(CoreError::UnknownFrequency(name)) if name == "weekly"
        ));
    }

    #[test]
    fn test_frequency_display_roundtrips_through_from_str() {
        for frequency in Frequency::ALL {
            assert_eq!(frequency.to_string().parse::<Frequency>().unwrap(), frequency);
        }
    }

    #[test]
    fn test_frequency_classes() {
        assert_eq!(Frequency::Monthly.period_months(), Some(1));
        assert_eq!(Frequency::Bimonthly.period_months(), Some(2));
        assert_eq!(Frequency::Quarterly.period_months(), Some(3));
        assert_eq!(Frequency::Semiannual.period_months(), Some(6));
        assert_eq!(Frequency::Yearly.period_months(), None);
        assert_eq!(Frequency::Custom.period_months(), None);
    }

    #[test]
    fn test_anchor_month_bounds() {
        assert_eq!(AnchorMonth::new(1).unwrap().get(), 1);
        assert_eq!(AnchorMonth::new(12).unwrap(), AnchorMonth::DECEMBER);
        assert!(matches!(
            AnchorMonth::new(0),
            Err(CoreError::InvalidAnchorMonth { month: 0 })
        ));
        assert!(matches!(
            AnchorMonth::new(13),
            Err(CoreError::InvalidAnchorMonth { month: 13 })
        ));
    }

    #[test]
    fn test_anchor_month_rejected_during_deserialization() {
        let json = r#"{"startDate": "2024-01-01", "endDate": "2024-12-31", "frequency": "custom", "anchorMonth": 13}"#;
        assert!(serde_json::from_str::<Subscription>(json).is_err());
    }

    #[test]
    fn test_subscription_from_json() {
        let json = r#"{"startDate": "2024-01-01", "endDate": "2026-12-31", "frequency": "custom", "anchorMonth": 6}"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.anchor_month, Some(AnchorMonth::new(6).unwrap()));
        assert!(sub.validate().is_ok());
        assert_eq!(sub.renewal_dates().unwrap().len(), 3);
    }

    #[test]
    fn test_subscription_validate() {
        let sub = Subscription {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            frequency: Frequency::Monthly,
            anchor_month: None,
        };
        assert!(matches!(sub.validate(), Err(CoreError::Validation(_))));

        let sub = Subscription {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            frequency: Frequency::Custom,
            anchor_month: None,
        };
        assert!(matches!(
            sub.validate(),
            Err(CoreError::MissingAnchorMonth { .. })
        ));
    }

    fn yearly_subscription() -> Subscription {
        Subscription {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            frequency: Frequency::Yearly,
            anchor_month: None,
        }
    }

    #[test]
    fn test_subscription_next_renewal() {
        let sub = yearly_subscription();
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

        // Yearly renews in December on the start date's day.
        assert_eq!(sub.next_renewal(day(2024, 11, 20)).unwrap(), Some(day(2024, 12, 15)));
        assert_eq!(sub.next_renewal(day(2024, 12, 15)).unwrap(), Some(day(2025, 12, 15)));
        assert_eq!(sub.next_renewal(day(2026, 12, 20)).unwrap(), None);

        let invalid = Subscription {
            frequency: Frequency::Custom,
            ..sub
        };
        assert!(matches!(
            invalid.next_renewal(day(2024, 11, 20)),
            Err(CoreError::MissingAnchorMonth { .. })
        ));
    }

    #[test]
    fn test_subscription_is_renewal_approaching() {
        let sub = yearly_subscription();
        let now = NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();

        // Next renewal 2024-12-15 is 10 days away.
        assert!(!sub
            .is_renewal_approaching(now, AlertWindow::default())
            .unwrap());

        let window = AlertWindow {
            lead_days: 10,
            grace_days: 0,
        };
        assert!(sub.is_renewal_approaching(now, window).unwrap());
    }

    #[test]
    fn test_rounded_totals() {
        let totals = TotalsResult {
            total_excl_tax: Money::from_francs(21_600),
            total_tax: Money::from_francs(2_376),
            total_incl_tax: Money::from_francs(23_976),
        };
        assert_eq!(
            totals.rounded(),
            RoundedTotals {
                total_excl_tax: 21_600,
                total_tax: 2_375,
                total_incl_tax: 23_975,
            }
        );
    }
}
