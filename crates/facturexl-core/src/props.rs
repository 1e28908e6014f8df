//! Property-based tests for totals and rounding.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::money::{round_to_denomination, Money};
use crate::schedule::generate_renewal_dates;
use crate::totals::{compute_line, compute_totals};
use crate::types::{Frequency, LineItem, Percent};

/// Amounts from -10,000,000.00 to 10,000,000.00 F with two decimals.
fn amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000i64..1_000_000_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Percentages from 0.00 to 100.00.
fn percent() -> impl Strategy<Value = Percent> {
    (0i64..=10_000i64).prop_map(|v| Percent::new(Decimal::new(v, 2)))
}

fn line_item() -> impl Strategy<Value = LineItem> {
    (0i64..1_000, 0i64..10_000_000, percent(), percent()).prop_map(
        |(quantity, price, discount, tax)| {
            LineItem::new(quantity, Money::from_francs(price), discount, tax)
        },
    )
}

fn date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2040, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn frequency() -> impl Strategy<Value = Frequency> {
    prop::sample::select(Frequency::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// TTC is exactly HT plus tax, and exactly the sum of the line totals.
    #[test]
    fn prop_totals_are_additive(lines in prop::collection::vec(line_item(), 0..20)) {
        let totals = compute_totals(&lines);
        prop_assert_eq!(totals.total_incl_tax, totals.total_excl_tax + totals.total_tax);

        let line_totals: Money = lines.iter().map(|l| compute_line(l).line_total).sum();
        prop_assert_eq!(totals.total_incl_tax, line_totals);
    }

    /// Totals do not depend on line order.
    #[test]
    fn prop_totals_ignore_line_order(lines in prop::collection::vec(line_item(), 0..20)) {
        let mut reversed = lines.clone();
        reversed.reverse();
        prop_assert_eq!(compute_totals(&lines), compute_totals(&reversed));
    }

    /// Rounding twice is rounding once.
    #[test]
    fn prop_rounding_is_idempotent(x in amount()) {
        let once = round_to_denomination(x);
        prop_assert_eq!(round_to_denomination(Decimal::from(once)), once);
    }

    /// Results are multiples of 5 within 2.5 F (plus the franc rounding) of the input.
    #[test]
    fn prop_rounding_lands_on_denomination(x in amount()) {
        let rounded = round_to_denomination(x);
        prop_assert_eq!(rounded % 5, 0);
        prop_assert!((Decimal::from(rounded) - x).abs() <= Decimal::new(3, 0));
    }

    /// Negative amounts mirror positive ones.
    #[test]
    fn prop_rounding_is_symmetric(x in amount()) {
        prop_assert_eq!(round_to_denomination(-x), -round_to_denomination(x));
    }

    /// Schedules stay inside the range and strictly ascend.
    #[test]
    fn prop_schedule_within_range(
        start in date(),
        end in date(),
        frequency in frequency(),
        anchor in 1u32..=12,
    ) {
        let dates = generate_renewal_dates(start, end, frequency, Some(anchor)).unwrap();
        if start > end {
            prop_assert!(dates.is_empty());
        }
        for date in &dates {
            prop_assert!(*date >= start && *date <= end);
        }
        for pair in dates.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }
}
