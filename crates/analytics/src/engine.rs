use crate::error::AnalyticsError;
use crate::report::StatisticsResult;
use crate::series::NumericSeries;
use chrono::Utc;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Number of decimal places every reported figure is rounded to.
const DISPLAY_DP: u32 = 2;

/// Computes count, sum, mean, min, max, median and the population standard
/// deviation of `series`.
///
/// Accumulation runs at full `Decimal` precision; rounding to cents happens
/// only when the result is assembled. An empty series yields
/// `StatisticsResult::empty()`. A series whose sum leaves the `Decimal` range
/// yields `AnalyticsError::Overflow`.
pub fn compute_statistics(series: &NumericSeries) -> Result<StatisticsResult, AnalyticsError> {
    let values = series.values();
    if values.is_empty() {
        return Ok(StatisticsResult::empty());
    }

    let count = Decimal::from(values.len());

    let mut sum = Decimal::ZERO;
    let mut min = values[0];
    let mut max = values[0];
    for &value in values {
        sum = sum
            .checked_add(value)
            .ok_or(AnalyticsError::Overflow("sum"))?;
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }
    let mean = sum / count;

    let median = median_of(values);
    let stddev = population_stddev(values, mean, count)?;

    Ok(StatisticsResult {
        count: values.len(),
        sum: round(sum),
        mean: round(mean),
        min: round(min),
        max: round(max),
        median: round(median),
        stddev: round(stddev),
        computed_at: Utc::now(),
    })
}

/// Population standard deviation (divides by n, not n - 1).
///
/// Deviations are scaled by the largest one before squaring, so every square
/// lies in `[0, 1]` and their sum never exceeds `count`.
fn population_stddev(
    values: &[Decimal],
    mean: Decimal,
    count: Decimal,
) -> Result<Decimal, AnalyticsError> {
    // Every value and the mean are non-negative, so no difference can overflow.
    let spread = values
        .iter()
        .map(|v| (*v - mean).abs())
        .max()
        .unwrap_or_default();
    if spread.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let mut squares = Decimal::ZERO;
    for value in values {
        let scaled = (*value - mean) / spread;
        squares = squares
            .checked_add(scaled * scaled)
            .ok_or(AnalyticsError::Overflow("variance"))?;
    }
    // sqrt only fails for negative input; a sum of squares never is.
    let root = (squares / count).sqrt().unwrap_or_default();
    spread
        .checked_mul(root)
        .ok_or(AnalyticsError::Overflow("standard deviation"))
}

fn median_of(values: &[Decimal]) -> Decimal {
    let mut sorted = values.to_vec();
    sorted.sort();
    let len = sorted.len();
    if len % 2 == 0 {
        let (low, high) = (sorted[len / 2 - 1], sorted[len / 2]);
        // low <= high, so halving the gap stays in range where low + high might not.
        low + (high - low) / Decimal::from(2)
    } else {
        sorted[len / 2]
    }
}

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rust_decimal_macros::dec;

    fn series(values: &[Decimal]) -> NumericSeries {
        NumericSeries::new(values.to_vec()).unwrap()
    }

    #[test]
    fn two_product_catalogue() {
        let stats = compute_statistics(&series(&[dec!(2500.00), dec!(89.90)])).unwrap();

        assert_eq!(stats.count, 2);
        assert_eq!(stats.sum, dec!(2589.90));
        assert_eq!(stats.mean, dec!(1294.95));
        assert_eq!(stats.median, dec!(1294.95));
        assert_eq!(stats.min, dec!(89.90));
        assert_eq!(stats.max, dec!(2500.00));
        assert_eq!(stats.stddev, dec!(1205.05));
    }

    #[test]
    fn empty_series_is_all_zero() {
        let stats = compute_statistics(&NumericSeries::empty()).unwrap();

        assert_eq!(stats.count, 0);
        assert!(stats.sum.is_zero());
        assert!(stats.mean.is_zero());
        assert!(stats.min.is_zero());
        assert!(stats.max.is_zero());
        assert!(stats.median.is_zero());
        assert!(stats.stddev.is_zero());
    }

    #[test]
    fn single_value_has_zero_spread() {
        let stats = compute_statistics(&series(&[dec!(42.50)])).unwrap();

        assert_eq!(stats.median, dec!(42.50));
        assert_eq!(stats.mean, dec!(42.50));
        assert!(stats.stddev.is_zero());
    }

    #[test]
    fn odd_length_median_is_middle_element() {
        let stats = compute_statistics(&series(&[dec!(30), dec!(10), dec!(20)])).unwrap();
        assert_eq!(stats.median, dec!(20));
    }

    #[test]
    fn input_order_is_left_untouched() {
        let input = series(&[dec!(3), dec!(1), dec!(2)]);
        compute_statistics(&input).unwrap();
        assert_eq!(input.values(), &[dec!(3), dec!(1), dec!(2)]);
    }

    #[test]
    fn figures_are_rounded_to_cents() {
        let stats = compute_statistics(&series(&[dec!(10), dec!(10), dec!(10.01)])).unwrap();
        // 30.01 / 3 = 10.00333...
        assert_eq!(stats.mean, dec!(10.00));
        assert_eq!(stats.mean.scale(), 2);
    }

    #[test]
    fn wide_spread_does_not_overflow_the_variance() {
        // Each squared deviation alone is 2.5e29, past the Decimal range.
        let stats = compute_statistics(&series(&[dec!(1000000000000000), dec!(0)])).unwrap();

        assert_eq!(stats.sum, dec!(1000000000000000.00));
        assert_eq!(stats.mean, dec!(500000000000000.00));
        assert_eq!(stats.median, dec!(500000000000000.00));
        assert_eq!(stats.stddev, dec!(500000000000000.00));
    }

    #[test]
    fn median_of_the_largest_values_stays_in_range() {
        assert_eq!(median_of(&[Decimal::MAX, Decimal::MAX]), Decimal::MAX);
        assert_eq!(median_of(&[Decimal::MAX, Decimal::ZERO]), Decimal::MAX / dec!(2));
    }

    #[test]
    fn sum_past_the_decimal_range_is_an_error() {
        let err = compute_statistics(&series(&[Decimal::MAX, dec!(1)])).unwrap_err();
        assert_eq!(err, AnalyticsError::Overflow("sum"));
    }

    #[quickcheck]
    fn bounds_hold_for_any_non_empty_series(cents: Vec<u32>) -> bool {
        if cents.is_empty() {
            return true;
        }
        let values: Vec<Decimal> = cents.iter().map(|c| Decimal::new(*c as i64, 2)).collect();
        let stats = compute_statistics(&series(&values)).unwrap();

        stats.count == values.len()
            && stats.min <= stats.mean
            && stats.mean <= stats.max
            && stats.min <= stats.median
            && stats.median <= stats.max
            && stats.stddev >= Decimal::ZERO
    }
}
