use crate::error::AnalyticsError;
use rust_decimal::Decimal;

/// An ordered, non-negative sequence of monetary values.
///
/// A series owns its values. Building one from a store snapshot copies the
/// numbers out, so later writes to the store cannot be observed through it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSeries {
    values: Vec<Decimal>,
}

impl NumericSeries {
    pub fn new(values: Vec<Decimal>) -> Result<Self, AnalyticsError> {
        if let Some((index, value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| v.is_sign_negative() && !v.is_zero())
        {
            return Err(AnalyticsError::NegativeValue {
                index,
                value: value.to_string(),
            });
        }
        Ok(Self { values })
    }

    /// Collects a series from any iterator of values.
    pub fn collect<I>(values: I) -> Result<Self, AnalyticsError>
    where
        I: IntoIterator<Item = Decimal>,
    {
        Self::new(values.into_iter().collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[Decimal] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_negative_values() {
        let err = NumericSeries::new(vec![dec!(10.00), dec!(-0.01)]).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::NegativeValue {
                index: 1,
                value: "-0.01".to_string()
            }
        );
    }

    #[test]
    fn accepts_zero_and_negative_zero() {
        let series = NumericSeries::new(vec![Decimal::ZERO, -Decimal::ZERO]).unwrap();
        assert_eq!(series.len(), 2);
    }
}
