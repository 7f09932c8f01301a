//! Reverse-markup solver shared by every marketplace.

use rust_decimal::Decimal;
use thiserror::Error;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// No finite, representable price satisfies the request.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InfeasibleMarginError {
    #[error(
        "margin ({margin_percent}%) plus fee rates ({variable_rate_percent}%) meet or exceed 100% \
         of the selling price; no finite price satisfies the request. Reduce the desired margin or \
         choose a different fee structure."
    )]
    RatesExceedPrice {
        margin_percent: Decimal,
        variable_rate_percent: Decimal,
    },
    #[error(
        "margin ({margin_percent}%) plus fee rates ({variable_rate_percent}%) leave so little of the \
         selling price that the price is too large to compute. Reduce the desired margin or the cost."
    )]
    PriceOutOfRange {
        margin_percent: Decimal,
        variable_rate_percent: Decimal,
    },
}

impl InfeasibleMarginError {
    pub fn margin_percent(&self) -> Decimal {
        match self {
            Self::RatesExceedPrice { margin_percent, .. }
            | Self::PriceOutOfRange { margin_percent, .. } => *margin_percent,
        }
    }

    pub fn variable_rate_percent(&self) -> Decimal {
        match self {
            Self::RatesExceedPrice {
                variable_rate_percent,
                ..
            }
            | Self::PriceOutOfRange {
                variable_rate_percent,
                ..
            } => *variable_rate_percent,
        }
    }
}

/// Solves `price = (cost + fixed_fee) / (1 - variable_rate - margin)`.
///
/// Fails when the divisor is not positive or the price does not fit in a
/// `Decimal`, so the result is always a finite, positive price for positive
/// costs.
pub fn solve(
    cost: Decimal,
    margin_percent: Decimal,
    variable_rate_percent: Decimal,
    fixed_fee: Decimal,
) -> Result<Decimal, InfeasibleMarginError> {
    let divisor = Decimal::ONE - variable_rate_percent / HUNDRED - margin_percent / HUNDRED;
    if divisor <= Decimal::ZERO {
        return Err(InfeasibleMarginError::RatesExceedPrice {
            margin_percent,
            variable_rate_percent,
        });
    }
    cost.checked_add(fixed_fee)
        .and_then(|base| base.checked_div(divisor))
        .ok_or(InfeasibleMarginError::PriceOutOfRange {
            margin_percent,
            variable_rate_percent,
        })
}

/// `value * percent / 100`. Never overflows for `percent` up to 100.
pub fn percent_of(value: Decimal, percent: Decimal) -> Decimal {
    value * (percent / HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn solves_the_plain_markup() {
        let price = solve(dec!(50), dec!(30), dec!(20), dec!(4)).unwrap();
        assert_eq!(price, dec!(108));
    }

    #[test]
    fn rejects_exactly_one_hundred_percent() {
        let err = solve(dec!(10), dec!(80), dec!(20), dec!(4)).unwrap_err();
        assert_eq!(err.margin_percent(), dec!(80));
        assert!(err.to_string().contains("100%"));
        assert!(err.to_string().contains("Reduce the desired margin"));
    }

    #[test]
    fn price_too_large_to_represent_is_an_error() {
        // divisor is 1e-23, so the price would be around 1e31
        let err = solve(
            dec!(100000000),
            dec!(99.999999999999999999999),
            Decimal::ZERO,
            dec!(6),
        )
        .unwrap_err();
        assert!(matches!(err, InfeasibleMarginError::PriceOutOfRange { .. }));
        assert!(err.to_string().contains("Reduce the desired margin"));
    }

    #[test]
    fn percent_of_the_largest_price_does_not_overflow() {
        assert_eq!(percent_of(Decimal::MAX, dec!(100)), Decimal::MAX);
        assert_eq!(percent_of(dec!(108), dec!(20)), dec!(21.6));
    }

    #[test]
    fn zero_fixed_fee_is_pure_percentage_markup() {
        let price = solve(dec!(30), dec!(25), dec!(25), Decimal::ZERO).unwrap();
        assert_eq!(price, dec!(60));
    }
}
