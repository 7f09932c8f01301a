//! Mercado Livre pricing with the free-shipping threshold.
//!
//! Which fixed costs apply depends on whether the final price crosses the
//! threshold, and the price depends on those costs. The resolver solves once
//! assuming paid shipping and, if that price lands at or above the threshold,
//! solves exactly once more with the free-shipping costs.

use rust_decimal::Decimal;
use tracing::debug;

use super::entities::{AdLevel, MercadoLivreQuote, ShippingMode};
use super::fee_table::MercadoLivreFees;
use super::solver::{percent_of, solve, InfeasibleMarginError};

/// Fixed costs of one solver pass.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PassCosts {
    /// Sale fee charged by the marketplace.
    fixed_fee: Decimal,
    /// Shipping paid by the seller.
    logistics_cost: Decimal,
    /// Shipping credit paid back to the seller.
    reimbursement: Decimal,
    /// Amount fed to the solver as the fixed part of the markup.
    solver_fixed: Decimal,
}

pub fn compute_mercado_livre_price(
    cost: Decimal,
    margin_percent: Decimal,
    ad_level: AdLevel,
    custom_rate_percent: Option<Decimal>,
    shipping_mode: ShippingMode,
    fees: &MercadoLivreFees,
) -> Result<MercadoLivreQuote, InfeasibleMarginError> {
    let rate_percent = custom_rate_percent.unwrap_or(match ad_level {
        AdLevel::Classico => fees.classico_percent,
        AdLevel::Premium => fees.premium_percent,
    });

    let paid = pass_costs(shipping_mode, false, fees);
    let mut price = solve(cost, margin_percent, rate_percent, paid.solver_fixed)?;
    let mut costs = paid;
    let mut is_free_shipping = false;
    let mut passes = 1;

    if price >= fees.free_shipping_threshold {
        debug!(
            first_pass = %price.round_dp(2),
            threshold = %fees.free_shipping_threshold,
            mode = shipping_mode.label(),
            "price crosses free-shipping threshold, re-solving"
        );
        costs = pass_costs(shipping_mode, true, fees);
        price = solve(cost, margin_percent, rate_percent, costs.solver_fixed)?;
        is_free_shipping = true;
        passes = 2;
    }

    let commission = percent_of(price, rate_percent);
    let net_profit =
        price - commission - costs.fixed_fee - costs.logistics_cost + costs.reimbursement - cost;

    Ok(MercadoLivreQuote {
        selling_price: price,
        cost_price: cost,
        rate_percent,
        commission,
        fixed_fee: costs.fixed_fee,
        logistics_cost: costs.logistics_cost,
        reimbursement: costs.reimbursement,
        net_profit,
        ad_level,
        shipping_mode,
        is_free_shipping,
        passes,
    })
}

fn pass_costs(mode: ShippingMode, free_shipping: bool, fees: &MercadoLivreFees) -> PassCosts {
    match mode {
        ShippingMode::Padrao | ShippingMode::Full => {
            let table = if matches!(mode, ShippingMode::Full) {
                &fees.full
            } else {
                &fees.padrao
            };
            if free_shipping {
                PassCosts {
                    fixed_fee: Decimal::ZERO,
                    logistics_cost: table.free_shipping_cost,
                    reimbursement: Decimal::ZERO,
                    solver_fixed: table.free_shipping_cost,
                }
            } else {
                PassCosts {
                    fixed_fee: table.paid_fixed_fee,
                    logistics_cost: Decimal::ZERO,
                    reimbursement: Decimal::ZERO,
                    solver_fixed: table.paid_fixed_fee,
                }
            }
        }
        // The reimbursement is always a credit and the motoboy always a cost;
        // only the sale fee depends on free-shipping status.
        ShippingMode::Flex { motoboy_fee } => {
            let fixed_fee = if free_shipping {
                Decimal::ZERO
            } else {
                fees.flex.paid_fixed_fee
            };
            let uncovered = (motoboy_fee - fees.flex.reimbursement).max(Decimal::ZERO);
            PassCosts {
                fixed_fee,
                logistics_cost: motoboy_fee,
                reimbursement: fees.flex.reimbursement,
                solver_fixed: fixed_fee + uncovered,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fees() -> MercadoLivreFees {
        MercadoLivreFees::default()
    }

    #[test]
    fn cheap_classico_padrao_stays_below_threshold() {
        let quote = compute_mercado_livre_price(
            dec!(20),
            dec!(20),
            AdLevel::Classico,
            None,
            ShippingMode::Padrao,
            &fees(),
        )
        .unwrap();
        assert_eq!(quote.rate_percent, dec!(14));
        assert_eq!(quote.selling_price.round_dp(2), dec!(39.39));
        assert_eq!(quote.fixed_fee, dec!(6.00));
        assert_eq!(quote.passes, 1);
        assert!(!quote.is_free_shipping);
    }

    #[test]
    fn crossing_the_threshold_switches_to_free_shipping_costs_once() {
        let quote = compute_mercado_livre_price(
            dec!(60),
            dec!(20),
            AdLevel::Premium,
            None,
            ShippingMode::Padrao,
            &fees(),
        )
        .unwrap();
        // first pass: 66 / 0.61 = 108.2 >= 79
        assert_eq!(quote.passes, 2);
        assert!(quote.is_free_shipping);
        assert_eq!(quote.fixed_fee, Decimal::ZERO);
        assert_eq!(quote.logistics_cost, dec!(22.45));
        assert_eq!(quote.selling_price.round_dp(2), dec!(135.16));
    }

    #[test]
    fn custom_rate_overrides_ad_level() {
        let quote = compute_mercado_livre_price(
            dec!(20),
            dec!(20),
            AdLevel::Premium,
            Some(dec!(10)),
            ShippingMode::Full,
            &fees(),
        )
        .unwrap();
        assert_eq!(quote.rate_percent, dec!(10));
        assert_eq!(quote.fixed_fee, dec!(6.25));
        assert_eq!(quote.selling_price, dec!(37.5));
    }

    #[test]
    fn flex_tracks_motoboy_and_reimbursement_separately() {
        let quote = compute_mercado_livre_price(
            dec!(20),
            dec!(20),
            AdLevel::Classico,
            None,
            ShippingMode::Flex {
                motoboy_fee: dec!(15),
            },
            &fees(),
        )
        .unwrap();
        assert_eq!(quote.logistics_cost, dec!(15));
        assert_eq!(quote.reimbursement, dec!(8.90));
        assert_eq!(quote.fixed_fee, dec!(6.75));
        // (20 + 6.75 + 6.10) / 0.66
        assert_eq!(quote.selling_price.round_dp(2), dec!(49.77));
        let target = percent_of(quote.selling_price, dec!(20));
        assert!((quote.net_profit - target).abs() < dec!(0.000001));
    }

    #[test]
    fn flex_motoboy_cheaper_than_reimbursement_keeps_the_surplus() {
        let quote = compute_mercado_livre_price(
            dec!(20),
            dec!(20),
            AdLevel::Classico,
            None,
            ShippingMode::Flex {
                motoboy_fee: dec!(5),
            },
            &fees(),
        )
        .unwrap();
        let target = percent_of(quote.selling_price, dec!(20));
        assert_eq!((quote.net_profit - target).round_dp(2), dec!(3.90));
    }

    #[test]
    fn full_above_threshold_charges_free_shipping_cost() {
        let quote = compute_mercado_livre_price(
            dec!(50),
            dec!(20),
            AdLevel::Classico,
            None,
            ShippingMode::Full,
            &fees(),
        )
        .unwrap();
        // first pass: 56.25 / 0.66 = 85.2
        assert_eq!(quote.passes, 2);
        assert!(quote.is_free_shipping);
        assert_eq!(quote.fixed_fee, Decimal::ZERO);
        assert_eq!(quote.logistics_cost, dec!(22.45));
        assert_eq!(quote.selling_price.round_dp(2), dec!(109.77));
    }

    #[test]
    fn flex_above_threshold_drops_the_fixed_fee() {
        let quote = compute_mercado_livre_price(
            dec!(60),
            dec!(20),
            AdLevel::Classico,
            None,
            ShippingMode::Flex {
                motoboy_fee: dec!(15),
            },
            &fees(),
        )
        .unwrap();
        // first pass: (60 + 6.75 + 6.10) / 0.66 = 110.38
        assert_eq!(quote.passes, 2);
        assert!(quote.is_free_shipping);
        assert_eq!(quote.fixed_fee, Decimal::ZERO);
        assert_eq!(quote.logistics_cost, dec!(15));
        assert_eq!(quote.reimbursement, dec!(8.90));
        // (60 + 6.10) / 0.66
        assert_eq!(quote.selling_price.round_dp(2), dec!(100.15));
    }

    #[test]
    fn flex_second_pass_below_threshold_stays_free_shipping() {
        let quote = compute_mercado_livre_price(
            dec!(48),
            dec!(20),
            AdLevel::Classico,
            None,
            ShippingMode::Flex {
                motoboy_fee: dec!(5),
            },
            &fees(),
        )
        .unwrap();
        // first pass: (48 + 6.75) / 0.66 = 82.95, second: 48 / 0.66 = 72.73
        assert_eq!(quote.passes, 2);
        assert!(quote.is_free_shipping);
        assert_eq!(quote.fixed_fee, Decimal::ZERO);
        assert!(quote.selling_price < fees().free_shipping_threshold);
        assert_eq!(quote.selling_price.round_dp(2), dec!(72.73));
    }

    #[test]
    fn infeasible_rate_and_margin() {
        let err = compute_mercado_livre_price(
            dec!(20),
            dec!(81),
            AdLevel::Premium,
            None,
            ShippingMode::Padrao,
            &fees(),
        )
        .unwrap_err();
        assert_eq!(err.variable_rate_percent(), dec!(19));
    }
}
