//! Amazon pricing, including the tiered Delivery by Amazon logistics search.

use rust_decimal::Decimal;
use tracing::debug;

use super::entities::{AmazonQuote, LogisticMode};
use super::fee_table::{AmazonFees, LogisticsTier, TierFee};
use super::solver::{percent_of, solve, InfeasibleMarginError};

/// The first tier whose solved price stays inside its own bound.
#[derive(Clone, Debug, PartialEq)]
pub struct TierSelection {
    /// `None` when the schedule has no tiers at all.
    pub index: Option<usize>,
    pub fee: Decimal,
    pub price: Decimal,
    pub label: String,
}

pub fn compute_amazon_price(
    cost: Decimal,
    margin_percent: Decimal,
    logistic_mode: LogisticMode,
    rate_percent: Option<Decimal>,
    logistic_fee: Option<Decimal>,
    fees: &AmazonFees,
) -> Result<AmazonQuote, InfeasibleMarginError> {
    let tax_rate_percent = rate_percent.unwrap_or(fees.referral_percent);
    let caller_fee = logistic_fee.unwrap_or(Decimal::ZERO);

    let (price, logistics_cost, tier_info, tier_index) = match logistic_mode {
        LogisticMode::Fbm | LogisticMode::Fba => {
            let price = solve(cost, margin_percent, tax_rate_percent, caller_fee)?;
            let info = format!("{} - frete informado", logistic_mode.label());
            (price, caller_fee, info, None)
        }
        LogisticMode::Dba => {
            let selection = search_tiers(
                cost,
                margin_percent,
                tax_rate_percent,
                caller_fee,
                &fees.dba_tiers,
            )?;
            (
                selection.price,
                selection.fee,
                selection.label,
                selection.index,
            )
        }
    };

    let tax_amount = percent_of(price, tax_rate_percent);
    Ok(AmazonQuote {
        price,
        cost_price: cost,
        tax_rate_percent,
        tax_amount,
        revenue_post_tax: price - tax_amount,
        logistics_cost,
        logistic_mode,
        tier_info,
        tier_index,
    })
}

/// Probes the tiers from cheapest to most expensive.
///
/// Each probe is a full solver call at that tier's fee; a bounded tier is
/// accepted only if the resulting price does not exceed its upper bound, so
/// the reported price and the fee charged always agree.
pub fn search_tiers(
    cost: Decimal,
    margin_percent: Decimal,
    rate_percent: Decimal,
    caller_fee: Decimal,
    tiers: &[LogisticsTier],
) -> Result<TierSelection, InfeasibleMarginError> {
    let mut last_probe = None;

    for (index, tier) in tiers.iter().enumerate() {
        let fee = match tier.fee {
            TierFee::Fixed(fee) => fee,
            TierFee::CallerSupplied => caller_fee,
        };
        let price = solve(cost, margin_percent, rate_percent, fee)?;
        let selection = TierSelection {
            index: Some(index),
            fee,
            price,
            label: tier.label.clone(),
        };

        match tier.upper_bound {
            Some(bound) if price > bound => {
                debug!(
                    tier = %tier.label,
                    price = %price.round_dp(2),
                    bound = %bound,
                    "price exceeds tier bound, trying next tier"
                );
                last_probe = Some(selection);
            }
            _ => return Ok(selection),
        }
    }

    // Only reachable with a schedule lacking its catch-all tier.
    match last_probe {
        Some(selection) => Ok(selection),
        None => Ok(TierSelection {
            index: None,
            fee: caller_fee,
            price: solve(cost, margin_percent, rate_percent, caller_fee)?,
            label: "Frete informado".to_string(),
        }),
    }
}
