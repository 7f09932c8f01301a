use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entities::{CalculationResult, Marketplace, MarketplaceQuote};
use super::solver::InfeasibleMarginError;

/// One marketplace's answer: either a normalized result or the reason none
/// exists. Serializes as the result itself or `{ "error": true, "message" }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalculationOutcome {
    Priced(CalculationResult),
    Failed(FailedCalculation),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FailedCalculation {
    pub marketplace: Marketplace,
    pub error: bool,
    pub message: String,
}

impl CalculationOutcome {
    pub fn from_quote(
        marketplace: Marketplace,
        quote: Result<MarketplaceQuote, InfeasibleMarginError>,
    ) -> Self {
        match quote {
            Ok(quote) => CalculationOutcome::Priced(normalize(&quote)),
            Err(err) => CalculationOutcome::Failed(FailedCalculation {
                marketplace,
                error: true,
                message: err.to_string(),
            }),
        }
    }

    pub fn marketplace(&self) -> Marketplace {
        match self {
            CalculationOutcome::Priced(result) => result.marketplace,
            CalculationOutcome::Failed(failed) => failed.marketplace,
        }
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            CalculationOutcome::Priced(result) => Some(result),
            CalculationOutcome::Failed(_) => None,
        }
    }
}

/// Maps a marketplace quote onto the common reporting schema.
pub fn normalize(quote: &MarketplaceQuote) -> CalculationResult {
    match quote {
        MarketplaceQuote::Shopee(q) => assemble(
            quote.marketplace(),
            Fields {
                selling_price: q.selling_price,
                cost_price: q.cost_price,
                variable_rate_percent: q.variable_rate_percent,
                commission: q.variable_fees,
                fixed_fees: q.fixed_fee,
                logistics_cost: Decimal::ZERO,
                logistics_credit: Decimal::ZERO,
                fee_breakdown: q.breakdown.clone(),
                tier_label: None,
                is_free_shipping_eligible: q.free_shipping,
            },
        ),
        MarketplaceQuote::MercadoLivre(q) => {
            let mut breakdown = format!(
                "{}% Comissão {}",
                q.rate_percent.normalize(),
                q.ad_level.label()
            );
            if !q.fixed_fee.is_zero() {
                breakdown.push_str(&format!(" + R$ {:.2} Taxa Fixa", q.fixed_fee));
            }
            assemble(
                quote.marketplace(),
                Fields {
                    selling_price: q.selling_price,
                    cost_price: q.cost_price,
                    variable_rate_percent: q.rate_percent,
                    commission: q.commission,
                    fixed_fees: q.fixed_fee,
                    logistics_cost: q.logistics_cost,
                    logistics_credit: q.reimbursement,
                    fee_breakdown: breakdown,
                    tier_label: Some(format!("Envio {}", q.shipping_mode.label())),
                    is_free_shipping_eligible: q.is_free_shipping,
                },
            )
        }
        MarketplaceQuote::Amazon(q) => assemble(
            quote.marketplace(),
            Fields {
                selling_price: q.price,
                cost_price: q.cost_price,
                variable_rate_percent: q.tax_rate_percent,
                commission: q.tax_amount,
                fixed_fees: Decimal::ZERO,
                logistics_cost: q.logistics_cost,
                logistics_credit: Decimal::ZERO,
                fee_breakdown: format!("{}% Comissão Amazon", q.tax_rate_percent.normalize()),
                tier_label: Some(format!("{} · {}", q.logistic_mode.label(), q.tier_info)),
                is_free_shipping_eligible: false,
            },
        ),
    }
}

struct Fields {
    selling_price: Decimal,
    cost_price: Decimal,
    variable_rate_percent: Decimal,
    commission: Decimal,
    fixed_fees: Decimal,
    logistics_cost: Decimal,
    logistics_credit: Decimal,
    fee_breakdown: String,
    tier_label: Option<String>,
    is_free_shipping_eligible: bool,
}

fn assemble(marketplace: Marketplace, fields: Fields) -> CalculationResult {
    let total_fees = fields.commission + fields.fixed_fees;
    let net_revenue_after_fees = fields.selling_price - total_fees;
    let net_profit = net_revenue_after_fees - fields.logistics_cost + fields.logistics_credit
        - fields.cost_price;
    let realized_margin_percent = if fields.selling_price.is_zero() {
        Decimal::ZERO
    } else {
        net_profit / fields.selling_price * Decimal::ONE_HUNDRED
    };

    CalculationResult {
        marketplace,
        selling_price: fields.selling_price,
        cost_price: fields.cost_price,
        variable_rate_percent: fields.variable_rate_percent,
        commission: fields.commission,
        fixed_fees: fields.fixed_fees,
        total_fees,
        logistics_cost: fields.logistics_cost,
        logistics_credit: fields.logistics_credit,
        net_revenue_after_fees,
        net_profit,
        realized_margin_percent,
        fee_breakdown: fields.fee_breakdown,
        tier_label: fields.tier_label,
        is_free_shipping_eligible: fields.is_free_shipping_eligible,
    }
}
