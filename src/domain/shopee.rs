use rust_decimal::Decimal;

use super::entities::ShopeeQuote;
use super::fee_table::ShopeeFees;
use super::solver::{percent_of, solve, InfeasibleMarginError};

/// Single-pass Shopee pricing: commission + transaction rate (+ free-shipping
/// extra) over the price, plus the flat per-item fee.
pub fn compute_shopee_price(
    cost: Decimal,
    margin_percent: Decimal,
    quantity: u32,
    free_shipping: bool,
    fees: &ShopeeFees,
) -> Result<ShopeeQuote, InfeasibleMarginError> {
    let mut variable_rate_percent = fees.commission_percent + fees.transaction_percent;
    if free_shipping {
        variable_rate_percent += fees.free_shipping_extra_percent;
    }

    let selling_price = solve(cost, margin_percent, variable_rate_percent, fees.fixed_fee)?;

    Ok(ShopeeQuote {
        selling_price,
        cost_price: cost,
        variable_rate_percent,
        variable_fees: percent_of(selling_price, variable_rate_percent),
        fixed_fee: fees.fixed_fee,
        free_shipping,
        quantity,
        breakdown: breakdown_label(fees, free_shipping),
    })
}

fn breakdown_label(fees: &ShopeeFees, free_shipping: bool) -> String {
    let mut label = format!(
        "{}% Comissão + {}% Transação",
        fees.commission_percent.normalize(),
        fees.transaction_percent.normalize()
    );
    if free_shipping {
        label.push_str(&format!(
            " + {}% Frete Grátis",
            fees.free_shipping_extra_percent.normalize()
        ));
    }
    label
}
