use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-unit request shared by every marketplace. Only built through
/// [`CalculationInput::new`], so it is serializable but not deserializable.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalculationInput {
    cost_price: Decimal,
    margin_percent: Decimal,
    quantity: u32,
}

impl CalculationInput {
    /// Validates the caller-side preconditions of the solver.
    pub fn new(
        cost_price: Decimal,
        margin_percent: Decimal,
        quantity: u32,
    ) -> Result<Self, InputError> {
        if cost_price <= Decimal::ZERO {
            return Err(InputError::NonPositiveCost(cost_price));
        }
        if margin_percent <= Decimal::ZERO || margin_percent >= Decimal::ONE_HUNDRED {
            return Err(InputError::MarginOutOfRange(margin_percent));
        }
        if quantity == 0 {
            return Err(InputError::ZeroQuantity);
        }
        Ok(Self {
            cost_price,
            margin_percent,
            quantity,
        })
    }

    pub fn cost_price(&self) -> Decimal {
        self.cost_price
    }

    pub fn margin_percent(&self) -> Decimal {
        self.margin_percent
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum InputError {
    #[error("cost price must be greater than zero (got {0})")]
    NonPositiveCost(Decimal),
    #[error("margin must be between 0% and 100% exclusive (got {0}%)")]
    MarginOutOfRange(Decimal),
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: Decimal },
    #[error("flex shipping needs the motoboy fee")]
    MissingMotoboyFee,
    #[error("the motoboy fee only applies to flex shipping")]
    MotoboyFeeWithoutFlex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marketplace {
    Shopee,
    MercadoLivre,
    Amazon,
}

impl Marketplace {
    pub const ALL: [Marketplace; 3] = [
        Marketplace::Shopee,
        Marketplace::MercadoLivre,
        Marketplace::Amazon,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Marketplace::Shopee => "Shopee",
            Marketplace::MercadoLivre => "Mercado Livre",
            Marketplace::Amazon => "Amazon",
        }
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopeeOptions {
    pub free_shipping: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdLevel {
    #[default]
    Classico,
    Premium,
}

impl AdLevel {
    pub fn label(&self) -> &'static str {
        match self {
            AdLevel::Classico => "Clássico",
            AdLevel::Premium => "Premium",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ShippingMode {
    #[default]
    Padrao,
    Full,
    /// Seller-arranged same-day delivery; the motoboy is paid by the seller.
    Flex { motoboy_fee: Decimal },
}

impl ShippingMode {
    pub fn label(&self) -> &'static str {
        match self {
            ShippingMode::Padrao => "Padrão",
            ShippingMode::Full => "Full",
            ShippingMode::Flex { .. } => "Flex",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MercadoLivreOptions {
    pub ad_level: AdLevel,
    /// Overrides the ad-level commission when set.
    pub custom_rate_percent: Option<Decimal>,
    pub shipping_mode: ShippingMode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogisticMode {
    /// Fulfilled by the merchant.
    #[default]
    Fbm,
    /// Fulfilled by Amazon.
    Fba,
    /// Delivery by Amazon, priced by tier.
    Dba,
}

impl LogisticMode {
    pub fn label(&self) -> &'static str {
        match self {
            LogisticMode::Fbm => "FBM",
            LogisticMode::Fba => "FBA",
            LogisticMode::Dba => "DBA",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmazonOptions {
    pub logistic_mode: LogisticMode,
    pub rate_percent: Option<Decimal>,
    /// Used directly for FBM/FBA and as the catch-all DBA tier fee.
    pub logistic_fee: Option<Decimal>,
}

/// Marketplace-specific options for one calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "marketplace")]
pub enum MarketplaceRequest {
    Shopee(ShopeeOptions),
    MercadoLivre(MercadoLivreOptions),
    Amazon(AmazonOptions),
}

impl MarketplaceRequest {
    pub fn marketplace(&self) -> Marketplace {
        match self {
            MarketplaceRequest::Shopee(_) => Marketplace::Shopee,
            MarketplaceRequest::MercadoLivre(_) => Marketplace::MercadoLivre,
            MarketplaceRequest::Amazon(_) => Marketplace::Amazon,
        }
    }

    /// Rejects negative overrides before they reach a resolver.
    pub fn validate(&self) -> Result<(), InputError> {
        let amounts: Vec<(&'static str, Option<Decimal>)> = match self {
            MarketplaceRequest::Shopee(_) => Vec::new(),
            MarketplaceRequest::MercadoLivre(options) => {
                let motoboy_fee = match options.shipping_mode {
                    ShippingMode::Flex { motoboy_fee } => Some(motoboy_fee),
                    _ => None,
                };
                vec![
                    ("custom rate", options.custom_rate_percent),
                    ("motoboy fee", motoboy_fee),
                ]
            }
            MarketplaceRequest::Amazon(options) => vec![
                ("referral rate", options.rate_percent),
                ("logistic fee", options.logistic_fee),
            ],
        };
        let negative = amounts.into_iter().find_map(|(field, value)| {
            value
                .filter(|v| v.is_sign_negative() && !v.is_zero())
                .map(|v| (field, v))
        });
        match negative {
            Some((field, value)) => Err(InputError::NegativeAmount { field, value }),
            None => Ok(()),
        }
    }
}

/// Shopee resolver output.
#[derive(Clone, Debug, PartialEq)]
pub struct ShopeeQuote {
    pub selling_price: Decimal,
    pub cost_price: Decimal,
    pub variable_rate_percent: Decimal,
    pub variable_fees: Decimal,
    pub fixed_fee: Decimal,
    pub free_shipping: bool,
    pub quantity: u32,
    pub breakdown: String,
}

/// Mercado Livre resolver output.
#[derive(Clone, Debug, PartialEq)]
pub struct MercadoLivreQuote {
    pub selling_price: Decimal,
    pub cost_price: Decimal,
    pub rate_percent: Decimal,
    pub commission: Decimal,
    pub fixed_fee: Decimal,
    /// Shipping paid by the seller (free-shipping cost or the motoboy).
    pub logistics_cost: Decimal,
    /// Flex reimbursement credited by the marketplace.
    pub reimbursement: Decimal,
    pub net_profit: Decimal,
    pub ad_level: AdLevel,
    pub shipping_mode: ShippingMode,
    pub is_free_shipping: bool,
    /// Number of solver passes (1 or 2).
    pub passes: u8,
}

/// Amazon resolver output.
#[derive(Clone, Debug, PartialEq)]
pub struct AmazonQuote {
    pub price: Decimal,
    pub cost_price: Decimal,
    pub tax_rate_percent: Decimal,
    pub tax_amount: Decimal,
    pub revenue_post_tax: Decimal,
    pub logistics_cost: Decimal,
    pub logistic_mode: LogisticMode,
    pub tier_info: String,
    /// Index of the accepted DBA tier.
    pub tier_index: Option<usize>,
}

/// Heterogeneous resolver outputs, one variant per marketplace.
#[derive(Clone, Debug, PartialEq)]
pub enum MarketplaceQuote {
    Shopee(ShopeeQuote),
    MercadoLivre(MercadoLivreQuote),
    Amazon(AmazonQuote),
}

impl MarketplaceQuote {
    pub fn marketplace(&self) -> Marketplace {
        match self {
            MarketplaceQuote::Shopee(_) => Marketplace::Shopee,
            MarketplaceQuote::MercadoLivre(_) => Marketplace::MercadoLivre,
            MarketplaceQuote::Amazon(_) => Marketplace::Amazon,
        }
    }
}

/// Common reporting schema, per unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub marketplace: Marketplace,
    pub selling_price: Decimal,
    pub cost_price: Decimal,
    pub variable_rate_percent: Decimal,
    pub commission: Decimal,
    pub fixed_fees: Decimal,
    pub total_fees: Decimal,
    pub logistics_cost: Decimal,
    pub logistics_credit: Decimal,
    pub net_revenue_after_fees: Decimal,
    pub net_profit: Decimal,
    pub realized_margin_percent: Decimal,
    pub fee_breakdown: String,
    pub tier_label: Option<String>,
    pub is_free_shipping_eligible: bool,
}

impl CalculationResult {
    /// What the marketplace actually pays out per unit.
    pub fn net_payout(&self) -> Decimal {
        self.net_revenue_after_fees - self.logistics_cost + self.logistics_credit
    }

    /// Scales the per-unit economics linearly; `None` when a total does not
    /// fit in a `Decimal`.
    pub fn for_quantity(&self, quantity: u32) -> Option<CalculationTotals> {
        let qty = Decimal::from(quantity);
        Some(CalculationTotals {
            quantity,
            sales: self.selling_price.checked_mul(qty)?,
            cost: self.cost_price.checked_mul(qty)?,
            fees: self.total_fees.checked_mul(qty)?,
            logistics: (self.logistics_cost - self.logistics_credit).checked_mul(qty)?,
            payout: self.net_payout().checked_mul(qty)?,
            profit: self.net_profit.checked_mul(qty)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationTotals {
    pub quantity: u32,
    pub sales: Decimal,
    pub cost: Decimal,
    pub fees: Decimal,
    /// Net of any logistics credit.
    pub logistics: Decimal,
    pub payout: Decimal,
    pub profit: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn input_rejects_caller_side_mistakes() {
        assert_eq!(
            CalculationInput::new(dec!(0), dec!(30), 1),
            Err(InputError::NonPositiveCost(dec!(0)))
        );
        assert_eq!(
            CalculationInput::new(dec!(10), dec!(100), 1),
            Err(InputError::MarginOutOfRange(dec!(100)))
        );
        assert_eq!(
            CalculationInput::new(dec!(10), dec!(30), 0),
            Err(InputError::ZeroQuantity)
        );
        assert!(CalculationInput::new(dec!(10), dec!(30), 2).is_ok());
    }

    #[test]
    fn input_serializes_only_validated_fields() {
        let input = CalculationInput::new(dec!(10), dec!(30), 2).unwrap();
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["cost_price"], "10");
        assert_eq!(json["margin_percent"], "30");
        assert_eq!(json["quantity"], 2);
    }

    #[test]
    fn negative_overrides_are_rejected() {
        let request = MarketplaceRequest::MercadoLivre(MercadoLivreOptions {
            shipping_mode: ShippingMode::Flex {
                motoboy_fee: dec!(-2),
            },
            ..Default::default()
        });
        assert_eq!(
            request.validate(),
            Err(InputError::NegativeAmount {
                field: "motoboy fee",
                value: dec!(-2)
            })
        );
        assert_eq!(
            MarketplaceRequest::Shopee(ShopeeOptions::default()).validate(),
            Ok(())
        );
    }

    #[test]
    fn shipping_mode_serializes_with_its_motoboy_fee() {
        let json = serde_json::to_string(&ShippingMode::Flex {
            motoboy_fee: dec!(12.5),
        })
        .unwrap();
        assert_eq!(json, r#"{"mode":"flex","motoboy_fee":"12.5"}"#);
    }
}
