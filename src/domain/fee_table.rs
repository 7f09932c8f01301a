//! Static fee schedules for every supported marketplace.
//!
//! The defaults mirror the published seller fees; a settings file may override
//! any of them (see `util::persistence`), so every table is serde-friendly and
//! validated before use.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All fee schedules used by one pricing session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeTables {
    #[serde(default)]
    pub shopee: ShopeeFees,
    #[serde(default)]
    pub mercado_livre: MercadoLivreFees,
    #[serde(default)]
    pub amazon: AmazonFees,
}

impl FeeTables {
    pub fn validate(&self) -> Result<(), FeeScheduleError> {
        self.shopee.validate()?;
        self.mercado_livre.validate()?;
        self.amazon.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShopeeFees {
    pub commission_percent: Decimal,
    pub transaction_percent: Decimal,
    /// Extra service rate charged to sellers in the free-shipping programme.
    pub free_shipping_extra_percent: Decimal,
    /// Flat fee charged on every item sold.
    pub fixed_fee: Decimal,
}

impl Default for ShopeeFees {
    fn default() -> Self {
        Self {
            commission_percent: dec!(18),
            transaction_percent: dec!(2),
            free_shipping_extra_percent: dec!(4),
            fixed_fee: dec!(4.00),
        }
    }
}

impl ShopeeFees {
    fn validate(&self) -> Result<(), FeeScheduleError> {
        non_negative("shopee.commission_percent", self.commission_percent)?;
        non_negative("shopee.transaction_percent", self.transaction_percent)?;
        non_negative(
            "shopee.free_shipping_extra_percent",
            self.free_shipping_extra_percent,
        )?;
        non_negative("shopee.fixed_fee", self.fixed_fee)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MercadoLivreFees {
    pub classico_percent: Decimal,
    pub premium_percent: Decimal,
    /// Prices at or above this value must ship for free.
    pub free_shipping_threshold: Decimal,
    pub padrao: ModeFees,
    pub full: ModeFees,
    pub flex: FlexFees,
}

/// Fixed costs of a shipping mode, split by free-shipping status.
///
/// Below the threshold the seller pays `paid_fixed_fee` as a sale fee; above
/// it the fee disappears and the seller pays `free_shipping_cost` in shipping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModeFees {
    pub paid_fixed_fee: Decimal,
    pub free_shipping_cost: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlexFees {
    /// What Mercado Livre pays back to the seller per flex delivery.
    pub reimbursement: Decimal,
    /// Sale fee charged only when shipping is not free.
    pub paid_fixed_fee: Decimal,
}

impl Default for MercadoLivreFees {
    fn default() -> Self {
        Self {
            classico_percent: dec!(14),
            premium_percent: dec!(19),
            free_shipping_threshold: dec!(79),
            padrao: ModeFees {
                paid_fixed_fee: dec!(6.00),
                free_shipping_cost: dec!(22.45),
            },
            full: ModeFees {
                paid_fixed_fee: dec!(6.25),
                free_shipping_cost: dec!(22.45),
            },
            flex: FlexFees {
                reimbursement: dec!(8.90),
                paid_fixed_fee: dec!(6.75),
            },
        }
    }
}

impl MercadoLivreFees {
    fn validate(&self) -> Result<(), FeeScheduleError> {
        non_negative("mercado_livre.classico_percent", self.classico_percent)?;
        non_negative("mercado_livre.premium_percent", self.premium_percent)?;
        if self.free_shipping_threshold <= Decimal::ZERO {
            return Err(FeeScheduleError::Negative {
                field: "mercado_livre.free_shipping_threshold",
                value: self.free_shipping_threshold,
            });
        }
        for (field, value) in [
            ("mercado_livre.padrao.paid_fixed_fee", self.padrao.paid_fixed_fee),
            ("mercado_livre.padrao.free_shipping_cost", self.padrao.free_shipping_cost),
            ("mercado_livre.full.paid_fixed_fee", self.full.paid_fixed_fee),
            ("mercado_livre.full.free_shipping_cost", self.full.free_shipping_cost),
            ("mercado_livre.flex.reimbursement", self.flex.reimbursement),
            ("mercado_livre.flex.paid_fixed_fee", self.flex.paid_fixed_fee),
        ] {
            non_negative(field, value)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmazonFees {
    pub referral_percent: Decimal,
    /// Delivery by Amazon tiers, evaluated low to high.
    pub dba_tiers: Vec<LogisticsTier>,
}

/// One price bucket of a tiered logistics schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogisticsTier {
    pub label: String,
    pub fee: TierFee,
    /// Inclusive upper bound of the selling price; `None` marks the catch-all.
    pub upper_bound: Option<Decimal>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierFee {
    Fixed(Decimal),
    /// The fee comes from the request (weight-based shipping).
    CallerSupplied,
}

impl Default for AmazonFees {
    fn default() -> Self {
        Self {
            referral_percent: dec!(14),
            dba_tiers: vec![
                LogisticsTier {
                    label: "Faixa 1 (até R$ 30,00)".to_string(),
                    fee: TierFee::Fixed(dec!(4.50)),
                    upper_bound: Some(dec!(30.00)),
                },
                LogisticsTier {
                    label: "Faixa 2 (R$ 30,01 a R$ 49,99)".to_string(),
                    fee: TierFee::Fixed(dec!(6.50)),
                    upper_bound: Some(dec!(49.99)),
                },
                LogisticsTier {
                    label: "Faixa 3 (R$ 50,00 a R$ 78,99)".to_string(),
                    fee: TierFee::Fixed(dec!(6.75)),
                    upper_bound: Some(dec!(78.99)),
                },
                LogisticsTier {
                    label: "Faixa 4 (acima de R$ 79,00, por peso)".to_string(),
                    fee: TierFee::CallerSupplied,
                    upper_bound: None,
                },
            ],
        }
    }
}

impl AmazonFees {
    /// Checks the tier invariants: bounds and fixed fees strictly increase,
    /// only the last tier is unbounded, and it takes the caller's fee.
    pub fn validate(&self) -> Result<(), FeeScheduleError> {
        non_negative("amazon.referral_percent", self.referral_percent)?;

        let Some((last, bounded)) = self.dba_tiers.split_last() else {
            return Err(FeeScheduleError::EmptyTiers);
        };
        if last.upper_bound.is_some() || last.fee != TierFee::CallerSupplied {
            return Err(FeeScheduleError::MissingCatchAll);
        }

        let mut previous: Option<(Decimal, Decimal)> = None;
        for (index, tier) in bounded.iter().enumerate() {
            let (TierFee::Fixed(fee), Some(bound)) = (tier.fee, tier.upper_bound) else {
                return Err(FeeScheduleError::UnboundedTier { index });
            };
            non_negative("amazon.dba_tiers.fee", fee)?;
            if let Some((prev_fee, prev_bound)) = previous {
                if bound <= prev_bound || fee <= prev_fee {
                    return Err(FeeScheduleError::NotIncreasing { index });
                }
            }
            previous = Some((fee, bound));
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FeeScheduleError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: Decimal },
    #[error("tier schedule has no tiers")]
    EmptyTiers,
    #[error("last tier must be an unbounded catch-all with a caller-supplied fee")]
    MissingCatchAll,
    #[error("tier {index} needs both a fixed fee and an upper bound")]
    UnboundedTier { index: usize },
    #[error("tier {index} does not increase over the previous tier")]
    NotIncreasing { index: usize },
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), FeeScheduleError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(FeeScheduleError::Negative { field, value });
    }
    Ok(())
}
