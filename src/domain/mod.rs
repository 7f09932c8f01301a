//! Pricing domain: fee tables, the reverse-markup solver, one resolver per
//! marketplace and the normalizer that brings their results together.

pub mod amazon;
pub mod calculator;
pub mod entities;
pub mod fee_table;
pub mod mercado_livre;
pub mod normalizer;
pub mod shopee;
pub mod solver;

pub use amazon::{compute_amazon_price, search_tiers, TierSelection};
pub use calculator::{calculate_all, quote};
pub use entities::{
    AdLevel, AmazonOptions, AmazonQuote, CalculationInput, CalculationResult, CalculationTotals,
    InputError, LogisticMode, Marketplace, MarketplaceQuote, MarketplaceRequest,
    MercadoLivreOptions, MercadoLivreQuote, ShippingMode, ShopeeOptions, ShopeeQuote,
};
pub use fee_table::{
    AmazonFees, FeeScheduleError, FeeTables, FlexFees, LogisticsTier, MercadoLivreFees, ModeFees,
    ShopeeFees, TierFee,
};
pub use mercado_livre::compute_mercado_livre_price;
pub use normalizer::{normalize, CalculationOutcome, FailedCalculation};
pub use shopee::compute_shopee_price;
pub use solver::{percent_of, solve, InfeasibleMarginError};
