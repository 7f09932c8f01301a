use super::amazon::compute_amazon_price;
use super::entities::{CalculationInput, MarketplaceQuote, MarketplaceRequest};
use super::fee_table::FeeTables;
use super::mercado_livre::compute_mercado_livre_price;
use super::normalizer::CalculationOutcome;
use super::shopee::compute_shopee_price;
use super::solver::InfeasibleMarginError;

/// Routes a request to its marketplace resolver.
pub fn quote(
    input: &CalculationInput,
    request: &MarketplaceRequest,
    tables: &FeeTables,
) -> Result<MarketplaceQuote, InfeasibleMarginError> {
    let cost = input.cost_price();
    let margin = input.margin_percent();

    match request {
        MarketplaceRequest::Shopee(options) => compute_shopee_price(
            cost,
            margin,
            input.quantity(),
            options.free_shipping,
            &tables.shopee,
        )
        .map(MarketplaceQuote::Shopee),
        MarketplaceRequest::MercadoLivre(options) => compute_mercado_livre_price(
            cost,
            margin,
            options.ad_level,
            options.custom_rate_percent,
            options.shipping_mode,
            &tables.mercado_livre,
        )
        .map(MarketplaceQuote::MercadoLivre),
        MarketplaceRequest::Amazon(options) => compute_amazon_price(
            cost,
            margin,
            options.logistic_mode,
            options.rate_percent,
            options.logistic_fee,
            &tables.amazon,
        )
        .map(MarketplaceQuote::Amazon),
    }
}

/// Quotes and normalizes every request independently; one infeasible
/// marketplace does not affect the others.
pub fn calculate_all(
    input: &CalculationInput,
    requests: &[MarketplaceRequest],
    tables: &FeeTables,
) -> Vec<CalculationOutcome> {
    requests
        .iter()
        .map(|request| {
            CalculationOutcome::from_quote(request.marketplace(), quote(input, request, tables))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        AmazonOptions, LogisticMode, Marketplace, MercadoLivreOptions, ShopeeOptions,
    };
    use rust_decimal_macros::dec;

    #[test]
    fn one_input_yields_one_outcome_per_marketplace() {
        let input = CalculationInput::new(dec!(20), dec!(20), 2).unwrap();
        let requests = [
            MarketplaceRequest::Shopee(ShopeeOptions::default()),
            MarketplaceRequest::MercadoLivre(MercadoLivreOptions::default()),
            MarketplaceRequest::Amazon(AmazonOptions {
                logistic_mode: LogisticMode::Dba,
                ..Default::default()
            }),
        ];
        let outcomes = calculate_all(&input, &requests, &FeeTables::default());
        let marketplaces: Vec<_> = outcomes.iter().map(|o| o.marketplace()).collect();
        assert_eq!(marketplaces, Marketplace::ALL.to_vec());
        assert!(outcomes.iter().all(|o| o.result().is_some()));
    }

    #[test]
    fn infeasible_marketplace_does_not_hide_the_others() {
        // 80% margin: Shopee (20%) fails, Mercado Livre clássico (14%) does not.
        let input = CalculationInput::new(dec!(20), dec!(80), 1).unwrap();
        let requests = [
            MarketplaceRequest::Shopee(ShopeeOptions::default()),
            MarketplaceRequest::MercadoLivre(MercadoLivreOptions::default()),
        ];
        let outcomes = calculate_all(&input, &requests, &FeeTables::default());
        assert!(outcomes[0].result().is_none());
        assert!(outcomes[1].result().is_some());
    }
}
