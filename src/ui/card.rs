//! Plain-text "marketplace card" for one calculation outcome.

use std::fmt::Write;

use rust_decimal::Decimal;

use crate::domain::{CalculationOutcome, CalculationResult};

const WIDTH: usize = 44;

pub fn render_outcome(outcome: &CalculationOutcome, quantity: u32) -> String {
    match outcome {
        CalculationOutcome::Priced(result) => render_result(result, quantity),
        CalculationOutcome::Failed(failed) => {
            let mut out = header(failed.marketplace.name());
            let _ = writeln!(out, "  ERRO: {}", failed.message);
            out
        }
    }
}

pub fn render_result(result: &CalculationResult, quantity: u32) -> String {
    let mut out = header(result.marketplace.name());

    row(&mut out, "Preço sugerido", &format_brl(result.selling_price));
    row(&mut out, "Custo do produto", &format_brl(result.cost_price));
    row(
        &mut out,
        &format!("Comissão ({:.1}%)", result.variable_rate_percent),
        &format_brl(result.commission),
    );
    if !result.fixed_fees.is_zero() {
        row(&mut out, "Taxa fixa", &format_brl(result.fixed_fees));
    }
    let _ = writeln!(out, "    {}", result.fee_breakdown);
    row(&mut out, "Receita pós-taxas", &format_brl(result.net_revenue_after_fees));
    row(&mut out, "Envio", &format_brl(result.logistics_cost));
    if !result.logistics_credit.is_zero() {
        row(&mut out, "Reembolso de envio", &format_brl(result.logistics_credit));
    }
    row(&mut out, "Repasse líquido", &format_brl(result.net_payout()));
    row(&mut out, "Lucro líquido", &format_brl(result.net_profit));
    row(
        &mut out,
        "Margem real",
        &format!("{:.1}%", result.realized_margin_percent),
    );

    let badges = badges(result);
    if !badges.is_empty() {
        let _ = writeln!(out, "  [{}]", badges.join("] ["));
    }

    if quantity > 1 {
        let _ = writeln!(out, "  Total para {quantity} unidades");
        match result.for_quantity(quantity) {
            Some(totals) => {
                row(&mut out, "  Vendas", &format_brl(totals.sales));
                row(&mut out, "  Custos", &format_brl(totals.cost));
                row(&mut out, "  Taxas", &format_brl(totals.fees));
                row(&mut out, "  Envio", &format_brl(totals.logistics));
                row(&mut out, "  Lucro", &format_brl(totals.profit));
            }
            None => {
                let _ = writeln!(out, "    valores grandes demais para calcular");
            }
        }
    }
    out
}

fn badges(result: &CalculationResult) -> Vec<String> {
    let mut badges = Vec::new();
    if result.is_free_shipping_eligible {
        badges.push("Frete Grátis".to_string());
    }
    if let Some(label) = &result.tier_label {
        badges.push(label.clone());
    }
    badges
}

fn header(title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "── {title} {}", "─".repeat(WIDTH.saturating_sub(title.chars().count() + 4)));
    out
}

fn row(out: &mut String, label: &str, value: &str) {
    let pad = WIDTH.saturating_sub(label.chars().count() + value.chars().count() + 2);
    let _ = writeln!(out, "  {label}{}{value}", " ".repeat(pad));
}

/// Formats an amount as Brazilian reais, e.g. `R$ 1.234,50`.
pub fn format_brl(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2).abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount.round_dp(2).is_sign_negative() && !amount.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}R$ {grouped},{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        normalize, solve, CalculationOutcome, FailedCalculation, Marketplace, MarketplaceQuote,
        ShopeeFees,
    };
    use crate::domain::shopee::compute_shopee_price;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_reais() {
        assert_eq!(format_brl(dec!(108)), "R$ 108,00");
        assert_eq!(format_brl(dec!(1234.5)), "R$ 1.234,50");
        assert_eq!(format_brl(dec!(117.391304)), "R$ 117,39");
        assert_eq!(format_brl(dec!(-3.9)), "-R$ 3,90");
        assert_eq!(format_brl(dec!(1000000)), "R$ 1.000.000,00");
    }

    #[test]
    fn card_shows_price_breakdown_and_totals() {
        let quote =
            compute_shopee_price(dec!(50), dec!(30), 2, true, &ShopeeFees::default()).unwrap();
        let result = normalize(&MarketplaceQuote::Shopee(quote));
        let card = render_result(&result, 2);
        assert!(card.contains("Shopee"));
        assert!(card.contains("R$ 117,39"));
        assert!(card.contains("18% Comissão + 2% Transação + 4% Frete Grátis"));
        assert!(card.contains("[Frete Grátis]"));
        assert!(card.contains("Total para 2 unidades"));
    }

    #[test]
    fn error_card_shows_the_message() {
        let err = solve(dec!(10), dec!(85), dec!(20), dec!(4)).unwrap_err();
        let outcome = CalculationOutcome::Failed(FailedCalculation {
            marketplace: Marketplace::Shopee,
            error: true,
            message: err.to_string(),
        });
        let card = render_outcome(&outcome, 1);
        assert!(card.contains("ERRO"));
        assert!(card.contains("Reduce the desired margin"));
    }
}
