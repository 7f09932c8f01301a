use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{info, warn};

use marketplace_pricer::{
    app::{record_outcomes, PricingSession},
    cli::{Cli, Command, ProductArgs},
    domain::{CalculationInput, CalculationOutcome, MarketplaceRequest},
    infra::{
        cache::{ExpiringCache, FEE_TABLES_TTL},
        history::{HistoryStore, JsonLinesHistory},
    },
    ui::{render_history, render_outcome},
    util::{
        logging,
        persistence::{init_settings, settings_file},
        version::version_label,
    },
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    info!("{}", version_label());

    let settings_path = cli.settings.clone().or_else(settings_file);
    let mut fee_cache = ExpiringCache::new("fee-tables", FEE_TABLES_TTL);
    let mut session = PricingSession::new(&mut fee_cache, settings_path.as_deref());

    let (product, requests) = match &cli.command {
        Command::Shopee { product, options } => (product, vec![options.to_request()]),
        Command::MercadoLivre { product, options } => (product, vec![options.to_request()?]),
        Command::Amazon { product, options } => (product, vec![options.to_request()?]),
        Command::Compare {
            product,
            shopee,
            mercado_livre,
            amazon,
        } => (
            product,
            vec![
                shopee.to_request(),
                mercado_livre.to_request()?,
                amazon.to_request()?,
            ],
        ),
        Command::History { limit } => return show_history(&cli.user, *limit, cli.json),
        Command::Fees { init, force } => {
            return show_fees(&mut session, settings_path.as_deref(), *init, *force)
        }
    };

    price(&cli, &mut session, product, &requests)
}

fn price(
    cli: &Cli,
    session: &mut PricingSession<'_>,
    product: &ProductArgs,
    requests: &[MarketplaceRequest],
) -> Result<()> {
    let input = product.to_input()?;
    let outcomes = session
        .calculate(&input, requests)
        .context("failed to load fee tables")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            println!("{}", render_outcome(outcome, input.quantity()));
        }
    }

    if !cli.no_history {
        save_history(&cli.user, &input, &outcomes);
    }
    Ok(())
}

// History is best effort; a read-only home must not break pricing.
fn save_history(owner: &str, input: &CalculationInput, outcomes: &[CalculationOutcome]) {
    let mut history = match JsonLinesHistory::open_default() {
        Ok(history) => history,
        Err(err) => {
            warn!("calculation not saved: {err}");
            return;
        }
    };
    match record_outcomes(&mut history, owner, input, outcomes, OffsetDateTime::now_utc()) {
        Ok(saved) => info!(saved, path = %history.path().display(), "history updated"),
        Err(err) => warn!("calculation not saved: {err}"),
    }
}

fn show_history(owner: &str, limit: usize, json: bool) -> Result<()> {
    let history = JsonLinesHistory::open_default()?;
    let records = history.recent(owner, limit)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", render_history(&records));
    }
    Ok(())
}

fn show_fees(
    session: &mut PricingSession<'_>,
    path: Option<&Path>,
    init: bool,
    force: bool,
) -> Result<()> {
    if init {
        let written = init_settings(path, force)?;
        eprintln!("Tabelas padrão gravadas em {}", written.display());
    }

    let tables = session.fee_tables(OffsetDateTime::now_utc())?;
    println!("{}", serde_json::to_string_pretty(tables)?);
    if let Some(expires_at) = session.fee_tables_expire_at() {
        eprintln!("Tabelas em cache até {}", expires_at.format(&Rfc3339)?);
    }
    Ok(())
}
