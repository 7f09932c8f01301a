//! Command line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use crate::domain::{
    AdLevel, AmazonOptions, CalculationInput, InputError, LogisticMode, MarketplaceRequest,
    MercadoLivreOptions, ShippingMode, ShopeeOptions,
};

/// Suggests selling prices that hit a target margin after marketplace fees.
#[derive(Debug, Parser)]
#[command(name = "marketplace-pricer", version, long_about = None)]
pub struct Cli {
    /// Print outcomes as JSON instead of cards
    #[arg(long, global = true)]
    pub json: bool,

    /// Do not save priced outcomes to the history file
    #[arg(long, global = true)]
    pub no_history: bool,

    /// Log resolver decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Owner recorded with each history entry
    #[arg(long, global = true, env = "MARKETPLACE_PRICER_USER", default_value = "local")]
    pub user: String,

    /// Fee settings file; defaults to the platform config directory
    #[arg(long, global = true, env = "MARKETPLACE_PRICER_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a product for Shopee
    Shopee {
        #[command(flatten)]
        product: ProductArgs,
        #[command(flatten)]
        options: ShopeeArgs,
    },
    /// Price a product for Mercado Livre
    MercadoLivre {
        #[command(flatten)]
        product: ProductArgs,
        #[command(flatten)]
        options: MercadoLivreArgs,
    },
    /// Price a product for Amazon
    Amazon {
        #[command(flatten)]
        product: ProductArgs,
        #[command(flatten)]
        options: AmazonArgs,
    },
    /// Price one product on every marketplace
    Compare {
        #[command(flatten)]
        product: ProductArgs,
        #[command(flatten)]
        shopee: ShopeeArgs,
        #[command(flatten)]
        mercado_livre: MercadoLivreArgs,
        #[command(flatten)]
        amazon: AmazonArgs,
    },
    /// Show recent saved calculations
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show the effective fee tables
    Fees {
        /// Write the built-in defaults to the settings file
        #[arg(long)]
        init: bool,
        /// Overwrite an existing settings file
        #[arg(long, requires = "init")]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    /// Unit cost in reais
    #[arg(long)]
    pub cost: Decimal,
    /// Desired margin over the selling price, in percent
    #[arg(long)]
    pub margin: Decimal,
    #[arg(long, default_value_t = 1)]
    pub quantity: u32,
}

impl ProductArgs {
    pub fn to_input(&self) -> Result<CalculationInput, InputError> {
        CalculationInput::new(self.cost, self.margin, self.quantity)
    }
}

#[derive(Debug, Args)]
pub struct ShopeeArgs {
    /// Enrol in the free-shipping programme
    #[arg(long)]
    pub free_shipping: bool,
}

impl ShopeeArgs {
    pub fn to_request(&self) -> MarketplaceRequest {
        MarketplaceRequest::Shopee(ShopeeOptions {
            free_shipping: self.free_shipping,
        })
    }
}

#[derive(Debug, Args)]
pub struct MercadoLivreArgs {
    #[arg(long, value_enum, default_value_t = AdLevelArg::Classico)]
    pub ad_level: AdLevelArg,
    /// Commission percent overriding the ad level
    #[arg(long)]
    pub ml_rate: Option<Decimal>,
    #[arg(long, value_enum, default_value_t = ShippingArg::Padrao)]
    pub shipping: ShippingArg,
    /// Motoboy payment per delivery, required for flex
    #[arg(long)]
    pub motoboy_fee: Option<Decimal>,
}

impl MercadoLivreArgs {
    pub fn to_request(&self) -> Result<MarketplaceRequest, InputError> {
        let shipping_mode = match (self.shipping, self.motoboy_fee) {
            (ShippingArg::Flex, Some(motoboy_fee)) => ShippingMode::Flex { motoboy_fee },
            (ShippingArg::Flex, None) => return Err(InputError::MissingMotoboyFee),
            (_, Some(_)) => return Err(InputError::MotoboyFeeWithoutFlex),
            (ShippingArg::Padrao, None) => ShippingMode::Padrao,
            (ShippingArg::Full, None) => ShippingMode::Full,
        };
        let request = MarketplaceRequest::MercadoLivre(MercadoLivreOptions {
            ad_level: self.ad_level.into(),
            custom_rate_percent: self.ml_rate,
            shipping_mode,
        });
        request.validate()?;
        Ok(request)
    }
}

#[derive(Debug, Args)]
pub struct AmazonArgs {
    #[arg(long, value_enum, default_value_t = LogisticArg::Fbm)]
    pub logistic_mode: LogisticArg,
    /// Referral percent overriding the fee table
    #[arg(long)]
    pub amazon_rate: Option<Decimal>,
    /// Shipping fee for FBM/FBA, or the DBA fee above the last priced tier
    #[arg(long)]
    pub logistic_fee: Option<Decimal>,
}

impl AmazonArgs {
    pub fn to_request(&self) -> Result<MarketplaceRequest, InputError> {
        let request = MarketplaceRequest::Amazon(AmazonOptions {
            logistic_mode: self.logistic_mode.into(),
            rate_percent: self.amazon_rate,
            logistic_fee: self.logistic_fee,
        });
        request.validate()?;
        Ok(request)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AdLevelArg {
    Classico,
    Premium,
}

impl From<AdLevelArg> for AdLevel {
    fn from(arg: AdLevelArg) -> Self {
        match arg {
            AdLevelArg::Classico => AdLevel::Classico,
            AdLevelArg::Premium => AdLevel::Premium,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShippingArg {
    Padrao,
    Full,
    Flex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogisticArg {
    Fbm,
    Fba,
    Dba,
}

impl From<LogisticArg> for LogisticMode {
    fn from(arg: LogisticArg) -> Self {
        match arg {
            LogisticArg::Fbm => LogisticMode::Fbm,
            LogisticArg::Fba => LogisticMode::Fba,
            LogisticArg::Dba => LogisticMode::Dba,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("marketplace-pricer").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_a_flex_request() {
        let cli = parse(&[
            "mercado-livre",
            "--cost",
            "30",
            "--margin",
            "25",
            "--shipping",
            "flex",
            "--motoboy-fee",
            "12.80",
            "--json",
        ]);
        assert!(cli.json);
        let Command::MercadoLivre { product, options } = cli.command else {
            panic!("expected mercado-livre");
        };
        assert_eq!(product.cost, dec!(30));
        assert_eq!(
            options.to_request().unwrap(),
            MarketplaceRequest::MercadoLivre(MercadoLivreOptions {
                ad_level: AdLevel::Classico,
                custom_rate_percent: None,
                shipping_mode: ShippingMode::Flex {
                    motoboy_fee: dec!(12.80)
                },
            })
        );
    }

    #[test]
    fn flex_without_motoboy_fee_is_rejected() {
        let cli = parse(&["mercado-livre", "--cost", "30", "--margin", "25", "--shipping", "flex"]);
        let Command::MercadoLivre { options, .. } = cli.command else {
            panic!("expected mercado-livre");
        };
        assert_eq!(options.to_request(), Err(InputError::MissingMotoboyFee));
    }

    #[test]
    fn motoboy_fee_outside_flex_is_rejected() {
        let cli = parse(&[
            "mercado-livre",
            "--cost",
            "30",
            "--margin",
            "25",
            "--shipping",
            "full",
            "--motoboy-fee",
            "12",
        ]);
        let Command::MercadoLivre { options, .. } = cli.command else {
            panic!("expected mercado-livre");
        };
        assert_eq!(options.to_request(), Err(InputError::MotoboyFeeWithoutFlex));
    }

    #[test]
    fn compare_accepts_every_marketplace_option() {
        let cli = parse(&[
            "compare",
            "--cost",
            "20",
            "--margin",
            "20",
            "--free-shipping",
            "--ad-level",
            "premium",
            "--logistic-mode",
            "dba",
            "--amazon-rate",
            "14",
        ]);
        let Command::Compare {
            shopee,
            mercado_livre,
            amazon,
            ..
        } = cli.command
        else {
            panic!("expected compare");
        };
        assert!(shopee.free_shipping);
        assert_eq!(mercado_livre.ad_level, AdLevelArg::Premium);
        assert_eq!(amazon.logistic_mode, LogisticArg::Dba);
        assert_eq!(cli.user, "local");
    }

    #[test]
    fn negative_amazon_fee_is_rejected() {
        let cli = parse(&["amazon", "--cost", "20", "--margin", "20", "--logistic-fee=-5"]);
        let Command::Amazon { options, .. } = cli.command else {
            panic!("expected amazon");
        };
        assert!(matches!(
            options.to_request(),
            Err(InputError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn force_requires_init() {
        let args = ["marketplace-pricer", "fees", "--force"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
