use std::path::Path;

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::{
    domain::{calculate_all, CalculationInput, CalculationOutcome, FeeTables, MarketplaceRequest},
    infra::{
        cache::ExpiringCache,
        history::{HistoryError, HistoryRecord, HistoryStore},
    },
    util::persistence::{load_fee_tables, SettingsError},
};

/// One run of the calculator: resolves fee tables through the shared cache
/// and prices requests against them.
pub struct PricingSession<'a> {
    fee_cache: &'a mut ExpiringCache<FeeTables>,
    settings_path: Option<&'a Path>,
}

impl<'a> PricingSession<'a> {
    pub fn new(fee_cache: &'a mut ExpiringCache<FeeTables>, settings_path: Option<&'a Path>) -> Self {
        Self {
            fee_cache,
            settings_path,
        }
    }

    pub fn fee_tables(&mut self, now: OffsetDateTime) -> Result<&FeeTables, SettingsError> {
        let path = self.settings_path;
        self.fee_cache
            .get_or_try_refresh(now, || load_fee_tables(path))
    }

    /// When the cached fee tables go stale; `None` before the first load.
    pub fn fee_tables_expire_at(&self) -> Option<OffsetDateTime> {
        self.fee_cache.expires_at()
    }

    pub fn calculate(
        &mut self,
        input: &CalculationInput,
        requests: &[MarketplaceRequest],
    ) -> Result<Vec<CalculationOutcome>, SettingsError> {
        let now = OffsetDateTime::now_utc();
        let tables = self.fee_tables(now)?;
        let outcomes = calculate_all(input, requests, tables);
        debug!(
            requested = requests.len(),
            priced = outcomes.iter().filter(|o| o.result().is_some()).count(),
            "calculation finished"
        );
        Ok(outcomes)
    }
}

/// Saves every priced outcome; infeasible ones are not history.
pub fn record_outcomes(
    history: &mut dyn HistoryStore,
    owner: &str,
    input: &CalculationInput,
    outcomes: &[CalculationOutcome],
    now: OffsetDateTime,
) -> Result<usize, HistoryError> {
    let mut saved = 0;
    for result in outcomes.iter().filter_map(CalculationOutcome::result) {
        let record = HistoryRecord::new(owner, input, result, now)?;
        if let Err(err) = history.append(&record) {
            warn!(marketplace = %result.marketplace, "could not save calculation: {err}");
            return Err(err);
        }
        saved += 1;
    }
    Ok(saved)
}
