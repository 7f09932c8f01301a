//! Calculation history, stored as one JSON object per line.

use std::{
    fs::{self, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{CalculationInput, CalculationResult, Marketplace};

const HISTORY_FILENAME: &str = "history.jsonl";

/// A saved calculation, keyed by owner and timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub owner: String,
    /// RFC 3339, UTC.
    pub recorded_at: String,
    pub marketplace: Marketplace,
    pub cost_price: Decimal,
    pub margin_percent: Decimal,
    pub quantity: u32,
    pub free_shipping: bool,
    pub selling_price: Decimal,
    pub commission: Decimal,
    pub profit: Decimal,
}

impl HistoryRecord {
    pub fn new(
        owner: &str,
        input: &CalculationInput,
        result: &CalculationResult,
        now: OffsetDateTime,
    ) -> Result<Self, HistoryError> {
        Ok(Self {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            recorded_at: now.to_offset(time::UtcOffset::UTC).format(&Rfc3339)?,
            marketplace: result.marketplace,
            cost_price: input.cost_price(),
            margin_percent: input.margin_percent(),
            quantity: input.quantity(),
            free_shipping: result.is_free_shipping_eligible,
            selling_price: result.selling_price,
            commission: result.total_fees,
            profit: result.net_profit,
        })
    }

    pub fn recorded_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.recorded_at, &Rfc3339).ok()
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history storage unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Where calculations are saved; the pricing core never calls this.
pub trait HistoryStore {
    fn append(&mut self, record: &HistoryRecord) -> Result<(), HistoryError>;

    /// Most recent records of `owner`, newest first.
    fn recent(&self, owner: &str, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError>;
}

#[derive(Clone, Debug)]
pub struct JsonLinesHistory {
    path: PathBuf,
}

impl JsonLinesHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the history file in the local data directory.
    pub fn open_default() -> Result<Self, HistoryError> {
        default_history_path()
            .map(Self::new)
            .ok_or(HistoryError::StorageUnavailable)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonLinesHistory {
    fn append(&mut self, record: &HistoryRecord) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}")?;
        info!(
            marketplace = %record.marketplace,
            path = %self.path.display(),
            "saved calculation to history"
        );
        Ok(())
    }

    fn recent(&self, owner: &str, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut records = Vec::new();
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryRecord>(&line) {
                Ok(record) if record.owner == owner => records.push(record),
                Ok(_) => {}
                Err(e) => warn!(line = number + 1, "skipping unreadable history entry: {e}"),
            }
        }

        records.reverse();
        records.truncate(limit);
        Ok(records)
    }
}

/// In-memory test double for code that takes a `HistoryStore`.
#[derive(Clone, Debug, Default)]
pub struct MemoryHistory {
    records: Vec<HistoryRecord>,
}

impl HistoryStore for MemoryHistory {
    fn append(&mut self, record: &HistoryRecord) -> Result<(), HistoryError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn recent(&self, owner: &str, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError> {
        Ok(self
            .records
            .iter()
            .rev()
            .filter(|record| record.owner == owner)
            .take(limit)
            .cloned()
            .collect())
    }
}

fn default_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| base.join("marketplace-pricer").join(HISTORY_FILENAME))
}
