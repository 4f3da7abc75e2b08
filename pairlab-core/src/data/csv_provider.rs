//! Offline provider over a directory of `<SYMBOL>.csv` files.
//!
//! Each file needs a `date` column (`YYYY-MM-DD`) and an `adj_close` column.
//! `Date` and `Adj Close` are accepted too, so Yahoo CSV exports load
//! unchanged. Extra columns are ignored.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{PricePoint, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Adj Close")]
    adj_close: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    /// Read every row of one file; rows without a price are dropped.
    pub fn read_file(path: &Path) -> Result<Vec<PricePoint>, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        let mut points = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            if let Some(price) = row.adj_close {
                points.push(PricePoint::new(row.date, price));
            }
        }
        Ok(points)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let mut points = Self::read_file(&path)?;
        points.retain(|p| p.date >= start && p.date <= end);

        Ok(FetchResult {
            series: PriceSeries::new(symbol, points),
            source: DataSource::CsvImport,
        })
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }
}
