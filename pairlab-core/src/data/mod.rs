//! Price data acquisition: provider trait, Yahoo/CSV/synthetic sources, symbol lists.

pub mod circuit_breaker;
pub mod csv_provider;
pub mod provider;
pub mod symbols;
pub mod synthetic;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use csv_provider::CsvProvider;
pub use provider::{
    DataError, DataProvider, DataSource, DownloadProgress, FetchResult, LogProgress, NoProgress,
};
pub use symbols::{parse_symbols, read_symbols};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
