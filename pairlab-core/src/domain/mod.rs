//! Domain types for pair discovery.

pub mod pair;
pub mod series;
pub mod spread;
pub mod store;

pub use pair::{enumerate_pairs, Pair};
pub use series::{align, AlignedSeriesPair, PricePoint, PriceSeries};
pub use spread::{PairStats, ScreenResult, Spread};
pub use store::PriceStore;

/// Symbol type alias
pub type Symbol = String;
