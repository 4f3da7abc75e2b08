//! Screening pipeline: enumerate → cointegrate → Hurst → half-life → crossings.
//!
//! Each stage consumes the survivors of the previous one. Within a stage the
//! pairs are independent, so with `run.parallel` they are screened on rayon
//! with an order-preserving collect; the surviving list is identical to a
//! sequential run. A per-pair failure drops that pair only.

use crate::config::{PipelineConfig, RunSettings};
use crate::error::RunError;
use pairlab_core::domain::{enumerate_pairs, Pair, PriceStore, ScreenResult};
use pairlab_core::screen::{ScreenError, SpreadScreen, Stage};
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Input and output sizes of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTally {
    pub stage: Stage,
    pub input: usize,
    pub kept: usize,
    /// Pairs dropped because the statistic could not be computed.
    pub errors: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    pub symbols: usize,
    pub pairs: usize,
    pub stages: Vec<StageTally>,
}

impl StageCounts {
    pub fn kept(&self, stage: Stage) -> Option<usize> {
        self.stages.iter().find(|t| t.stage == stage).map(|t| t.kept)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Survivors of every screen, in pair enumeration order.
    pub survivors: Vec<ScreenResult>,
    pub counts: StageCounts,
}

fn stage_message(stage: Stage) -> &'static str {
    match stage {
        Stage::Cointegration => "cointegrated pairs",
        Stage::Hurst => "mean-reverting pairs (Hurst)",
        Stage::HalfLife => "pairs with tradeable half-life",
        Stage::Crossing => "pairs crossing the mean often enough",
    }
}

/// Map `f` over `items`, in parallel when enabled, keeping input order.
fn screen_all<T, R, F>(items: Vec<T>, run: &RunSettings, pool: Option<&ThreadPool>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    if !run.parallel {
        return items.into_iter().map(f).collect();
    }
    match pool {
        Some(pool) => pool.install(|| items.into_par_iter().map(&f).collect()),
        None => items.into_par_iter().map(&f).collect(),
    }
}

/// Fold one stage's verdicts into survivors and a tally, logging rejections.
fn tally(
    stage: Stage,
    verdicts: Vec<(Pair, Result<Option<ScreenResult>, ScreenError>)>,
) -> (Vec<ScreenResult>, StageTally) {
    let input = verdicts.len();
    let mut errors = 0;
    let mut kept = Vec::new();
    for (pair, verdict) in verdicts {
        match verdict {
            Ok(Some(result)) => kept.push(result),
            Ok(None) => debug!(pair = %pair, stage = %stage, "screened out"),
            Err(e) => {
                errors += 1;
                debug!(pair = %pair, stage = %stage, error = %e, "dropped");
            }
        }
    }

    info!(
        stage = %stage,
        input,
        kept = kept.len(),
        errors,
        "Found {} {}",
        kept.len(),
        stage_message(stage)
    );

    let tally = StageTally {
        stage,
        input,
        kept: kept.len(),
        errors,
    };
    (kept, tally)
}

/// Run every screen over all pairs of the admitted universe.
pub fn run_pipeline(store: &PriceStore, config: &PipelineConfig) -> Result<PipelineOutcome, RunError> {
    let pool = if config.run.parallel && config.run.threads > 0 {
        Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(config.run.threads)
                .build()
                .map_err(|e| RunError::ThreadPool(e.to_string()))?,
        )
    } else {
        None
    };

    let symbols = store.symbols();
    let pairs = enumerate_pairs(&symbols);
    info!(symbols = symbols.len(), pairs = pairs.len(), "enumerated candidate pairs");

    let mut counts = StageCounts {
        symbols: symbols.len(),
        pairs: pairs.len(),
        stages: Vec::with_capacity(4),
    };

    let coint = config.cointegration;
    let verdicts = screen_all(pairs, &config.run, pool.as_ref(), |pair| {
        let verdict = match (store.get(&pair.symbol_a), store.get(&pair.symbol_b)) {
            (Some(a), Some(b)) => coint.screen(&pair, a, b),
            _ => Ok(None),
        };
        (pair, verdict)
    });
    let (mut survivors, stage_tally) = tally(Stage::Cointegration, verdicts);
    counts.stages.push(stage_tally);

    let spread_screens: [&dyn SpreadScreen; 3] =
        [&config.hurst, &config.half_life, &config.crossing];

    for screen in spread_screens {
        let verdicts = screen_all(survivors, &config.run, pool.as_ref(), |mut result| {
            let pair = result.pair.clone();
            let verdict = screen
                .evaluate(&mut result)
                .map(|keep| keep.then_some(result));
            (pair, verdict)
        });
        let (kept, stage_tally) = tally(screen.stage(), verdicts);
        counts.stages.push(stage_tally);
        survivors = kept;
    }

    Ok(PipelineOutcome { survivors, counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pairlab_core::data::{DataProvider, SyntheticProvider};

    fn store(symbols: &[&str]) -> PriceStore {
        let provider = SyntheticProvider::default();
        let from = NaiveDate::from_ymd_opt(2022, 7, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
        symbols
            .iter()
            .map(|s| provider.fetch(s, from, to).unwrap().series)
            .collect()
    }

    fn sequential() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.run.parallel = false;
        config
    }

    #[test]
    fn group_members_survive_and_tallies_chain() {
        let store = store(&["OIL_XOM", "OIL_CVX", "SPY", "QQQ"]);
        let outcome = run_pipeline(&store, &sequential()).unwrap();

        assert_eq!(outcome.counts.symbols, 4);
        assert_eq!(outcome.counts.pairs, 6);
        assert_eq!(outcome.counts.stages.len(), 4);

        // Each stage's input is the previous stage's output.
        let mut expected_input = outcome.counts.pairs;
        for tally in &outcome.counts.stages {
            assert_eq!(tally.input, expected_input);
            assert!(tally.kept + tally.errors <= tally.input);
            expected_input = tally.kept;
        }
        assert_eq!(outcome.counts.kept(Stage::Crossing), Some(outcome.survivors.len()));

        let names: Vec<String> = outcome.survivors.iter().map(|r| r.pair.to_string()).collect();
        assert!(names.contains(&"OIL_XOM,OIL_CVX".to_string()), "survivors: {names:?}");
    }

    #[test]
    fn survivors_carry_all_statistics() {
        let store = store(&["GAS_A", "GAS_B"]);
        let outcome = run_pipeline(&store, &sequential()).unwrap();
        let result = outcome.survivors.first().expect("group pair should survive");
        assert!(result.stats.p_value < 0.05);
        assert!(result.stats.hurst.is_some());
        assert!(result.stats.half_life.is_some());
        assert!(result.stats.crossings.is_some());
    }

    #[test]
    fn single_symbol_has_no_pairs() {
        let outcome = run_pipeline(&store(&["SPY"]), &sequential()).unwrap();
        assert_eq!(outcome.counts.pairs, 0);
        assert!(outcome.survivors.is_empty());
        assert!(outcome.counts.stages.iter().all(|t| t.input == 0));
    }

    #[test]
    fn parallel_matches_sequential() {
        let store = store(&["M_1", "M_2", "M_3", "N_1", "N_2", "X", "Y"]);
        let seq = run_pipeline(&store, &sequential()).unwrap();

        let mut parallel = PipelineConfig::default();
        parallel.run.threads = 3;
        let par = run_pipeline(&store, &parallel).unwrap();

        let names = |o: &PipelineOutcome| -> Vec<String> {
            o.survivors.iter().map(|r| r.pair.to_string()).collect()
        };
        assert_eq!(names(&seq), names(&par));
        assert_eq!(seq.counts, par.counts);
    }
}
