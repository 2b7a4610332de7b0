//! Caller-owned analysis session: cached feed plus analyzer and combo builder.

use anyhow::Result;
use tracing::info;

use crate::analyzer::{BettingAnalyzer, MatchAnalysis};
use crate::cache::{Clock, SystemClock, TtlCache};
use crate::combos::ComboBuilder;
use crate::config::AnalyzerConfig;
use crate::odds_feed::OddsEvent;

pub const ALL_MATCHES_KEY: &str = "all_matches";

pub struct AnalysisSession<C: Clock = SystemClock> {
    events: TtlCache<Vec<OddsEvent>, C>,
    analyzer: BettingAnalyzer,
    combos: ComboBuilder,
}

impl AnalysisSession<SystemClock> {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> AnalysisSession<C> {
    pub fn with_clock(config: AnalyzerConfig, clock: C) -> Self {
        Self {
            events: TtlCache::new(config.cache_timeout_secs, clock),
            combos: ComboBuilder::new(&config),
            analyzer: BettingAnalyzer::new(config),
        }
    }

    pub fn analyzer(&self) -> &BettingAnalyzer {
        &self.analyzer
    }

    pub fn combos(&self) -> &ComboBuilder {
        &self.combos
    }

    pub fn config(&self) -> &AnalyzerConfig {
        self.analyzer.config()
    }

    /// Events for `key`, fetched through `fetch` only when the cached copy is
    /// missing or older than the configured timeout.
    pub fn events_with(
        &mut self,
        key: &str,
        fetch: impl FnOnce() -> Result<Vec<OddsEvent>>,
    ) -> Result<&[OddsEvent]> {
        let events = self.events.get_or_try_insert_with(key, fetch)?;
        Ok(events.as_slice())
    }

    /// Analyses for the events under `key`, in feed order. Callers that rank
    /// for display sort a copy; combination building relies on feed order.
    pub fn analyses_with(
        &mut self,
        key: &str,
        fetch: impl FnOnce() -> Result<Vec<OddsEvent>>,
    ) -> Result<Vec<MatchAnalysis>> {
        let events = self.events.get_or_try_insert_with(key, fetch)?;
        let analyses = self.analyzer.analyze_all(events);
        info!("{key}: analyzed {} matches", analyses.len());
        Ok(analyses)
    }

    pub fn invalidate(&mut self, key: &str) {
        self.events.invalidate(key);
    }
}
