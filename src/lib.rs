pub mod analyzer;
pub mod cache;
pub mod combos;
pub mod confidence;
pub mod config;
pub mod demo_feed;
pub mod error;
pub mod format;
pub mod logging;
pub mod odds;
pub mod odds_feed;
pub mod probability;
pub mod scoring;
pub mod session;

pub use analyzer::{AnalysisSummary, BettingAnalyzer, FailureKind, LegacyAnalysis, MatchAnalysis};
pub use combos::{ComboBuilder, ComboKind, ComboLeg, Combination, RiskTier, TierConfig};
pub use config::AnalyzerConfig;
pub use error::AnalysisError;
pub use odds::{OddsSet, Outcome};
pub use probability::ProbabilitySet;
