//! Error type for the analysis and combination layers.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no usable odds for {match_label}")]
    NoOddsAvailable { match_label: String },

    #[error("invalid odds: implied probability total is zero")]
    InvalidOdds,

    #[error("not enough qualifying bets: need {required}, got {available}")]
    InsufficientBets { required: usize, available: usize },

    #[error("not enough matches: need {required}, got {available}")]
    InsufficientMatches { required: usize, available: usize },

    #[error("unknown risk tier: {0} (expected SAFE, MOYEN or HIGH_RISK)")]
    UnknownTier(String),

    #[error("no odds fragment in recommendation: {0}")]
    MalformedRecommendation(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
