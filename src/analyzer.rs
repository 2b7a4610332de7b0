//! Match analysis pipeline.
//!
//! `odds_feed::OddsEvent` → best odds → de-vigged probabilities → best bet →
//! confidence and risk → `MatchAnalysis`. Failures never escape: a match with
//! no usable odds becomes a degraded record with confidence 0.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::confidence::{RiskLevel, compute_confidence, risk_from_odds};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::odds::{OddsSet, Outcome, extract_best_odds};
use crate::odds_feed::OddsEvent;
use crate::probability::{ProbabilitySet, devig};
use crate::scoring::{best_bet, is_value_bet};

const NO_ODDS_TEXT: &str = "Aucune cote disponible";
const INVALID_ODDS_TEXT: &str = "Cotes invalides";
const ODDS_MARKER: &str = "(cote: ";
const LEGACY_DEFAULT_ODDS: f64 = 2.0;
const MIN_DECIMAL_ODDS: f64 = 1.0;

const HIGH_CONFIDENCE: u8 = 70;
const MEDIUM_CONFIDENCE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    NoOddsAvailable,
    InvalidOdds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAnalysis {
    pub match_label: String,
    pub recommendation: String,
    /// `None` on degraded records and on rehydrated legacy records.
    pub outcome: Option<Outcome>,
    pub recommended_odds: f64,
    pub confidence: u8,
    pub is_value_bet: bool,
    pub risk_level: RiskLevel,
    pub match_time: String,
    pub odds: Option<OddsSet>,
    pub probabilities: Option<ProbabilitySet>,
    pub failure: Option<FailureKind>,
}

impl MatchAnalysis {
    fn degraded(event: &OddsEvent, failure: FailureKind) -> Self {
        let recommendation = match failure {
            FailureKind::NoOddsAvailable => NO_ODDS_TEXT,
            FailureKind::InvalidOdds => INVALID_ODDS_TEXT,
        };
        Self {
            match_label: event.match_label(),
            recommendation: recommendation.to_string(),
            outcome: None,
            recommended_odds: 0.0,
            confidence: 0,
            is_value_bet: false,
            risk_level: RiskLevel::Unknown,
            match_time: event.commence_time.clone(),
            odds: None,
            probabilities: None,
            failure: Some(failure),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

pub fn recommendation_text(label: &str, odds: f64) -> String {
    format!("{label} {ODDS_MARKER}{odds:.2})")
}

#[derive(Debug, Clone, Default)]
pub struct BettingAnalyzer {
    config: AnalyzerConfig,
}

impl BettingAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, event: &OddsEvent) -> MatchAnalysis {
        match self.try_analyze(event) {
            Ok(analysis) => analysis,
            Err(err) => {
                warn!("{}: {}", event.match_label(), err);
                let failure = match err {
                    AnalysisError::InvalidOdds => FailureKind::InvalidOdds,
                    _ => FailureKind::NoOddsAvailable,
                };
                MatchAnalysis::degraded(event, failure)
            }
        }
    }

    pub fn analyze_all(&self, events: &[OddsEvent]) -> Vec<MatchAnalysis> {
        events.iter().map(|event| self.analyze(event)).collect()
    }

    fn try_analyze(&self, event: &OddsEvent) -> Result<MatchAnalysis, AnalysisError> {
        let odds = extract_best_odds(event)?;
        let probs = devig(&odds)?;

        let bet = best_bet(&odds, &probs, &event.home_team, &event.away_team);
        let value = is_value_bet(&odds, &probs, &self.config);
        let confidence = compute_confidence(&bet, value);

        debug!(
            "{}: pick={:?} odds={:.2} p={:.3} value_score={:.3} conf={}",
            event.match_label(),
            bet.outcome,
            bet.odds,
            bet.probability,
            bet.value_score,
            confidence
        );

        Ok(MatchAnalysis {
            match_label: event.match_label(),
            recommendation: recommendation_text(&bet.label, bet.odds),
            outcome: Some(bet.outcome),
            recommended_odds: bet.odds,
            confidence,
            is_value_bet: value,
            risk_level: risk_from_odds(bet.odds),
            match_time: event.commence_time.clone(),
            odds: Some(odds),
            probabilities: Some(probs),
            failure: None,
        })
    }
}

/// Descending by confidence; equal confidences keep their input order.
pub fn sort_by_confidence(analyses: &mut [MatchAnalysis]) {
    analyses.sort_by_key(|a| Reverse(a.confidence));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AnalysisSummary {
    pub total: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
    pub value_bets: usize,
}

impl AnalysisSummary {
    /// Degraded records are not counted.
    pub fn from_analyses(analyses: &[MatchAnalysis]) -> Self {
        let mut out = Self::default();
        for a in analyses.iter().filter(|a| !a.is_degraded()) {
            out.total += 1;
            if a.confidence >= HIGH_CONFIDENCE {
                out.high_confidence += 1;
            } else if a.confidence >= MEDIUM_CONFIDENCE {
                out.medium_confidence += 1;
            } else {
                out.low_confidence += 1;
            }
            if a.is_value_bet {
                out.value_bets += 1;
            }
        }
        out
    }
}

/// Analysis record persisted by earlier versions, where the chosen odds only
/// survive inside the recommendation text.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyAnalysis {
    #[serde(rename = "match")]
    pub match_label: String,
    pub recommendation: String,
    pub confidence: u8,
    #[serde(default)]
    pub value_bet: bool,
    #[serde(default)]
    pub match_time: String,
}

impl From<LegacyAnalysis> for MatchAnalysis {
    fn from(legacy: LegacyAnalysis) -> Self {
        let failure = match legacy.recommendation.trim() {
            NO_ODDS_TEXT => Some(FailureKind::NoOddsAvailable),
            INVALID_ODDS_TEXT => Some(FailureKind::InvalidOdds),
            _ => None,
        };
        if failure.is_some() {
            return MatchAnalysis {
                match_label: legacy.match_label,
                recommendation: legacy.recommendation,
                outcome: None,
                recommended_odds: 0.0,
                confidence: 0,
                is_value_bet: false,
                risk_level: RiskLevel::Unknown,
                match_time: legacy.match_time,
                odds: None,
                probabilities: None,
                failure,
            };
        }

        let recommended_odds = odds_from_recommendation(&legacy.recommendation)
            .unwrap_or_else(|err| {
                warn!("{}: {err}; assuming {LEGACY_DEFAULT_ODDS}", legacy.match_label);
                LEGACY_DEFAULT_ODDS
            });
        MatchAnalysis {
            match_label: legacy.match_label,
            recommendation: legacy.recommendation,
            outcome: None,
            recommended_odds,
            confidence: legacy.confidence.min(100),
            is_value_bet: legacy.value_bet,
            risk_level: risk_from_odds(recommended_odds),
            match_time: legacy.match_time,
            odds: None,
            probabilities: None,
            failure: None,
        }
    }
}

/// Reads the `(cote: X)` fragment of a recommendation string. Decimal prices
/// below 1.0 are rejected.
pub fn odds_from_recommendation(text: &str) -> Result<f64, AnalysisError> {
    let malformed = || AnalysisError::MalformedRecommendation(text.to_string());
    let (_, rest) = text.split_once(ODDS_MARKER).ok_or_else(malformed)?;
    let (raw, _) = rest.split_once(')').ok_or_else(malformed)?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|odds| odds.is_finite() && *odds >= MIN_DECIMAL_ODDS)
        .ok_or_else(malformed)
}
