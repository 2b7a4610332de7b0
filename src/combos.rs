//! Combination (multi-leg bet) selection and assembly.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analyzer::MatchAnalysis;
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};

/// Tiered combinations need at least this many usable analyses.
pub const MIN_TIER_MATCHES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Safe,
    Moyen,
    HighRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Confidence,
    Odds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierConfig {
    pub min_confidence: u8,
    pub combo_size: usize,
    pub sort_by: SortKey,
    pub descending: bool,
    /// Ceiling applied by `ComboBuilder::tier_candidates`.
    pub max_odds: f64,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Safe, RiskTier::Moyen, RiskTier::HighRisk];

    pub fn config(self) -> TierConfig {
        match self {
            RiskTier::Safe => TierConfig {
                min_confidence: 75,
                combo_size: 3,
                sort_by: SortKey::Confidence,
                descending: true,
                max_odds: 2.5,
            },
            RiskTier::Moyen => TierConfig {
                min_confidence: 60,
                combo_size: 4,
                sort_by: SortKey::Confidence,
                descending: true,
                max_odds: 4.0,
            },
            RiskTier::HighRisk => TierConfig {
                min_confidence: 45,
                combo_size: 5,
                sort_by: SortKey::Odds,
                descending: true,
                max_odds: 10.0,
            },
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            RiskTier::Safe => "SAFE",
            RiskTier::Moyen => "MOYEN",
            RiskTier::HighRisk => "HIGH_RISK",
        }
    }
}

impl FromStr for RiskTier {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "SAFE" => Ok(RiskTier::Safe),
            "MOYEN" | "MEDIUM" => Ok(RiskTier::Moyen),
            "HIGH_RISK" => Ok(RiskTier::HighRisk),
            _ => Err(AnalysisError::UnknownTier(s.to_string())),
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComboKind {
    Safe,
    Value,
    Mixed,
    Tier(RiskTier),
}

impl ComboKind {
    pub fn label(self) -> &'static str {
        match self {
            ComboKind::Safe => "Combiné Sûr",
            ComboKind::Value => "Combiné Value",
            ComboKind::Mixed => "Combiné Mixte",
            ComboKind::Tier(RiskTier::Safe) => "Combiné SAFE 🛡️",
            ComboKind::Tier(RiskTier::Moyen) => "Combiné MOYEN ⚖️",
            ComboKind::Tier(RiskTier::HighRisk) => "Combiné HIGH RISK 🚀",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboLeg {
    pub match_label: String,
    pub bet: String,
    pub odds: f64,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub kind: ComboKind,
    pub legs: Vec<ComboLeg>,
    /// Product of leg odds, rounded to 2 decimals.
    pub total_odds: f64,
    pub avg_confidence: u8,
    pub stake: f64,
    pub potential_return: f64,
}

impl Combination {
    pub fn type_label(&self) -> &'static str {
        self.kind.label()
    }

    /// Exact (unrounded) product of the leg odds.
    pub fn leg_odds_product(&self) -> f64 {
        self.legs.iter().map(|leg| leg.odds).product()
    }
}

#[derive(Debug, Clone)]
pub struct ComboBuilder {
    min_confidence: u8,
    stake: f64,
}

impl Default for ComboBuilder {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

impl ComboBuilder {
    pub fn new(cfg: &AnalyzerConfig) -> Self {
        Self {
            min_confidence: cfg.min_confidence,
            stake: cfg.stake,
        }
    }

    /// Safe / Value / Mixed combinations of `combo_size` legs each. Returns an
    /// empty list when fewer than `combo_size` analyses reach the confidence floor.
    pub fn generate_combinations<R: Rng + ?Sized>(
        &self,
        analyses: &[MatchAnalysis],
        combo_size: usize,
        rng: &mut R,
    ) -> Vec<Combination> {
        let mut good: Vec<&MatchAnalysis> = usable(analyses)
            .filter(|a| a.confidence >= self.min_confidence)
            .collect();

        if combo_size == 0 || good.len() < combo_size {
            warn!(
                "{}",
                AnalysisError::InsufficientBets {
                    required: combo_size.max(1),
                    available: good.len(),
                }
            );
            return Vec::new();
        }

        let mut out = Vec::with_capacity(3);

        let mut safe = good.clone();
        safe.sort_by_key(|a| Reverse(a.confidence));
        out.push(self.create_combination(&safe[..combo_size], ComboKind::Safe));

        let value: Vec<&MatchAnalysis> = good.iter().copied().filter(|a| a.is_value_bet).collect();
        if value.len() >= combo_size {
            out.push(self.create_combination(&value[..combo_size], ComboKind::Value));
        }

        good.shuffle(rng);
        out.push(self.create_combination(&good[..combo_size], ComboKind::Mixed));

        out
    }

    pub fn generate_specific_combination(
        &self,
        analyses: &[MatchAnalysis],
        tier: RiskTier,
    ) -> Result<Combination> {
        let pool: Vec<&MatchAnalysis> = usable(analyses).collect();
        if pool.len() < MIN_TIER_MATCHES {
            let err = AnalysisError::InsufficientMatches {
                required: MIN_TIER_MATCHES,
                available: pool.len(),
            };
            warn!("{tier}: {err}");
            return Err(err);
        }

        let cfg = tier.config();
        let mut selected: Vec<&MatchAnalysis> = pool
            .iter()
            .copied()
            .filter(|a| a.confidence >= cfg.min_confidence)
            .collect();

        if selected.len() < MIN_TIER_MATCHES {
            info!(
                "{tier}: only {} analyses at confidence >= {}, using top {} overall",
                selected.len(),
                cfg.min_confidence,
                cfg.combo_size
            );
            selected = pool;
            selected.sort_by_key(|a| Reverse(a.confidence));
            selected.truncate(cfg.combo_size);
        }

        selected.sort_by(|a, b| {
            let ord = match cfg.sort_by {
                SortKey::Confidence => a.confidence.cmp(&b.confidence),
                SortKey::Odds => a.recommended_odds.total_cmp(&b.recommended_odds),
            };
            if cfg.descending { ord.reverse() } else { ord }
        });
        selected.truncate(cfg.combo_size);

        Ok(self.create_combination(&selected, ComboKind::Tier(tier)))
    }

    /// Tier pre-filter: usable analyses at the tier's confidence floor and under its odds ceiling.
    pub fn tier_candidates(&self, analyses: &[MatchAnalysis], tier: RiskTier) -> Vec<MatchAnalysis> {
        let cfg = tier.config();
        usable(analyses)
            .filter(|a| a.confidence >= cfg.min_confidence)
            .filter(|a| a.recommended_odds <= cfg.max_odds)
            .cloned()
            .collect()
    }

    pub fn create_combination(&self, bets: &[&MatchAnalysis], kind: ComboKind) -> Combination {
        let product: f64 = bets.iter().map(|b| b.recommended_odds).product();
        let confidence_sum: u32 = bets.iter().map(|b| u32::from(b.confidence)).sum();
        let avg_confidence = if bets.is_empty() {
            0
        } else {
            (f64::from(confidence_sum) / bets.len() as f64).round_ties_even() as u8
        };

        Combination {
            kind,
            legs: bets
                .iter()
                .map(|b| ComboLeg {
                    match_label: b.match_label.clone(),
                    bet: b.recommendation.clone(),
                    odds: b.recommended_odds,
                    confidence: b.confidence,
                })
                .collect(),
            total_odds: round2(product),
            avg_confidence,
            stake: self.stake,
            potential_return: round2(product * self.stake),
        }
    }
}

fn usable(analyses: &[MatchAnalysis]) -> impl Iterator<Item = &MatchAnalysis> {
    analyses.iter().filter(|a| !a.is_degraded())
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
