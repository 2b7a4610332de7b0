use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scoring::BetOption;

const VALUE_BET_BONUS: f64 = 10.0;
const FAVORITE_ODDS: f64 = 1.5;
const FAVORITE_BONUS: f64 = 20.0;
const OUTSIDER_ODDS: f64 = 4.0;
const OUTSIDER_PENALTY: f64 = 15.0;
const VALUE_SCORE_BAND: f64 = 0.1;
const POSITIVE_VALUE_BONUS: f64 = 15.0;
const NEGATIVE_VALUE_PENALTY: f64 = 10.0;

const LOW_RISK_BELOW: f64 = 2.0;
const MEDIUM_RISK_BELOW: f64 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// Degraded analyses only.
    Unknown,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Faible",
            RiskLevel::Medium => "Moyen",
            RiskLevel::High => "Élevé",
            RiskLevel::Unknown => "Inconnu",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn risk_from_odds(odds: f64) -> RiskLevel {
    if odds < LOW_RISK_BELOW {
        RiskLevel::Low
    } else if odds < MEDIUM_RISK_BELOW {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Confidence 0–100 for the selected bet. Adjustments stack on `probability × 100`,
/// then the result is clamped and truncated.
pub fn compute_confidence(bet: &BetOption, is_value_bet: bool) -> u8 {
    let mut score = bet.probability * 100.0;

    if is_value_bet {
        score += VALUE_BET_BONUS;
    }

    if bet.odds < FAVORITE_ODDS {
        score += FAVORITE_BONUS;
    } else if bet.odds > OUTSIDER_ODDS {
        score -= OUTSIDER_PENALTY;
    }

    if bet.value_score > VALUE_SCORE_BAND {
        score += POSITIVE_VALUE_BONUS;
    } else if bet.value_score < -VALUE_SCORE_BAND {
        score -= NEGATIVE_VALUE_PENALTY;
    }

    // NaN saturates to 0 on the cast.
    score.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::Outcome;

    fn bet(odds: f64, probability: f64, value_score: f64) -> BetOption {
        BetOption {
            outcome: Outcome::Home,
            label: "Victoire A".to_string(),
            odds,
            probability,
            value_score,
            combined_score: 0.0,
        }
    }

    #[test]
    fn risk_boundaries() {
        assert_eq!(risk_from_odds(1.99), RiskLevel::Low);
        assert_eq!(risk_from_odds(2.0), RiskLevel::Medium);
        assert_eq!(risk_from_odds(3.49), RiskLevel::Medium);
        assert_eq!(risk_from_odds(3.5), RiskLevel::High);
        assert_eq!(risk_from_odds(12.0), RiskLevel::High);
    }

    #[test]
    fn favorite_with_value_stacks_bonuses() {
        // 55 + 10 + 20 + 15
        assert_eq!(compute_confidence(&bet(1.4, 0.55, 0.2), true), 100);
        // 55 + 20
        assert_eq!(compute_confidence(&bet(1.4, 0.55, 0.0), false), 75);
    }

    #[test]
    fn outsider_with_negative_value_is_penalized() {
        // 30 - 15 - 10
        assert_eq!(compute_confidence(&bet(4.5, 0.30, -0.2), false), 5);
    }

    #[test]
    fn truncates_instead_of_rounding() {
        assert_eq!(compute_confidence(&bet(2.2, 0.459, -0.05), false), 45);
    }

    #[test]
    fn always_clamped() {
        assert_eq!(compute_confidence(&bet(100.0, 0.99, 98.0), true), 100);
        assert_eq!(compute_confidence(&bet(1.01, 1.5, 5.0), true), 100);
        assert_eq!(compute_confidence(&bet(100.0, 0.0, -1.0), false), 0);
        assert_eq!(compute_confidence(&bet(2.0, -3.0, -4.0), false), 0);
        assert_eq!(compute_confidence(&bet(2.0, f64::NAN, 0.0), false), 0);
    }
}
