//! Per-outcome bet scoring and best-bet selection.
//!
//! Each quoted outcome gets a `value_score` (edge over fair odds) and a
//! `combined_score` blending probability with positive value only.

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::odds::{OddsSet, Outcome};
use crate::probability::ProbabilitySet;

const PROBABILITY_WEIGHT: f64 = 0.6;
const VALUE_WEIGHT: f64 = 0.4;

const FALLBACK_PROBABILITY: f64 = 0.4;
const FALLBACK_ODDS: f64 = 2.0;

const WIN_VALUE_MIN_PROB: f64 = 0.30;
const DRAW_VALUE_MIN_PROB: f64 = 0.25;

pub const DRAW_BET_LABEL: &str = "Match nul";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetOption {
    pub outcome: Outcome,
    pub label: String,
    pub odds: f64,
    pub probability: f64,
    pub value_score: f64,
    pub combined_score: f64,
}

impl BetOption {
    pub fn new(outcome: Outcome, label: String, odds: f64, probability: f64) -> Self {
        let value_score = probability * odds - 1.0;
        let combined_score =
            probability * PROBABILITY_WEIGHT + value_score.max(0.0) * VALUE_WEIGHT;
        Self {
            outcome,
            label,
            odds,
            probability,
            value_score,
            combined_score,
        }
    }

    /// Home pick used when nothing is quoted. `value_score` is pinned to zero.
    pub fn fallback(home_team: &str) -> Self {
        Self {
            outcome: Outcome::Home,
            label: bet_label(Outcome::Home, home_team, ""),
            odds: FALLBACK_ODDS,
            probability: FALLBACK_PROBABILITY,
            value_score: 0.0,
            combined_score: FALLBACK_PROBABILITY * PROBABILITY_WEIGHT,
        }
    }
}

pub fn bet_label(outcome: Outcome, home_team: &str, away_team: &str) -> String {
    match outcome {
        Outcome::Home => format!("Victoire {home_team}"),
        Outcome::Away => format!("Victoire {away_team}"),
        Outcome::Draw => DRAW_BET_LABEL.to_string(),
    }
}

/// One option per quoted outcome, in home / away / draw order.
pub fn score_options(
    odds: &OddsSet,
    probs: &ProbabilitySet,
    home_team: &str,
    away_team: &str,
) -> Vec<BetOption> {
    odds.quoted()
        .map(|(outcome, price)| {
            BetOption::new(
                outcome,
                bet_label(outcome, home_team, away_team),
                price,
                probs.get(outcome),
            )
        })
        .collect()
}

/// Highest `combined_score`; the first option wins a tie.
pub fn select_best(options: &[BetOption]) -> Option<&BetOption> {
    options.iter().fold(None, |best: Option<&BetOption>, option| match best {
        Some(current) if option.combined_score <= current.combined_score => Some(current),
        _ => Some(option),
    })
}

pub fn best_bet(
    odds: &OddsSet,
    probs: &ProbabilitySet,
    home_team: &str,
    away_team: &str,
) -> BetOption {
    let options = score_options(odds, probs, home_team, away_team);
    select_best(&options)
        .cloned()
        .unwrap_or_else(|| BetOption::fallback(home_team))
}

pub fn is_value_outcome(outcome: Outcome, odds: f64, probability: f64, cfg: &AnalyzerConfig) -> bool {
    let min_prob = match outcome {
        Outcome::Home | Outcome::Away => WIN_VALUE_MIN_PROB,
        Outcome::Draw => DRAW_VALUE_MIN_PROB,
    };
    cfg.min_odds <= odds && odds <= cfg.max_odds && probability > min_prob
}

/// True when any quoted outcome of the match passes the value test.
pub fn is_value_bet(odds: &OddsSet, probs: &ProbabilitySet, cfg: &AnalyzerConfig) -> bool {
    odds.quoted()
        .any(|(outcome, price)| is_value_outcome(outcome, price, probs.get(outcome), cfg))
}
