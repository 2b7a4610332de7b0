use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::odds::{OddsSet, Outcome};

/// Overround-free probabilities. Unquoted outcomes stay at `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProbabilitySet {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl ProbabilitySet {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Away => self.away,
            Outcome::Draw => self.draw,
        }
    }

    pub fn total(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

/// Sum of `1 / odds` over quoted outcomes, i.e. the bookmaker overround.
pub fn total_implied(odds: &OddsSet) -> f64 {
    odds.quoted().map(|(_, price)| 1.0 / price).sum()
}

pub fn devig(odds: &OddsSet) -> Result<ProbabilitySet> {
    let total = total_implied(odds);
    if !(total > 0.0) {
        return Err(AnalysisError::InvalidOdds);
    }
    let mut probs = ProbabilitySet::default();
    for (outcome, price) in odds.quoted() {
        let p = (1.0 / price) / total;
        match outcome {
            Outcome::Home => probs.home = p,
            Outcome::Away => probs.away = p,
            Outcome::Draw => probs.draw = p,
        }
    }
    Ok(probs)
}
