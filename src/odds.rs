use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::odds_feed::OddsEvent;

pub const H2H_MARKET: &str = "h2h";
pub const DRAW_LABEL: &str = "Draw";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Home,
    Away,
    Draw,
}

impl Outcome {
    /// Evaluation order for scoring. Ties keep the earlier entry.
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Away, Outcome::Draw];
}

/// Best decimal price per outcome. `0.0` means the outcome had no quote.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OddsSet {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OddsSet {
    pub fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Away => self.away,
            Outcome::Draw => self.draw,
        }
    }

    fn slot_mut(&mut self, outcome: Outcome) -> &mut f64 {
        match outcome {
            Outcome::Home => &mut self.home,
            Outcome::Away => &mut self.away,
            Outcome::Draw => &mut self.draw,
        }
    }

    /// Outcomes with a positive price, in scoring order.
    pub fn quoted(&self) -> impl Iterator<Item = (Outcome, f64)> + '_ {
        Outcome::ALL
            .into_iter()
            .map(|o| (o, self.get(o)))
            .filter(|(_, price)| *price > 0.0)
    }

    pub fn is_usable(&self) -> bool {
        self.home > 0.0
    }
}

/// Takes the maximum `h2h` price per outcome across every bookmaker.
pub fn extract_best_odds(event: &OddsEvent) -> Result<OddsSet> {
    let no_odds = || AnalysisError::NoOddsAvailable {
        match_label: event.match_label(),
    };
    if event.bookmakers.is_empty() {
        return Err(no_odds());
    }

    let home_team = event.home_team.trim();
    let away_team = event.away_team.trim();
    let mut best = OddsSet::default();

    for bookmaker in &event.bookmakers {
        for market in bookmaker
            .markets
            .iter()
            .filter(|m| m.key.eq_ignore_ascii_case(H2H_MARKET))
        {
            for outcome in &market.outcomes {
                let Some(slot) = classify_outcome_name(outcome.name.trim(), home_team, away_team)
                else {
                    continue;
                };
                let current = best.slot_mut(slot);
                *current = current.max(outcome.price);
            }
        }
    }

    if best.is_usable() { Ok(best) } else { Err(no_odds()) }
}

fn classify_outcome_name(name: &str, home_team: &str, away_team: &str) -> Option<Outcome> {
    if name == home_team {
        Some(Outcome::Home)
    } else if name == away_team {
        Some(Outcome::Away)
    } else if name == DRAW_LABEL {
        Some(Outcome::Draw)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds_feed::{OddsBookmaker, OddsMarket, OddsOutcome};

    fn market(key: &str, prices: &[(&str, f64)]) -> OddsMarket {
        OddsMarket {
            key: key.to_string(),
            outcomes: prices
                .iter()
                .map(|(name, price)| OddsOutcome {
                    name: name.to_string(),
                    price: *price,
                })
                .collect(),
        }
    }

    fn event(bookmakers: Vec<Vec<OddsMarket>>) -> OddsEvent {
        OddsEvent {
            id: None,
            sport_key: None,
            sport_title: None,
            commence_time: "2026-10-20T19:45:00Z".to_string(),
            home_team: "Lyon".to_string(),
            away_team: "Nice".to_string(),
            bookmakers: bookmakers
                .into_iter()
                .map(|markets| OddsBookmaker {
                    key: None,
                    title: None,
                    markets,
                })
                .collect(),
        }
    }

    #[test]
    fn takes_max_price_per_outcome_across_books() {
        let ev = event(vec![
            vec![market("h2h", &[("Lyon", 2.10), ("Nice", 3.40), ("Draw", 3.20)])],
            vec![market("h2h", &[("Lyon", 2.25), ("Nice", 3.10), ("Draw", 3.35)])],
        ]);
        let odds = extract_best_odds(&ev).expect("odds");
        assert_eq!(odds, OddsSet::new(2.25, 3.35, 3.40));
    }

    #[test]
    fn ignores_other_markets_and_unknown_names() {
        let ev = event(vec![vec![
            market("totals", &[("Lyon", 9.0)]),
            market("H2H", &[("Lyon", 1.90), ("Olympique", 5.0), ("Nice", 4.0)]),
        ]]);
        let odds = extract_best_odds(&ev).expect("odds");
        assert_eq!(odds, OddsSet::new(1.90, 0.0, 4.0));
        assert_eq!(odds.quoted().count(), 2);
    }

    #[test]
    fn missing_home_price_is_no_odds() {
        let ev = event(vec![vec![market("h2h", &[("Nice", 2.0), ("Draw", 3.0)])]]);
        assert!(matches!(
            extract_best_odds(&ev),
            Err(AnalysisError::NoOddsAvailable { .. })
        ));
        assert!(matches!(
            extract_best_odds(&event(Vec::new())),
            Err(AnalysisError::NoOddsAvailable { .. })
        ));
    }
}
