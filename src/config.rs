use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const DEFAULT_MIN_ODDS: f64 = 1.5;
const DEFAULT_MAX_ODDS: f64 = 5.0;
const DEFAULT_MIN_CONFIDENCE: u8 = 50;
const DEFAULT_COMBO_SIZE: usize = 3;
const DEFAULT_CACHE_TIMEOUT_SECS: u64 = 300;
const DEFAULT_DAYS_AHEAD: i64 = 3;
const DEFAULT_STAKE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Lower bound of the odds band a value bet must sit in.
    pub min_odds: f64,
    pub max_odds: f64,
    /// Confidence floor for the generic combinations.
    pub min_confidence: u8,
    pub combo_size: usize,
    pub cache_timeout_secs: u64,
    pub days_ahead: i64,
    /// Reference stake used for `potential_return`.
    pub stake: f64,
    pub demo_mode: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_odds: DEFAULT_MIN_ODDS,
            max_odds: DEFAULT_MAX_ODDS,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            combo_size: DEFAULT_COMBO_SIZE,
            cache_timeout_secs: DEFAULT_CACHE_TIMEOUT_SECS,
            days_ahead: DEFAULT_DAYS_AHEAD,
            stake: DEFAULT_STAKE,
            demo_mode: false,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();

        let mut min_odds = parse_or(&lookup, "BETSLIP_MIN_ODDS", d.min_odds).max(1.0);
        let mut max_odds = parse_or(&lookup, "BETSLIP_MAX_ODDS", d.max_odds).max(1.0);
        if !(min_odds <= max_odds) {
            min_odds = d.min_odds;
            max_odds = d.max_odds;
        }

        let stake = parse_or(&lookup, "BETSLIP_STAKE", d.stake);
        let stake = if stake.is_finite() && stake > 0.0 { stake } else { d.stake };

        Self {
            min_odds,
            max_odds,
            min_confidence: parse_or(&lookup, "BETSLIP_MIN_CONFIDENCE", d.min_confidence).min(100),
            combo_size: parse_or(&lookup, "BETSLIP_COMBO_SIZE", d.combo_size).clamp(1, 10),
            cache_timeout_secs: parse_or(&lookup, "BETSLIP_CACHE_TIMEOUT_SECS", d.cache_timeout_secs),
            days_ahead: parse_or(&lookup, "BETSLIP_DAYS_AHEAD", d.days_ahead).clamp(0, 30),
            stake,
            demo_mode: lookup("BETSLIP_DEMO")
                .map(|v| truthy(&v))
                .unwrap_or(d.demo_mode),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn truthy(raw: &str) -> bool {
    let t = raw.trim().to_ascii_lowercase();
    !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
}
