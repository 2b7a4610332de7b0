use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One fixture as returned by the odds API (`/v4/sports/{sport}/odds`, decimal format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub sport_key: Option<String>,
    #[serde(default)]
    pub sport_title: Option<String>,
    #[serde(default)]
    pub commence_time: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<OddsBookmaker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsBookmaker {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub markets: Vec<OddsMarket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<OddsOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsOutcome {
    pub name: String,
    pub price: f64,
}

impl OddsEvent {
    pub fn match_label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    pub fn kickoff(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.commence_time)
    }
}

/// Parses a JSON array of events. `null` is treated as an empty feed.
pub fn parse_events_json(raw: &str) -> Result<Vec<OddsEvent>> {
    let parsed: Option<Vec<OddsEvent>> =
        serde_json::from_str(raw).context("invalid odds json")?;
    Ok(parsed.unwrap_or_default())
}

/// Keeps events kicking off within `[now, now + days_ahead]`.
pub fn filter_upcoming(events: Vec<OddsEvent>, now: DateTime<Utc>, days_ahead: i64) -> Vec<OddsEvent> {
    let end = now + Duration::days(days_ahead.max(0));
    events
        .into_iter()
        .filter(|event| match event.kickoff() {
            Some(ts) => ts >= now && ts <= end,
            None => {
                debug!(
                    "{}: unparseable commence_time {:?}",
                    event.match_label(),
                    event.commence_time
                );
                false
            }
        })
        .collect()
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_at(commence_time: &str) -> OddsEvent {
        OddsEvent {
            id: None,
            sport_key: None,
            sport_title: None,
            commence_time: commence_time.to_string(),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            bookmakers: Vec::new(),
        }
    }

    #[test]
    fn parse_timestamp_accepts_zulu_and_naive() {
        let a = parse_timestamp("2026-10-20T19:45:00Z").expect("rfc3339");
        let b = parse_timestamp("2026-10-20T19:45:00").expect("naive");
        assert_eq!(a, b);
        assert!(parse_timestamp("  ").is_none());
        assert!(parse_timestamp("tomorrow").is_none());
    }

    #[test]
    fn upcoming_window_is_inclusive_and_drops_unparseable() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let events = vec![
            event_at("2026-10-18T11:59:00Z"),
            event_at("2026-10-18T12:00:00Z"),
            event_at("2026-10-21T12:00:00Z"),
            event_at("2026-10-21T12:00:01Z"),
            event_at("soon"),
        ];
        let kept = filter_upcoming(events, now, 3);
        let times: Vec<&str> = kept.iter().map(|e| e.commence_time.as_str()).collect();
        assert_eq!(times, vec!["2026-10-18T12:00:00Z", "2026-10-21T12:00:00Z"]);
    }

    #[test]
    fn null_feed_is_empty() {
        assert!(parse_events_json("null").expect("null should parse").is_empty());
    }
}
