//! Synthetic odds feed used when no live data source is configured.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::odds::{DRAW_LABEL, H2H_MARKET};
use crate::odds_feed::{OddsBookmaker, OddsEvent, OddsMarket, OddsOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSport {
    pub key: &'static str,
    pub title: &'static str,
}

const DEMO_SPORTS: [DemoSport; 8] = [
    DemoSport { key: "soccer_epl", title: "Premier League" },
    DemoSport { key: "soccer_spain_la_liga", title: "La Liga" },
    DemoSport { key: "soccer_champions_league", title: "Champions League" },
    DemoSport { key: "americanfootball_nfl", title: "NFL" },
    DemoSport { key: "basketball_nba", title: "NBA" },
    DemoSport { key: "tennis_atp", title: "ATP Tennis" },
    DemoSport { key: "baseball_mlb", title: "MLB" },
    DemoSport { key: "icehockey_nhl", title: "NHL" },
];

const BOOKMAKERS: [&str; 5] = ["Bet365", "William Hill", "Betfair", "Unibet", "888sport"];
const BOOKMAKERS_PER_EVENT: usize = 3;
const KICKOFF_MINUTES: [i64; 4] = [0, 15, 30, 45];

pub fn demo_sports() -> &'static [DemoSport] {
    &DEMO_SPORTS
}

pub fn demo_sport_title(key: &str) -> Option<&'static str> {
    DEMO_SPORTS.iter().find(|s| s.key == key).map(|s| s.title)
}

fn seed_teams(sport_key: &str) -> &'static [&'static str] {
    match sport_key {
        "soccer_epl" => &[
            "Manchester United",
            "Liverpool",
            "Manchester City",
            "Arsenal",
            "Chelsea",
            "Tottenham",
            "Newcastle",
            "Brighton",
        ],
        "soccer_spain_la_liga" => &[
            "Real Madrid",
            "Barcelona",
            "Atletico Madrid",
            "Sevilla",
            "Real Betis",
            "Villarreal",
            "Valencia",
            "Athletic Bilbao",
        ],
        "soccer_champions_league" => &[
            "PSG",
            "Bayern Munich",
            "Real Madrid",
            "Barcelona",
            "Manchester City",
            "Liverpool",
            "AC Milan",
            "Inter Milan",
        ],
        "americanfootball_nfl" => &[
            "Patriots", "Chiefs", "Cowboys", "Packers", "49ers", "Bills", "Dolphins", "Ravens",
        ],
        "basketball_nba" => &[
            "Lakers", "Warriors", "Celtics", "Heat", "Bucks", "Nuggets", "Suns", "Nets",
        ],
        "tennis_atp" => &[
            "Novak Djokovic",
            "Carlos Alcaraz",
            "Daniil Medvedev",
            "Jannik Sinner",
            "Andrey Rublev",
            "Stefanos Tsitsipas",
        ],
        "baseball_mlb" => &[
            "Yankees", "Dodgers", "Red Sox", "Giants", "Mets", "Phillies", "Braves", "Astros",
        ],
        "icehockey_nhl" => &[
            "Rangers",
            "Bruins",
            "Lightning",
            "Avalanche",
            "Golden Knights",
            "Oilers",
            "Panthers",
            "Maple Leafs",
        ],
        _ => &["Équipe A", "Équipe B", "Équipe C", "Équipe D"],
    }
}

/// Sports with a draw outcome in the 1X2 market.
pub fn has_draw(sport_key: &str) -> bool {
    sport_key.contains("soccer") || sport_key.contains("football")
}

/// Generates 3 to 6 upcoming fixtures for `sport_key`, each quoted by three
/// bookmakers. Teams are not reused until the pool runs dry.
pub fn generate_demo_events<R: Rng + ?Sized>(
    sport_key: &str,
    sport_title: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<OddsEvent> {
    let teams = seed_teams(sport_key);
    let count = rng.gen_range(3..=6);
    let mut used: Vec<&str> = Vec::new();
    let mut events = Vec::with_capacity(count);

    for i in 0..count {
        let mut available: Vec<&str> = teams.iter().copied().filter(|t| !used.contains(t)).collect();
        if available.len() < 2 {
            available = teams.to_vec();
            used.clear();
        }
        available.shuffle(rng);
        let (home, away) = (available[0], available[1]);
        used.extend([home, away]);

        let kickoff = now
            + Duration::days(rng.gen_range(0..=3))
            + Duration::hours(rng.gen_range(12..=21))
            + Duration::minutes(KICKOFF_MINUTES[rng.gen_range(0..KICKOFF_MINUTES.len())]);

        let margin = rng.gen_range(1.05..1.12);
        let home_odds = rng.gen_range(1.5..4.0) * margin;
        let away_odds = rng.gen_range(1.5..4.0) * margin;
        let draw_odds = has_draw(sport_key).then(|| rng.gen_range(2.8..4.5) * margin);

        let bookmakers = BOOKMAKERS
            .choose_multiple(rng, BOOKMAKERS_PER_EVENT)
            .map(|title| {
                let variation = rng.gen_range(0.95..1.05);
                let mut outcomes = vec![
                    outcome(home, home_odds * variation),
                    outcome(away, away_odds * variation),
                ];
                if let Some(draw) = draw_odds {
                    outcomes.push(outcome(DRAW_LABEL, draw * variation));
                }
                OddsBookmaker {
                    key: Some(title.to_lowercase().replace(' ', "_")),
                    title: Some(title.to_string()),
                    markets: vec![OddsMarket {
                        key: H2H_MARKET.to_string(),
                        outcomes,
                    }],
                }
            })
            .collect::<Vec<_>>();

        events.push(OddsEvent {
            id: Some(format!("demo_{sport_key}_{i}_{}", kickoff.timestamp())),
            sport_key: Some(sport_key.to_string()),
            sport_title: Some(sport_title.to_string()),
            commence_time: kickoff.to_rfc3339_opts(SecondsFormat::Secs, true),
            home_team: home.to_string(),
            away_team: away.to_string(),
            bookmakers,
        });
    }

    events
}

/// Demo events across every demo sport.
pub fn generate_all_demo_events<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> Vec<OddsEvent> {
    DEMO_SPORTS
        .iter()
        .flat_map(|sport| generate_demo_events(sport.key, sport.title, now, rng))
        .collect()
}

fn outcome(name: &str, price: f64) -> OddsOutcome {
    OddsOutcome {
        name: name.to_string(),
        price: (price * 100.0).round() / 100.0,
    }
}
