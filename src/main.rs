use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use betslip::analyzer::LegacyAnalysis;
use betslip::combos::MIN_TIER_MATCHES;
use betslip::demo_feed::{self, demo_sport_title, demo_sports};
use betslip::format::{
    format_combination, format_match_info, format_ranked_analyses, format_summary,
    format_tier_combination, sport_emoji,
};
use betslip::odds::extract_best_odds;
use betslip::odds_feed::{self, OddsEvent};
use betslip::session::{ALL_MATCHES_KEY, AnalysisSession};
use betslip::{AnalysisError, AnalysisSummary, AnalyzerConfig, MatchAnalysis, RiskTier, logging};

#[derive(Parser)]
#[command(name = "betslip", version, about = "Bet recommendations and combinations from bookmaker odds")]
struct Cli {
    /// JSON array of odds-API match records
    #[arg(long, global = true)]
    input: Option<PathBuf>,
    /// Use the generated demo feed instead of a file
    #[arg(long, global = true)]
    demo: bool,
    /// Seed for the demo feed and mixed combinations
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Restrict to one sport key (e.g. soccer_epl)
    #[arg(long, global = true)]
    sport: Option<String>,
    /// Keep only matches kicking off within the configured days-ahead window
    #[arg(long, global = true)]
    upcoming: bool,
    /// Overrides BETSLIP_DAYS_AHEAD
    #[arg(long, global = true)]
    days_ahead: Option<i64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List demo sports
    Sports,
    /// Print match info and best odds
    Matches,
    /// Analyze every match, highest confidence first
    Analyze {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Safe / value / mixed combinations
    Combos {
        /// Overrides BETSLIP_COMBO_SIZE
        #[arg(long)]
        size: Option<usize>,
    },
    /// One combination for a risk tier (SAFE, MOYEN, HIGH_RISK)
    Tier { tier: RiskTier },
    /// Summary, analyses and every combination kind
    Report,
    /// Build tier combinations from previously saved analysis records
    Legacy {
        path: PathBuf,
        #[arg(long)]
        tier: Option<RiskTier>,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
    logging::init();

    let cli = Cli::parse();
    let mut cfg = AnalyzerConfig::from_env();
    if cli.demo {
        cfg.demo_mode = true;
    }
    if let Some(days) = cli.days_ahead {
        cfg.days_ahead = days.clamp(0, 30);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = AnalysisSession::new(cfg.clone());

    match &cli.command {
        Command::Sports => {
            for sport in demo_sports() {
                println!("{} {} ({})", sport_emoji(sport.key), sport.title, sport.key);
            }
        }
        Command::Matches => {
            let events = session.events_with(ALL_MATCHES_KEY, || load_events(&cli, &cfg, &mut rng))?;
            if events.is_empty() {
                println!("❌ Aucun match disponible.");
            }
            for event in events {
                let odds = extract_best_odds(event).ok();
                println!("{}", format_match_info(event, odds.as_ref()));
            }
        }
        Command::Analyze { limit } => {
            let analyses = session.analyses_with(ALL_MATCHES_KEY, || load_events(&cli, &cfg, &mut rng))?;
            print_analyses(&analyses, *limit);
        }
        Command::Combos { size } => {
            let analyses = session.analyses_with(ALL_MATCHES_KEY, || load_events(&cli, &cfg, &mut rng))?;
            let size = size.unwrap_or(cfg.combo_size);
            let combos = session.combos().generate_combinations(&analyses, size, &mut rng);
            if combos.is_empty() {
                println!("❌ Pas assez de paris fiables pour un combiné de {size}.");
            }
            for combo in &combos {
                println!("{}", format_combination(combo));
            }
        }
        Command::Tier { tier } => {
            let analyses = session.analyses_with(ALL_MATCHES_KEY, || load_events(&cli, &cfg, &mut rng))?;
            print_tier(&session, &analyses, *tier);
        }
        Command::Report => {
            let analyses = session.analyses_with(ALL_MATCHES_KEY, || load_events(&cli, &cfg, &mut rng))?;
            println!("{}", format_summary(&AnalysisSummary::from_analyses(&analyses)));
            print_analyses(&analyses, None);

            for combo in session
                .combos()
                .generate_combinations(&analyses, cfg.combo_size, &mut rng)
            {
                println!("{}", format_combination(&combo));
            }
            for tier in RiskTier::ALL {
                print_tier(&session, &analyses, tier);
            }
        }
        Command::Legacy { path, tier } => {
            let analyses = load_legacy(path)?;
            println!("{}", format_summary(&AnalysisSummary::from_analyses(&analyses)));
            let tiers = match tier {
                Some(tier) => vec![*tier],
                None => RiskTier::ALL.to_vec(),
            };
            for tier in tiers {
                print_tier(&session, &analyses, tier);
            }
        }
    }

    Ok(())
}

fn load_events(cli: &Cli, cfg: &AnalyzerConfig, rng: &mut StdRng) -> Result<Vec<OddsEvent>> {
    let mut events = match &cli.input {
        Some(path) if !cli.demo => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            odds_feed::parse_events_json(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        _ => {
            if !cfg.demo_mode {
                warn!("no --input given, falling back to demo feed");
            }
            demo_events(cli.sport.as_deref(), rng)?
        }
    };

    if let Some(sport) = &cli.sport {
        events.retain(|e| e.sport_key.as_deref() == Some(sport.as_str()));
    }
    if cli.upcoming {
        events = odds_feed::filter_upcoming(events, Utc::now(), cfg.days_ahead);
    }
    info!("loaded {} matches", events.len());
    Ok(events)
}

fn demo_events(sport: Option<&str>, rng: &mut StdRng) -> Result<Vec<OddsEvent>> {
    let now = Utc::now();
    match sport {
        Some(key) => {
            let Some(title) = demo_sport_title(key) else {
                bail!("unknown demo sport {key:?}");
            };
            Ok(demo_feed::generate_demo_events(key, title, now, rng))
        }
        None => Ok(demo_feed::generate_all_demo_events(now, rng)),
    }
}

fn load_legacy(path: &Path) -> Result<Vec<MatchAnalysis>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<LegacyAnalysis> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(records.into_iter().map(MatchAnalysis::from).collect())
}

fn print_analyses(analyses: &[MatchAnalysis], limit: Option<usize>) {
    let listing = format_ranked_analyses(analyses, limit);
    if listing.is_empty() {
        println!("❌ Aucune analyse disponible.");
        return;
    }
    println!("{listing}");
}

fn print_tier(session: &AnalysisSession, analyses: &[MatchAnalysis], tier: RiskTier) {
    let candidates = session.combos().tier_candidates(analyses, tier);
    if candidates.len() < MIN_TIER_MATCHES {
        let err = AnalysisError::InsufficientBets {
            required: MIN_TIER_MATCHES,
            available: candidates.len(),
        };
        warn!("{tier}: {err}");
        println!("❌ Pas assez de paris {tier} fiables (minimum {MIN_TIER_MATCHES} requis, {} trouvés).\n", candidates.len());
        return;
    }
    match session.combos().generate_specific_combination(&candidates, tier) {
        Ok(combo) => println!("{}", format_tier_combination(tier, &combo)),
        Err(err) => println!("❌ Impossible de générer un combiné {tier}: {err}\n"),
    }
}
