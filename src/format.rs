//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use crate::analyzer::{AnalysisSummary, MatchAnalysis, sort_by_confidence};
use crate::combos::{Combination, RiskTier};
use crate::odds::{OddsSet, Outcome};
use crate::odds_feed::OddsEvent;

const KICKOFF_FORMAT: &str = "%d/%m/%Y %H:%M";

pub fn format_combination(combo: &Combination) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🎯 {}", combo.type_label());
    let _ = writeln!(out, "📈 Cote totale: {}", combo.total_odds);
    let _ = writeln!(out, "🎲 Confiance moyenne: {}%", combo.avg_confidence);
    let _ = writeln!(
        out,
        "💰 Pour {}€ → {}€\n",
        combo.stake, combo.potential_return
    );
    out.push_str("📋 Détail des paris:\n");
    for (idx, leg) in combo.legs.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", idx + 1, leg.match_label);
        let _ = writeln!(out, "   ➤ {} (confiance: {}%)", leg.bet, leg.confidence);
    }
    out
}

pub fn confidence_marker(confidence: u8) -> &'static str {
    if confidence >= 70 {
        "🟢"
    } else if confidence >= 50 {
        "🟡"
    } else {
        "🔴"
    }
}

/// Numbered three-line block for one analysis.
pub fn format_analysis_line(rank: usize, analysis: &MatchAnalysis) -> String {
    let value = if analysis.is_value_bet { " 💎" } else { "" };
    format!(
        "{rank}. {} {}\n   ➤ {}\n   📈 Confiance: {}%{value} | Risque: {}\n",
        confidence_marker(analysis.confidence),
        analysis.match_label,
        analysis.recommendation,
        analysis.confidence,
        analysis.risk_level,
    )
}

/// Ranked listing of usable analyses, highest confidence first. Records
/// without usable odds are left out of both the ranking and the numbering.
pub fn format_ranked_analyses(analyses: &[MatchAnalysis], limit: Option<usize>) -> String {
    let mut ranked: Vec<MatchAnalysis> = analyses.iter().filter(|a| !a.is_degraded()).cloned().collect();
    sort_by_confidence(&mut ranked);
    let shown = limit.unwrap_or(ranked.len()).min(ranked.len());
    ranked
        .iter()
        .take(shown)
        .enumerate()
        .map(|(idx, analysis)| format_analysis_line(idx + 1, analysis))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_summary(summary: &AnalysisSummary) -> String {
    format!(
        "📊 {} matchs analysés\n\
         • 🟢 {} paris haute confiance (≥70%)\n\
         • 🟡 {} paris moyenne confiance (50-69%)\n\
         • 🔴 {} paris faible confiance (<50%)\n\
         • 💎 {} value bets détectées\n",
        summary.total,
        summary.high_confidence,
        summary.medium_confidence,
        summary.low_confidence,
        summary.value_bets,
    )
}

pub fn sport_emoji(sport_key: &str) -> &'static str {
    const EMOJIS: [(&str, &str); 8] = [
        ("soccer", "⚽"),
        ("americanfootball", "🏈"),
        ("basketball", "🏀"),
        ("baseball", "⚾"),
        ("icehockey", "🏒"),
        ("tennis", "🎾"),
        ("golf", "⛳"),
        ("boxing", "🥊"),
    ];
    let key = sport_key.to_ascii_lowercase();
    EMOJIS
        .iter()
        .find(|(needle, _)| key.contains(needle))
        .map(|(_, emoji)| *emoji)
        .unwrap_or("🏆")
}

/// Teams, kickoff and best available prices for one event.
pub fn format_match_info(event: &OddsEvent, odds: Option<&OddsSet>) -> String {
    let mut out = String::new();
    if let Some(title) = &event.sport_title {
        let emoji = sport_emoji(event.sport_key.as_deref().unwrap_or_default());
        let _ = writeln!(out, "{emoji} {title}");
    }
    let _ = writeln!(out, "🆚 {}", event.match_label());
    match event.kickoff() {
        Some(ts) => {
            let _ = writeln!(out, "🕒 {}", ts.format(KICKOFF_FORMAT));
        }
        None => {
            let _ = writeln!(out, "🕒 {}", event.commence_time);
        }
    }
    if let Some(odds) = odds.filter(|o| o.is_usable()) {
        let prices: Vec<String> = odds
            .quoted()
            .map(|(outcome, price)| {
                let name = match outcome {
                    Outcome::Home => event.home_team.as_str(),
                    Outcome::Away => event.away_team.as_str(),
                    Outcome::Draw => "Nul",
                };
                format!("{name} {price:.2}")
            })
            .collect();
        let _ = writeln!(out, "📊 Cotes: {}", prices.join(" | "));
    }
    out
}

pub fn tier_emoji(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Safe => "🛡️",
        RiskTier::Moyen => "⚖️",
        RiskTier::HighRisk => "🚀",
    }
}

pub fn tier_title(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Safe => "SAFE",
        RiskTier::Moyen => "MOYEN",
        RiskTier::HighRisk => "HIGH RISK / HIGH REWARD",
    }
}

pub fn tier_description(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Safe => "Combinés sûrs - Petites cotes, très forte probabilité",
        RiskTier::Moyen => "Combinés équilibrés - Cotes moyennes, bon potentiel",
        RiskTier::HighRisk => "Combinés risqués - Grosses cotes, gros potentiel",
    }
}

pub fn tier_advice(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Safe => "💡 Conseil SAFE : Combiné à faible risque, idéal pour préserver votre bankroll.",
        RiskTier::Moyen => {
            "💡 Conseil MOYEN : Bon équilibre risque/rendement, gérez votre mise prudemment."
        }
        RiskTier::HighRisk => {
            "💡 Conseil HIGH RISK : Mise très réduite recommandée ! Potentiel élevé mais risque maximal."
        }
    }
}

/// Heading, description, combination body and advice for a tiered combination.
pub fn format_tier_combination(tier: RiskTier, combo: &Combination) -> String {
    format!(
        "{} COMBINÉ {}\n\n📋 {}\n\n{}\n{}\n",
        tier_emoji(tier),
        tier_title(tier),
        tier_description(tier),
        format_combination(combo),
        tier_advice(tier),
    )
}
