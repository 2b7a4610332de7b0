use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use betslip::analyzer::LegacyAnalysis;
use betslip::odds_feed::parse_events_json;
use betslip::{
    AnalysisError, AnalyzerConfig, BettingAnalyzer, ComboBuilder, ComboKind, MatchAnalysis,
    RiskTier,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn legacy_analyses() -> Vec<MatchAnalysis> {
    let records: Vec<LegacyAnalysis> =
        serde_json::from_str(&read_fixture("legacy_analyses.json")).expect("fixture should parse");
    records.into_iter().map(MatchAnalysis::from).collect()
}

fn match_labels(combo: &betslip::Combination) -> Vec<&str> {
    combo.legs.iter().map(|leg| leg.match_label.as_str()).collect()
}

#[test]
fn moyen_takes_four_most_confident() {
    let combo = ComboBuilder::default()
        .generate_specific_combination(&legacy_analyses(), RiskTier::Moyen)
        .expect("enough matches");

    assert_eq!(combo.kind, ComboKind::Tier(RiskTier::Moyen));
    assert_eq!(combo.legs.len(), 4);
    let conf: Vec<u8> = combo.legs.iter().map(|l| l.confidence).collect();
    assert_eq!(conf, vec![80, 75, 70, 65]);
    assert_eq!(combo.total_odds, 10.26);
    assert_eq!(combo.avg_confidence, 72);
    assert_eq!(combo.stake, 10.0);
    assert_eq!(combo.potential_return, 102.6);
    assert!((combo.leg_odds_product() - 10.26).abs() < 1e-9);
}

#[test]
fn safe_falls_back_to_top_three_when_floor_is_thin() {
    let combo = ComboBuilder::default()
        .generate_specific_combination(&legacy_analyses(), RiskTier::Safe)
        .expect("enough matches");

    assert_eq!(
        match_labels(&combo),
        vec!["Arsenal vs Chelsea", "Lakers vs Celtics", "PSG vs Bayern Munich"]
    );
    assert_eq!(combo.total_odds, 5.4);
    assert_eq!(combo.avg_confidence, 75);
    assert_eq!(combo.potential_return, 54.0);
    assert_eq!(combo.type_label(), "Combiné SAFE 🛡️");
}

#[test]
fn high_risk_orders_by_odds() {
    let combo = ComboBuilder::default()
        .generate_specific_combination(&legacy_analyses(), RiskTier::HighRisk)
        .expect("enough matches");

    let odds: Vec<f64> = combo.legs.iter().map(|l| l.odds).collect();
    assert_eq!(odds, vec![2.0, 1.9, 1.8, 1.7, 1.5]);
    assert!(combo.legs.iter().all(|l| l.confidence >= 45));
}

#[test]
fn tier_needs_three_usable_matches() {
    let analyses = legacy_analyses();
    let err = ComboBuilder::default()
        .generate_specific_combination(&analyses[..2], RiskTier::HighRisk)
        .unwrap_err();
    assert_eq!(
        err,
        AnalysisError::InsufficientMatches {
            required: 3,
            available: 2
        }
    );
}

#[test]
fn tier_candidates_apply_odds_ceiling() {
    let builder = ComboBuilder::default();
    let analyses = legacy_analyses();
    assert_eq!(builder.tier_candidates(&analyses, RiskTier::Safe).len(), 2);
    assert_eq!(builder.tier_candidates(&analyses, RiskTier::Moyen).len(), 4);
    assert_eq!(builder.tier_candidates(&analyses, RiskTier::HighRisk).len(), 5);
}

#[test]
fn generic_combinations_cover_all_kinds() {
    let analyses = legacy_analyses();
    let mut rng = StdRng::seed_from_u64(42);
    let combos = ComboBuilder::default().generate_combinations(&analyses, 3, &mut rng);

    let kinds: Vec<ComboKind> = combos.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ComboKind::Safe, ComboKind::Value, ComboKind::Mixed]);

    let safe = &combos[0];
    assert_eq!(
        match_labels(safe),
        vec!["Arsenal vs Chelsea", "Lakers vs Celtics", "PSG vs Bayern Munich"]
    );

    let value = &combos[1];
    assert_eq!(
        match_labels(value),
        vec!["Arsenal vs Chelsea", "Lakers vs Celtics", "Yankees vs Dodgers"]
    );

    // Mixed: 3 distinct legs drawn from the 5 analyses at confidence >= 50.
    let mixed = &combos[2];
    let mut labels = match_labels(mixed);
    assert_eq!(labels.len(), 3);
    labels.sort_unstable();
    labels.dedup();
    assert_eq!(labels.len(), 3);
    assert!(mixed.legs.iter().all(|l| l.confidence >= 50));
    for combo in &combos {
        assert!((combo.total_odds - (combo.leg_odds_product() * 100.0).round() / 100.0).abs() < 1e-12);
    }
}

#[test]
fn value_combination_skipped_without_enough_value_bets() {
    let analyses = legacy_analyses();
    let mut rng = StdRng::seed_from_u64(3);
    let combos = ComboBuilder::default().generate_combinations(&analyses, 4, &mut rng);
    let kinds: Vec<ComboKind> = combos.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ComboKind::Safe, ComboKind::Mixed]);
}

#[test]
fn too_few_qualifying_analyses_yield_nothing() {
    let analyses = legacy_analyses();
    let mut rng = StdRng::seed_from_u64(1);
    let builder = ComboBuilder::default();
    assert!(builder.generate_combinations(&analyses, 6, &mut rng).is_empty());
    assert!(builder.generate_combinations(&analyses, 0, &mut rng).is_empty());

    let strict = ComboBuilder::new(&AnalyzerConfig {
        min_confidence: 90,
        ..AnalyzerConfig::default()
    });
    assert!(strict.generate_combinations(&analyses, 3, &mut rng).is_empty());
}

#[test]
fn degraded_analyses_never_become_legs() {
    let events = parse_events_json(&read_fixture("odds_events.json")).expect("fixture should parse");
    let mut analyses = BettingAnalyzer::default().analyze_all(&events);
    analyses.extend(legacy_analyses());

    let builder = ComboBuilder::new(&AnalyzerConfig {
        min_confidence: 0,
        ..AnalyzerConfig::default()
    });
    let mut rng = StdRng::seed_from_u64(9);
    let combos = builder.generate_combinations(&analyses, 8, &mut rng);
    assert!(!combos.is_empty());
    for combo in &combos {
        assert!(combo.legs.iter().all(|l| l.odds > 0.0));
        assert!(combo.total_odds > 0.0);
    }
}

#[test]
fn stake_scales_potential_return() {
    let builder = ComboBuilder::new(&AnalyzerConfig {
        stake: 25.0,
        ..AnalyzerConfig::default()
    });
    let analyses = legacy_analyses();
    let refs: Vec<&MatchAnalysis> = analyses.iter().take(3).collect();
    let combo = builder.create_combination(&refs, ComboKind::Safe);
    assert_eq!(combo.total_odds, 5.4);
    assert_eq!(combo.potential_return, 135.0);
}

#[test]
fn saved_no_odds_records_are_skipped_by_tiers() {
    let analyses = legacy_analyses();
    let no_odds = analyses
        .iter()
        .find(|a| a.match_label == "Heat vs Bucks")
        .expect("fixture has a no-odds record");
    assert!(no_odds.is_degraded());

    // Only two usable records beside the degraded one.
    let thin = vec![analyses[0].clone(), analyses[1].clone(), no_odds.clone()];
    let err = ComboBuilder::default()
        .generate_specific_combination(&thin, RiskTier::Safe)
        .unwrap_err();
    assert_eq!(
        err,
        AnalysisError::InsufficientMatches {
            required: 3,
            available: 2
        }
    );

    let loose = ComboBuilder::new(&AnalyzerConfig {
        min_confidence: 0,
        ..AnalyzerConfig::default()
    });
    let mut rng = StdRng::seed_from_u64(4);
    for combo in loose.generate_combinations(&analyses, 7, &mut rng) {
        assert!(!match_labels(&combo).contains(&"Heat vs Bucks"));
        assert!(combo.total_odds > 0.0);
    }
}

#[test]
fn saved_zero_price_never_zeroes_a_combination() {
    let records: Vec<LegacyAnalysis> = serde_json::from_str(
        r#"[
            { "match": "A vs B", "recommendation": "Victoire A (cote: 0.00)", "confidence": 90 },
            { "match": "C vs D", "recommendation": "Victoire C (cote: 1.50)", "confidence": 85 },
            { "match": "E vs F", "recommendation": "Victoire E (cote: 1.60)", "confidence": 80 }
        ]"#,
    )
    .expect("records should parse");
    let analyses: Vec<MatchAnalysis> = records.into_iter().map(MatchAnalysis::from).collect();

    let combo = ComboBuilder::default()
        .generate_specific_combination(&analyses, RiskTier::Safe)
        .expect("enough matches");
    let odds: Vec<f64> = combo.legs.iter().map(|l| l.odds).collect();
    assert_eq!(odds, vec![2.0, 1.5, 1.6]);
    assert_eq!(combo.total_odds, 4.8);
    assert_eq!(combo.potential_return, 48.0);
}
