//! End-to-end strategy assembly.
//!
//! Tests:
//! 1. SMA crossover configs (JSON) assemble and fire on hand-computed bars
//! 2. Entry expressions fold strictly left to right (full truth table)
//! 3. Forward references fail
//! 4. Malformed token lists are rejected
//! 5. Unknown component keys are reported with their kind
//! 6. Trading series and stop-loss against a seeded trading record

use std::sync::Arc;

use stratlab_core::cache::Role;
use stratlab_core::components::indicator::default_registry as default_indicators;
use stratlab_core::components::rule::default_registry as default_rules;
use stratlab_core::config::{ArgConfig, IndicatorConfig, RuleConfig, StrategyConfig};
use stratlab_core::data::InMemoryBarSeriesLoader;
use stratlab_core::domain::{BarSeries, TradeDirection, TradingRecord};
use stratlab_core::error::{ConstructionError, ExpressionError, ExpressionSide};
use stratlab_core::{
    EngineError, EvaluationScope, IndicatorRegistry, RuleOperator, RuleRegistry, StrategyAssembler,
};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

const CLOSES: [f64; 10] = [10.0, 11.0, 12.0, 11.0, 10.0, 9.0, 10.0, 12.0, 13.0, 12.0];

fn registries() -> (IndicatorRegistry, RuleRegistry) {
    (default_indicators().unwrap(), default_rules().unwrap())
}

fn loader() -> InMemoryBarSeriesLoader {
    InMemoryBarSeriesLoader::new().with_series("SPY", BarSeries::from_closes("SPY", &CLOSES))
}

fn tokens(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn boolean_rule(name: &str, value: bool) -> RuleConfig {
    RuleConfig::new(name, "boolean-rule", vec![ArgConfig::literal(value)])
}

fn bare_config(rules: Vec<RuleConfig>, entry: &[&str], exit: &[&str]) -> StrategyConfig {
    StrategyConfig {
        strategy_name: "test".into(),
        direction: TradeDirection::Buy,
        constants: Default::default(),
        bar_series: Vec::new(),
        trading_series: None,
        indicators: Vec::new(),
        rules,
        entry: tokens(entry),
        exit: tokens(exit),
    }
}

fn firing(rule: impl Fn(usize) -> bool) -> Vec<usize> {
    (0..CLOSES.len()).filter(|&i| rule(i)).collect()
}

const CROSSOVER_JSON: &str = r#"{
    "strategy_name": "close-over-sma",
    "constants": { "fast": 2 },
    "bar_series": [
        { "name": "spy", "instrument": "SPY", "interval": "1d" }
    ],
    "trading_series": "spy",
    "indicators": [
        { "name": "close", "type": "close-price-indicator", "args": [{ "bar-series": "spy" }] },
        { "name": "sma", "type": "sma-indicator", "args": [{ "indicator": "close" }, { "constant": "fast" }] }
    ],
    "rules": [
        { "name": "up", "type": "crossed-up-indicator-rule", "args": [{ "indicator": "close" }, { "indicator": "sma" }] },
        { "name": "down", "type": "crossed-down-indicator-rule", "args": [{ "indicator": "close" }, { "indicator": "sma" }] }
    ],
    "entry": ["up"],
    "exit": ["down"]
}"#;

// ──────────────────────────────────────────────
// End to end
// ──────────────────────────────────────────────

#[test]
fn sma_crossover_fires_on_expected_bars() {
    let (indicators, rules) = registries();
    let loader = loader();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let config = StrategyConfig::from_json(CROSSOVER_JSON).unwrap();
    let strategy = assembler.assemble_isolated(&config).unwrap();

    // sma(2) = [NaN, 10.5, 11.5, 11.5, 10.5, 9.5, 9.5, 11, 12.5, 12.5]
    assert_eq!(strategy.name(), "close-over-sma");
    assert_eq!(strategy.direction(), TradeDirection::Buy);
    assert_eq!(firing(|i| strategy.should_enter(i)), vec![6]);
    assert_eq!(firing(|i| strategy.should_exit(i)), vec![3, 9]);
    assert_eq!(strategy.series().unwrap().len(), CLOSES.len());
}

#[test]
fn moving_average_crossover_pair_folds_with_and() {
    let (indicators, rules) = registries();
    let loader = loader();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let mut config = StrategyConfig::from_json(CROSSOVER_JSON).unwrap();
    config.indicators.push(IndicatorConfig::new(
        "slow",
        "sma-indicator",
        vec![ArgConfig::indicator("close"), ArgConfig::literal(4)],
    ));
    config.rules = vec![
        RuleConfig::new(
            "golden",
            "crossed-up-indicator-rule",
            vec![ArgConfig::indicator("sma"), ArgConfig::indicator("slow")],
        ),
        RuleConfig::new(
            "above-slow",
            "over-indicator-rule",
            vec![ArgConfig::indicator("close"), ArgConfig::indicator("slow")],
        ),
        RuleConfig::new(
            "death",
            "crossed-down-indicator-rule",
            vec![ArgConfig::indicator("sma"), ArgConfig::indicator("slow")],
        ),
    ];
    config.entry = tokens(&["golden", "AND", "above-slow"]);
    config.exit = tokens(&["death"]);

    let strategy = assembler.assemble_isolated(&config).unwrap();

    // sma(2) = [NaN, 10.5, 11.5, 11.5, 10.5, 9.5, 9.5, 11, 12.5, 12.5]
    // sma(4) = [NaN, NaN, NaN, 11, 11, 10.5, 10, 10.25, 11, 11.75]
    // bar 3 has sma(2) above sma(4) but no earlier bar to cross from
    assert_eq!(firing(|i| strategy.should_enter(i)), vec![7]);
    assert_eq!(firing(|i| strategy.should_exit(i)), vec![4]);
}

#[test]
fn threshold_overload_is_selected_for_numeric_literal() {
    let (indicators, rules) = registries();
    let loader = loader();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let mut config = StrategyConfig::from_json(CROSSOVER_JSON).unwrap();
    config.rules = vec![
        RuleConfig::new(
            "up",
            "crossed-up-indicator-rule",
            vec![ArgConfig::indicator("close"), ArgConfig::literal(11.5)],
        ),
        RuleConfig::new(
            "down",
            "crossed-down-indicator-rule",
            vec![ArgConfig::indicator("close"), ArgConfig::literal(11.5)],
        ),
    ];

    let strategy = assembler.assemble_isolated(&config).unwrap();
    assert_eq!(firing(|i| strategy.should_enter(i)), vec![2, 7]);
    assert_eq!(firing(|i| strategy.should_exit(i)), vec![3]);
}

#[test]
fn assembly_leaves_built_components_in_scope() {
    let (indicators, rules) = registries();
    let loader = loader();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);
    let config = StrategyConfig::from_json(CROSSOVER_JSON).unwrap();

    let mut scope = EvaluationScope::new();
    assembler.assemble(&config, &mut scope).unwrap();

    assert!(scope.contains(Role::Constant, "fast"));
    assert!(scope.contains(Role::BarSeries, "spy"));
    assert!(scope.contains(Role::Indicator, "sma"));
    assert!(scope.contains(Role::Rule, "up"));

    // Reassembling in the same scope reuses cached instances
    let sma = Arc::clone(scope.indicators.get("sma").unwrap());
    assembler.assemble(&config, &mut scope).unwrap();
    assert!(Arc::ptr_eq(&sma, scope.indicators.get("sma").unwrap()));
}

// ──────────────────────────────────────────────
// Expression folding
// ──────────────────────────────────────────────

#[test]
fn entry_folds_left_to_right_for_every_combination() {
    let (indicators, rules) = registries();
    let loader = InMemoryBarSeriesLoader::new();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    for bits in 0..8u8 {
        let (a, b, c) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
        let config = bare_config(
            vec![
                boolean_rule("ruleA", a),
                boolean_rule("ruleB", b),
                boolean_rule("ruleC", c),
            ],
            &["ruleA", "AND", "ruleB", "OR", "ruleC"],
            &["ruleA", "OR", "ruleB", "AND", "ruleC"],
        );
        let strategy = assembler.assemble_isolated(&config).unwrap();
        assert_eq!(strategy.should_enter(0), (a && b) || c, "entry a={a} b={b} c={c}");
        assert_eq!(strategy.should_exit(0), (a || b) && c, "exit a={a} b={b} c={c}");
    }
}

#[test]
fn follow_ups_fold_into_the_named_rule() {
    let (indicators, rules) = registries();
    let loader = InMemoryBarSeriesLoader::new();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let combined = boolean_rule("combined", true)
        .with_follow_up(RuleOperator::Xor, boolean_rule("t", true))
        .with_follow_up(RuleOperator::Or, boolean_rule("f", false));
    let config = bare_config(vec![combined], &["combined"], &["combined", "XOR", "combined"]);

    let strategy = assembler.assemble_isolated(&config).unwrap();
    // (true XOR true) OR false
    assert!(!strategy.should_enter(0));
    assert!(!strategy.should_exit(0));
}

#[test]
fn malformed_expressions_are_rejected() {
    let (indicators, rules) = registries();
    let loader = InMemoryBarSeriesLoader::new();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);
    let rule_set = || vec![boolean_rule("a", true), boolean_rule("b", false)];

    let cases: [(&[&str], &[&str], ExpressionSide); 4] = [
        (&[], &["a"], ExpressionSide::Entry),
        (&["a"], &["a", "OR"], ExpressionSide::Exit),
        (&["a", "or", "b"], &["a"], ExpressionSide::Entry),
        (&["a"], &["XOR", "b"], ExpressionSide::Exit),
    ];

    for (entry, exit, expected_side) in cases {
        let err = assembler
            .assemble_isolated(&bare_config(rule_set(), entry, exit))
            .unwrap_err();
        match err {
            EngineError::InvalidExpression { side, reason } => {
                assert_eq!(side, expected_side, "{entry:?} / {exit:?}");
                match (entry.len(), reason) {
                    (0, ExpressionError::Empty) => {}
                    (_, ExpressionError::DanglingOperator { .. }) => assert_eq!(exit, ["a", "OR"]),
                    (_, ExpressionError::UnknownOperator { token, .. }) => assert_eq!(token, "or"),
                    (_, ExpressionError::OperatorAsOperand { token, .. }) => assert_eq!(token, "XOR"),
                    (_, other) => panic!("unexpected reason {other:?}"),
                }
            }
            other => panic!("expected InvalidExpression, got {other:?}"),
        }
    }
}

// ──────────────────────────────────────────────
// Failures
// ──────────────────────────────────────────────

#[test]
fn forward_reference_fails() {
    let (indicators, rules) = registries();
    let loader = loader();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let mut config = StrategyConfig::from_json(CROSSOVER_JSON).unwrap();
    config.indicators.reverse();

    let err = assembler.assemble_isolated(&config).unwrap_err();
    assert!(matches!(
        err,
        EngineError::UnresolvedReference { role: Role::Indicator, ref name } if name == "close"
    ));
}

#[test]
fn unknown_component_reports_kind_and_key() {
    let (indicators, rules) = registries();
    let loader = loader();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let mut config = StrategyConfig::from_json(CROSSOVER_JSON).unwrap();
    config.indicators[1] = IndicatorConfig::new(
        "sma",
        "unknown-xyz",
        vec![ArgConfig::indicator("close"), ArgConfig::literal(2)],
    );

    match assembler.assemble_isolated(&config).unwrap_err() {
        EngineError::UnknownComponent { kind, key } => {
            assert_eq!(kind, "indicator");
            assert_eq!(key, "unknown-xyz");
        }
        other => panic!("expected UnknownComponent, got {other:?}"),
    }
}

#[test]
fn missing_instrument_fails_bar_series_load() {
    let (indicators, rules) = registries();
    let loader = InMemoryBarSeriesLoader::new();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let config = StrategyConfig::from_json(CROSSOVER_JSON).unwrap();
    let err = assembler.assemble_isolated(&config).unwrap_err();
    assert!(matches!(err, EngineError::BarSeriesLoad { ref name, .. } if name == "spy"));
}

#[test]
fn missing_trading_series_is_unresolved() {
    let (indicators, rules) = registries();
    let loader = loader();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let mut config = StrategyConfig::from_json(CROSSOVER_JSON).unwrap();
    config.trading_series = Some("qqq".into());

    let err = assembler.assemble_isolated(&config).unwrap_err();
    assert!(matches!(
        err,
        EngineError::UnresolvedReference { role: Role::BarSeries, ref name } if name == "qqq"
    ));
}

#[test]
fn no_matching_constructor_lists_available_signatures() {
    let (indicators, rules) = registries();
    let loader = loader();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let mut config = StrategyConfig::from_json(CROSSOVER_JSON).unwrap();
    config.rules[0] = RuleConfig::new(
        "up",
        "crossed-up-indicator-rule",
        vec![ArgConfig::indicator("close"), ArgConfig::literal("high")],
    );

    match assembler.assemble_isolated(&config).unwrap_err() {
        EngineError::ComponentConstruction { name, source, .. } => {
            assert_eq!(name, "up");
            match source {
                ConstructionError::NoMatchingConstructor { available, .. } => {
                    assert!(available.contains("(indicator first, indicator second)"));
                    assert!(available.contains("(indicator indicator, num threshold)"));
                }
                other => panic!("expected NoMatchingConstructor, got {other:?}"),
            }
        }
        other => panic!("expected ComponentConstruction, got {other:?}"),
    }
}

// ──────────────────────────────────────────────
// Trading record
// ──────────────────────────────────────────────

#[test]
fn stop_loss_reads_seeded_trading_record() {
    let (indicators, rules) = registries();
    let loader = loader();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let mut config = StrategyConfig::from_json(CROSSOVER_JSON).unwrap();
    config.rules.push(RuleConfig::new(
        "stop",
        "stop-loss-rule",
        vec![
            ArgConfig::indicator("close"),
            ArgConfig::trading_record("record"),
            ArgConfig::literal(5),
        ],
    ));
    config.exit = tokens(&["down", "OR", "stop"]);

    let record = TradingRecord::shared(TradeDirection::Buy);
    let mut scope = EvaluationScope::new();
    scope.trading_records.put("record", Arc::clone(&record));

    let strategy = assembler.assemble(&config, &mut scope).unwrap();

    // Flat: only the crossover exits fire
    assert_eq!(firing(|i| strategy.should_exit(i)), vec![3, 9]);

    // Long from 11.0: 10.0 is a 9.1% loss, 9.0 an 18.2% loss
    record.write().enter(1, 11.0);
    assert_eq!(firing(|i| strategy.should_exit(i)), vec![0, 3, 4, 5, 6, 9]);
}

#[test]
fn trading_record_reference_must_be_seeded() {
    let (indicators, rules) = registries();
    let loader = loader();
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let mut config = StrategyConfig::from_json(CROSSOVER_JSON).unwrap();
    config.rules.push(RuleConfig::new(
        "stop",
        "stop-loss-rule",
        vec![
            ArgConfig::indicator("close"),
            ArgConfig::trading_record("record"),
            ArgConfig::literal(5),
        ],
    ));

    let err = assembler.assemble_isolated(&config).unwrap_err();
    assert!(matches!(
        err,
        EngineError::UnresolvedReference { role: Role::TradingRecord, .. }
    ));
}
