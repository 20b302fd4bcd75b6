//! Evaluation-scope isolation across threads and resets.

use std::sync::{Arc, Barrier};
use std::thread;

use stratlab_core::cache::Role;
use stratlab_core::components::indicator::default_registry as default_indicators;
use stratlab_core::components::rule::default_registry as default_rules;
use stratlab_core::config::{ArgConfig, IndicatorConfig, RuleConfig, StrategyConfig};
use stratlab_core::data::InMemoryBarSeriesLoader;
use stratlab_core::domain::{BarSeries, TradeDirection};
use stratlab_core::{EvaluationScope, StrategyAssembler};

fn threshold_config(name: &str, threshold: f64) -> StrategyConfig {
    StrategyConfig {
        strategy_name: name.into(),
        direction: TradeDirection::Buy,
        constants: [("threshold".to_string(), threshold.to_string())].into(),
        bar_series: serde_json::from_str(
            r#"[{ "name": "s", "instrument": "SYN", "interval": "1d" }]"#,
        )
        .unwrap(),
        trading_series: Some("s".into()),
        indicators: vec![IndicatorConfig::new(
            "close",
            "close-price-indicator",
            vec![ArgConfig::bar_series("s")],
        )],
        rules: vec![
            RuleConfig::new(
                "above",
                "over-indicator-rule",
                vec![ArgConfig::indicator("close"), ArgConfig::constant("threshold")],
            ),
            RuleConfig::new(
                "below",
                "under-indicator-rule",
                vec![ArgConfig::indicator("close"), ArgConfig::constant("threshold")],
            ),
        ],
        entry: vec!["above".into()],
        exit: vec!["below".into()],
    }
}

#[test]
fn each_thread_sees_only_its_own_scope() {
    let handles: Vec<_> = (0..2)
        .map(|t| {
            thread::spawn(move || {
                let mut scope = EvaluationScope::new();
                let value = format!("thread-{t}");
                scope.constants.put("k", value.clone());
                thread::yield_now();
                assert_eq!(scope.constants.get("k"), Some(&value));
                assert_eq!(scope.constants.len(), 1);
                scope.id()
            })
        })
        .collect();

    let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn reset_in_one_scope_leaves_a_concurrent_scope_intact() {
    let barrier = Arc::new(Barrier::new(2));

    let spawn = |value: &'static str, resets: bool| {
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            let mut scope = EvaluationScope::new();
            scope.constants.put("k", value.to_string());
            // Both scopes hold "k" before either resets
            barrier.wait();
            if resets {
                scope.reset();
            }
            // The reset has happened before either scope is read
            barrier.wait();
            scope.constants.get("k").cloned()
        })
    };

    let a = spawn("X", true);
    let b = spawn("Y", false);

    assert_eq!(a.join().unwrap(), None);
    assert_eq!(b.join().unwrap(), Some("Y".to_string()));
}

#[test]
fn reset_clears_every_role_and_rebuilds_fresh() {
    let indicators = default_indicators().unwrap();
    let rules = default_rules().unwrap();
    let loader = InMemoryBarSeriesLoader::new()
        .with_series("SYN", BarSeries::from_closes("SYN", &[1.0, 2.0, 3.0]));
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);
    let config = threshold_config("reset", 1.5);

    let mut scope = EvaluationScope::new();
    assembler.assemble(&config, &mut scope).unwrap();
    let before = Arc::clone(scope.indicators.get("close").unwrap());

    scope.reset();
    assert!(scope.is_empty());
    for role in [Role::Constant, Role::BarSeries, Role::Indicator, Role::Rule] {
        assert!(!scope.contains(role, "close") && !scope.contains(role, "s"));
    }

    assembler.assemble(&config, &mut scope).unwrap();
    let after = scope.indicators.get("close").unwrap();
    assert!(!Arc::ptr_eq(&before, after));
}

#[test]
fn same_scope_returns_identical_instances() {
    let indicators = default_indicators().unwrap();
    let rules = default_rules().unwrap();
    let loader = InMemoryBarSeriesLoader::new()
        .with_series("SYN", BarSeries::from_closes("SYN", &[1.0, 2.0, 3.0]));
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let mut scope = EvaluationScope::new();
    let first = assembler
        .assemble(&threshold_config("a", 1.5), &mut scope)
        .unwrap();
    let second = assembler
        .assemble(&threshold_config("a", 1.5), &mut scope)
        .unwrap();

    assert!(Arc::ptr_eq(first.entry(), second.entry()));
    assert!(Arc::ptr_eq(first.series().unwrap(), second.series().unwrap()));
}

#[test]
fn concurrent_assembly_with_shared_registries() {
    let indicators = default_indicators().unwrap();
    let rules = default_rules().unwrap();
    let loader = InMemoryBarSeriesLoader::new()
        .with_series("SYN", BarSeries::from_closes("SYN", &[1.0, 2.0, 3.0, 4.0, 5.0]));
    let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

    let thresholds = [1.5, 2.5, 3.5, 4.5];
    let entries: Vec<Vec<usize>> = thread::scope(|s| {
        let handles: Vec<_> = thresholds
            .iter()
            .map(|&threshold| {
                s.spawn(move || {
                    let mut scope = EvaluationScope::new();
                    let strategy = assembler
                        .assemble(&threshold_config("c", threshold), &mut scope)
                        .unwrap();
                    (0..5).filter(|&i| strategy.should_enter(i)).collect()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(entries[0], vec![1, 2, 3, 4]);
    assert_eq!(entries[1], vec![2, 3, 4]);
    assert_eq!(entries[2], vec![3, 4]);
    assert_eq!(entries[3], vec![4]);
}
