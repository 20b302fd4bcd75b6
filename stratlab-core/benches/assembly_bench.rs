//! Criterion benchmarks for strategy construction hot paths.
//!
//! Benchmarks:
//! 1. Full assembly in a fresh scope (load, build, fold)
//! 2. Re-assembly in a warm scope (cache hits only)
//! 3. Entry/exit evaluation over every bar of an assembled strategy

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stratlab_core::components::indicator::default_registry as default_indicators;
use stratlab_core::components::rule::default_registry as default_rules;
use stratlab_core::config::StrategyConfig;
use stratlab_core::data::InMemoryBarSeriesLoader;
use stratlab_core::domain::BarSeries;
use stratlab_core::{EvaluationScope, StrategyAssembler};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

const CONFIG: &str = r#"{
    "strategy_name": "bench",
    "constants": { "fast": 10, "slow": 50, "oversold": 30 },
    "bar_series": [{ "name": "s", "instrument": "SYN", "interval": "1d" }],
    "trading_series": "s",
    "indicators": [
        { "name": "close", "type": "close-price-indicator", "args": [{ "bar-series": "s" }] },
        { "name": "fast", "type": "ema-indicator", "args": [{ "indicator": "close" }, { "constant": "fast" }] },
        { "name": "slow", "type": "sma-indicator", "args": [{ "indicator": "close" }, { "constant": "slow" }] },
        { "name": "rsi", "type": "rsi-indicator", "args": [{ "indicator": "close" }, { "literal": 14 }] }
    ],
    "rules": [
        { "name": "cross-up", "type": "crossed-up-indicator-rule", "args": [{ "indicator": "fast" }, { "indicator": "slow" }] },
        { "name": "cross-down", "type": "crossed-down-indicator-rule", "args": [{ "indicator": "fast" }, { "indicator": "slow" }] },
        { "name": "oversold", "type": "under-indicator-rule", "args": [{ "indicator": "rsi" }, { "constant": "oversold" }] }
    ],
    "entry": ["cross-up", "OR", "oversold"],
    "exit": ["cross-down"]
}"#;

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_assembly(c: &mut Criterion) {
    let indicators = default_indicators().unwrap();
    let rules = default_rules().unwrap();
    let config = StrategyConfig::from_json(CONFIG).unwrap();

    let mut group = c.benchmark_group("assembly");
    for n in [500usize, 5_000] {
        let loader = InMemoryBarSeriesLoader::new()
            .with_series("SYN", BarSeries::from_closes("SYN", &make_closes(n)));
        let assembler = StrategyAssembler::new(&indicators, &rules, &loader);

        group.bench_with_input(BenchmarkId::new("fresh_scope", n), &n, |b, _| {
            b.iter(|| black_box(assembler.assemble_isolated(black_box(&config)).unwrap()))
        });

        let mut scope = EvaluationScope::new();
        assembler.assemble(&config, &mut scope).unwrap();
        group.bench_with_input(BenchmarkId::new("warm_scope", n), &n, |b, _| {
            b.iter(|| black_box(assembler.assemble(black_box(&config), &mut scope).unwrap()))
        });
    }
    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let indicators = default_indicators().unwrap();
    let rules = default_rules().unwrap();
    let config = StrategyConfig::from_json(CONFIG).unwrap();
    let n = 5_000;
    let loader = InMemoryBarSeriesLoader::new()
        .with_series("SYN", BarSeries::from_closes("SYN", &make_closes(n)));
    let strategy = StrategyAssembler::new(&indicators, &rules, &loader)
        .assemble_isolated(&config)
        .unwrap();

    c.bench_function("evaluate_all_bars", |b| {
        b.iter(|| {
            let mut signals = 0usize;
            for i in 0..n {
                if strategy.should_enter(black_box(i)) || strategy.should_exit(i) {
                    signals += 1;
                }
            }
            black_box(signals)
        })
    });
}

criterion_group!(benches, bench_assembly, bench_evaluation);
criterion_main!(benches);
