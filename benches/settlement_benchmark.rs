use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ledger_engine::resilience::replay::replay_state;
use ledger_engine::scenario::{generate_events, generate_requests, ScenarioConfig};
use ledger_engine::settlement::fees::{FeeSchedule, FeeTier};
use ledger_engine::settlement::pipeline::{PipelineConfig, SettlementPipeline};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn pipeline() -> SettlementPipeline {
    SettlementPipeline::new(PipelineConfig {
        reserve_ratio: dec!(0.05),
        leverage_cap: dec!(10),
        collateral: dec!(100_000_000),
        fee_schedule: FeeSchedule::new(vec![
            FeeTier::new(dec!(10_000), dec!(0.001)),
            FeeTier::new(dec!(1_000_000), dec!(0.0005)),
        ])
        .unwrap(),
    })
}

fn bench_pipeline_100_entries(c: &mut Criterion) {
    let config = ScenarioConfig {
        account_count: 10,
        entry_count: 100,
        ..Default::default()
    };
    let requests = generate_requests(&config);
    let pipeline = pipeline();

    c.bench_function("pipeline_100_entries", |b| {
        b.iter(|| pipeline.process(black_box(&requests)))
    });
}

fn bench_pipeline_10k_entries(c: &mut Criterion) {
    let config = ScenarioConfig {
        account_count: 100,
        entry_count: 10_000,
        ..Default::default()
    };
    let requests = generate_requests(&config);
    let pipeline = pipeline();

    c.bench_function("pipeline_10k_entries", |b| {
        b.iter(|| pipeline.process(black_box(&requests)))
    });
}

fn bench_replay_10k_events(c: &mut Criterion) {
    let config = ScenarioConfig {
        account_count: 100,
        entry_count: 10_000,
        ..Default::default()
    };
    let events = generate_events(&config);

    c.bench_function("replay_10k_events", |b| {
        b.iter(|| replay_state(Decimal::ZERO, Decimal::ZERO, 0, black_box(&events)))
    });
}

criterion_group!(
    benches,
    bench_pipeline_100_entries,
    bench_pipeline_10k_entries,
    bench_replay_10k_events
);
criterion_main!(benches);
