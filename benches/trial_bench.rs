use criterion::{criterion_group, criterion_main, Criterion};

use encounter_sim::encounter::{run_trials, NullSink, TrialConfig};
use encounter_sim::roster::DemoRoster;

fn bench_demo_trials(c: &mut Criterion) {
    c.bench_function("demo_encounter_100_trials", |b| {
        b.iter(|| {
            let config = TrialConfig {
                trials: 100,
                seed: 42,
                parallel: false,
            };
            run_trials(&config, &DemoRoster, &mut NullSink).unwrap()
        })
    });
}

criterion_group!(benches, bench_demo_trials);
criterion_main!(benches);
