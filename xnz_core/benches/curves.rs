use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use xnz_core::config::{CalibrationCfg, SharesCfg};
use xnz_core::curves::map;
use xnz_core::{CurveVariant, EngineBuilder, HostMessage, ZoneModel};
use xnz_sim::SimHost;
use xnz_sim::aircraft::THROTTLE_RATIO_ALL;

// Noisy lever sweep from full reverse to full forward
fn lever_sweep(n: usize, noise_amp: f32, seed: u32) -> Vec<f32> {
    let mut state = seed.max(1);
    let mut next_f32 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        (x as f32) / (u32::MAX as f32 + 1.0)
    };
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            (t + (next_f32() * 2.0 - 1.0) * noise_amp).clamp(0.0, 1.0)
        })
        .collect()
}

fn group_settings(g: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>) {
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p xnz_core --bench curves
    match std::env::var("BENCH_SAMPLE_SIZE").ok().and_then(|s| s.parse::<usize>().ok()) {
        Some(n) => {
            g.sample_size(n.max(10));
        }
        None => {
            g.sample_size(50);
        }
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }
}

pub fn bench_curve_map(c: &mut Criterion) {
    let mut g = c.benchmark_group("curve_map");
    group_settings(&mut g);

    let sweep = lever_sweep(20_000, 0.01, 0xC0FFEE);
    let zones = ZoneModel::recompute(&CalibrationCfg::default()).with_shares(&SharesCfg::default());

    for variant in CurveVariant::ALL {
        g.bench_function(variant.name(), |b| {
            b.iter_batched(
                || sweep.clone(),
                |s| {
                    let sum: f32 = s.iter().map(|x| map(black_box(*x), &zones, variant)).sum();
                    black_box(sum);
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

pub fn bench_throttle_tick(c: &mut Criterion) {
    let mut g = c.benchmark_group("throttle_tick");
    group_settings(&mut g);

    let host = SimHost::laminar(2);
    let Ok(mut engine) = EngineBuilder::new().with_host(host.clone()).build() else {
        return;
    };
    if engine.enable().is_err() {
        return;
    }
    engine.handle_message(HostMessage::LiveryLoaded { user: true });
    let sweep = lever_sweep(1_000, 0.01, 0xBEEF);

    g.bench_function("generic_sweep", |b| {
        b.iter(|| {
            for x in &sweep {
                let _ = host.set_levers(*x, *x);
                black_box(engine.throttle_tick());
            }
            host.clear_events();
        })
    });
    g.finish();
    black_box(host.peek_f32(THROTTLE_RATIO_ALL).ok());
}

criterion_group!(curves, bench_curve_map, bench_throttle_tick);
criterion_main!(curves);
