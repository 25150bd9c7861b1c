use criterion::{criterion_group, criterion_main, Criterion};
use pebble_core::gb::GameBoy;

fn benchmark_cpu_tick(c: &mut Criterion) {
    let rom = vec![0u8; 0x8000];
    let mut gb = GameBoy::new(&rom).unwrap();

    c.bench_function("gb_tick_one_frame", |b| {
        b.iter(|| {
            gb.tick(1.0 / 60.0, [false; 8]);
        })
    });
}

criterion_group!(benches, benchmark_cpu_tick);
criterion_main!(benches);
