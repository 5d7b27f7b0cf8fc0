//! Benchmarks for the APU hot paths
//!
//! Run with: cargo bench --bench apu

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rp2a03::{Apu, ApuBackend};
use std::hint::black_box;

fn playing_unit() -> Apu {
    let mut apu = Apu::new();
    apu.write(0x4000, 0x8F); // Pulse 1: 50% duty, full volume
    apu.write(0x4002, 0xB8);
    apu.write(0x4003, 0x01); // 440 Hz
    apu.write(0x4004, 0x4C); // Pulse 2: 25% duty
    apu.write(0x4005, 0x8A); // Sweep up, period 0, shift 2
    apu.write(0x4006, 0x70);
    apu.write(0x4007, 0x03);
    apu.write(0x400C, 0x0A); // Noise volume
    apu.write(0x400E, 0x04);
    apu.write(0x400F, 0x00);
    apu
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    let mut apu = playing_unit();

    for cycles in [1_000u32, 29_780].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(cycles), cycles, |b, &cycles| {
            b.iter(|| apu.step_cycles(black_box(cycles)));
        });
    }

    group.finish();
}

fn bench_frame_audio(c: &mut Criterion) {
    let mut apu = playing_unit();

    c.bench_function("generate_frame_audio_735_samples", |b| {
        b.iter(|| {
            apu.generate_frame_audio();
            black_box(apu.drain_buffer());
        });
    });
}

fn bench_register_writes(c: &mut Criterion) {
    let mut apu = Apu::new();

    c.bench_function("write_register", |b| {
        b.iter(|| {
            apu.write(black_box(0x4000), black_box(0x8F));
            apu.write(black_box(0x4002), black_box(0xB8));
            apu.write(black_box(0x4003), black_box(0x01));
            apu.write(black_box(0x4015), black_box(0x0F));
        });
    });
}

fn bench_emulated_frame(c: &mut Criterion) {
    let mut apu = playing_unit();

    c.bench_function("emulated_frame_with_overflowing_buffer", |b| {
        b.iter(|| {
            apu.step_cycles(29_780);
            apu.generate_frame_audio();
            black_box(apu.get_buffer().len());
        });
    });
}

criterion_group!(
    benches,
    bench_step,
    bench_frame_audio,
    bench_register_writes,
    bench_emulated_frame
);
criterion_main!(benches);
