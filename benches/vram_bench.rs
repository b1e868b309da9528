// VRAM Benchmarks
// Performance benchmarks for the deferred write queue and budgeted flush

use criterion::{criterion_group, criterion_main, Criterion};
use nes_gfx::memory::Vram;
use nes_gfx::vram::constants::NTSC_VBLANK_CPU_CYCLES;
use nes_gfx::vram::{WriteQueue, WriteRequest};
use std::hint::black_box;

/// Helper function to queue one frame of tile row updates
///
/// Sixteen 8-byte runs at 116 cycles each fit comfortably inside one
/// NTSC vblank budget.
fn fill_with_rows(queue: &mut WriteQueue) {
    for i in 0..16u16 {
        let addr = 0x2000 + i * 0x20;
        let data = (0..8).map(|j| (i as u8) * 8 + j).collect();
        queue
            .enqueue(WriteRequest::nametable(addr, data))
            .expect("queue has room");
    }
}

/// Benchmark enqueue throughput
fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("vram_enqueue");

    group.bench_function("fill_to_capacity", |b| {
        b.iter(|| {
            let mut queue = WriteQueue::new(64);
            for i in 0..64u16 {
                queue
                    .enqueue(WriteRequest::attribute(0x23C0 + (i & 0x3F), i as u8))
                    .expect("queue has room");
            }
            black_box(queue.len())
        });
    });

    group.bench_function("reject_when_full", |b| {
        let mut queue = WriteQueue::new(64);
        for i in 0..64u16 {
            queue
                .enqueue(WriteRequest::attribute(0x23C0 + (i & 0x3F), i as u8))
                .expect("queue has room");
        }

        b.iter(|| black_box(queue.enqueue(WriteRequest::attribute(0x23C0, 0)).is_err()));
    });

    group.finish();
}

/// Benchmark the flush path
/// This is what runs inside the vblank window, so it matters most
fn bench_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("vram_flush");

    group.bench_function("full_vblank_drain", |b| {
        let mut vram = Vram::new();

        b.iter(|| {
            let mut queue = WriteQueue::new(64);
            fill_with_rows(&mut queue);
            black_box(queue.flush(&mut vram, NTSC_VBLANK_CPU_CYCLES))
        });
    });

    group.bench_function("starved_vblank_carryover", |b| {
        let mut vram = Vram::new();

        b.iter(|| {
            let mut queue = WriteQueue::new(64);
            fill_with_rows(&mut queue);
            // Budget for only a few requests; the rest carry over
            black_box(queue.flush(&mut vram, 300))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_enqueue, bench_flush);
criterion_main!(benches);
