//! Benchmarks for wide event assembly and rendering.
//!
//! Flushing sits on every request's completion path, so both render modes
//! should stay well under a millisecond for typical records.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use std::io;
use wide_event::event::WideEvent;
use wide_event::render::RenderMode;
use wide_event::sink::{EventSink, Stream};

/// Drops output so the benchmark measures assembly and rendering only.
struct DiscardSink;

impl EventSink for DiscardSink {
    fn write(&self, _stream: Stream, output: &str) -> io::Result<()> {
        black_box(output);
        Ok(())
    }
}

fn populated_event(mode: RenderMode) -> WideEvent {
    let mut event = WideEvent::new("bench-req", "POST", "/checkout", mode).with_ansi(false);
    event.set("user", &json!({"id": 42, "email": "bench@example.com", "plan": "pro"}));
    event.set(
        "cart",
        &json!({"items": [{"sku": "A1", "qty": 2}, {"sku": "B2", "qty": 1}], "total": 19.99}),
    );
    event.set("payment", &json!({"provider": "card", "latency_ms": 120}));
    event.error(&json!({"type": "PaymentDeclined", "message": "Insufficient funds"}));
    event
}

fn bench_flush_json(c: &mut Criterion) {
    let sink = DiscardSink;
    c.bench_function("flush_json", |b| {
        b.iter(|| {
            let event = populated_event(RenderMode::Json);
            black_box(event.flush_to(402, &sink)).ok();
        })
    });
}

fn bench_flush_pretty(c: &mut Criterion) {
    let sink = DiscardSink;
    c.bench_function("flush_pretty", |b| {
        b.iter(|| {
            let event = populated_event(RenderMode::Pretty);
            black_box(event.flush_to(402, &sink)).ok();
        })
    });
}

criterion_group!(benches, bench_flush_json, bench_flush_pretty);
criterion_main!(benches);
