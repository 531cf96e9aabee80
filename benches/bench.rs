use criterion::{criterion_group, criterion_main, Criterion};
use powertools_metrics_emf::MetricUnit;

fn criterion_benchmark(c: &mut Criterion) {
    let metrics = powertools_metrics_emf::Builder::new()
        .cloudwatch_namespace("ServerlessAirline")
        .service("booking")
        .with_writer(std::io::sink())
        .build()
        .unwrap();

    c.bench_function("flush", |b| {
        b.iter(|| {
            metrics.add_metric("BookingConfirmation", MetricUnit::Count, 1).unwrap();
            metrics.add_metric("PaymentLatency", MetricUnit::Milliseconds, 2.5).unwrap();
            metrics.add_metric("SeatUtilization", MetricUnit::Percent, 7).unwrap();
            metrics.add_metadata("booking_id", "7051cd10").flush().unwrap()
        })
    });

    c.bench_function("add_metric_with_auto_flush", |b| {
        let mut i = 0u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            metrics.add_metric(format!("metric_{}", i % 150), MetricUnit::Count, i).unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
