// Benchmark for interval packing and week rendering
// Measures how layout scales with busy clinic days

use chrono::{Duration, Local, TimeZone};
use clinic_scheduler::grid::packing::IntervalPacker;
use clinic_scheduler::grid::render::WeekRenderer;
use clinic_scheduler::grid::style::GridTheme;
use clinic_scheduler::models::appointment::Appointment;
use clinic_scheduler::models::settings::GridSettings;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Deterministic, heavily overlapping day of `count` appointments
fn busy_day(count: usize) -> Vec<Appointment> {
    let base = Local.with_ymd_and_hms(2024, 3, 6, 8, 0, 0).unwrap();
    (0..count)
        .map(|index| {
            let start = base + Duration::minutes(((index * 37) % 540) as i64);
            let length = 15 + ((index * 13) % 90) as i64;
            Appointment::builder()
                .id(format!("appt-{}", index))
                .patient("Patient")
                .start(start)
                .end(start + Duration::minutes(length))
                .build_unchecked()
                .unwrap()
        })
        .collect()
}

fn bench_pack_day(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_day");
    let packer = IntervalPacker::default();

    for count in [10usize, 100, 1000] {
        let appointments = busy_day(count);
        let refs: Vec<&Appointment> = appointments.iter().collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &refs, |b, refs| {
            b.iter(|| packer.pack(black_box(refs)));
        });
    }

    group.finish();
}

fn bench_render_week(c: &mut Criterion) {
    let renderer = WeekRenderer::new(GridSettings::default(), GridTheme::light()).unwrap();
    let appointments = busy_day(200);
    let anchor = appointments[0].start.date_naive();
    let now = Local.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap();

    c.bench_function("render_week_200", |b| {
        b.iter(|| renderer.render_week(black_box(anchor), black_box(&appointments), 1200.0, now));
    });
}

criterion_group!(benches, bench_pack_day, bench_render_week);
criterion_main!(benches);
