use criterion::{criterion_group, criterion_main, Criterion};
use run_tracker::models::{RawSample, RawWorkout};
use run_tracker::services::enricher::enrich_all;
use std::hint::black_box;

/// Roughly five years of daily runs with a VO2 reading every few hours.
fn build_inputs() -> (Vec<RawWorkout>, Vec<RawSample>) {
    let base = chrono::NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();

    let workouts = (0..1800)
        .map(|day| {
            let date = base + chrono::Duration::days(day);
            let mut w = RawWorkout::default();
            w.attributes.insert(
                "startDate".to_string(),
                format!("{} 06:00:00 -0500", date),
            );
            w.attributes
                .insert("endDate".to_string(), format!("{} 07:10:00 -0500", date));
            w.attributes
                .insert("duration".to_string(), "70".to_string());
            w
        })
        .collect();

    let samples = (0..1800 * 6)
        .map(|i| {
            let date = base + chrono::Duration::days(i / 6);
            RawSample {
                value: 40.0 + (i % 10) as f64,
                creation_date: format!("{} {:02}:30:00 -0500", date, (i % 6) * 4),
            }
        })
        .collect();

    (workouts, samples)
}

fn benchmark_enrich(c: &mut Criterion) {
    let (workouts, samples) = build_inputs();

    c.bench_function("enrich_five_years", |b| {
        b.iter(|| enrich_all(black_box(&workouts), black_box(&samples)))
    });
}

criterion_group!(benches, benchmark_enrich);
criterion_main!(benches);
