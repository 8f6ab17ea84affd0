// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

use criterion::{criterion_group, criterion_main, Criterion};
use hillwatch::{
    io::{hills_io::parse_hills_block, log_io::parse_last_progress},
    structures::hills::HillsSeries,
};

fn hills_text(n_rows: usize) -> String {
    let mut text = String::from("#! FIELDS time cv1 cv2 sigma_cv1 sigma_cv2 height biasf\n");
    for i in 0..n_rows {
        let t = i as f64;
        text.push_str(&format!(
            "{:>12.3} {:>12.6} {:>12.6} 0.35 0.35 {:>12.6} 10\n",
            t * 2.0,
            t.sin(),
            t.cos(),
            1.2 * (-t / 10000.0).exp()
        ));
    }
    text
}

fn log_text(n_reports: usize) -> String {
    let mut text = String::new();
    for i in 0..n_reports {
        text.push_str(&format!(
            "           Step           Time\n{:>15}{:>15.5}\n\n   Energies (kJ/mol)\n          Angle    Proper Dih.  Ryckaert-Bell.          LJ-14     Coulomb-14\n    9.74139e+03    4.34956e+02    2.22067e+03   -4.76265e+02    5.17819e+04\n\n",
            i * 5000,
            i as f64 * 10.0
        ));
    }
    text
}

fn benchmark(c: &mut Criterion) {
    let hills = hills_text(50_000);

    c.bench_function("parse_hills_block (50k rows)", |b| {
        b.iter(|| {
            std::hint::black_box(parse_hills_block(&hills, Some(7)).unwrap());
        })
    });

    let block = parse_hills_block(&hills, None).unwrap();
    let series = HillsSeries::from(block);

    c.bench_function("HillsSeries::slices (50k rows)", |b| {
        b.iter(|| {
            std::hint::black_box(series.slices());
        })
    });

    let log = log_text(10_000);

    c.bench_function("parse_last_progress (10k reports)", |b| {
        b.iter(|| {
            std::hint::black_box(parse_last_progress(&log).unwrap());
        })
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
