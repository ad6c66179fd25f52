use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ronbun_core::engine::EssayResult;
use ronbun_core::features::{repetition_count, FeatureSet};
use ronbun_core::score_essay;
use ronbun_core::statistics::compute_aggregate_stats;

const THEME: &str = "デジタル社会における民主主義の課題と可能性について論じなさい。";

fn sample_essay(paragraphs: usize) -> String {
    let body = [
        "デジタル社会における民主主義について、私は参加の機会が広がると考える。",
        "例えば、オンライン投票の導入によって投票率は30%向上したという報告がある。そのため、若い世代の政治参加が促されると期待できる。",
        "しかし、情報の偏りや誤情報の拡散という問題も存在する。その結果、社会の分断が深まる危険性も否定できない。",
        "以上のように、デジタル技術は民主主義に新たな可能性をもたらす。",
    ];
    (0..paragraphs)
        .map(|i| body[i % body.len()])
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_score_essay(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_essay");

    let short = sample_essay(4);
    let long = sample_essay(40);

    group.bench_function("empty", |b| b.iter(|| score_essay(black_box(""), black_box(THEME))));

    group.bench_function("4_paragraphs", |b| {
        b.iter(|| score_essay(black_box(&short), black_box(THEME)))
    });

    group.bench_function("40_paragraphs", |b| {
        b.iter(|| score_essay(black_box(&long), black_box(THEME)))
    });

    group.finish();
}

fn bench_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("features");

    let essay = sample_essay(12);
    let repetitive = "同じ表現を何度も繰り返す".repeat(50);

    group.bench_function("extract", |b| {
        b.iter(|| FeatureSet::extract(black_box(&essay), black_box(THEME)))
    });

    group.bench_function("repetition_scan", |b| {
        b.iter(|| repetition_count(black_box(&repetitive)))
    });

    // One unbroken line with no repeats.
    let mut rng = fastrand::Rng::with_seed(1);
    let single_line: String = (0..20_000)
        .map(|_| char::from_u32(0x4E00 + rng.u32(..3000)).unwrap_or('字'))
        .collect();
    group.bench_function("repetition_scan_single_line_20k", |b| {
        b.iter(|| repetition_count(black_box(&single_line)))
    });

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let results: Vec<EssayResult> = (0..100)
        .map(|i| {
            let score = score_essay(&sample_essay(1 + i % 6), THEME);
            EssayResult {
                essay_id: format!("essay-{i}"),
                theme: THEME.into(),
                character_count: 0,
                time_spent_secs: 0,
                time_limit_minutes: 90,
                overtime: false,
                grade: score.grade(),
                score,
            }
        })
        .collect();

    c.bench_function("aggregate_100", |b| {
        b.iter(|| compute_aggregate_stats(black_box(&results)))
    });
}

criterion_group!(benches, bench_score_essay, bench_features, bench_aggregate);
criterion_main!(benches);
