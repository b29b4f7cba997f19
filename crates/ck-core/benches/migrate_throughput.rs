//! Migration and splitter throughput regression guard benchmarks.
//!
//! These benchmarks isolate the hot conversion paths so CI can catch
//! regressions.
//!
//! Performance budgets:
//! - **migrate p95 < 50µs** (64-field profile, one filter field)
//! - **rule compile p95 < 30µs** (dynamic rule with one regex directive)
//! - **document split throughput > 100 MB/s** (BroadWorks export)

use std::collections::HashMap;
use std::fmt::Write as _;
use std::hint::black_box;

use ck_core::{CdrXmlSplitter, LegacyProfile, MigrationConfig, SubstitutionRule, migrate};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn bench_config() -> Criterion {
    Criterion::default().configure_from_args()
}

fn bench_profile(field_count: usize) -> LegacyProfile {
    let mut fields = HashMap::with_capacity(field_count);
    fields.insert("ReqType".to_string(), "*prepaid".to_string());
    fields.insert("Account".to_string(), "1001".to_string());
    for i in fields.len()..field_count {
        fields.insert(format!("field{i:03}"), format!("value{i:03}"));
    }
    LegacyProfile {
        tenant: "cgrates.com".to_string(),
        id: "1001".to_string(),
        masked: false,
        fields,
        weight: 10.0,
    }
}

/// Generate a BroadWorks-shaped export with `records` call records.
fn broadworks_doc(records: usize) -> String {
    let mut doc = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<broadWorksCDR>\n");
    for i in 0..records {
        let _ = write!(
            doc,
            "  <cdrData><basicModule>\
             <userNumber>10{:02}</userNumber>\
             <callingNumber>+49865171749{:02}</callingNumber>\
             <startTime>20160419210000.{i:03}</startTime>\
             </basicModule></cdrData>\n",
            i % 100,
            (i + 1) % 100,
        );
    }
    doc.push_str("</broadWorksCDR>\n");
    doc
}

// ---------------------------------------------------------------------------
// Group 1: Full profile migration at varying field counts
// ---------------------------------------------------------------------------

fn bench_migrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("migrate_profile");
    group.sample_size(100);

    let cfg = MigrationConfig::new("cgrates.org", vec!["Account".to_string()]);

    // Budget: p95 < 50µs at 64 fields
    for field_count in [4_usize, 16, 64] {
        let profile = bench_profile(field_count);
        group.throughput(Throughput::Elements(field_count as u64));
        group.bench_function(BenchmarkId::new("fields", field_count), |b| {
            b.iter(|| migrate(black_box(&profile), black_box(&cfg)));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Group 2: Substitution rule compile and evaluate
// ---------------------------------------------------------------------------

fn bench_substitution(c: &mut Criterion) {
    let mut group = c.benchmark_group("substitution");
    group.sample_size(100);

    group.bench_function("compile_literal", |b| {
        b.iter(|| SubstitutionRule::compile(black_box("call_1001")));
    });

    // Budget: p95 < 30µs (regex compilation dominates)
    group.bench_function("compile_dynamic", |b| {
        b.iter(|| SubstitutionRule::compile(black_box("~userName:s/^(\\d+)$/+49$1/")));
    });

    let rule = SubstitutionRule::compile("~userName:s/^(\\d+)$/+49$1/").expect("compile rule");
    let mut ctx = HashMap::new();
    ctx.insert("userName".to_string(), "4986517174963".to_string());
    group.bench_function("evaluate_dynamic", |b| {
        b.iter(|| rule.evaluate(black_box(&ctx)));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Group 3: CDR document split throughput
// ---------------------------------------------------------------------------

fn bench_cdr_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("cdr_split");
    group.sample_size(50);

    // Budget: > 100 MB/s on a well-formed export
    for records in [10_usize, 100, 1_000] {
        let doc = broadworks_doc(records);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_function(BenchmarkId::new("records", records), |b| {
            b.iter(|| {
                let mut splitter =
                    CdrXmlSplitter::open(black_box(doc.as_bytes())).expect("well-formed export");
                let mut drained = 0_usize;
                while let Some(batch) = splitter.next_batch() {
                    drained += batch.len();
                }
                drained
            });
        });
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = bench_config();
    targets = bench_migrate, bench_substitution, bench_cdr_split
);
criterion_main!(benches);
