use criterion::{Criterion, criterion_group, criterion_main};
use native_test_runner::core::facade::{boost, google};
use native_test_runner::core::models::CaseId;
use std::hint::black_box;

fn gtest_listing(suites: usize, cases: usize) -> String {
    let mut text = String::from("Running main() from gtest_main.cc\n");
    for s in 0..suites {
        text.push_str(&format!("Suite{s}.  # TypeParam = int\n"));
        for c in 0..cases {
            text.push_str(&format!("  Case{c}/0  # GetParam() = {c}\n"));
        }
    }
    text
}

fn boost_listing(suites: usize, cases: usize) -> String {
    let mut text = String::new();
    for s in 0..suites {
        text.push_str(&format!("Suite{s}*\n"));
        for c in 0..cases {
            text.push_str(&format!("    case_{c}*: checks value {c}\n"));
        }
    }
    text
}

fn boost_log(records: usize) -> String {
    let mut text = String::from("Running 1 test case...\n");
    for r in 0..records {
        text.push_str(&format!(
            "math_test.cpp({r}): error: in \"Suite/case\": check a == b has failed [{r} != 0]\n\
             Mismatch at position {r}\n"
        ));
    }
    text.push_str("\n*** failures are detected in the test module \"Math\"\n");
    text
}

fn bench_parsers(c: &mut Criterion) {
    let gtest = gtest_listing(50, 40);
    let boost_tree = boost_listing(50, 40);
    let log = boost_log(200);
    let report = format!(
        r#"{{"testsuites":[{{"name":"Suite","testsuite":[{{"name":"case","result":"COMPLETED","failures":[{}]}}]}}]}}"#,
        (0..200)
            .map(|i| format!(r#"{{"failure":"math_test.cc:{i}\nExpected: true"}}"#))
            .collect::<Vec<_>>()
            .join(",")
    );
    let case = CaseId::from("Suite.case");

    c.bench_function("google_parse_listing", |b| {
        b.iter(|| google::parse_listing(black_box(&gtest)))
    });
    c.bench_function("google_parse_report", |b| {
        b.iter(|| google::parse_report(&case, black_box(&report)))
    });
    c.bench_function("boost_parse_listing", |b| {
        b.iter(|| boost::parse_listing(black_box(&boost_tree)))
    });
    c.bench_function("boost_parse_log", |b| b.iter(|| boost::parse_log(black_box(&log))));
}

criterion_group!(benches, bench_parsers);
criterion_main!(benches);
