//! Detection Performance Benchmarks
//!
//! The engine runs inline on every database query and outbound request, so
//! the target is well under a millisecond per call (≤0.05 ms average on
//! typical payloads).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use zentinel_rasp::{
    detect_path_traversal, detect_shell_injection, detect_sql_injection, detect_ssrf,
    Blocklist, Dialect, RateLimiter,
};

/// Representative (name, query, input) SQL cases.
fn sql_cases() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        (
            "benign_quoted",
            "SELECT * FROM users WHERE name = 'John Doe' AND active = 1",
            "John Doe",
        ),
        (
            "benign_numeric_list",
            "SELECT * FROM users WHERE id IN (1, 2, 3)",
            "1, 2, 3",
        ),
        (
            "boolean_injection",
            "SELECT * FROM users WHERE id = 1 OR 1=1",
            "1 OR 1=1",
        ),
        (
            "stacked_statement",
            "SELECT * FROM users WHERE id = 1; DROP TABLE users",
            "1; DROP TABLE users",
        ),
        (
            "comment_breakout",
            "SELECT * FROM users WHERE name = 'admin' -- ' AND active = 1",
            "admin' -- ",
        ),
    ]
}

fn benchmark_sql_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_detection");

    for (name, query, input) in sql_cases() {
        group.throughput(Throughput::Bytes(query.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("mysql", name),
            &(query, input),
            |b, (query, input)| {
                b.iter(|| {
                    detect_sql_injection(black_box(query), black_box(input), Dialect::MySql)
                })
            },
        );
    }

    // Long benign statement, worst case for the tokenizer.
    let long_query = format!(
        "SELECT a, b, c FROM events WHERE label = '{}' ORDER BY created_at DESC",
        "x y ".repeat(200)
    );
    let long_input = "x y ".repeat(200);
    group.throughput(Throughput::Bytes(long_query.len() as u64));
    group.bench_function("mysql/long_benign", |b| {
        b.iter(|| {
            detect_sql_injection(
                black_box(&long_query),
                black_box(&long_input),
                Dialect::MySql,
            )
        })
    });

    group.finish();
}

fn benchmark_shell_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("shell_detection");

    let cases = [
        ("benign_quoted", "binary --domain 'www.example.com'", "www.example.com"),
        ("metachar", "ls; rm -rf /", "; rm -rf /"),
        ("command_token", "ls\nwhoami", "whoami"),
    ];

    for (name, command, input) in cases {
        group.bench_function(name, |b| {
            b.iter(|| detect_shell_injection(black_box(command), black_box(input)))
        });
    }

    group.finish();
}

fn benchmark_ssrf_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("ssrf_detection");

    let cases = [
        ("private", "http://10.0.0.1/latest/meta-data", "10.0.0.1"),
        ("public", "http://74.125.133.99/index.html", "74.125.133.99"),
        ("obfuscated", "http://0x7f000001/", "0x7f000001"),
    ];

    for (name, input, hostname) in cases {
        group.bench_function(name, |b| {
            b.iter(|| detect_ssrf(black_box(input), black_box(hostname)))
        });
    }

    group.finish();
}

fn benchmark_path_traversal(c: &mut Criterion) {
    c.bench_function("path_traversal", |b| {
        b.iter(|| {
            detect_path_traversal(
                black_box("/app/uploads/../../etc/passwd"),
                black_box("../../etc/passwd"),
            )
        })
    });
}

fn benchmark_rate_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("rate_limiter");
    let window = Duration::from_secs(60);

    // Repeated hits on one hot key.
    group.bench_function("hot_key", |b| {
        let mut limiter = RateLimiter::new(5000);
        b.iter(|| limiter.is_allowed(black_box("client:hot"), window, 1_000_000))
    });

    // Continuous unique keys, exercising eviction.
    group.bench_function("unique_key_churn", |b| {
        let mut limiter = RateLimiter::new(5000);
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            limiter.is_allowed(black_box(&format!("client:{i}")), window, 100)
        })
    });

    group.finish();
}

fn benchmark_blocklist(c: &mut Criterion) {
    let mut blocklist = Blocklist::new();
    for entry in ["10.0.0.0/8", "192.168.0.0/16", "fc00::/7", "1.2.3.4"] {
        blocklist.add(entry);
    }

    let mut group = c.benchmark_group("blocklist");
    group.bench_function("hit", |b| {
        b.iter(|| blocklist.check(black_box("192.168.2.240")))
    });
    group.bench_function("miss", |b| b.iter(|| blocklist.check(black_box("8.8.8.8"))));
    group.finish();
}

criterion_group!(
    benches,
    benchmark_sql_detection,
    benchmark_shell_detection,
    benchmark_ssrf_detection,
    benchmark_path_traversal,
    benchmark_rate_limiter,
    benchmark_blocklist,
);

criterion_main!(benches);
