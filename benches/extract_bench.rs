use std::fmt::Write;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use punchlog_core::extraction::{ExtractOptions, RecordExtractor};
use punchlog_core::logging::LogContext;

/// A listing page with a table, a `<pre>` dump and some chrome around it.
fn synthetic_listing(rows: usize) -> String {
    let mut html = String::from("<html><head><title>View</title></head><body>\n<table border=1>\n");
    html.push_str("<tr><td>EmpCode</td><td>Time</td><td>Verify</td><td>Status</td><td>WorkCode</td></tr>\n");
    for i in 0..rows {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>2024-01-{:02} {:02}:{:02}:00</td><td>1</td><td>{}</td><td>1</td></tr>",
            100 + i % 250,
            1 + i % 28,
            i % 24,
            i % 60,
            i % 2
        );
    }
    html.push_str("</table>\n<pre>\n");
    for i in 0..rows / 4 {
        let _ = writeln!(html, "{}\t{}\t15\t0\t1", 500 + i, 1_704_067_200 + i * 60);
    }
    html.push_str("</pre>\n</body></html>");
    html
}

fn bench_extract(c: &mut Criterion) {
    let extractor = RecordExtractor::default();
    let options = ExtractOptions::default();
    let ctx = LogContext::new("fetch-bench").with_device("SN001");

    for rows in [100, 2_000] {
        let payload = synthetic_listing(rows);
        c.bench_function(&format!("extract.mixed_listing.{}_rows", rows), |b| {
            b.iter(|| extractor.extract(black_box(&payload), "SN001", &options, &ctx));
        });
    }
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
