//! Restore Benchmarks
//!
//! Fuzzy matching flattens the whole content root on every call, so its
//! cost grows with document size. These benchmarks track that cost next to
//! the structural fast path.
//!
//! Run with: `cargo bench --bench restore`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use highlight_anchor::{
    create_anchor, fuzzy, AnchorConfig, AnchorDescriptor, AnchorResolver, Document, TextRange,
};

/// Build a chapter with `paragraphs` paragraphs of filler text and one
/// distinctive sentence near the end
fn create_chapter(paragraphs: usize) -> String {
    let mut markup = String::from("<html><head><title>Bench</title></head><body>");
    for i in 0..paragraphs {
        markup.push_str(&format!(
            "<p>Paragraph {} repeats the same <em>ordinary</em> words about reading and notes.</p>",
            i
        ));
        if i + 2 == paragraphs {
            markup.push_str("<p>The quick brown fox jumps over the lazy dog.</p>");
        }
    }
    markup.push_str("</body></html>");
    markup
}

fn target_anchor(doc: &Document) -> AnchorDescriptor {
    let body = doc.body().expect("chapter has a body");
    let text = doc.text_content(body);
    let byte = text.find("quick brown").expect("target sentence present");
    let start = text[..byte].chars().count();
    let range = TextRange::from_offsets(doc, start, start + 11).expect("valid range");
    create_anchor(doc, &range).expect("anchor created")
}

fn bench_fuzzy_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("fuzzy_restore");
    group.measurement_time(Duration::from_secs(10));

    for paragraphs in [10, 100, 1000] {
        let doc = Document::parse(&create_chapter(paragraphs)).expect("valid markup");
        let anchor = target_anchor(&doc);
        let config = AnchorConfig::default();
        let chars = doc.text_content(doc.content_root()).chars().count();

        group.throughput(Throughput::Elements(chars as u64));
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &doc, |b, doc| {
            b.iter(|| fuzzy::restore(black_box(doc), black_box(&anchor), &config))
        });
    }

    group.finish();
}

fn bench_resolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let doc = Document::parse(&create_chapter(1000)).expect("valid markup");
    let anchor = target_anchor(&doc);
    let resolver = AnchorResolver::default();

    group.bench_function("structural", |b| {
        b.iter(|| resolver.resolve(black_box(&doc), black_box(&anchor)))
    });

    // Without addresses only the fuzzy strategy can succeed
    let text_only = AnchorDescriptor {
        structural: None,
        tag_index: None,
        ..anchor.clone()
    };
    group.bench_function("fuzzy_fallback", |b| {
        b.iter(|| resolver.resolve(black_box(&doc), black_box(&text_only)))
    });

    group.finish();
}

criterion_group!(benches, bench_fuzzy_restore, bench_resolver);
criterion_main!(benches);
