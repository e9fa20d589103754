//! Benchmarks for phrase extraction.
//!
//! Measures the full pipeline on documents of increasing length, plus the
//! candidate generator alone on a single long sentence (the O(L^3) worst case
//! bounded by the phrase-length cap).
//!
//! Run with: cargo bench --bench extraction

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rapid_phrases::{
    ExtractOptions, IdfTable, LexicalResources, LexiconTagger, PhraseExtractor,
    PunctuationSplitter, StopwordFilter,
};
use std::sync::Arc;

const SENTENCE: &str = "巴黎圣母院当晚发生火灾，大火烧毁了教堂的尖塔。\
    消防员在现场扑灭大火，火灾原因正在调查。";

const LEXICON: &[(&str, &str, f64)] = &[
    ("巴黎圣母院", "ns", 12.5),
    ("当晚", "t", 6.1),
    ("发生", "v", 3.2),
    ("火灾", "n", 8.4),
    ("大火", "n", 7.7),
    ("烧毁", "v", 9.0),
    ("教堂", "n", 8.8),
    ("尖塔", "n", 11.2),
    ("消防员", "n", 9.3),
    ("现场", "s", 5.8),
    ("扑灭", "v", 9.6),
    ("原因", "n", 4.4),
    ("调查", "vn", 5.2),
    ("了", "ul", 1.0),
    ("的", "uj", 1.0),
    ("在", "p", 1.0),
    ("正在", "d", 1.0),
];

fn extractor() -> PhraseExtractor<PunctuationSplitter, LexiconTagger> {
    let resources = LexicalResources::new(
        StopwordFilter::from_list(&["的", "了", "在", "正在"]),
        IdfTable::from_entries(LEXICON.iter().map(|(w, _, idf)| (*w, *idf)))
            .expect("benchmark IDF table"),
    );
    let tagger = LexiconTagger::from_entries(LEXICON.iter().map(|(w, tag, _)| (*w, *tag)));
    PhraseExtractor::with_tagger(Arc::new(resources), tagger).expect("benchmark extractor")
}

fn bench_document_length(c: &mut Criterion) {
    let ex = extractor();
    let options = ExtractOptions::default().with_top_k(10);

    let mut group = c.benchmark_group("extract_document");
    for repeats in [1usize, 10, 100] {
        let doc = SENTENCE.repeat(repeats);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(repeats), &doc, |b, doc| {
            b.iter(|| ex.extract(black_box(doc), &options))
        });
    }
    group.finish();
}

fn bench_long_sentence(c: &mut Criterion) {
    let ex = extractor();
    let options = ExtractOptions::default();
    // No terminators: one sentence of a few hundred tokens
    let sentence = "巴黎圣母院当晚发生火灾大火烧毁教堂尖塔消防员现场扑灭大火".repeat(20);

    c.bench_function("candidates_long_sentence", |b| {
        b.iter(|| ex.candidates(black_box(&sentence), &options))
    });
}

fn bench_batch(c: &mut Criterion) {
    let ex = extractor();
    let options = ExtractOptions::default();
    let docs: Vec<String> = (1..=64).map(|n| SENTENCE.repeat(n % 8 + 1)).collect();

    c.bench_function("extract_batch_64", |b| {
        b.iter(|| ex.extract_batch(black_box(&docs), &options))
    });
}

criterion_group!(benches, bench_document_length, bench_long_sentence, bench_batch);
criterion_main!(benches);
