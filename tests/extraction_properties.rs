use rapid_phrases::phrase::dedup::is_redundant;
use rapid_phrases::{
    ExtractOptions, ExtractorConfig, IdfTable, JiebaTagger, KeyPhrases, LexicalResources,
    LexiconTagger, PhraseExtractor, PosTag, PunctuationSplitter, SingletonPolicy, StopwordFilter,
    MAX_PHRASE_LENGTH,
};
use rustc_hash::FxHashSet;
use std::io::Write;
use std::sync::Arc;

const NEWS: &str = "巴黎圣母院当晚发生火灾，大火烧毁了教堂的尖塔。\
    法国总统马克龙表示，政府将重建巴黎圣母院。\
    消防员在现场扑灭大火，火灾原因正在调查！\
    巴黎检察官办公室已经对火灾展开调查。";

const STOPWORDS: &str = "的\n了\n在\n将\n已经\n正在\n对\n";

const IDF: &str = "\
巴黎圣母院 12.5
当晚 6.1
发生 3.2
火灾 8.4
大火 7.7
烧毁 9.0
教堂 8.8
尖塔 11.2
法国 5.0
总统 5.5
马克龙 11.9
表示 2.1
政府 4.0
重建 8.1
消防员 9.3
现场 5.8
扑灭 9.6
原因 4.4
调查 5.2
巴黎 7.3
检察官 9.9
办公室 6.6
展开 4.7
";

fn lexicon() -> LexiconTagger {
    LexiconTagger::from_entries([
        ("巴黎圣母院", "ns"),
        ("当晚", "t"),
        ("发生", "v"),
        ("火灾", "n"),
        ("大火", "n"),
        ("烧毁", "v"),
        ("了", "ul"),
        ("教堂", "n"),
        ("的", "uj"),
        ("尖塔", "n"),
        ("法国", "ns"),
        ("总统", "n"),
        ("马克龙", "nr"),
        ("表示", "v"),
        ("政府", "n"),
        ("将", "d"),
        ("重建", "v"),
        ("消防员", "n"),
        ("在", "p"),
        ("现场", "s"),
        ("扑灭", "v"),
        ("原因", "n"),
        ("正在", "d"),
        ("调查", "vn"),
        ("巴黎", "ns"),
        ("检察官", "n"),
        ("办公室", "n"),
        ("已经", "d"),
        ("对", "p"),
        ("展开", "v"),
    ])
}

fn resources() -> Arc<LexicalResources> {
    Arc::new(LexicalResources::from_readers(STOPWORDS.as_bytes(), IDF.as_bytes()).unwrap())
}

type LexiconExtractor = PhraseExtractor<PunctuationSplitter, LexiconTagger>;

fn extractor_with(config: ExtractorConfig) -> LexiconExtractor {
    PhraseExtractor::new(resources(), PunctuationSplitter::new(), lexicon(), config).unwrap()
}

fn extractor() -> LexiconExtractor {
    extractor_with(ExtractorConfig::default())
}

fn all_options() -> Vec<ExtractOptions> {
    let mut out = Vec::new();
    for top_k in [1, 3, 10, 50] {
        for func_word_num in [0, 1, 2] {
            for stop_word_num in [0, 1] {
                out.push(
                    ExtractOptions::default()
                        .with_top_k(top_k)
                        .with_func_word_num(func_word_num)
                        .with_stop_word_num(stop_word_num),
                );
            }
        }
    }
    out
}

#[test]
fn result_is_bounded_by_top_k_and_candidates() {
    let ex = extractor();
    for options in all_options() {
        let phrases = ex.extract(NEWS, &options).unwrap();
        let candidates = ex.candidates(NEWS, &options).unwrap();
        assert!(phrases.len() <= options.top_k);
        assert!(phrases.len() <= candidates.len());
        assert!(!phrases.is_empty());
    }
}

#[test]
fn extraction_is_deterministic() {
    let ex = extractor();
    for options in all_options() {
        let first = ex.extract_phrases(NEWS, &options).unwrap();
        let second = ex.extract_phrases(NEWS, &options).unwrap();
        assert_eq!(first, second);
    }

    // A fresh extractor over freshly parsed resources agrees too
    let options = ExtractOptions::default().with_top_k(10);
    assert_eq!(
        extractor().extract(NEWS, &options).unwrap(),
        extractor().extract(NEWS, &options).unwrap()
    );
}

#[test]
fn phrases_respect_length_cap() {
    let ex = extractor();
    for options in all_options() {
        for phrase in ex.extract(NEWS, &options).unwrap() {
            assert!(phrase.token_len() <= MAX_PHRASE_LENGTH);
        }
    }

    let short = extractor_with(ExtractorConfig::default().with_max_phrase_length(2));
    for phrase in short
        .extract(NEWS, &ExtractOptions::default().with_top_k(50))
        .unwrap()
    {
        assert!(phrase.token_len() <= 2);
    }
}

#[test]
fn phrase_boundaries_are_content_words() {
    let ex = extractor();
    let stopwords = resources();
    let config = ExtractorConfig::default();
    let tagger = lexicon();

    let tag_of = |word: &str| -> PosTag {
        let tagged = tagger.tag_sentence(word);
        PosTag::from_tag(&tagged[0].1)
    };

    for options in all_options() {
        for phrase in ex.extract(NEWS, &options).unwrap() {
            let first = phrase.tokens.first().unwrap();
            let last = phrase.tokens.last().unwrap();
            for edge in [first.as_str(), last.as_str()] {
                assert!(!stopwords.stopwords().is_stopword(edge), "{}", phrase.text);
                assert!(!config.exception_pos.contains(tag_of(edge)), "{}", phrase.text);
            }
            assert!(!tag_of(last.as_str()).is_verb_or_adverb(), "{}", phrase.text);
        }
    }
}

#[test]
fn no_two_phrases_overlap() {
    let ex = extractor();
    for options in all_options() {
        let phrases = ex.extract(NEWS, &options).unwrap();
        for (i, a) in phrases.iter().enumerate() {
            for b in &phrases[i + 1..] {
                let sa: FxHashSet<&str> = a.tokens.iter().map(String::as_str).collect();
                let sb: FxHashSet<&str> = b.tokens.iter().map(String::as_str).collect();
                let shared = sa.intersection(&sb).count();
                assert!(
                    !is_redundant(shared, sa.len(), sb.len()),
                    "{} overlaps {}",
                    a.text,
                    b.text
                );
            }
        }
    }
}

#[test]
fn single_sentence_prefers_multi_token_phrase() {
    let tagger = LexiconTagger::from_entries([
        ("俄罗斯", "ns"),
        ("克里姆林宫", "ns"),
        ("邀请", "v"),
        ("金正恩", "nr"),
        ("访", "v"),
        ("俄", "ns"),
    ]);
    let ex = PhraseExtractor::with_tagger(resources(), tagger).unwrap();

    let options = ExtractOptions::default().with_top_k(1);
    let phrases = ex.extract("俄罗斯克里姆林宫邀请金正恩访俄", &options).unwrap();

    assert_eq!(phrases.len(), 1);
    assert!((2..=6).contains(&phrases[0].token_len()));
}

#[test]
fn empty_input_gives_empty_result() {
    let ex = extractor();
    for top_k in [1, 2, 5, 100] {
        let result = ex
            .extract_phrases("", &ExtractOptions::default().with_top_k(top_k))
            .unwrap();
        assert!(result.is_empty());
    }
}

#[test]
fn stop_word_document_gives_empty_result() {
    let ex = extractor();
    for options in all_options() {
        let result = ex.extract_phrases("的了在。将对的！正在已经", &options).unwrap();
        assert!(result.is_empty());
    }
}

#[test]
fn raising_func_word_num_only_adds_candidates() {
    let ex = extractor();
    let strict = ex
        .candidates(NEWS, &ExtractOptions::default().with_func_word_num(0))
        .unwrap();
    let loose = ex
        .candidates(NEWS, &ExtractOptions::default().with_func_word_num(2))
        .unwrap();

    for text in strict.texts() {
        assert!(loose.contains(text), "{text} missing at func_word_num=2");
    }
    assert!(loose.len() >= strict.len());
}

#[test]
fn both_singleton_policies_honour_properties() {
    let merge = extractor_with(
        ExtractorConfig::default().with_singleton_policy(SingletonPolicy::MergeUnmatched),
    );
    let options = ExtractOptions::default().with_top_k(20);
    let phrases = merge.extract(NEWS, &options).unwrap();

    assert!(!phrases.is_empty());
    assert!(phrases.len() <= 20);
    for pair in phrases.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    // Merged single tokens never sit inside a kept multi-token phrase
    let multi: Vec<&str> = phrases
        .iter()
        .filter(|p| p.token_len() > 1)
        .map(|p| p.text.as_str())
        .collect();
    for single in phrases.iter().filter(|p| p.token_len() == 1) {
        assert!(multi.iter().all(|m| !m.contains(single.text.as_str())));
    }
}

#[test]
fn keyword_weights_replace_tfidf() {
    let ex = extractor();
    let result = ex
        .extract_phrases_with_keywords(
            NEWS,
            vec![("马克龙".to_string(), 1.0), ("总统".to_string(), 0.5)],
            &ExtractOptions::default().with_top_k(5),
        )
        .unwrap();

    let texts = result.texts();
    assert!(!texts.is_empty());
    assert!(texts.iter().all(|t| t.contains("马克龙") || t.contains("总统")));
}

#[test]
fn with_weight_controls_output_shape() {
    let ex = extractor();
    let weighted = ex
        .extract_phrases(NEWS, &ExtractOptions::default().with_weight(true))
        .unwrap();
    let plain = ex
        .extract_phrases(NEWS, &ExtractOptions::default().with_weight(false))
        .unwrap();

    assert!(matches!(weighted, KeyPhrases::Weighted(_)));
    assert!(matches!(plain, KeyPhrases::Plain(_)));
    assert_eq!(weighted.texts(), plain.texts());

    let json = serde_json::to_string(&plain).unwrap();
    assert!(json.starts_with("[\""));
}

#[test]
fn resources_load_from_files() {
    let mut stop = tempfile::NamedTempFile::new().unwrap();
    stop.write_all(STOPWORDS.as_bytes()).unwrap();
    let mut idf = tempfile::NamedTempFile::new().unwrap();
    idf.write_all(IDF.as_bytes()).unwrap();

    let from_files = LexicalResources::from_paths(stop.path(), idf.path()).unwrap();
    let ex = PhraseExtractor::new(
        Arc::new(from_files),
        PunctuationSplitter::new(),
        lexicon(),
        ExtractorConfig::default(),
    )
    .unwrap();

    let options = ExtractOptions::default().with_top_k(10);
    assert_eq!(
        ex.extract(NEWS, &options).unwrap(),
        extractor().extract(NEWS, &options).unwrap()
    );
}

#[test]
fn missing_resources_abort_construction() {
    let err = LexicalResources::from_paths("/nonexistent/stopwords.txt", "/nonexistent/idf.txt")
        .unwrap_err();
    assert!(err.is_resource_error());

    assert!(IdfTable::from_reader("".as_bytes()).is_err());
    assert!(StopwordFilter::from_reader("".as_bytes()).unwrap().is_empty());
}

#[test]
fn batch_extraction_preserves_order() {
    let ex = extractor();
    let docs: Vec<String> = NEWS.split('。').map(str::to_string).collect();
    let options = ExtractOptions::default().with_top_k(3);

    let batch = ex.extract_batch(&docs, &options);
    assert_eq!(batch.len(), docs.len());
    for (doc, result) in docs.iter().zip(batch) {
        assert_eq!(result.unwrap(), ex.extract_phrases(doc, &options).unwrap());
    }
}

#[test]
fn jieba_tagging_honours_properties() {
    let ex = PhraseExtractor::from_resources(resources()).unwrap();
    let tagger = JiebaTagger::new();
    let stopwords = resources();
    let exception_pos = ExtractorConfig::default().exception_pos;

    let options = ExtractOptions::default().with_top_k(10);
    let phrases = ex.extract(NEWS, &options).unwrap();
    assert!(!phrases.is_empty());
    assert!(phrases.len() <= 10);

    for phrase in &phrases {
        assert!(phrase.token_len() <= MAX_PHRASE_LENGTH);
        for edge in [phrase.tokens.first(), phrase.tokens.last()] {
            let edge = edge.unwrap();
            assert!(!stopwords.stopwords().is_stopword(edge), "{}", phrase.text);
            // re-tag the edge alone; only single-token results are comparable
            let tagged = tagger.tag_sentence(edge);
            if tagged.len() == 1 {
                let pos = PosTag::from_tag(&tagged[0].1);
                assert!(!exception_pos.contains(pos), "{}", phrase.text);
            }
        }
    }
    assert_eq!(ex.extract(NEWS, &options).unwrap(), phrases);
}
