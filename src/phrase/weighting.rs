//! Token weighting
//!
//! One counting pass builds the per-document [`WeightTable`]; every
//! occurrence is then weighted as `tf * idf / total_length`, or 0 for tokens
//! that are not admitted content words or are stop words.
//!
//! A token seen with several tags is judged by the tag of its first
//! occurrence only.

use crate::resources::LexicalResources;
use crate::types::{ExtractorConfig, PosTag, PosTagSet, Token, WeightedToken};
use rustc_hash::{FxHashMap, FxHashSet};

/// Frequency entry for one distinct surface token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermEntry {
    /// Tag recorded at the first occurrence
    pub pos: PosTag,
    /// Raw document frequency
    pub frequency: usize,
}

/// Per-document term frequencies
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    terms: FxHashMap<String, TermEntry>,
    total_length: usize,
}

impl WeightTable {
    /// Count every token of the document in one pass
    pub fn build(sentences: &[Vec<Token>]) -> Self {
        let total_length: usize = sentences.iter().map(Vec::len).sum();
        let mut terms: FxHashMap<String, TermEntry> =
            FxHashMap::with_capacity_and_hasher(total_length, Default::default());

        for token in sentences.iter().flatten() {
            terms
                .entry(token.text.clone())
                .and_modify(|entry| entry.frequency += 1)
                .or_insert(TermEntry {
                    pos: token.pos,
                    frequency: 1,
                });
        }

        Self {
            terms,
            total_length,
        }
    }

    pub fn get(&self, token: &str) -> Option<&TermEntry> {
        self.terms.get(token)
    }

    pub fn frequency(&self, token: &str) -> usize {
        self.terms.get(token).map_or(0, |e| e.frequency)
    }

    /// Total token count of the document (the TF normalizer)
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Number of distinct surface tokens
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Where token weights come from
#[derive(Debug, Clone, Copy)]
pub enum Weighting<'a> {
    /// Document term frequency times IDF
    TfIdf,
    /// Caller-supplied keyword weights; tokens outside the map weigh 0
    Keywords(&'a FxHashMap<String, f64>),
}

/// Weight every token of the document
///
/// Applies the `top_k_features` cap from `config` when set.
pub fn weigh(
    sentences: &[Vec<Token>],
    weighting: Weighting<'_>,
    resources: &LexicalResources,
    config: &ExtractorConfig,
) -> Vec<Vec<WeightedToken>> {
    let table = WeightTable::build(sentences);

    let mut weighted = match weighting {
        Weighting::TfIdf => weigh_tfidf(sentences, &table, resources, config.content_pos),
        Weighting::Keywords(keywords) => {
            weigh_keywords(sentences, &table, keywords, resources, config.exception_pos)
        }
    };

    if let Some(limit) = config.top_k_features {
        cap_features(&mut weighted, limit);
    }

    weighted
}

/// TF-IDF weights: `frequency * idf_or_median / total_length`
pub fn weigh_tfidf(
    sentences: &[Vec<Token>],
    table: &WeightTable,
    resources: &LexicalResources,
    content_pos: PosTagSet,
) -> Vec<Vec<WeightedToken>> {
    let total = table.total_length() as f64;
    let mut cache: FxHashMap<&str, f64> = FxHashMap::default();

    sentences
        .iter()
        .map(|sentence| {
            sentence
                .iter()
                .map(|token| {
                    let weight = *cache.entry(token.text.as_str()).or_insert_with(|| {
                        match table.get(&token.text) {
                            Some(entry)
                                if content_pos.contains(entry.pos)
                                    && !resources.stopwords().is_stopword(&token.text) =>
                            {
                                entry.frequency as f64 * resources.idf().idf(&token.text) / total
                            }
                            _ => 0.0,
                        }
                    });
                    WeightedToken::new(token.clone(), weight)
                })
                .collect()
        })
        .collect()
}

/// Caller-supplied weights
///
/// Stop words, tokens whose recorded tag is a function-word tag and
/// non-positive or non-finite weights all count as 0.
pub fn weigh_keywords(
    sentences: &[Vec<Token>],
    table: &WeightTable,
    keywords: &FxHashMap<String, f64>,
    resources: &LexicalResources,
    exception_pos: PosTagSet,
) -> Vec<Vec<WeightedToken>> {
    sentences
        .iter()
        .map(|sentence| {
            sentence
                .iter()
                .map(|token| {
                    let recorded = table.get(&token.text).map_or(token.pos, |e| e.pos);
                    let weight = match keywords.get(&token.text) {
                        Some(&w)
                            if w.is_finite()
                                && w > 0.0
                                && !exception_pos.contains(recorded)
                                && !resources.stopwords().is_stopword(&token.text) =>
                        {
                            w
                        }
                        _ => 0.0,
                    };
                    WeightedToken::new(token.clone(), weight)
                })
                .collect()
        })
        .collect()
}

/// Keep non-zero weights only for the `limit` best distinct surfaces
///
/// Ties are broken by first occurrence in the document.
pub fn cap_features(weighted: &mut [Vec<WeightedToken>], limit: usize) {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut ranked: Vec<(String, f64)> = Vec::new();
    for wt in weighted.iter().flatten() {
        if wt.weight > 0.0 && seen.insert(wt.text()) {
            ranked.push((wt.text().to_string(), wt.weight));
        }
    }

    if ranked.len() <= limit {
        return;
    }

    // Stable sort keeps first-occurrence order among equal weights
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let keep: FxHashSet<String> = ranked.into_iter().take(limit).map(|(t, _)| t).collect();

    for wt in weighted.iter_mut().flatten() {
        if !keep.contains(wt.text()) {
            wt.weight = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::idf::IdfTable;
    use crate::nlp::stopwords::StopwordFilter;

    fn resources() -> LexicalResources {
        LexicalResources::new(
            StopwordFilter::from_list(&["的"]),
            IdfTable::from_entries([("火灾", 8.0), ("调查", 6.0), ("巴黎", 10.0)]).unwrap(),
        )
    }

    fn sentences() -> Vec<Vec<Token>> {
        vec![
            vec![
                Token::new("巴黎", PosTag::PlaceName, 0, 0, 0),
                Token::new("的", PosTag::Auxiliary, 0, 1, 1),
                Token::new("火灾", PosTag::Noun, 0, 2, 2),
                Token::new("。", PosTag::Punctuation, 0, 3, 3),
            ],
            vec![
                Token::new("调查", PosTag::NominalVerb, 1, 0, 4),
                Token::new("火灾", PosTag::Noun, 1, 1, 5),
                Token::new("原因", PosTag::Noun, 1, 2, 6),
                Token::new("。", PosTag::Punctuation, 1, 3, 7),
            ],
        ]
    }

    fn weight_of(weighted: &[Vec<WeightedToken>], text: &str) -> f64 {
        weighted
            .iter()
            .flatten()
            .find(|wt| wt.text() == text)
            .map(|wt| wt.weight)
            .unwrap()
    }

    #[test]
    fn test_weight_table_counts() {
        let table = WeightTable::build(&sentences());
        assert_eq!(table.total_length(), 8);
        assert_eq!(table.frequency("火灾"), 2);
        assert_eq!(table.frequency("。"), 2);
        assert_eq!(table.frequency("missing"), 0);
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_first_occurrence_tag_is_recorded() {
        let sents = vec![vec![
            Token::new("报道", PosTag::NominalVerb, 0, 0, 0),
            Token::new("报道", PosTag::Preposition, 0, 1, 1),
        ]];
        let table = WeightTable::build(&sents);
        assert_eq!(table.get("报道").unwrap().pos, PosTag::NominalVerb);

        // Both occurrences are weighted with the first tag
        let weighted = weigh_tfidf(&sents, &table, &resources(), PosTagSet::content_words());
        assert!(weighted[0][0].weight > 0.0);
        assert_eq!(weighted[0][0].weight, weighted[0][1].weight);
    }

    #[test]
    fn test_tfidf_formula() {
        let sents = sentences();
        let table = WeightTable::build(&sents);
        let weighted = weigh_tfidf(&sents, &table, &resources(), PosTagSet::content_words());

        // 火灾: tf 2, idf 8.0, total 8
        assert!((weight_of(&weighted, "火灾") - 2.0 * 8.0 / 8.0).abs() < 1e-12);
        // 巴黎: tf 1, idf 10.0
        assert!((weight_of(&weighted, "巴黎") - 10.0 / 8.0).abs() < 1e-12);
        // 原因 is out of vocabulary: median of {6, 8, 10} = 8
        assert!((weight_of(&weighted, "原因") - 8.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_content_and_stopwords_weigh_zero() {
        let sents = sentences();
        let table = WeightTable::build(&sents);
        let weighted = weigh_tfidf(&sents, &table, &resources(), PosTagSet::content_words());

        assert_eq!(weight_of(&weighted, "的"), 0.0);
        assert_eq!(weight_of(&weighted, "。"), 0.0);

        // A stop word with a content tag still weighs 0
        let res = LexicalResources::new(
            StopwordFilter::from_list(&["火灾"]),
            IdfTable::from_entries([("火灾", 8.0)]).unwrap(),
        );
        let weighted = weigh_tfidf(&sents, &table, &res, PosTagSet::content_words());
        assert_eq!(weight_of(&weighted, "火灾"), 0.0);
    }

    #[test]
    fn test_weights_are_aligned_with_tokens() {
        let sents = sentences();
        let weighted = weigh(&sents, Weighting::TfIdf, &resources(), &ExtractorConfig::default());

        assert_eq!(weighted.len(), sents.len());
        for (ws, ts) in weighted.iter().zip(&sents) {
            assert_eq!(ws.len(), ts.len());
            for (w, t) in ws.iter().zip(ts) {
                assert_eq!(&w.token, t);
                assert!(w.weight >= 0.0);
            }
        }
    }

    #[test]
    fn test_keyword_weights() {
        let sents = sentences();
        let mut keywords = FxHashMap::default();
        keywords.insert("火灾".to_string(), 0.22);
        keywords.insert("的".to_string(), 0.5);
        keywords.insert("。".to_string(), 0.5);
        keywords.insert("原因".to_string(), -1.0);

        let weighted = weigh(
            &sents,
            Weighting::Keywords(&keywords),
            &resources(),
            &ExtractorConfig::default(),
        );

        assert_eq!(weight_of(&weighted, "火灾"), 0.22);
        assert_eq!(weight_of(&weighted, "巴黎"), 0.0);
        assert_eq!(weight_of(&weighted, "的"), 0.0);
        assert_eq!(weight_of(&weighted, "。"), 0.0);
        assert_eq!(weight_of(&weighted, "原因"), 0.0);
    }

    #[test]
    fn test_cap_features_keeps_best() {
        let sents = sentences();
        let cfg = ExtractorConfig::default().with_top_k_features(2);
        let weighted = weigh(&sents, Weighting::TfIdf, &resources(), &cfg);

        // 火灾 = 2.0, 巴黎 = 1.25, 原因 = 1.0, 调查 = 0.75
        assert!(weight_of(&weighted, "火灾") > 0.0);
        assert!(weight_of(&weighted, "巴黎") > 0.0);
        assert_eq!(weight_of(&weighted, "原因"), 0.0);
        assert_eq!(weight_of(&weighted, "调查"), 0.0);
    }

    #[test]
    fn test_cap_features_tie_prefers_first_occurrence() {
        let sents = vec![vec![
            Token::new("甲", PosTag::Noun, 0, 0, 0),
            Token::new("乙", PosTag::Noun, 0, 1, 1),
        ]];
        let res = LexicalResources::new(
            StopwordFilter::empty(),
            IdfTable::from_entries([("甲", 1.0), ("乙", 1.0)]).unwrap(),
        );
        let cfg = ExtractorConfig::default().with_top_k_features(1);
        let weighted = weigh(&sents, Weighting::TfIdf, &res, &cfg);

        assert!(weighted[0][0].weight > 0.0);
        assert_eq!(weighted[0][1].weight, 0.0);
    }

    #[test]
    fn test_empty_document() {
        let weighted = weigh(&[], Weighting::TfIdf, &resources(), &ExtractorConfig::default());
        assert!(weighted.is_empty());
    }
}
