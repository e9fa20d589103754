//! Phrase extraction
//!
//! [`PhraseExtractor`] runs the whole pipeline for one document:
//!
//! 1. split into sentences and tag every sentence
//! 2. weight each token occurrence (TF-IDF or caller-supplied keywords)
//! 3. enumerate and score candidate spans
//! 4. drop redundant candidates, longest first
//! 5. rank, optionally merging uncovered single tokens back in
//!
//! The extractor holds only read-only state, so one instance can serve many
//! threads; [`PhraseExtractor::extract_batch`] does exactly that with rayon.

use crate::errors::{PhraseError, Result};
use crate::nlp::segmenter::{PunctuationSplitter, SentenceSplitter};
use crate::nlp::tagger::{JiebaTagger, Tagger};
use crate::phrase::candidates::{CandidateGenerator, CandidateSet, FilterLimits};
use crate::phrase::dedup::deduplicate_with_diagnostics;
use crate::phrase::ranking::{merge_unmatched_tokens, rank};
use crate::phrase::weighting::{weigh, Weighting};
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReportBuilder, STAGE_CANDIDATES, STAGE_DEDUP,
    STAGE_RANK, STAGE_SEGMENT, STAGE_WEIGHT,
};
use crate::resources::LexicalResources;
use crate::types::{
    ExtractOptions, ExtractorConfig, KeyPhrases, Phrase, PosTag, SingletonPolicy, Token,
    WeightedToken,
};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Enter a tracing span for an extraction stage (when the `tracing` feature
/// is enabled). Compiles to nothing otherwise.
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("extract_stage", stage = $name).entered();
    };
}

impl From<&ExtractOptions> for FilterLimits {
    fn from(options: &ExtractOptions) -> Self {
        FilterLimits {
            func_word_num: options.func_word_num,
            stop_word_num: options.stop_word_num,
        }
    }
}

/// Key-phrase extractor over injected resources and collaborators
///
/// | Param | Trait | Default |
/// |-------|-------|---------|
/// | `S` | [`SentenceSplitter`] | [`PunctuationSplitter`] |
/// | `T` | [`Tagger`] | [`JiebaTagger`] |
#[derive(Debug, Clone)]
pub struct PhraseExtractor<S = PunctuationSplitter, T = JiebaTagger> {
    resources: Arc<LexicalResources>,
    config: ExtractorConfig,
    splitter: S,
    tagger: T,
}

impl PhraseExtractor {
    /// Default splitter, bundled jieba dictionary and default configuration
    pub fn from_resources(resources: Arc<LexicalResources>) -> Result<Self> {
        Self::with_tagger(resources, JiebaTagger::new())
    }
}

impl<T: Tagger> PhraseExtractor<PunctuationSplitter, T> {
    /// Default splitter and configuration around the given tagger
    pub fn with_tagger(resources: Arc<LexicalResources>, tagger: T) -> Result<Self> {
        Self::new(
            resources,
            PunctuationSplitter::new(),
            tagger,
            ExtractorConfig::default(),
        )
    }
}

impl<S: SentenceSplitter, T: Tagger> PhraseExtractor<S, T> {
    /// Build an extractor; fails if `config` does not validate
    pub fn new(
        resources: Arc<LexicalResources>,
        splitter: S,
        tagger: T,
        config: ExtractorConfig,
    ) -> Result<Self> {
        config.validate()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            stopwords = resources.stopwords().len(),
            idf_entries = resources.idf().len(),
            idf_median = resources.idf().median(),
            max_phrase_length = config.max_phrase_length,
            "phrase extractor ready"
        );

        Ok(Self {
            resources,
            config,
            splitter,
            tagger,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn resources(&self) -> &LexicalResources {
        &self.resources
    }

    /// Split `text` into sentences and tag each one
    ///
    /// Every sentence yields one (possibly empty) vector so sentence indices
    /// line up with the splitter output. Tokens are kept exactly as the
    /// tagger returns them, whitespace included.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Vec<Token>>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let sentences = self.splitter.split(text).map_err(PhraseError::Splitter)?;
        let mut tokenized = Vec::with_capacity(sentences.len());
        let mut token_idx = 0;

        for (sentence_idx, sentence) in sentences.iter().enumerate() {
            let tagged = self
                .tagger
                .tag(sentence)
                .map_err(|source| PhraseError::Tagger {
                    sentence_idx,
                    source,
                })?;

            let mut tokens = Vec::with_capacity(tagged.len());
            for (word, tag) in tagged {
                tokens.push(Token::new(
                    word,
                    PosTag::from_tag(&tag),
                    sentence_idx,
                    tokens.len(),
                    token_idx,
                ));
                token_idx += 1;
            }
            tokenized.push(tokens);
        }

        Ok(tokenized)
    }

    /// Weighted tokens of `text`, one vector per sentence
    pub fn weigh(&self, text: &str, weighting: Weighting<'_>) -> Result<Vec<Vec<WeightedToken>>> {
        let sentences = self.tokenize(text)?;
        Ok(weigh(&sentences, weighting, &self.resources, &self.config))
    }

    /// The admitted candidate spans of `text`, before redundancy filtering
    pub fn candidates(&self, text: &str, options: &ExtractOptions) -> Result<CandidateSet> {
        let weighted = self.weigh(text, Weighting::TfIdf)?;
        Ok(self.generator(options).generate(&weighted))
    }

    fn generator<'a>(&'a self, options: &ExtractOptions) -> CandidateGenerator<'a> {
        CandidateGenerator::new(&self.config, self.resources.stopwords(), options.into())
    }

    /// Ranked phrases with scores and locations
    pub fn extract(&self, text: &str, options: &ExtractOptions) -> Result<Vec<Phrase>> {
        self.extract_observed(text, Weighting::TfIdf, options, &mut NoopObserver)
    }

    /// Ranked phrases formatted per `options.with_weight`
    pub fn extract_phrases(&self, text: &str, options: &ExtractOptions) -> Result<KeyPhrases> {
        let phrases = self.extract(text, options)?;
        Ok(KeyPhrases::from_phrases(phrases, options.with_weight))
    }

    /// Like [`extract_phrases`](Self::extract_phrases), with caller-supplied
    /// keyword weights in place of TF-IDF
    ///
    /// Tokens missing from `keywords` weigh 0. Later duplicates of a keyword
    /// override earlier ones.
    pub fn extract_phrases_with_keywords<I, K>(
        &self,
        text: &str,
        keywords: I,
        options: &ExtractOptions,
    ) -> Result<KeyPhrases>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let keywords: FxHashMap<String, f64> = keywords
            .into_iter()
            .map(|(word, weight)| (word.into(), weight))
            .collect();

        let phrases = self.extract_observed(
            text,
            Weighting::Keywords(&keywords),
            options,
            &mut NoopObserver,
        )?;
        Ok(KeyPhrases::from_phrases(phrases, options.with_weight))
    }

    /// Run the pipeline, notifying `observer` at every stage boundary
    pub fn extract_observed(
        &self,
        text: &str,
        weighting: Weighting<'_>,
        options: &ExtractOptions,
        observer: &mut impl PipelineObserver,
    ) -> Result<Vec<Phrase>> {
        options.validate()?;

        // Stage 1: sentences and tags
        let sentences = {
            trace_stage!(STAGE_SEGMENT);
            observer.on_stage_start(STAGE_SEGMENT);
            let clock = StageClock::start();
            let sentences = self.tokenize(text)?;
            let report = StageReportBuilder::new(clock.elapsed())
                .output_items(sentences.len())
                .build();
            observer.on_stage_end(STAGE_SEGMENT, &report);
            observer.on_sentences(&sentences);
            sentences
        };
        let total_tokens: usize = sentences.iter().map(Vec::len).sum();

        // Stage 2: token weights
        let weighted = {
            trace_stage!(STAGE_WEIGHT);
            observer.on_stage_start(STAGE_WEIGHT);
            let clock = StageClock::start();
            let weighted = weigh(&sentences, weighting, &self.resources, &self.config);
            let positive = weighted.iter().flatten().filter(|t| t.weight > 0.0).count();
            let report = StageReportBuilder::new(clock.elapsed())
                .input_items(total_tokens)
                .output_items(positive)
                .build();
            observer.on_stage_end(STAGE_WEIGHT, &report);
            observer.on_weights(&weighted);
            weighted
        };
        drop(sentences);

        // Stage 3: candidate spans
        let candidates = {
            trace_stage!(STAGE_CANDIDATES);
            observer.on_stage_start(STAGE_CANDIDATES);
            let clock = StageClock::start();
            let candidates = self.generator(options).generate(&weighted);
            let report = StageReportBuilder::new(clock.elapsed())
                .input_items(candidates.stats().considered)
                .output_items(candidates.len())
                .build();

            #[cfg(feature = "tracing")]
            tracing::debug!(
                considered = candidates.stats().considered,
                rejected = candidates.stats().total_rejected(),
                duplicates = candidates.stats().duplicates,
                admitted = candidates.len(),
                "generated candidates"
            );
            #[cfg(feature = "tracing")]
            for reason in crate::phrase::candidates::Rejection::ALL {
                tracing::trace!(
                    reason = reason.as_str(),
                    count = candidates.stats().rejected(reason),
                    "rejected spans"
                );
            }

            observer.on_stage_end(STAGE_CANDIDATES, &report);
            observer.on_candidates(&candidates);
            candidates
        };

        // Stage 4: redundancy filtering
        let next_discovery = candidates.len();
        let kept = {
            trace_stage!(STAGE_DEDUP);
            observer.on_stage_start(STAGE_DEDUP);
            let clock = StageClock::start();
            let (kept, dropped) = deduplicate_with_diagnostics(candidates.into_vec());
            let report = StageReportBuilder::new(clock.elapsed())
                .input_items(kept.len() + dropped.len())
                .output_items(kept.len())
                .build();
            observer.on_stage_end(STAGE_DEDUP, &report);
            observer.on_dedup(&kept, &dropped);
            kept
        };

        // Stage 5: ranking
        let phrases = {
            trace_stage!(STAGE_RANK);
            observer.on_stage_start(STAGE_RANK);
            let clock = StageClock::start();
            let mut pool = kept;
            if self.config.singleton_policy == SingletonPolicy::MergeUnmatched {
                merge_unmatched_tokens(
                    &mut pool,
                    &weighted,
                    &self.config.length_control,
                    next_discovery,
                );
            }
            let pool_len = pool.len();
            let phrases = rank(pool, options.top_k);
            let report = StageReportBuilder::new(clock.elapsed())
                .input_items(pool_len)
                .output_items(phrases.len())
                .build();
            observer.on_stage_end(STAGE_RANK, &report);
            observer.on_phrases(&phrases);
            phrases
        };

        Ok(phrases)
    }
}

impl<S, T> PhraseExtractor<S, T>
where
    S: SentenceSplitter + Sync,
    T: Tagger + Sync,
{
    /// Extract from many documents in parallel
    ///
    /// Results come back in input order; one failing document does not
    /// affect the others.
    pub fn extract_batch<D>(
        &self,
        texts: &[D],
        options: &ExtractOptions,
    ) -> Vec<Result<KeyPhrases>>
    where
        D: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.extract_phrases(text.as_ref(), options))
            .collect()
    }
}
