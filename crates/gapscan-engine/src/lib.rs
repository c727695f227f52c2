//! Per-page orchestration of clustering, coverage analysis and ranking.
//!
//! The engine is synchronous and holds no mutable state, so independent
//! pages can be processed from several threads with one shared instance.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use gapscan_cluster::ClusterRun;
use gapscan_core::config::EngineConfig;
use gapscan_core::types::{ClusterSummary, GapCandidate, KeywordId, KeywordPoint, PageInput, ParagraphEmbedding};
use gapscan_core::Result;
use gapscan_gaps::{rank_gaps, GapAnalysis};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub page_id: String,
    pub clusters: Vec<ClusterSummary>,
    /// Coverage verdict for every cluster, covered or not.
    pub candidates: Vec<GapCandidate>,
    /// Gaps only, best opportunity first, truncated to `ranking.top_n`.
    pub ranked_gaps: Vec<GapCandidate>,
    pub noise: Vec<KeywordId>,
    pub skipped_keywords: Vec<KeywordId>,
    pub skipped_paragraphs: Vec<usize>,
    /// Keywords removed by `input.min_impressions` or `input.max_keywords`.
    pub dropped_keywords: usize,
}

#[derive(Debug, Clone)]
pub struct ContentGapEngine {
    config: EngineConfig,
}

impl ContentGapEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cluster(&self, keywords: &[KeywordPoint]) -> Result<ClusterRun> {
        gapscan_cluster::cluster(keywords, &self.config.clustering)
    }

    pub fn analyze_gaps(&self, clusters: &[ClusterSummary], paragraphs: &[ParagraphEmbedding]) -> Result<GapAnalysis> {
        gapscan_gaps::analyze_gaps(clusters, paragraphs, &self.config.gaps)
    }

    /// Applies `min_impressions`, then keeps at most `max_keywords`
    /// keywords with the most impressions. Survivors keep input order.
    pub fn prepare_keywords(&self, keywords: &[KeywordPoint]) -> Vec<KeywordPoint> {
        let input = &self.config.input;
        let mut kept: Vec<(usize, &KeywordPoint)> = keywords
            .iter()
            .enumerate()
            .filter(|(_, k)| k.impressions >= input.min_impressions)
            .collect();

        if kept.len() > input.max_keywords {
            warn!(
                keywords = kept.len(),
                max_keywords = input.max_keywords,
                "capping keywords before clustering"
            );
            kept.sort_by(|(_, a), (_, b)| b.impressions.cmp(&a.impressions));
            kept.truncate(input.max_keywords);
            kept.sort_by_key(|(i, _)| *i);
        }

        kept.into_iter().map(|(_, k)| k.clone()).collect()
    }

    pub fn run(&self, page: &PageInput) -> Result<PageReport> {
        let keywords = self.prepare_keywords(&page.keywords);
        let dropped_keywords = page.keywords.len() - keywords.len();

        let run = self.cluster(&keywords)?;
        let analysis = self.analyze_gaps(&run.summaries, &page.paragraphs)?;
        let ranked_gaps = rank_gaps(analysis.candidates.iter().cloned(), self.config.ranking.limit());

        info!(
            page_id = %page.page_id,
            keywords = keywords.len(),
            clusters = run.summaries.len(),
            gaps = analysis.gaps().count(),
            ranked = ranked_gaps.len(),
            "analyzed page"
        );

        let noise = run.noise().cloned().collect();
        Ok(PageReport {
            page_id: page.page_id.clone(),
            clusters: run.summaries,
            candidates: analysis.candidates,
            ranked_gaps,
            noise,
            skipped_keywords: run.skipped,
            skipped_paragraphs: analysis.skipped_paragraphs,
            dropped_keywords,
        })
    }
}
