//! Content-gap detection: compares cluster centroids against a page's
//! paragraph embeddings, scores uncovered topics and ranks them.

pub mod detector;
pub mod opportunity;
pub mod ranker;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use gapscan_core::config::GapParams;
use gapscan_core::types::{ClusterSummary, GapCandidate, ParagraphEmbedding};
use gapscan_core::Result;

pub use detector::GapDetector;
pub use opportunity::{impression_score, opportunity_score, position_score, ScoreBreakdown};
pub use ranker::rank_gaps;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    /// One candidate per cluster, in cluster order.
    pub candidates: Vec<GapCandidate>,
    /// `para_index` of paragraphs ignored for lacking an embedding.
    pub skipped_paragraphs: Vec<usize>,
}

impl GapAnalysis {
    pub fn gaps(&self) -> impl Iterator<Item = &GapCandidate> + '_ {
        self.candidates.iter().filter(|c| c.has_gap)
    }
}

pub fn analyze_gaps(
    clusters: &[ClusterSummary],
    paragraphs: &[ParagraphEmbedding],
    params: &GapParams,
) -> Result<GapAnalysis> {
    let detector = GapDetector::new(params)?;

    let (usable, missing): (Vec<&ParagraphEmbedding>, Vec<&ParagraphEmbedding>) =
        paragraphs.iter().partition(|p| p.embedding.is_some());
    let skipped_paragraphs: Vec<usize> = missing.iter().map(|p| p.para_index).collect();
    if !skipped_paragraphs.is_empty() {
        warn!(skipped = skipped_paragraphs.len(), "ignoring paragraphs without embedding");
    }

    let candidates = clusters
        .iter()
        .map(|cluster| detector.detect(cluster, usable.iter().copied()))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        clusters = clusters.len(),
        paragraphs = usable.len(),
        gaps = candidates.iter().filter(|c| c.has_gap).count(),
        coverage_threshold = detector.coverage_threshold(),
        "analyzed coverage"
    );

    Ok(GapAnalysis { candidates, skipped_paragraphs })
}
