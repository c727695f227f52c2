use std::cmp::Ordering;

use tracing::trace;

use gapscan_core::config::GapParams;
use gapscan_core::types::{BestMatch, ClusterSummary, GapCandidate, ParagraphEmbedding};
use gapscan_core::vector::{cosine_similarity, l2_norm};
use gapscan_core::Result;

use crate::opportunity::opportunity_score;

/// Decides whether a page already covers a cluster's topic.
#[derive(Debug, Clone)]
pub struct GapDetector {
    coverage_threshold: f32,
}

impl GapDetector {
    pub fn new(params: &GapParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { coverage_threshold: params.coverage_threshold })
    }

    pub fn coverage_threshold(&self) -> f32 {
        self.coverage_threshold
    }

    /// Paragraph most similar to `centroid`. Equal similarities go to the
    /// lowest `para_index`.
    ///
    /// Paragraphs without an embedding, and zero-magnitude vectors on either
    /// side, carry no evidence and never produce a match.
    pub fn best_match<'a, I>(&self, centroid: &[f32], paragraphs: I) -> Result<Option<BestMatch>>
    where
        I: IntoIterator<Item = &'a ParagraphEmbedding>,
    {
        if l2_norm(centroid) == 0.0 {
            return Ok(None);
        }
        let mut best: Option<(&ParagraphEmbedding, f32)> = None;
        for para in paragraphs {
            let Ok(embedding) = para.embedding() else {
                trace!(para_index = para.para_index, "paragraph has no embedding");
                continue;
            };
            let similarity = cosine_similarity(centroid, embedding)?;
            if l2_norm(embedding) == 0.0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((current, current_sim)) => match similarity.total_cmp(&current_sim) {
                    Ordering::Greater => true,
                    Ordering::Equal => para.para_index < current.para_index,
                    Ordering::Less => false,
                },
            };
            if better {
                best = Some((para, similarity));
            }
        }
        Ok(best.map(|(para, similarity)| BestMatch {
            para_index: para.para_index,
            text: para.text.clone(),
            similarity,
        }))
    }

    pub fn detect<'a, I>(&self, cluster: &ClusterSummary, paragraphs: I) -> Result<GapCandidate>
    where
        I: IntoIterator<Item = &'a ParagraphEmbedding>,
    {
        let best_match = self.best_match(&cluster.centroid, paragraphs)?;
        // No content at all means no coverage.
        let has_gap = best_match
            .as_ref()
            .map_or(true, |m| m.similarity < self.coverage_threshold);
        let total_impressions = cluster.total_impressions;

        Ok(GapCandidate {
            cluster_id: cluster.cluster_id,
            representative: cluster.representative.clone(),
            top_keywords: cluster.top_keywords.clone(),
            total_impressions,
            avg_position: cluster.avg_position,
            best_match,
            has_gap,
            opportunity_score: opportunity_score(cluster.avg_position, total_impressions),
        })
    }
}
