//! Density-based keyword clustering.
//!
//! [`cluster`] groups keywords that carry an embedding with DBSCAN and
//! summarises every resulting cluster. Keywords without an embedding are
//! reported as skipped, never as noise.

pub mod dbscan;
pub mod summarize;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use gapscan_core::config::ClusterParams;
use gapscan_core::types::{ClusterLabel, ClusterSummary, KeywordId, KeywordPoint};
use gapscan_core::Result;

pub use dbscan::{Clustering, Dbscan};
pub use summarize::summarize;

/// Explicit `keyword id -> label` output; input keywords are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub keyword_id: KeywordId,
    pub label: ClusterLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterRun {
    pub summaries: Vec<ClusterSummary>,
    /// One entry per clustered keyword, in input order.
    pub assignments: Vec<Assignment>,
    /// Keywords left out because they had no embedding.
    pub skipped: Vec<KeywordId>,
}

impl ClusterRun {
    pub fn noise(&self) -> impl Iterator<Item = &KeywordId> + '_ {
        self.assignments
            .iter()
            .filter(|a| a.label.is_noise())
            .map(|a| &a.keyword_id)
    }

    pub fn label_of(&self, keyword_id: &str) -> Option<ClusterLabel> {
        self.assignments
            .iter()
            .find(|a| a.keyword_id == keyword_id)
            .map(|a| a.label)
    }
}

pub fn cluster(keywords: &[KeywordPoint], params: &ClusterParams) -> Result<ClusterRun> {
    let dbscan = Dbscan::new(params)?;

    let mut embedded: Vec<&KeywordPoint> = Vec::with_capacity(keywords.len());
    let mut vectors: Vec<&[f32]> = Vec::with_capacity(keywords.len());
    let mut skipped = Vec::new();
    for kw in keywords {
        match kw.embedding() {
            Ok(v) => {
                embedded.push(kw);
                vectors.push(v);
            }
            Err(err) => {
                warn!(%err, "skipping keyword without embedding");
                skipped.push(kw.id.clone());
            }
        }
    }

    let clustering = dbscan.fit(&vectors)?;
    let summaries = summarize(&embedded, &clustering)?;
    debug!(
        keywords = keywords.len(),
        skipped = skipped.len(),
        clusters = summaries.len(),
        noise = clustering.noise().count(),
        epsilon = params.epsilon,
        min_samples = params.min_samples,
        "clustered keywords"
    );

    let assignments = embedded
        .iter()
        .zip(&clustering.labels)
        .map(|(kw, label)| Assignment { keyword_id: kw.id.clone(), label: *label })
        .collect();

    Ok(ClusterRun { summaries, assignments, skipped })
}
