//! Domain types shared by the clustering and gap-analysis crates.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type KeywordId = String;
pub type ClusterId = usize;

/// A search keyword observed for a page, as delivered by GSC ingestion.
///
/// - `id`: unique within one clustering run
/// - `embedding`: absent when the upstream embedder has not produced one yet;
///   such keywords are left out of clustering entirely
/// - `impressions`: impression count over the analysis window
/// - `position`: average ranking position, 1.0 being the top result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordPoint {
    pub id: KeywordId,
    pub text: String,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub position: f64,
}

impl KeywordPoint {
    pub fn embedding(&self) -> Result<&[f32]> {
        self.embedding
            .as_deref()
            .ok_or_else(|| Error::MissingEmbedding(format!("keyword '{}'", self.id)))
    }
}

/// One embedded paragraph of a page. Read-only for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphEmbedding {
    pub page_id: String,
    pub para_index: usize,
    pub text: String,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl ParagraphEmbedding {
    pub fn embedding(&self) -> Result<&[f32]> {
        self.embedding.as_deref().ok_or_else(|| {
            Error::MissingEmbedding(format!("paragraph {} of page '{}'", self.para_index, self.page_id))
        })
    }
}

/// Outcome of clustering for a single keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterLabel {
    Noise,
    Cluster(ClusterId),
}

impl ClusterLabel {
    pub fn cluster_id(self) -> Option<ClusterId> {
        match self {
            ClusterLabel::Cluster(id) => Some(id),
            ClusterLabel::Noise => None,
        }
    }

    pub fn is_noise(self) -> bool {
        matches!(self, ClusterLabel::Noise)
    }
}

/// Aggregated view of one topic cluster.
///
/// `members` keeps discovery order. `representative` and `top_keywords`
/// are ranked by impressions, falling back to keyword text on ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster_id: ClusterId,
    pub members: Vec<KeywordId>,
    pub centroid: Vec<f32>,
    pub representative: String,
    pub top_keywords: Vec<String>,
    pub size: usize,
    pub total_impressions: u64,
    pub avg_impressions: f64,
    pub avg_position: f64,
}

/// The paragraph closest to a cluster centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestMatch {
    pub para_index: usize,
    pub text: String,
    pub similarity: f32,
}

/// Coverage verdict for one cluster against one page.
///
/// `best_match` is `None` when the page had no usable paragraphs, in which
/// case `has_gap` is always true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapCandidate {
    pub cluster_id: ClusterId,
    pub representative: String,
    pub top_keywords: Vec<String>,
    pub total_impressions: u64,
    pub avg_position: f64,
    pub best_match: Option<BestMatch>,
    pub has_gap: bool,
    pub opportunity_score: f64,
}

/// Everything the engine needs to analyse one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInput {
    pub page_id: String,
    #[serde(default)]
    pub keywords: Vec<KeywordPoint>,
    #[serde(default)]
    pub paragraphs: Vec<ParagraphEmbedding>,
}
