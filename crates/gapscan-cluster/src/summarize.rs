use std::cmp::Ordering;

use gapscan_core::types::{ClusterSummary, KeywordPoint};
use gapscan_core::vector::centroid;
use gapscan_core::Result;

use crate::dbscan::Clustering;

pub const TOP_KEYWORDS: usize = 5;

/// Highest impressions first; equal impressions fall back to keyword text
/// so the winner does not depend on upstream fetch order.
fn by_impressions(a: &KeywordPoint, b: &KeywordPoint) -> Ordering {
    b.impressions.cmp(&a.impressions).then_with(|| a.text.cmp(&b.text))
}

/// Builds one summary per cluster. `points` must be the slice that was fed
/// to [`crate::Dbscan::fit`], so indices in `clustering` line up.
pub fn summarize(points: &[&KeywordPoint], clustering: &Clustering) -> Result<Vec<ClusterSummary>> {
    clustering
        .clusters
        .iter()
        .enumerate()
        .map(|(cluster_id, members)| summarize_one(cluster_id, points, members))
        .collect()
}

fn summarize_one(cluster_id: usize, points: &[&KeywordPoint], members: &[usize]) -> Result<ClusterSummary> {
    let keywords: Vec<&KeywordPoint> = members.iter().map(|&i| points[i]).collect();
    let embeddings = keywords
        .iter()
        .map(|k| k.embedding())
        .collect::<Result<Vec<&[f32]>>>()?;
    let centroid = centroid(&embeddings)?;

    // Stable sort keeps discovery order as the last tie-break.
    let mut ranked = keywords.clone();
    ranked.sort_by(|a, b| by_impressions(a, b));
    let representative = ranked.first().map(|k| k.text.clone()).unwrap_or_default();
    let top_keywords = ranked.iter().take(TOP_KEYWORDS).map(|k| k.text.clone()).collect();

    let size = keywords.len();
    let total_impressions = keywords.iter().fold(0u64, |acc, k| acc.saturating_add(k.impressions));
    #[allow(clippy::cast_precision_loss)]
    let impression_sum: f64 = keywords.iter().map(|k| k.impressions as f64).sum();
    let position_sum: f64 = keywords.iter().map(|k| k.position).sum();

    Ok(ClusterSummary {
        cluster_id,
        members: keywords.iter().map(|k| k.id.clone()).collect(),
        centroid,
        representative,
        top_keywords,
        size,
        total_impressions,
        avg_impressions: impression_sum / size as f64,
        avg_position: position_sum / size as f64,
    })
}
