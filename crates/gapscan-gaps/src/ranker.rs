use gapscan_core::types::GapCandidate;

/// Keeps only real gaps, highest opportunity first.
///
/// The sort is stable, so equal scores keep upstream (cluster) order.
/// `limit` is the caller's truncation policy; `None` keeps everything.
pub fn rank_gaps<I>(candidates: I, limit: Option<usize>) -> Vec<GapCandidate>
where
    I: IntoIterator<Item = GapCandidate>,
{
    let mut gaps: Vec<GapCandidate> = candidates.into_iter().filter(|c| c.has_gap).collect();
    gaps.sort_by(|a, b| b.opportunity_score.total_cmp(&a.opportunity_score));
    if let Some(n) = limit {
        gaps.truncate(n);
    }
    gaps
}
