//! DBSCAN over embedding vectors with Euclidean distance.
//!
//! Neighbor queries are a brute-force O(n²) scan with no spatial index.
//! That is fine for per-page keyword sets (tens to a few hundred points);
//! callers must cap input size before reusing this at larger scale.

use std::collections::VecDeque;

use gapscan_core::config::ClusterParams;
use gapscan_core::types::{ClusterId, ClusterLabel};
use gapscan_core::vector::euclidean_distance;
use gapscan_core::{Error, Result};

/// Result of a DBSCAN run, indexed like the input slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clustering {
    /// One label per input point.
    pub labels: Vec<ClusterLabel>,
    /// Member indices per cluster id, in discovery order. Never empty.
    pub clusters: Vec<Vec<usize>>,
}

impl Clustering {
    pub fn noise(&self) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.is_noise())
            .map(|(i, _)| i)
    }

    pub fn members(&self, id: ClusterId) -> Option<&[usize]> {
        self.clusters.get(id).map(Vec::as_slice)
    }
}

/// Neighbor counts exclude the point itself, so even with `min_samples = 1`
/// a point with nothing within `epsilon` is noise.
#[derive(Debug, Clone)]
pub struct Dbscan {
    epsilon: f32,
    min_samples: usize,
}

impl Dbscan {
    pub fn new(params: &ClusterParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { epsilon: params.epsilon, min_samples: params.min_samples })
    }

    /// Clusters `points`. Iteration follows input order, which decides the
    /// seed of each cluster and the numbering of cluster ids.
    pub fn fit<V: AsRef<[f32]>>(&self, points: &[V]) -> Result<Clustering> {
        if let Some(first) = points.first() {
            let dim = first.as_ref().len();
            if let Some(bad) = points.iter().find(|p| p.as_ref().len() != dim) {
                return Err(Error::dimension_mismatch(dim, bad.as_ref().len()));
            }
        }

        let n = points.len();
        let mut labels: Vec<Option<ClusterLabel>> = vec![None; n];
        let mut visited = vec![false; n];
        let mut clusters: Vec<Vec<usize>> = Vec::new();

        for seed in 0..n {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;

            let neighbors = self.region_query(points, seed)?;
            if neighbors.len() < self.min_samples {
                // May still become a border point of a later cluster.
                labels[seed] = Some(ClusterLabel::Noise);
                continue;
            }

            let id = clusters.len();
            labels[seed] = Some(ClusterLabel::Cluster(id));
            let mut members = vec![seed];

            let mut queued = vec![false; n];
            queued[seed] = true;
            let mut frontier = VecDeque::with_capacity(neighbors.len());
            for q in neighbors {
                queued[q] = true;
                frontier.push_back(q);
            }

            while let Some(q) = frontier.pop_front() {
                if !visited[q] {
                    visited[q] = true;
                    let reach = self.region_query(points, q)?;
                    if reach.len() >= self.min_samples {
                        for r in reach {
                            if !queued[r] {
                                queued[r] = true;
                                frontier.push_back(r);
                            }
                        }
                    }
                }
                if matches!(labels[q], None | Some(ClusterLabel::Noise)) {
                    labels[q] = Some(ClusterLabel::Cluster(id));
                    members.push(q);
                }
            }

            clusters.push(members);
        }

        Ok(Clustering {
            labels: labels.into_iter().map(|l| l.unwrap_or(ClusterLabel::Noise)).collect(),
            clusters,
        })
    }

    /// Indices within `epsilon` of `idx`, excluding `idx` itself.
    fn region_query<V: AsRef<[f32]>>(&self, points: &[V], idx: usize) -> Result<Vec<usize>> {
        let center = points[idx].as_ref();
        let mut out = Vec::new();
        for (j, other) in points.iter().enumerate() {
            if j != idx && euclidean_distance(center, other.as_ref())? <= self.epsilon {
                out.push(j);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dbscan(epsilon: f32, min_samples: usize) -> Dbscan {
        Dbscan::new(&ClusterParams { epsilon, min_samples }).unwrap()
    }

    #[test]
    fn empty_input_yields_nothing() {
        let points: Vec<Vec<f32>> = Vec::new();
        let c = dbscan(0.15, 3).fit(&points).unwrap();
        assert!(c.labels.is_empty());
        assert!(c.clusters.is_empty());
    }

    #[test]
    fn border_point_marked_noise_first_is_absorbed() {
        // Index 0 sits at the edge: only one neighbor, so it is noise when
        // visited first, then claimed by the cluster seeded at index 1.
        let points = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.2, 0.0],
            vec![0.25, 0.0],
        ];
        let c = dbscan(0.11, 2).fit(&points).unwrap();
        assert_eq!(c.clusters.len(), 1);
        assert!(c.labels.iter().all(|l| *l == ClusterLabel::Cluster(0)));
        assert_eq!(c.members(0).map(<[usize]>::len), Some(4));
        assert_eq!(c.noise().count(), 0);
    }

    #[test]
    fn seed_is_first_member() {
        let points = vec![vec![5.0], vec![0.0], vec![0.05], vec![0.1]];
        let c = dbscan(0.15, 2).fit(&points).unwrap();
        assert_eq!(c.labels[0], ClusterLabel::Noise);
        assert_eq!(c.clusters, vec![vec![1, 2, 3]]);
    }
}
