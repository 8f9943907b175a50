//! Radius-bounded adaptive k-means.
//!
//! Starting from `K = 1`, the point set is re-clustered from scratch with
//! growing `K` until every cluster keeps all of its members within
//! `max_radius` of its centroid. The largest cluster of the first accepted
//! partition is the frame's dominant cluster.

use crate::kmeans::KMeans;
use rand::rngs::StdRng;
use rand::SeedableRng;
use trajseg_core::{
    Cluster, ClusteringConfig, ClusteringError, DominantCluster, Point, Result,
};

/// Finds the dominant cluster of a point set under a radius bound.
///
/// The clusterer holds only its configuration; every call is independent,
/// so one instance can be shared across threads.
#[derive(Clone, Debug)]
pub struct AdaptiveClusterer {
    config: ClusteringConfig,
}

impl AdaptiveClusterer {
    /// Create with custom configuration.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the configuration fails validation.
    pub fn new(config: ClusteringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Radius bound.
    #[must_use]
    pub fn max_radius(&self) -> f64 {
        self.config.max_radius
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Clusters `points` with the smallest admissible `K` and returns the
    /// largest cluster, or `None` for an empty point set.
    ///
    /// # Errors
    /// Returns [`ClusteringError::Unsatisfiable`] if `K` would have to exceed
    /// the number of points.
    pub fn dominant_cluster(&self, points: &[Point]) -> Result<Option<DominantCluster>> {
        if points.is_empty() {
            return Ok(None);
        }

        let mut rng = self.rng();
        for k in 1..=points.len() {
            let fit = KMeans::from_config(k, &self.config).fit(points, &mut rng)?;
            let clusters = fit.clusters(points);

            if let Some(violating) = clusters
                .iter()
                .position(|c| !c.within_radius(self.config.max_radius))
            {
                log::trace!(
                    "k={k} rejected: cluster {violating} radius {:.2} exceeds {}",
                    clusters[violating].radius(),
                    self.config.max_radius
                );
                continue;
            }

            let cluster = largest(clusters);
            log::debug!(
                "{} points accepted at k={k}, dominant cluster has {} members",
                points.len(),
                cluster.len()
            );
            return Ok(Some(DominantCluster { k, cluster }));
        }

        Err(ClusteringError::Unsatisfiable {
            max_radius: self.config.max_radius,
            points: points.len(),
        }
        .into())
    }
}

impl Default for AdaptiveClusterer {
    fn default() -> Self {
        Self {
            config: ClusteringConfig::default(),
        }
    }
}

/// Cluster with the most members; the lowest index wins ties.
fn largest(clusters: Vec<Cluster>) -> Cluster {
    let mut best: Option<Cluster> = None;
    for cluster in clusters {
        if best.as_ref().is_none_or(|b| cluster.len() > b.len()) {
            best = Some(cluster);
        }
    }
    best.unwrap_or_default()
}
