//! Cluster types and clustering configuration.

use crate::error::{Error, Result};
use crate::point::{Centroid, Point};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A group of points with its center.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cluster {
    /// Points belonging to this cluster.
    pub members: Vec<Point>,
    /// Cluster center.
    pub centroid: Centroid,
}

impl Cluster {
    /// Creates a cluster from members and centroid.
    #[must_use]
    pub fn new(members: Vec<Point>, centroid: Centroid) -> Self {
        Self { members, centroid }
    }

    /// Returns the number of points in the cluster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the cluster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Largest member distance to the centroid (0 for an empty cluster).
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.members
            .iter()
            .map(|p| self.centroid.distance_to(p))
            .fold(0.0, f64::max)
    }

    /// Returns true if every member lies within `max_radius` of the centroid.
    #[must_use]
    pub fn within_radius(&self, max_radius: f64) -> bool {
        let limit = max_radius * max_radius;
        self.members
            .iter()
            .all(|p| self.centroid.distance_squared_to(p) <= limit)
    }
}

/// The largest cluster of a frame together with the cluster count that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DominantCluster {
    /// Number of clusters in the accepted partition.
    pub k: usize,
    /// The selected cluster.
    pub cluster: Cluster,
}

impl DominantCluster {
    #[must_use]
    pub fn members(&self) -> &[Point] {
        &self.cluster.members
    }

    #[must_use]
    pub fn centroid(&self) -> Centroid {
        self.cluster.centroid
    }
}

/// Configuration for the adaptive clustering stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusteringConfig {
    /// Maximum distance from any member to its cluster centroid.
    pub max_radius: f64,
    /// Lloyd iteration cap per k-means attempt.
    pub max_iterations: usize,
    /// Convergence threshold on centroid movement.
    pub epsilon: f64,
    /// Independent initializations per cluster count; the most compact wins.
    pub attempts: usize,
    /// Seed for centroid initialization. `None` uses OS entropy.
    pub seed: Option<u64>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_radius: 50.0,
            max_iterations: 10,
            epsilon: 1.0,
            attempts: 10,
            seed: None,
        }
    }
}

impl ClusteringConfig {
    /// Creates a new clustering configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the radius bound.
    #[must_use]
    pub fn with_max_radius(mut self, radius: f64) -> Self {
        self.max_radius = radius;
        self
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the convergence epsilon.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the number of initializations per cluster count.
    #[must_use]
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Fixes the initialization seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the configuration can drive a clustering run.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] for a negative or non-finite radius or
    /// epsilon, or a zero iteration cap or attempt count.
    pub fn validate(&self) -> Result<()> {
        if !self.max_radius.is_finite() || self.max_radius < 0.0 {
            return Err(Error::InvalidInput(format!(
                "max radius must be finite and non-negative, got {}",
                self.max_radius
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidInput(format!(
                "epsilon must be finite and non-negative, got {}",
                self.epsilon
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidInput("max iterations must be at least 1".into()));
        }
        if self.attempts == 0 {
            return Err(Error::InvalidInput("attempts must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_radius() {
        let cluster = Cluster::new(
            vec![Point::new(0, 0), Point::new(6, 8)],
            Centroid::new(3.0, 4.0),
        );
        assert_eq!(cluster.len(), 2);
        assert!((cluster.radius() - 5.0).abs() < f64::EPSILON);
        assert!(cluster.within_radius(5.0));
        assert!(!cluster.within_radius(4.99));
    }

    #[test]
    fn test_clustering_config() {
        let config = ClusteringConfig::new()
            .with_max_radius(20.0)
            .with_max_iterations(5)
            .with_epsilon(0.5)
            .with_attempts(3)
            .with_seed(7);

        assert!((config.max_radius - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.attempts, 3);
        assert_eq!(config.seed, Some(7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clustering_config_validation() {
        assert!(ClusteringConfig::new().with_max_radius(-1.0).validate().is_err());
        assert!(ClusteringConfig::new().with_max_radius(f64::NAN).validate().is_err());
        assert!(ClusteringConfig::new().with_attempts(0).validate().is_err());
        assert!(ClusteringConfig::new().with_max_iterations(0).validate().is_err());
        assert!(ClusteringConfig::new().with_max_radius(0.0).validate().is_ok());
    }
}
