//! Lloyd k-means over integer points with k-means++ seeding.
//!
//! Each attempt seeds `k` centroids with k-means++, then alternates
//! nearest-centroid assignment and mean recomputation until no centroid
//! moves more than `epsilon` or `max_iterations` is reached. The attempt
//! with the smallest compactness (sum of squared member distances) is kept.
#![allow(clippy::cast_precision_loss)]

use rand::Rng;
use trajseg_core::{Centroid, Cluster, ClusteringConfig, Error, Point, Result};

/// K-means parameters for a fixed cluster count.
#[derive(Clone, Debug)]
pub struct KMeans {
    /// Number of clusters.
    pub k: usize,
    /// Iteration cap per attempt.
    pub max_iterations: usize,
    /// Convergence threshold on centroid movement.
    pub epsilon: f64,
    /// Number of independent initializations.
    pub attempts: usize,
}

/// Outcome of a k-means fit.
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansResult {
    /// Cluster index of every input point.
    pub labels: Vec<usize>,
    /// Cluster centers. Non-empty clusters hold the mean of their members.
    pub centroids: Vec<Centroid>,
    /// Sum of squared distances from each point to its centroid.
    pub compactness: f64,
    /// Lloyd iterations run by the kept attempt.
    pub iterations: usize,
}

impl KMeansResult {
    /// Groups `points` by label. Cluster `i` keeps the input order of its
    /// members and may be empty.
    #[must_use]
    pub fn clusters(&self, points: &[Point]) -> Vec<Cluster> {
        let mut clusters: Vec<Cluster> = self
            .centroids
            .iter()
            .map(|&c| Cluster::new(Vec::new(), c))
            .collect();
        for (point, &label) in points.iter().zip(&self.labels) {
            clusters[label].members.push(*point);
        }
        clusters
    }
}

impl KMeans {
    /// K-means with the default criteria: 10 iterations, epsilon 1.0,
    /// 10 attempts.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self::from_config(k, &ClusteringConfig::default())
    }

    /// K-means taking iteration, epsilon and attempt settings from `config`.
    #[must_use]
    pub fn from_config(k: usize, config: &ClusteringConfig) -> Self {
        Self {
            k,
            max_iterations: config.max_iterations,
            epsilon: config.epsilon,
            attempts: config.attempts,
        }
    }

    /// Partitions `points` into `k` clusters.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `k` is zero or exceeds the number
    /// of points, or if no attempt is configured.
    pub fn fit<R: Rng + ?Sized>(&self, points: &[Point], rng: &mut R) -> Result<KMeansResult> {
        if self.k == 0 || self.k > points.len() {
            return Err(Error::InvalidInput(format!(
                "cannot split {} points into {} clusters",
                points.len(),
                self.k
            )));
        }
        if self.attempts == 0 {
            return Err(Error::InvalidInput("attempts must be at least 1".into()));
        }

        let mut best: Option<KMeansResult> = None;
        for _ in 0..self.attempts {
            let candidate = self.run_attempt(points, rng);
            if best
                .as_ref()
                .is_none_or(|b| candidate.compactness < b.compactness)
            {
                best = Some(candidate);
            }
        }
        best.ok_or_else(|| Error::InvalidInput("k-means produced no attempt".into()))
    }

    fn run_attempt<R: Rng + ?Sized>(&self, points: &[Point], rng: &mut R) -> KMeansResult {
        let mut centroids = plus_plus_init(points, self.k, rng);
        let mut labels = vec![0usize; points.len()];
        let mut iterations = 0;

        while iterations < self.max_iterations.max(1) {
            iterations += 1;
            assign(points, &centroids, &mut labels);
            let updated = recompute(points, &labels, &centroids);
            let shift = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| old.distance_between(new))
                .fold(0.0, f64::max);
            centroids = updated;
            if shift <= self.epsilon {
                break;
            }
        }

        let compactness = points
            .iter()
            .zip(&labels)
            .map(|(p, &label)| centroids[label].distance_squared_to(p))
            .sum();

        KMeansResult {
            labels,
            centroids,
            compactness,
            iterations,
        }
    }
}

/// Index of the nearest centroid; ties go to the lower index.
fn nearest(point: &Point, centroids: &[Centroid]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = c.distance_squared_to(point);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn assign(points: &[Point], centroids: &[Centroid], labels: &mut [usize]) {
    for (label, point) in labels.iter_mut().zip(points) {
        *label = nearest(point, centroids);
    }
}

/// Member means; an empty cluster keeps its previous center.
fn recompute(points: &[Point], labels: &[usize], previous: &[Centroid]) -> Vec<Centroid> {
    let mut sums = vec![(0.0, 0.0, 0usize); previous.len()];
    for (point, &label) in points.iter().zip(labels) {
        let entry = &mut sums[label];
        entry.0 += f64::from(point.x);
        entry.1 += f64::from(point.y);
        entry.2 += 1;
    }
    sums.iter()
        .zip(previous)
        .map(|(&(sx, sy, n), &prev)| {
            if n == 0 {
                prev
            } else {
                Centroid::new(sx / n as f64, sy / n as f64)
            }
        })
        .collect()
}

/// k-means++ seeding: the first center is uniform, each next one is drawn
/// with probability proportional to the squared distance to the nearest
/// chosen center.
fn plus_plus_init<R: Rng + ?Sized>(points: &[Point], k: usize, rng: &mut R) -> Vec<Centroid> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(Centroid::from(points[rng.gen_range(0..points.len())]));

    let mut weights: Vec<f64> = points
        .iter()
        .map(|p| centroids[0].distance_squared_to(p))
        .collect();

    while centroids.len() < k {
        let total: f64 = weights.iter().sum();
        let chosen = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut acc = 0.0;
            let mut pick = None;
            for (i, &w) in weights.iter().enumerate() {
                acc += w;
                if w > 0.0 && acc > target {
                    pick = Some(i);
                    break;
                }
            }
            // Rounding can leave `acc` just under `target`.
            pick.or_else(|| weights.iter().rposition(|&w| w > 0.0))
                .unwrap_or(0)
        } else {
            rng.gen_range(0..points.len())
        };

        let center = Centroid::from(points[chosen]);
        for (w, p) in weights.iter_mut().zip(points) {
            *w = w.min(center.distance_squared_to(p));
        }
        centroids.push(center);
    }

    centroids
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_blobs() -> Vec<Point> {
        vec![
            Point::new(0, 0),
            Point::new(2, 0),
            Point::new(1, 3),
            Point::new(100, 100),
            Point::new(102, 100),
            Point::new(101, 103),
        ]
    }

    #[test]
    fn test_single_cluster_is_mean() {
        let points = two_blobs();
        let mut rng = StdRng::seed_from_u64(1);
        let result = KMeans::new(1).fit(&points, &mut rng).unwrap();
        assert!(result.labels.iter().all(|&l| l == 0));
        assert_relative_eq!(result.centroids[0].x, 51.0);
        assert_relative_eq!(result.centroids[0].y, 51.0);
    }

    #[test]
    fn test_two_blobs_separate() {
        let points = two_blobs();
        let mut rng = StdRng::seed_from_u64(42);
        let result = KMeans::new(2).fit(&points, &mut rng).unwrap();
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[0], result.labels[2]);
        assert_eq!(result.labels[3], result.labels[4]);
        assert_eq!(result.labels[3], result.labels[5]);
        assert_ne!(result.labels[0], result.labels[3]);

        let clusters = result.clusters(&points);
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.len() == 3 && c.radius() < 3.0));
    }

    #[test]
    fn test_seeded_fit_is_reproducible() {
        let points = two_blobs();
        let a = KMeans::new(3).fit(&points, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = KMeans::new(3).fit(&points, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_k_equal_to_point_count() {
        let points = two_blobs();
        let mut rng = StdRng::seed_from_u64(3);
        let result = KMeans::new(points.len()).fit(&points, &mut rng).unwrap();
        assert_relative_eq!(result.compactness, 0.0);
    }

    #[test]
    fn test_duplicate_points_leave_empty_clusters() {
        let points = vec![Point::new(5, 5); 4];
        let mut rng = StdRng::seed_from_u64(0);
        let result = KMeans::new(3).fit(&points, &mut rng).unwrap();
        assert_relative_eq!(result.compactness, 0.0);
        assert!(result.labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn test_invalid_k() {
        let points = two_blobs();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(KMeans::new(0).fit(&points, &mut rng).is_err());
        assert!(KMeans::new(7).fit(&points, &mut rng).is_err());
    }
}
