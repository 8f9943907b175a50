//! End-to-end analysis of one trajectory run.
//!
//! scores → histogram → Otsu threshold → partition → frame index →
//! per-frame dominant cluster.

use crate::{
    otsu_threshold, partition_by_threshold, AdaptiveClusterer, FramePointIndex, ScoreHistogram,
};
use rayon::prelude::*;
use trajseg_core::{ClusteringConfig, DominantCluster, Error, Result, Trajectory, TrajectorySet};

/// Settings for [`analyze`].
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Adaptive clustering parameters.
    pub clustering: ClusteringConfig,
    /// Cluster frames on the rayon pool instead of one by one.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            clustering: ClusteringConfig::default(),
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Sets the clustering parameters.
    #[must_use]
    pub fn with_clustering(mut self, clustering: ClusteringConfig) -> Self {
        self.clustering = clustering;
        self
    }

    /// Set whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Everything computed for one run.
#[derive(Clone, Debug)]
pub struct Analysis {
    /// Score histogram of all trajectories.
    pub histogram: ScoreHistogram,
    /// Otsu threshold over the histogram.
    pub threshold: u64,
    /// Trajectories with `score >= threshold`.
    pub kept: Vec<Trajectory>,
    /// Trajectories with `score < threshold`.
    pub discarded: Vec<Trajectory>,
    /// Points of the kept trajectories by frame.
    pub index: FramePointIndex,
    /// Dominant cluster of every indexed frame, `None` for empty frames.
    pub frames: Vec<Option<DominantCluster>>,
}

impl Analysis {
    /// Dominant cluster of `frame`, if any.
    #[must_use]
    pub fn dominant(&self, frame: usize) -> Option<&DominantCluster> {
        self.frames.get(frame).and_then(Option::as_ref)
    }
}

/// Computes the Otsu threshold of a run's scores.
///
/// # Errors
/// Propagates histogram and thresholding errors.
pub fn score_threshold(histogram: &ScoreHistogram) -> Result<u64> {
    let threshold = otsu_threshold(histogram.counts(), histogram.total())?;
    u64::try_from(threshold).map_err(|_| Error::InvalidInput(format!("threshold {threshold}")))
}

/// Finds the dominant cluster of every frame in `index`.
///
/// Frames are independent; with `parallel` they run on the rayon pool.
/// Results are returned in frame order either way.
///
/// # Errors
/// Returns the first clustering error encountered.
pub fn cluster_frames(
    index: &FramePointIndex,
    clusterer: &AdaptiveClusterer,
    parallel: bool,
) -> Result<Vec<Option<DominantCluster>>> {
    let frames = index.as_frames();
    if parallel {
        frames
            .par_iter()
            .map(|points| clusterer.dominant_cluster(points))
            .collect()
    } else {
        frames
            .iter()
            .map(|points| clusterer.dominant_cluster(points))
            .collect()
    }
}

/// Runs the full pipeline on `trajectories`.
///
/// # Errors
/// Returns [`Error::EmptyInput`] for an empty run, and propagates
/// configuration, thresholding and clustering errors. No partial result is
/// produced.
pub fn analyze(trajectories: TrajectorySet, config: &AnalysisConfig) -> Result<Analysis> {
    let clusterer = AdaptiveClusterer::new(config.clustering.clone())?;
    let life = trajectories.life().ok_or(Error::EmptyInput)?;

    let histogram = ScoreHistogram::from_scores(&trajectories.scores())?;
    let threshold = score_threshold(&histogram)?;
    log::info!(
        "otsu threshold {threshold} over {} trajectories",
        histogram.total()
    );

    let partition = partition_by_threshold(trajectories.into_inner(), threshold);
    let index = FramePointIndex::build(&partition.kept, life)?;
    let frames = cluster_frames(&index, &clusterer, config.parallel)?;

    Ok(Analysis {
        histogram,
        threshold,
        kept: partition.kept,
        discarded: partition.discarded,
        index,
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajseg_core::Point;

    fn still(start: usize, at: Point, score: u64) -> Trajectory {
        Trajectory::new(start, 2, vec![at; 3], score).unwrap()
    }

    #[test]
    fn test_analyze_empty_run() {
        let err = analyze(TrajectorySet::new(), &AnalysisConfig::default()).unwrap_err();
        assert_eq!(err, Error::EmptyInput);
    }

    #[test]
    fn test_analyze_drops_noise() {
        // Scores 1 | 2, 90, 95: the split falls after 2, which is kept.
        let set = TrajectorySet::from_trajectories(vec![
            still(0, Point::new(10, 10), 90),
            still(0, Point::new(12, 10), 95),
            still(1, Point::new(11, 12), 2),
            still(0, Point::new(400, 400), 1),
        ])
        .unwrap();
        let config = AnalysisConfig::default()
            .with_clustering(ClusteringConfig::new().with_seed(5))
            .with_parallel(false);
        let analysis = analyze(set, &config).unwrap();

        assert_eq!(analysis.threshold, 2);
        assert_eq!(analysis.kept.len(), 3);
        assert_eq!(analysis.discarded.len(), 1);
        assert_eq!(analysis.discarded[0].points()[0], Point::new(400, 400));
        assert_eq!(analysis.index.frame_count(), 4);
        assert_eq!(analysis.frames.len(), 4);

        let first = analysis.dominant(0).unwrap();
        assert_eq!(first.k, 1);
        assert_eq!(first.members(), &[Point::new(10, 10), Point::new(12, 10)]);
        assert_eq!(analysis.dominant(1).unwrap().cluster.len(), 3);
        assert_eq!(analysis.dominant(3).unwrap().members(), &[Point::new(11, 12)]);
        assert!(analysis.dominant(4).is_none());
    }
}
