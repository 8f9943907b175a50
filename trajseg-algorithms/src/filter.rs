//! Threshold partition of trajectories.

use trajseg_core::Trajectory;

/// Result of splitting trajectories against a score threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Trajectories with `score >= threshold`, in input order.
    pub kept: Vec<Trajectory>,
    /// Trajectories with `score < threshold`, in input order.
    pub discarded: Vec<Trajectory>,
}

/// Splits `trajectories` into kept (`score >= threshold`) and discarded.
///
/// Both halves preserve the relative input order.
pub fn partition_by_threshold<I>(trajectories: I, threshold: u64) -> Partition
where
    I: IntoIterator<Item = Trajectory>,
{
    let (kept, discarded): (Vec<_>, Vec<_>) = trajectories
        .into_iter()
        .partition(|t| t.score() >= threshold);
    log::debug!(
        "threshold {threshold}: kept {} trajectories, discarded {}",
        kept.len(),
        discarded.len()
    );
    Partition { kept, discarded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajseg_core::Point;

    fn scored(id: i32, score: u64) -> Trajectory {
        Trajectory::new(0, 0, vec![Point::new(id, id)], score).unwrap()
    }

    #[test]
    fn test_partition_preserves_order() {
        let input: Vec<_> = [5, 1, 9, 3, 5]
            .iter()
            .enumerate()
            .map(|(i, &s)| scored(i as i32, s))
            .collect();
        let partition = partition_by_threshold(input, 5);

        let kept: Vec<_> = partition.kept.iter().map(|t| t.points()[0].x).collect();
        let discarded: Vec<_> = partition.discarded.iter().map(|t| t.points()[0].x).collect();
        assert_eq!(kept, vec![0, 2, 4]);
        assert_eq!(discarded, vec![1, 3]);
    }

    #[test]
    fn test_threshold_zero_keeps_everything() {
        let partition = partition_by_threshold(vec![scored(0, 0), scored(1, 4)], 0);
        assert_eq!(partition.kept.len(), 2);
        assert!(partition.discarded.is_empty());
    }
}
