//! Per-frame index of active trajectory points.

use trajseg_core::{Error, Point, Result, Trajectory};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Points of every kept trajectory, grouped by the frame they occur in.
///
/// Covers frames `0..=max(start_frame) + life`; frames outside that range
/// read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FramePointIndex {
    frames: Vec<Vec<Point>>,
}

impl FramePointIndex {
    /// Builds the index from trajectories sharing `life`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if a trajectory's life differs or the
    /// frame range cannot be allocated.
    pub fn build(trajectories: &[Trajectory], life: usize) -> Result<Self> {
        let Some(last_start) = trajectories.iter().map(Trajectory::start_frame).max() else {
            return Ok(Self::default());
        };

        let len = last_start
            .checked_add(life)
            .and_then(|last| last.checked_add(1))
            .ok_or_else(|| {
                Error::InvalidInput(format!("frame range past {last_start} overflows"))
            })?;
        let mut frames: Vec<Vec<Point>> = Vec::new();
        frames.try_reserve_exact(len).map_err(|e| {
            Error::InvalidInput(format!("cannot index {len} frames: {e}"))
        })?;
        frames.resize_with(len, Vec::new);
        for trajectory in trajectories {
            if trajectory.life() != life {
                return Err(Error::InvalidInput(format!(
                    "trajectory life {} does not match index life {life}",
                    trajectory.life()
                )));
            }
            for (frame, point) in trajectory.frames() {
                frames[frame].push(point);
            }
        }

        log::debug!(
            "indexed {} trajectories over {} frames",
            trajectories.len(),
            frames.len()
        );
        Ok(Self { frames })
    }

    /// Points active in `frame`.
    #[must_use]
    pub fn points(&self, frame: usize) -> &[Point] {
        self.frames.get(frame).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of indexed frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if no frame was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterates over `(frame, points)` in frame order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Point])> {
        self.frames.iter().map(Vec::as_slice).enumerate()
    }

    pub(crate) fn as_frames(&self) -> &[Vec<Point>] {
        &self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(start: usize, origin: i32) -> Trajectory {
        let points = (0..3).map(|i| Point::new(origin + i, origin)).collect();
        Trajectory::new(start, 2, points, 1).unwrap()
    }

    #[test]
    fn test_frame_range_and_contents() {
        let index = FramePointIndex::build(&[track(0, 100), track(3, 200)], 2).unwrap();
        assert_eq!(index.frame_count(), 6);
        assert_eq!(index.points(0), &[Point::new(100, 100)]);
        assert_eq!(index.points(2), &[Point::new(102, 100)]);
        assert!(index.points(3).len() == 1 && index.points(3)[0] == Point::new(200, 200));
        assert_eq!(index.points(5), &[Point::new(202, 200)]);
        assert!(index.points(6).is_empty());
    }

    #[test]
    fn test_gap_frames_are_empty() {
        let index = FramePointIndex::build(&[track(0, 10), track(10, 20)], 2).unwrap();
        assert_eq!(index.frame_count(), 13);
        for frame in 3..10 {
            assert!(index.points(frame).is_empty());
        }
    }

    #[test]
    fn test_overlapping_tracks_share_frames() {
        let index = FramePointIndex::build(&[track(0, 10), track(1, 50)], 2).unwrap();
        assert_eq!(index.points(1), &[Point::new(11, 10), Point::new(50, 50)]);
        assert_eq!(index.points(2).len(), 2);
    }

    #[test]
    fn test_unallocatable_frame_range() {
        let far = Trajectory::new(usize::MAX / 8, 1, vec![Point::new(0, 0); 2], 1).unwrap();
        assert!(matches!(
            FramePointIndex::build(&[far], 1),
            Err(Error::InvalidInput(_))
        ));

        let last = Trajectory::new(usize::MAX - 1, 1, vec![Point::new(0, 0); 2], 1).unwrap();
        assert!(matches!(
            FramePointIndex::build(&[last], 1),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_and_mismatched_life() {
        assert!(FramePointIndex::build(&[], 4).unwrap().is_empty());
        assert!(FramePointIndex::build(&[track(0, 0)], 3).is_err());
    }
}
