//! Trajectory types.
//!
//! A trajectory is a point track of `life + 1` samples that starts at
//! `start_frame`, together with the pre-computed score used for
//! thresholding. All trajectories of one run share the same `life`.
#![allow(clippy::cast_possible_truncation)]

use crate::error::{Error, Result};
use crate::point::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A tracked point sequence with its significance score.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trajectory {
    start_frame: usize,
    life: usize,
    points: Vec<Point>,
    score: u64,
}

impl Trajectory {
    /// Creates a trajectory.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `points.len() != life + 1` or the
    /// end frame does not fit in `usize`.
    pub fn new(start_frame: usize, life: usize, points: Vec<Point>, score: u64) -> Result<Self> {
        if points.len().checked_sub(1) != Some(life) {
            return Err(Error::InvalidInput(format!(
                "trajectory with life {life} has {} points",
                points.len()
            )));
        }
        if start_frame.checked_add(life).is_none() {
            return Err(Error::InvalidInput(format!(
                "trajectory starting at frame {start_frame} with life {life} ends out of range"
            )));
        }
        Ok(Self {
            start_frame,
            life,
            points,
            score,
        })
    }

    /// First frame the trajectory is active in.
    #[inline]
    #[must_use]
    pub fn start_frame(&self) -> usize {
        self.start_frame
    }

    /// Last frame the trajectory is active in (inclusive).
    #[inline]
    #[must_use]
    pub fn end_frame(&self) -> usize {
        self.start_frame + self.life
    }

    #[inline]
    #[must_use]
    pub fn life(&self) -> usize {
        self.life
    }

    #[inline]
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Returns true if the trajectory has a sample in `frame`.
    #[inline]
    #[must_use]
    pub fn is_active(&self, frame: usize) -> bool {
        (self.start_frame..=self.end_frame()).contains(&frame)
    }

    /// The sample recorded for `frame`, if the trajectory is active there.
    #[must_use]
    pub fn point_at(&self, frame: usize) -> Option<Point> {
        frame
            .checked_sub(self.start_frame)
            .and_then(|offset| self.points.get(offset))
            .copied()
    }

    /// Iterates over `(frame, point)` pairs in frame order.
    pub fn frames(&self) -> impl Iterator<Item = (usize, Point)> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(move |(offset, &p)| (self.start_frame + offset, p))
    }

    /// Score from the two positional variance components of a track.
    ///
    /// Each component is rounded to the nearest integer (halves away from
    /// zero) before multiplying.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if a component is not finite or the
    /// product is negative.
    pub fn score_from_variance(var_x: f64, var_y: f64) -> Result<u64> {
        if !var_x.is_finite() || !var_y.is_finite() {
            return Err(Error::InvalidInput(format!(
                "non-finite variance components ({var_x}, {var_y})"
            )));
        }
        let product = (var_x.round() as i128) * (var_y.round() as i128);
        u64::try_from(product)
            .map_err(|_| Error::InvalidInput(format!("negative or oversized score {product}")))
    }
}

/// The trajectories of one run, all sharing a single life length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectorySet {
    life: Option<usize>,
    trajectories: Vec<Trajectory>,
}

impl TrajectorySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from an existing list.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the trajectories disagree on life.
    pub fn from_trajectories(trajectories: Vec<Trajectory>) -> Result<Self> {
        let mut set = Self {
            life: None,
            trajectories: Vec::with_capacity(trajectories.len()),
        };
        for trajectory in trajectories {
            set.push(trajectory)?;
        }
        Ok(set)
    }

    /// Appends a trajectory.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if its life differs from the set's.
    pub fn push(&mut self, trajectory: Trajectory) -> Result<()> {
        match self.life {
            Some(life) if life != trajectory.life() => {
                return Err(Error::InvalidInput(format!(
                    "trajectory life {} does not match run life {life}",
                    trajectory.life()
                )));
            }
            Some(_) => {}
            None => self.life = Some(trajectory.life()),
        }
        self.trajectories.push(trajectory);
        Ok(())
    }

    /// Shared life length, `None` while the set is empty.
    #[must_use]
    pub fn life(&self) -> Option<usize> {
        self.life
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Trajectory] {
        &self.trajectories
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.trajectories.iter()
    }

    /// Scores in trajectory order.
    #[must_use]
    pub fn scores(&self) -> Vec<u64> {
        self.trajectories.iter().map(Trajectory::score).collect()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Trajectory> {
        self.trajectories
    }
}
