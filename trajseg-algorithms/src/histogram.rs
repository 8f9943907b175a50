//! Integer score histogram.
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use trajseg_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Frequency of every integer score from 0 to the maximum observed score.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreHistogram {
    counts: Vec<u64>,
    total: u64,
}

/// One display bin of [`ScoreHistogram::coarse_bins`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoarseBin {
    /// Inclusive lower score bound.
    pub lower: f64,
    /// Exclusive upper score bound (inclusive for the last bin).
    pub upper: f64,
    /// Number of scores falling in the bin.
    pub count: u64,
}

impl ScoreHistogram {
    /// Builds the histogram in one pass over the scores.
    ///
    /// # Errors
    /// Returns [`Error::EmptyInput`] for an empty slice and
    /// [`Error::InvalidInput`] if the bins up to the maximum score cannot be
    /// allocated.
    pub fn from_scores(scores: &[u64]) -> Result<Self> {
        let max = scores.iter().copied().max().ok_or(Error::EmptyInput)?;
        let len = usize::try_from(max)
            .ok()
            .and_then(|m| m.checked_add(1))
            .ok_or_else(|| Error::InvalidInput(format!("score {max} is too large to bin")))?;

        let mut counts = Vec::new();
        counts.try_reserve_exact(len).map_err(|e| {
            Error::InvalidInput(format!("cannot bin scores up to {max}: {e}"))
        })?;
        counts.resize(len, 0u64);
        for &score in scores {
            counts[score as usize] += 1;
        }

        Ok(Self {
            counts,
            total: scores.len() as u64,
        })
    }

    /// Counts indexed by score.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of scores the histogram was built from.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Largest score seen.
    #[must_use]
    pub fn max_score(&self) -> u64 {
        self.counts.len() as u64 - 1
    }

    /// Smallest score seen.
    #[must_use]
    pub fn min_score(&self) -> u64 {
        self.counts.iter().position(|&c| c > 0).unwrap_or(0) as u64
    }

    /// Regroups the counts into `bins` equal-width bins spanning
    /// `[min_score, max_score + 1)`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `bins` is zero.
    pub fn coarse_bins(&self, bins: usize) -> Result<Vec<CoarseBin>> {
        if bins == 0 {
            return Err(Error::InvalidInput("bin count must be at least 1".into()));
        }
        let min = self.min_score() as f64;
        let span = self.max_score() as f64 + 1.0 - min;
        let width = span / bins as f64;

        let mut out: Vec<CoarseBin> = (0..bins)
            .map(|b| CoarseBin {
                lower: min + width * b as f64,
                upper: min + width * (b + 1) as f64,
                count: 0,
            })
            .collect();

        for (score, &count) in self.counts.iter().enumerate().skip(self.min_score() as usize) {
            if count == 0 {
                continue;
            }
            let bin = (((score as f64) - min) / width) as usize;
            out[bin.min(bins - 1)].count += count;
        }

        Ok(out)
    }
}
