//! Otsu thresholding over an integer score histogram.
//!
//! The threshold `t` is the last bin of the lower class. Every candidate
//! split is scored by its between-class variance
//! `w_below * w_above * (mean_below - mean_above)^2` and the first bin
//! reaching the strict maximum wins.
#![allow(clippy::cast_precision_loss)]

use trajseg_core::{Error, Result};

#[inline]
fn split_variance(weight_below: u64, weight_above: u64, sum_below: f64, global_sum: f64) -> f64 {
    let wb = weight_below as f64;
    let wa = weight_above as f64;
    let mean_below = sum_below / wb;
    let mean_above = (global_sum - sum_below) / wa;
    wb * wa * (mean_below - mean_above).powi(2)
}

fn weighted_sum(bins: &[u64]) -> f64 {
    bins.iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum()
}

fn check_total(total: u64) -> Result<()> {
    if total == 0 {
        return Err(Error::InvalidInput(
            "histogram total must be positive".into(),
        ));
    }
    Ok(())
}

fn mass_error(total: u64, weight_below: u64) -> Error {
    Error::InvalidInput(format!(
        "histogram holds at least {weight_below} counts but total is {total}"
    ))
}

/// Computes the Otsu threshold of `histogram`.
///
/// `total` is the number of samples the histogram was built from. A
/// histogram with a single populated bin has no valid split and yields 0.
///
/// # Errors
/// Returns [`Error::EmptyInput`] for an empty histogram and
/// [`Error::InvalidInput`] if `total` is zero or smaller than the counts.
pub fn otsu_threshold(histogram: &[u64], total: u64) -> Result<usize> {
    if histogram.is_empty() {
        return Err(Error::EmptyInput);
    }
    check_total(total)?;

    let global_sum = weighted_sum(histogram);

    let mut weight_below = 0u64;
    let mut sum_below = 0.0;
    let mut best = 0.0;
    let mut threshold = 0;

    for (i, &count) in histogram.iter().enumerate() {
        weight_below += count;
        if weight_below == 0 {
            continue;
        }
        sum_below += i as f64 * count as f64;

        let weight_above = total
            .checked_sub(weight_below)
            .ok_or_else(|| mass_error(total, weight_below))?;
        if weight_above == 0 {
            break;
        }

        let between = split_variance(weight_below, weight_above, sum_below, global_sum);
        if between > best {
            best = between;
            threshold = i;
        }
    }

    log::debug!("otsu threshold {threshold} (between-class variance {best:.3})");
    Ok(threshold)
}

/// Between-class variance of splitting `histogram` after bin `index`.
///
/// Returns `Ok(None)` when either class would be empty or `index` is out
/// of range.
///
/// # Errors
/// Returns [`Error::InvalidInput`] under the same conditions as
/// [`otsu_threshold`].
pub fn between_class_variance(histogram: &[u64], total: u64, index: usize) -> Result<Option<f64>> {
    check_total(total)?;
    let Some(lower) = histogram.get(..=index) else {
        return Ok(None);
    };

    let weight_below: u64 = lower.iter().sum();
    if weight_below == 0 {
        return Ok(None);
    }
    let weight_above = total
        .checked_sub(weight_below)
        .ok_or_else(|| mass_error(total, weight_below))?;
    if weight_above == 0 {
        return Ok(None);
    }

    Ok(Some(split_variance(
        weight_below,
        weight_above,
        weighted_sum(lower),
        weighted_sum(histogram),
    )))
}
