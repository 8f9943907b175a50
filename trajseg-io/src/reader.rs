//! Memory-mapped trajectory file reader.
//!
//! One trajectory per line, whitespace separated. With `l = field[2]`:
//! - `field[0] - l` is the start frame,
//! - `field[5] * field[6]` (each rounded) is the score,
//! - the `2l + 2` fields starting at `2l + 7` are the `(x, y)` samples.
#![allow(clippy::cast_possible_truncation)]

use crate::{Error, Result};
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use trajseg_core::{Point, Trajectory, TrajectorySet};

const LIFE_FIELD: usize = 2;
const VAR_X_FIELD: usize = 5;
const VAR_Y_FIELD: usize = 6;
const HEADER_FIELDS: usize = 7;

/// A memory-mapped file reader.
///
/// Uses memmap2 to access file contents without copying them into memory.
/// Empty files are not mapped and read as an empty slice.
pub struct MappedFileReader {
    mmap: Option<Arc<Mmap>>,
    path: PathBuf,
}

impl MappedFileReader {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let mmap = if file.metadata()?.len() == 0 {
            None
        } else {
            // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
            // This is the standard safety contract for memory mapping.
            #[allow(unsafe_code)]
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapError(e.to_string()))?;
            Some(Arc::new(mmap))
        };
        Ok(Self {
            mmap,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Returns the file contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().map(|m| &m[..]).unwrap_or_default()
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path the reader was opened with.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reader for trajectory record files.
pub struct TrajectoryFileReader {
    reader: MappedFileReader,
}

impl TrajectoryFileReader {
    /// Opens a trajectory file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            reader: MappedFileReader::open(path)?,
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.reader.len()
    }

    /// Parses every record of the file.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] for non-UTF-8 content or a malformed
    /// record, and [`Error::InvalidRecord`] for a record with a negative score.
    pub fn read_trajectories(&self) -> Result<TrajectorySet> {
        let text = std::str::from_utf8(self.reader.as_bytes()).map_err(|e| {
            Error::InvalidFormat {
                line: 0,
                reason: format!("{} is not UTF-8: {e}", self.reader.path().display()),
            }
        })?;
        let set = parse_trajectories(text)?;
        log::info!(
            "read {} trajectories from {}",
            set.len(),
            self.reader.path().display()
        );
        Ok(set)
    }
}

/// Parses a whole trajectory file held in memory.
///
/// Records are parsed in parallel; the returned set keeps file order.
///
/// # Errors
/// See [`TrajectoryFileReader::read_trajectories`]. Every record must share
/// the first record's life.
pub fn parse_trajectories(text: &str) -> Result<TrajectorySet> {
    let lines: Vec<&str> = text.lines().collect();
    let parsed: Vec<(usize, Trajectory)> = lines
        .par_iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_record(line, i + 1).map(|t| (i + 1, t)))
        .collect::<Result<_>>()?;

    let mut set = TrajectorySet::new();
    for (line, trajectory) in parsed {
        if let Some(life) = set.life() {
            if life != trajectory.life() {
                return Err(Error::InvalidFormat {
                    line,
                    reason: format!("life {} differs from run life {life}", trajectory.life()),
                });
            }
        }
        set.push(trajectory)
            .map_err(|source| Error::InvalidRecord { line, source })?;
    }
    Ok(set)
}

fn field<'a>(fields: &[&'a str], index: usize, line: usize) -> Result<&'a str> {
    fields.get(index).copied().ok_or_else(|| Error::InvalidFormat {
        line,
        reason: format!("expected at least {} fields, found {}", index + 1, fields.len()),
    })
}

fn number(text: &str, line: usize) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidFormat {
            line,
            reason: format!("'{text}' is not a finite number"),
        })
}

/// Parses one record. `line` is the 1-based line number used in errors.
///
/// # Errors
/// Returns [`Error::InvalidFormat`] for missing or non-numeric fields or an
/// end frame smaller than the life, and [`Error::InvalidRecord`] for a
/// negative score.
pub fn parse_record(record: &str, line: usize) -> Result<Trajectory> {
    let fields: Vec<&str> = record.split_whitespace().collect();

    let life_text = field(&fields, LIFE_FIELD, line)?;
    let life: usize = life_text.parse().map_err(|_| Error::InvalidFormat {
        line,
        reason: format!("life '{life_text}' is not a non-negative integer"),
    })?;

    let end_text = field(&fields, 0, line)?;
    let end_frame: usize = end_text.parse().map_err(|_| Error::InvalidFormat {
        line,
        reason: format!("frame '{end_text}' is not a non-negative integer"),
    })?;
    let start_frame = end_frame.checked_sub(life).ok_or_else(|| Error::InvalidFormat {
        line,
        reason: format!("end frame {end_frame} precedes life {life}"),
    })?;

    let var_x = number(field(&fields, VAR_X_FIELD, line)?, line)?;
    let var_y = number(field(&fields, VAR_Y_FIELD, line)?, line)?;
    let score = Trajectory::score_from_variance(var_x, var_y)
        .map_err(|source| Error::InvalidRecord { line, source })?;

    // `life` comes from the file; the sample block must fit in the record.
    let out_of_range = || Error::InvalidFormat {
        line,
        reason: format!("life {life} exceeds the record length"),
    };
    let skipped = life.checked_mul(2).ok_or_else(out_of_range)?;
    let offset = skipped.checked_add(HEADER_FIELDS).ok_or_else(out_of_range)?;
    let end = skipped
        .checked_add(2)
        .and_then(|coords| offset.checked_add(coords))
        .ok_or_else(out_of_range)?;
    field(&fields, end - 1, line)?;

    let points = fields[offset..end]
        .chunks_exact(2)
        .map(|pair| {
            let x = number(pair[0], line)?;
            let y = number(pair[1], line)?;
            // Samples are truncated toward zero.
            Ok(Point::new(x as i32, y as i32))
        })
        .collect::<Result<Vec<_>>>()?;

    Trajectory::new(start_frame, life, points, score)
        .map_err(|source| Error::InvalidRecord { line, source })
}
