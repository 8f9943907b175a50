//! Report writers for analysis results.
//!
//! Reports go to any `Write` sink, one line per record, either as plain
//! text or as JSON lines.

use crate::Result;
use serde::Serialize;
use std::io::Write;
use trajseg_algorithms::{Analysis, CoarseBin};
use trajseg_core::{Centroid, DominantCluster, Point};

/// Output encoding of a [`ReportWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Per-frame result handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: usize,
    /// Accepted cluster count, absent for an empty frame.
    pub k: Option<usize>,
    pub members: Vec<Point>,
    pub centroid: Option<Centroid>,
}

impl FrameReport {
    #[must_use]
    pub fn new(frame: usize, dominant: Option<&DominantCluster>) -> Self {
        match dominant {
            Some(d) => Self {
                frame,
                k: Some(d.k),
                members: d.members().to_vec(),
                centroid: Some(d.centroid()),
            },
            None => Self {
                frame,
                k: None,
                members: Vec::new(),
                centroid: None,
            },
        }
    }
}

/// Summary of the thresholding stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThresholdReport {
    pub threshold: u64,
    pub trajectories: u64,
    pub kept: usize,
    pub discarded: usize,
    pub min_score: u64,
    pub max_score: u64,
}

impl ThresholdReport {
    #[must_use]
    pub fn from_analysis(analysis: &Analysis) -> Self {
        Self {
            threshold: analysis.threshold,
            trajectories: analysis.histogram.total(),
            kept: analysis.kept.len(),
            discarded: analysis.discarded.len(),
            min_score: analysis.histogram.min_score(),
            max_score: analysis.histogram.max_score(),
        }
    }
}

/// Streams reports to a sink.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: ReportFormat,
}

impl<W: Write> ReportWriter<W> {
    /// Creates a writer over `writer`.
    pub fn new(writer: W, format: ReportFormat) -> Self {
        Self { writer, format }
    }

    fn json_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, value)?;
        writeln!(self.writer)?;
        Ok(())
    }

    /// Writes the thresholding summary.
    pub fn write_threshold(&mut self, report: &ThresholdReport) -> Result<()> {
        match self.format {
            ReportFormat::Json => self.json_line(report),
            ReportFormat::Text => {
                writeln!(self.writer, "Otsu threshold: {}", report.threshold)?;
                writeln!(
                    self.writer,
                    "Scores: {} - {} over {} trajectories",
                    report.min_score, report.max_score, report.trajectories
                )?;
                writeln!(
                    self.writer,
                    "Kept: {}, discarded: {}",
                    report.kept, report.discarded
                )?;
                Ok(())
            }
        }
    }

    /// Writes one frame.
    pub fn write_frame(&mut self, report: &FrameReport) -> Result<()> {
        match self.format {
            ReportFormat::Json => self.json_line(report),
            ReportFormat::Text => {
                match (report.k, report.centroid) {
                    (Some(k), Some(c)) => writeln!(
                        self.writer,
                        "frame {}: k={} members={} centroid=({:.2}, {:.2})",
                        report.frame,
                        k,
                        report.members.len(),
                        c.x,
                        c.y
                    )?,
                    _ => writeln!(self.writer, "frame {}: none", report.frame)?,
                }
                Ok(())
            }
        }
    }

    /// Writes every frame of `analysis`, optionally skipping empty ones.
    pub fn write_frames(&mut self, analysis: &Analysis, skip_empty: bool) -> Result<usize> {
        let mut written = 0;
        for (frame, dominant) in analysis.frames.iter().enumerate() {
            if skip_empty && dominant.is_none() {
                continue;
            }
            self.write_frame(&FrameReport::new(frame, dominant.as_ref()))?;
            written += 1;
        }
        Ok(written)
    }

    /// Writes display bins of the score histogram.
    pub fn write_histogram(&mut self, bins: &[CoarseBin]) -> Result<()> {
        #[derive(Serialize)]
        struct Bin {
            lower: f64,
            upper: f64,
            count: u64,
        }

        let peak = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        for bin in bins {
            match self.format {
                ReportFormat::Json => self.json_line(&Bin {
                    lower: bin.lower,
                    upper: bin.upper,
                    count: bin.count,
                })?,
                ReportFormat::Text => {
                    let bar = usize::try_from(bin.count * 40 / peak).unwrap_or(40);
                    writeln!(
                        self.writer,
                        "{:>10.1} - {:<10.1} {:>8} {}",
                        bin.lower,
                        bin.upper,
                        bin.count,
                        "#".repeat(bar)
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajseg_core::Cluster;

    fn dominant() -> DominantCluster {
        DominantCluster {
            k: 2,
            cluster: Cluster::new(
                vec![Point::new(1, 2), Point::new(3, 2)],
                Centroid::new(2.0, 2.0),
            ),
        }
    }

    #[test]
    fn test_text_frames() {
        let mut writer = ReportWriter::new(Vec::new(), ReportFormat::Text);
        let d = dominant();
        writer.write_frame(&FrameReport::new(3, Some(&d))).unwrap();
        writer.write_frame(&FrameReport::new(4, None)).unwrap();

        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            out,
            "frame 3: k=2 members=2 centroid=(2.00, 2.00)\nframe 4: none\n"
        );
    }

    #[test]
    fn test_json_frame() {
        let mut writer = ReportWriter::new(Vec::new(), ReportFormat::Json);
        let d = dominant();
        writer.write_frame(&FrameReport::new(0, Some(&d))).unwrap();
        writer.write_frame(&FrameReport::new(1, None)).unwrap();

        let out = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines[0],
            r#"{"frame":0,"k":2,"members":[{"x":1,"y":2},{"x":3,"y":2}],"centroid":{"x":2.0,"y":2.0}}"#
        );
        assert_eq!(
            lines[1],
            r#"{"frame":1,"k":null,"members":[],"centroid":null}"#
        );
    }

    #[test]
    fn test_threshold_text() {
        let report = ThresholdReport {
            threshold: 7,
            trajectories: 10,
            kept: 4,
            discarded: 6,
            min_score: 0,
            max_score: 30,
        };
        let mut writer = ReportWriter::new(Vec::new(), ReportFormat::Text);
        writer.write_threshold(&report).unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert!(out.starts_with("Otsu threshold: 7\n"));
        assert!(out.contains("Kept: 4, discarded: 6"));
    }

    #[test]
    fn test_histogram_bars() {
        let bins = [
            CoarseBin { lower: 0.0, upper: 5.0, count: 10 },
            CoarseBin { lower: 5.0, upper: 10.0, count: 5 },
        ];
        let mut writer = ReportWriter::new(Vec::new(), ReportFormat::Text);
        writer.write_histogram(&bins).unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].ends_with(&"#".repeat(40)));
        assert!(lines[1].ends_with(&format!(" {}", "#".repeat(20))));
    }
}
