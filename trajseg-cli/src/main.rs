//! Command-line front end for trajectory thresholding and frame clustering.
#![allow(clippy::uninlined_format_args)]

use clap::{Parser, Subcommand, ValueEnum};

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use trajseg_algorithms::{
    analyze, partition_by_threshold, score_threshold, AnalysisConfig, ScoreHistogram,
};
use trajseg_core::{ClusteringConfig, TrajectorySet};
use trajseg_io::{ReportFormat, ReportWriter, ThresholdReport, TrajectoryFileReader};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    TrajsegIo(#[from] trajseg_io::Error),

    #[error("{0}")]
    Core(#[from] trajseg_core::Error),
}

/// Report encoding.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl From<Format> for ReportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => ReportFormat::Text,
            Format::Json => ReportFormat::Json,
        }
    }
}

/// Trajectory significance thresholding and per-frame dominant clustering.
#[derive(Parser)]
#[command(name = "trajseg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the Otsu threshold of a trajectory file
    Threshold {
        /// Trajectory file
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show the score distribution of a trajectory file
    Histogram {
        /// Trajectory file
        input: PathBuf,

        /// Number of display bins
        #[arg(short, long, default_value = "50")]
        bins: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Threshold trajectories and report the dominant cluster of every frame
    Cluster {
        /// Trajectory file
        input: PathBuf,

        /// Maximum member distance to the cluster centroid
        #[arg(short, long, default_value = "50.0")]
        radius: f64,

        /// K-means iteration cap
        #[arg(long, default_value = "10")]
        max_iterations: usize,

        /// Centroid movement below which k-means stops
        #[arg(long, default_value = "1.0")]
        epsilon: f64,

        /// K-means initializations per cluster count
        #[arg(long, default_value = "10")]
        attempts: usize,

        /// Seed for reproducible centroid initialization
        #[arg(long)]
        seed: Option<u64>,

        /// Cluster frames one at a time instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Omit frames without points
        #[arg(long)]
        skip_empty: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
}

fn read_run(input: &Path) -> Result<TrajectorySet> {
    let reader = TrajectoryFileReader::open(input)?;
    log::debug!("{}: {} bytes", input.display(), reader.file_size());
    Ok(reader.read_trajectories()?)
}

fn threshold_report(set: TrajectorySet) -> Result<ThresholdReport> {
    let histogram = ScoreHistogram::from_scores(&set.scores())?;
    let threshold = score_threshold(&histogram)?;
    let partition = partition_by_threshold(set.into_inner(), threshold);

    Ok(ThresholdReport {
        threshold,
        trajectories: histogram.total(),
        kept: partition.kept.len(),
        discarded: partition.discarded.len(),
        min_score: histogram.min_score(),
        max_score: histogram.max_score(),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let stdout = io::stdout();
    let sink = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Threshold { input, format } => {
            let report = threshold_report(read_run(&input)?)?;
            let mut writer = ReportWriter::new(sink, format.into());
            writer.write_threshold(&report)?;
            writer.flush()?;
        }

        Commands::Histogram {
            input,
            bins,
            format,
        } => {
            let set = read_run(&input)?;
            let histogram = ScoreHistogram::from_scores(&set.scores())?;
            let mut writer = ReportWriter::new(sink, format.into());
            writer.write_histogram(&histogram.coarse_bins(bins)?)?;
            writer.flush()?;
        }

        Commands::Cluster {
            input,
            radius,
            max_iterations,
            epsilon,
            attempts,
            seed,
            sequential,
            skip_empty,
            format,
        } => {
            let set = read_run(&input)?;

            let mut clustering = ClusteringConfig::new()
                .with_max_radius(radius)
                .with_max_iterations(max_iterations)
                .with_epsilon(epsilon)
                .with_attempts(attempts);
            if let Some(seed) = seed {
                clustering = clustering.with_seed(seed);
            }
            let config = AnalysisConfig::default()
                .with_clustering(clustering)
                .with_parallel(!sequential);

            let start = Instant::now();
            let analysis = analyze(set, &config)?;
            log::info!(
                "clustered {} frames in {:.2}s",
                analysis.frames.len(),
                start.elapsed().as_secs_f64()
            );

            let mut writer = ReportWriter::new(sink, format.into());
            writer.write_threshold(&ThresholdReport::from_analysis(&analysis))?;
            let written = writer.write_frames(&analysis, skip_empty)?;
            writer.flush()?;
            log::debug!("wrote {} frame reports", written);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use trajseg_core::{Point, Trajectory};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_threshold_report_keeps_threshold_bin() {
        let set = TrajectorySet::from_trajectories(
            [1, 2, 3, 100, 101, 102]
                .into_iter()
                .map(|score| Trajectory::new(0, 0, vec![Point::new(0, 0)], score).unwrap())
                .collect(),
        )
        .unwrap();
        let report = threshold_report(set).unwrap();
        assert_eq!(report.threshold, 3);
        assert_eq!(report.trajectories, 6);
        assert_eq!(report.kept, 4);
        assert_eq!(report.discarded, 2);
        assert_eq!((report.min_score, report.max_score), (1, 102));
    }

    #[test]
    fn test_cluster_defaults() {
        let cli = Cli::parse_from(["trajseg", "cluster", "tracks.txt"]);
        match cli.command {
            Commands::Cluster {
                radius,
                max_iterations,
                attempts,
                seed,
                sequential,
                ..
            } => {
                assert!((radius - 50.0).abs() < f64::EPSILON);
                assert_eq!(max_iterations, 10);
                assert_eq!(attempts, 10);
                assert_eq!(seed, None);
                assert!(!sequential);
            }
            _ => panic!("expected cluster subcommand"),
        }
    }
}
