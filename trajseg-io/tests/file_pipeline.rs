#![allow(clippy::uninlined_format_args)]
use std::io::Write;
use tempfile::NamedTempFile;
use trajseg_algorithms::{analyze, AnalysisConfig, ClusteringConfig};
use trajseg_io::{ReportFormat, ReportWriter, ThresholdReport, TrajectoryFileReader};

const LIFE: usize = 2;

/// One record: end frame, life, variance components, samples.
fn record(end: usize, var: (f64, f64), samples: [(i32, i32); LIFE + 1]) -> String {
    let mut fields = vec![
        end.to_string(),
        "0".into(),
        LIFE.to_string(),
        "0".into(),
        "0".into(),
        var.0.to_string(),
        var.1.to_string(),
    ];
    fields.extend((0..2 * LIFE).map(|_| "0.0".to_string()));
    for (x, y) in samples {
        fields.push(format!("{}.0", x));
        fields.push(format!("{}.0", y));
    }
    fields.join(" ")
}

fn write_file(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_read_and_analyze_file() {
    let file = write_file(&[
        // Two moving tracks close together, frames 0..=2 and 1..=3.
        record(2, (10.0, 9.0), [(100, 100), (104, 101), (108, 102)]),
        record(3, (9.6, 10.2), [(110, 98), (112, 99), (114, 100)]),
        // Score 1 sits on the threshold bin and is kept.
        record(2, (1.0, 1.0), [(500, 500), (501, 500), (500, 501)]),
        // Score 0 is discarded.
        record(3, (0.4, 3.0), [(20, 20), (21, 21), (20, 20)]),
    ]);

    let reader = TrajectoryFileReader::open(file.path()).unwrap();
    assert!(reader.file_size() > 0);
    let set = reader.read_trajectories().unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(set.scores(), vec![90, 100, 1, 0]);

    let config = AnalysisConfig::default()
        .with_clustering(ClusteringConfig::new().with_seed(3))
        .with_parallel(false);
    let analysis = analyze(set, &config).unwrap();
    assert_eq!(analysis.threshold, 1);
    assert_eq!(analysis.kept.len(), 3);
    assert_eq!(analysis.discarded.len(), 1);

    let mut writer = ReportWriter::new(Vec::new(), ReportFormat::Text);
    writer
        .write_threshold(&ThresholdReport::from_analysis(&analysis))
        .unwrap();
    let written = writer.write_frames(&analysis, true).unwrap();
    assert_eq!(written, 4);
    let out = String::from_utf8(writer.into_inner()).unwrap();
    assert!(out.starts_with("Otsu threshold: 1\n"));
    assert!(out.contains("frame 0: k=2 members=1"));
    assert!(out.contains("frame 1: k=2 members=2"));
    assert!(out.contains("frame 3: k=1 members=1"));
}

#[test]
fn test_empty_file_reads_as_empty_run() {
    let file = NamedTempFile::new().unwrap();
    let reader = TrajectoryFileReader::open(file.path()).unwrap();
    assert_eq!(reader.file_size(), 0);
    assert!(reader.read_trajectories().unwrap().is_empty());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(TrajectoryFileReader::open(dir.path().join("missing.txt")).is_err());
}
