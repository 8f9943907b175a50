//! trajseg-io: Trajectory file reading and report writing.
//!
//! Trajectory files are memory-mapped via memmap2 and parsed line by line
//! in parallel. Reports are streamed to any `std::io::Write` sink.
//!

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::{parse_record, parse_trajectories, MappedFileReader, TrajectoryFileReader};
pub use writer::{FrameReport, ReportFormat, ReportWriter, ThresholdReport};
