//! trajseg-algorithms: Thresholding and clustering stages.
//!
//! This crate provides the processing stages of a trajectory run:
//! - **Histogram** - integer score frequencies
//! - **Otsu** - between-class variance maximizing threshold
//! - **Partition** - kept/discarded split against the threshold
//! - **Frame index** - per-frame active point sets
//! - **Adaptive k-means** - smallest K whose clusters respect a radius bound
//!
#![warn(missing_docs)]

mod adaptive;
mod filter;
mod frame_index;
mod histogram;
pub mod kmeans;
mod otsu;
mod processing;

pub use adaptive::AdaptiveClusterer;
pub use filter::{partition_by_threshold, Partition};
pub use frame_index::FramePointIndex;
pub use histogram::{CoarseBin, ScoreHistogram};
pub use kmeans::{KMeans, KMeansResult};
pub use otsu::{between_class_variance, otsu_threshold};
pub use processing::{analyze, cluster_frames, score_threshold, Analysis, AnalysisConfig};

// Re-export core clustering types
pub use trajseg_core::clustering::{Cluster, ClusteringConfig, DominantCluster};
