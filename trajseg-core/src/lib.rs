//! trajseg-core: Core types for trajectory analysis.
//!
//! This crate provides the shared data model used by the thresholding,
//! frame indexing and clustering stages: points, trajectories, clusters,
//! clustering configuration and error types.
//!

pub mod clustering;
pub mod error;
pub mod point;
pub mod trajectory;

pub use clustering::{Cluster, ClusteringConfig, DominantCluster};
pub use error::{ClusteringError, Error, Result};
pub use point::{Centroid, Point};
pub use trajectory::{Trajectory, TrajectorySet};
