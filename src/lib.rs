//! Density-based clustering of day/night noise level datasets.
//!
//! The crate reads a CSV with `Day` and `Night` decibel columns, standardizes
//! both columns, runs DBSCAN over the scaled points and presents the result as
//! a scatter plot and a labeled CSV. It ships as an HTTP service and as a
//! one-shot script.

use ndarray::{Array1, Array2};

pub mod cluster;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod plot;
pub mod preprocessing;
pub mod server;

pub use cluster::{Dbscan, Metric, NOISE};
pub use config::ServerConfig;
pub use dataset::{ColumnKind, LabeledDataset, NoiseDataset};
pub use error::{AppError, ProcessingError};
pub use metrics::ClusterSummary;
pub use pipeline::{ClusterParams, ClusteringOutcome};
pub use plot::PlotOptions;
pub use preprocessing::StandardScaler;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

/// Header of the first retained column.
pub const DAY_COLUMN: &str = "Day";
/// Header of the second retained column.
pub const NIGHT_COLUMN: &str = "Night";
/// Header of the label column in exported CSVs.
pub const CLUSTER_COLUMN: &str = "cluster";
/// File name used for CSV downloads and for the script's output.
pub const EXPORT_FILENAME: &str = "noise_clusters.csv";
