//! The clustering pipeline: standardize, cluster, summarize, label.

use crate::cluster::Dbscan;
use crate::dataset::{LabeledDataset, NoiseDataset};
use crate::error::{ProcessingError, Result};
use crate::metrics::ClusterSummary;
use crate::plot::{self, PlotOptions};
use crate::preprocessing::StandardScaler;
use tracing::{debug, info};

pub const DEFAULT_EPS: f64 = 0.5;
pub const DEFAULT_MIN_SAMPLES: usize = 5;

/// DBSCAN parameters supplied with each request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterParams {
    pub eps: f64,
    pub min_samples: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            eps: DEFAULT_EPS,
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }
}

impl ClusterParams {
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self { eps, min_samples }
    }

    /// Parses form values. Absent fields take the defaults; a field that is
    /// present but does not parse fails the whole request.
    pub fn from_form(eps: Option<&str>, min_samples: Option<&str>) -> Result<Self> {
        let eps = match eps {
            None => DEFAULT_EPS,
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| ProcessingError::InvalidParameter {
                name: "eps",
                value: raw.to_string(),
            })?,
        };
        let min_samples = match min_samples {
            None => DEFAULT_MIN_SAMPLES,
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| ProcessingError::InvalidParameter {
                name: "min_samples",
                value: raw.to_string(),
            })?,
        };
        Ok(Self { eps, min_samples })
    }
}

/// Everything a finished run produces, short of the rendered image.
#[derive(Clone, Debug)]
pub struct ClusteringOutcome {
    pub labeled: LabeledDataset,
    pub summary: ClusterSummary,
    pub params: ClusterParams,
}

impl ClusteringOutcome {
    pub fn labels(&self) -> &[i32] {
        self.labeled.labels()
    }

    pub fn csv(&self) -> Result<String> {
        self.labeled.to_csv_string()
    }

    pub fn render_png(&self, options: &PlotOptions) -> Result<Vec<u8>> {
        plot::render_png(&self.labeled, options)
    }
}

pub fn run(dataset: NoiseDataset, params: &ClusterParams) -> Result<ClusteringOutcome> {
    if dataset.is_empty() {
        return Err(ProcessingError::EmptyDataset);
    }

    let mut dbscan = Dbscan::new(params.eps, params.min_samples)
        .map_err(ProcessingError::Clustering)?;

    let mut scaler = StandardScaler::new();
    let scaled = scaler
        .fit_transform(dataset.features())
        .map_err(ProcessingError::Clustering)?;
    debug!(
        "Standardized {} points (mean={:?}, scale={:?})",
        scaled.nrows(),
        scaler.mean(),
        scaler.scale()
    );

    let labels = dbscan.fit_predict(&scaled).map_err(ProcessingError::Clustering)?;
    debug!(
        "DBSCAN(eps={}, min_samples={}) found {} core samples",
        dbscan.eps(),
        dbscan.min_samples(),
        dbscan.core_sample_indices().map_or(0, |c| c.len())
    );

    let summary = ClusterSummary::from_labels(&labels);
    let rows = dataset.len();
    let labeled = LabeledDataset::new(dataset, labels)?;

    info!(
        "Clustered {} rows: {} clusters, {} noise points",
        rows, summary.cluster_count, summary.noise_count
    );

    Ok(ClusteringOutcome {
        labeled,
        summary,
        params: *params,
    })
}
