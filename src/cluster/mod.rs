//! Density-based clustering.
//!
//! `Dbscan` groups points that sit in dense neighbourhoods and marks the rest
//! as noise with the [`NOISE`] label. Cluster ids are assigned in the order
//! their first core point appears in the input, so the same input always gets
//! the same labels.
//!
//! # Examples
//!
//! ```rust
//! use noise_clusters::{Dbscan, NOISE};
//! use ndarray::array;
//!
//! let x = array![
//!     [1.0, 1.0],
//!     [1.2, 1.1],
//!     [1.1, 1.2],
//!     [8.0, 8.0],
//!     [8.1, 8.1],
//!     [8.2, 7.9],
//!     [15.0, 1.0] // Outlier
//! ];
//!
//! let mut dbscan = Dbscan::new(1.0, 2).unwrap(); // eps=1.0, min_samples=2
//! let labels = dbscan.fit_predict(&x).unwrap();
//!
//! assert_eq!(labels[6], NOISE);
//! assert_eq!(dbscan.n_clusters(), Some(2));
//! assert_eq!(dbscan.n_noise_points(), Some(1));
//! ```

mod dbscan;

pub use dbscan::{Dbscan, Metric, NOISE};
