use crate::Matrix;
use std::collections::{HashSet, VecDeque};

/// Label assigned to points that belong to no cluster.
pub const NOISE: i32 = -1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    #[default]
    Euclidean,
    Manhattan,
}

#[derive(Clone, Debug)]
pub struct Dbscan {
    labels: Option<Vec<i32>>,
    core_sample_indices: Option<Vec<usize>>,
    eps: f64,
    min_samples: usize,
    metric: Metric,
}

impl Dbscan {
    pub fn new(eps: f64, min_samples: usize) -> Result<Self, String> {
        if !eps.is_finite() || eps <= 0.0 {
            return Err(format!("eps must be a positive number, got {}", eps));
        }
        if min_samples == 0 {
            return Err(format!("min_samples must be > 0, got {}", min_samples));
        }

        Ok(Self {
            labels: None,
            core_sample_indices: None,
            eps,
            min_samples,
            metric: Metric::Euclidean,
        })
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    pub fn fit(&mut self, x: &Matrix) -> Result<(), String> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err("Input matrix must have at least one sample and one feature".to_string());
        }

        let n_samples = x.nrows();
        let neighborhoods: Vec<Vec<usize>> = (0..n_samples)
            .map(|i| self.region_query(x, i))
            .collect();

        let is_core: Vec<bool> = neighborhoods
            .iter()
            .map(|neighbors| neighbors.len() >= self.min_samples)
            .collect();

        let mut labels = vec![NOISE; n_samples];
        let mut current_cluster = 0;

        // Seeds are visited in index order so numbering is stable for a given input.
        for seed in 0..n_samples {
            if !is_core[seed] || labels[seed] != NOISE {
                continue;
            }

            labels[seed] = current_cluster;
            let mut queue: VecDeque<usize> = neighborhoods[seed].iter().copied().collect();

            while let Some(idx) = queue.pop_front() {
                if labels[idx] != NOISE {
                    continue;
                }
                labels[idx] = current_cluster;

                // Only core points extend the cluster; border points stop here.
                if is_core[idx] {
                    queue.extend(
                        neighborhoods[idx]
                            .iter()
                            .copied()
                            .filter(|&nn| labels[nn] == NOISE),
                    );
                }
            }

            current_cluster += 1;
        }

        let core_samples = is_core
            .iter()
            .enumerate()
            .filter_map(|(i, &core)| core.then_some(i))
            .collect();

        self.labels = Some(labels);
        self.core_sample_indices = Some(core_samples);

        Ok(())
    }

    pub fn fit_predict(&mut self, x: &Matrix) -> Result<Vec<i32>, String> {
        self.fit(x)?;
        self.labels
            .clone()
            .ok_or_else(|| "DBSCAN produced no labels".to_string())
    }

    pub fn labels(&self) -> Option<&[i32]> {
        self.labels.as_deref()
    }

    pub fn core_sample_indices(&self) -> Option<&[usize]> {
        self.core_sample_indices.as_deref()
    }

    fn region_query(&self, x: &Matrix, point_idx: usize) -> Vec<usize> {
        let point = x.row(point_idx);
        (0..x.nrows())
            .filter(|&i| self.compute_distance(&point, &x.row(i)) <= self.eps)
            .collect()
    }

    fn compute_distance(&self, a: &ndarray::ArrayView1<f64>, b: &ndarray::ArrayView1<f64>) -> f64 {
        match self.metric {
            Metric::Euclidean => {
                a.iter()
                    .zip(b.iter())
                    .map(|(x, y)| (x - y) * (x - y))
                    .sum::<f64>()
                    .sqrt()
            }
            Metric::Manhattan => {
                a.iter()
                    .zip(b.iter())
                    .map(|(x, y)| (x - y).abs())
                    .sum::<f64>()
            }
        }
    }

    pub fn n_clusters(&self) -> Option<usize> {
        self.labels.as_ref().map(|labels| {
            labels.iter()
                .filter(|&&l| l != NOISE)
                .collect::<HashSet<_>>()
                .len()
        })
    }

    pub fn n_noise_points(&self) -> Option<usize> {
        self.labels.as_ref().map(|labels| {
            labels.iter()
                .filter(|&&l| l == NOISE)
                .count()
        })
    }

    pub fn is_core_sample(&self, sample_idx: usize) -> Option<bool> {
        self.core_sample_indices.as_ref().map(|core_indices| {
            core_indices.binary_search(&sample_idx).is_ok()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dbscan_basic() {
        // Two tight groups and one outlier
        let x = array![
            [1.0, 1.0],
            [1.2, 1.1],
            [1.1, 1.2],
            [8.0, 8.0],
            [8.1, 8.1],
            [8.2, 7.9],
            [15.0, 1.0]
        ];

        let mut dbscan = Dbscan::new(1.0, 2).unwrap();
        let labels = dbscan.fit_predict(&x).unwrap();

        assert_eq!(labels, vec![0, 0, 0, 1, 1, 1, NOISE]);
        assert_eq!(dbscan.n_clusters(), Some(2));
        assert_eq!(dbscan.n_noise_points(), Some(1));
    }

    #[test]
    fn test_dbscan_noise_detection() {
        let x = array![
            [0.0, 0.0],
            [10.0, 10.0],
            [20.0, 20.0],
            [30.0, 30.0]
        ];

        let mut dbscan = Dbscan::new(1.0, 2).unwrap();
        dbscan.fit(&x).unwrap();

        assert_eq!(dbscan.n_noise_points(), Some(x.nrows()));
        assert_eq!(dbscan.n_clusters(), Some(0));
    }

    #[test]
    fn test_dbscan_single_cluster() {
        let x = array![
            [1.0, 1.0],
            [1.1, 1.0],
            [1.0, 1.1],
            [1.1, 1.1],
            [1.2, 1.0],
            [1.0, 1.2]
        ];

        let mut dbscan = Dbscan::new(0.5, 2).unwrap();
        let labels = dbscan.fit_predict(&x).unwrap();

        assert_eq!(dbscan.n_clusters(), Some(1));
        assert!(labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn test_min_samples_counts_the_point_itself() {
        // Each point has exactly one neighbour besides itself.
        let x = array![[0.0, 0.0], [0.5, 0.0], [10.0, 0.0], [10.5, 0.0]];

        let mut pairs = Dbscan::new(0.6, 2).unwrap();
        assert_eq!(pairs.fit_predict(&x).unwrap(), vec![0, 0, 1, 1]);

        let mut triples = Dbscan::new(0.6, 3).unwrap();
        assert_eq!(triples.fit_predict(&x).unwrap(), vec![NOISE; 4]);
    }

    #[test]
    fn test_border_point_joins_cluster() {
        // Points 0..=2 are core with min_samples=3; point 3 only reaches point 2.
        let x = array![[0.0, 0.0], [0.4, 0.0], [0.8, 0.0], [1.6, 0.0], [5.0, 5.0]];

        let mut dbscan = Dbscan::new(0.9, 3).unwrap();
        let labels = dbscan.fit_predict(&x).unwrap();

        assert_eq!(labels, vec![0, 0, 0, 0, NOISE]);
        assert_eq!(dbscan.is_core_sample(1), Some(true));
        assert_eq!(dbscan.is_core_sample(3), Some(false));
    }

    #[test]
    fn test_eps_is_inclusive() {
        let x = array![[0.0, 0.0], [3.0, 4.0]];
        let mut dbscan = Dbscan::new(5.0, 2).unwrap();
        assert_eq!(dbscan.fit_predict(&x).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_dbscan_manhattan_metric() {
        let x = array![
            [0.0, 0.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0]
        ];

        let mut euclid = Dbscan::new(0.9, 2).unwrap();
        euclid.fit(&x).unwrap();
        assert_eq!(euclid.n_clusters(), Some(0));

        let mut manhattan = Dbscan::new(1.5, 2).unwrap().metric(Metric::Manhattan);
        manhattan.fit(&x).unwrap();
        assert_eq!(manhattan.n_clusters(), Some(1));
    }

    #[test]
    fn test_dbscan_invalid_eps() {
        assert!(Dbscan::new(-1.0, 2).is_err());
        assert!(Dbscan::new(0.0, 2).is_err());
        assert!(Dbscan::new(f64::NAN, 2).is_err());
        assert!(Dbscan::new(f64::INFINITY, 2).is_err());
    }

    #[test]
    fn test_dbscan_invalid_min_samples() {
        assert!(Dbscan::new(1.0, 0).is_err());
    }

    #[test]
    fn test_dbscan_empty_input() {
        let x = Matrix::zeros((0, 2));
        let mut dbscan = Dbscan::new(0.5, 5).unwrap();
        assert!(dbscan.fit(&x).is_err());
    }

    #[test]
    fn test_unfitted_accessors() {
        let dbscan = Dbscan::new(0.5, 5).unwrap();
        assert!(dbscan.labels().is_none());
        assert!(dbscan.n_clusters().is_none());
        assert!(dbscan.is_core_sample(0).is_none());
    }

    #[test]
    fn test_dbscan_is_deterministic() {
        let x = array![
            [0.1, 0.2], [0.15, 0.22], [3.0, 3.1], [0.12, 0.18],
            [3.05, 3.0], [3.1, 3.05], [9.0, -4.0]
        ];
        let first = Dbscan::new(0.3, 2).unwrap().fit_predict(&x).unwrap();
        let second = Dbscan::new(0.3, 2).unwrap().fit_predict(&x).unwrap();
        assert_eq!(first, second);
    }
}
