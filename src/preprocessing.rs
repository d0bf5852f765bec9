use crate::{Matrix, Vector};

/// Per-column standardization to zero mean and unit variance.
///
/// Statistics use the population standard deviation (`ddof = 0`). A column
/// with zero variance is centered but left unscaled, so every value in it
/// becomes `0.0` instead of `NaN`.
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    mean: Option<Vector>,
    scale: Option<Vector>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            mean: None,
            scale: None,
        }
    }

    pub fn fit(&mut self, data: &Matrix) -> Result<(), String> {
        if data.nrows() == 0 {
            return Err("Cannot fit scaler on an empty matrix".to_string());
        }

        let mean = data.mean_axis(ndarray::Axis(0))
            .ok_or("Failed to compute mean")?;
        let scale = data
            .std_axis(ndarray::Axis(0), 0.0)
            .mapv(|s| if s == 0.0 { 1.0 } else { s });

        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(())
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix, String> {
        let mean = self.mean.as_ref()
            .ok_or("Scaler not fitted. Call fit() first.")?;
        let scale = self.scale.as_ref()
            .ok_or("Scaler not fitted. Call fit() first.")?;

        if data.ncols() != mean.len() {
            return Err(format!(
                "Number of features in data ({}) doesn't match fitted data ({})",
                data.ncols(),
                mean.len()
            ));
        }

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(ndarray::Axis(0)) {
            row -= mean;
            row /= scale;
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Result<Matrix, String> {
        self.fit(data)?;
        self.transform(data)
    }

    pub fn mean(&self) -> Option<&Vector> {
        self.mean.as_ref()
    }

    /// Divisor applied to each column; `1.0` for zero-variance columns.
    pub fn scale(&self) -> Option<&Vector> {
        self.scale.as_ref()
    }
}
