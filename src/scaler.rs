use ndarray::{Array1, ArrayView1};

/// Mean and population standard deviation of a score vector, used to move
/// scores into z-space and back out with a different dispersion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardScaler {
    pub mean: f64,
    pub standard_deviation: f64,
}

impl StandardScaler {
    /// Returns `None` for an empty sample.
    pub fn new(samples: ArrayView1<f64>) -> Option<Self> {
        let mean = samples.mean()?;
        // ddof of zero, i.e. population standard deviation
        let standard_deviation = samples.std(0.0);

        Some(StandardScaler {
            mean,
            standard_deviation,
        })
    }

    pub fn scale(&self, sample: ArrayView1<f64>) -> Array1<f64> {
        (&sample - self.mean) / self.standard_deviation
    }

    /// Maps the sample into z-scores and back with `target_deviation` as the new spread.
    pub fn rescale(&self, sample: ArrayView1<f64>, target_deviation: f64) -> Array1<f64> {
        self.scale(sample) * target_deviation + self.mean
    }
}
