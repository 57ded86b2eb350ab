use ndarray::{Array2, ArrayView2};
use rand::Rng;

use crate::error::ConfigError;
use crate::grid::{check_square, KERNEL_SIDE};

/// Draws a `rows` x `cols` weight matrix from the run's generator.
///
/// Each cell's magnitude is uniform over the six-point set
/// {0.0, 0.1, 0.2, 0.3, 0.4, 0.5} and its sign flips with probability 1/2,
/// independently of the magnitude. Cells are filled row-major, so a fixed
/// seed reproduces the exact matrix.
pub fn random_weights<R: Rng>(rng: &mut R, rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |_| {
        let magnitude = rng.random_range(0..6u32) as f64 / 10.0;
        if rng.random_bool(0.5) {
            -magnitude
        } else {
            magnitude
        }
    })
}

/// One 5x5 convolution kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelWeights(Array2<f64>);

impl KernelWeights {
    /// Draws a fresh kernel from the run's generator.
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        Self(random_weights(rng, KERNEL_SIDE, KERNEL_SIDE))
    }

    /// Wraps an arbitrary 5x5 matrix.
    ///
    /// # Errors
    /// Returns `ConfigError::ShapeMismatch` if `cells` is not 5x5.
    pub fn from_array(cells: Array2<f64>) -> Result<Self, ConfigError> {
        check_square("kernel", &cells, KERNEL_SIDE)?;
        Ok(Self(cells))
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.0.view()
    }
}
