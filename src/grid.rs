use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

use crate::error::ConfigError;

/// Side length of one raw digit image.
pub const GRID_SIDE: usize = 28;
/// Bytes in one image record.
pub const PIXELS: usize = GRID_SIDE * GRID_SIDE;
/// Zero cells added on every side of the grid before convolution.
pub const PAD_WIDTH: usize = 2;
/// Side length of the padded grid.
pub const PADDED_SIDE: usize = GRID_SIDE + 2 * PAD_WIDTH;
/// Side length of every convolution kernel.
pub const KERNEL_SIDE: usize = 5;
/// Side length of a feature map (valid-mode output, stride 1).
pub const MAP_SIDE: usize = PADDED_SIDE - KERNEL_SIDE + 1;
/// Number of digit classes.
pub const CLASSES: usize = 10;

/// A binarized digit image. Every cell is exactly 0.0 or 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid(Array2<f64>);

impl PixelGrid {
    /// Binarizes one raw image record, row-major.
    ///
    /// Byte value 0 maps to 0.0 and every other byte value to 1.0. This is
    /// a hard threshold, not an intensity scale.
    pub fn from_record(record: &[u8; PIXELS]) -> Self {
        let cells = record
            .iter()
            .map(|&b| if b == 0 { 0.0 } else { 1.0 })
            .collect();
        Self(Array2::from_shape_vec((GRID_SIDE, GRID_SIDE), cells).unwrap())
    }

    /// Wraps an arbitrary 28x28 matrix.
    ///
    /// # Errors
    /// Returns `ConfigError::ShapeMismatch` if `cells` is not 28x28.
    pub fn from_array(cells: Array2<f64>) -> Result<Self, ConfigError> {
        check_square("pixel grid", &cells, GRID_SIDE)?;
        Ok(Self(cells))
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.0.view()
    }

    /// Flattens the grid into input-layer activations, row-major.
    pub fn activations(&self) -> ActivationVector {
        ActivationVector(Array1::from_iter(self.0.iter().copied()))
    }
}

/// The 784 input-layer activations derived from one `PixelGrid`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationVector(Array1<f64>);

impl ActivationVector {
    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A one-hot encoding of a decoded label.
///
/// Exactly one entry is 1.0 and it sits at the labeled digit's index.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVector(Array1<f64>);

impl LabelVector {
    /// Builds the one-hot vector for `digit`.
    ///
    /// # Panics
    /// Panics if `digit` is not in 0..=9. Callers decoding untrusted bytes
    /// must range-check first (the decoder reports `LabelOutOfRange`).
    pub fn one_hot(digit: u8) -> Self {
        assert!((digit as usize) < CLASSES, "digit must be in 0..=9");
        let mut slots = Array1::zeros(CLASSES);
        slots[digit as usize] = 1.0;
        Self(slots)
    }

    /// The digit this vector encodes.
    pub fn digit(&self) -> u8 {
        self.0.iter().position(|&v| v == 1.0).unwrap() as u8
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }
}

/// A pixel grid embedded in a zero border, ready for valid-mode convolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedGrid(Array2<f64>);

impl PaddedGrid {
    /// Embeds `pixels` at offset (2, 2) inside a zeroed 32x32 grid.
    pub fn from_pixels(pixels: &PixelGrid) -> Self {
        let mut cells = Array2::zeros((PADDED_SIDE, PADDED_SIDE));
        cells
            .slice_mut(s![
                PAD_WIDTH..PAD_WIDTH + GRID_SIDE,
                PAD_WIDTH..PAD_WIDTH + GRID_SIDE
            ])
            .assign(&pixels.view());
        Self(cells)
    }

    /// Wraps an arbitrary 32x32 matrix.
    ///
    /// # Errors
    /// Returns `ConfigError::ShapeMismatch` if `cells` is not 32x32.
    pub fn from_array(cells: Array2<f64>) -> Result<Self, ConfigError> {
        check_square("padded grid", &cells, PADDED_SIDE)?;
        Ok(Self(cells))
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.0.view()
    }
}

/// The 28x28 response of one kernel slid over a padded grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMap(Array2<f64>);

impl FeatureMap {
    pub(crate) fn new(cells: Array2<f64>) -> Self {
        debug_assert_eq!(cells.dim(), (MAP_SIDE, MAP_SIDE));
        Self(cells)
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.0.view()
    }
}

/// Feature maps in kernel draw order, one per kernel of a convolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMapStack {
    maps: Vec<FeatureMap>,
}

impl FeatureMapStack {
    pub(crate) fn new(maps: Vec<FeatureMap>) -> Self {
        Self { maps }
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FeatureMap> {
        self.maps.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureMap> {
        self.maps.iter()
    }
}

pub(crate) fn check_square(
    what: &'static str,
    cells: &Array2<f64>,
    side: usize,
) -> Result<(), ConfigError> {
    let (rows, cols) = cells.dim();
    if rows != side {
        return Err(ConfigError::ShapeMismatch {
            what,
            got: rows,
            expected: side,
        });
    }
    if cols != side {
        return Err(ConfigError::ShapeMismatch {
            what,
            got: cols,
            expected: side,
        });
    }
    Ok(())
}
