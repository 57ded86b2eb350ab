use ndarray::ArrayView2;

use crate::grid::{FeatureMap, FeatureMapStack, PaddedGrid, PixelGrid};

/// Sketches a binarized grid, one text row per grid row.
pub fn sketch_pixels(grid: &PixelGrid) -> String {
    rows(grid.view(), ink)
}

/// Sketches a padded grid with the same glyphs as the unpadded one.
pub fn sketch_padded(grid: &PaddedGrid) -> String {
    rows(grid.view(), ink)
}

/// Sketches one feature map, shading cells by response strength.
pub fn sketch_feature_map(map: &FeatureMap) -> String {
    rows(map.view(), shade)
}

/// Sketches every map of a stack in order, separated by blank lines.
pub fn sketch_stack(stack: &FeatureMapStack) -> String {
    let mut out = String::new();
    for map in stack.iter() {
        out.push_str(&sketch_feature_map(map));
        out.push('\n');
    }
    out
}

fn ink(cell: f64) -> char {
    if cell == 0.0 {
        '.'
    } else {
        '@'
    }
}

fn shade(value: f64) -> char {
    if value == 0.0 {
        '.'
    } else if value < 0.2 {
        ';'
    } else if value < 0.5 {
        '^'
    } else {
        '@'
    }
}

fn rows(cells: ArrayView2<'_, f64>, glyph: fn(f64) -> char) -> String {
    let mut out = String::with_capacity(cells.nrows() * (cells.ncols() + 1));
    for row in cells.rows() {
        for &cell in row.iter() {
            out.push(glyph(cell));
        }
        out.push('\n');
    }
    out
}
