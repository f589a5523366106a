use std::fmt::Debug;

use approx::{AbsDiffEq, RelativeEq};

use crate::{CellSize, Error, Point, Result};

#[derive(Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    /// Creates a new `GeoTransform` from the provided coefficients.
    ///
    /// The coefficients are in the order: [top left x, pixel width, rotation (0 if north is up), top left y, rotation (0 if north is up), pixel height].
    pub const fn new(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }

    pub fn from_top_left_and_cell_size(top_left: Point, cell_size: CellSize) -> Self {
        Self::new([top_left.x(), cell_size.x(), 0.0, top_left.y(), 0.0, cell_size.y()])
    }

    pub fn cell_size(&self) -> CellSize {
        CellSize::new(self.0[1], self.0[5])
    }

    /// Translates a cell to a point in the raster.
    /// Cell (0, 0) is the top left corner of the raster.
    pub fn apply(&self, col: f64, row: f64) -> Point<f64> {
        let x = self.0[0] + self.0[1] * col + self.0[2] * row;
        let y = self.0[3] + self.0[4] * col + self.0[5] * row;
        Point::new(x, y)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.0[0], self.0[3])
    }

    /// The horizontal cell size
    pub fn cell_size_x(&self) -> f64 {
        self.0[1]
    }

    /// The vertical cell size
    pub fn cell_size_y(&self) -> f64 {
        self.0[5]
    }

    /// Returns the coefficients of the transformation.
    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    /// True when the transform has no rotation terms and rows go from north to south
    pub fn is_north_up(&self) -> bool {
        self.0[2] == 0.0 && self.0[4] == 0.0 && self.0[5] < 0.0
    }

    /// Determinant of the linear part of the transform, the signed area of a single cell
    pub fn determinant(&self) -> f64 {
        self.0[1] * self.0[5] - self.0[2] * self.0[4]
    }

    pub fn invert(&self) -> Result<Self> {
        let gt_in = &self.0;

        if gt_in[2] == 0.0 && gt_in[4] == 0.0 && gt_in[1] != 0.0 && gt_in[5] != 0.0 {
            // No rotation: avoid the determinant and its precision loss
            // X = gt_in[0] + x * gt_in[1]
            // Y = gt_in[3] + y * gt_in[5]
            // -->
            // x = -gt_in[0] / gt_in[1] + (1 / gt_in[1]) * X
            // y = -gt_in[3] / gt_in[5] + (1 / gt_in[5]) * Y
            return Ok(GeoTransform([
                -gt_in[0] / gt_in[1],
                1.0 / gt_in[1],
                0.0,
                -gt_in[3] / gt_in[5],
                0.0,
                1.0 / gt_in[5],
            ]));
        }

        // Assume a 3rd row that is [1 0 0].
        let det = self.determinant();
        let magnitude = f64::max(f64::max(gt_in[1].abs(), gt_in[2].abs()), f64::max(gt_in[4].abs(), gt_in[5].abs()));

        if !det.is_finite() || det.abs() <= 1e-10 * magnitude * magnitude {
            return Err(Error::SingularTransform(format!(
                "Determinant of {self:?} is too small, cannot compute inverse"
            )));
        }

        let inv_det = 1.0 / det;
        let mut gt_out = [0.0; 6];

        // Compute adjoint, and divide by determinant
        gt_out[1] = gt_in[5] * inv_det;
        gt_out[4] = -gt_in[4] * inv_det;

        gt_out[2] = -gt_in[2] * inv_det;
        gt_out[5] = gt_in[1] * inv_det;

        gt_out[0] = (gt_in[2] * gt_in[3] - gt_in[0] * gt_in[5]) * inv_det;
        gt_out[3] = (-gt_in[1] * gt_in[3] + gt_in[0] * gt_in[4]) * inv_det;

        Ok(gt_out.into())
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }
}

impl From<GeoTransform> for [f64; 6] {
    fn from(geo_trans: GeoTransform) -> [f64; 6] {
        geo_trans.0
    }
}

impl Debug for GeoTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GeoTransform(topleft: ({}, {}), pixel_width: {}, pixel_height: {}, rotation: ({}, {}))",
            self.0[0],
            self.0[3],
            self.cell_size_x(),
            self.cell_size_y(),
            self.0[2],
            self.0[4]
        )
    }
}

impl AbsDiffEq for GeoTransform {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

impl RelativeEq for GeoTransform {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}
