//! Typed raster dimensions.

/// Number of rows in a raster
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rows(pub i32);

/// Number of columns in a raster
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Columns(pub i32);

impl Rows {
    pub const fn count(&self) -> i32 {
        self.0
    }
}

impl Columns {
    pub const fn count(&self) -> i32 {
        self.0
    }
}

impl std::ops::Mul<Columns> for Rows {
    type Output = usize;

    fn mul(self, rhs: Columns) -> usize {
        self.0.max(0) as usize * rhs.0.max(0) as usize
    }
}

impl std::fmt::Display for Rows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for Columns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raster size represented by rows and columns.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterSize {
    pub rows: Rows,
    pub cols: Columns,
}

impl RasterSize {
    pub const fn with_rows_cols(rows: Rows, cols: Columns) -> Self {
        RasterSize { rows, cols }
    }

    pub const fn square(size: i32) -> Self {
        RasterSize {
            rows: Rows(size),
            cols: Columns(size),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.count() <= 0 || self.cols.count() <= 0
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn width(&self) -> usize {
        self.cols.count().max(0) as usize
    }

    pub fn height(&self) -> usize {
        self.rows.count().max(0) as usize
    }
}

impl std::fmt::Display for RasterSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(rows: {}, cols: {})", self.rows, self.cols)
    }
}

impl std::fmt::Debug for RasterSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
