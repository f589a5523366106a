use num::NumCast;

use crate::{Point, RasterNum};

/// How cell values are sampled from the source raster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resampling {
    /// Value of the source cell containing the sample position
    #[default]
    Nearest,
    /// Distance weighted average of the 4 surrounding source cell centers (floating point rasters only)
    Bilinear,
}

impl std::fmt::Display for Resampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resampling::Nearest => write!(f, "nearest"),
            Resampling::Bilinear => write!(f, "bilinear"),
        }
    }
}

/// Read access to a single band of source data
pub(crate) struct BandSampler<'a, T: RasterNum> {
    data: &'a [T],
    cols: usize,
    rows: usize,
    nodata: Option<T>,
}

impl<'a, T: RasterNum> BandSampler<'a, T> {
    pub fn new(data: &'a [T], cols: usize, rows: usize, nodata: Option<T>) -> Self {
        debug_assert_eq!(data.len(), cols * rows);
        BandSampler { data, cols, rows, nodata }
    }

    #[inline]
    fn value(&self, col: usize, row: usize) -> Option<T> {
        let v = self.data[row * self.cols + col];
        if v.is_nodata_value(self.nodata) { None } else { Some(v) }
    }

    /// Samples the band at a fractional cell position, `None` means nodata.
    /// The position must be located on the grid.
    pub fn sample(&self, pos: Point, method: Resampling) -> Option<T> {
        match method {
            Resampling::Nearest => self.nearest(pos),
            Resampling::Bilinear => self.bilinear(pos),
        }
    }

    fn nearest(&self, pos: Point) -> Option<T> {
        let col = (pos.x().floor() as usize).min(self.cols - 1);
        let row = (pos.y().floor() as usize).min(self.rows - 1);
        self.value(col, row)
    }

    fn bilinear(&self, pos: Point) -> Option<T> {
        // Offset to cell center coordinates
        let x = pos.x() - 0.5;
        let y = pos.y() - 0.5;

        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let clamp_col = |c: f64| (c.max(0.0) as usize).min(self.cols - 1);
        let clamp_row = |r: f64| (r.max(0.0) as usize).min(self.rows - 1);

        let (c0, c1) = (clamp_col(x0), clamp_col(x0 + 1.0));
        let (r0, r1) = (clamp_row(y0), clamp_row(y0 + 1.0));

        let neighbours = [
            (c0, r0, (1.0 - fx) * (1.0 - fy)),
            (c1, r0, fx * (1.0 - fy)),
            (c0, r1, (1.0 - fx) * fy),
            (c1, r1, fx * fy),
        ];

        let mut sum = 0.0;
        for (col, row, weight) in neighbours {
            if weight == 0.0 {
                continue;
            }

            // Any contributing nodata input makes the result nodata, values are never blended with nodata
            sum += weight * self.value(col, row)?.to_f64()?;
        }

        NumCast::from(sum)
    }
}
