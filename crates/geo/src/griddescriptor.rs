use approx::{AbsDiffEq, RelativeEq};

use crate::{BoundingBox, Cell, Error, GeoTransform, Point, RasterSize, Rect, Result, SpatialReference};

/// The size of a raster cell in the units of the reference system, `y` is negative for north-up grids
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellSize {
    x: f64,
    y: f64,
}

impl AbsDiffEq for CellSize {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> <f64 as AbsDiffEq>::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: <f64 as AbsDiffEq>::Epsilon) -> bool {
        f64::abs_diff_eq(&self.x, &other.x, epsilon) && f64::abs_diff_eq(&self.y, &other.y, epsilon)
    }
}

impl RelativeEq for CellSize {
    fn default_max_relative() -> <f64 as AbsDiffEq>::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: <f64 as AbsDiffEq>::Epsilon, max_relative: <f64 as AbsDiffEq>::Epsilon) -> bool {
        f64::relative_eq(&self.x, &other.x, epsilon, max_relative) && f64::relative_eq(&self.y, &other.y, epsilon, max_relative)
    }
}

impl CellSize {
    pub const fn new(x: f64, y: f64) -> Self {
        CellSize { x, y }
    }

    /// Square cells for a north-up grid
    pub const fn square(size: f64) -> Self {
        CellSize::new(size, -size)
    }

    pub fn is_valid(&self) -> bool {
        self.x != 0.0 && self.y != 0.0 && self.x.is_finite() && self.y.is_finite()
    }

    /// The same cell size oriented for a north-up grid: positive `x`, negative `y`
    pub fn north_up(&self) -> Self {
        CellSize::new(self.x.abs(), -self.y.abs())
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

/// The spatial grid of a raster: reference system, affine transform, dimensions, band count and nodata value.
///
/// A descriptor is validated on construction: the transform must be invertible and the dimensions non-empty.
/// The reference system is optional since not every raster file is georeferenced, reprojection however requires one.
#[derive(Clone, Debug)]
pub struct GridDescriptor {
    srs: Option<SpatialReference>,
    geo_transform: GeoTransform,
    size: RasterSize,
    band_count: usize,
    nodata: Option<f64>,
}

impl GridDescriptor {
    pub fn new(
        srs: Option<SpatialReference>,
        geo_transform: GeoTransform,
        size: RasterSize,
        band_count: usize,
        nodata: Option<f64>,
    ) -> Result<Self> {
        if geo_transform.cell_size_x() == 0.0 || geo_transform.cell_size_y() == 0.0 {
            return Err(Error::SingularTransform(format!(
                "Grid transform scale terms must be non-zero: {geo_transform:?}"
            )));
        }

        // Rejects rotated transforms that collapse to a line
        geo_transform.invert()?;

        if size.is_empty() {
            return Err(Error::InvalidArgument(format!("Grid dimensions must be positive: {size}")));
        }

        if band_count == 0 {
            return Err(Error::InvalidArgument("A grid needs at least one band".into()));
        }

        Ok(GridDescriptor {
            srs,
            geo_transform,
            size,
            band_count,
            nodata,
        })
    }

    /// Single band grid with a north-up transform starting at the top left corner
    pub fn with_top_left_origin(
        srs: Option<SpatialReference>,
        size: RasterSize,
        top_left: Point,
        cell_size: CellSize,
        nodata: Option<f64>,
    ) -> Result<Self> {
        Self::new(
            srs,
            GeoTransform::from_top_left_and_cell_size(top_left, cell_size),
            size,
            1,
            nodata,
        )
    }

    /// Single band grid with a north-up transform, positioned using the lower left corner
    pub fn with_lower_left_origin(
        srs: Option<SpatialReference>,
        size: RasterSize,
        lower_left: Point,
        cell_size: CellSize,
        nodata: Option<f64>,
    ) -> Result<Self> {
        let top_left = Point::new(lower_left.x(), lower_left.y() - cell_size.y() * size.rows.count() as f64);
        Self::with_top_left_origin(srs, size, top_left, cell_size, nodata)
    }

    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    pub fn with_spatial_reference(mut self, srs: Option<SpatialReference>) -> Self {
        self.srs = srs;
        self
    }

    pub fn with_band_count(mut self, band_count: usize) -> Result<Self> {
        if band_count == 0 {
            return Err(Error::InvalidArgument("A grid needs at least one band".into()));
        }

        self.band_count = band_count;
        Ok(self)
    }

    pub fn spatial_reference(&self) -> Option<&SpatialReference> {
        self.srs.as_ref()
    }

    pub fn geo_transform(&self) -> GeoTransform {
        self.geo_transform
    }

    pub fn raster_size(&self) -> RasterSize {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.height()
    }

    pub fn columns(&self) -> usize {
        self.size.width()
    }

    pub fn band_count(&self) -> usize {
        self.band_count
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn cell_size(&self) -> CellSize {
        self.geo_transform.cell_size()
    }

    pub fn is_north_up(&self) -> bool {
        self.geo_transform.is_north_up()
    }

    /// Applies the affine transform to a (fractional) cell position, (0, 0) is the top left corner of the grid
    pub fn cell_to_world(&self, col: f64, row: f64) -> Point {
        self.geo_transform.apply(col, row)
    }

    /// The fractional (col, row) position of a world coordinate
    pub fn world_to_cell(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let p = self.geo_transform.invert()?.apply(x, y);
        Ok((p.x(), p.y()))
    }

    pub fn cell_center(&self, cell: Cell) -> Point {
        self.cell_to_world(cell.col as f64 + 0.5, cell.row as f64 + 0.5)
    }

    pub fn center(&self) -> Point {
        self.cell_to_world(self.columns() as f64 / 2.0, self.rows() as f64 / 2.0)
    }

    pub fn point_to_cell(&self, p: Point) -> Result<Cell> {
        let (col, row) = self.world_to_cell(p.x(), p.y())?;
        Ok(Cell::from_row_col(row.floor() as i32, col.floor() as i32))
    }

    pub fn is_cell_on_map(&self, cell: Cell) -> bool {
        cell.row >= 0 && cell.col >= 0 && cell.row < self.size.rows.count() && cell.col < self.size.cols.count()
    }

    pub fn is_point_on_map(&self, p: Point) -> bool {
        self.point_to_cell(p).is_ok_and(|cell| self.is_cell_on_map(cell))
    }

    fn corners(&self) -> [Point; 4] {
        let (cols, rows) = (self.columns() as f64, self.rows() as f64);
        [
            self.cell_to_world(0.0, 0.0),
            self.cell_to_world(cols, 0.0),
            self.cell_to_world(cols, rows),
            self.cell_to_world(0.0, rows),
        ]
    }

    /// The extent enclosing the four grid corners
    pub fn extent(&self) -> Rect<f64> {
        let corners = self.corners();
        let (mut xmin, mut ymin) = (f64::INFINITY, f64::INFINITY);
        let (mut xmax, mut ymax) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in corners {
            xmin = xmin.min(p.x());
            xmax = xmax.max(p.x());
            ymin = ymin.min(p.y());
            ymax = ymax.max(p.y());
        }

        Rect::from_extent(xmin, ymin, xmax, ymax)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.extent(), self.srs.clone())
    }
}

fn nodata_eq(lhs: Option<f64>, rhs: Option<f64>) -> bool {
    match (lhs, rhs) {
        (Some(l), Some(r)) => l == r || (l.is_nan() && r.is_nan()),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for GridDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.srs == other.srs
            && self.geo_transform == other.geo_transform
            && self.size == other.size
            && self.band_count == other.band_count
            && nodata_eq(self.nodata, other.nodata)
    }
}

impl AbsDiffEq for GridDescriptor {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.srs == other.srs
            && self.geo_transform.abs_diff_eq(&other.geo_transform, epsilon)
            && self.size == other.size
            && self.band_count == other.band_count
            && nodata_eq(self.nodata, other.nodata)
    }
}

impl RelativeEq for GridDescriptor {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.srs == other.srs
            && self.geo_transform.relative_eq(&other.geo_transform, epsilon, max_relative)
            && self.size == other.size
            && self.band_count == other.band_count
            && nodata_eq(self.nodata, other.nodata)
    }
}
