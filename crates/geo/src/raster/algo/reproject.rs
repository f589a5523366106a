use crate::{
    BoundingBox, CellSize, Columns, CoordinateTransformer, Error, GeoTransform, GridDescriptor, Point, Raster, RasterNum, RasterSize, Rect,
    Result, Rows, SpatialReference, point,
};

use super::resample::{BandSampler, Resampling};

pub const DEFAULT_EDGE_SAMPLE_COUNT: usize = 25;
const MIN_EDGE_POINTS: usize = 3;
/// Cell counts closer than this to an integer are not rounded up
const CELL_COUNT_SNAP_TOLERANCE: f64 = 1e-6;
/// Upper bound for the number of values (cells times bands) of a reprojected raster
pub const MAX_DESTINATION_VALUES: usize = 1 << 31;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetPixelAlignment {
    /// The target grid is centered on the reprojected extent
    #[default]
    No,
    /// Align the coordinates of the target extent to multiples of the cell size
    Yes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumThreads {
    AllCpus,
    Count(usize),
}

/// Strategy to determine the grid of the reprojected raster
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetGrid {
    /// Square cells that preserve the ground footprint of a source cell, the extent covers the reprojected source extent
    #[default]
    Derived,
    /// Uses the provided cell size for the target, only the magnitude of the values is used since the target is north-up
    Resolution(CellSize, TargetPixelAlignment),
    /// Uses the exact raster size for the target, the cells span the reprojected source extent
    Sized(RasterSize),
    /// Uses the provided geotransform and raster size
    Exact(GeoTransform, RasterSize),
}

/// What to do when none of the target cells map onto the source raster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmptyIntersectionPolicy {
    /// Return the raster filled with nodata together with a warning
    #[default]
    Warn,
    /// Fail with `Error::EmptyIntersection`
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReprojectWarning {
    /// The source and target extents do not overlap, all target cells contain nodata
    EmptyIntersection,
}

impl std::fmt::Display for ReprojectWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReprojectWarning::EmptyIntersection => write!(f, "The source and target extents do not overlap, the result only contains nodata"),
        }
    }
}

/// Reprojection settings.
///
/// The destination nodata value is not configurable: it is the source nodata value, integer sources without one
/// use the type sentinel (`T::MAX` for unsigned, `T::MIN` for signed types) which can collide with valid data.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ReprojectOptions {
    /// The strategy to determine the target grid (default = `TargetGrid::Derived`)
    #[builder(default)]
    pub target_grid: TargetGrid,
    /// The resampling method, integer rasters always use `Resampling::Nearest` (default = `Resampling::Nearest`)
    #[builder(default)]
    pub resampling: Resampling,
    /// Number of points sampled along each edge of the source extent to calculate the target extent (default = 25)
    #[builder(default = DEFAULT_EDGE_SAMPLE_COUNT)]
    pub edge_sample_count: usize,
    /// Linear interpolation threshold in source pixels, 0 transforms every cell exactly (default = 0)
    #[builder(default)]
    pub error_threshold: f64,
    /// Behavior when the target grid does not overlap with the source (default = `EmptyIntersectionPolicy::Warn`)
    #[builder(default)]
    pub empty_intersection: EmptyIntersectionPolicy,
    /// Configure how many threads process the target rows, only has effect with the `rayon` feature (default = 1)
    #[builder(default = NumThreads::Count(1))]
    pub num_threads: NumThreads,
}

impl Default for ReprojectOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The outcome of a reprojection
#[derive(Debug, Clone)]
pub struct Reprojection<T: RasterNum> {
    pub raster: Raster<T>,
    pub warning: Option<ReprojectWarning>,
}

/// Reprojects rasters to another coordinate reference system.
#[derive(Debug, Clone, Default)]
pub struct Reprojector {
    options: ReprojectOptions,
}

impl Reprojector {
    pub fn new(options: ReprojectOptions) -> Self {
        Reprojector { options }
    }

    pub fn options(&self) -> &ReprojectOptions {
        &self.options
    }

    /// Calculates the grid a raster with the provided grid would be reprojected to, without resampling
    pub fn destination_grid(&self, grid: &GridDescriptor, target: &SpatialReference) -> Result<GridDescriptor> {
        let source_srs = grid.spatial_reference().ok_or(Error::UndefinedCrs)?;
        let coord_trans = CoordinateTransformer::new(source_srs, target);

        if coord_trans.is_identity() && self.options.target_grid == TargetGrid::Derived {
            log::debug!("Target reference system matches the source ({target}), reusing the source grid");
            return Ok(grid.clone());
        }

        let target_extent = || reproject_extent(&grid.extent(), &coord_trans, self.options.edge_sample_count);

        let (geo_transform, raster_size) = match self.options.target_grid {
            TargetGrid::Derived => {
                let resolution = derived_resolution(grid, &coord_trans)?;
                grid_for_extent(&target_extent()?, CellSize::square(resolution))?
            }
            TargetGrid::Resolution(cell_size, alignment) => {
                let cell_size = checked_resolution(cell_size)?;
                match alignment {
                    TargetPixelAlignment::No => grid_for_extent(&target_extent()?, cell_size)?,
                    TargetPixelAlignment::Yes => aligned_grid_for_extent(&target_extent()?, cell_size)?,
                }
            }
            TargetGrid::Sized(raster_size) => {
                if raster_size.is_empty() {
                    return Err(Error::InvalidArgument(format!("Invalid target raster size: {raster_size}")));
                }

                let extent = target_extent()?;
                let cell_size = CellSize::new(
                    extent.width() / raster_size.cols.count() as f64,
                    -(extent.height() / raster_size.rows.count() as f64),
                );
                (GeoTransform::from_top_left_and_cell_size(extent.top_left(), cell_size), raster_size)
            }
            TargetGrid::Exact(geo_transform, raster_size) => (geo_transform, raster_size),
        };

        check_value_count(raster_size, grid.band_count())?;

        let dest = GridDescriptor::new(Some(target.clone()), geo_transform, raster_size, grid.band_count(), grid.nodata())?;
        log::debug!(
            "Destination grid in {target}: {:?} {}",
            dest.geo_transform(),
            dest.raster_size()
        );

        Ok(dest)
    }

    pub fn reproject<T: RasterNum>(&self, src: &Raster<T>, target: &SpatialReference) -> Result<Reprojection<T>> {
        let dest_grid = self.destination_grid(src.grid(), target)?;

        if src.grid().spatial_reference() == Some(target) && dest_grid == *src.grid() {
            return Ok(Reprojection {
                raster: src.clone(),
                warning: None,
            });
        }

        self.reproject_to_grid(src, dest_grid)
    }

    /// Resamples the source raster into the provided destination grid.
    ///
    /// The band count of the destination follows the source and the nodata value of the destination
    /// is the source nodata value (or the type sentinel if the source has none).
    ///
    /// Integer rasters without a nodata value use `T::MAX` (unsigned) or `T::MIN` (signed) as sentinel.
    /// Source cells containing that value become indistinguishable from cells outside of the source,
    /// assign a nodata value to the source grid that does not occur in the data when this matters.
    pub fn reproject_to_grid<T: RasterNum>(&self, src: &Raster<T>, dest_grid: GridDescriptor) -> Result<Reprojection<T>> {
        let source_srs = src.grid().spatial_reference().ok_or(Error::UndefinedCrs)?;
        let target_srs = dest_grid.spatial_reference().ok_or(Error::UndefinedCrs)?.clone();
        check_value_count(dest_grid.raster_size(), src.band_count())?;

        let nodata = src.nodata_value().unwrap_or(T::NODATA);
        let dest_grid = dest_grid.with_band_count(src.band_count())?.with_nodata(nodata.to_f64());

        // Destination cells are mapped back onto the source grid
        let coord_trans = CoordinateTransformer::new(&target_srs, source_srs);
        let mapper = CellMapper::new(&dest_grid, src.grid(), &coord_trans, self.options.error_threshold)?;
        let positions = mapper.map_grid(self.options.num_threads)?;

        let warning = if positions.iter().all(Option::is_none) {
            match self.options.empty_intersection {
                EmptyIntersectionPolicy::Error => return Err(Error::EmptyIntersection),
                EmptyIntersectionPolicy::Warn => {
                    log::warn!(
                        "Reprojection from {source_srs} to {target_srs}: {}",
                        ReprojectWarning::EmptyIntersection
                    );
                    Some(ReprojectWarning::EmptyIntersection)
                }
            }
        } else {
            None
        };

        let method = match self.options.resampling {
            Resampling::Bilinear if !T::is_float() => {
                log::debug!("Bilinear resampling is not supported for {} rasters, using nearest", T::TYPE);
                Resampling::Nearest
            }
            method => method,
        };

        let cols = dest_grid.columns();
        let cell_count = dest_grid.raster_size().cell_count();
        let mut data = vec![nodata; cell_count * dest_grid.band_count()];

        if warning.is_none() {
            let src_grid = src.grid();
            for (src_band, dest_band) in src.bands().zip(data.chunks_exact_mut(cell_count)) {
                let sampler = BandSampler::new(src_band, src_grid.columns(), src_grid.rows(), src.nodata_value());
                for_each_row(dest_band, cols, self.options.num_threads, |row, row_slice| {
                    let row_positions = &positions[row * cols..(row + 1) * cols];
                    for (value, pos) in row_slice.iter_mut().zip(row_positions) {
                        if let Some(pos) = pos {
                            *value = sampler.sample(*pos, method).unwrap_or(nodata);
                        }
                    }
                })?;
            }
        }

        Ok(Reprojection {
            raster: Raster::new(dest_grid, data)?,
            warning,
        })
    }
}

/// Reprojects a raster to the target reference system.
///
/// When a target resolution is provided it is used as the cell size of the result (north-up), otherwise the
/// resolution is derived from the source cell footprint. Empty intersections are logged as a warning.
pub fn reproject<T: RasterNum>(src: &Raster<T>, target: &SpatialReference, target_resolution: Option<CellSize>) -> Result<Raster<T>> {
    let target_grid = match target_resolution {
        Some(cell_size) => TargetGrid::Resolution(cell_size, TargetPixelAlignment::No),
        None => TargetGrid::Derived,
    };

    let reprojector = Reprojector::new(ReprojectOptions::builder().target_grid(target_grid).build());
    Ok(reprojector.reproject(src, target)?.raster)
}

/// Resamples a raster into an explicit destination grid using the default options
pub fn reproject_to_grid<T: RasterNum>(src: &Raster<T>, dest_grid: GridDescriptor) -> Result<Raster<T>> {
    Ok(Reprojector::default().reproject_to_grid(src, dest_grid)?.raster)
}

/// Reprojects a bounding box by sampling `edge_points` points along each of its edges
pub fn reproject_bounding_box(bbox: &BoundingBox, target: &SpatialReference, edge_points: usize) -> Result<BoundingBox> {
    let source_srs = bbox.spatial_reference().ok_or(Error::UndefinedCrs)?;
    let coord_trans = CoordinateTransformer::new(source_srs, target);
    let extent = if coord_trans.is_identity() {
        *bbox.extent()
    } else {
        reproject_extent(bbox.extent(), &coord_trans, edge_points)?
    };

    Ok(BoundingBox::new(extent, Some(target.clone())))
}

/// Transforms points sampled along the edges of the extent and returns the enclosing rectangle.
/// The samples always include the corners and the edge midpoints.
fn reproject_extent(extent: &Rect<f64>, coord_trans: &CoordinateTransformer, edge_points: usize) -> Result<Rect<f64>> {
    let mut points_per_edge = edge_points.max(MIN_EDGE_POINTS);
    if points_per_edge % 2 == 0 {
        points_per_edge += 1;
    }

    let edges = [
        (extent.top_left(), extent.top_right()),
        (extent.top_right(), extent.bottom_right()),
        (extent.bottom_right(), extent.bottom_left()),
        (extent.bottom_left(), extent.top_left()),
    ];

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for (start, end) in edges {
        // The end point is the start of the next edge
        for i in 0..points_per_edge - 1 {
            let t = i as f64 / (points_per_edge - 1) as f64;
            // Points outside of the domain of the target projection do not contribute
            if let Ok(p) = coord_trans.transform_point(linear_interpolate(start, end, t)) {
                min_x = min_x.min(p.x());
                max_x = max_x.max(p.x());
                min_y = min_y.min(p.y());
                max_y = max_y.max(p.y());
            }
        }
    }

    if !min_x.is_finite() || !max_x.is_finite() || !min_y.is_finite() || !max_y.is_finite() {
        return Err(Error::UnsupportedCrs(format!(
            "The extent can not be transformed from {} to {}",
            coord_trans.source(),
            coord_trans.target()
        )));
    }

    Ok(Rect::from_nw_se(Point::new(min_x, max_y), Point::new(max_x, min_y)))
}

/// Square cell size with the area of a source cell after projection, measured at the raster center
fn derived_resolution(grid: &GridDescriptor, coord_trans: &CoordinateTransformer) -> Result<f64> {
    let col = (grid.columns() / 2) as f64;
    let row = (grid.rows() / 2) as f64;

    let transform = |col: f64, row: f64| {
        coord_trans.transform_point(grid.cell_to_world(col, row)).map_err(|_| {
            Error::UnsupportedCrs(format!(
                "The raster center can not be transformed from {} to {}",
                coord_trans.source(),
                coord_trans.target()
            ))
        })
    };

    let origin = transform(col, row)?;
    let dcol = transform(col + 1.0, row)? - origin;
    let drow = transform(col, row + 1.0)? - origin;

    let det = dcol.x() * drow.y() - dcol.y() * drow.x();
    let resolution = det.abs().sqrt();
    if !resolution.is_finite() || resolution == 0.0 {
        return Err(Error::SingularTransform(format!(
            "The transformation from {} to {} collapses the raster cells",
            coord_trans.source(),
            coord_trans.target()
        )));
    }

    log::debug!("Derived target resolution: {resolution}");
    Ok(resolution)
}

fn checked_resolution(cell_size: CellSize) -> Result<CellSize> {
    if !cell_size.is_valid() {
        return Err(Error::SingularTransform(format!(
            "Invalid target resolution ({}, {})",
            cell_size.x(),
            cell_size.y()
        )));
    }

    Ok(cell_size.north_up())
}

fn check_value_count(size: RasterSize, band_count: usize) -> Result<()> {
    match size.cell_count().checked_mul(band_count) {
        Some(count) if count <= MAX_DESTINATION_VALUES => Ok(()),
        _ => Err(Error::InvalidArgument(format!(
            "The target grid {size} with {band_count} band(s) exceeds the maximum of {MAX_DESTINATION_VALUES} values"
        ))),
    }
}

fn cell_count(cells: f64) -> Result<i32> {
    if !cells.is_finite() || cells > i32::MAX as f64 {
        return Err(Error::InvalidArgument(format!(
            "The target resolution results in an invalid number of cells ({cells})"
        )));
    }

    let rounded = cells.round();
    let count = if (cells - rounded).abs() < CELL_COUNT_SNAP_TOLERANCE {
        rounded
    } else {
        cells.ceil()
    };

    Ok((count as i32).max(1))
}

/// North-up grid with the provided cell size covering the extent, centered on the extent
fn grid_for_extent(extent: &Rect<f64>, cell_size: CellSize) -> Result<(GeoTransform, RasterSize)> {
    let cols = cell_count(extent.width() / cell_size.x())?;
    let rows = cell_count(extent.height() / cell_size.y().abs())?;

    let width = cols as f64 * cell_size.x();
    let height = rows as f64 * cell_size.y().abs();

    let center_x = (extent.xmin() + extent.xmax()) / 2.0;
    let center_y = (extent.ymin() + extent.ymax()) / 2.0;
    let top_left = Point::new(center_x - width / 2.0, center_y + height / 2.0);

    Ok((
        GeoTransform::from_top_left_and_cell_size(top_left, cell_size),
        RasterSize::with_rows_cols(Rows(rows), Columns(cols)),
    ))
}

/// North-up grid covering the extent where the extent coordinates are multiples of the cell size
fn aligned_grid_for_extent(extent: &Rect<f64>, cell_size: CellSize) -> Result<(GeoTransform, RasterSize)> {
    let res_x = cell_size.x();
    let res_y = cell_size.y().abs();

    let min_x = (extent.xmin() / res_x).floor() * res_x;
    let max_x = (extent.xmax() / res_x).ceil() * res_x;
    let min_y = (extent.ymin() / res_y).floor() * res_y;
    let max_y = (extent.ymax() / res_y).ceil() * res_y;

    let cols = cell_count(((max_x - min_x) / res_x).round())?;
    let rows = cell_count(((max_y - min_y) / res_y).round())?;

    Ok((
        GeoTransform::from_top_left_and_cell_size(Point::new(min_x, max_y), cell_size),
        RasterSize::with_rows_cols(Rows(rows), Columns(cols)),
    ))
}

#[inline]
fn linear_interpolate(start: Point, end: Point, t: f64) -> Point {
    Point::new(start.x() + t * (end.x() - start.x()), start.y() + t * (end.y() - start.y()))
}

#[cfg(feature = "rayon")]
fn create_thread_pool(thread_count: Option<usize>) -> Result<rayon::ThreadPool> {
    let mut pool_builder = rayon::ThreadPoolBuilder::new();
    if let Some(count) = thread_count {
        pool_builder = pool_builder.num_threads(count);
    }
    pool_builder
        .build()
        .map_err(|e| Error::Runtime(format!("Failed to create threadpool: {e}")))
}

/// Runs the operation for every row of the row-major data, in parallel when configured
fn for_each_row<V: Send>(data: &mut [V], cols: usize, num_threads: NumThreads, op: impl Fn(usize, &mut [V]) + Send + Sync) -> Result<()> {
    let thread_count = match num_threads {
        NumThreads::AllCpus => None,
        NumThreads::Count(val) => Some(val),
    };

    if thread_count.is_some_and(|count| count <= 1) || !cfg!(feature = "rayon") {
        data.chunks_mut(cols).enumerate().for_each(|(row, row_slice)| op(row, row_slice));
        return Ok(());
    }

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        create_thread_pool(thread_count)?.install(|| {
            data.par_chunks_mut(cols)
                .enumerate()
                .for_each(|(row, row_slice)| op(row, row_slice));
        });
    }

    Ok(())
}

/// Maps destination cell centers to fractional source cell positions
struct CellMapper<'a> {
    dest_transform: GeoTransform,
    dest_size: RasterSize,
    src_inverse_transform: GeoTransform,
    src_cols: f64,
    src_rows: f64,
    coord_trans: &'a CoordinateTransformer,
    error_threshold: f64,
}

impl<'a> CellMapper<'a> {
    fn new(dest: &GridDescriptor, src: &GridDescriptor, coord_trans: &'a CoordinateTransformer, error_threshold: f64) -> Result<Self> {
        Ok(CellMapper {
            dest_transform: dest.geo_transform(),
            dest_size: dest.raster_size(),
            src_inverse_transform: src.geo_transform().invert()?,
            src_cols: src.columns() as f64,
            src_rows: src.rows() as f64,
            coord_trans,
            error_threshold,
        })
    }

    /// Positions for all destination cells in row-major order, `None` for cells that are not located on the source grid
    fn map_grid(&self, num_threads: NumThreads) -> Result<Vec<Option<Point>>> {
        let cols = self.dest_size.width();
        let mut positions = vec![None; self.dest_size.cell_count()];
        for_each_row(&mut positions, cols, num_threads, |row, row_slice| self.map_row(row, row_slice))?;
        Ok(positions)
    }

    fn map_row(&self, row: usize, positions: &mut [Option<Point>]) {
        let cols = positions.len();
        if self.error_threshold > 0.0 && cols > 2 {
            self.map_segment(row, 0, cols - 1, positions);
        } else {
            for (col, pos) in positions.iter_mut().enumerate() {
                *pos = self.exact(col, row);
            }
        }

        for pos in positions.iter_mut() {
            *pos = pos.filter(|p| self.is_on_source_grid(*p));
        }
    }

    /// Recursively subdivides the segment until linear interpolation of the positions is accurate enough
    fn map_segment(&self, row: usize, start_col: usize, end_col: usize, positions: &mut [Option<Point>]) {
        debug_assert_eq!(positions.len(), end_col - start_col + 1);

        if end_col - start_col < 2 {
            for (i, pos) in positions.iter_mut().enumerate() {
                *pos = self.exact(start_col + i, row);
            }
            return;
        }

        let middle_col = (start_col + end_col) / 2;
        if let (Some(start), Some(middle), Some(end)) = (
            self.exact(start_col, row),
            self.exact(middle_col, row),
            self.exact(end_col, row),
        ) {
            let span = (end_col - start_col) as f64;
            let interpolated_middle = linear_interpolate(start, end, (middle_col - start_col) as f64 / span);
            if point::euclidean_distance(middle, interpolated_middle) < self.error_threshold {
                for (i, pos) in positions.iter_mut().enumerate() {
                    *pos = Some(linear_interpolate(start, end, i as f64 / span));
                }
                return;
            }
        }

        let (first_half, second_half) = positions.split_at_mut(middle_col - start_col + 1);
        self.map_segment(row, start_col, middle_col, first_half);
        self.map_segment(row, middle_col + 1, end_col, second_half);
    }

    /// The exact fractional source cell position of the center of a destination cell
    fn exact(&self, col: usize, row: usize) -> Option<Point> {
        let world = self.dest_transform.apply(col as f64 + 0.5, row as f64 + 0.5);
        let src_world = self.coord_trans.transform_point(world).ok()?;
        let pos = self.src_inverse_transform.apply(src_world.x(), src_world.y());
        (pos.x().is_finite() && pos.y().is_finite()).then_some(pos)
    }

    fn is_on_source_grid(&self, pos: Point) -> bool {
        pos.x() >= 0.0 && pos.y() >= 0.0 && pos.x() < self.src_cols && pos.y() < self.src_rows
    }
}
