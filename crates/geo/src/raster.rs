//! The raster container: a grid descriptor with band-sequential cell data.

pub mod algo;
pub mod io;

use num::NumCast;

use crate::{BandIndex, Cell, CellIterator, Error, GridDescriptor, RasterNum, Result, bandindex};

#[doc(inline)]
pub use io::{RasterFileFormat, RasterReadWrite, load_raster, save_raster};

/// A georeferenced raster holding `width * height * band_count` values.
///
/// Each band is stored in row-major order and the bands follow each other.
/// Rasters are not modified after construction, operations like reprojection produce a new raster.
#[derive(Clone, Debug)]
pub struct Raster<T: RasterNum> {
    grid: GridDescriptor,
    data: Vec<T>,
}

impl<T: RasterNum> Raster<T> {
    pub fn new(grid: GridDescriptor, data: Vec<T>) -> Result<Self> {
        let expected = grid.raster_size().cell_count() * grid.band_count();
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Raster { grid, data })
    }

    pub fn filled_with(grid: GridDescriptor, value: T) -> Self {
        let data = vec![value; grid.raster_size().cell_count() * grid.band_count()];
        Raster { grid, data }
    }

    /// A raster where every cell contains the nodata value of the grid (or the type sentinel if the grid has none)
    pub fn filled_with_nodata(grid: GridDescriptor) -> Self {
        let nodata = nodata_for_grid::<T>(&grid);
        Self::filled_with(grid, nodata)
    }

    pub fn grid(&self) -> &GridDescriptor {
        &self.grid
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn band_count(&self) -> usize {
        self.grid.band_count()
    }

    pub fn band(&self, band: BandIndex) -> Option<&[T]> {
        let band_size = self.grid.raster_size().cell_count();
        let start = bandindex::band_offset(band, band_size);
        self.data.get(start..start + band_size)
    }

    pub fn bands(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.grid.raster_size().cell_count())
    }

    /// The raw value of a cell, `None` when the cell or band is outside of the raster
    pub fn value(&self, band: BandIndex, cell: Cell) -> Option<T> {
        if !self.grid.is_cell_on_map(cell) {
            return None;
        }

        let index = cell.row as usize * self.grid.columns() + cell.col as usize;
        self.band(band).map(|data| data[index])
    }

    /// The value of a cell, `None` when the cell contains nodata or is outside of the raster
    pub fn cell_value(&self, band: BandIndex, cell: Cell) -> Option<T> {
        self.value(band, cell).filter(|&v| !self.is_nodata(v))
    }

    /// The grid nodata value converted to the cell type, `None` if the grid has no nodata value or it does not fit in the type
    pub fn nodata_value(&self) -> Option<T> {
        self.grid.nodata().and_then(NumCast::from)
    }

    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata_value(self.nodata_value())
    }

    pub fn nodata_count(&self) -> usize {
        let nodata = self.nodata_value();
        self.data.iter().filter(|v| v.is_nodata_value(nodata)).count()
    }

    /// Flattened `(x, y, value)` view of a band with the coordinates of the cell centers in row-major order.
    ///
    /// This is the representation plotting layers consume.
    pub fn points(&self, band: BandIndex) -> Result<impl Iterator<Item = (f64, f64, T)> + '_> {
        let data = self
            .band(band)
            .ok_or_else(|| Error::InvalidArgument(format!("Band {band} is not available, raster has {} band(s)", self.band_count())))?;

        Ok(CellIterator::for_raster_with_size(self.grid.raster_size())
            .zip(data.iter())
            .map(move |(cell, &value)| {
                let center = self.grid.cell_center(cell);
                (center.x(), center.y(), value)
            }))
    }

    pub fn into_raw_parts(self) -> (GridDescriptor, Vec<T>) {
        (self.grid, self.data)
    }
}

pub(crate) fn nodata_for_grid<T: RasterNum>(grid: &GridDescriptor) -> T {
    grid.nodata().and_then(NumCast::from).unwrap_or(T::NODATA)
}

impl<T: RasterNum> PartialEq for Raster<T> {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid
            && self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(&a, &b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

#[cfg(test)]
#[generic_tests::define]
mod tests {
    use super::*;
    use crate::{FIRST_BAND, Point, testutils::*};

    #[test]
    fn construction<T: RasterNum>() {
        let raster = Raster::new(grid_3x3(), create_vec::<T>(&[1.0, 2.0, 3.0, 4.0, NOD, 6.0, 7.0, 8.0, 9.0])).unwrap();
        assert_eq!(raster.band_count(), 1);
        assert_eq!(raster.nodata_count(), 1);

        assert!(matches!(
            Raster::new(grid_3x3(), create_vec::<T>(&[1.0, 2.0])),
            Err(Error::SizeMismatch { expected: 9, actual: 2 })
        ));
    }

    #[test]
    fn cell_values<T: RasterNum>() {
        let raster = Raster::new(grid_3x3(), create_vec::<T>(&[1.0, 2.0, 3.0, 4.0, NOD, 6.0, 7.0, 8.0, 9.0])).unwrap();

        assert_eq!(raster.cell_value(FIRST_BAND, Cell::from_row_col(0, 1)), Some(number_cast(2.0)));
        assert_eq!(raster.cell_value(FIRST_BAND, Cell::from_row_col(2, 2)), Some(number_cast(9.0)));
        assert_eq!(raster.cell_value(FIRST_BAND, Cell::from_row_col(1, 1)), None);
        assert_eq!(raster.value(FIRST_BAND, Cell::from_row_col(1, 1)), Some(number_cast(NOD)));
        assert_eq!(raster.cell_value(FIRST_BAND, Cell::from_row_col(3, 0)), None);
        assert_eq!(raster.cell_value(BandIndex::new(2).unwrap(), Cell::from_row_col(0, 0)), None);
    }

    #[test]
    fn filled_with_nodata<T: RasterNum>() {
        let raster = Raster::<T>::filled_with_nodata(grid_3x3());
        assert_eq!(raster.nodata_count(), 9);
        assert!(raster.data().iter().all(|&v| v == number_cast::<T>(NOD)));

        let raster = Raster::<T>::filled_with_nodata(grid_3x3().with_nodata(None));
        assert!(raster.data().iter().all(|&v| v.is_nodata()));
    }

    #[test]
    fn band_sequential_layout<T: RasterNum>() {
        let grid = grid_3x3().with_band_count(2).unwrap();
        let data = create_vec::<T>(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0]);
        let raster = Raster::new(grid, data).unwrap();

        let second = BandIndex::new(2).unwrap();
        assert!(raster.band(FIRST_BAND).unwrap().iter().all(|&v| v == number_cast(1.0)));
        assert!(raster.band(second).unwrap().iter().all(|&v| v == number_cast(2.0)));
        assert_eq!(raster.bands().count(), 2);
        assert!(raster.band(BandIndex::new(3).unwrap()).is_none());
    }

    #[test]
    fn point_view<T: RasterNum>() {
        let raster = Raster::new(grid_3x3(), create_vec::<T>(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0])).unwrap();

        let points: Vec<(f64, f64, T)> = raster.points(FIRST_BAND).unwrap().collect();
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], (0.5, 2.5, number_cast(1.0)));
        assert_eq!(points[1], (1.5, 2.5, number_cast(2.0)));
        assert_eq!(points[8], (2.5, 0.5, number_cast(9.0)));

        let center = raster.grid().cell_center(Cell::from_row_col(1, 1));
        assert_eq!(Point::new(points[4].0, points[4].1), center);

        assert!(matches!(raster.points(BandIndex::new(2).unwrap()), Err(Error::InvalidArgument(_))));
    }

    #[instantiate_tests(<u8>)]
    mod u8 {}

    #[instantiate_tests(<i16>)]
    mod i16 {}

    #[instantiate_tests(<u32>)]
    mod u32 {}

    #[instantiate_tests(<i64>)]
    mod i64 {}

    #[instantiate_tests(<f32>)]
    mod f32 {}

    #[instantiate_tests(<f64>)]
    mod f64 {}
}
