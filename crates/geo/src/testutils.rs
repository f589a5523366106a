use approx::relative_eq;

use crate::{CellSize, Columns, GridDescriptor, Point, RasterNum, RasterSize, Rows, SpatialReference, crs};

pub const NOD: f64 = 255.0;

pub fn create_vec<T: RasterNum>(data: &[f64]) -> Vec<T> {
    data.iter()
        .map(|&v| {
            if relative_eq!(v, NOD) {
                number_cast(NOD)
            } else {
                number_cast(v)
            }
        })
        .collect()
}

pub fn number_cast<T: RasterNum>(val: f64) -> T {
    num::NumCast::from(val).expect("F64 could not be converted to the specified type")
}

pub fn utm18n() -> SpatialReference {
    SpatialReference::from_epsg(crs::epsg::utm_north(18)).expect("Failed to create UTM 18N")
}

pub fn wgs84() -> SpatialReference {
    SpatialReference::from_epsg(crs::epsg::WGS84).expect("Failed to create WGS84")
}

/// Grid on the UTM 18N central meridian with 1m cells and `NOD` as nodata
pub fn utm_grid(rows: i32, cols: i32) -> GridDescriptor {
    GridDescriptor::with_top_left_origin(
        Some(utm18n()),
        RasterSize::with_rows_cols(Rows(rows), Columns(cols)),
        Point::new(500000.0, 4500000.0 + rows as f64),
        CellSize::square(1.0),
        Some(NOD),
    )
    .expect("Invalid test grid")
}

pub fn grid_3x3() -> GridDescriptor {
    GridDescriptor::with_top_left_origin(
        None,
        RasterSize::square(3),
        Point::new(0.0, 3.0),
        CellSize::square(1.0),
        Some(NOD),
    )
    .expect("Invalid test grid")
}
