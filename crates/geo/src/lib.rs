#![warn(clippy::unwrap_used)]

pub type Result<T = ()> = std::result::Result<T, Error>;

mod arraydatatype;
mod bandindex;
mod boundingbox;
mod cell;
mod coordinatetransformer;
pub mod crs;
mod error;
#[cfg(feature = "raster-io-geotiff")]
pub mod geotiff;
mod geotransform;
mod griddescriptor;
mod nodata;
mod point;
pub mod raster;
mod rasternum;
mod rastersize;
pub mod rect;
pub mod srs;
pub mod vector;

#[cfg(test)]
mod testutils;

#[doc(inline)]
pub use arraydatatype::ArrayDataType;
#[doc(inline)]
pub use bandindex::{BandIndex, FIRST_BAND};
#[doc(inline)]
pub use boundingbox::BoundingBox;
#[doc(inline)]
pub use cell::{Cell, CellIterator};
#[doc(inline)]
pub use coordinatetransformer::CoordinateTransformer;
#[doc(inline)]
pub use crs::Epsg;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use geotransform::GeoTransform;
#[doc(inline)]
pub use griddescriptor::{CellSize, GridDescriptor};
#[doc(inline)]
pub use nodata::Nodata;
pub use point::Point;
#[doc(inline)]
pub use raster::Raster;
#[doc(inline)]
pub use raster::algo::{
    EmptyIntersectionPolicy, MAX_DESTINATION_VALUES, NumThreads, ReprojectOptions, ReprojectWarning, Reprojection, Reprojector, Resampling, TargetGrid,
    TargetPixelAlignment, reproject, reproject_bounding_box, reproject_to_grid,
};
#[doc(inline)]
pub use rasternum::RasterNum;
#[doc(inline)]
pub use rastersize::{Columns, RasterSize, Rows};
#[doc(inline)]
pub use rect::Rect;
#[doc(inline)]
pub use srs::SpatialReference;
#[doc(inline)]
pub use vector::reproject_geometry;
