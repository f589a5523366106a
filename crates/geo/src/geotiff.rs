//! GeoTIFF reading and writing using the pure Rust tiff crate.
//!
//! The georeferencing is stored in the standard GeoTIFF tags: pixel scale and tie point for north-up grids,
//! a model transformation for rotated grids, the GDAL nodata tag and EPSG based geokeys.

mod projectioninfo;
mod reader;
mod writer;

pub use reader::{read_from, read_geotiff};
pub use writer::{write_geotiff, write_to};
