//! Raster reprojection between coordinate reference systems.
//!
//! The functionality lives in the `geo` crate, this crate re-exports it for convenience.

pub use geo;

pub use geo::{
    CellSize, CoordinateTransformer, Error, GeoTransform, GridDescriptor, Raster, ReprojectOptions, Reprojector, Resampling, Result,
    SpatialReference, TargetGrid, reproject, reproject_to_grid,
};
