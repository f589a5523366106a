//! Algorithms for raster data processing.

mod reproject;
mod resample;

pub use resample::Resampling;

pub use reproject::{
    DEFAULT_EDGE_SAMPLE_COUNT, EmptyIntersectionPolicy, MAX_DESTINATION_VALUES, NumThreads, ReprojectOptions, ReprojectWarning, Reprojection, Reprojector,
    TargetGrid, TargetPixelAlignment, reproject, reproject_bounding_box, reproject_to_grid,
};
