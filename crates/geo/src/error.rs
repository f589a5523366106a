use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The raster has no coordinate reference system defined, reprojection is not possible")]
    UndefinedCrs,
    #[error("Unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),
    #[error("Singular transform: {0}")]
    SingularTransform(String),
    #[error("The source and target extents do not overlap")]
    EmptyIntersection,
    #[error("Coordinate reference systems do not match ({left} <-> {right})")]
    CrsMismatch { left: String, right: String },
    #[error("Raster data size mismatch: expected {expected} values, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Projection error: {0}")]
    ProjectionError(#[from] proj4rs::errors::Error),
    #[cfg(feature = "raster-io-geotiff")]
    #[error("TIFF error: {0}")]
    TiffError(#[from] tiff::TiffError),
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::InvalidArgument(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::InvalidArgument(err.to_string())
    }
}
