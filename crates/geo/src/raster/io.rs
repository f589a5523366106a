//! Reading and writing rasters from disk.
//! The file format is detected from the file extension.

use std::path::Path;

use crate::{Error, Raster, RasterNum, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RasterFileFormat {
    GeoTiff,
    Unknown,
}

impl RasterFileFormat {
    /// Given a file path, guess the raster type based on the file extension
    pub fn guess_from_path(file_path: impl AsRef<Path>) -> RasterFileFormat {
        let ext = file_path.as_ref().extension().map(|ext| ext.to_string_lossy().to_lowercase());

        match ext.as_deref() {
            Some("tif" | "tiff") => RasterFileFormat::GeoTiff,
            _ => RasterFileFormat::Unknown,
        }
    }
}

pub trait RasterReadWrite: Sized {
    fn read(path: impl AsRef<Path>) -> Result<Self>;
    fn write(&self, path: impl AsRef<Path>) -> Result;
}

impl<T: RasterNum> RasterReadWrite for Raster<T> {
    fn read(path: impl AsRef<Path>) -> Result<Self> {
        load_raster(path)
    }

    fn write(&self, path: impl AsRef<Path>) -> Result {
        save_raster(self, path)
    }
}

pub fn load_raster<T: RasterNum>(path: impl AsRef<Path>) -> Result<Raster<T>> {
    let path = path.as_ref();
    match RasterFileFormat::guess_from_path(path) {
        RasterFileFormat::GeoTiff => {
            cfg_if::cfg_if! {
                if #[cfg(feature = "raster-io-geotiff")] {
                    log::debug!("Reading GeoTIFF {}", path.display());
                    crate::geotiff::read_geotiff(path)
                } else {
                    Err(Error::Runtime("GeoTiff format support not compiled in".into()))
                }
            }
        }
        RasterFileFormat::Unknown => Err(Error::Runtime(format!(
            "Unsupported raster file type for reading: {}",
            path.display()
        ))),
    }
}

pub fn save_raster<T: RasterNum>(raster: &Raster<T>, path: impl AsRef<Path>) -> Result {
    let path = path.as_ref();
    match RasterFileFormat::guess_from_path(path) {
        RasterFileFormat::GeoTiff => {
            cfg_if::cfg_if! {
                if #[cfg(feature = "raster-io-geotiff")] {
                    log::debug!("Writing GeoTIFF {}", path.display());
                    crate::geotiff::write_geotiff(raster, path)
                } else {
                    let _ = raster;
                    Err(Error::Runtime("GeoTiff format support not compiled in".into()))
                }
            }
        }
        RasterFileFormat::Unknown => Err(Error::Runtime(format!(
            "Unsupported raster file type for writing: {}",
            path.display()
        ))),
    }
}
