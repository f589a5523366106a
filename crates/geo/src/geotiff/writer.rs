//! GeoTIFF writing using the pure Rust tiff crate.
//!
//! ```rust,no_run
//! use geo::{CellSize, GridDescriptor, Point, Raster, RasterSize, SpatialReference, crs};
//!
//! let grid = GridDescriptor::with_top_left_origin(
//!     Some(SpatialReference::from_epsg(crs::epsg::utm_north(33))?),
//!     RasterSize::square(10),
//!     Point::new(500000.0, 6000000.0),
//!     CellSize::square(30.0),
//!     Some(0.0),
//! )?;
//!
//! let raster = Raster::new(grid, (0..100u16).collect())?;
//! geo::geotiff::write_geotiff(&raster, "output.tif")?;
//! # Ok::<(), geo::Error>(())
//! ```

use std::{
    fs::File,
    io::{BufWriter, Seek, Write},
    path::Path,
};

use bytemuck::cast_slice;
use tiff::encoder::{TiffEncoder, TiffValue, colortype};
use tiff::tags::Tag;

use crate::{ArrayDataType, Error, GridDescriptor, Raster, RasterNum, Result};

use super::projectioninfo::ProjectionInfo;

const TARGET_STRIP_BYTES: usize = 8 * 1024;

pub fn write_geotiff<T: RasterNum>(raster: &Raster<T>, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_to(raster, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes a single band raster as a striped GeoTIFF
pub fn write_to<T: RasterNum, W: Write + Seek>(raster: &Raster<T>, stream: W) -> Result<()> {
    if raster.band_count() != 1 {
        return Err(Error::InvalidArgument(format!(
            "Only single band rasters can be written as GeoTIFF ({} bands present)",
            raster.band_count()
        )));
    }

    let grid = raster.grid();
    if grid.spatial_reference().is_some_and(|srs| srs.epsg().is_none()) {
        log::warn!("The reference system of the raster has no EPSG code, the GeoTIFF will not be georeferenced");
    }

    let mut encoder = TiffEncoder::new(stream)?;
    let data = raster.data();

    match T::TYPE {
        ArrayDataType::Uint8 => write_band::<colortype::Gray8, _>(&mut encoder, grid, cast_slice::<T, u8>(data)),
        ArrayDataType::Uint16 => write_band::<colortype::Gray16, _>(&mut encoder, grid, cast_slice::<T, u16>(data)),
        ArrayDataType::Uint32 => write_band::<colortype::Gray32, _>(&mut encoder, grid, cast_slice::<T, u32>(data)),
        ArrayDataType::Uint64 => write_band::<colortype::Gray64, _>(&mut encoder, grid, cast_slice::<T, u64>(data)),
        ArrayDataType::Int8 => write_band::<colortype::GrayI8, _>(&mut encoder, grid, cast_slice::<T, i8>(data)),
        ArrayDataType::Int16 => write_band::<colortype::GrayI16, _>(&mut encoder, grid, cast_slice::<T, i16>(data)),
        ArrayDataType::Int32 => write_band::<colortype::GrayI32, _>(&mut encoder, grid, cast_slice::<T, i32>(data)),
        ArrayDataType::Int64 => write_band::<colortype::GrayI64, _>(&mut encoder, grid, cast_slice::<T, i64>(data)),
        ArrayDataType::Float32 => write_band::<colortype::Gray32Float, _>(&mut encoder, grid, cast_slice::<T, f32>(data)),
        ArrayDataType::Float64 => write_band::<colortype::Gray64Float, _>(&mut encoder, grid, cast_slice::<T, f64>(data)),
    }
}

fn write_band<C, W>(encoder: &mut TiffEncoder<W>, grid: &GridDescriptor, data: &[C::Inner]) -> Result<()>
where
    C: colortype::ColorType,
    [C::Inner]: TiffValue,
    W: Write + Seek,
{
    let width = grid.columns() as u32;
    let height = grid.rows() as u32;

    let mut image = encoder.new_image::<C>(width, height)?;

    let row_bytes = grid.columns() * std::mem::size_of::<C::Inner>();
    let rows_per_strip = (TARGET_STRIP_BYTES / row_bytes.max(1)).max(1) as u32;
    image.rows_per_strip(rows_per_strip.min(height))?;

    // The georeferencing tags belong in the directory of the image itself
    let dir = image.encoder();
    let gt = grid.geo_transform();
    if gt.is_north_up() {
        let cell_size = gt.cell_size();
        dir.write_tag(Tag::ModelPixelScaleTag, &[cell_size.x(), cell_size.y().abs(), 0.0][..])?;

        let top_left = gt.top_left();
        dir.write_tag(Tag::ModelTiepointTag, &[0.0, 0.0, 0.0, top_left.x(), top_left.y(), 0.0][..])?;
    } else {
        let [x0, dx, rx, y0, ry, dy] = gt.coefficients();
        #[rustfmt::skip]
        let transformation = [
            dx, rx, 0.0, x0,
            ry, dy, 0.0, y0,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        dir.write_tag(Tag::ModelTransformationTag, &transformation[..])?;
    }

    if let Some(nodata) = grid.nodata() {
        dir.write_tag(Tag::GdalNodata, nodata.to_string().as_str())?;
    }

    if let Some(proj_info) = grid.spatial_reference().and_then(ProjectionInfo::from_spatial_reference) {
        dir.write_tag(Tag::GeoKeyDirectoryTag, &proj_info.key_directory()?[..])?;
    }

    image.write_data(data)?;
    Ok(())
}
