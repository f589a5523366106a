use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

use num::NumCast;
use tiff::{
    ColorType,
    decoder::{Decoder, DecodingResult, Limits},
    tags::Tag,
};

use crate::{Columns, Error, GeoTransform, GridDescriptor, Raster, RasterNum, RasterSize, Result, Rows, SpatialReference};

use super::projectioninfo::ProjectionInfo;

const PLANAR_CONFIGURATION_SEPARATE: u32 = 2;

pub fn read_geotiff<T: RasterNum>(path: impl AsRef<Path>) -> Result<Raster<T>> {
    read_from(BufReader::new(File::open(path)?))
}

/// Reads the first image of a GeoTIFF stream, the sample values are converted to `T`
pub fn read_from<T: RasterNum, R: Read + Seek>(stream: R) -> Result<Raster<T>> {
    let mut decoder = Decoder::new(stream)?.with_limits(Limits::unlimited());

    if decoder.get_tag_u32(Tag::PlanarConfiguration).ok() == Some(PLANAR_CONFIGURATION_SEPARATE) {
        return Err(Error::InvalidArgument("GeoTIFF files with separate band planes are not supported".into()));
    }

    let band_count = band_count(&mut decoder)?;
    let raster_size = read_raster_size(&mut decoder)?;
    let geo_transform = read_geo_transform(&mut decoder)?;
    let nodata = read_nodata_value(&mut decoder);
    let srs = read_spatial_reference(&mut decoder)?;

    let grid = GridDescriptor::new(srs, geo_transform, raster_size, band_count, nodata)?;

    let samples: Vec<T> = match decoder.read_image()? {
        DecodingResult::U8(values) => convert_samples(values)?,
        DecodingResult::U16(values) => convert_samples(values)?,
        DecodingResult::U32(values) => convert_samples(values)?,
        DecodingResult::U64(values) => convert_samples(values)?,
        DecodingResult::I8(values) => convert_samples(values)?,
        DecodingResult::I16(values) => convert_samples(values)?,
        DecodingResult::I32(values) => convert_samples(values)?,
        DecodingResult::I64(values) => convert_samples(values)?,
        DecodingResult::F32(values) => convert_samples(values)?,
        DecodingResult::F64(values) => convert_samples(values)?,
        #[allow(unreachable_patterns)]
        _ => return Err(Error::InvalidArgument("Unsupported GeoTIFF sample format".into())),
    };

    let data = if band_count > 1 {
        deinterleave(&samples, band_count)
    } else {
        samples
    };

    Raster::new(grid, data)
}

fn band_count<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<usize> {
    Ok(match decoder.colortype()? {
        ColorType::Gray(_) => 1,
        ColorType::GrayA(_) => 2,
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        ColorType::Multiband { num_samples, .. } => num_samples as usize,
        color_type => {
            return Err(Error::InvalidArgument(format!("Unsupported tiff color type: {color_type:?}")));
        }
    })
}

fn read_raster_size<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<RasterSize> {
    let (width, height) = decoder.dimensions()?;
    let rows = i32::try_from(height).map_err(|_| Error::InvalidArgument(format!("Unsupported GeoTIFF height: {height}")))?;
    let cols = i32::try_from(width).map_err(|_| Error::InvalidArgument(format!("Unsupported GeoTIFF width: {width}")))?;
    Ok(RasterSize::with_rows_cols(Rows(rows), Columns(cols)))
}

fn read_geo_transform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<GeoTransform> {
    if let Ok(t) = decoder.get_tag_f64_vec(Tag::ModelTransformationTag) {
        return model_transformation_to_geo_transform(&t);
    }

    let scale = decoder
        .get_tag_f64_vec(Tag::ModelPixelScaleTag)
        .map_err(|_| Error::Runtime("Failed to obtain pixel transformation from tiff: no ModelPixelScale tag".into()))?;
    if scale.len() < 2 {
        return Err(Error::Runtime("ModelPixelScale must have at least 2 values".into()));
    }

    let tie_points = decoder
        .get_tag_f64_vec(Tag::ModelTiepointTag)
        .map_err(|_| Error::Runtime("Failed to obtain pixel transformation from tiff: no ModelTiepoint tag".into()))?;
    if tie_points.len() < 6 {
        return Err(Error::Runtime("ModelTiepoint must have 6 values".into()));
    }

    let cell_size_x = scale[0];
    let cell_size_y = -scale[1];
    if cell_size_x == 0.0 || cell_size_y == 0.0 {
        return Err(Error::Runtime("No cell sizes present in geotiff".into()));
    }

    Ok(GeoTransform::new([
        tie_points[3] - tie_points[0] * cell_size_x,
        cell_size_x,
        0.0,
        tie_points[4] - tie_points[1] * cell_size_y,
        0.0,
        cell_size_y,
    ]))
}

/// The 4x4 row-major ModelTransformation matrix, only the 2D affine terms are used
fn model_transformation_to_geo_transform(t: &[f64]) -> Result<GeoTransform> {
    if t.len() != 16 {
        return Err(Error::Runtime(format!(
            "ModelTransformation must have 16 values ({} present)",
            t.len()
        )));
    }

    Ok(GeoTransform::new([t[3], t[0], t[1], t[7], t[4], t[5]]))
}

fn read_nodata_value<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    decoder
        .get_tag_ascii_string(Tag::GdalNodata)
        .ok()
        .and_then(|nodata| nodata.trim_matches(|c: char| c.is_whitespace() || c == '\0').parse::<f64>().ok())
}

fn read_spatial_reference<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<SpatialReference>> {
    let Ok(key_dir) = decoder.get_tag_u16_vec(Tag::GeoKeyDirectoryTag) else {
        log::debug!("No GeoKeyDirectory present, the reference system is undefined");
        return Ok(None);
    };

    match ProjectionInfo::from_key_directory(&key_dir)?.and_then(|info| info.epsg()) {
        Some(epsg) => Ok(Some(SpatialReference::from_epsg(epsg)?)),
        None => Ok(None),
    }
}

fn convert_samples<S, T>(values: Vec<S>) -> Result<Vec<T>>
where
    S: NumCast + Copy + std::fmt::Debug,
    T: RasterNum,
{
    values
        .into_iter()
        .map(|v| {
            NumCast::from(v).ok_or_else(|| Error::InvalidArgument(format!("GeoTIFF value {v:?} does not fit in {}", T::TYPE)))
        })
        .collect()
}

/// Pixel interleaved samples to band sequential storage
fn deinterleave<T: RasterNum>(samples: &[T], band_count: usize) -> Vec<T> {
    let cell_count = samples.len() / band_count;
    let mut data = Vec::with_capacity(samples.len());
    for band in 0..band_count {
        data.extend((0..cell_count).map(|cell| samples[cell * band_count + band]));
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deinterleave_samples() {
        let samples = [1u8, 10, 2, 20, 3, 30];
        assert_eq!(deinterleave(&samples, 2), vec![1, 2, 3, 10, 20, 30]);
    }

    #[test]
    fn model_transformation() {
        #[rustfmt::skip]
        let t = [
            90.0, 10.0, 0.0, 22000.0,
            10.0, -90.0, 0.0, 245000.0,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        assert_eq!(
            model_transformation_to_geo_transform(&t).unwrap(),
            GeoTransform::new([22000.0, 90.0, 10.0, 245000.0, 10.0, -90.0])
        );

        assert!(matches!(model_transformation_to_geo_transform(&t[..8]), Err(Error::Runtime(_))));
        assert!(matches!(model_transformation_to_geo_transform(&[]), Err(Error::Runtime(_))));
    }

    #[test]
    fn sample_conversion() {
        assert_eq!(convert_samples::<u8, f32>(vec![1, 255]).unwrap(), vec![1.0, 255.0]);
        assert_eq!(convert_samples::<i16, i32>(vec![-5, 7]).unwrap(), vec![-5, 7]);
        assert!(convert_samples::<i16, u8>(vec![-5]).is_err());
        assert!(convert_samples::<f64, i32>(vec![f64::NAN]).is_err());
    }
}
