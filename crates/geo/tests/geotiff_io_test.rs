#[cfg(feature = "raster-io-geotiff")]
mod tests {
    use std::io::Cursor;

    use geo::{
        CellSize, Error, GeoTransform, GridDescriptor, Point, Raster, RasterSize, Result, SpatialReference, crs,
        geotiff,
        raster::{RasterReadWrite, load_raster, save_raster},
    };

    fn lambert72() -> SpatialReference {
        SpatialReference::from_epsg(crs::epsg::BELGIAN_LAMBERT72).expect("Failed to create Lambert 72")
    }

    fn lambert_grid(nodata: Option<f64>) -> Result<GridDescriptor> {
        GridDescriptor::with_top_left_origin(
            Some(lambert72()),
            RasterSize::with_rows_cols(geo::Rows(30), geo::Columns(40)),
            Point::new(22000.0, 245000.0),
            CellSize::square(100.0),
            nodata,
        )
    }

    #[test_log::test]
    fn float_raster_round_trip() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("lambert.tif");

        let mut data: Vec<f32> = (0..30 * 40).map(|v| v as f32 * 0.5).collect();
        data[17] = -9999.0;
        let raster = Raster::new(lambert_grid(Some(-9999.0))?, data)?;

        save_raster(&raster, &path)?;
        let read_back = load_raster::<f32>(&path)?;

        assert_eq!(read_back.grid().spatial_reference(), Some(&lambert72()));
        assert_eq!(read_back.grid().nodata(), Some(-9999.0));
        assert_eq!(read_back, raster);
        assert_eq!(read_back.nodata_count(), 1);
        Ok(())
    }

    #[test]
    fn raster_without_reference_system() -> Result<()> {
        let grid = lambert_grid(None)?.with_spatial_reference(None);
        let raster = Raster::new(grid, (0..30 * 40).map(|v| (v % 256) as u8).collect())?;

        let mut buffer = Cursor::new(Vec::new());
        geotiff::write_to(&raster, &mut buffer)?;
        buffer.set_position(0);

        let read_back = geotiff::read_from::<u8, _>(buffer)?;
        assert_eq!(read_back.grid().spatial_reference(), None);
        assert_eq!(read_back.grid().nodata(), None);
        assert_eq!(read_back, raster);
        Ok(())
    }

    #[test]
    fn rotated_grid_round_trip() -> Result<()> {
        let geo_transform = GeoTransform::new([22000.0, 90.0, 10.0, 245000.0, 10.0, -90.0]);
        let grid = GridDescriptor::new(Some(lambert72()), geo_transform, RasterSize::square(8), 1, Some(0.0))?;
        let raster = Raster::new(grid, (0..64).map(|v| v as u16).collect())?;

        let mut buffer = Cursor::new(Vec::new());
        geotiff::write_to(&raster, &mut buffer)?;
        buffer.set_position(0);

        let read_back = geotiff::read_from::<u16, _>(buffer)?;
        assert!(!read_back.grid().is_north_up());
        assert_eq!(read_back.grid().geo_transform(), geo_transform);
        assert_eq!(read_back, raster);
        Ok(())
    }

    #[test]
    fn integer_file_read_as_float() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("elevation.tiff");

        let raster = Raster::new(lambert_grid(Some(-1.0))?, (0..30 * 40).map(|v| (v - 600) as i16).collect())?;
        geotiff::write_geotiff(&raster, &path)?;

        let read_back = geotiff::read_geotiff::<f64>(&path)?;
        assert_eq!(read_back.grid(), raster.grid());
        assert!(read_back.data().iter().zip(raster.data()).all(|(&f, &i)| f == f64::from(i)));
        Ok(())
    }

    #[test]
    fn multi_band_rasters_are_rejected() -> Result<()> {
        let grid = lambert_grid(None)?.with_band_count(2)?;
        let raster = Raster::filled_with(grid, 1u8);

        let mut buffer = Cursor::new(Vec::new());
        assert!(matches!(geotiff::write_to(&raster, &mut buffer), Err(Error::InvalidArgument(_))));
        Ok(())
    }

    #[test]
    fn read_write_trait() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("trait.tif");

        let raster = Raster::filled_with(lambert_grid(Some(255.0))?, 7u8);
        raster.write(&path)?;

        assert_eq!(Raster::<u8>::read(&path)?, raster);
        assert!(matches!(Raster::<u8>::read(tmp.path().join("missing.tif")), Err(Error::IOError(_))));
        Ok(())
    }
}
