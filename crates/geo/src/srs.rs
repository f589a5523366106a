//! Spatial reference system handling.

use crate::Error;
use crate::Result;

mod proj4rs;

pub use proj4rs::SpatialReference;

/// Verifies that two datasets share a coordinate reference system before they are combined.
///
/// A dataset without a coordinate reference system never matches.
pub fn ensure_same_crs(lhs: Option<&SpatialReference>, rhs: Option<&SpatialReference>) -> Result<()> {
    match (lhs, rhs) {
        (Some(l), Some(r)) if l == r => Ok(()),
        _ => Err(Error::CrsMismatch {
            left: crs_name(lhs),
            right: crs_name(rhs),
        }),
    }
}

pub(crate) fn crs_name(srs: Option<&SpatialReference>) -> String {
    srs.map_or_else(|| "undefined".to_string(), |s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs;

    #[test]
    fn same_crs_check() -> Result<()> {
        let wgs84 = SpatialReference::from_epsg(crs::epsg::WGS84)?;
        let lambert = SpatialReference::from_epsg(crs::epsg::BELGIAN_LAMBERT72)?;

        ensure_same_crs(Some(&wgs84), Some(&SpatialReference::from_definition("epsg:4326")?))?;

        match ensure_same_crs(Some(&wgs84), Some(&lambert)) {
            Err(Error::CrsMismatch { left, right }) => {
                assert_eq!(left, "EPSG:4326");
                assert_eq!(right, "EPSG:31370");
            }
            _ => panic!("Expected a crs mismatch"),
        }

        assert!(matches!(ensure_same_crs(Some(&wgs84), None), Err(Error::CrsMismatch { .. })));
        assert!(matches!(ensure_same_crs(None, None), Err(Error::CrsMismatch { .. })));
        Ok(())
    }
}
