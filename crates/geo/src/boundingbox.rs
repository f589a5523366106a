use crate::{Point, Rect, Result, SpatialReference, srs};

/// An extent expressed in a specific coordinate reference system.
///
/// Operations that compare two boxes fail when their reference systems differ instead of silently mixing coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    extent: Rect<f64>,
    srs: Option<SpatialReference>,
}

impl BoundingBox {
    pub fn new(extent: Rect<f64>, srs: Option<SpatialReference>) -> Self {
        BoundingBox { extent, srs }
    }

    pub fn from_extent(xmin: f64, ymin: f64, xmax: f64, ymax: f64, srs: Option<SpatialReference>) -> Self {
        Self::new(Rect::from_extent(xmin, ymin, xmax, ymax), srs)
    }

    pub fn extent(&self) -> &Rect<f64> {
        &self.extent
    }

    pub fn spatial_reference(&self) -> Option<&SpatialReference> {
        self.srs.as_ref()
    }

    pub fn xmin(&self) -> f64 {
        self.extent.xmin()
    }

    pub fn ymin(&self) -> f64 {
        self.extent.ymin()
    }

    pub fn xmax(&self) -> f64 {
        self.extent.xmax()
    }

    pub fn ymax(&self) -> f64 {
        self.extent.ymax()
    }

    pub fn width(&self) -> f64 {
        self.extent.width()
    }

    pub fn height(&self) -> f64 {
        self.extent.height()
    }

    pub fn center(&self) -> Point {
        Point::new((self.xmin() + self.xmax()) / 2.0, (self.ymin() + self.ymax()) / 2.0)
    }

    pub fn intersects(&self, other: &BoundingBox) -> Result<bool> {
        self.check_same_crs(other)?;
        Ok(self.extent.intersects(&other.extent))
    }

    pub fn intersection(&self, other: &BoundingBox) -> Result<BoundingBox> {
        self.check_same_crs(other)?;
        Ok(BoundingBox::new(self.extent.intersection(&other.extent), self.srs.clone()))
    }

    pub fn contains(&self, other: &BoundingBox) -> Result<bool> {
        self.check_same_crs(other)?;
        Ok(self.xmin() <= other.xmin() && self.xmax() >= other.xmax() && self.ymin() <= other.ymin() && self.ymax() >= other.ymax())
    }

    fn check_same_crs(&self, other: &BoundingBox) -> Result<()> {
        match (&self.srs, &other.srs) {
            (None, None) => Ok(()),
            (lhs, rhs) => srs::ensure_same_crs(lhs.as_ref(), rhs.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, crs};

    #[test]
    fn intersect_same_crs() -> Result<()> {
        let srs = SpatialReference::from_epsg(crs::epsg::BELGIAN_LAMBERT72)?;
        let b1 = BoundingBox::from_extent(0.0, 0.0, 10.0, 10.0, Some(srs.clone()));
        let b2 = BoundingBox::from_extent(5.0, 5.0, 20.0, 20.0, Some(srs.clone()));
        let b3 = BoundingBox::from_extent(50.0, 50.0, 60.0, 60.0, Some(srs));

        assert!(b1.intersects(&b2)?);
        assert!(!b1.intersects(&b3)?);
        assert_eq!(b1.intersection(&b2)?.extent(), &Rect::from_extent(5.0, 5.0, 10.0, 10.0));
        assert!(b1.contains(&BoundingBox::from_extent(1.0, 1.0, 2.0, 2.0, b1.spatial_reference().cloned()))?);
        assert_eq!(b1.center(), Point::new(5.0, 5.0));
        Ok(())
    }

    #[test]
    fn intersect_without_crs() -> Result<()> {
        let b1 = BoundingBox::from_extent(0.0, 0.0, 10.0, 10.0, None);
        let b2 = BoundingBox::from_extent(5.0, 5.0, 20.0, 20.0, None);
        assert!(b1.intersects(&b2)?);
        Ok(())
    }

    #[test]
    fn compare_different_crs_fails() -> Result<()> {
        let b1 = BoundingBox::from_extent(0.0, 0.0, 10.0, 10.0, Some(SpatialReference::from_epsg(crs::epsg::WGS84)?));
        let b2 = BoundingBox::from_extent(0.0, 0.0, 10.0, 10.0, Some(SpatialReference::from_epsg(crs::epsg::WGS84_WEB_MERCATOR)?));
        let b3 = BoundingBox::from_extent(0.0, 0.0, 10.0, 10.0, None);

        assert!(matches!(b1.intersects(&b2), Err(Error::CrsMismatch { .. })));
        assert!(matches!(b1.intersection(&b3), Err(Error::CrsMismatch { .. })));
        assert!(matches!(b3.contains(&b2), Err(Error::CrsMismatch { .. })));
        Ok(())
    }
}
