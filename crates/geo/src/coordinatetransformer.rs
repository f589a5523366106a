use crate::Error;
use crate::Point;
use crate::Result;
use crate::crs::Epsg;
use crate::srs::SpatialReference;

/// Transforms coordinates from a source to a target reference system.
///
/// The transformation pivots through WGS84 longitude/latitude: the source inverse projection is followed by the target forward projection.
/// When both reference systems are equal the transformer is an identity and points are passed through untouched.
#[derive(Debug, Clone)]
pub struct CoordinateTransformer {
    source: SpatialReference,
    target: SpatialReference,
    identity: bool,
}

impl CoordinateTransformer {
    pub fn new(source: &SpatialReference, target: &SpatialReference) -> Self {
        CoordinateTransformer {
            identity: source == target,
            source: source.clone(),
            target: target.clone(),
        }
    }

    pub fn from_definitions(source_srs: &str, target_srs: &str) -> Result<Self> {
        Ok(Self::new(
            &SpatialReference::from_definition(source_srs)?,
            &SpatialReference::from_definition(target_srs)?,
        ))
    }

    pub fn from_epsg(source_epsg: Epsg, target_epsg: Epsg) -> Result<Self> {
        Ok(Self::new(
            &SpatialReference::from_epsg(source_epsg)?,
            &SpatialReference::from_epsg(target_epsg)?,
        ))
    }

    pub fn source(&self) -> &SpatialReference {
        &self.source
    }

    pub fn target(&self) -> &SpatialReference {
        &self.target
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// The transformer for the opposite direction
    pub fn inverse(&self) -> Self {
        CoordinateTransformer {
            source: self.target.clone(),
            target: self.source.clone(),
            identity: self.identity,
        }
    }

    pub fn transform_point(&self, point: Point) -> Result<Point> {
        if self.identity {
            return Ok(point);
        }

        let lonlat = self.source.unproject(point.x(), point.y())?;
        self.target.project(lonlat.x(), lonlat.y()).map_err(|e| match e {
            Error::Runtime(_) => Error::Runtime(format!(
                "Point ({}, {}) from {} can not be represented in {}",
                point.x(),
                point.y(),
                self.source,
                self.target
            )),
            _ => e,
        })
    }

    pub fn transform_point_in_place(&self, point: &mut Point) -> Result<()> {
        *point = self.transform_point(*point)?;
        Ok(())
    }

    pub fn transform_points_in_place(&self, points: &mut [Point]) -> Result<()> {
        if self.identity {
            return Ok(());
        }

        for point in points.iter_mut() {
            self.transform_point_in_place(point)?;
        }
        Ok(())
    }
}
