//! Reprojection of `geo_types` geometries.

use geo_types::{Coord, Geometry, GeometryCollection, Line, LineString, MultiLineString, MultiPoint, MultiPolygon, Polygon};

use crate::{CoordinateTransformer, Point, Result, SpatialReference, srs};

fn transform_coord(coord: Coord, trans: &CoordinateTransformer) -> Result<Coord> {
    Ok(trans.transform_point(Point::from(coord))?.into())
}

fn transform_line_string(line_string: &LineString, trans: &CoordinateTransformer) -> Result<LineString> {
    line_string
        .coords()
        .map(|c| transform_coord(*c, trans))
        .collect::<Result<Vec<Coord>>>()
        .map(LineString::new)
}

fn transform_polygon(polygon: &Polygon, trans: &CoordinateTransformer) -> Result<Polygon> {
    Ok(Polygon::new(
        transform_line_string(polygon.exterior(), trans)?,
        polygon
            .interiors()
            .iter()
            .map(|ring| transform_line_string(ring, trans))
            .collect::<Result<_>>()?,
    ))
}

/// Reprojects every coordinate of the geometry.
///
/// Rectangles and triangles are returned as polygons since they are no longer axis aligned after reprojection.
/// Fails when one of the coordinates can not be represented in the target reference system.
pub fn reproject_geometry(geometry: &Geometry, trans: &CoordinateTransformer) -> Result<Geometry> {
    Ok(match geometry {
        Geometry::Point(p) => Geometry::Point(trans.transform_point(*p)?),
        Geometry::Line(line) => Geometry::Line(Line::new(
            transform_coord(line.start, trans)?,
            transform_coord(line.end, trans)?,
        )),
        Geometry::LineString(ls) => Geometry::LineString(transform_line_string(ls, trans)?),
        Geometry::Polygon(polygon) => Geometry::Polygon(transform_polygon(polygon, trans)?),
        Geometry::MultiPoint(mp) => Geometry::MultiPoint(MultiPoint::new(
            mp.iter().map(|p| trans.transform_point(*p)).collect::<Result<_>>()?,
        )),
        Geometry::MultiLineString(mls) => Geometry::MultiLineString(MultiLineString::new(
            mls.iter().map(|ls| transform_line_string(ls, trans)).collect::<Result<_>>()?,
        )),
        Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(MultiPolygon::new(
            mp.iter().map(|polygon| transform_polygon(polygon, trans)).collect::<Result<_>>()?,
        )),
        Geometry::Rect(rect) => Geometry::Polygon(transform_polygon(&rect.to_polygon(), trans)?),
        Geometry::Triangle(triangle) => Geometry::Polygon(transform_polygon(&triangle.to_polygon(), trans)?),
        Geometry::GeometryCollection(collection) => Geometry::GeometryCollection(GeometryCollection(
            collection
                .iter()
                .map(|geom| reproject_geometry(geom, trans))
                .collect::<Result<_>>()?,
        )),
    })
}

/// Checks that a vector overlay uses the reference system of the raster it is drawn on
pub fn ensure_overlay_crs(overlay: Option<&SpatialReference>, raster: Option<&SpatialReference>) -> Result<()> {
    srs::ensure_same_crs(overlay, raster)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo_types::{Rect, Triangle, coord, line_string, point, polygon};

    use super::*;
    use crate::{Error, crs};

    fn lambert_to_wgs84() -> CoordinateTransformer {
        CoordinateTransformer::from_epsg(crs::epsg::BELGIAN_LAMBERT72, crs::epsg::WGS84).unwrap()
    }

    #[test]
    fn reproject_point_matches_transformer() -> Result<()> {
        let trans = lambert_to_wgs84();
        let p = point!(x: 94079.44534873398, y: 192751.6060780408);

        let Geometry::Point(result) = reproject_geometry(&Geometry::Point(p), &trans)? else {
            panic!("Expected a point");
        };

        assert_relative_eq!(result, trans.transform_point(p)?, epsilon = 1e-12);
        assert_relative_eq!(result, Point::new(3.5713882022278653, 51.04223683846715), epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn reproject_polygon_with_hole() -> Result<()> {
        let trans = lambert_to_wgs84();
        let poly = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 100.0), (x: 0.0, y: 0.0)],
            interiors: [[(x: 10.0, y: 10.0), (x: 20.0, y: 10.0), (x: 20.0, y: 20.0), (x: 10.0, y: 10.0)]],
        );

        let Geometry::Polygon(result) = reproject_geometry(&Geometry::Polygon(poly.clone()), &trans)? else {
            panic!("Expected a polygon");
        };

        assert_eq!(result.exterior().0.len(), 4);
        assert_eq!(result.interiors().len(), 1);
        for (orig, projected) in poly.interiors()[0].points().zip(result.interiors()[0].points()) {
            assert_relative_eq!(projected, trans.transform_point(orig)?, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn rect_and_triangle_become_polygons() -> Result<()> {
        let trans = lambert_to_wgs84();

        let rect = Rect::new(coord! { x: 100000.0, y: 150000.0 }, coord! { x: 110000.0, y: 160000.0 });
        assert!(matches!(reproject_geometry(&Geometry::Rect(rect), &trans)?, Geometry::Polygon(_)));

        let triangle = Triangle::new(
            coord! { x: 100000.0, y: 150000.0 },
            coord! { x: 110000.0, y: 150000.0 },
            coord! { x: 100000.0, y: 160000.0 },
        );
        let Geometry::Polygon(poly) = reproject_geometry(&Geometry::Triangle(triangle), &trans)? else {
            panic!("Expected a polygon");
        };
        assert_eq!(poly.exterior().0.len(), 4);
        Ok(())
    }

    #[test]
    fn reproject_collection() -> Result<()> {
        let trans = lambert_to_wgs84();
        let collection = GeometryCollection(vec![
            Geometry::Point(point!(x: 100000.0, y: 150000.0)),
            Geometry::LineString(line_string![(x: 100000.0, y: 150000.0), (x: 101000.0, y: 151000.0)]),
        ]);

        let Geometry::GeometryCollection(result) = reproject_geometry(&Geometry::GeometryCollection(collection), &trans)? else {
            panic!("Expected a collection");
        };
        assert_eq!(result.0.len(), 2);
        Ok(())
    }

    #[test]
    fn overlay_crs_check() -> Result<()> {
        let lambert = SpatialReference::from_epsg(crs::epsg::BELGIAN_LAMBERT72)?;
        let wgs84 = SpatialReference::from_epsg(crs::epsg::WGS84)?;

        assert!(ensure_overlay_crs(Some(&lambert), Some(&lambert)).is_ok());
        assert!(matches!(
            ensure_overlay_crs(Some(&lambert), Some(&wgs84)),
            Err(Error::CrsMismatch { .. })
        ));
        assert!(matches!(ensure_overlay_crs(None, Some(&wgs84)), Err(Error::CrsMismatch { .. })));
        Ok(())
    }
}
