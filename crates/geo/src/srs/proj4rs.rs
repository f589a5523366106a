use proj4rs::Proj;
use proj4rs::transform::transform;

use crate::Error;
use crate::Point;
use crate::Result;
use crate::crs::Epsg;

/// Definition of the geographic coordinate system all projections pivot through.
const WGS84_LONLAT: &str = "+proj=longlat +datum=WGS84 +no_defs";

const WKT_ROOTS: [&str; 7] = ["GEOGCS[", "PROJCS[", "GEOCCS[", "VERT_CS[", "LOCAL_CS[", "COMPD_CS[", "FITTED_C["];
const WKT2_ROOTS: [&str; 9] = [
    "GEODCRS[",
    "GEOGCRS[",
    "PROJCRS[",
    "VERTCRS[",
    "ENGCRS[",
    "COMPOUNDCRS[",
    "BOUNDCRS[",
    "PARAMETRICCRS[",
    "TIMECRS[",
];

/// A coordinate reference system that knows how to project geographic coordinates and back.
///
/// Geographic coordinates are always expressed in degrees using the traditional GIS axis order (x = longitude, y = latitude).
#[derive(Debug, Clone)]
pub struct SpatialReference {
    srs: Proj,
    lonlat: Proj,
    epsg: Option<Epsg>,
    proj_str: String,
}

impl SpatialReference {
    pub fn from_proj(projection: &str) -> Result<Self> {
        if projection.trim().is_empty() {
            return Err(Error::InvalidArgument("Empty projection string".into()));
        }

        Self::create(projection.trim().to_string(), None)
    }

    pub fn from_epsg(epsg: Epsg) -> Result<Self> {
        let proj_str = proj_string_for_epsg(epsg)?;
        Self::create(proj_str, Some(epsg))
    }

    /// Accepts `EPSG:nnnn`, a PROJ string, a WKT (1 or 2) definition or the `WGS84` alias
    pub fn from_definition(def: &str) -> Result<Self> {
        let def = def.trim();
        if def.is_empty() {
            return Err(Error::InvalidArgument("Empty spatial reference definition".into()));
        }

        if let Some(epsg) = Epsg::parse(def) {
            return Self::from_epsg(epsg);
        }

        if def.eq_ignore_ascii_case("WGS84") {
            return Self::from_epsg(crate::crs::epsg::WGS84);
        }

        if is_wkt_string(def) {
            if let Some(epsg) = parse_wkt_root_epsg(def) {
                // The crs database definition gives results closer to the reference implementations than the converted wkt
                if let Ok(srs) = Self::from_epsg(epsg) {
                    return Ok(srs);
                }
            }

            let proj_str = proj4wkt::wkt_to_projstring(def).map_err(|e| Error::UnsupportedCrs(format!("Failed to parse WKT string ({e})")))?;
            return Self::create(proj_str, None);
        }

        Self::from_proj(def)
    }

    fn create(proj_str: String, epsg: Option<Epsg>) -> Result<Self> {
        let srs = Proj::from_proj_string(&proj_str).map_err(|e| Error::UnsupportedCrs(format!("{proj_str} ({e})")))?;
        let lonlat = Proj::from_proj_string(WGS84_LONLAT)?;

        Ok(Self {
            srs,
            lonlat,
            epsg,
            proj_str,
        })
    }

    pub fn to_wkt(&self) -> Result<String> {
        match self.epsg {
            Some(epsg) => crs_definitions::from_code(epsg.short_code()?)
                .map(|def| def.wkt.to_string())
                .ok_or_else(|| Error::Runtime(format!("Failed to generate WKT for projection with EPSG code {epsg}"))),
            None => Err(Error::Runtime(
                "Failed to generate WKT for projection because of missing EPSG code".into(),
            )),
        }
    }

    pub fn to_proj(&self) -> &str {
        &self.proj_str
    }

    pub fn epsg(&self) -> Option<Epsg> {
        self.epsg
    }

    pub fn is_geographic(&self) -> bool {
        self.srs.is_latlong()
    }

    pub fn is_projected(&self) -> bool {
        !self.is_geographic()
    }

    /// Projects a WGS84 longitude/latitude (degrees) to a coordinate in this reference system
    pub fn project(&self, lon: f64, lat: f64) -> Result<Point> {
        transform_between(&self.lonlat, &self.srs, Point::new(lon, lat))
    }

    /// Converts a coordinate in this reference system to a WGS84 longitude/latitude (degrees)
    pub fn unproject(&self, x: f64, y: f64) -> Result<Point> {
        transform_between(&self.srs, &self.lonlat, Point::new(x, y))
    }

    fn normalized_definition(&self) -> String {
        self.proj_str.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl PartialEq for SpatialReference {
    fn eq(&self, other: &Self) -> bool {
        match (self.epsg, other.epsg) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => self.normalized_definition() == other.normalized_definition(),
        }
    }
}

impl std::fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.epsg {
            Some(epsg) => write!(f, "{epsg}"),
            None => write!(f, "{}", self.proj_str),
        }
    }
}

/// Runs a single point through proj4rs, which works in radians for geographic systems
fn transform_between(from: &Proj, to: &Proj, point: Point) -> Result<Point> {
    let mut p = if from.is_latlong() { point.to_radians() } else { point };
    transform(from, to, &mut p)?;
    if to.is_latlong() {
        p = p.to_degrees();
    }

    if !p.x().is_finite() || !p.y().is_finite() {
        return Err(Error::Runtime(format!(
            "Point ({}, {}) can not be represented in the target reference system",
            point.x(),
            point.y()
        )));
    }

    Ok(p)
}

fn proj_string_for_epsg(epsg: Epsg) -> Result<String> {
    crs_definitions::from_code(epsg.short_code()?)
        .map(|def| def.proj4.to_string())
        .ok_or_else(|| Error::UnsupportedCrs(format!("No projection definition available for {epsg}")))
}

fn is_wkt_string(s: &str) -> bool {
    WKT_ROOTS.iter().any(|&root| s.starts_with(root)) || WKT2_ROOTS.iter().any(|&root| s.starts_with(root))
}

/// The authority of the root node is the last one in the definition
fn parse_wkt_root_epsg(wkt: &str) -> Option<Epsg> {
    const WKT1_AUTHORITY: &str = "AUTHORITY[\"EPSG\",";
    const WKT2_ID: &str = "ID[\"EPSG\",";

    let (pos, marker) = match (wkt.rfind(WKT1_AUTHORITY), wkt.rfind(WKT2_ID)) {
        (Some(p1), Some(p2)) if p2 > p1 => (p2, WKT2_ID),
        (Some(p1), _) => (p1, WKT1_AUTHORITY),
        (None, Some(p2)) => (p2, WKT2_ID),
        (None, None) => return None,
    };

    let code: String = wkt[pos + marker.len()..]
        .chars()
        .skip_while(|c| *c == '"' || c.is_whitespace())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    code.parse::<u32>().ok().map(Epsg::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::crs;

    #[test]
    fn epsg_import() {
        let srs = SpatialReference::from_epsg(crs::epsg::BELGIAN_LAMBERT72).unwrap();
        assert!(srs.is_projected());
        assert!(!srs.is_geographic());
        assert_eq!(srs.epsg(), Some(crs::epsg::BELGIAN_LAMBERT72));

        let srs = SpatialReference::from_definition(srs.to_proj()).unwrap();
        assert!(srs.is_projected());
        assert_eq!(srs.epsg(), None); // lost after conversion to a proj string

        let srs = SpatialReference::from_epsg(crs::epsg::WGS84).unwrap();
        assert!(srs.is_geographic());
    }

    #[test]
    fn wkt_import() {
        let wkt = crs_definitions::from_code(31370)
            .map(|def| def.wkt.to_string())
            .expect("Failed to get WKT for BELGIAN_LAMBERT72");

        let srs = SpatialReference::from_definition(&wkt).expect("Failed to parse wkt");
        assert!(srs.is_projected());
        assert_eq!(srs.epsg(), Some(crs::epsg::BELGIAN_LAMBERT72));
        assert!(srs.to_wkt().is_ok());
    }

    #[test]
    fn wkt_root_authority() {
        let wkt = r#"PROJCS["Belge 1972 / Belgian Lambert 72",GEOGCS["Belge 1972",AUTHORITY["EPSG","4313"]],AUTHORITY["EPSG","31370"]]"#;
        assert_eq!(parse_wkt_root_epsg(wkt), Some(crs::epsg::BELGIAN_LAMBERT72));

        let wkt2 = r#"GEOGCRS["WGS 84",ID["EPSG",4326]]"#;
        assert_eq!(parse_wkt_root_epsg(wkt2), Some(crs::epsg::WGS84));
        assert_eq!(parse_wkt_root_epsg(r#"LOCAL_CS["none"]"#), None);
    }

    #[test]
    fn aliases_and_equality() {
        let wgs84 = SpatialReference::from_definition("WGS84").unwrap();
        assert_eq!(wgs84, SpatialReference::from_definition("EPSG:4326").unwrap());
        assert_eq!(wgs84.to_string(), "EPSG:4326");

        let utm = SpatialReference::from_proj("+proj=utm +zone=18 +datum=WGS84 +units=m +no_defs").unwrap();
        let utm_spaced = SpatialReference::from_proj("+proj=utm  +zone=18 +datum=WGS84   +units=m +no_defs").unwrap();
        assert_eq!(utm, utm_spaced);
        assert_ne!(utm, wgs84);
    }

    #[test]
    fn invalid_definitions() {
        assert!(matches!(SpatialReference::from_definition(""), Err(Error::InvalidArgument(_))));
        assert!(matches!(SpatialReference::from_epsg(Epsg::new(1)), Err(Error::UnsupportedCrs(_))));
        assert!(matches!(
            SpatialReference::from_proj("+proj=doesnotexist"),
            Err(Error::UnsupportedCrs(_))
        ));
    }

    #[test]
    fn project_unproject() {
        let srs = SpatialReference::from_epsg(crs::epsg::BELGIAN_LAMBERT72).unwrap();
        let p = srs.project(3.5713882022278653, 51.04223683846715).unwrap();
        assert_relative_eq!(p, Point::new(94079.44534873398, 192751.6060780408), epsilon = 1e-1);

        let lonlat = srs.unproject(p.x(), p.y()).unwrap();
        assert_relative_eq!(lonlat, Point::new(3.5713882022278653, 51.04223683846715), epsilon = 1e-7);
    }
}
