//! EPSG authority codes and well known coordinate reference systems.

use crate::{Error, Result};

/// An EPSG authority code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Epsg(u32);

impl Epsg {
    pub const fn new(code: u32) -> Self {
        Epsg(code)
    }

    pub const fn code(&self) -> u32 {
        self.0
    }

    /// The code as used by the crs definition database and the GeoTIFF key directory (16 bit)
    pub fn short_code(&self) -> Result<u16> {
        u16::try_from(self.0).map_err(|_| Error::UnsupportedCrs(format!("{self} does not fit in a 16 bit code")))
    }

    /// Parses `EPSG:nnnn` (case insensitive), returns `None` for other strings
    pub fn parse(def: &str) -> Option<Self> {
        let def = def.trim();
        let (authority, code) = def.split_once(':')?;
        if !authority.eq_ignore_ascii_case("EPSG") {
            return None;
        }

        code.trim().parse::<u32>().ok().map(Epsg)
    }
}

impl From<u32> for Epsg {
    fn from(code: u32) -> Self {
        Epsg(code)
    }
}

impl From<u16> for Epsg {
    fn from(code: u16) -> Self {
        Epsg(code as u32)
    }
}

impl From<Epsg> for u32 {
    fn from(epsg: Epsg) -> u32 {
        epsg.0
    }
}

impl std::fmt::Display for Epsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

pub mod epsg {
    use super::Epsg;

    pub const WGS84: Epsg = Epsg::new(4326);
    pub const WGS84_WEB_MERCATOR: Epsg = Epsg::new(3857);
    pub const BELGIAN_LAMBERT72: Epsg = Epsg::new(31370);

    /// WGS 84 / UTM zone `zone`N
    pub const fn utm_north(zone: u32) -> Epsg {
        Epsg::new(32600 + zone)
    }

    /// WGS 84 / UTM zone `zone`S
    pub const fn utm_south(zone: u32) -> Epsg {
        Epsg::new(32700 + zone)
    }
}
