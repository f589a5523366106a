use crate::{Error, Result, SpatialReference, crs::Epsg};

const KEY_DIRECTORY_VERSION: u16 = 1;
const KEY_REVISION: u16 = 1;
const KEY_MINOR_REVISION: u16 = 0;

const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

const RASTER_PIXEL_IS_AREA: u16 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelType {
    #[default]
    Projected,
    Geographic,
    Geocentric,
}

impl ModelType {
    fn code(self) -> u16 {
        match self {
            ModelType::Projected => 1,
            ModelType::Geographic => 2,
            ModelType::Geocentric => 3,
        }
    }
}

/// The coordinate reference system information stored in the GeoKeyDirectory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionInfo {
    pub model_type: ModelType,
    pub projected_epsg: Option<Epsg>,
    pub geographic_epsg: Option<Epsg>,
}

impl ProjectionInfo {
    /// `None` for reference systems without an EPSG code, those can not be stored as geokeys
    pub fn from_spatial_reference(srs: &SpatialReference) -> Option<Self> {
        let epsg = srs.epsg()?;
        Some(if srs.is_geographic() {
            ProjectionInfo {
                model_type: ModelType::Geographic,
                projected_epsg: None,
                geographic_epsg: Some(epsg),
            }
        } else {
            ProjectionInfo {
                model_type: ModelType::Projected,
                projected_epsg: Some(epsg),
                geographic_epsg: None,
            }
        })
    }

    pub fn epsg(&self) -> Option<Epsg> {
        match self.model_type {
            ModelType::Projected => self.projected_epsg,
            ModelType::Geographic => self.geographic_epsg,
            ModelType::Geocentric => None,
        }
    }

    /// Parses the GeoKeyDirectory tag values, only inline keys are supported
    pub fn from_key_directory(key_dir: &[u16]) -> Result<Option<Self>> {
        if key_dir.len() < 4 {
            return Ok(None);
        }

        if key_dir[0] != KEY_DIRECTORY_VERSION {
            return Err(Error::Runtime(format!("Unexpected key directory version: {}", key_dir[0])));
        }

        let mut proj_info = ProjectionInfo::default();

        for key in key_dir[4..].chunks_exact(4) {
            let (location, count, value) = (key[1], key[2], key[3]);
            match key[0] {
                GT_MODEL_TYPE_GEO_KEY => {
                    if location != 0 {
                        return Err(Error::Runtime("Only inline model keys are supported".into()));
                    }

                    proj_info.model_type = match value {
                        1 => ModelType::Projected,
                        2 => ModelType::Geographic,
                        3 => ModelType::Geocentric,
                        _ => return Err(Error::Runtime(format!("Unsupported model type: {value}"))),
                    };
                }
                GEOGRAPHIC_TYPE_GEO_KEY => {
                    if location != 0 || count != 1 {
                        return Err(Error::Runtime("Only inline EPSG codes are supported".into()));
                    }
                    proj_info.geographic_epsg = Some(Epsg::from(value));
                }
                PROJECTED_CS_TYPE_GEO_KEY => {
                    if location != 0 || count != 1 {
                        return Err(Error::Runtime("Only inline EPSG codes are supported".into()));
                    }
                    proj_info.projected_epsg = Some(Epsg::from(value));
                }
                _ => {}
            }
        }

        Ok(Some(proj_info))
    }

    pub fn key_directory(&self) -> Result<Vec<u16>> {
        let mut keys = vec![
            [GT_MODEL_TYPE_GEO_KEY, 0, 1, self.model_type.code()],
            [GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_AREA],
        ];

        if let Some(epsg) = self.geographic_epsg {
            keys.push([GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, epsg.short_code()?]);
        }

        if let Some(epsg) = self.projected_epsg {
            keys.push([PROJECTED_CS_TYPE_GEO_KEY, 0, 1, epsg.short_code()?]);
        }

        let mut key_dir = vec![KEY_DIRECTORY_VERSION, KEY_REVISION, KEY_MINOR_REVISION, keys.len() as u16];
        key_dir.extend(keys.into_iter().flatten());
        Ok(key_dir)
    }
}
