//! Location input types

use nofa_common::NofaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::features::shared::fields;

/// EPSG code of ETRS89 / UTM zone 32N
pub const SRID_UTM32: i32 = 25832;

/// EPSG code of ETRS89 / UTM zone 33N
pub const SRID_UTM33: i32 = 25833;

/// Coordinate reference system of user-entered coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Crs {
    Utm32,
    #[default]
    Utm33,
    Epsg(i32),
}

impl Crs {
    pub fn srid(self) -> i32 {
        match self {
            Crs::Utm32 => SRID_UTM32,
            Crs::Utm33 => SRID_UTM33,
            Crs::Epsg(srid) => srid,
        }
    }
}

impl FromStr for Crs {
    type Err = NofaError;

    /// Accepts `UTM32`, `UTM33`, `EPSG:<code>` or a bare EPSG code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let code = match normalized.as_str() {
            "UTM32" | "UTM 32" => return Ok(Crs::Utm32),
            "UTM33" | "UTM 33" => return Ok(Crs::Utm33),
            other => other.strip_prefix("EPSG:").unwrap_or(other),
        };

        match code.parse::<i32>() {
            Ok(SRID_UTM32) => Ok(Crs::Utm32),
            Ok(SRID_UTM33) => Ok(Crs::Utm33),
            Ok(srid) if srid > 0 => Ok(Crs::Epsg(srid)),
            _ => Err(NofaError::UnsupportedCrs(s.to_string())),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Utm32 => write!(f, "UTM32"),
            Crs::Utm33 => write!(f, "UTM33"),
            Crs::Epsg(srid) => write!(f, "EPSG:{srid}"),
        }
    }
}

impl TryFrom<String> for Crs {
    type Error = NofaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self {
        crs.to_string()
    }
}

/// What to do with coordinates that may match an existing location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateMode {
    /// Reuse the nearest stored location within the configured distance
    #[default]
    UseNearest,
    /// Always insert a new location
    CreateNew,
}

impl FromStr for CoordinateMode {
    type Err = NofaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "use_nearest" | "nearest" => Ok(CoordinateMode::UseNearest),
            "create_new" | "new" => Ok(CoordinateMode::CreateNew),
            _ => Err(NofaError::Parse(format!("Unknown coordinate mode: {s}"))),
        }
    }
}

/// A planar point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[cfg(test)]
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One user-entered location, in one of three forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum LocationInput {
    /// A location UUID, as typed (validated on resolution)
    Identifier {
        #[serde(default, deserialize_with = "fields::text")]
        location_id: Option<String>,
    },
    /// Projected coordinates
    Coordinates {
        #[serde(default, deserialize_with = "fields::decimal")]
        x: Option<f64>,
        #[serde(default, deserialize_with = "fields::decimal")]
        y: Option<f64>,
        #[serde(default)]
        crs: Crs,
        #[serde(default)]
        mode: CoordinateMode,
        /// Stored as the verbatim locality of a new location
        #[serde(default, deserialize_with = "fields::text")]
        name: Option<String>,
    },
    /// Historical lake code (`no_vatn_lnr`)
    LegacyCode {
        #[serde(default, deserialize_with = "fields::integer")]
        code: Option<i32>,
    },
}

impl LocationInput {
    pub fn identifier(id: impl Into<String>) -> Self {
        LocationInput::Identifier {
            location_id: Some(id.into()),
        }
    }

    pub fn coordinates(x: f64, y: f64, crs: Crs, mode: CoordinateMode) -> Self {
        LocationInput::Coordinates {
            x: Some(x),
            y: Some(y),
            crs,
            mode,
            name: None,
        }
    }

    pub fn legacy_code(code: i32) -> Self {
        LocationInput::LegacyCode { code: Some(code) }
    }

    pub fn method(&self) -> &'static str {
        match self {
            LocationInput::Identifier { .. } => "identifier",
            LocationInput::Coordinates { .. } => "coordinates",
            LocationInput::LegacyCode { .. } => "legacy_code",
        }
    }

    /// Hashable identity used to collapse repeated inputs
    pub fn dedup_key(&self) -> LocationKey {
        match self {
            LocationInput::Identifier { location_id } => LocationKey::Identifier(
                location_id
                    .as_deref()
                    .map(|id| id.trim().to_lowercase())
                    .unwrap_or_default(),
            ),
            LocationInput::Coordinates {
                x,
                y,
                crs,
                mode,
                name,
            } => LocationKey::Coordinates {
                x: x.map(f64::to_bits),
                y: y.map(f64::to_bits),
                crs: *crs,
                mode: *mode,
                name: name.clone(),
            },
            LocationInput::LegacyCode { code } => LocationKey::LegacyCode(*code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocationKey {
    Identifier(String),
    Coordinates {
        x: Option<u64>,
        y: Option<u64>,
        crs: Crs,
        mode: CoordinateMode,
        name: Option<String>,
    },
    LegacyCode(Option<i32>),
}

/// Resolver settings taken from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    pub storage_srid: i32,
    /// `None` matches the nearest location at any distance
    pub nearest_max_distance: Option<f64>,
    pub location_type: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            storage_srid: crate::config::DEFAULT_STORAGE_SRID,
            nearest_max_distance: Some(crate::config::DEFAULT_NEAREST_MAX_DISTANCE),
            location_type: crate::config::DEFAULT_LOCATION_TYPE.to_string(),
        }
    }
}
