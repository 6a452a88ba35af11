use std::{cmp::Ordering, error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo;

/// Disposition of a tracked unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Affiliation {
    Friendly,
    Hostile,
    Neutral,
    Unknown,
}

impl Affiliation {
    pub const ALL: [Affiliation; 4] = [
        Affiliation::Friendly,
        Affiliation::Hostile,
        Affiliation::Neutral,
        Affiliation::Unknown,
    ];

    /// Capitalized display label, e.g. `"Friendly"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Friendly => "Friendly",
            Self::Hostile => "Hostile",
            Self::Neutral => "Neutral",
            Self::Unknown => "Unknown",
        }
    }

    // friendly first, neutral last
    fn display_rank(&self) -> u8 {
        match self {
            Self::Friendly => 0,
            Self::Hostile => 1,
            Self::Unknown => 2,
            Self::Neutral => 3,
        }
    }
}

impl fmt::Display for Affiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnitError {
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl error::Error for UnitError {}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::LatitudeOutOfRange(latitude) => {
                write!(f, "latitude {} is outside of [-90, 90]", latitude)
            }
            UnitError::LongitudeOutOfRange(longitude) => {
                write!(f, "longitude {} is outside of [-180, 180]", longitude)
            }
        }
    }
}

pub(crate) fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), UnitError> {
    if !geo::is_valid_latitude(latitude) {
        return Err(UnitError::LatitudeOutOfRange(latitude));
    }
    if !geo::is_valid_longitude(longitude) {
        return Err(UnitError::LongitudeOutOfRange(longitude));
    }
    Ok(())
}

/// A unit in its basic form, identified by its callsign.
///
/// Coordinates are validated on construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UnitDto")]
pub struct Unit {
    callsign: String,
    affiliation: Affiliation,
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct UnitDto {
    callsign: String,
    affiliation: Affiliation,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<UnitDto> for Unit {
    type Error = UnitError;

    fn try_from(dto: UnitDto) -> Result<Self, Self::Error> {
        Unit::new(dto.callsign, dto.affiliation, dto.latitude, dto.longitude)
    }
}

impl Unit {
    pub fn new<S: Into<String>>(
        callsign: S,
        affiliation: Affiliation,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, UnitError> {
        check_coordinates(latitude, longitude)?;
        Ok(Self {
            callsign: callsign.into(),
            affiliation,
            latitude,
            longitude,
        })
    }

    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    pub fn affiliation(&self) -> Affiliation {
        self.affiliation
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Orders by affiliation (friendly, hostile, unknown, neutral), then by
    /// callsign.
    pub fn display_order(&self, other: &Self) -> Ordering {
        self.affiliation
            .display_rank()
            .cmp(&other.affiliation.display_rank())
            .then_with(|| self.callsign.cmp(&other.callsign))
    }

    pub fn sort(units: &mut [Unit]) {
        units.sort_by(|a, b| a.display_order(b));
    }
}
