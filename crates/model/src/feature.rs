use indexmap::IndexMap;
use schemars::{gen::SchemaGenerator, schema::Schema, JsonSchema};
use serde::{Deserialize, Serialize};
use utility::id::HasId;
use uuid::Uuid;

use crate::{
    sidc::affiliation_from_sidc,
    unit::{check_coordinates, Affiliation, UnitError},
    ExampleData, WithId,
};

pub const SIDC_PROPERTY: &str = "sidc";
pub const UNIQUE_DESIGNATION_PROPERTY: &str = "uniqueDesignation";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
pub enum FeatureKind {
    #[default]
    Feature,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
pub enum CollectionKind {
    #[default]
    FeatureCollection,
}

/// A `[longitude, latitude]` pair, range checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    longitude: f64,
    latitude: f64,
}

impl Position {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, UnitError> {
        check_coordinates(latitude, longitude)?;
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

impl TryFrom<[f64; 2]> for Position {
    type Error = UnitError;

    fn try_from([longitude, latitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Position::new(longitude, latitude)
    }
}

impl From<Position> for [f64; 2] {
    fn from(position: Position) -> Self {
        [position.longitude, position.latitude]
    }
}

impl JsonSchema for Position {
    fn schema_name() -> String {
        "Position".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <[f64; 2]>::json_schema(gen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
}

impl Geometry {
    pub fn point(position: Position) -> Self {
        Self::Point {
            coordinates: position,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::Point { coordinates } => *coordinates,
        }
    }
}

/// Value of a single feature property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(#[schemars(with = "f64")] serde_json::Number),
    String(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for PropertyValue {
    /// Non-finite numbers have no JSON form and become `Null`.
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Self::Number)
            .unwrap_or(Self::Null)
    }
}

pub type Properties = IndexMap<String, PropertyValue>;

/// A unit in its symbology form: a point feature with open properties.
///
/// The store-assigned id is not part of the feature; stored features are
/// `WithId<UnitFeature>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UnitFeature {
    #[serde(rename = "type", default)]
    pub kind: FeatureKind,
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Properties,
}

impl HasId for UnitFeature {
    type IdType = Uuid;
}

impl UnitFeature {
    pub fn new(position: Position, properties: Properties) -> Self {
        Self {
            kind: FeatureKind::Feature,
            geometry: Geometry::point(position),
            properties,
        }
    }

    pub fn position(&self) -> Position {
        self.geometry.position()
    }

    pub fn sidc(&self) -> Option<&str> {
        self.properties
            .get(SIDC_PROPERTY)
            .and_then(PropertyValue::as_str)
    }

    pub fn unique_designation(&self) -> Option<&str> {
        self.properties
            .get(UNIQUE_DESIGNATION_PROPERTY)
            .and_then(PropertyValue::as_str)
    }

    /// Affiliation decoded from the `sidc` property, `Unknown` without one.
    pub fn affiliation(&self) -> Affiliation {
        self.sidc()
            .map(affiliation_from_sidc)
            .unwrap_or(Affiliation::Unknown)
    }
}

impl ExampleData for UnitFeature {
    fn example_data() -> Self {
        let mut properties = Properties::new();
        properties.insert(SIDC_PROPERTY.to_owned(), "SFGPUCIZ--------".into());
        properties.insert(
            UNIQUE_DESIGNATION_PROPERTY.to_owned(),
            "Friendly-1".into(),
        );
        Self {
            kind: FeatureKind::Feature,
            geometry: Geometry::Point {
                coordinates: Position {
                    longitude: 13.38272,
                    latitude: 52.46385,
                },
            },
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UnitFeatureCollection {
    #[serde(rename = "type", default)]
    pub kind: CollectionKind,
    pub features: Vec<WithId<UnitFeature>>,
}

impl UnitFeatureCollection {
    pub fn new(features: Vec<WithId<UnitFeature>>) -> Self {
        Self {
            kind: CollectionKind::FeatureCollection,
            features,
        }
    }
}

/// Partial update of a stored feature.
///
/// Missing and `null` members are both "not supplied". Members that can not be
/// updated (`id`, `type`) are ignored.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UnitFeaturePatch {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Properties>,
}

impl UnitFeaturePatch {
    pub fn is_empty(&self) -> bool {
        self.geometry.is_none() && self.properties.is_none()
    }

    /// Replaces every supplied member of `feature`.
    pub fn apply_to(self, feature: &mut UnitFeature) {
        if let Some(geometry) = self.geometry {
            feature.geometry = geometry;
        }
        if let Some(properties) = self.properties {
            feature.properties = properties;
        }
    }
}
