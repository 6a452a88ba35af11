//! View models of the unit maps, rendered by the Leaflet page.

use model::{
    feature::UnitFeature,
    unit::{Affiliation, Unit},
    WithId,
};
use serde::Serialize;
use utility::geo::centroid;

pub const DEFAULT_ZOOM: u8 = 12;
pub const TILE_LAYER: &str = "OpenTopoMap";
pub const ICON_SIZE: [u32; 2] = [30, 30];

pub fn icon_url(affiliation: Affiliation) -> &'static str {
    match affiliation {
        Affiliation::Friendly => "images/milsymbol_2525D_FRIEND_Land_Unit.png",
        Affiliation::Neutral => "images/milsymbol_2525D_NEUTRAL_Land_Unit.png",
        Affiliation::Unknown => "images/milsymbol_2525D_UNKNOWN_Land_Unit.png",
        Affiliation::Hostile => "images/milsymbol_2525D_HOSTILE_Land_Unit.png",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    pub url: &'static str,
    pub size: [u32; 2],
}

impl Icon {
    pub fn for_affiliation(affiliation: Affiliation) -> Self {
        Self {
            url: icon_url(affiliation),
            size: ICON_SIZE,
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub icon: Icon,
    pub tooltip: Option<String>,
    pub popup: String,
}

/// One expandable sidebar section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarEntry {
    pub title: String,
    pub lines: Vec<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// `[latitude, longitude]`, absent when there is nothing to show.
    pub center: Option<[f64; 2]>,
    pub zoom: u8,
    pub tile_layer: &'static str,
    pub markers: Vec<Marker>,
    pub sidebar: Vec<SidebarEntry>,
}

impl MapView {
    fn new(markers: Vec<Marker>, sidebar: Vec<SidebarEntry>) -> Self {
        let center = centroid(
            markers
                .iter()
                .map(|marker| (marker.latitude, marker.longitude)),
        )
        .map(|(latitude, longitude)| [latitude, longitude]);

        Self {
            center,
            zoom: DEFAULT_ZOOM,
            tile_layer: TILE_LAYER,
            markers,
            sidebar,
        }
    }

    /// Map of basic units. The sidebar lists them in display order, the
    /// markers keep the order they were fetched in.
    pub fn basic(units: &[Unit]) -> Self {
        let markers = units
            .iter()
            .map(|unit| Marker {
                latitude: unit.latitude(),
                longitude: unit.longitude(),
                icon: Icon::for_affiliation(unit.affiliation()),
                tooltip: Some(unit.callsign().to_owned()),
                popup: unit.affiliation().to_string(),
            })
            .collect();

        let mut sorted = units.to_vec();
        Unit::sort(&mut sorted);
        let sidebar = sorted
            .iter()
            .map(|unit| SidebarEntry {
                title: unit.callsign().to_owned(),
                lines: vec![
                    unit.affiliation().label().to_uppercase(),
                    format!("Latitude: {}", unit.latitude()),
                    format!("Longitude: {}", unit.longitude()),
                ],
            })
            .collect();

        Self::new(markers, sidebar)
    }

    /// Map of symbology features. Affiliations come from each feature's SIDC.
    pub fn milsymbol(features: &[WithId<UnitFeature>]) -> Self {
        let markers = features
            .iter()
            .map(|feature| {
                let position = feature.content.position();
                Marker {
                    latitude: position.latitude(),
                    longitude: position.longitude(),
                    icon: Icon::for_affiliation(feature.content.affiliation()),
                    tooltip: feature.content.unique_designation().map(str::to_owned),
                    popup: format!(
                        "Lat: {}, Lon: {}",
                        position.latitude(),
                        position.longitude()
                    ),
                }
            })
            .collect();

        let sidebar = features
            .iter()
            .map(|feature| {
                let position = feature.content.position();
                SidebarEntry {
                    title: feature
                        .content
                        .unique_designation()
                        .unwrap_or_default()
                        .to_owned(),
                    lines: vec![
                        format!("SIDC: {}", feature.content.sidc().unwrap_or_default()),
                        format!("LAT: {}", position.latitude()),
                        format!("LON: {}", position.longitude()),
                    ],
                }
            })
            .collect();

        Self::new(markers, sidebar)
    }
}
