use model::unit::{Affiliation, Unit};

/// Units shown when the units endpoint can not be reached.
pub fn sample_units() -> Vec<Unit> {
    [
        ("ALPHA-1", Affiliation::Friendly, 35.2603, -116.8657),
        ("ALPHA-2", Affiliation::Friendly, 35.2539, -116.8591),
        ("HOSTILE-1", Affiliation::Hostile, 35.2812, -116.8045),
        ("UNKNOWN-1", Affiliation::Unknown, 35.2709, -116.8534),
    ]
    .into_iter()
    .filter_map(|(callsign, affiliation, latitude, longitude)| {
        Unit::new(callsign, affiliation, latitude, longitude).ok()
    })
    .collect()
}
