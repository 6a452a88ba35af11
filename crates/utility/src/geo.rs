use std::ops::RangeInclusive;

pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// `false` for NaN as well as for values outside [-90, 90].
pub fn is_valid_latitude(latitude: f64) -> bool {
    LATITUDE_RANGE.contains(&latitude)
}

/// `false` for NaN as well as for values outside [-180, 180].
pub fn is_valid_longitude(longitude: f64) -> bool {
    LONGITUDE_RANGE.contains(&longitude)
}

/// Arithmetic mean of `(latitude, longitude)` pairs.
///
/// Returns `None` for an empty input. Does not handle the antimeridian.
pub fn centroid<I>(coordinates: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (lat_sum, lon_sum, count) = coordinates.into_iter().fold(
        (0.0, 0.0, 0usize),
        |(lat_sum, lon_sum, count), (latitude, longitude)| {
            (lat_sum + latitude, lon_sum + longitude, count + 1)
        },
    );

    if count == 0 {
        return None;
    }

    let count = count as f64;
    Some((lat_sum / count, lon_sum / count))
}
