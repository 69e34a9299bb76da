//! Feed rules shared by the store backends and the API layer.

/// Default trailing window for the trending feed, in hours.
pub const DEFAULT_TRENDING_WINDOW_HOURS: i64 = 24;

/// Flat-plane distance approximation in kilometres.
///
/// Adequate at municipal scale; a deployment spanning large extents would
/// switch to haversine or a geospatial index.
pub fn distance_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
  const KM_PER_DEGREE: f64 = 111.0;
  let lat_diff = lat_a - lat_b;
  let lon_diff = lon_a - lon_b;
  (lat_diff * lat_diff + lon_diff * lon_diff).sqrt() * KM_PER_DEGREE
}
