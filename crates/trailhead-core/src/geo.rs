//! Great-circle geometry on a spherical earth.

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two coordinate pairs (degrees),
/// computed with the haversine formula on a sphere of [`EARTH_RADIUS_M`].
///
/// Total for any pair of well-formed coordinates; never panics.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
  let phi1 = lat1.to_radians();
  let phi2 = lat2.to_radians();
  let dphi = (lat2 - lat1).to_radians();
  let dlam = (lon2 - lon1).to_radians();

  let a = (dphi / 2.0).sin().powi(2)
    + phi1.cos() * phi2.cos() * (dlam / 2.0).sin().powi(2);
  2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_distance_for_identical_points() {
    assert_eq!(haversine_m(27.7, 86.8, 27.7, 86.8), 0.0);
  }

  #[test]
  fn symmetric() {
    let d1 = haversine_m(27.7, 86.8, 27.71, 86.81);
    let d2 = haversine_m(27.71, 86.81, 27.7, 86.8);
    assert_eq!(d1, d2);
  }

  #[test]
  fn small_offset_near_everest_is_about_150m() {
    // 0.001° in both axes at 27.7°N: ~111 m north, ~98 m east.
    let d = haversine_m(27.7000, 86.8000, 27.7010, 86.8010);
    assert!((130.0..170.0).contains(&d), "distance was {d}");
  }

  #[test]
  fn one_degree_of_latitude_is_about_111_km() {
    let d = haversine_m(0.0, 0.0, 1.0, 0.0);
    assert!((110_000.0..112_500.0).contains(&d), "distance was {d}");
  }
}
