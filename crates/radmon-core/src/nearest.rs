//! Nearest monitoring station to a coordinate.
//!
//! Distances are geodesics on the WGS84 ellipsoid (Karney's algorithm, via
//! [`geo::GeodesicDistance`]), rounded to the millimetre so that results are stable
//! across platforms and ties are decided by name.
//!
//! ```rust
//! use radmon_core::{Catalog, nearest};
//!
//! let found = nearest(Catalog::builtin(), 53.9045, 27.5615).unwrap();
//! assert_eq!(found.station, "Минск");
//! assert_eq!(found.distance_m, 0.0);
//! ```

use crate::catalog::{Catalog, valid_coordinates};
use crate::types::NearestStation;
use crate::{Error, Result};
use geo::{GeodesicDistance, Point};
use std::cmp::Ordering;

/// Find the catalog station closest to `(latitude, longitude)`.
///
/// The minimum is taken over `(distance, name)` pairs, so equal distances resolve
/// to the lexicographically smallest name.
///
/// # Errors
///
/// - [`Error::InvalidCoordinates`] if either coordinate is NaN or infinite, or the
///   latitude lies outside `[-90, 90]`
/// - [`Error::NotFound`] if the catalog has no stations
pub fn nearest(catalog: &Catalog, latitude: f64, longitude: f64) -> Result<NearestStation> {
    if !valid_coordinates(latitude, longitude) {
        return Err(Error::InvalidCoordinates {
            latitude,
            longitude,
        });
    }

    let origin = Point::new(longitude, latitude);

    catalog
        .stations()
        .map(|station| {
            let target = Point::new(station.longitude(), station.latitude());
            (round_mm(origin.geodesic_distance(&target)), station.name())
        })
        .min_by(|a, b| compare_candidates(*a, *b))
        .map(|(distance_m, name)| NearestStation {
            distance_m,
            station: name.to_string(),
        })
        .ok_or_else(|| Error::NotFound("Catalog has no stations".into()))
}

fn round_mm(metres: f64) -> f64 {
    (metres * 1000.0).round() / 1000.0
}

fn compare_candidates(a: (f64, &str), b: (f64, &str)) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1))
}
