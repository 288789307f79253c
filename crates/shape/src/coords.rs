//! Geographic coordinates.
//!
//! The map widget owns projection and geometry math; these types only carry
//! positions between the widget, the store and the persisted document.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// A rectangle in geographic coordinates, given by its two corners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Build bounds from any two opposite corners.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_orders_corners() {
        let bounds = LatLngBounds::from_corners(LatLng::new(1.0, 1.0), LatLng::new(0.0, 2.0));
        assert_eq!(bounds.south_west, LatLng::new(0.0, 1.0));
        assert_eq!(bounds.north_east, LatLng::new(1.0, 2.0));
    }

    #[test]
    fn test_center() {
        let bounds = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(2.0, 4.0));
        assert_eq!(bounds.center(), LatLng::new(1.0, 2.0));
    }
}
