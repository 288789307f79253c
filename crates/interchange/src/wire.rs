//! Serde mirror of the persisted shape document.
//!
//! Field names and order match what the map overlay has always written, so
//! documents saved by earlier versions keep loading.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shape::{Geometry, LatLng, LatLngBounds, Path, ShapeRecord};
use std::fmt;

use crate::NumberFormat;

/// A number that is written either as a JSON string or a JSON number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WireNumber {
    pub value: f64,
    pub format: NumberFormat,
}

impl WireNumber {
    pub fn new(value: f64, format: NumberFormat) -> Self {
        Self { value, format }
    }
}

/// Format a float the way the overlay writer did: shortest text, no
/// trailing `.0`.
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Also covers negative zero.
        "0".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{}", value)
    }
}

impl Serialize for WireNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // JSON numbers cannot hold infinities, so those stay strings.
        match self.format {
            NumberFormat::Numeric if self.value.is_finite() => {
                serializer.serialize_f64(self.value)
            }
            _ => serializer.serialize_str(&format_number(self.value)),
        }
    }
}

impl<'de> Deserialize<'de> for WireNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NumberVisitor;

        impl<'de> Visitor<'de> for NumberVisitor {
            type Value = WireNumber;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number or a string holding a number")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<WireNumber, E> {
                Ok(WireNumber::new(v, NumberFormat::Numeric))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<WireNumber, E> {
                Ok(WireNumber::new(v as f64, NumberFormat::Numeric))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<WireNumber, E> {
                Ok(WireNumber::new(v as f64, NumberFormat::Numeric))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<WireNumber, E> {
                let value = match v.trim() {
                    "Infinity" => f64::INFINITY,
                    "-Infinity" => f64::NEG_INFINITY,
                    text => text
                        .parse::<f64>()
                        .map_err(|_| E::custom(format!("invalid number \"{}\"", v)))?,
                };
                Ok(WireNumber::new(value, NumberFormat::Legacy))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct WireLatLng {
    pub lat: WireNumber,
    pub lng: WireNumber,
}

impl WireLatLng {
    fn new(point: LatLng, format: NumberFormat) -> Self {
        Self {
            lat: WireNumber::new(point.lat, format),
            lng: WireNumber::new(point.lng, format),
        }
    }

    fn to_lat_lng(&self) -> LatLng {
        LatLng::new(self.lat.value, self.lng.value)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireBounds {
    pub north_east: WireLatLng,
    pub south_west: WireLatLng,
}

/// One polygon ring, wrapped in an object under `path`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct WireRing {
    pub path: Vec<WireLatLng>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum WireShape {
    Rectangle {
        #[serde(default)]
        color: String,
        bounds: WireBounds,
    },
    Circle {
        #[serde(default)]
        color: String,
        center: WireLatLng,
        radius: WireNumber,
    },
    Polygon {
        #[serde(default)]
        color: String,
        paths: Vec<WireRing>,
    },
    Polyline {
        #[serde(default)]
        color: String,
        path: Vec<WireLatLng>,
    },
}

fn wire_path(path: &Path, format: NumberFormat) -> Vec<WireLatLng> {
    path.iter().map(|p| WireLatLng::new(*p, format)).collect()
}

fn read_path(points: &[WireLatLng]) -> Path {
    points.iter().map(WireLatLng::to_lat_lng).collect()
}

impl WireShape {
    /// Wire form of a shape, or `None` for kinds that are not persisted.
    pub fn from_parts(geometry: &Geometry, color: &str, format: NumberFormat) -> Option<Self> {
        let color = color.to_string();
        let shape = match geometry {
            Geometry::Rectangle { bounds } => WireShape::Rectangle {
                color,
                bounds: WireBounds {
                    north_east: WireLatLng::new(bounds.north_east, format),
                    south_west: WireLatLng::new(bounds.south_west, format),
                },
            },
            Geometry::Circle { center, radius } => WireShape::Circle {
                color,
                center: WireLatLng::new(*center, format),
                radius: WireNumber::new(*radius, format),
            },
            Geometry::Polygon { paths } => WireShape::Polygon {
                color,
                paths: paths
                    .iter()
                    .map(|ring| WireRing {
                        path: wire_path(ring, format),
                    })
                    .collect(),
            },
            Geometry::Polyline { path } => WireShape::Polyline {
                color,
                path: wire_path(path, format),
            },
            Geometry::Marker { .. } => return None,
        };
        Some(shape)
    }

    pub fn into_record(self) -> ShapeRecord {
        match self {
            WireShape::Rectangle { color, bounds } => ShapeRecord::new(
                Geometry::Rectangle {
                    bounds: LatLngBounds::new(
                        bounds.south_west.to_lat_lng(),
                        bounds.north_east.to_lat_lng(),
                    ),
                },
                color,
            ),
            WireShape::Circle {
                color,
                center,
                radius,
            } => ShapeRecord::new(Geometry::circle(center.to_lat_lng(), radius.value), color),
            WireShape::Polygon { color, paths } => ShapeRecord::new(
                Geometry::polygon(paths.iter().map(|ring| read_path(&ring.path))),
                color,
            ),
            WireShape::Polyline { color, path } => {
                ShapeRecord::new(Geometry::polyline(read_path(&path)), color)
            }
        }
    }
}
