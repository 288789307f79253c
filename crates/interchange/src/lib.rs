//! Shape interchange format
//!
//! JSON document holding the drawn shapes, as written by the map overlay
//! and handed to the save/load handlers.
//!
//! # Document Format
//!
//! ```json
//! {"shapes":[
//!   {"type":"rectangle","color":"#FF0000",
//!    "bounds":{"northEast":{"lat":"1","lng":"1"},"southWest":{"lat":"0","lng":"0"}}},
//!   {"type":"circle","color":"#00FF00","center":{"lat":"10","lng":"20"},"radius":"500"},
//!   {"type":"polyline","color":"#0000FF","path":[{"lat":"0","lng":"0"},{"lat":"1","lng":"2"}]},
//!   {"type":"polygon","color":"#000000","paths":[{"path":[{"lat":"0","lng":"0"},...]}]}
//! ]}
//! ```
//!
//! Numbers are written as strings unless [`NumberFormat::Numeric`] is
//! requested; both spellings are accepted when reading. Entries with an
//! unknown `type` are skipped. Markers are never written.

mod wire;

use serde::{Deserialize, Serialize};
use shape::{Geometry, Shape, ShapeKind, ShapeRecord};
use std::str::FromStr;
use wire::WireShape;

/// Error type for interchange operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// The input is not JSON, or the top level is not a shape document.
    Parse(String),
    /// A shape entry lacks a required field.
    MissingField { index: usize, field: String },
    /// A shape entry has a field of the wrong shape or value.
    InvalidShape { index: usize, message: String },
    /// Writing the document failed.
    Write(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::MissingField { index, field } => {
                write!(f, "Shape {}: missing field '{}'", index, field)
            }
            Self::InvalidShape { index, message } => {
                write!(f, "Shape {}: {}", index, message)
            }
            Self::Write(msg) => write!(f, "Write error: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {}

/// How numbers (latitudes, longitudes, radii) are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// Numbers as JSON strings (`"lat":"1.5"`), the historical format.
    #[default]
    Legacy,
    /// Numbers as JSON numbers (`"lat":1.5`).
    Numeric,
}

/// Codec configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    pub number_format: NumberFormat,
}

impl CodecOptions {
    pub fn numeric() -> Self {
        Self {
            number_format: NumberFormat::Numeric,
        }
    }
}

#[derive(Serialize)]
struct WriteDocument {
    shapes: Vec<WireShape>,
}

#[derive(Deserialize)]
struct ReadDocument {
    shapes: Vec<serde_json::Value>,
}

fn encode_parts<'a>(
    parts: impl Iterator<Item = (&'a Geometry, &'a str)>,
    options: CodecOptions,
) -> Result<String, CodecError> {
    let shapes = parts
        .filter_map(|(geometry, color)| {
            let wire = WireShape::from_parts(geometry, color, options.number_format);
            if wire.is_none() {
                log::debug!("Skipping {} on write", geometry.kind());
            }
            wire
        })
        .collect();

    serde_json::to_string(&WriteDocument { shapes }).map_err(|e| CodecError::Write(e.to_string()))
}

/// Encode the store's shapes, in order.
pub fn encode(shapes: &[Shape], options: CodecOptions) -> Result<String, CodecError> {
    encode_parts(
        shapes.iter().map(|s| (&s.geometry, s.color.as_str())),
        options,
    )
}

/// Encode shapes that have not been added to a store.
pub fn encode_records(
    records: &[ShapeRecord],
    options: CodecOptions,
) -> Result<String, CodecError> {
    encode_parts(
        records.iter().map(|r| (&r.geometry, r.color.as_str())),
        options,
    )
}

/// Decode a document into shape records, in document order.
pub fn decode(input: &str) -> Result<Vec<ShapeRecord>, CodecError> {
    let doc: ReadDocument =
        serde_json::from_str(input).map_err(|e| CodecError::Parse(e.to_string()))?;

    let mut records = Vec::with_capacity(doc.shapes.len());
    for (index, entry) in doc.shapes.into_iter().enumerate() {
        if let Some(record) = decode_shape(index, entry)? {
            records.push(record);
        }
    }
    Ok(records)
}

fn decode_shape(
    index: usize,
    entry: serde_json::Value,
) -> Result<Option<ShapeRecord>, CodecError> {
    let type_name = match entry.get("type") {
        Some(serde_json::Value::String(name)) => name.clone(),
        Some(other) => {
            return Err(CodecError::InvalidShape {
                index,
                message: format!("'type' must be a string, found {}", other),
            })
        }
        None => {
            return Err(CodecError::MissingField {
                index,
                field: "type".into(),
            })
        }
    };

    match ShapeKind::from_str(&type_name) {
        Ok(kind) if kind.is_persisted() => {}
        _ => {
            log::debug!("Skipping shape {} of unknown type '{}'", index, type_name);
            return Ok(None);
        }
    }

    let wire: WireShape = serde_json::from_value(entry).map_err(|e| {
        let message = e.to_string();
        match missing_field_name(&message) {
            Some(field) => CodecError::MissingField { index, field },
            None => CodecError::InvalidShape { index, message },
        }
    })?;

    Ok(Some(wire.into_record()))
}

/// Pull the field name out of serde's "missing field `x`" message.
fn missing_field_name(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

/// An owned shape document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub shapes: Vec<ShapeRecord>,
}

impl Document {
    pub fn new(shapes: Vec<ShapeRecord>) -> Self {
        Self { shapes }
    }

    /// Parse a document from a JSON string.
    pub fn from_json(input: &str) -> Result<Self, CodecError> {
        decode(input).map(Self::new)
    }

    /// Serialize the document to a JSON string.
    pub fn to_json(&self, options: CodecOptions) -> Result<String, CodecError> {
        encode_records(&self.shapes, options)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of shapes of each kind, in first-seen order.
    pub fn kind_counts(&self) -> Vec<(ShapeKind, usize)> {
        let mut counts: Vec<(ShapeKind, usize)> = Vec::new();
        for record in &self.shapes {
            let kind = record.kind();
            match counts.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, count)) => *count += 1,
                None => counts.push((kind, 1)),
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shape::{LatLng, Path, ShapeId};

    const RECTANGLE_JSON: &str = r##"{"shapes":[{"type":"rectangle","color":"#FF0000","bounds":{"northEast":{"lat":"1","lng":"1"},"southWest":{"lat":"0","lng":"0"}}}]}"##;

    fn rectangle() -> ShapeRecord {
        ShapeRecord::new(
            Geometry::rectangle(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)),
            "#FF0000",
        )
    }

    fn sample_records() -> Vec<ShapeRecord> {
        vec![
            rectangle(),
            ShapeRecord::new(Geometry::circle(LatLng::new(51.5, -0.12), 250.5), "#00FF00"),
            ShapeRecord::new(
                Geometry::polyline(Path::from_points([
                    LatLng::new(0.0, 0.0),
                    LatLng::new(1.25, 2.5),
                    LatLng::new(-3.0, 4.0),
                ])),
                "#0000FF",
            ),
            ShapeRecord::new(
                Geometry::polygon([
                    Path::from_points([
                        LatLng::new(0.0, 0.0),
                        LatLng::new(0.0, 5.0),
                        LatLng::new(5.0, 5.0),
                    ]),
                    Path::from_points([
                        LatLng::new(1.0, 1.0),
                        LatLng::new(1.0, 2.0),
                        LatLng::new(2.0, 2.0),
                    ]),
                ]),
                "#123456",
            ),
        ]
    }

    #[test]
    fn test_encode_rectangle() {
        let json = encode_records(&[rectangle()], CodecOptions::default()).unwrap();
        assert_eq!(json, RECTANGLE_JSON);
    }

    #[test]
    fn test_decode_rectangle() {
        let records = decode(RECTANGLE_JSON).unwrap();
        assert_eq!(records, vec![rectangle()]);
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[], CodecOptions::default()).unwrap(), r##"{"shapes":[]}"##);
    }

    #[test]
    fn test_encode_store_shapes() {
        let shapes = vec![Shape::new(ShapeId::new(7), rectangle())];
        assert_eq!(encode(&shapes, CodecOptions::default()).unwrap(), RECTANGLE_JSON);
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let records = sample_records();
        for options in [CodecOptions::default(), CodecOptions::numeric()] {
            let json = encode_records(&records, options).unwrap();
            assert_eq!(decode(&json).unwrap(), records);
        }
    }

    #[test]
    fn test_circle_and_polygon_layout() {
        let records = sample_records();
        let json = encode_records(&records[1..], CodecOptions::default()).unwrap();
        assert!(json.contains(
            r##"{"type":"circle","color":"#00FF00","center":{"lat":"51.5","lng":"-0.12"},"radius":"250.5"}"##
        ));
        assert!(json.contains(r##""paths":[{"path":[{"lat":"0","lng":"0"},"##));
    }

    #[test]
    fn test_numeric_format() {
        let json = encode_records(&[rectangle()], CodecOptions::numeric()).unwrap();
        assert_eq!(
            json,
            r##"{"shapes":[{"type":"rectangle","color":"#FF0000","bounds":{"northEast":{"lat":1.0,"lng":1.0},"southWest":{"lat":0.0,"lng":0.0}}}]}"##
        );
    }

    #[test]
    fn test_numeric_format_keeps_infinite_radius() {
        let circle = ShapeRecord::new(Geometry::circle(LatLng::new(1.0, 2.0), f64::INFINITY), "");
        let json = encode_records(&[circle.clone()], CodecOptions::numeric()).unwrap();
        assert!(json.contains(r#""radius":"Infinity""#));
        assert_eq!(decode(&json).unwrap(), vec![circle]);
    }

    #[test]
    fn test_markers_are_not_written() {
        let records = vec![
            ShapeRecord::new(Geometry::marker(LatLng::new(1.0, 1.0)), ""),
            rectangle(),
        ];
        let json = encode_records(&records, CodecOptions::default()).unwrap();
        assert_eq!(json, RECTANGLE_JSON);
    }

    #[test]
    fn test_unknown_types_are_skipped() {
        let json = r##"{"shapes":[
            {"type":"hexagon","color":"#000000"},
            {"type":"marker","position":{"lat":"1","lng":"1"}},
            {"type":"polyline","color":"#FFFFFF","path":[{"lat":"1","lng":"2"}]}
        ]}"##;
        let records = decode(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), ShapeKind::Polyline);
        assert_eq!(records[0].color, "#FFFFFF");
    }

    #[test]
    fn test_mixed_number_spellings() {
        let json = r##"{"shapes":[{"type":"circle","color":"red","center":{"lat":10,"lng":"20.5"},"radius":100}]}"##;
        let records = decode(json).unwrap();
        assert_eq!(
            records[0].geometry,
            Geometry::circle(LatLng::new(10.0, 20.5), 100.0)
        );
    }

    #[test]
    fn test_missing_color_is_empty() {
        let json = r##"{"shapes":[{"type":"polyline","path":[]}]}"##;
        let records = decode(json).unwrap();
        assert_eq!(records[0].color, "");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(decode("{\"shapes\":["), Err(CodecError::Parse(_))));
        assert!(matches!(decode("{}"), Err(CodecError::Parse(_))));
        assert!(matches!(decode(""), Err(CodecError::Parse(_))));
    }

    #[test]
    fn test_missing_geometry() {
        let json = r##"{"shapes":[{"type":"circle","color":"#000000","center":{"lat":"1","lng":"1"}}]}"##;
        assert_eq!(
            decode(json),
            Err(CodecError::MissingField {
                index: 0,
                field: "radius".into()
            })
        );
    }

    #[test]
    fn test_missing_type() {
        let json = r##"{"shapes":[{"color":"#000000"}]}"##;
        assert_eq!(
            decode(json),
            Err(CodecError::MissingField {
                index: 0,
                field: "type".into()
            })
        );
    }

    #[test]
    fn test_bad_number() {
        let json = r##"{"shapes":[{"type":"circle","center":{"lat":"x","lng":"1"},"radius":"1"}]}"##;
        assert!(matches!(decode(json), Err(CodecError::InvalidShape { index: 0, .. })));
    }

    #[test]
    fn test_document_kind_counts() {
        let mut records = sample_records();
        records.push(rectangle());
        let doc = Document::new(records);
        assert_eq!(
            doc.kind_counts(),
            vec![
                (ShapeKind::Rectangle, 2),
                (ShapeKind::Circle, 1),
                (ShapeKind::Polyline, 1),
                (ShapeKind::Polygon, 1),
            ]
        );
    }

    #[test]
    fn test_options_from_json() {
        let options: CodecOptions =
            serde_json::from_str(r##"{"number_format":"numeric"}"##).unwrap();
        assert_eq!(options, CodecOptions::numeric());
        let defaults: CodecOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults.number_format, NumberFormat::Legacy);
    }
}
