//! TopoJSON topology decoding.
//!
//! A topology stores shared boundary arcs once; polygons reference arcs by
//! index (negative indices mean "reversed", encoded as `!i`). Quantized
//! topologies additionally delta-encode arc positions on an integer grid
//! described by `transform`.

use super::{GeoDataError, LandFeature};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Quantization transform of a topology.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

/// Raw topology document.
#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub objects: HashMap<String, TopoObject>,
}

/// A geometry object inside a topology.
///
/// Kept loosely typed: the shape of `arcs` depends on `kind`.
#[derive(Debug, Clone, Deserialize)]
pub struct TopoObject {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub arcs: Option<Value>,
    #[serde(default)]
    pub geometries: Vec<TopoObject>,
}

impl Topology {
    /// Parses a topology from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GeoDataError> {
        let topology: Topology = serde_json::from_str(json)?;
        if topology.kind != "Topology" {
            return Err(GeoDataError::UnsupportedFormat(format!(
                "expected a Topology, found {}",
                topology.kind
            )));
        }
        Ok(topology)
    }

    /// Decodes every areal geometry of the named object into land features.
    pub fn features(&self, object_name: &str) -> Result<Vec<LandFeature>, GeoDataError> {
        let object = self
            .objects
            .get(object_name)
            .ok_or_else(|| GeoDataError::MissingObject(object_name.to_string()))?;

        let arcs = self.decode_arcs();
        let mut features = Vec::new();
        self.collect_features(object, &arcs, &mut features)?;
        Ok(features)
    }

    fn collect_features(
        &self,
        object: &TopoObject,
        arcs: &[Vec<Coord<f64>>],
        out: &mut Vec<LandFeature>,
    ) -> Result<(), GeoDataError> {
        let geometry = match object.kind.as_deref() {
            Some("GeometryCollection") => {
                for child in &object.geometries {
                    self.collect_features(child, arcs, out)?;
                }
                return Ok(());
            }
            Some("Polygon") => {
                let rings: Vec<Vec<i64>> = parse_arcs(object)?;
                MultiPolygon(vec![build_polygon(&rings, arcs)?])
            }
            Some("MultiPolygon") => {
                let polygons: Vec<Vec<Vec<i64>>> = parse_arcs(object)?;
                let polygons = polygons
                    .iter()
                    .map(|rings| build_polygon(rings, arcs))
                    .collect::<Result<Vec<_>, _>>()?;
                MultiPolygon(polygons)
            }
            other => {
                log::debug!("Skipping non-areal topology geometry: {:?}", other);
                return Ok(());
            }
        };

        let id = object.id.as_ref().and_then(value_to_string);
        let name = object
            .properties
            .as_ref()
            .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .or_else(|| id.clone())
            .unwrap_or_default();

        out.push(LandFeature { name, id, geometry });
        Ok(())
    }

    /// Resolves every arc to absolute lon/lat positions.
    fn decode_arcs(&self) -> Vec<Vec<Coord<f64>>> {
        self.arcs
            .iter()
            .map(|arc| match self.transform {
                Some(Transform { scale, translate }) => {
                    let (mut x, mut y) = (0.0, 0.0);
                    arc.iter()
                        .filter(|p| p.len() >= 2)
                        .map(|p| {
                            x += p[0];
                            y += p[1];
                            Coord {
                                x: x * scale[0] + translate[0],
                                y: y * scale[1] + translate[1],
                            }
                        })
                        .collect()
                }
                None => arc
                    .iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| Coord { x: p[0], y: p[1] })
                    .collect(),
            })
            .collect()
    }
}

fn parse_arcs<T: serde::de::DeserializeOwned>(object: &TopoObject) -> Result<T, GeoDataError> {
    let arcs = object.arcs.clone().unwrap_or(Value::Array(Vec::new()));
    Ok(serde_json::from_value(arcs)?)
}

fn build_polygon(rings: &[Vec<i64>], arcs: &[Vec<Coord<f64>>]) -> Result<Polygon<f64>, GeoDataError> {
    let mut rings = rings
        .iter()
        .map(|ring| stitch_ring(ring, arcs))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();

    let exterior = rings.next().unwrap_or_else(|| LineString(Vec::new()));
    Ok(Polygon::new(exterior, rings.collect()))
}

/// Joins the referenced arcs into one ring.
///
/// Consecutive arcs share their join point, so the last point of the ring
/// built so far is dropped before each arc is appended.
fn stitch_ring(indices: &[i64], arcs: &[Vec<Coord<f64>>]) -> Result<LineString<f64>, GeoDataError> {
    let mut points: Vec<Coord<f64>> = Vec::new();

    for &index in indices {
        let (arc_index, reversed) = if index < 0 {
            ((!index) as usize, true)
        } else {
            (index as usize, false)
        };
        let arc = arcs.get(arc_index).ok_or(GeoDataError::InvalidArc(index))?;

        points.pop();
        if reversed {
            points.extend(arc.iter().rev().copied());
        } else {
            points.extend(arc.iter().copied());
        }
    }

    if let Some(&first) = points.first() {
        while points.len() < 4 {
            points.push(first);
        }
    }

    Ok(LineString(points))
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
