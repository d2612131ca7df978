//! Land boundary datasets.
//!
//! A dataset is an ordered, immutable list of named land features. It can be
//! decoded from TopoJSON, GeoJSON or an ESRI shapefile.

use super::topology::Topology;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, Geometry, Value};
use shapefile::dbase::FieldValue;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a land dataset.
#[derive(Debug, Error)]
pub enum GeoDataError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("failed to read shapefile: {0}")]
    Shapefile(#[from] shapefile::Error),
    #[error("topology has no object named {0:?}")]
    MissingObject(String),
    #[error("arc index {0} is out of range")]
    InvalidArc(i64),
    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(String),
}

/// A named land boundary in geographic coordinates (lon, lat degrees).
#[derive(Debug, Clone, PartialEq)]
pub struct LandFeature {
    /// Region name, used for exclusion and hover notifications
    pub name: String,
    /// Dataset identifier (e.g. ISO numeric code), if present
    pub id: Option<String>,
    /// Boundary polygons
    pub geometry: MultiPolygon<f64>,
}

impl LandFeature {
    pub fn new(name: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self {
            name: name.into(),
            id: None,
            geometry,
        }
    }
}

/// An immutable set of land features with a content signature.
#[derive(Debug, Clone)]
pub struct LandDataset {
    features: Vec<LandFeature>,
    signature: u64,
}

impl LandDataset {
    /// Wraps features into a dataset, computing its content signature.
    pub fn new(features: Vec<LandFeature>) -> Self {
        let mut hasher = DefaultHasher::new();
        features.len().hash(&mut hasher);
        for feature in &features {
            feature.name.hash(&mut hasher);
            for polygon in feature.geometry.iter() {
                hash_ring(polygon.exterior(), &mut hasher);
                for hole in polygon.interiors() {
                    hash_ring(hole, &mut hasher);
                }
            }
        }
        let signature = hasher.finish();

        Self {
            features,
            signature,
        }
    }

    pub fn features(&self) -> &[LandFeature] {
        &self.features
    }

    /// Hash of every feature name and coordinate, used as a cache key.
    pub fn signature(&self) -> u64 {
        self.signature
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Decodes the named object of a TopoJSON topology.
    pub fn from_topojson(json: &str, object_name: &str) -> Result<Self, GeoDataError> {
        let topology = Topology::from_json(json)?;
        let features = topology.features(object_name)?;
        log::info!(
            "Loaded {} land features from topology object {:?}",
            features.len(),
            object_name
        );
        Ok(Self::new(features))
    }

    /// Decodes GeoJSON data (FeatureCollection, Feature or bare Geometry).
    pub fn from_geojson(json: &str) -> Result<Self, GeoDataError> {
        let geojson: GeoJson = json.parse()?;

        let mut features = Vec::new();
        match geojson {
            GeoJson::FeatureCollection(fc) => {
                features.extend(fc.features.iter().filter_map(convert_feature));
            }
            GeoJson::Feature(f) => features.extend(convert_feature(&f)),
            GeoJson::Geometry(g) => {
                features.extend(convert_geometry(&g).map(|geometry| LandFeature::new("", geometry)))
            }
        }

        log::info!("Loaded {} land features from GeoJSON", features.len());
        Ok(Self::new(features))
    }

    /// Decodes polygon shapes from shapefile bytes, with names from the dbf.
    pub fn from_shapefile(shp_bytes: &[u8], dbf_bytes: Option<&[u8]>) -> Result<Self, GeoDataError> {
        let mut shape_reader = shapefile::ShapeReader::new(Cursor::new(shp_bytes))?;

        let dbf_records: Option<Vec<shapefile::dbase::Record>> = dbf_bytes.and_then(|bytes| {
            shapefile::dbase::Reader::new(Cursor::new(bytes))
                .ok()
                .and_then(|mut r: shapefile::dbase::Reader<Cursor<&[u8]>>| r.read().ok())
        });

        let mut features = Vec::new();
        for (idx, result) in shape_reader.iter_shapes().enumerate() {
            let shape: shapefile::Shape = result?;

            let shapefile::Shape::Polygon(poly) = shape else {
                continue;
            };

            let name = dbf_records
                .as_ref()
                .and_then(|records| records.get(idx))
                .and_then(record_name)
                .unwrap_or_default();

            let geometry = assemble_rings(poly.rings().iter().map(|ring| {
                let coords = LineString(
                    ring.points()
                        .iter()
                        .map(|p| Coord { x: p.x, y: p.y })
                        .collect(),
                );
                let outer = matches!(ring, shapefile::PolygonRing::Outer(_));
                (coords, outer)
            }));

            if !geometry.0.is_empty() {
                features.push(LandFeature::new(name, geometry));
            }
        }

        log::info!("Loaded {} land features from shapefile", features.len());
        Ok(Self::new(features))
    }

    /// Loads a dataset from disk, choosing the decoder from the file name.
    ///
    /// `object_name` selects the topology object for TopoJSON input.
    pub fn load(path: &Path, object_name: &str) -> Result<Self, GeoDataError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if file_name.ends_with(".shp") {
            let shp = std::fs::read(path)?;
            let dbf = std::fs::read(path.with_extension("dbf")).ok();
            return Self::from_shapefile(&shp, dbf.as_deref());
        }

        if file_name.ends_with(".topojson")
            || file_name.ends_with(".json")
            || file_name.ends_with(".geojson")
        {
            let json = std::fs::read_to_string(path)?;
            return if is_topology(&json) {
                Self::from_topojson(&json, object_name)
            } else {
                Self::from_geojson(&json)
            };
        }

        Err(GeoDataError::UnsupportedFormat(file_name))
    }
}

fn hash_ring(ring: &LineString<f64>, hasher: &mut DefaultHasher) {
    ring.0.len().hash(hasher);
    for c in ring.coords() {
        c.x.to_bits().hash(hasher);
        c.y.to_bits().hash(hasher);
    }
}

fn is_topology(json: &str) -> bool {
    #[derive(serde::Deserialize)]
    struct TypeTag {
        #[serde(rename = "type")]
        kind: Option<String>,
    }

    serde_json::from_str::<TypeTag>(json)
        .ok()
        .and_then(|p| p.kind)
        .is_some_and(|kind| kind == "Topology")
}

fn record_name(record: &shapefile::dbase::Record) -> Option<String> {
    // Try common name fields
    for field_name in ["NAME", "name", "Name", "ADMIN", "NAME_LONG"] {
        if let Some(FieldValue::Character(Some(s))) = record.get(field_name) {
            return Some(s.trim().to_string());
        }
    }
    None
}

/// Groups outer rings and holes into polygons.
///
/// Each hole is attached to the first outer ring containing its first
/// point; orphan holes are dropped.
fn assemble_rings(rings: impl Iterator<Item = (LineString<f64>, bool)>) -> MultiPolygon<f64> {
    let mut outers: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
    let mut holes: Vec<LineString<f64>> = Vec::new();

    for (ring, outer) in rings {
        if outer {
            outers.push((ring, Vec::new()));
        } else {
            holes.push(ring);
        }
    }

    for hole in holes {
        let Some(start) = hole.0.first().copied() else {
            continue;
        };
        if let Some((_, owned)) = outers
            .iter_mut()
            .find(|(exterior, _)| ring_contains(exterior, start))
        {
            owned.push(hole);
        }
    }

    MultiPolygon(
        outers
            .into_iter()
            .map(|(exterior, interiors)| Polygon::new(exterior, interiors))
            .collect(),
    )
}

fn ring_contains(ring: &LineString<f64>, point: Coord<f64>) -> bool {
    let pts = &ring.0;
    if pts.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let (a, b) = (pts[i], pts[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn convert_feature(feature: &Feature) -> Option<LandFeature> {
    let properties = feature.properties.as_ref();
    let name = properties
        .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_default();

    let id = feature.id.as_ref().map(|id| match id {
        geojson::feature::Id::String(s) => s.clone(),
        geojson::feature::Id::Number(n) => n.to_string(),
    });

    let geometry = feature.geometry.as_ref().and_then(convert_geometry)?;
    Some(LandFeature { name, id, geometry })
}

fn convert_geometry(geometry: &Geometry) -> Option<MultiPolygon<f64>> {
    match &geometry.value {
        Value::Polygon(rings) => convert_polygon(rings).map(|p| MultiPolygon(vec![p])),
        Value::MultiPolygon(polygons) => Some(MultiPolygon(
            polygons.iter().filter_map(|rings| convert_polygon(rings)).collect(),
        )),
        Value::GeometryCollection(geometries) => {
            let polygons: Vec<Polygon<f64>> = geometries
                .iter()
                .filter_map(convert_geometry)
                .flat_map(|mp| mp.0)
                .collect();
            (!polygons.is_empty()).then_some(MultiPolygon(polygons))
        }
        _ => {
            log::debug!("Skipping non-areal GeoJSON geometry");
            None
        }
    }
}

fn convert_polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let to_ring = |ring: &Vec<Vec<f64>>| -> LineString<f64> {
        LineString(
            ring.iter()
                .filter(|c| c.len() >= 2)
                .map(|c| Coord { x: c[0], y: c[1] })
                .collect(),
        )
    };

    let (exterior, holes) = rings.split_first()?;
    Some(Polygon::new(to_ring(exterior), holes.iter().map(to_ring).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "FRA",
                "properties": { "name": "France" },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 43], [7, 43], [7, 50], [0, 50], [0, 43]]] }
            },
            {
                "type": "Feature",
                "properties": { "name": "Paris" },
                "geometry": { "type": "Point", "coordinates": [2.35, 48.85] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Islands" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[10, 10], [11, 10], [11, 11], [10, 10]]],
                        [[[20, 20], [21, 20], [21, 21], [20, 20]]]
                    ]
                }
            }
        ]
    }"#;

    fn ring(points: &[(f64, f64)]) -> LineString<f64> {
        LineString(points.iter().map(|&(x, y)| Coord { x, y }).collect())
    }

    #[test]
    fn test_geojson_keeps_only_areal_features() {
        let dataset = LandDataset::from_geojson(COLLECTION).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.features()[0].name, "France");
        assert_eq!(dataset.features()[0].id.as_deref(), Some("FRA"));
        assert_eq!(dataset.features()[1].name, "Islands");
        assert_eq!(dataset.features()[1].geometry.0.len(), 2);
    }

    #[test]
    fn test_signature_is_content_based() {
        let a = LandDataset::from_geojson(COLLECTION).unwrap();
        let b = LandDataset::from_geojson(COLLECTION).unwrap();
        assert_eq!(a.signature(), b.signature());

        let mut renamed = a.features().to_vec();
        renamed[0].name = "Gaul".to_string();
        assert_ne!(LandDataset::new(renamed).signature(), a.signature());
    }

    #[test]
    fn test_holes_attach_to_containing_outer_ring() {
        let big = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        let far = ring(&[(50.0, 50.0), (60.0, 50.0), (60.0, 60.0), (50.0, 50.0)]);
        let hole = ring(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 2.0)]);

        let geometry = assemble_rings(vec![(far, true), (big, true), (hole, false)].into_iter());

        assert_eq!(geometry.0.len(), 2);
        assert!(geometry.0[0].interiors().is_empty());
        assert_eq!(geometry.0[1].interiors().len(), 1);
    }

    #[test]
    fn test_topology_detection() {
        assert!(is_topology(r#"{"type":"Topology","objects":{},"arcs":[]}"#));
        assert!(!is_topology(COLLECTION));
        assert!(!is_topology("not json"));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let result = LandDataset::load(Path::new("world.kml"), "countries");
        assert!(matches!(result, Err(GeoDataError::UnsupportedFormat(_))));
    }

    const ISLAND_TOPOLOGY: &str = r#"{
        "type": "Topology",
        "objects": {
            "land": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "id": "ISL", "properties": { "name": "Isle" }, "arcs": [[0]] }
                ]
            }
        },
        "arcs": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
    }"#;

    #[test]
    fn test_load_dispatches_json_by_content() {
        let dir = tempfile::tempdir().unwrap();

        let topo_path = dir.path().join("world.topo.json");
        std::fs::write(&topo_path, ISLAND_TOPOLOGY).unwrap();
        let topo = LandDataset::load(&topo_path, "land").unwrap();
        assert_eq!(topo.len(), 1);
        assert_eq!(topo.features()[0].name, "Isle");
        assert_eq!(topo.features()[0].id.as_deref(), Some("ISL"));

        // Object names only matter for topologies
        let missing = LandDataset::load(&topo_path, "countries");
        assert!(matches!(missing, Err(GeoDataError::MissingObject(_))));

        let geojson_path = dir.path().join("world.geojson");
        std::fs::write(&geojson_path, COLLECTION).unwrap();
        let geojson = LandDataset::load(&geojson_path, "land").unwrap();
        assert_eq!(geojson.len(), 2);
        assert_eq!(geojson.features()[0].name, "France");
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = LandDataset::load(&dir.path().join("absent.geojson"), "countries");
        assert!(matches!(result, Err(GeoDataError::Io(_))));
    }

    fn lake_polygon() -> shapefile::Polygon {
        use shapefile::{Point, PolygonRing};

        let points = |coords: &[(f64, f64)]| -> Vec<Point> {
            coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
        };

        // Outer rings run clockwise, holes counter-clockwise
        shapefile::Polygon::with_rings(vec![
            PolygonRing::Outer(points(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)])),
            PolygonRing::Inner(points(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0), (2.0, 2.0)])),
        ])
    }

    #[test]
    fn test_load_shapefile_with_names_and_holes() {
        use shapefile::dbase::{FieldName, Record, TableWriterBuilder};

        let dir = tempfile::tempdir().unwrap();
        let shp_path = dir.path().join("lakes.shp");

        {
            let table = TableWriterBuilder::new()
                .add_character_field(FieldName::try_from("NAME").unwrap(), 50);
            let mut writer = shapefile::Writer::from_path(&shp_path, table).unwrap();

            let mut record = Record::default();
            record.insert(
                "NAME".to_string(),
                FieldValue::Character(Some("Lakeland".to_string())),
            );
            writer.write_shape_and_record(&lake_polygon(), &record).unwrap();
        }

        let dataset = LandDataset::load(&shp_path, "countries").unwrap();
        assert_eq!(dataset.len(), 1);

        let lakeland = &dataset.features()[0];
        assert_eq!(lakeland.name, "Lakeland");
        assert_eq!(lakeland.geometry.0.len(), 1);
        assert_eq!(lakeland.geometry.0[0].interiors().len(), 1);
        assert_eq!(lakeland.geometry.0[0].interiors()[0].0[0], Coord { x: 2.0, y: 2.0 });

        // Without the dbf the shape still loads, unnamed
        let shp = std::fs::read(&shp_path).unwrap();
        let unnamed = LandDataset::from_shapefile(&shp, None).unwrap();
        assert_eq!(unnamed.features()[0].name, "");
        assert_eq!(unnamed.features()[0].geometry, lakeland.geometry);
    }

    #[test]
    fn test_record_name_fallbacks() {
        use shapefile::dbase::Record;

        let mut admin = Record::default();
        admin.insert("ADMIN".to_string(), FieldValue::Character(Some("  Iceland ".to_string())));
        assert_eq!(record_name(&admin).as_deref(), Some("Iceland"));

        let mut blank = Record::default();
        blank.insert("NAME".to_string(), FieldValue::Character(None));
        blank.insert("POP".to_string(), FieldValue::Numeric(Some(12.0)));
        assert_eq!(record_name(&blank), None);
    }
}
