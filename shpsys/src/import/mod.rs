//! Import of non-topological path data.
//!
//! Format readers feed features into a [`PathImporter`] one by one. Every imported path becomes one arc of the
//! resulting [`ArcCollection`], so the dataset returned by [`PathImporter::done`] is ready for topology building.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::arcs::ArcCollection;
use crate::shape::{GeometryType, Shape};

mod importer;
mod options;

#[cfg(feature = "geo-types")]
mod geo;
#[cfg(feature = "geojson")]
mod geojson;

#[cfg(feature = "geo-types")]
pub use geo::*;
#[cfg(feature = "geojson")]
pub use self::geojson::*;
pub use importer::*;
pub use options::*;

/// Attributes of one feature.
pub type Record = Map<String, Value>;

/// Attribute records of a layer, one per shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataTable {
    records: Vec<Record>,
}

impl DataTable {
    /// Creates a table. Missing records become empty ones.
    pub fn new(records: impl IntoIterator<Item = Option<Record>>) -> Self {
        Self {
            records: records.into_iter().map(Option::unwrap_or_default).collect(),
        }
    }

    /// Records in shape order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Mutable access to the records.
    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Number of records.
    pub fn size(&self) -> usize {
        self.records.len()
    }

    /// Names of all fields present in at least one record, in order of first appearance.
    pub fn fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = vec![];
        for record in &self.records {
            for key in record.keys() {
                if !fields.contains(key) {
                    fields.push(key.clone());
                }
            }
        }
        fields
    }
}

/// Shapes of one geometry type with their attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Type of all shapes in the layer. `None` if no feature had a geometry.
    pub geometry_type: Option<GeometryType>,
    /// Geometry of every feature. Features without geometry are `None`.
    pub shapes: Vec<Option<Shape>>,
    /// Attributes, if any feature had them.
    pub data: Option<DataTable>,
}

/// Result of an import: shared arcs and the layers referencing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Arcs of all path layers. `None` if nothing but points was imported.
    pub arcs: Option<ArcCollection>,
    /// Imported layers.
    pub layers: Vec<Layer>,
}

/// Returns true if the layer holds polygons or polylines and at least one shape is present.
pub fn layer_has_paths(layer: &Layer) -> bool {
    layer.geometry_type.is_some_and(GeometryType::has_paths) && layer_has_non_null_shapes(layer)
}

/// Returns true if at least one shape of the layer is present.
pub fn layer_has_non_null_shapes(layer: &Layer) -> bool {
    layer.shapes.iter().any(Option::is_some)
}

/// Splits features into one layer per geometry type, in order of first appearance of the type.
///
/// A layer gets a data table unless none of its features had attributes.
pub fn divide_features_by_type(
    shapes: Vec<Option<Shape>>,
    properties: Vec<Option<Record>>,
    types: &[Option<GeometryType>],
) -> Vec<Layer> {
    let mut type_set = vec![];
    for t in types {
        if !type_set.contains(t) {
            type_set.push(*t);
        }
    }

    let mut layers: Vec<(Layer, Vec<Option<Record>>)> = type_set
        .iter()
        .map(|&geometry_type| {
            (
                Layer {
                    geometry_type,
                    ..Default::default()
                },
                vec![],
            )
        })
        .collect();

    let mut properties = properties.into_iter();
    for (i, shape) in shapes.into_iter().enumerate() {
        let record = properties.next().flatten();
        let t = types.get(i).copied().flatten();
        let Some(index) = type_set.iter().position(|&v| v == t) else {
            continue;
        };
        let (layer, records) = &mut layers[index];
        layer.shapes.push(shape);
        records.push(record);
    }

    layers
        .into_iter()
        .map(|(mut layer, records)| {
            if records.iter().any(Option::is_some) {
                layer.data = Some(DataTable::new(records));
            }
            layer
        })
        .collect()
}

/// Adds a `null` value for every field that is missing from some of the records.
pub fn fix_inconsistent_fields(records: &mut [Record]) {
    let mut counts: Vec<(String, usize)> = vec![];
    for record in records.iter() {
        for key in record.keys() {
            match counts.iter_mut().find(|(k, _)| k == key) {
                Some((_, count)) => *count += 1,
                None => counts.push((key.clone(), 1)),
            }
        }
    }

    let incomplete: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| *count < records.len())
        .map(|(key, _)| key)
        .collect();
    if incomplete.is_empty() {
        return;
    }

    for record in records.iter_mut() {
        for field in &incomplete {
            if !record.contains_key(field) {
                record.insert(field.clone(), Value::Null);
            }
        }
    }
}
